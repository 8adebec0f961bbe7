//! Shadow-scoped stylesheet. Lives inside the shadow root only, so none of
//! these selectors reach the host document.

pub const SHADOW_CSS: &str = r#"
:host { all: initial; }
* { box-sizing: border-box; }
.launcher {
  width: 56px; height: 56px; border: 0; border-radius: 999px;
  display: grid; place-items: center; background: #111; color: #fff;
  cursor: pointer; box-shadow: 0 10px 25px rgba(0,0,0,.25);
  font: 600 20px/1 system-ui, sans-serif;
}
.panel {
  position: fixed; right: 16px; bottom: 88px;
  width: min(380px, 90vw); height: min(560px, 80vh);
  border-radius: 16px; background: #0b0b0f; color: #fff;
  box-shadow: 0 20px 40px rgba(0,0,0,.35); overflow: hidden; display: none;
}
.panel.open { display: block; }
header {
  display: flex; align-items: center; gap: 8px; padding: 12px 16px;
  background: #141425; font: 600 14px/1 system-ui, sans-serif;
  border-bottom: 1px solid #222;
}
.title { flex: 1; }
.badge {
  padding: 2px 8px; background: #2dd4bf; color: #041313;
  border-radius: 999px; font-size: 11px;
}
.close {
  border: 0; background: transparent; color: #fff; cursor: pointer;
  font: 600 18px/1 system-ui, sans-serif;
}
.body { padding: 12px 16px; font: 400 13px/1.5 system-ui, sans-serif; }
.row { display: flex; gap: 8px; align-items: center; margin-top: 10px; }
.primary {
  padding: 10px 12px; border-radius: 10px; border: 0; background: #22d3ee;
  color: #00232a; font-weight: 700; cursor: pointer;
}
.status { opacity: .85; margin-top: 8px; font-size: 12px; }
"#;
