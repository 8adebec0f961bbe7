//! Demo host page
//!
//! GET / serves a storefront stand-in that embeds the widget and behaves like
//! a hostile host: it can delete the widget node, swap its app view the way an
//! SPA router does, drive `history.pushState`/`replaceState`, or wipe `<body>`.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::config::WidgetSettings;

/// GET /
pub async fn host_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_host_page(&state.widget))
}

/// Render the demo page for the given anchor settings
pub fn render_host_page(widget: &WidgetSettings) -> String {
    let api_attr = if widget.api_base.is_empty() {
        String::new()
    } else {
        format!(r#" data-api="{}""#, escape_html(&widget.api_base))
    };
    let debug_flag = if widget.debug {
        "<script>window.SASHA_WIDGET_DEBUG = true;</script>\n"
    } else {
        ""
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Sasha widget host</title>
<style>
  body {{ font: 15px/1.5 Georgia, serif; margin: 2rem; }}
  button {{ margin: 0 .5rem .5rem 0; }}
  /* Hostile rules the widget must shrug off */
  div {{ font-family: "Comic Sans MS", cursive !important; }}
  .panel, .launcher {{ display: block !important; background: red !important; }}
</style>
{debug_flag}</head>
<body>
<div id="controls">
  <button data-action="remove">Remove widget node</button>
  <button data-action="swap">SPA view swap</button>
  <button data-action="push">pushState</button>
  <button data-action="replace">replaceState</button>
  <button data-action="back">Back</button>
  <button data-action="purge">Purge body</button>
</div>
<main id="app"><h1>Storefront</h1><p>Route: <span id="route">/</span></p></main>
<div id="sasha-widget" data-brand="{brand}" data-mode="{mode}"{api_attr}></div>
<script>
  let views = 0;
  const shell = () => document.getElementById("sasha-widget-shell");
  const route = () => {{ const el = document.getElementById("route"); if (el) el.textContent = location.hash || "/"; }};
  document.getElementById("controls").addEventListener("click", (e) => {{
    switch (e.target.dataset.action) {{
      case "remove": shell()?.remove(); break;
      case "swap":
        document.getElementById("app").innerHTML = `<h1>View ${{++views}}</h1><p>Route: <span id="route"></span></p>`;
        shell()?.remove();
        route();
        break;
      case "push": history.pushState({{}}, "", `#/page-${{++views}}`); shell()?.remove(); route(); break;
      case "replace": history.replaceState({{}}, "", `#/replaced-${{++views}}`); shell()?.remove(); route(); break;
      case "back": history.back(); break;
      case "purge": document.body.innerHTML = ""; break;
    }}
  }});
  window.addEventListener("popstate", route);
</script>
<script type="module">
  import init from "/widget/sasha_widget.js";
  init();
</script>
</body>
</html>
"#,
        debug_flag = debug_flag,
        brand = escape_html(&widget.brand),
        mode = escape_html(&widget.mode),
        api_attr = api_attr,
    )
}

/// Escape text for use inside HTML attribute values
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_attributes() {
        let page = render_host_page(&WidgetSettings {
            brand: "Acme".to_string(),
            mode: "admin".to_string(),
            api_base: "http://127.0.0.1:8090".to_string(),
            debug: false,
        });
        assert!(page.contains(
            r#"<div id="sasha-widget" data-brand="Acme" data-mode="admin" data-api="http://127.0.0.1:8090"></div>"#
        ));
        assert!(!page.contains("SASHA_WIDGET_DEBUG"));
    }

    #[test]
    fn test_empty_api_omits_attribute() {
        let page = render_host_page(&WidgetSettings::default());
        assert!(page.contains(r#"data-brand="Sasha" data-mode="customer"></div>"#));
        assert!(!page.contains("data-api="));
    }

    #[test]
    fn test_debug_flag_and_escaping() {
        let page = render_host_page(&WidgetSettings {
            brand: r#""><script>alert(1)</script>"#.to_string(),
            debug: true,
            ..WidgetSettings::default()
        });
        assert!(page.contains("window.SASHA_WIDGET_DEBUG = true;"));
        assert!(page.contains("data-brand=\"&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;\""));
    }
}
