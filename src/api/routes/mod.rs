//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod host_page;
