//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw.rs` - Main draw functions
//! - `theme.rs` - Light and dark palettes
//! - `layout.rs` - Screen layout and mouse hit-testing
//! - `month_view.rs` - Month grid widget

mod draw;
pub mod layout;
pub mod month_view;
pub mod theme;

// Re-export main draw function
pub use draw::draw;

// Re-export commonly used types
pub use layout::{DashboardLayout, Hit};
