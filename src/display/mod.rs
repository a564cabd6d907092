//! On-device status display.
//!
//! Controllers push a handful of short text lines (current heading, target,
//! distance) every iteration. Anything that can show text implements
//! [`StatusDisplay`]; [`TextPanel`] does so for any
//! [`embedded-graphics`](https://crates.io/crates/embedded-graphics) draw
//! target, which includes the V5 Brain screen.
//!
//! # Example
//!
//! ```ignore
//! use beacon_nav::display::{StatusDisplay, TextPanel};
//!
//! let mut panel = TextPanel::new(brain_display);
//! panel.show(&["Heading 87.5".to_string(), "Target  90.0".to_string()]);
//! ```

mod panel;

pub use panel::TextPanel;

/// A sink for short status lines.
pub trait StatusDisplay {
    /// Replaces whatever is on screen with `lines`.
    fn show(&mut self, lines: &[String]);
}

/// A display that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl StatusDisplay for NullDisplay {
    fn show(&mut self, _lines: &[String]) {}
}
