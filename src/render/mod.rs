//! Plain-text previews of a layout.

mod core;

pub use self::core::{PreviewTracker, UNPRINTABLE_GLYPH, preview_glyph, render_preview};
