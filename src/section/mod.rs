//! Sections: the rectangles a [`Layout`](crate::Layout) owns.
//!
//! A section never points back at its layout; every operation that needs
//! the layout (z-order, moves, directional placement) is a `Layout` method
//! keyed by [`SectionId`].

mod core;
mod side;

pub use self::core::{Placement, Section, SectionId, SectionInit};
pub use side::{Adjacency, Corner, Side};
