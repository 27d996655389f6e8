//! Rectangular sections on an unbounded integer plane.
//!
//! A [`Layout`] owns its [`Section`]s, keeps their aggregate bounds and
//! paint order, enforces the overlap policy, and grows adjacency graphs
//! through directional placement:
//!
//! ```
//! use room_plan::{Extent, Layout, Placement, SectionInit};
//!
//! let mut home: Layout = Layout::new();
//! let living = home.add(Extent::sized(5, 5), SectionInit::named("Living Room"))?;
//! let hall = home.add_right(living, Placement::new(1, 5).named("Hallway"))?;
//!
//! assert_eq!(home.section(hall).unwrap().left_sections(), &[living]);
//! assert_eq!(home.to_string().lines().next(), Some("LLLLLH"));
//! # Ok::<(), room_plan::LayoutError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod section;

pub use error::{LayoutError, Result};
pub use geometry::{Extent, Point, Rect};
pub use layout::{Layout, LayoutConfig, LayoutOptions, Square};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use render::{PreviewTracker, render_preview};
pub use section::{Adjacency, Corner, Placement, Section, SectionId, SectionInit, Side};
