use thiserror::Error;

use crate::geometry::Rect;
use crate::section::{Corner, SectionId, Side};

/// Unified result type for the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by layout and section operations.
///
/// Every variant is raised before any mutation happens, so a failed call
/// leaves the layout exactly as it was.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(
        "invalid rectangle ({left}, {top})-({right}, {bottom}): left must not exceed right and top must not exceed bottom"
    )]
    InvalidRectangle {
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
    },
    #[error("rectangle {rect} conflicts with section {existing:?}")]
    Overlap { rect: Rect, existing: SectionId },
    #[error("section has no {side} side to add to (corner `{corner}`)")]
    CornerConstraint { corner: Corner, side: Side },
    #[error("`{0}` is an invalid corner")]
    InvalidCorner(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("section {0:?} not found")]
    SectionNotFound(SectionId),
    #[error("invalid layout options: {0}")]
    Options(#[from] serde_json::Error),
}
