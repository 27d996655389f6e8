use crate::error::{LayoutError, Result};
use crate::geometry::Rect;

use super::side::{Adjacency, Corner, Side};

slotmap::new_key_type! {
    /// Handle to a section owned by a [`Layout`](crate::Layout).
    ///
    /// Handles are generational: once a section is deleted its handle never
    /// resolves again, even if the slot is reused.
    pub struct SectionId;
}

/// A named, data-bearing rectangle placed in a layout.
#[derive(Debug, Clone)]
pub struct Section<D = ()> {
    id: SectionId,
    rect: Rect,
    name: Option<String>,
    data: D,
    corner: Option<Corner>,
    adjacency: Adjacency,
}

impl<D> Section<D> {
    pub(crate) fn new(id: SectionId, rect: Rect, init: SectionInit<D>) -> Self {
        Self {
            id,
            rect,
            name: init.name,
            data: init.data,
            corner: init.corner,
            adjacency: Adjacency::default(),
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn left(&self) -> i64 {
        self.rect.left()
    }

    pub fn top(&self) -> i64 {
        self.rect.top()
    }

    pub fn right(&self) -> i64 {
        self.rect.right()
    }

    pub fn bottom(&self) -> i64 {
        self.rect.bottom()
    }

    pub fn width(&self) -> u64 {
        self.rect.width()
    }

    pub fn height(&self) -> u64 {
        self.rect.height()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Character used for this section in text previews.
    pub fn glyph(&self) -> char {
        self.name
            .as_deref()
            .and_then(|name| name.chars().next())
            .unwrap_or('x')
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    pub fn corner(&self) -> Option<Corner> {
        self.corner
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Sections explicitly linked on `side`, in link order.
    pub fn adjacent(&self, side: Side) -> &[SectionId] {
        self.adjacency.get(side)
    }

    pub fn left_sections(&self) -> &[SectionId] {
        self.adjacent(Side::Left)
    }

    pub fn top_sections(&self) -> &[SectionId] {
        self.adjacent(Side::Top)
    }

    pub fn right_sections(&self) -> &[SectionId] {
        self.adjacent(Side::Right)
    }

    pub fn bottom_sections(&self) -> &[SectionId] {
        self.adjacent(Side::Bottom)
    }

    /// Whether directional placement may extend from `side`.
    pub fn can_extend(&self, side: Side) -> bool {
        self.corner.is_none_or(|corner| !corner.disables(side))
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub(crate) fn adjacency_mut(&mut self) -> &mut Adjacency {
        &mut self.adjacency
    }
}

/// Everything about a new section except its rectangle.
#[derive(Debug, Clone, Default)]
pub struct SectionInit<D = ()> {
    pub name: Option<String>,
    pub data: D,
    pub corner: Option<Corner>,
}

impl<D: Default> SectionInit<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl<D> SectionInit<D> {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_data(mut self, data: D) -> Self {
        self.data = data;
        self
    }

    pub fn with_corner(mut self, corner: Corner) -> Self {
        self.corner = Some(corner);
        self
    }
}

/// Size and offset of a section placed against a neighbour's edge.
///
/// `shift` moves the new section along the shared edge, toward higher
/// coordinates when positive.
#[derive(Debug, Clone)]
pub struct Placement<D = ()> {
    pub width: i64,
    pub height: i64,
    pub shift: i64,
    pub init: SectionInit<D>,
}

impl<D: Default> Placement<D> {
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            shift: 0,
            init: SectionInit::default(),
        }
    }
}

impl<D> Placement<D> {
    pub fn shift(mut self, shift: i64) -> Self {
        self.shift = shift;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.init.name = Some(name.into());
        self
    }

    pub fn with_data(mut self, data: D) -> Self {
        self.init.data = data;
        self
    }

    pub fn with_corner(mut self, corner: Corner) -> Self {
        self.init.corner = Some(corner);
        self
    }

    /// Rectangle of the new section when placed against `anchor`'s `side`.
    pub fn rect_against(&self, anchor: &Rect, side: Side) -> Result<Rect> {
        let (left, top) = match side {
            Side::Right => (
                offset(anchor.right(), 1)?,
                offset(anchor.top(), self.shift)?,
            ),
            Side::Left => (
                retreat(anchor.left(), self.width)?,
                offset(anchor.top(), self.shift)?,
            ),
            Side::Top => (
                offset(anchor.left(), self.shift)?,
                retreat(anchor.top(), self.height)?,
            ),
            Side::Bottom => (
                offset(anchor.left(), self.shift)?,
                offset(anchor.bottom(), 1)?,
            ),
        };
        Rect::from_origin(left, top, self.width, self.height)
    }
}

fn offset(base: i64, delta: i64) -> Result<i64> {
    base.checked_add(delta).ok_or_else(|| overflow(base, delta))
}

fn retreat(base: i64, delta: i64) -> Result<i64> {
    base.checked_sub(delta).ok_or_else(|| overflow(base, delta))
}

fn overflow(base: i64, delta: i64) -> LayoutError {
    LayoutError::InvalidArgument(format!(
        "offset {delta} from {base} leaves the coordinate range"
    ))
}
