use serde_json::{Value, json};
use slotmap::SlotMap;

use crate::error::{LayoutError, Result};
use crate::geometry::{Extent, Point, Rect};
use crate::logging::{LogLevel, event_with_fields, json_kv, json_str};
use crate::metrics::{LayoutMetrics, MetricSnapshot};
use crate::section::{Placement, Section, SectionId, SectionInit, Side};

use super::config::{LayoutConfig, LayoutOptions};

/// An occupied cell and every section covering it, back to front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Square {
    pub x: i64,
    pub y: i64,
    pub sections: Vec<SectionId>,
}

/// Owner of a set of sections on the integer plane.
///
/// The z-order runs from index 0 (back) to the last index (front); the
/// newest section starts at the front. Bounds are kept current after every
/// structural change.
#[derive(Debug, Clone)]
pub struct Layout<D = ()> {
    config: LayoutConfig,
    sections: SlotMap<SectionId, Section<D>>,
    order: Vec<SectionId>,
    bounds: Option<Rect>,
    metrics: LayoutMetrics,
}

impl<D> Default for Layout<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Layout<D> {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_options(options: LayoutOptions) -> Self {
        Self::with_config(LayoutConfig::new(options))
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            sections: SlotMap::with_key(),
            order: Vec::new(),
            bounds: None,
            metrics: LayoutMetrics::new(),
        }
    }

    pub fn options(&self) -> LayoutOptions {
        self.config.options
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Smallest (or, without auto-shrink, historical) rectangle holding
    /// every section. `None` while the layout is empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Cell count of the bounds, 0 when unset.
    pub fn size(&self) -> u64 {
        self.bounds.map_or(0, |bounds| bounds.area())
    }

    pub fn width(&self) -> Option<u64> {
        self.bounds.map(|bounds| bounds.width())
    }

    pub fn height(&self) -> Option<u64> {
        self.bounds.map(|bounds| bounds.height())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.sections.contains_key(id)
    }

    pub fn section(&self, id: SectionId) -> Option<&Section<D>> {
        self.sections.get(id)
    }

    /// Mutable access to a section's name and payload. Geometry changes go
    /// through [`move_to`](Self::move_to) and [`resize`](Self::resize).
    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section<D>> {
        self.sections.get_mut(id)
    }

    /// Section handles from back to front.
    pub fn z_order(&self) -> &[SectionId] {
        &self.order
    }

    /// Sections from back to front.
    pub fn sections(&self) -> impl Iterator<Item = &Section<D>> + '_ {
        self.order.iter().filter_map(|id| self.sections.get(*id))
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> MetricSnapshot {
        self.metrics.snapshot(self.len(), self.size())
    }

    /// Add an anonymous section with a default payload.
    pub fn add_section(&mut self, left: i64, top: i64, right: i64, bottom: i64) -> Result<SectionId>
    where
        D: Default,
    {
        self.add_section_with(left, top, right, bottom, SectionInit::default())
    }

    /// Add a section at the front of the z-order.
    ///
    /// Fails with `InvalidRectangle` for inverted edges and, unless overlap
    /// is enabled, with `Overlap` when any existing section shares a cell.
    pub fn add_section_with(
        &mut self,
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
        init: SectionInit<D>,
    ) -> Result<SectionId> {
        self.try_insert("add_section", Rect::new(left, top, right, bottom), init)
    }

    /// Add a section described by edges or by origin and size.
    pub fn add(&mut self, extent: Extent, init: SectionInit<D>) -> Result<SectionId> {
        self.try_insert("add", extent.resolve(), init)
    }

    fn try_insert(
        &mut self,
        op: &str,
        rect: Result<Rect>,
        init: SectionInit<D>,
    ) -> Result<SectionId> {
        let checked = rect.and_then(|rect| self.check_overlap(rect).map(|()| rect));
        match checked {
            Ok(rect) => Ok(self.insert(rect, init)),
            Err(err) => Err(self.rejected(op, err)),
        }
    }

    fn check_overlap(&self, rect: Rect) -> Result<()> {
        if self.config.options.overlap {
            return Ok(());
        }
        match self.sections().find(|section| section.rect().intersects(&rect)) {
            Some(existing) => Err(LayoutError::Overlap {
                rect,
                existing: existing.id(),
            }),
            None => Ok(()),
        }
    }

    fn insert(&mut self, rect: Rect, init: SectionInit<D>) -> SectionId {
        let id = self
            .sections
            .insert_with_key(|id| Section::new(id, rect, init));
        self.order.push(id);
        self.metrics.record_added();
        self.update_bounds();

        self.emit(LogLevel::Debug, "section_added", || {
            let mut fields = vec![json_str("id", format!("{id:?}")), json_kv("rect", json!(rect))];
            if let Some(name) = self.sections.get(id).and_then(Section::name) {
                fields.push(json_str("name", name));
            }
            fields
        });
        id
    }

    /// Remove a section, severing its adjacency links in both directions.
    pub fn delete_section(&mut self, id: SectionId) -> Result<Section<D>> {
        let section = self.detach(id).ok_or(LayoutError::SectionNotFound(id))?;
        self.metrics.record_removed(1);
        self.update_bounds();
        self.emit(LogLevel::Debug, "section_removed", || {
            vec![json_str("id", format!("{id:?}"))]
        });
        Ok(section)
    }

    /// Synonym for [`delete_section`](Self::delete_section).
    pub fn remove_section(&mut self, id: SectionId) -> Result<Section<D>> {
        self.delete_section(id)
    }

    /// Remove every section covering `(x, y)`, back to front.
    pub fn delete_sections(&mut self, x: i64, y: i64) -> Vec<Section<D>> {
        let removed: Vec<_> = self
            .sections_at(x, y)
            .into_iter()
            .filter_map(|id| self.detach(id))
            .collect();
        if !removed.is_empty() {
            self.metrics.record_removed(removed.len());
            self.update_bounds();
            self.emit(LogLevel::Debug, "sections_removed", || {
                vec![
                    json_str("at", Point::new(x, y).to_string()),
                    json_kv("count", removed.len()),
                ]
            });
        }
        removed
    }

    pub fn delete_all_sections(&mut self) {
        let count = self.order.len();
        self.order.clear();
        self.sections.clear();
        self.metrics.record_removed(count);
        self.update_bounds();
        self.emit(LogLevel::Info, "sections_cleared", || {
            vec![json_kv("count", count)]
        });
    }

    fn detach(&mut self, id: SectionId) -> Option<Section<D>> {
        let mut section = self.sections.remove(id)?;
        for (side, neighbour) in section.adjacency_mut().drain() {
            if let Some(other) = self.sections.get_mut(neighbour) {
                other.adjacency_mut().remove(side.opposite(), id);
            }
        }
        self.order.retain(|entry| *entry != id);
        Some(section)
    }

    /// Sections covering `(x, y)`, back to front.
    pub fn sections_at(&self, x: i64, y: i64) -> Vec<SectionId> {
        self.sections()
            .filter(|section| section.rect().contains_point(x, y))
            .map(Section::id)
            .collect()
    }

    /// Like [`sections_at`](Self::sections_at) for a textual `"x,y"` point.
    pub fn sections_at_point(&self, point: &str) -> Result<Vec<SectionId>> {
        let point: Point = point.parse()?;
        Ok(self.sections_at(point.x, point.y))
    }

    /// The front-most section covering `(x, y)`.
    pub fn topmost_at(&self, x: i64, y: i64) -> Option<SectionId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| {
                self.sections
                    .get(*id)
                    .is_some_and(|section| section.rect().contains_point(x, y))
            })
    }

    pub fn square(&self, x: i64, y: i64) -> Option<Square> {
        let sections = self.sections_at(x, y);
        (!sections.is_empty()).then_some(Square { x, y, sections })
    }

    pub fn bring_to_front(&mut self, id: SectionId) -> Result<()> {
        let idx = self.position(id)?;
        let id = self.order.remove(idx);
        self.order.push(id);
        Ok(())
    }

    pub fn send_to_back(&mut self, id: SectionId) -> Result<()> {
        let idx = self.position(id)?;
        let id = self.order.remove(idx);
        self.order.insert(0, id);
        Ok(())
    }

    fn position(&self, id: SectionId) -> Result<usize> {
        self.order
            .iter()
            .position(|entry| *entry == id)
            .ok_or(LayoutError::SectionNotFound(id))
    }

    /// Move relative to the current position.
    pub fn shift(&mut self, id: SectionId, dx: i64, dy: i64) -> Result<()> {
        let rect = self.get(id)?.rect();
        let x = rect.left().checked_add(dx);
        let y = rect.top().checked_add(dy);
        match (x, y) {
            (Some(x), Some(y)) => self.move_to(id, x, y),
            _ => Err(LayoutError::InvalidArgument(format!(
                "shift by ({dx}, {dy}) leaves the coordinate range"
            ))),
        }
    }

    /// Put the section's top-left corner at `(x, y)`, keeping its size.
    ///
    /// Moves are not checked against the overlap policy.
    pub fn move_to(&mut self, id: SectionId, x: i64, y: i64) -> Result<()> {
        let rect = self.get(id)?.rect().moved_to(x, y)?;
        self.get_mut(id)?.set_rect(rect);
        self.update_bounds();
        self.emit(LogLevel::Debug, "section_moved", || {
            vec![json_str("id", format!("{id:?}")), json_kv("rect", json!(rect))]
        });
        Ok(())
    }

    /// Rewrite the section's edges.
    ///
    /// Every other section that fully contains this one must still contain
    /// the new rectangle.
    pub fn resize(
        &mut self,
        id: SectionId,
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
    ) -> Result<()> {
        let current = self.get(id)?.rect();
        let checked = Rect::new(left, top, right, bottom)
            .and_then(|proposed| self.check_containers(id, current, proposed).map(|()| proposed));
        let proposed = match checked {
            Ok(proposed) => proposed,
            Err(err) => return Err(self.rejected("resize", err)),
        };

        self.get_mut(id)?.set_rect(proposed);
        self.update_bounds();
        self.emit(LogLevel::Debug, "section_resized", || {
            vec![
                json_str("id", format!("{id:?}")),
                json_kv("rect", json!(proposed)),
            ]
        });
        Ok(())
    }

    fn check_containers(&self, id: SectionId, current: Rect, proposed: Rect) -> Result<()> {
        let escaped = self.sections().find(|other| {
            other.id() != id && other.rect().contains(&current) && !other.rect().contains(&proposed)
        });
        match escaped {
            Some(container) => Err(LayoutError::Overlap {
                rect: proposed,
                existing: container.id(),
            }),
            None => Ok(()),
        }
    }

    pub fn add_left(&mut self, id: SectionId, placement: Placement<D>) -> Result<SectionId> {
        self.attach(id, Side::Left, placement)
    }

    pub fn add_top(&mut self, id: SectionId, placement: Placement<D>) -> Result<SectionId> {
        self.attach(id, Side::Top, placement)
    }

    pub fn add_right(&mut self, id: SectionId, placement: Placement<D>) -> Result<SectionId> {
        self.attach(id, Side::Right, placement)
    }

    pub fn add_bottom(&mut self, id: SectionId, placement: Placement<D>) -> Result<SectionId> {
        self.attach(id, Side::Bottom, placement)
    }

    /// Add a section flush against `anchor`'s `side` and link the two.
    pub fn attach(
        &mut self,
        anchor: SectionId,
        side: Side,
        placement: Placement<D>,
    ) -> Result<SectionId> {
        let (anchor_rect, blocked_by) = {
            let section = self.get(anchor)?;
            let blocked_by = section.corner().filter(|_| !section.can_extend(side));
            (section.rect(), blocked_by)
        };
        if let Some(corner) = blocked_by {
            return Err(self.rejected("attach", LayoutError::CornerConstraint { corner, side }));
        }
        let rect = placement.rect_against(&anchor_rect, side);
        let id = self.try_insert("attach", rect, placement.init)?;
        self.link_unchecked(anchor, side, id);
        Ok(id)
    }

    /// Record `b` as a neighbour on `a`'s `side` (and `a` on `b`'s opposite
    /// side) without any geometric check.
    pub fn link(&mut self, a: SectionId, side: Side, b: SectionId) -> Result<()> {
        self.get(a)?;
        self.get(b)?;
        if a == b {
            return Err(LayoutError::InvalidArgument(
                "a section cannot be linked to itself".to_string(),
            ));
        }
        self.link_unchecked(a, side, b);
        Ok(())
    }

    /// Drop the link between `a`'s `side` and `b`. Returns whether a link
    /// existed.
    pub fn unlink(&mut self, a: SectionId, side: Side, b: SectionId) -> Result<bool> {
        self.get(b)?;
        let removed = self.get_mut(a)?.adjacency_mut().remove(side, b);
        let reciprocal = self.get_mut(b)?.adjacency_mut().remove(side.opposite(), a);
        Ok(removed || reciprocal)
    }

    fn link_unchecked(&mut self, a: SectionId, side: Side, b: SectionId) {
        if let Some(section) = self.sections.get_mut(a) {
            section.adjacency_mut().insert(side, b);
        }
        if let Some(section) = self.sections.get_mut(b) {
            section.adjacency_mut().insert(side.opposite(), a);
        }
    }

    fn get(&self, id: SectionId) -> Result<&Section<D>> {
        self.sections.get(id).ok_or(LayoutError::SectionNotFound(id))
    }

    fn get_mut(&mut self, id: SectionId) -> Result<&mut Section<D>> {
        self.sections
            .get_mut(id)
            .ok_or(LayoutError::SectionNotFound(id))
    }

    /// The only place bounds are written.
    fn update_bounds(&mut self) {
        let envelope = Rect::envelope(self.sections.values().map(Section::rect));
        self.bounds = match (envelope, self.bounds) {
            (None, _) => None,
            (Some(envelope), Some(previous)) if !self.config.options.auto_shrink => {
                Some(previous.union(&envelope))
            }
            (Some(envelope), _) => Some(envelope),
        };
        self.metrics.record_bounds_update();
    }

    fn rejected(&mut self, op: &str, err: LayoutError) -> LayoutError {
        self.metrics.record_rejected();
        self.emit(LogLevel::Warn, "section_rejected", || {
            vec![json_str("op", op), json_str("error", err.to_string())]
        });
        err
    }

    fn emit<F>(&self, level: LogLevel, message: &str, fields: F)
    where
        F: FnOnce() -> Vec<(String, Value)>,
    {
        let Some(logger) = self.config.logger.as_ref() else {
            return;
        };
        if !logger.enabled(level) {
            return;
        }
        let event = event_with_fields(level, &self.config.log_target, message, fields());
        let _ = logger.log_event(event);
    }
}
