use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{LayoutError, Result};

use super::SectionId;

/// One of the four edges of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marks a section as sitting in a layout corner. The two sides pointing
/// out past that corner cannot be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Sides that directional placement may not extend from.
    pub const fn disabled_sides(self) -> [Side; 2] {
        match self {
            Corner::TopLeft => [Side::Left, Side::Top],
            Corner::TopRight => [Side::Right, Side::Top],
            Corner::BottomLeft => [Side::Left, Side::Bottom],
            Corner::BottomRight => [Side::Right, Side::Bottom],
        }
    }

    pub fn disables(self, side: Side) -> bool {
        self.disabled_sides().contains(&side)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corner {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Corner::ALL
            .into_iter()
            .find(|corner| corner.as_str() == s)
            .ok_or_else(|| LayoutError::InvalidCorner(s.to_string()))
    }
}

/// Explicit neighbour links on each side. Lists keep insertion order and
/// never hold duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    left: Vec<SectionId>,
    top: Vec<SectionId>,
    right: Vec<SectionId>,
    bottom: Vec<SectionId>,
}

impl Adjacency {
    pub fn get(&self, side: Side) -> &[SectionId] {
        match side {
            Side::Left => &self.left,
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
        }
    }

    fn list_mut(&mut self, side: Side) -> &mut Vec<SectionId> {
        match side {
            Side::Left => &mut self.left,
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
        }
    }

    /// Returns false when the link already existed.
    pub(crate) fn insert(&mut self, side: Side, id: SectionId) -> bool {
        let list = self.list_mut(side);
        if list.contains(&id) {
            return false;
        }
        list.push(id);
        true
    }

    /// Returns false when there was nothing to remove.
    pub(crate) fn remove(&mut self, side: Side, id: SectionId) -> bool {
        let list = self.list_mut(side);
        match list.iter().position(|linked| *linked == id) {
            Some(idx) => {
                list.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Empty every list, yielding each former link with its side.
    pub(crate) fn drain(&mut self) -> Vec<(Side, SectionId)> {
        let mut links = Vec::new();
        for side in Side::ALL {
            links.extend(self.list_mut(side).drain(..).map(|id| (side, id)));
        }
        links
    }

    pub fn is_empty(&self) -> bool {
        Side::ALL.iter().all(|side| self.get(*side).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn corner_permission_table() {
        assert!(Corner::TopLeft.disables(Side::Left));
        assert!(Corner::TopLeft.disables(Side::Top));
        assert!(!Corner::TopLeft.disables(Side::Right));
        assert!(!Corner::TopLeft.disables(Side::Bottom));
        assert!(Corner::BottomRight.disables(Side::Right));
        assert!(Corner::BottomRight.disables(Side::Bottom));
        assert!(Corner::TopRight.disables(Side::Top));
        assert!(Corner::BottomLeft.disables(Side::Bottom));
    }

    #[test]
    fn corner_parsing() {
        for corner in Corner::ALL {
            assert_eq!(corner.as_str().parse::<Corner>().unwrap(), corner);
        }
        let err = "middle".parse::<Corner>().unwrap_err();
        assert!(matches!(err, LayoutError::InvalidCorner(ref value) if value == "middle"));
        assert_eq!(err.to_string(), "`middle` is an invalid corner");
    }

    #[test]
    fn opposite_sides() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            assert_ne!(side.opposite(), side);
        }
    }

    #[test]
    fn adjacency_deduplicates_and_drains() {
        let mut keys: SlotMap<SectionId, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        let mut adjacency = Adjacency::default();
        assert!(adjacency.insert(Side::Right, a));
        assert!(!adjacency.insert(Side::Right, a));
        assert!(adjacency.insert(Side::Right, b));
        assert!(adjacency.insert(Side::Top, a));
        assert_eq!(adjacency.get(Side::Right), &[a, b]);

        assert!(adjacency.remove(Side::Right, a));
        assert!(!adjacency.remove(Side::Right, a));
        assert_eq!(adjacency.get(Side::Right), &[b]);

        let drained = adjacency.drain();
        assert_eq!(drained, vec![(Side::Top, a), (Side::Right, b)]);
        assert!(adjacency.is_empty());
    }
}
