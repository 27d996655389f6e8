use std::fmt;

use blake3::Hash;
use unicode_width::UnicodeWidthChar;

use crate::layout::Layout;
use crate::section::Section;

/// Glyph used for cells whose section name starts with a character that
/// does not occupy exactly one terminal column.
pub const UNPRINTABLE_GLYPH: char = '?';

/// Character drawn for `section` in a preview.
pub fn preview_glyph<D>(section: &Section<D>) -> char {
    let glyph = section.glyph();
    match glyph.width() {
        Some(1) => glyph,
        _ => UNPRINTABLE_GLYPH,
    }
}

/// Render the layout's bounds as text, top row first.
///
/// Each cell shows the glyph of the front-most section covering it, or a
/// space. Every row ends with `'\n'`. An empty layout, or one whose bounds
/// cover more cells than can be allocated, renders as `""`.
pub fn render_preview<D>(layout: &Layout<D>) -> String {
    let Some(bounds) = layout.bounds() else {
        return String::new();
    };
    let Some(mut cells) = blank_cells(bounds.width(), bounds.height()) else {
        return String::new();
    };
    let width = bounds.width() as usize;
    let height = bounds.height() as usize;

    // Back to front, so later sections paint over earlier ones.
    for section in layout.sections() {
        let glyph = preview_glyph(section);
        let rect = section.rect();
        let first = rect.left().abs_diff(bounds.left()) as usize;
        let last = rect.right().abs_diff(bounds.left()) as usize;
        for y in rect.top()..=rect.bottom() {
            let row = y.abs_diff(bounds.top()) as usize * width;
            cells[row + first..=row + last].fill(glyph);
        }
    }

    let mut out = String::with_capacity(cells.len() + height);
    for row in cells.chunks(width) {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn blank_cells(width: u64, height: u64) -> Option<Vec<char>> {
    let len = usize::try_from(width.checked_mul(height)?).ok()?;
    let mut cells = Vec::new();
    cells.try_reserve_exact(len).ok()?;
    cells.resize(len, ' ');
    Some(cells)
}

impl<D> fmt::Display for Layout<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_preview(self))
    }
}

/// Remembers the hash of the last preview handed out so callers only redraw
/// when the picture actually changed.
#[derive(Debug, Default, Clone)]
pub struct PreviewTracker {
    last: Option<Hash>,
}

impl PreviewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `layout`, returning the text only if it differs from the last
    /// preview returned.
    pub fn refresh<D>(&mut self, layout: &Layout<D>) -> Option<String> {
        let preview = render_preview(layout);
        let hash = blake3::hash(preview.as_bytes());
        if self.last.is_some_and(|last| last == hash) {
            return None;
        }
        self.last = Some(hash);
        Some(preview)
    }

    /// True when a refresh would produce a new preview.
    pub fn is_stale<D>(&self, layout: &Layout<D>) -> bool {
        let hash = blake3::hash(render_preview(layout).as_bytes());
        self.last.is_none_or(|last| last != hash)
    }

    pub fn last_hash(&self) -> Option<Hash> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
