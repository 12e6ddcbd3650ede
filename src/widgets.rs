//! Clickable list component.
//!
//! Pairs rendered lines with the key a tap on that row should press, so
//! the visual output and its click targets cannot drift apart.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::click::ClickState;

/// A builder that pairs rendered [`Line`]s with key presses.
///
/// # Example
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Header (not clickable)"));
/// cl.push_clickable(Line::from(" [U] Upgrade"), 'u');
/// cl.register_targets(area, &mut cs, 1, 1);
/// let widget = Paragraph::new(cl.into_lines()).block(block);
/// f.render_widget(widget, area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, key)` pairs.
    keys: Vec<(u16, char)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// Add a non-clickable line.
    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a line that presses `key` when tapped.
    pub fn push_clickable(&mut self, line: Line<'a>, key: char) {
        let idx = self.lines.len() as u16;
        self.keys.push((idx, key));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for all clickable lines. One logical line is
    /// one row; lines pushed past the bottom of `area` are skipped.
    ///
    /// * `top_offset` — rows before content (1 for a top border).
    /// * `bottom_offset` — rows after content (1 for a bottom border).
    pub fn register_targets(&self, area: Rect, cs: &mut ClickState, top_offset: u16, bottom_offset: u16) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, key) in &self.keys {
            let row = content_y + line_idx;
            if row < content_end {
                cs.add_target(row, key);
            }
        }
    }
}
