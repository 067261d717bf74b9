#![forbid(unsafe_code)]

//! Label text: wrapping, measuring and drawing in cells.
//!
//! Widths are display columns (`unicode-width`); wide characters occupy two
//! cells, the second holding [`Cell::CONTINUATION`](crate::Cell).

use coachmark_core::{Rect, TextAlign};
use coachmark_layout::LabelSpec;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::buffer::{Cell, CellBuffer, CellFlags};

/// Word-wrap `text` to `max_width` columns.
///
/// Newlines start new lines; words wider than `max_width` are broken at
/// grapheme boundaries.
#[must_use]
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width: usize = 0;

        for word in paragraph.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);

            if word_width > max_width {
                if current_width > 0 {
                    lines.push(std::mem::take(&mut current_line));
                }
                let (pieces, rest, rest_width) = break_word(word, max_width);
                lines.extend(pieces);
                current_line = rest;
                current_width = rest_width;
            } else if current_width == 0 {
                current_line = word.to_string();
                current_width = word_width;
            } else if current_width + 1 + word_width <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
                current_width += 1 + word_width;
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = word.to_string();
                current_width = word_width;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    lines
}

/// Split an over-long word into full lines plus a trailing remainder.
fn break_word(word: &str, max_width: usize) -> (Vec<String>, String, usize) {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0;
    for grapheme in word.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if width + w > max_width && width > 0 {
            pieces.push(std::mem::take(&mut current));
            width = 0;
        }
        current.push_str(grapheme);
        width += w;
    }
    (pieces, current, width)
}

/// Natural `(width, height)` of `text` wrapped at `max_width` columns.
///
/// Matches the `measure` callback [`coachmark_layout::solve`] expects.
#[must_use]
pub fn measure(text: &str, max_width: f32) -> (f32, f32) {
    let columns = if max_width.is_finite() && max_width >= 1.0 {
        max_width.floor() as usize
    } else {
        return (0.0, 0.0);
    };
    let lines = wrap_text(text, columns);
    let width = lines
        .iter()
        .map(|l| UnicodeWidthStr::width(l.as_str()))
        .max()
        .unwrap_or(0);
    (width as f32, lines.len() as f32)
}

/// Draw one line starting at `(x, y)`, clipped to `max_width` columns.
///
/// Returns the number of columns written.
pub fn draw_line(
    buf: &mut CellBuffer,
    x: i32,
    y: i32,
    text: &str,
    max_width: usize,
    flags: CellFlags,
) -> usize {
    let mut col = x;
    let mut width_used = 0usize;

    for grapheme in text.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if width_used + w > max_width {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            buf.set(col, y, c, flags);
        }
        for offset in 1..w {
            buf.set(col + offset as i32, y, Cell::CONTINUATION, flags);
        }
        col += w as i32;
        width_used += w;
    }
    width_used
}

/// Draw a label inside its resolved frame, aligned per line.
pub fn draw_label(buf: &mut CellBuffer, frame: Rect, label: &LabelSpec, flags: CellFlags) {
    if frame.is_empty() {
        return;
    }
    let columns = frame.width.round().max(0.0) as usize;
    let left = frame.left().round() as i32;
    let top = frame.top().round() as i32;
    let rows = frame.height.round().max(0.0) as usize;

    for (row, line) in wrap_text(&label.text, columns).iter().take(rows).enumerate() {
        let line_width = UnicodeWidthStr::width(line.as_str()).min(columns);
        let slack = columns - line_width;
        let offset = match label.align {
            TextAlign::Left => 0,
            TextAlign::Center => slack / 2,
            TextAlign::Right => slack,
        };
        draw_line(buf, left + offset as i32, top + row as i32, line, columns, flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str, align: TextAlign) -> LabelSpec {
        LabelSpec {
            text: text.into(),
            max_width: 250.0,
            align,
        }
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("Saves your work to disk", 10),
            ["Saves your", "work to", "disk"]
        );
    }

    #[test]
    fn keeps_blank_paragraphs() {
        assert_eq!(wrap_text("a\n\nb", 5), ["a", "", "b"]);
    }

    #[test]
    fn breaks_long_words() {
        assert_eq!(wrap_text("ab abcdefg", 3), ["ab", "abc", "def", "g"]);
    }

    #[test]
    fn zero_width_wraps_to_nothing() {
        assert!(wrap_text("hello", 0).is_empty());
        assert_eq!(measure("hello", 0.5), (0.0, 0.0));
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrap_text("中文 字", 4), ["中文", "字"]);
        assert_eq!(measure("中文 字", 4.0), (4.0, 2.0));
    }

    #[test]
    fn measure_reports_widest_line() {
        assert_eq!(measure("Saves your work to disk", 10.0), (10.0, 3.0));
        assert_eq!(measure("short", 80.0), (5.0, 1.0));
    }

    #[test]
    fn draw_line_clips() {
        let mut buf = CellBuffer::new(6, 1);
        let written = draw_line(&mut buf, 1, 0, "hello world", 4, CellFlags::LABEL);
        assert_eq!(written, 4);
        assert_eq!(buf.row_text(0), " hell ");
    }

    #[test]
    fn draw_label_aligns_lines() {
        let frame = Rect::new(0.0, 0.0, 8.0, 2.0);
        for (align, expected) in [
            (TextAlign::Left, ["ab cd   ", "efgh    "]),
            (TextAlign::Center, [" ab cd  ", "  efgh  "]),
            (TextAlign::Right, ["   ab cd", "    efgh"]),
        ] {
            let mut buf = CellBuffer::new(8, 2);
            draw_label(&mut buf, frame, &label("ab cd efgh", align), CellFlags::LABEL);
            // "ab cd efgh" does not fit 8 columns, so it wraps after "cd".
            assert_eq!(buf.rows(), expected, "{align:?}");
        }
    }

    #[test]
    fn draw_label_respects_frame_height() {
        let mut buf = CellBuffer::new(4, 3);
        draw_label(
            &mut buf,
            Rect::new(0.0, 0.0, 4.0, 1.0),
            &label("one two three", TextAlign::Left),
            CellFlags::LABEL,
        );
        assert_eq!(buf.rows(), ["one ", "    ", "    "]);
    }
}
