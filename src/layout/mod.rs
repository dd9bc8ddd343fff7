//! Text layout: turns a [`TextBlock`]'s runs into positioned lines.
//!
//! Layout is purely derived data. It reads a text block and produces a
//! [`LayoutResult`]; nothing in this module touches stroke coordinates or
//! mutates the document.

mod options;

pub use options::LayoutOptions;

use crate::model::{TextBlock, TextStyle};
use serde::Serialize;

/// Tolerance for width comparisons, in device units.
const WIDTH_EPSILON: f32 = 0.01;

/// A styled piece of a run placed on a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    /// Text placed on the line
    pub text: String,

    /// Style of the run the text came from
    pub style: TextStyle,
}

/// One laid-out line of a text block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// Left edge in device units
    pub x: f32,

    /// Top edge in device units
    pub y: f32,

    /// Baseline in device units
    pub baseline: f32,

    /// Line advance in device units
    pub height: f32,

    /// Measured width of the placed text
    pub width: f32,

    /// Run pieces on this line, in source order
    pub fragments: Vec<Fragment>,

    /// First source character offset covered by the line
    pub start: usize,

    /// Source character offset one past the last character on the line
    pub end: usize,

    /// The line began because of width wrapping, not an explicit break
    pub soft_wrapped: bool,

    /// Style in effect when the line was closed (used for empty lines)
    pub style: TextStyle,
}

impl Line {
    /// Concatenated text of all fragments.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Check if the line carries no text.
    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| f.text.is_empty())
    }

    /// Check if this line starts a source paragraph.
    pub fn starts_paragraph(&self) -> bool {
        !self.soft_wrapped
    }
}

/// Lines produced for one text block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Lines, top to bottom
    pub lines: Vec<Line>,
}

impl LayoutResult {
    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total height of all lines.
    pub fn height(&self) -> f32 {
        self.lines.iter().map(|l| l.height).sum()
    }

    /// Line text joined with `\n`. Soft-wrapped continuations are joined
    /// with a space instead when `join_soft_wraps` is set.
    pub fn text(&self, join_soft_wraps: bool) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                if join_soft_wraps && line.soft_wrapped {
                    out.push(' ');
                } else {
                    out.push('\n');
                }
            }
            out.push_str(&line.text());
        }
        out
    }

    /// The line containing a source character offset.
    pub fn line_at_offset(&self, offset: usize) -> Option<&Line> {
        self.lines.iter().rev().find(|l| l.start <= offset)
    }
}

/// Lay out a text block.
///
/// Every explicit break closes the current line, so a block with `k`
/// breaks always produces at least `k + 1` lines. Width-driven wrapping
/// splits a run at the last whitespace that fits; a run with no such
/// boundary is placed unbroken. A block with no runs yields no lines.
pub fn layout_text_block(block: &TextBlock, options: &LayoutOptions) -> LayoutResult {
    let mut engine = LayoutEngine::new(block, options);
    for run in &block.runs {
        let mut pieces = run.text.split(is_break_char);
        if let Some(first) = pieces.next() {
            engine.place(first, &run.style);
        }
        for piece in pieces {
            engine.hard_break(&run.style);
            engine.place(piece, &run.style);
        }
        if run.line_break {
            engine.hard_break(&run.style);
        }
    }
    if !block.runs.is_empty() {
        engine.finish_line();
    }
    log::debug!(
        "Laid out text block at ({}, {}) into {} lines",
        block.x,
        block.y,
        engine.lines.len()
    );
    LayoutResult {
        lines: engine.lines,
    }
}

fn is_break_char(c: char) -> bool {
    matches!(c, '\n' | '\u{2028}' | '\u{2029}')
}

/// Mutable state of one layout pass.
struct LayoutEngine<'a> {
    block: &'a TextBlock,
    options: &'a LayoutOptions,
    lines: Vec<Line>,
    current: LineBuilder,
    cursor: usize,
    top: f32,
}

#[derive(Debug)]
struct LineBuilder {
    fragments: Vec<Fragment>,
    width: f32,
    start: usize,
    soft_wrapped: bool,
    style: TextStyle,
}

impl LineBuilder {
    fn new(start: usize, soft_wrapped: bool, style: TextStyle) -> Self {
        Self {
            fragments: Vec::new(),
            width: 0.0,
            start,
            soft_wrapped,
            style,
        }
    }

    fn has_content(&self) -> bool {
        self.fragments.iter().any(|f| !f.text.is_empty())
    }
}

impl<'a> LayoutEngine<'a> {
    fn new(block: &'a TextBlock, options: &'a LayoutOptions) -> Self {
        let style = block.runs.first().map(|r| r.style).unwrap_or_default();
        Self {
            block,
            options,
            lines: Vec::new(),
            current: LineBuilder::new(0, false, style),
            cursor: 0,
            top: block.y,
        }
    }

    fn wraps(&self) -> bool {
        self.block.width > 0.0
    }

    fn available(&self) -> f32 {
        if self.wraps() {
            self.block.width - self.current.width
        } else {
            f32::INFINITY
        }
    }

    fn push(&mut self, text: &str, style: &TextStyle, width: f32) {
        self.current.fragments.push(Fragment {
            text: text.to_string(),
            style: *style,
        });
        self.current.width += width;
        self.current.style = *style;
        self.cursor += text.chars().count();
    }

    fn place(&mut self, text: &str, style: &TextStyle) {
        self.current.style = *style;
        let mut rest = text;
        while !rest.is_empty() {
            let avail = self.available();
            let width = self.options.measure(rest, style.size);
            if width <= avail + WIDTH_EPSILON {
                self.push(rest, style, width);
                return;
            }

            if let Some((head_end, next_start)) = self.split_point(rest, avail, style.size) {
                let head = &rest[..head_end];
                let head_width = self.options.measure(head, style.size);
                self.push(head, style, head_width);
                self.cursor += rest[head_end..next_start].chars().count();
                rest = &rest[next_start..];
                self.soft_break();
            } else if self.current.has_content() {
                self.soft_break();
                let trimmed = rest.trim_start();
                self.cursor += rest[..rest.len() - trimmed.len()].chars().count();
                rest = trimmed;
            } else {
                // Nothing fits even on an empty line: the first word goes
                // alone and wrapping resumes after it.
                let lead = rest.len() - rest.trim_start().len();
                let Some(pos) = rest[lead..].find(char::is_whitespace) else {
                    self.push(rest, style, width);
                    return;
                };
                let head = &rest[..lead + pos];
                let head_width = self.options.measure(head, style.size);
                self.push(head, style, head_width);
                let tail = &rest[lead + pos..];
                let trimmed = tail.trim_start();
                self.cursor += tail[..tail.len() - trimmed.len()].chars().count();
                rest = trimmed;
                if !rest.is_empty() {
                    self.soft_break();
                }
            }
        }
    }

    /// Byte offsets `(head_end, next_start)` of the last whitespace split
    /// whose head fits in `avail`.
    fn split_point(&self, text: &str, avail: f32, size: f32) -> Option<(usize, usize)> {
        let mut best = None;
        for (i, c) in text.char_indices() {
            if !c.is_whitespace() {
                continue;
            }
            let head = text[..i].trim_end();
            if head.is_empty() {
                continue;
            }
            if self.options.measure(head, size) > avail + WIDTH_EPSILON {
                break;
            }
            let tail = &text[i..];
            let next_start = i + (tail.len() - tail.trim_start().len());
            best = Some((head.len(), next_start));
        }
        best
    }

    fn hard_break(&mut self, style: &TextStyle) {
        self.current.style = *style;
        self.finish_line();
        self.cursor += 1;
        self.current = LineBuilder::new(self.cursor, false, *style);
    }

    fn soft_break(&mut self) {
        let style = self.current.style;
        self.finish_line();
        self.current = LineBuilder::new(self.cursor, true, style);
    }

    fn finish_line(&mut self) {
        let style = self.current.style;
        let builder =
            std::mem::replace(&mut self.current, LineBuilder::new(self.cursor, false, style));

        let height = builder
            .fragments
            .iter()
            .map(|f| self.options.line_height(&f.style))
            .fold(self.options.line_height(&builder.style), f32::max);
        let ascent = builder
            .fragments
            .iter()
            .map(|f| f.style.size)
            .fold(builder.style.size, f32::max);

        let y = self.top;
        self.top += height;
        self.lines.push(Line {
            x: self.block.x,
            y,
            baseline: y + ascent,
            height,
            width: builder.width,
            fragments: builder.fragments,
            start: builder.start,
            end: self.cursor,
            soft_wrapped: builder.soft_wrapped,
            style: builder.style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextRun, TextStyle};

    fn block_with(runs: Vec<TextRun>, width: f32) -> TextBlock {
        let mut block = TextBlock::new(100.0, 200.0, width);
        for run in runs {
            block.add_run(run);
        }
        block
    }

    #[test]
    fn test_explicit_break_starts_new_line() {
        let block = block_with(
            vec![TextRun::new("Hello").with_break(), TextRun::new("World")],
            1000.0,
        );
        let result = layout_text_block(&block, &LayoutOptions::default());

        assert_eq!(result.len(), 2);
        assert_eq!(result.lines[0].text(), "Hello");
        assert_eq!(result.lines[1].text(), "World");
        assert!(result.lines[0].y < result.lines[1].y);
        assert_eq!(result.lines[0].y, 200.0);
        assert_eq!(result.lines[1].y, 200.0 + result.lines[0].height);
        assert!(result.lines.iter().all(|l| l.x == 100.0));
    }

    #[test]
    fn test_k_breaks_give_k_plus_one_lines() {
        let runs = vec![
            TextRun::new("a").with_break(),
            TextRun::new("b"),
            TextRun::new("c").with_break(),
            TextRun::new("d").with_break(),
            TextRun::new("e"),
        ];
        let block = block_with(runs, 1000.0);
        let result = layout_text_block(&block, &LayoutOptions::default());

        let texts: Vec<_> = result.lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["a", "bc", "d", "e"]);
    }

    #[test]
    fn test_trailing_break_yields_empty_line() {
        let block = block_with(vec![TextRun::new("only").with_break()], 1000.0);
        let result = layout_text_block(&block, &LayoutOptions::default());
        assert_eq!(result.len(), 2);
        assert!(result.lines[1].is_empty());
        assert!(result.lines[1].height > 0.0);
    }

    #[test]
    fn test_embedded_newline_is_a_break() {
        let block = block_with(vec![TextRun::new("one\ntwo")], 0.0);
        let result = layout_text_block(&block, &LayoutOptions::default());
        assert_eq!(result.text(false), "one\ntwo");
        assert_eq!(result.lines[1].start, 4);
    }

    #[test]
    fn test_width_wrap_splits_at_last_fitting_space() {
        let options = LayoutOptions::default();
        let style = TextStyle::plain();
        let width = options.measure("aaaa bbbb", style.size) + 1.0;
        let block = block_with(vec![TextRun::new("aaaa bbbb cccc")], width);
        let result = layout_text_block(&block, &options);

        assert_eq!(result.len(), 2);
        assert_eq!(result.lines[0].text(), "aaaa bbbb");
        assert_eq!(result.lines[1].text(), "cccc");
        assert!(result.lines[1].soft_wrapped);
        assert!(!result.lines[0].soft_wrapped);
        assert_eq!(result.text(true), "aaaa bbbb cccc");
    }

    #[test]
    fn test_unbreakable_run_is_placed_whole() {
        let block = block_with(vec![TextRun::new("supercalifragilistic")], 20.0);
        let result = layout_text_block(&block, &LayoutOptions::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result.lines[0].text(), "supercalifragilistic");
    }

    #[test]
    fn test_long_word_does_not_drag_following_words_past_width() {
        let options = LayoutOptions::default();
        let size = TextStyle::plain().size;
        let long = "x".repeat(30);
        let text = format!("{}{}", long, " ab".repeat(40));
        let block = block_with(vec![TextRun::new(text.clone())], 200.0);
        let result = layout_text_block(&block, &options);

        assert!(result.len() > 2);
        assert_eq!(result.lines[0].text(), long);
        for line in &result.lines[1..] {
            assert!(line.soft_wrapped);
            assert!(options.measure(&line.text(), size) <= 200.0 + 0.01);
        }
        assert_eq!(result.text(true), text);
    }

    #[test]
    fn test_run_that_does_not_fit_moves_to_next_line() {
        let options = LayoutOptions::default();
        let size = TextStyle::plain().size;
        let width = options.measure("abcdef", size);
        let block = block_with(
            vec![TextRun::new("abcd"), TextRun::new("efghijkl")],
            width,
        );
        let result = layout_text_block(&block, &options);
        let texts: Vec<_> = result.lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["abcd", "efghijkl"]);
        assert_eq!(result.lines[1].start, 4);
    }

    #[test]
    fn test_empty_block_has_no_lines() {
        let block = TextBlock::new(0.0, 0.0, 100.0);
        assert!(layout_text_block(&block, &LayoutOptions::default()).is_empty());
    }

    #[test]
    fn test_line_at_offset() {
        let block = block_with(
            vec![TextRun::new("ab").with_break(), TextRun::new("cd")],
            0.0,
        );
        let result = layout_text_block(&block, &LayoutOptions::default());
        assert_eq!(result.line_at_offset(0).map(|l| l.text()), Some("ab".into()));
        assert_eq!(result.line_at_offset(2).map(|l| l.text()), Some("ab".into()));
        assert_eq!(result.line_at_offset(3).map(|l| l.text()), Some("cd".into()));
    }

    #[test]
    fn test_heading_line_is_taller() {
        let block = block_with(
            vec![
                TextRun::new("Title").with_style(TextStyle::heading()).with_break(),
                TextRun::new("body"),
            ],
            0.0,
        );
        let result = layout_text_block(&block, &LayoutOptions::default());
        assert!(result.lines[0].height > result.lines[1].height);
    }
}
