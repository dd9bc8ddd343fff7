//! Text box types.

use serde::{Deserialize, Serialize};

/// A text region: an anchor, a bounding width and styled runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Anchor x (left edge of every line) in device units
    pub x: f32,

    /// Anchor y (top of the first line) in device units
    pub y: f32,

    /// Bounding width for wrapping; zero or less disables wrapping
    pub width: f32,

    /// Styled runs in source order
    pub runs: Vec<TextRun>,
}

impl TextBlock {
    /// Create an empty text block.
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self {
            x,
            y,
            width,
            runs: Vec::new(),
        }
    }

    /// Append a run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Append a run with the given text and style.
    pub fn add_text(&mut self, text: impl Into<String>, style: TextStyle) {
        self.runs.push(TextRun::new(text).with_style(style));
    }

    /// Insert an explicit line break after the last run.
    pub fn add_line_break(&mut self) {
        match self.runs.last_mut() {
            Some(run) if !run.line_break => run.line_break = true,
            _ => self.runs.push(TextRun::new("").with_break()),
        }
    }

    /// Number of explicit line breaks.
    pub fn break_count(&self) -> usize {
        self.runs.iter().filter(|r| r.line_break).count()
    }

    /// Source text with explicit breaks rendered as `\n`.
    pub fn source_text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            out.push_str(&run.text);
            if run.line_break {
                out.push('\n');
            }
        }
        out
    }

    /// Check if the block has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content, without line-break characters
    pub text: String,

    /// Run styling
    pub style: TextStyle,

    /// The source inserted a line break after this run
    #[serde(default)]
    pub line_break: bool,
}

impl TextRun {
    /// Create a plain run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            line_break: false,
        }
    }

    /// Set the style.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Mark a line break after this run.
    pub fn with_break(mut self) -> Self {
        self.line_break = true;
        self
    }
}

/// Character and paragraph styling of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Paragraph style of the line this run belongs to
    pub paragraph: ParagraphKind,

    /// Font size in device units
    pub size: f32,

    /// Font weight
    pub weight: FontWeight,

    /// Italic text
    pub italic: bool,
}

impl TextStyle {
    /// Default style for a paragraph kind.
    pub fn for_paragraph(paragraph: ParagraphKind) -> Self {
        let weight = match paragraph {
            ParagraphKind::Heading | ParagraphKind::Bold => FontWeight::Bold,
            _ => FontWeight::Normal,
        };
        Self {
            paragraph,
            size: paragraph.default_size(),
            weight,
            italic: false,
        }
    }

    /// Plain body text.
    pub fn plain() -> Self {
        Self::for_paragraph(ParagraphKind::Plain)
    }

    /// Heading text.
    pub fn heading() -> Self {
        Self::for_paragraph(ParagraphKind::Heading)
    }

    /// Same style, bold.
    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    /// Same style, italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Same style at another size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Check if the weight is bold.
    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::plain()
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight
    #[default]
    Normal,
    /// Bold weight
    Bold,
}

/// Device paragraph style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphKind {
    /// Body text
    #[default]
    Plain,
    /// Large heading
    Heading,
    /// Bold body text
    Bold,
    /// First-level bullet
    Bullet,
    /// Second-level bullet
    Bullet2,
    /// Unchecked checkbox item
    Checkbox,
    /// Checked checkbox item
    CheckboxChecked,
}

impl ParagraphKind {
    /// Map a device paragraph style id.
    pub fn from_device_id(id: u32) -> Option<Self> {
        match id {
            0 | 1 => Some(ParagraphKind::Plain),
            2 => Some(ParagraphKind::Heading),
            3 => Some(ParagraphKind::Bold),
            4 => Some(ParagraphKind::Bullet),
            5 => Some(ParagraphKind::Bullet2),
            6 => Some(ParagraphKind::Checkbox),
            7 => Some(ParagraphKind::CheckboxChecked),
            _ => None,
        }
    }

    /// Device paragraph style id.
    pub fn device_id(self) -> u32 {
        match self {
            ParagraphKind::Plain => 1,
            ParagraphKind::Heading => 2,
            ParagraphKind::Bold => 3,
            ParagraphKind::Bullet => 4,
            ParagraphKind::Bullet2 => 5,
            ParagraphKind::Checkbox => 6,
            ParagraphKind::CheckboxChecked => 7,
        }
    }

    /// Device line advance in device units.
    pub fn line_height(self) -> f32 {
        match self {
            ParagraphKind::Plain => 71.0,
            ParagraphKind::Bold => 70.0,
            ParagraphKind::Heading => 150.0,
            ParagraphKind::Bullet
            | ParagraphKind::Bullet2
            | ParagraphKind::Checkbox
            | ParagraphKind::CheckboxChecked => 35.0,
        }
    }

    /// Default font size in device units.
    pub fn default_size(self) -> f32 {
        match self {
            ParagraphKind::Heading => 44.0,
            _ => 30.0,
        }
    }

    /// Marker drawn before the first line of the paragraph.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            ParagraphKind::Bullet => Some("\u{2022} "),
            ParagraphKind::Bullet2 => Some("\u{25e6} "),
            ParagraphKind::Checkbox => Some("\u{2610} "),
            ParagraphKind::CheckboxChecked => Some("\u{2611} "),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_text_with_breaks() {
        let mut block = TextBlock::new(0.0, 0.0, 500.0);
        block.add_text("Hello", TextStyle::plain());
        block.add_line_break();
        block.add_text("World", TextStyle::plain().bold());

        assert_eq!(block.source_text(), "Hello\nWorld");
        assert_eq!(block.break_count(), 1);
        assert!(!block.is_blank());
    }

    #[test]
    fn test_add_line_break_twice_adds_empty_run() {
        let mut block = TextBlock::new(0.0, 0.0, 500.0);
        block.add_text("A", TextStyle::plain());
        block.add_line_break();
        block.add_line_break();
        assert_eq!(block.runs.len(), 2);
        assert_eq!(block.source_text(), "A\n\n");
    }

    #[test]
    fn test_paragraph_kind_defaults() {
        let heading = TextStyle::heading();
        assert!(heading.is_bold());
        assert_eq!(heading.size, 44.0);
        assert_eq!(ParagraphKind::from_device_id(0), Some(ParagraphKind::Plain));
        assert_eq!(ParagraphKind::from_device_id(9), None);
        assert_eq!(ParagraphKind::Bullet.marker(), Some("\u{2022} "));
        assert_eq!(ParagraphKind::Plain.marker(), None);
    }
}
