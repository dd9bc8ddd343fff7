//! Non-fatal conversion diagnostics.

use serde::Serialize;
use std::fmt;

/// Kind of a non-fatal condition met during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A stroke with an unrecognized pen type was skipped
    UnsupportedPenType,
    /// An element of an unrecognized content type was skipped
    UnsupportedElement,
    /// Text did not fit on the page and was truncated
    LayoutOverflow,
    /// The target format could not represent an element exactly and a
    /// degraded form was written instead
    EmitFailure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnsupportedPenType => "unsupported pen type",
            DiagnosticKind::UnsupportedElement => "unsupported element",
            DiagnosticKind::LayoutOverflow => "layout overflow",
            DiagnosticKind::EmitFailure => "emit failure",
        };
        f.write_str(name)
    }
}

/// Where a diagnostic was raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Page number (1-indexed)
    pub page: Option<u32>,

    /// Layer index on the page (0 = bottom)
    pub layer: Option<usize>,

    /// Element index within the layer
    pub element: Option<usize>,
}

impl Location {
    /// Location of a whole page.
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    /// Location of one element.
    pub fn element(page: u32, layer: usize, element: usize) -> Self {
        Self {
            page: Some(page),
            layer: Some(layer),
            element: Some(element),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(page) = self.page {
            parts.push(format!("page {}", page));
        }
        if let Some(layer) = self.layer {
            parts.push(format!("layer {}", layer));
        }
        if let Some(element) = self.element {
            parts.push(format!("element {}", element));
        }
        if parts.is_empty() {
            f.write_str("document")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// One recorded non-fatal condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Where in the document it happened
    pub location: Location,
    /// Human-readable detail
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.location, self.message)
    }
}

/// Diagnostics collected during one conversion, in the order raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, kind: DiagnosticKind, location: Location, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            location,
            message: message.into(),
        };
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Append all diagnostics from another list.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Check if any diagnostic of `kind` was recorded.
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.of_kind(kind).next().is_some()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
