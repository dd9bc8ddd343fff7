//! Scene Model: the canonical in-memory ink document.
//!
//! This module defines the format-agnostic tree that sits between the
//! decoded device scene and every output format. Coordinates stored here
//! are final device-space coordinates (origin top-left, y down); no
//! transform is left to resolve once a value enters the model.

mod document;
mod page;
mod stroke;
mod text;

pub use document::{Document, ElementCounts, Metadata};
pub use page::{Element, Layer, Page, UnknownElement, UnknownReason};
pub use stroke::{Color, PenKind, Point, Stroke};
pub use text::{FontWeight, ParagraphKind, TextBlock, TextRun, TextStyle};

pub(crate) use page::{DEVICE_HEIGHT, DEVICE_WIDTH};
