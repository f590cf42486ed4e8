//! Positioned text tokens.

use serde::{Deserialize, Serialize};

/// A single whitespace-delimited token extracted from a PDF page.
///
/// Coordinates use a top-left origin: `x0` grows rightward from the left
/// page edge and `top` grows downward from the top page edge, both in PDF
/// points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Text content of the token
    pub text: String,
    /// Left edge of the token's bounding box
    pub x0: f32,
    /// Distance from the top of the page to the token's top edge
    pub top: f32,
}

impl Word {
    /// Create a new word.
    pub fn new(text: impl Into<String>, x0: f32, top: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            top,
        }
    }
}
