//! JSON rendering for extracted pages.

use crate::error::{Error, Result};
use crate::model::Page;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize extracted page records to JSON.
pub fn pages_to_json(pages: &[Page], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(pages),
        JsonFormat::Compact => serde_json::to_string(pages),
    };

    result.map_err(|e| Error::Other(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_to_json_pretty() {
        let pages = vec![Page::new(1, vec!["Hello".to_string()])];
        let json = pages_to_json(&pages, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"number\": 1"));
        assert!(json.contains("Hello"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_pages_to_json_compact() {
        let pages = vec![Page::empty(1), Page::empty(2)];
        let json = pages_to_json(&pages, JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"[{"number":1,"paragraphs":[]},{"number":2,"paragraphs":[]}]"#
        );
    }
}
