use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Topic,
}

/// Text a quiz is generated from, resolved from an upload or a topic search.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceDocument {
    /// Content-addressed identity of the input (file name and bytes, or topic).
    pub id: String,
    /// File name or topic string.
    pub name: String,
    pub kind: SourceKind,
    pub text: String,
    pub resolved_at: DateTime<Utc>,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, name: &str, kind: SourceKind, text: String) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            kind,
            text,
            resolved_at: Utc::now(),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_text_has_no_content() {
        let doc = SourceDocument::new("id", "notes.txt", SourceKind::File, " \n\t".to_string());
        assert!(!doc.has_content());
    }

    #[test]
    fn char_count_counts_characters_not_bytes() {
        let doc = SourceDocument::new("id", "Tbilisi", SourceKind::Topic, "თბილისი".to_string());
        assert_eq!(doc.char_count(), 7);
        assert!(doc.has_content());
    }

    #[test]
    fn source_kind_serializes_lowercase() {
        let json = serde_json::to_string(&SourceKind::Topic).expect("kind should serialize");
        assert_eq!(json, "\"topic\"");
    }
}
