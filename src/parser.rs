use crate::error::ValidationError;
use crate::ir::Document;

/// Decode a JSON document of the form
/// `{"text": "...", "annotations": [{"start": 0, "end": 3, "label": "X"}]}`.
pub fn parse_document(input: &str) -> Result<Document, ValidationError> {
    let document: Document =
        serde_json::from_str(input).map_err(|err| ValidationError::Malformed(err.to_string()))?;
    tracing::debug!(
        chars = document.text.chars().count(),
        annotations = document.annotations.len(),
        "parsed document"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_and_annotations() {
        let doc = parse_document(
            r#"{"text": "Jane", "annotations": [{"start": 0, "end": 4, "label": "PERSON"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.text, "Jane");
        assert_eq!(doc.annotations.len(), 1);
        assert_eq!(doc.annotations[0].label, "PERSON");
    }

    #[test]
    fn missing_annotations_is_malformed() {
        let err = parse_document(r#"{"text": "plain"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(msg) if msg.contains("annotations")));
    }

    #[test]
    fn missing_text_is_malformed() {
        let err = parse_document(r#"{"annotations": []}"#).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(msg) if msg.contains("text")));
    }

    #[test]
    fn missing_label_is_malformed() {
        let err = parse_document(r#"{"text": "a", "annotations": [{"start": 0, "end": 1}]}"#)
            .unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn negative_offsets_survive_decoding() {
        let doc = parse_document(
            r#"{"text": "a", "annotations": [{"start": -1, "end": 1, "label": "X"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.annotations[0].start, -1);
    }
}
