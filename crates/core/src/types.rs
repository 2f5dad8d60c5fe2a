/// Inference record identifiers are UUID v4 strings stored as TEXT.
pub type InferenceId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh inference record identifier.
pub fn new_inference_id() -> InferenceId {
    uuid::Uuid::new_v4().to_string()
}

/// Returns `true` if `id` is a syntactically valid inference identifier.
pub fn is_valid_inference_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}
