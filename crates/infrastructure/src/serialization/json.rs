//! JSON serialization helpers for deterministic output.

use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl SerializationError {
    /// Returns true if the error is a missing file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
/// - Struct fields in declaration order, map keys in insertion order
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Serializes a value to deterministic JSON bytes.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let json = to_json_stable(value)?;
    Ok(json.into_bytes())
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

/// Reads and deserializes a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, SerializationError> {
    let bytes = fs::read(path).await?;
    from_json_bytes(&bytes)
}

/// Writes a value as deterministic JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), SerializationError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, to_json_stable_bytes(value)?).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use officiant_domain::form::{FieldDefinition, FieldType, Form, FormSection};
    use pretty_assertions::assert_eq;

    fn form() -> Form {
        Form::new("Wedding Booking").with_section(
            FormSection::new("Couple")
                .with_field(FieldDefinition::new("name", "Full Name", FieldType::Text).required()),
        )
    }

    #[test]
    fn test_stable_serialization_format() {
        let json = to_json_stable(&form()).expect("serialization should work");
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\n  \"name\": \"Wedding Booking\""));
        assert!(json.contains("\"isDefaultBookingForm\": false"));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let form = form();
        let first = to_json_stable(&form).expect("serialization should work");
        let second = to_json_stable(&form).expect("serialization should work");
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_json_accepts_minified() {
        let json = r#"{"id":"f1","name":"Booking","sections":[{"id":"s1","fields":[{"id":"venue","label":"Venue","type":"dropdown"}]}]}"#;
        let form: Form = from_json(json).expect("deserialization should work");
        assert_eq!(form.field("venue").map(|f| f.field_type.clone()), Some(FieldType::Select));
        assert!(!form.is_default_booking_form);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let result: Result<Form, _> = from_json_bytes(br#"{"id": }"#);
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }

    #[tokio::test]
    async fn test_file_roundtrip_creates_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("form.json");
        let form = form();

        write_json_file(&path, &form).await.expect("write should work");
        let restored: Form = read_json_file(&path).await.expect("read should work");
        assert_eq!(restored, form);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_json_file::<Form>(&dir.path().join("missing.json"))
            .await
            .expect_err("missing file");
        assert!(err.is_not_found());
    }
}
