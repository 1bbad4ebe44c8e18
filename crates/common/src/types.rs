use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an aggregate instance.
///
/// Wraps a UUID to provide type safety and prevent mixing up
/// aggregate IDs with other UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateId(Uuid);

impl AggregateId {
    /// Creates a new random aggregate ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an aggregate ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AggregateId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AggregateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AggregateId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<AggregateId> for Uuid {
    fn from(id: AggregateId) -> Self {
        id.0
    }
}

/// Normalized code of an indicator (index, subindex, component or plain
/// indicator).
///
/// Codes are stored uppercased with spaces and hyphens replaced by
/// underscores, so that "Digital inclusion" and "DIGITAL_INCLUSION" name the
/// same indicator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorCode(String);

/// Code of the distinguished top-level index indicator.
pub const INDEX_CODE: &str = "INDEX";

impl IndicatorCode {
    /// Creates a normalized indicator code.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let mut code = raw
            .as_ref()
            .trim()
            .to_uppercase()
            .replace([' ', '-'], "_");
        while code.contains("__") {
            code = code.replace("__", "_");
        }
        Self(code)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the distinguished INDEX code.
    pub fn is_index(&self) -> bool {
        self.0 == INDEX_CODE
    }
}

impl std::fmt::Display for IndicatorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IndicatorCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for IndicatorCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for IndicatorCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_id_new_creates_unique_ids() {
        let id1 = AggregateId::new();
        let id2 = AggregateId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn aggregate_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = AggregateId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn aggregate_id_serialization_roundtrip() {
        let id = AggregateId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: AggregateId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn indicator_code_normalizes() {
        assert_eq!(IndicatorCode::new("digital inclusion").as_str(), "DIGITAL_INCLUSION");
        assert_eq!(IndicatorCode::new("Freedom-Openness").as_str(), "FREEDOM_OPENNESS");
        assert_eq!(IndicatorCode::new("  a  b ").as_str(), "A_B");
    }

    #[test]
    fn indicator_code_recognizes_index() {
        assert!(IndicatorCode::new("index").is_index());
        assert!(!IndicatorCode::new("ACCESS").is_index());
    }

    #[test]
    fn indicator_code_serializes_transparently() {
        let code = IndicatorCode::new("Web Index");
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"WEB_INDEX\"");
    }
}
