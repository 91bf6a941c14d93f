//! Snapshot data structures.

use chrono::{DateTime, Utc};
use palimpsest_util::id::Identifier;
use serde::{Deserialize, Serialize};

/// Unique identifier for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub String);

impl SnapshotId {
    /// Create a new random snapshot ID.
    pub fn new() -> Self {
        Self(Identifier::snapshot())
    }

    /// Create a new random label-marker ID.
    pub fn new_label() -> Self {
        Self(Identifier::label())
    }

    /// Create a snapshot ID from a string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The event that produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotEvent {
    /// The file was saved.
    Save,
    /// The file was renamed (snapshot recorded under the new path).
    Rename,
    /// Reserved; no code path currently records deletions.
    Delete,
    /// Explicitly requested by the user (includes the initial baseline).
    Manual,
    /// A scope-wide timeline marker carrying no content.
    Label,
}

/// One recorded revision of a file, or a scope-wide label marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unique identifier, assigned at creation, immutable.
    pub id: SnapshotId,

    /// Creation instant; the sole ordering key (descending = newest first).
    pub timestamp: DateTime<Utc>,

    /// Path of the owning file relative to its storage scope root.
    /// Empty for scope-wide label markers.
    pub scope_path: String,

    /// What produced this snapshot.
    pub event: SnapshotEvent,

    /// Name of the immutable content blob under the scope root.
    /// Absent only for label markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_ref: Option<String>,

    /// Optional free-text annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Snapshot {
    /// Create a new content snapshot for a scope-relative path.
    ///
    /// The `content_ref` equals the id, since blobs are named by snapshot id.
    pub fn new(scope_path: impl Into<String>, event: SnapshotEvent) -> Self {
        let id = SnapshotId::new();
        let content_ref = Some(id.as_str().to_string());
        Self {
            id,
            timestamp: Utc::now(),
            scope_path: scope_path.into(),
            event,
            content_ref,
            label: None,
            description: None,
        }
    }

    /// Create a scope-wide label marker (no content, empty scope path).
    pub fn label_marker(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: SnapshotId::new_label(),
            timestamp: Utc::now(),
            scope_path: String::new(),
            event: SnapshotEvent::Label,
            content_ref: None,
            label: Some(name.into()),
            description,
        }
    }

    /// Attach a label to this snapshot.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a description to this snapshot.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this is a scope-wide label marker.
    pub fn is_label(&self) -> bool {
        self.event == SnapshotEvent::Label
    }

    /// Whether this snapshot references a content blob.
    pub fn has_content(&self) -> bool {
        self.content_ref.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snapshot_references_own_blob() {
        let snapshot = Snapshot::new("src/main.rs", SnapshotEvent::Save);
        assert_eq!(snapshot.content_ref.as_deref(), Some(snapshot.id.as_str()));
        assert!(snapshot.has_content());
        assert!(!snapshot.is_label());
    }

    #[test]
    fn test_label_marker_has_no_content() {
        let marker = Snapshot::label_marker("v1.0", Some("first release".to_string()));
        assert!(marker.is_label());
        assert!(!marker.has_content());
        assert!(marker.scope_path.is_empty());
        assert_eq!(marker.label.as_deref(), Some("v1.0"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let snapshot = Snapshot::new("notes.md", SnapshotEvent::Manual).with_label("baseline");
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, snapshot.id);
        assert_eq!(back.scope_path, "notes.md");
        assert_eq!(back.event, SnapshotEvent::Manual);
        assert_eq!(back.label.as_deref(), Some("baseline"));
        assert!(back.description.is_none());
    }

    #[test]
    fn test_event_serializes_lowercase() {
        let json = serde_json::to_string(&SnapshotEvent::Rename).unwrap();
        assert_eq!(json, "\"rename\"");
    }
}
