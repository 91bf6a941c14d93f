//! ULID-based identifier generation with prefixes.
//!
//! Identifiers in palimpsest follow the pattern: `prefix_ulid`
//! For example: `snp_01hqxyz...` for snapshots.

use ulid::Ulid;

/// Known identifier prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Snapshot,
    Label,
}

impl IdPrefix {
    /// Get the string prefix for this identifier type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Snapshot => "snp",
            IdPrefix::Label => "lbl",
        }
    }

    /// Parse a prefix from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "snp" => Some(IdPrefix::Snapshot),
            "lbl" => Some(IdPrefix::Label),
            _ => None,
        }
    }
}

/// Identifier generation and parsing utilities.
pub struct Identifier;

impl Identifier {
    /// Generate a new ascending identifier (newer = larger).
    ///
    /// ULIDs embed a millisecond timestamp, so identifiers created later
    /// compare greater. The ledger still orders by its own timestamp field;
    /// the id is only required to be unique.
    pub fn ascending(prefix: IdPrefix) -> String {
        let ulid = Ulid::new();
        format!("{}_{}", prefix.as_str(), ulid.to_string().to_lowercase())
    }

    /// Generate an identifier with a specific ULID (for testing or imports).
    pub fn with_ulid(prefix: IdPrefix, ulid: Ulid) -> String {
        format!("{}_{}", prefix.as_str(), ulid.to_string().to_lowercase())
    }

    /// Parse an identifier into its prefix and ULID parts.
    pub fn parse(id: &str) -> Option<(IdPrefix, Ulid)> {
        let (prefix, rest) = id.split_once('_')?;
        let prefix = IdPrefix::parse(prefix)?;
        let ulid = Ulid::from_string(rest).ok()?;
        Some((prefix, ulid))
    }

    /// Check if an identifier has the expected prefix.
    pub fn has_prefix(id: &str, prefix: IdPrefix) -> bool {
        id.starts_with(prefix.as_str()) && id.chars().nth(prefix.as_str().len()) == Some('_')
    }

    /// Generate a snapshot ID.
    pub fn snapshot() -> String {
        Self::ascending(IdPrefix::Snapshot)
    }

    /// Generate a label-marker ID.
    pub fn label() -> String {
        Self::ascending(IdPrefix::Label)
    }
}
