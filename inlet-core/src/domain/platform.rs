//! Source platform enumeration

use serde::{Deserialize, Serialize};

/// Third-party export format a session was imported from
///
/// Serialized as a lower-case string tag. `Unknown` is a valid member for
/// exports whose origin the caller cannot name, not an error marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Cointracking,
    Waltio,
    Blockpit,
    Unknown,
}

impl Platform {
    pub const ALL: &'static [Platform] = &[
        Platform::Cointracking,
        Platform::Waltio,
        Platform::Blockpit,
        Platform::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Cointracking => "cointracking",
            Platform::Waltio => "waltio",
            Platform::Blockpit => "blockpit",
            Platform::Unknown => "unknown",
        }
    }

    /// Parse a stored tag. Total: unrecognized tags map to `Unknown`.
    pub fn from_tag(tag: &str) -> Platform {
        match tag.to_lowercase().as_str() {
            "cointracking" => Platform::Cointracking,
            "waltio" => Platform::Waltio,
            "blockpit" => Platform::Blockpit,
            _ => Platform::Unknown,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_tag(platform.as_str()), *platform);
        }
    }

    #[test]
    fn test_unrecognized_tag_is_unknown() {
        assert_eq!(Platform::from_tag("koinly"), Platform::Unknown);
        assert_eq!(Platform::from_tag(""), Platform::Unknown);
    }

    #[test]
    fn test_serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Platform::Cointracking).unwrap();
        assert_eq!(json, "\"cointracking\"");
    }
}
