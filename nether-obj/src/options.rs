//! Reader configuration

use serde::{Deserialize, Serialize};

use crate::DEFAULT_GROUP_NAME;

/// Options controlling how OBJ text is read.
///
/// Can be embedded in a TOML manifest:
///
/// ```toml
/// discard_degenerate_faces = true
/// default_group_name = "unnamed"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Silently skip faces that repeat a vertex index (default: false)
    #[serde(default)]
    pub discard_degenerate_faces: bool,

    /// Group name for faces outside any `g` group (default: "default group")
    #[serde(default = "default_group_name")]
    pub default_group_name: String,
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            discard_degenerate_faces: false,
            default_group_name: default_group_name(),
        }
    }
}

impl ReadOptions {
    /// Parse options from a TOML document; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReadOptions::default();
        assert!(!options.discard_degenerate_faces);
        assert_eq!(options.default_group_name, "default group");
    }

    #[test]
    fn test_from_toml() {
        let options = ReadOptions::from_toml_str("discard_degenerate_faces = true\n").unwrap();
        assert!(options.discard_degenerate_faces);
        assert_eq!(options.default_group_name, DEFAULT_GROUP_NAME);

        let options = ReadOptions::from_toml_str("").unwrap();
        assert_eq!(options, ReadOptions::default());

        let options = ReadOptions::from_toml_str("default_group_name = \"body\"").unwrap();
        assert_eq!(options.default_group_name, "body");
    }

    #[test]
    fn test_from_toml_wrong_type() {
        assert!(ReadOptions::from_toml_str("discard_degenerate_faces = 3").is_err());
    }
}
