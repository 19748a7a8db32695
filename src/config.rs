use serde::{Deserialize, Serialize};

pub const BIND_ATTRIBUTE: &str = "data-wd-bind";
pub const TARGET_ATTRIBUTE: &str = "data-wd-target";
pub const VALUE_ATTRIBUTE: &str = "data-wd-attr";

/// Attribute naming for a scan.
///
/// The canonical names use the `data-` prefix. With `legacy_aliases` on, the
/// same name without the prefix (`wd-bind`, `wd-target`, `wd-attr`) is also
/// read; the canonical attribute wins when both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanOptions {
    pub bind_attribute: String,
    pub target_attribute: String,
    pub value_attribute: String,
    pub legacy_aliases: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            bind_attribute: BIND_ATTRIBUTE.to_string(),
            target_attribute: TARGET_ATTRIBUTE.to_string(),
            value_attribute: VALUE_ATTRIBUTE.to_string(),
            legacy_aliases: true,
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Names to read for the binding marker, canonical first.
    pub fn bind_names(&self) -> Vec<&str> {
        self.names_for(&self.bind_attribute)
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.names_for(&self.target_attribute)
    }

    pub fn value_names(&self) -> Vec<&str> {
        self.names_for(&self.value_attribute)
    }

    fn names_for<'a>(&self, canonical: &'a str) -> Vec<&'a str> {
        let mut names = vec![canonical];
        if self.legacy_aliases {
            if let Some(alias) = canonical.strip_prefix("data-") {
                names.push(alias);
            }
        }
        names
    }
}
