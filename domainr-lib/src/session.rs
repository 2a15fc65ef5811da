//! Saved search sessions.
//!
//! A session holds the search inputs, the domains found and the toggles
//! that were active, as pretty-printed JSON:
//!
//! ```json
//! {
//!     "Parts1": ["super", "mega"],
//!     "Parts2": ["yachts"],
//!     "Tlds": ["com"],
//!     "Domains": ["megayachts.com"],
//!     "Settings": {
//!         "TLDSubstitutions": false
//!     }
//! }
//! ```

use crate::error::DomainrError;
use crate::types::SearchRequest;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Settings key for the TLD substitution toggle.
pub const TLD_SUBSTITUTIONS: &str = "TLDSubstitutions";

/// Everything needed to restore a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "Parts1", default, deserialize_with = "null_as_empty")]
    pub parts1: Vec<String>,

    #[serde(rename = "Parts2", default, deserialize_with = "null_as_empty")]
    pub parts2: Vec<String>,

    #[serde(rename = "Tlds", default, deserialize_with = "null_as_empty")]
    pub tlds: Vec<String>,

    /// Available domains found by the last search
    #[serde(rename = "Domains", default, deserialize_with = "null_as_empty")]
    pub domains: Vec<String>,

    #[serde(
        rename = "Settings",
        default = "default_settings",
        deserialize_with = "null_as_default_settings"
    )]
    pub settings: BTreeMap<String, bool>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            parts1: Vec::new(),
            parts2: Vec::new(),
            tlds: Vec::new(),
            domains: Vec::new(),
            settings: default_settings(),
        }
    }
}

impl Session {
    /// Capture a request and its results.
    pub fn from_request(request: &SearchRequest, domains: Vec<String>) -> Self {
        let mut session = Self {
            parts1: request.first_parts.clone(),
            parts2: request.second_parts.clone(),
            tlds: request.tlds.clone(),
            domains,
            ..Self::default()
        };
        session.set_tld_substitution(request.tld_substitution);
        session
    }

    /// Rebuild the search request this session describes.
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest::new(self.parts1.clone(), self.parts2.clone(), self.tlds.clone())
            .with_tld_substitution(self.tld_substitution())
    }

    pub fn tld_substitution(&self) -> bool {
        self.settings.get(TLD_SUBSTITUTIONS).copied().unwrap_or(false)
    }

    pub fn set_tld_substitution(&mut self, enabled: bool) {
        self.settings.insert(TLD_SUBSTITUTIONS.to_string(), enabled);
    }

    /// Write the session as JSON indented by four spaces.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DomainrError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let mut json = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
        self.serialize(&mut serializer)
            .map_err(|_| DomainrError::session(&display, "Error generating output"))?;

        std::fs::write(path, json)
            .map_err(|_| DomainrError::session(&display, "Couldn't write to file"))
    }

    /// Read a session file.
    ///
    /// A missing file and malformed JSON are both reported as
    /// [`DomainrError::Session`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DomainrError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let data = std::fs::read(path).map_err(|_| DomainrError::session(&display, "Couldn't read"))?;

        serde_json::from_slice(&data)
            .map_err(|_| DomainrError::session(&display, "Couldn't parse file"))
    }
}

fn default_settings() -> BTreeMap<String, bool> {
    BTreeMap::from([(TLD_SUBSTITUTIONS.to_string(), false)])
}

/// Treat `null` like an absent list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Treat `null` like absent settings.
fn null_as_default_settings<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BTreeMap<String, bool>>::deserialize(deserializer)
        .map(|settings| settings.unwrap_or_else(default_settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populated() -> Session {
        let mut session = Session {
            parts1: vec!["super".into(), "mega".into(), "ultra".into()],
            parts2: vec!["yachts".into(), "boats".into()],
            tlds: vec!["io".into(), "com".into()],
            domains: vec!["megaboats.io".into(), "superyachts.com".into()],
            ..Session::default()
        };
        session.set_tld_substitution(true);
        session
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let session = populated();
        session.save(&path).unwrap();
        assert_eq!(Session::load(&path).unwrap(), session);
    }

    #[test]
    fn test_saved_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        Session::default().save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("{\n    \"Parts1\": []"));
        assert!(text.contains("\n    \"Settings\": {\n        \"TLDSubstitutions\": false\n    }"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Session::load("/nonexistent/session.json").unwrap_err();
        assert_eq!(err.to_string(), "Couldn't read: /nonexistent/session.json");
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"Parts1\": [").unwrap();

        let err = Session::load(&path).unwrap_err();
        assert!(matches!(err, DomainrError::Session { .. }));
        assert!(err.to_string().starts_with("Couldn't parse file: "));
    }

    #[test]
    fn test_null_and_missing_fields() {
        let session: Session =
            serde_json::from_str(r#"{"Parts1":["a"],"Parts2":null,"Tlds":["com"],"Domains":null}"#)
                .unwrap();

        assert_eq!(session.parts1, vec!["a".to_string()]);
        assert!(session.parts2.is_empty());
        assert!(session.domains.is_empty());
        assert!(!session.tld_substitution());
    }

    #[test]
    fn test_null_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"Parts1":["a"],"Tlds":["com"],"Settings":null}"#).unwrap();

        let session = Session::load(&path).unwrap();
        assert_eq!(session.settings, default_settings());
        assert!(!session.tld_substitution());
    }

    #[test]
    fn test_request_conversion() {
        let session = populated();
        let request = session.to_request();

        assert_eq!(request.first_parts, session.parts1);
        assert_eq!(request.second_parts, session.parts2);
        assert_eq!(request.tlds, session.tlds);
        assert!(request.tld_substitution);

        let back = Session::from_request(&request, session.domains.clone());
        assert_eq!(back, session);
    }
}
