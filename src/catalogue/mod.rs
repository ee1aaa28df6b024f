//! Catalogue: the projects and certificates the scene is built from.
//!
//! Loaded from JSON with local defence against shape problems:
//! - absent or non-array collections are empty
//! - malformed records and records without a title are skipped (logged)
//! - duplicate titles keep the first record
//!
//! Only I/O and JSON syntax failures surface as `CatalogueError`.

pub mod classify;

pub use classify::{classify, classify_parts, CategoryFilter, Classification};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Environment variable naming a catalogue JSON file.
pub const CATALOGUE_ENV: &str = "PORTFOLIO_CATALOGUE";

const BUILTIN_JSON: &str = include_str!("../../assets/catalogue.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalogue root must be a JSON object")]
    NotAnObject,
}

/// Index of a project in the mounted catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(pub usize);

/// Index of a certificate in the mounted catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CertificateId(pub usize);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub demo: Option<String>,
    pub source: Option<String>,
    pub download: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    pub preview: Option<String>,
    pub logo: Option<String>,
}

/// One entry of a project's release history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseVersion {
    pub version: String,
    pub date: String,
    pub description: String,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collaborator {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectGroup {
    Commissioned,
    School,
    Personal,
    Collaboration,
}

impl ProjectGroup {
    /// Concatenation order of the groups in the flat project list.
    pub const ALL: [ProjectGroup; 4] =
        [Self::Commissioned, Self::School, Self::Personal, Self::Collaboration];

    pub fn key(self) -> &'static str {
        match self {
            Self::Commissioned => "commissioned",
            Self::School => "school",
            Self::Personal => "personal",
            Self::Collaboration => "collaboration",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Commissioned => "Commissioned",
            Self::School => "School",
            Self::Personal => "Personal",
            Self::Collaboration => "Collaboration",
        }
    }
}

/// A project record.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueEntry {
    pub title: String,
    pub description: String,
    pub tool_tags: Vec<String>,
    pub links: Links,
    pub media: Media,
    pub group: ProjectGroup,
    pub versions: Vec<ReleaseVersion>,
    pub collaborators: Vec<Collaborator>,
}

impl CatalogueEntry {
    pub fn new(title: impl Into<String>, tool_tags: &[&str]) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            tool_tags: tool_tags.iter().map(|t| t.to_string()).collect(),
            links: Links::default(),
            media: Media::default(),
            group: ProjectGroup::Personal,
            versions: Vec::new(),
            collaborators: Vec::new(),
        }
    }

    pub fn classification(&self) -> Classification {
        classify(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certificate {
    pub title: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl Certificate {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProject {
    title: Option<String>,
    description: String,
    tags: Option<Vec<String>>,
    links: Links,
    media: Media,
    versions: Vec<ReleaseVersion>,
    collaborators: Vec<Collaborator>,
}

/// The full, immutable catalogue of a session.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub projects: Vec<CatalogueEntry>,
    pub certificates: Vec<Certificate>,
}

impl Catalogue {
    pub fn new(projects: Vec<CatalogueEntry>, certificates: Vec<Certificate>) -> Self {
        Self { projects, certificates }
    }

    /// The catalogue compiled into the binary.
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_JSON) {
            Ok(c) => c,
            Err(e) => {
                log::error!("embedded catalogue is invalid: {}", e);
                Self::default()
            }
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let catalogue = Self::from_json(&text)?;
        log::info!(
            "catalogue loaded from {}: {} projects, {} certificates",
            path.as_ref().display(),
            catalogue.projects.len(),
            catalogue.certificates.len()
        );
        Ok(catalogue)
    }

    /// Catalogue from `PORTFOLIO_CATALOGUE` if set, otherwise the embedded one.
    pub fn from_env() -> Result<Self, CatalogueError> {
        match std::env::var_os(CATALOGUE_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogueError> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(map) = root else {
            return Err(CatalogueError::NotAnObject);
        };

        let mut projects = Vec::new();
        let mut seen = HashSet::new();
        for group in ProjectGroup::ALL {
            for (i, item) in records(map.get(group.key()), group.key()) {
                let raw: RawProject = match serde_json::from_value(item.clone()) {
                    Ok(r) => r,
                    Err(e) => {
                        log::warn!("skipping malformed {} project #{}: {}", group.key(), i, e);
                        continue;
                    }
                };
                let Some(title) = raw.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
                else {
                    log::warn!("skipping untitled {} project #{}", group.key(), i);
                    continue;
                };
                if !seen.insert(title.clone()) {
                    log::warn!("skipping duplicate project title {:?}", title);
                    continue;
                }
                let tool_tags = match raw.tags {
                    Some(tags) => tags,
                    None => raw.versions.first().map(|v| v.tools.clone()).unwrap_or_default(),
                };
                projects.push(CatalogueEntry {
                    title,
                    description: raw.description,
                    tool_tags,
                    links: raw.links,
                    media: raw.media,
                    group,
                    versions: raw.versions,
                    collaborators: raw.collaborators,
                });
            }
        }

        let mut certificates = Vec::new();
        let mut seen = HashSet::new();
        for (i, item) in records(map.get("certificates"), "certificates") {
            let mut cert: Certificate = match serde_json::from_value(item.clone()) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("skipping malformed certificate #{}: {}", i, e);
                    continue;
                }
            };
            cert.title = cert.title.trim().to_string();
            if cert.title.is_empty() {
                log::warn!("skipping untitled certificate #{}", i);
                continue;
            }
            if !seen.insert(cert.title.clone()) {
                log::warn!("skipping duplicate certificate title {:?}", cert.title);
                continue;
            }
            certificates.push(cert);
        }

        Ok(Self { projects, certificates })
    }

    #[inline]
    pub fn project(&self, id: ProjectId) -> Option<&CatalogueEntry> {
        self.projects.get(id.0)
    }

    #[inline]
    pub fn certificate(&self, id: CertificateId) -> Option<&Certificate> {
        self.certificates.get(id.0)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.certificates.is_empty()
    }

    /// Total number of catalogue entries (projects + certificates).
    pub fn len(&self) -> usize {
        self.projects.len() + self.certificates.len()
    }
}

/// Array items of a collection; anything that is not an array is empty.
fn records<'a>(value: Option<&'a Value>, key: &str) -> impl Iterator<Item = (usize, &'a Value)> {
    let items: &[Value] = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => &[],
        Some(_) => {
            log::warn!("catalogue collection {:?} is not an array; treating as empty", key);
            &[]
        }
    };
    items.iter().enumerate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue() {
        let c = Catalogue::builtin();
        assert_eq!(c.projects.len(), 9);
        assert_eq!(c.certificates.len(), 8);
        assert_eq!(c.projects[0].group, ProjectGroup::Commissioned);
        assert_eq!(c.projects[8].group, ProjectGroup::Collaboration);
    }

    #[test]
    fn test_tags_fall_back_to_first_release() {
        let json = r#"{"personal": [{"title": "A", "versions": [{"tools": ["Kotlin"]}, {"tools": ["Java"]}]}]}"#;
        let c = Catalogue::from_json(json).unwrap();
        assert_eq!(c.projects[0].tool_tags, vec!["Kotlin".to_string()]);
        assert_eq!(c.projects[0].classification(), Classification::Android);
    }

    #[test]
    fn test_non_array_collections_are_empty() {
        let json = r#"{"school": {"title": "oops"}, "certificates": 42}"#;
        let c = Catalogue::from_json(json).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn test_malformed_and_untitled_records_skipped() {
        let json = r#"{
            "personal": [
                {"title": "Good", "tags": ["Rust"]},
                {"title": 7},
                {"description": "no title"},
                {"title": "   "},
                {"title": "Good"}
            ],
            "certificates": [{"title": "Cert", "issuer": "X"}, "junk", {}]
        }"#;
        let c = Catalogue::from_json(json).unwrap();
        assert_eq!(c.projects.len(), 1);
        assert_eq!(c.projects[0].title, "Good");
        assert_eq!(c.certificates.len(), 1);
        assert_eq!(c.certificates[0].issuer.as_deref(), Some("X"));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Catalogue::from_json("[1, 2]"), Err(CatalogueError::NotAnObject)));
        assert!(matches!(Catalogue::from_json("{"), Err(CatalogueError::Json(_))));
        assert!(matches!(
            Catalogue::load("/definitely/not/here.json"),
            Err(CatalogueError::Io(_))
        ));
    }

    #[test]
    fn test_lookup_by_id() {
        let c = Catalogue::new(vec![CatalogueEntry::new("P", &[])], vec![Certificate::new("C")]);
        assert_eq!(c.project(ProjectId(0)).map(|p| p.title.as_str()), Some("P"));
        assert!(c.project(ProjectId(1)).is_none());
        assert_eq!(c.certificate(CertificateId(0)).map(|p| p.title.as_str()), Some("C"));
        assert_eq!(c.len(), 2);
    }
}
