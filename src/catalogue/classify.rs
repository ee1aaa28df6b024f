//! Catalogue entry classification.
//!
//! A case-insensitive substring match over an entry's tool tags and title.
//! First rule wins:
//!   1. android indicators → Android
//!   2. web indicators     → Web
//!   3. any tags at all    → System
//!   4. no tags            → Default
//!
//! Total and deterministic; cheap enough to recompute on demand.

use super::CatalogueEntry;

const ANDROID_MARKERS: &[&str] = &["android", "kotlin"];
const WEB_MARKERS: &[&str] = &["react", "web", "next"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Android,
    Web,
    System,
    Default,
}

impl Classification {
    pub const ALL: [Classification; 4] = [Self::Android, Self::Web, Self::System, Self::Default];

    pub fn label(self) -> &'static str {
        match self {
            Self::Android => "Android App",
            Self::Web => "Web App",
            Self::System => "System",
            Self::Default => "Project",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(entry: &CatalogueEntry) -> Classification {
    classify_parts(&entry.tool_tags, &entry.title)
}

/// Classify from raw parts (tags + title).
pub fn classify_parts<S: AsRef<str>>(tags: &[S], title: &str) -> Classification {
    let mut haystack = String::with_capacity(title.len() + tags.len() * 8);
    for tag in tags {
        haystack.push_str(&tag.as_ref().to_lowercase());
        haystack.push(' ');
    }
    haystack.push_str(&title.to_lowercase());

    let has = |markers: &[&str]| markers.iter().any(|m| haystack.contains(m));
    if has(ANDROID_MARKERS) {
        Classification::Android
    } else if has(WEB_MARKERS) {
        Classification::Web
    } else if tags.iter().any(|t| !t.as_ref().trim().is_empty()) {
        Classification::System
    } else {
        Classification::Default
    }
}

/// Category filter applied by the toolbar. Non-matching entities are dimmed,
/// never hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Classification),
    Certificates,
}

impl CategoryFilter {
    pub fn matches_project(self, class: Classification) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => c == class,
            Self::Certificates => false,
        }
    }

    pub fn matches_certificate(self) -> bool {
        matches!(self, Self::All | Self::Certificates)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(c) => c.label(),
            Self::Certificates => "Certificates",
        }
    }
}
