//! Modal presenter: selection state → detail cards.
//!
//! `present` is a pure function of the selection and the catalogue. Optional
//! fields that are missing are left out of the card; links that are not
//! absolute http(s) URLs are dropped with a warning.

use url::Url;

use crate::catalogue::{
    Catalogue, CertificateId, Classification, Collaborator, ProjectGroup, ProjectId,
    ReleaseVersion,
};
use crate::scene::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Demo,
    Source,
    Download,
    Credential,
    Profile,
}

impl LinkKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Demo => "Live Demo",
            Self::Source => "Source Code",
            Self::Download => "Download",
            Self::Credential => "View Credential",
            Self::Profile => "Profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLink {
    pub kind: LinkKind,
    pub url: String,
}

/// A validated collaborator entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorCard {
    pub name: String,
    pub profile: Option<OutboundLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub badge: Classification,
    pub group: ProjectGroup,
    pub tool_tags: Vec<String>,
    pub preview: Option<String>,
    pub logo: Option<String>,
    pub links: Vec<OutboundLink>,
    pub versions: Vec<ReleaseVersion>,
    pub collaborators: Vec<CollaboratorCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificateCard {
    pub id: CertificateId,
    pub title: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
    pub link: Option<OutboundLink>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalView {
    pub project: Option<ProjectCard>,
    pub certificate: Option<CertificateCard>,
}

impl ModalView {
    pub fn is_open(&self) -> bool {
        self.project.is_some() || self.certificate.is_some()
    }
}

/// Accept only absolute http(s) URLs with a host. Blank input is "missing".
pub fn validate_link(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match Url::parse(raw) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => {
            Some(raw.to_string())
        }
        Ok(u) => {
            log::warn!("dropping link with unsupported scheme {:?}: {}", u.scheme(), raw);
            None
        }
        Err(e) => {
            log::warn!("dropping invalid link {:?}: {}", raw, e);
            None
        }
    }
}

fn link(kind: LinkKind, raw: Option<&str>) -> Option<OutboundLink> {
    raw.and_then(validate_link).map(|url| OutboundLink { kind, url })
}

fn non_blank(s: Option<&String>) -> Option<String> {
    s.map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string)
}

pub fn present(state: &SelectionState, catalogue: &Catalogue) -> ModalView {
    let project = state.project.and_then(|id| {
        let entry = catalogue.project(id)?;
        let links = [
            link(LinkKind::Demo, entry.links.demo.as_deref()),
            link(LinkKind::Source, entry.links.source.as_deref()),
            link(LinkKind::Download, entry.links.download.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();
        let collaborators = entry
            .collaborators
            .iter()
            .filter(|c| !c.name.trim().is_empty())
            .map(|c: &Collaborator| CollaboratorCard {
                name: c.name.trim().to_string(),
                profile: link(LinkKind::Profile, c.url.as_deref()),
            })
            .collect();
        Some(ProjectCard {
            id,
            title: entry.title.clone(),
            description: entry.description.clone(),
            badge: entry.classification(),
            group: entry.group,
            tool_tags: entry.tool_tags.clone(),
            preview: non_blank(entry.media.preview.as_ref()),
            logo: non_blank(entry.media.logo.as_ref()),
            links,
            versions: entry.versions.clone(),
            collaborators,
        })
    });

    let certificate = state.certificate.and_then(|id| {
        let cert = catalogue.certificate(id)?;
        Some(CertificateCard {
            id,
            title: cert.title.clone(),
            issuer: non_blank(cert.issuer.as_ref()),
            date: non_blank(cert.date.as_ref()),
            image: non_blank(cert.image.as_ref()),
            link: link(LinkKind::Credential, cert.link.as_deref()),
        })
    });

    ModalView { project, certificate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{CatalogueEntry, Certificate, Links};

    fn catalogue() -> Catalogue {
        let mut p = CatalogueEntry::new("Shop", &["React"]);
        p.description = "A storefront".into();
        p.links = Links {
            demo: Some("https://shop.example.com".into()),
            source: Some("javascript:alert(1)".into()),
            download: Some("   ".into()),
        };
        p.collaborators = vec![Collaborator { name: "Ana".into(), url: Some("not a url".into()) }];
        let mut c = Certificate::new("SQL (Basic)");
        c.issuer = Some("HackerRank".into());
        c.link = Some("http://certs.example.org/1".into());
        Catalogue::new(vec![p], vec![c])
    }

    #[test]
    fn test_validate_link() {
        assert_eq!(validate_link(" https://a.example/x "), Some("https://a.example/x".into()));
        assert_eq!(validate_link("http://a.example"), Some("http://a.example".into()));
        assert!(validate_link("ftp://a.example").is_none());
        assert!(validate_link("mailto:me@example.com").is_none());
        assert!(validate_link("/img/local.webp").is_none());
        assert!(validate_link("").is_none());
    }

    #[test]
    fn test_nothing_selected_is_closed() {
        let view = present(&SelectionState::default(), &catalogue());
        assert!(!view.is_open());
    }

    #[test]
    fn test_project_card() {
        let state = SelectionState { project: Some(ProjectId(0)), certificate: None };
        let view = present(&state, &catalogue());
        let card = view.project.unwrap();
        assert_eq!(card.title, "Shop");
        assert_eq!(card.badge, Classification::Web);
        assert_eq!(card.links.len(), 1);
        assert_eq!(card.links[0].kind, LinkKind::Demo);
        assert!(card.preview.is_none());
        assert_eq!(card.collaborators[0].name, "Ana");
        assert!(card.collaborators[0].profile.is_none());
        assert!(view.certificate.is_none());
    }

    #[test]
    fn test_both_cards() {
        let state = SelectionState { project: Some(ProjectId(0)), certificate: Some(CertificateId(0)) };
        let view = present(&state, &catalogue());
        let cert = view.certificate.unwrap();
        assert_eq!(cert.issuer.as_deref(), Some("HackerRank"));
        assert!(cert.date.is_none());
        assert_eq!(cert.link.unwrap().kind, LinkKind::Credential);
        assert!(view.project.is_some());
    }

    #[test]
    fn test_stale_id_yields_no_card() {
        let state = SelectionState { project: Some(ProjectId(9)), certificate: None };
        assert!(!present(&state, &catalogue()).is_open());
    }
}
