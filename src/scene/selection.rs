//! Selection controller: two independent axes (project, certificate).
//!
//! Transitions:
//!   select_project(id)     None → Some(id), Some(id) → None, Some(x) → Some(id)
//!   select_certificate(id) same rules on the certificate axis
//!   close_all()            both axes → None in one step
//!
//! Every transition reports whether the state changed.

use crate::catalogue::{CertificateId, ProjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub project: Option<ProjectId>,
    pub certificate: Option<CertificateId>,
}

impl SelectionState {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.project.is_none() && self.certificate.is_none()
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Toggle: selecting the selected project deselects it.
    pub fn select_project(&mut self, id: ProjectId) -> bool {
        let next = if self.state.project == Some(id) { None } else { Some(id) };
        self.state.project = next;
        log::debug!("project selection → {:?}", next);
        true
    }

    /// Toggle on the certificate axis; the project axis is untouched.
    pub fn select_certificate(&mut self, id: CertificateId) -> bool {
        let next = if self.state.certificate == Some(id) { None } else { Some(id) };
        self.state.certificate = next;
        log::debug!("certificate selection → {:?}", next);
        true
    }

    pub fn close_all(&mut self) -> bool {
        if self.state.is_empty() {
            return false;
        }
        self.state = SelectionState::default();
        log::debug!("selection cleared");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_project() {
        let mut s = SelectionController::new();
        assert!(s.select_project(ProjectId(2)));
        assert_eq!(s.state().project, Some(ProjectId(2)));
        assert!(s.select_project(ProjectId(2)));
        assert_eq!(s.state().project, None);
    }

    #[test]
    fn test_switch_project() {
        let mut s = SelectionController::new();
        s.select_project(ProjectId(1));
        s.select_project(ProjectId(3));
        assert_eq!(s.state().project, Some(ProjectId(3)));
    }

    #[test]
    fn test_axes_independent() {
        let mut s = SelectionController::new();
        s.select_project(ProjectId(0));
        s.select_certificate(CertificateId(4));
        assert_eq!(
            s.state(),
            SelectionState { project: Some(ProjectId(0)), certificate: Some(CertificateId(4)) }
        );
        s.select_certificate(CertificateId(4));
        assert_eq!(s.state().project, Some(ProjectId(0)));
        assert_eq!(s.state().certificate, None);
    }

    #[test]
    fn test_close_all() {
        let mut s = SelectionController::new();
        assert!(!s.close_all());
        s.select_project(ProjectId(0));
        s.select_certificate(CertificateId(1));
        assert!(s.close_all());
        assert!(s.state().is_empty());
        assert!(!s.close_all());
    }
}
