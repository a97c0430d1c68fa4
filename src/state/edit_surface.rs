//! Draft editing and the modal surfaces around it

use crate::data::application::{Application, ApplicationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit,
}

/// Editable fields of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Type,
    Name,
    Path,
}

impl DraftField {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "type" | "idtype" => Some(DraftField::Type),
            "name" => Some(DraftField::Name),
            "path" => Some(DraftField::Path),
            _ => None,
        }
    }
}

/// Which required fields are missing from a submitted draft
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub name_missing: bool,
    pub type_missing: bool,
}

impl ValidationReport {
    pub fn for_application(app: &Application) -> Self {
        Self {
            name_missing: app.name.trim().is_empty(),
            type_missing: app.type_code.trim().is_empty(),
        }
    }

    /// Only a missing name blocks a save; a missing type is advisory
    pub fn blocks_commit(&self) -> bool {
        self.name_missing
    }

    pub fn messages(&self) -> Vec<&'static str> {
        let mut messages = Vec::new();
        if self.type_missing {
            messages.push("Tipo de Aplicación es requerido.");
        }
        if self.name_missing {
            messages.push("Nombre es requerido.");
        }
        messages
    }
}

/// Working copy of an application while the edit surface is open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub application: Application,
    /// Set once a commit has been attempted, so field errors are shown
    pub submitted: bool,
}

impl Draft {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_application(app: &Application) -> Self {
        Self {
            application: app.clone(),
            submitted: false,
        }
    }

    pub fn id(&self) -> Option<&ApplicationId> {
        self.application.id.as_ref()
    }

    pub fn set(&mut self, field: DraftField, value: &str) {
        let target = match field {
            DraftField::Type => &mut self.application.type_code,
            DraftField::Name => &mut self.application.name,
            DraftField::Path => &mut self.application.path,
        };
        *target = value.to_string();
    }

    pub fn validation(&self) -> ValidationReport {
        ValidationReport::for_application(&self.application)
    }

    /// Field errors to display inline; empty until a commit was attempted
    pub fn visible_errors(&self) -> ValidationReport {
        if self.submitted {
            self.validation()
        } else {
            ValidationReport::default()
        }
    }
}

/// Create/edit modal: closed, or open on exactly one draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSurface {
    #[default]
    Closed,
    Open { mode: EditMode, draft: Draft },
}

impl EditSurface {
    pub fn is_open(&self) -> bool {
        matches!(self, EditSurface::Open { .. })
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            EditSurface::Open { draft, .. } => Some(draft),
            EditSurface::Closed => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            EditSurface::Open { draft, .. } => Some(draft),
            EditSurface::Closed => None,
        }
    }

    pub fn mode(&self) -> Option<EditMode> {
        match self {
            EditSurface::Open { mode, .. } => Some(*mode),
            EditSurface::Closed => None,
        }
    }
}

/// State of one confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation<T> {
    Closed,
    Open(T),
}

impl<T> Default for Confirmation<T> {
    fn default() -> Self {
        Confirmation::Closed
    }
}

impl<T> Confirmation<T> {
    pub fn is_open(&self) -> bool {
        matches!(self, Confirmation::Open(_))
    }

    /// Close the dialog, handing back what it was gating
    pub fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, Confirmation::Closed) {
            Confirmation::Open(target) => Some(target),
            Confirmation::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_field_updates() {
        let mut draft = Draft::empty();
        draft.set(DraftField::Name, "Billing");
        draft.set(DraftField::Type, "1");
        draft.set(DraftField::Path, "/svc/billing");
        assert_eq!(draft.application, Application::new("1", "Billing", "/svc/billing"));
    }

    #[test]
    fn test_errors_hidden_until_submitted() {
        let mut draft = Draft::empty();
        assert_eq!(draft.visible_errors(), ValidationReport::default());
        draft.submitted = true;
        let errors = draft.visible_errors();
        assert!(errors.name_missing && errors.type_missing);
        assert_eq!(errors.messages().len(), 2);
    }

    #[test]
    fn test_blank_name_blocks_but_type_does_not() {
        let app = Application::new("", "Billing", "");
        assert!(!ValidationReport::for_application(&app).blocks_commit());
        let app = Application::new("1", "   ", "/x");
        assert!(ValidationReport::for_application(&app).blocks_commit());
    }

    #[test]
    fn test_confirmation_take() {
        let mut dialog = Confirmation::Open(3);
        assert!(dialog.is_open());
        assert_eq!(dialog.take(), Some(3));
        assert!(!dialog.is_open());
        assert_eq!(dialog.take(), None);
    }
}
