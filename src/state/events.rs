//! State events emitted by the registry controller

use crate::data::application::{Application, ApplicationId};
use crate::state::edit_surface::{EditMode, ValidationReport};

/// Something that changed in controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// Initial load finished
    Loaded { count: usize },

    /// Initial load failed; the controller is now errored for good
    LoadFailed { message: String },

    /// Edit surface opened on a fresh draft
    EditOpened { mode: EditMode },

    /// Field edit applied to the draft
    DraftChanged,

    /// Commit rejected; the surface stays open
    ValidationFailed { report: ValidationReport },

    /// Edit surface closed without a commit
    EditCancelled,

    Created { application: Application },

    Updated { application: Application },

    /// Records dropped by a single or bulk delete
    Removed { ids: Vec<ApplicationId> },

    SelectionChanged { count: usize },

    FilterChanged { query: String },

    ConfirmationOpened { dialog: ConfirmDialog },

    ConfirmationClosed { dialog: ConfirmDialog },
}

/// The two destructive-action confirmation dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDialog {
    DeleteOne,
    DeleteSelected,
}
