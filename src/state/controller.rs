//! The application registry controller.
//!
//! Owns the registry and every piece of state around it: the one-shot load,
//! the edit surface, the selection set, the global filter and the two
//! delete confirmations. Views read snapshots and subscribe to
//! [`RegistryEvent`]s; they never touch the registry directly.

use crate::api_client::DirectorySource;
use crate::data::application::{Application, ApplicationId};
use crate::data::identifier::{IdentifierSource, RandomIdentifiers};
use crate::data::registry::Registry;
use crate::data::table_view::{self, PageView, ViewOptions};
use crate::state::dispatcher::{RegistryDispatcher, RegistrySubscriber};
use crate::state::edit_surface::{
    Confirmation, Draft, DraftField, EditMode, EditSurface, ValidationReport,
};
use crate::state::events::{ConfirmDialog, RegistryEvent};
use crate::state::notifications::{
    Notification, NotificationCenter, DEFAULT_NOTIFICATION_LIFE,
};
use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Attempts at finding an unused identifier before giving up
pub const MAX_ID_ATTEMPTS: usize = 64;

pub const LOADING_PLACEHOLDER: &str = "Cargando...";

/// Lifecycle of the one-shot initial load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Errored(String),
}

impl LoadState {
    pub fn name(&self) -> &'static str {
        match self {
            LoadState::Loading => "loading",
            LoadState::Ready => "ready",
            LoadState::Errored(_) => "errored",
        }
    }

    /// What to show instead of the table, if anything
    pub fn placeholder(&self) -> Option<String> {
        match self {
            LoadState::Loading => Some(LOADING_PLACEHOLDER.to_string()),
            LoadState::Ready => None,
            LoadState::Errored(message) => Some(format!("Error: {}", message)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("applications are not available (state: {0})")]
    NotReady(&'static str),

    #[error("applications have already been loaded")]
    AlreadyLoaded,

    #[error("failed to load applications: {0}")]
    Load(String),

    #[error("validation failed: {}", .0.messages().join(" "))]
    Validation(ValidationReport),

    #[error("another application is already being edited")]
    EditSurfaceOpen,

    #[error("a confirmation is already open")]
    DialogOpen,

    #[error("no application is being edited")]
    NoDraft,

    #[error("unknown application: {0}")]
    UnknownApplication(ApplicationId),

    #[error("no applications selected")]
    EmptySelection,

    #[error("nothing is waiting for confirmation")]
    NoPendingConfirmation,

    #[error("no unused identifier found after {0} attempts")]
    IdentifierExhausted(usize),
}

/// Result of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Created(ApplicationId),
    Updated(ApplicationId),
}

impl CommitOutcome {
    pub fn id(&self) -> &ApplicationId {
        match self {
            CommitOutcome::Created(id) | CommitOutcome::Updated(id) => id,
        }
    }
}

pub struct RegistryController {
    load_state: LoadState,
    registry: Registry,
    edit: EditSurface,
    selection: BTreeSet<ApplicationId>,
    filter: String,
    delete_one: Confirmation<ApplicationId>,
    delete_selected: Confirmation<BTreeSet<ApplicationId>>,
    ids: Box<dyn IdentifierSource>,
    notifications: NotificationCenter,
    notification_life: Duration,
    dispatcher: RegistryDispatcher,
}

impl Default for RegistryController {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryController {
    pub fn new() -> Self {
        Self {
            load_state: LoadState::Loading,
            registry: Registry::new(),
            edit: EditSurface::Closed,
            selection: BTreeSet::new(),
            filter: String::new(),
            delete_one: Confirmation::Closed,
            delete_selected: Confirmation::Closed,
            ids: Box::new(RandomIdentifiers::new()),
            notifications: NotificationCenter::new(),
            notification_life: DEFAULT_NOTIFICATION_LIFE,
            dispatcher: RegistryDispatcher::new(),
        }
    }

    pub fn with_identifier_source(mut self, source: Box<dyn IdentifierSource>) -> Self {
        self.ids = source;
        self
    }

    pub fn with_notification_life(mut self, life: Duration) -> Self {
        self.notification_life = life;
        self
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn RegistrySubscriber>) {
        self.dispatcher.subscribe(subscriber);
    }

    // --- snapshots -------------------------------------------------------

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn applications(&self) -> &[Application] {
        self.registry.records()
    }

    pub fn edit_surface(&self) -> &EditSurface {
        &self.edit
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.edit.draft()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn pending_delete(&self) -> Option<&Application> {
        match &self.delete_one {
            Confirmation::Open(id) => self.registry.get(id),
            Confirmation::Closed => None,
        }
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.delete_one.is_open()
    }

    pub fn is_confirming_delete_selected(&self) -> bool {
        self.delete_selected.is_open()
    }

    pub fn selected_ids(&self) -> Vec<ApplicationId> {
        self.selection.iter().cloned().collect()
    }

    /// Selected records, in registry order
    pub fn selected_applications(&self) -> Vec<&Application> {
        self.registry
            .records()
            .iter()
            .filter(|app| app.id.as_ref().is_some_and(|id| self.selection.contains(id)))
            .collect()
    }

    pub fn is_selected(&self, id: &ApplicationId) -> bool {
        self.selection.contains(id)
    }

    /// Whether the bulk delete action is enabled
    pub fn can_remove_selected(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Options for the application name picker
    pub fn name_options(&self) -> Vec<String> {
        self.registry.names()
    }

    /// One page of the registry under the current filter
    pub fn page_view(&self, options: &ViewOptions) -> PageView {
        table_view::build_page(self.registry.records(), &self.with_filter(options))
    }

    /// All rows under the current filter and sort, across pages
    pub fn visible_rows(&self, options: &ViewOptions) -> Vec<Application> {
        table_view::filtered_sorted(self.registry.records(), &self.with_filter(options))
    }

    fn with_filter(&self, options: &ViewOptions) -> ViewOptions {
        ViewOptions {
            filter: self.filter.clone(),
            ..options.clone()
        }
    }

    pub fn active_notifications(&mut self, now: Instant) -> Vec<Notification> {
        self.notifications.active(now)
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn event_history(&self) -> impl Iterator<Item = &RegistryEvent> {
        self.dispatcher.history()
    }

    // --- load ------------------------------------------------------------

    /// Populate the registry from `source`. Runs at most once.
    pub fn load(&mut self, source: &dyn DirectorySource) -> Result<usize, ControllerError> {
        if self.load_state != LoadState::Loading {
            return Err(ControllerError::AlreadyLoaded);
        }

        info!("Loading applications from {}", source.describe());
        let fetched = source
            .fetch_applications()
            .map_err(|e| format!("{:#}", e))
            .and_then(|records| self.assign_missing_ids(records).map_err(|e| e.to_string()));

        match fetched {
            Ok(records) => {
                let count = records.len();
                self.registry = Registry::from_records(records);
                self.load_state = LoadState::Ready;
                info!("Loaded {} applications", count);
                self.emit(RegistryEvent::Loaded { count });
                Ok(count)
            }
            Err(message) => {
                error!("Error fetching applications: {}", message);
                self.registry = Registry::new();
                self.load_state = LoadState::Errored(message.clone());
                self.emit(RegistryEvent::LoadFailed {
                    message: message.clone(),
                });
                Err(ControllerError::Load(message))
            }
        }
    }

    /// Give every record a unique identifier: records without one, and
    /// the second and later copies of a repeated one, get a fresh id.
    fn assign_missing_ids(
        &mut self,
        mut records: Vec<Application>,
    ) -> Result<Vec<Application>, ControllerError> {
        let mut taken: HashSet<ApplicationId> =
            records.iter().filter_map(|app| app.id.clone()).collect();
        let mut seen: HashSet<ApplicationId> = HashSet::new();

        for app in records.iter_mut() {
            if let Some(id) = &app.id {
                if seen.insert(id.clone()) {
                    continue;
                }
            }

            let id = self.fresh_id(&taken)?;
            match &app.id {
                Some(duplicate) => warn!(
                    "Duplicate application identifier {} on '{}', assigned {}",
                    duplicate, app.name, id
                ),
                None => warn!(
                    "Application '{}' arrived without an identifier, assigned {}",
                    app.name, id
                ),
            }
            taken.insert(id.clone());
            seen.insert(id.clone());
            app.id = Some(id);
        }

        Ok(records)
    }

    fn fresh_id(&mut self, taken: &HashSet<ApplicationId>) -> Result<ApplicationId, ControllerError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
            debug!("Identifier {} already taken, retrying", candidate);
        }
        Err(ControllerError::IdentifierExhausted(MAX_ID_ATTEMPTS))
    }

    fn require_ready(&self) -> Result<(), ControllerError> {
        match self.load_state {
            LoadState::Ready => Ok(()),
            ref other => Err(ControllerError::NotReady(other.name())),
        }
    }

    /// Only one modal at a time: the edit surface or a single confirmation
    fn require_no_dialog(&self) -> Result<(), ControllerError> {
        if self.edit.is_open() {
            return Err(ControllerError::EditSurfaceOpen);
        }
        if self.delete_one.is_open() || self.delete_selected.is_open() {
            return Err(ControllerError::DialogOpen);
        }
        Ok(())
    }

    fn emit(&mut self, event: RegistryEvent) {
        self.dispatcher.dispatch(event, &self.registry);
    }

    fn notify_success(&mut self, detail: &str) {
        self.notifications
            .post(Notification::success(detail, self.notification_life));
    }

    // --- edit surface ----------------------------------------------------

    pub fn begin_create(&mut self) -> Result<(), ControllerError> {
        self.open_edit(EditMode::Create, Draft::empty())
    }

    pub fn begin_edit(&mut self, id: &ApplicationId) -> Result<(), ControllerError> {
        self.require_ready()?;
        let app = self
            .registry
            .get(id)
            .ok_or_else(|| ControllerError::UnknownApplication(id.clone()))?;
        let draft = Draft::from_application(app);
        self.open_edit(EditMode::Edit, draft)
    }

    fn open_edit(&mut self, mode: EditMode, draft: Draft) -> Result<(), ControllerError> {
        self.require_ready()?;
        self.require_no_dialog()?;
        debug!("Opening edit surface: {:?}", mode);
        self.edit = EditSurface::Open { mode, draft };
        self.emit(RegistryEvent::EditOpened { mode });
        Ok(())
    }

    pub fn update_draft(&mut self, field: DraftField, value: &str) -> Result<(), ControllerError> {
        let draft = self.edit.draft_mut().ok_or(ControllerError::NoDraft)?;
        draft.set(field, value);
        self.emit(RegistryEvent::DraftChanged);
        Ok(())
    }

    /// Save the open draft: append when it has no identifier, replace otherwise
    pub fn commit(&mut self) -> Result<CommitOutcome, ControllerError> {
        self.require_ready()?;
        let draft = self.edit.draft_mut().ok_or(ControllerError::NoDraft)?;
        draft.submitted = true;
        let report = draft.validation();
        let mut app = draft.application.clone();

        if report.blocks_commit() {
            debug!("Commit rejected: {:?}", report);
            self.emit(RegistryEvent::ValidationFailed { report });
            return Err(ControllerError::Validation(report));
        }

        let outcome = match app.id.clone() {
            Some(id) => {
                if !self.registry.replace(app.clone()) {
                    return Err(ControllerError::UnknownApplication(id));
                }
                CommitOutcome::Updated(id)
            }
            None => {
                let taken: HashSet<ApplicationId> = self.registry.ids().cloned().collect();
                let id = self.fresh_id(&taken)?;
                app.id = Some(id.clone());
                self.registry.push(app.clone());
                CommitOutcome::Created(id)
            }
        };

        self.edit = EditSurface::Closed;
        match outcome {
            CommitOutcome::Created(_) => {
                self.notify_success("Application Created");
                self.emit(RegistryEvent::Created { application: app });
            }
            CommitOutcome::Updated(_) => {
                self.notify_success("Application Updated");
                self.emit(RegistryEvent::Updated { application: app });
            }
        }
        Ok(outcome)
    }

    /// Close the edit surface, discarding the draft
    pub fn cancel(&mut self) {
        if self.edit.is_open() {
            self.edit = EditSurface::Closed;
            self.emit(RegistryEvent::EditCancelled);
        }
    }

    // --- removal ---------------------------------------------------------

    /// Drop the record with this identifier. Unknown identifiers leave the
    /// registry untouched. Returns the number of records removed.
    pub fn remove(&mut self, id: &ApplicationId) -> Result<usize, ControllerError> {
        self.require_ready()?;
        let removed = self.registry.remove(id);
        if removed == 0 {
            debug!("Remove of unknown application {} is a no-op", id);
        }
        let was_selected = self.selection.remove(id);

        self.notify_success("Application Deleted");
        let ids = if removed > 0 { vec![id.clone()] } else { Vec::new() };
        self.emit(RegistryEvent::Removed { ids });
        if was_selected {
            let count = self.selection.len();
            self.emit(RegistryEvent::SelectionChanged { count });
        }
        Ok(removed)
    }

    pub fn request_remove(&mut self, id: &ApplicationId) -> Result<(), ControllerError> {
        self.require_ready()?;
        self.require_no_dialog()?;
        if !self.registry.contains(id) {
            return Err(ControllerError::UnknownApplication(id.clone()));
        }
        self.delete_one = Confirmation::Open(id.clone());
        self.emit(RegistryEvent::ConfirmationOpened {
            dialog: ConfirmDialog::DeleteOne,
        });
        Ok(())
    }

    pub fn confirm_remove(&mut self) -> Result<usize, ControllerError> {
        let id = self
            .delete_one
            .take()
            .ok_or(ControllerError::NoPendingConfirmation)?;
        self.emit(RegistryEvent::ConfirmationClosed {
            dialog: ConfirmDialog::DeleteOne,
        });
        self.remove(&id)
    }

    pub fn dismiss_remove(&mut self) {
        if self.delete_one.take().is_some() {
            self.emit(RegistryEvent::ConfirmationClosed {
                dialog: ConfirmDialog::DeleteOne,
            });
        }
    }

    // --- selection -------------------------------------------------------

    /// Add records to the selection. Identifiers not in the registry are
    /// ignored. Returns how many were newly selected.
    pub fn select<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = ApplicationId>,
    {
        let mut added = 0;
        for id in ids {
            if self.registry.contains(&id) && self.selection.insert(id) {
                added += 1;
            }
        }
        if added > 0 {
            self.selection_changed();
        }
        added
    }

    pub fn deselect<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = ApplicationId>,
    {
        let removed = ids
            .into_iter()
            .filter(|id| self.selection.remove(id))
            .count();
        if removed > 0 {
            self.selection_changed();
        }
        removed
    }

    /// Replace the selection wholesale, as a table selection event does
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ApplicationId>,
    {
        self.selection = ids
            .into_iter()
            .filter(|id| self.registry.contains(id))
            .collect();
        self.selection_changed();
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.selection_changed();
        }
    }

    fn selection_changed(&mut self) {
        let count = self.selection.len();
        self.emit(RegistryEvent::SelectionChanged { count });
    }

    /// Remove every selected record and clear the selection
    pub fn remove_selected(&mut self) -> Result<usize, ControllerError> {
        self.require_ready()?;
        if self.selection.is_empty() {
            return Err(ControllerError::EmptySelection);
        }
        let selected = self.selection.clone();
        Ok(self.remove_ids(selected))
    }

    /// Drop exactly `ids` and take them out of the selection
    fn remove_ids(&mut self, ids: BTreeSet<ApplicationId>) -> usize {
        let targets: HashSet<ApplicationId> = ids.iter().cloned().collect();
        let removed = self.registry.remove_all(&targets);
        info!("Removed {} of {} selected applications", removed, ids.len());
        self.selection.retain(|id| !targets.contains(id));

        self.notify_success("Applications Deleted");
        self.emit(RegistryEvent::Removed {
            ids: ids.into_iter().collect(),
        });
        let count = self.selection.len();
        self.emit(RegistryEvent::SelectionChanged { count });
        removed
    }

    /// Open the bulk delete dialog over the current selection. Confirming
    /// deletes that snapshot even if the selection changes meanwhile.
    pub fn request_remove_selected(&mut self) -> Result<(), ControllerError> {
        self.require_ready()?;
        self.require_no_dialog()?;
        if self.selection.is_empty() {
            return Err(ControllerError::EmptySelection);
        }
        self.delete_selected = Confirmation::Open(self.selection.clone());
        self.emit(RegistryEvent::ConfirmationOpened {
            dialog: ConfirmDialog::DeleteSelected,
        });
        Ok(())
    }

    pub fn confirm_remove_selected(&mut self) -> Result<usize, ControllerError> {
        let ids = self
            .delete_selected
            .take()
            .ok_or(ControllerError::NoPendingConfirmation)?;
        self.emit(RegistryEvent::ConfirmationClosed {
            dialog: ConfirmDialog::DeleteSelected,
        });
        self.require_ready()?;
        Ok(self.remove_ids(ids))
    }

    pub fn dismiss_remove_selected(&mut self) {
        if self.delete_selected.take().is_some() {
            self.emit(RegistryEvent::ConfirmationClosed {
                dialog: ConfirmDialog::DeleteSelected,
            });
        }
    }

    // --- filter ----------------------------------------------------------

    /// Store the global filter query; the registry itself is untouched
    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        self.emit(RegistryEvent::FilterChanged {
            query: self.filter.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::StaticDirectory;
    use crate::data::identifier::SequenceIdentifiers;
    use serde_json::json;

    fn loaded() -> RegistryController {
        let mut controller = RegistryController::new();
        let source = StaticDirectory::new(json!({
            "Applications": [
                {"IdApplication": "AAAAA", "IdType": "1", "Name": "Billing", "Path": "/svc/billing"},
                {"IdApplication": "BBBBB", "IdType": "2", "Name": "Ledger", "Path": "/svc/ledger"},
                {"IdApplication": "CCCCC", "IdType": "1", "Name": "Portal", "Path": "/web/portal"}
            ]
        }));
        controller.load(&source).unwrap();
        controller
    }

    fn id(s: &str) -> ApplicationId {
        ApplicationId::new(s)
    }

    #[test]
    fn test_operations_require_ready() {
        let mut controller = RegistryController::new();
        assert_eq!(controller.load_state().placeholder().as_deref(), Some("Cargando..."));
        assert_eq!(
            controller.begin_create(),
            Err(ControllerError::NotReady("loading"))
        );
        assert_eq!(
            controller.remove(&id("AAAAA")),
            Err(ControllerError::NotReady("loading"))
        );
    }

    #[test]
    fn test_load_runs_once() {
        let mut controller = loaded();
        let again = StaticDirectory::new(json!({"Applications": []}));
        assert_eq!(controller.load(&again), Err(ControllerError::AlreadyLoaded));
        assert_eq!(controller.applications().len(), 3);
    }

    #[test]
    fn test_missing_ids_are_assigned_on_load() {
        let mut controller = RegistryController::new()
            .with_identifier_source(Box::new(SequenceIdentifiers::new(["AAAAA", "NEW01"])));
        let source = StaticDirectory::new(json!({
            "Applications": [
                {"IdApplication": "AAAAA", "IdType": "1", "Name": "Billing", "Path": "/a"},
                {"IdType": "2", "Name": "Orphan", "Path": "/b"}
            ]
        }));
        controller.load(&source).unwrap();
        // First candidate collides with the loaded record and is skipped
        assert_eq!(controller.applications()[1].id, Some(id("NEW01")));
    }

    #[test]
    fn test_commit_retries_on_collision() {
        let mut controller = RegistryController::new()
            .with_identifier_source(Box::new(SequenceIdentifiers::new(["BBBBB", "CCCCC", "DDDDD"])));
        controller
            .load(&StaticDirectory::new(json!({
                "Applications": [
                    {"IdApplication": "BBBBB", "Name": "b"},
                    {"IdApplication": "CCCCC", "Name": "c"}
                ]
            })))
            .unwrap();

        controller.begin_create().unwrap();
        controller.update_draft(DraftField::Name, "d").unwrap();
        assert_eq!(controller.commit(), Ok(CommitOutcome::Created(id("DDDDD"))));
    }

    #[test]
    fn test_second_edit_surface_is_rejected() {
        let mut controller = loaded();
        controller.begin_create().unwrap();
        assert_eq!(
            controller.begin_edit(&id("AAAAA")),
            Err(ControllerError::EditSurfaceOpen)
        );
        controller.cancel();
        controller.begin_edit(&id("AAAAA")).unwrap();
        assert_eq!(controller.edit_surface().mode(), Some(EditMode::Edit));
    }

    #[test]
    fn test_draft_is_independent_until_commit() {
        let mut controller = loaded();
        controller.begin_edit(&id("BBBBB")).unwrap();
        controller.update_draft(DraftField::Name, "Ledger v2").unwrap();
        assert_eq!(controller.applications()[1].name, "Ledger");

        controller.cancel();
        assert_eq!(controller.applications()[1].name, "Ledger");
        assert!(controller.draft().is_none());
    }

    #[test]
    fn test_validation_keeps_surface_open() {
        let mut controller = loaded();
        controller.begin_create().unwrap();
        controller.update_draft(DraftField::Type, "1").unwrap();

        let err = controller.commit().unwrap_err();
        assert!(matches!(err, ControllerError::Validation(r) if r.name_missing && !r.type_missing));
        assert!(controller.edit_surface().is_open());
        assert!(controller.draft().unwrap().submitted);
        assert_eq!(controller.applications().len(), 3);
        assert!(controller.drain_notifications().is_empty());
    }

    #[test]
    fn test_commit_closes_and_notifies() {
        let mut controller = loaded();
        controller.begin_edit(&id("CCCCC")).unwrap();
        controller.update_draft(DraftField::Path, "/web/portal2").unwrap();
        assert_eq!(controller.commit(), Ok(CommitOutcome::Updated(id("CCCCC"))));

        assert!(!controller.edit_surface().is_open());
        let notes = controller.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].detail, "Application Updated");
        assert_eq!(notes[0].summary, "Successful");
    }

    #[test]
    fn test_commit_of_vanished_record_is_rejected() {
        let mut controller = loaded();
        controller.begin_edit(&id("AAAAA")).unwrap();
        controller.remove(&id("AAAAA")).unwrap();
        assert_eq!(
            controller.commit(),
            Err(ControllerError::UnknownApplication(id("AAAAA")))
        );
        assert_eq!(controller.applications().len(), 2);
    }

    #[test]
    fn test_confirmed_remove() {
        let mut controller = loaded();
        controller.request_remove(&id("BBBBB")).unwrap();
        assert_eq!(controller.pending_delete().map(|a| a.name.as_str()), Some("Ledger"));

        controller.dismiss_remove();
        assert_eq!(controller.confirm_remove(), Err(ControllerError::NoPendingConfirmation));
        assert_eq!(controller.applications().len(), 3);

        controller.request_remove(&id("BBBBB")).unwrap();
        assert_eq!(controller.confirm_remove(), Ok(1));
        assert!(!controller.registry().contains(&id("BBBBB")));
    }

    #[test]
    fn test_remove_prunes_selection() {
        let mut controller = loaded();
        controller.select([id("AAAAA"), id("BBBBB")]);
        controller.remove(&id("AAAAA")).unwrap();
        assert_eq!(controller.selected_ids(), vec![id("BBBBB")]);
    }

    #[test]
    fn test_selection_ignores_unknown_ids() {
        let mut controller = loaded();
        assert_eq!(controller.select([id("ZZZZZ"), id("CCCCC")]), 1);
        assert_eq!(controller.select([id("CCCCC")]), 0);
        controller.set_selection([id("AAAAA"), id("YYYYY")]);
        assert_eq!(controller.selected_ids(), vec![id("AAAAA")]);
        assert_eq!(controller.deselect([id("AAAAA")]), 1);
        assert!(!controller.can_remove_selected());
    }

    #[test]
    fn test_bulk_remove_requires_selection() {
        let mut controller = loaded();
        assert_eq!(controller.remove_selected(), Err(ControllerError::EmptySelection));
        assert_eq!(
            controller.request_remove_selected(),
            Err(ControllerError::EmptySelection)
        );
    }

    #[test]
    fn test_bulk_remove_survives_edit_of_selected_record() {
        let mut controller = loaded();
        controller.select([id("AAAAA"), id("CCCCC")]);

        controller.begin_edit(&id("AAAAA")).unwrap();
        controller.update_draft(DraftField::Name, "Billing EU").unwrap();
        controller.commit().unwrap();

        controller.request_remove_selected().unwrap();
        assert_eq!(controller.confirm_remove_selected(), Ok(2));
        assert_eq!(controller.applications().len(), 1);
        assert_eq!(controller.applications()[0].name, "Ledger");
        assert!(controller.selected_ids().is_empty());
    }

    #[test]
    fn test_filter_does_not_mutate() {
        let mut controller = loaded();
        controller.set_filter("portal");
        assert_eq!(controller.applications().len(), 3);
        let page = controller.page_view(&ViewOptions::default());
        assert_eq!(page.total_records, 1);
        assert_eq!(page.rows[0].name, "Portal");
        assert_eq!(
            controller.event_history().last(),
            Some(&RegistryEvent::FilterChanged {
                query: "portal".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_loaded_ids_are_reassigned() {
        let mut controller = RegistryController::new()
            .with_identifier_source(Box::new(SequenceIdentifiers::new(["BBBBB", "NEW01"])));
        controller
            .load(&StaticDirectory::new(json!({
                "Applications": [
                    {"IdApplication": "AAAAA", "IdType": "1", "Name": "One", "Path": "/1"},
                    {"IdApplication": "AAAAA", "IdType": "1", "Name": "Two", "Path": "/2"},
                    {"IdApplication": "BBBBB", "IdType": "2", "Name": "Three", "Path": "/3"}
                ]
            })))
            .unwrap();

        let ids: Vec<_> = controller
            .applications()
            .iter()
            .map(|a| a.id.clone().unwrap())
            .collect();
        // "BBBBB" is taken by a later record, so the copy gets the next candidate
        assert_eq!(ids, vec![id("AAAAA"), id("NEW01"), id("BBBBB")]);

        assert_eq!(controller.remove(&id("AAAAA")), Ok(1));
        assert_eq!(controller.applications().len(), 2);
        assert_eq!(controller.applications()[0].name, "Two");
    }

    #[test]
    fn test_bulk_confirmation_deletes_the_confirmed_set() {
        let mut controller = loaded();
        controller.select([id("AAAAA")]);
        controller.request_remove_selected().unwrap();

        controller.select([id("BBBBB"), id("CCCCC")]);
        assert_eq!(controller.confirm_remove_selected(), Ok(1));

        assert_eq!(controller.applications().len(), 2);
        assert!(!controller.registry().contains(&id("AAAAA")));
        assert_eq!(controller.selected_ids(), vec![id("BBBBB"), id("CCCCC")]);
    }

    #[test]
    fn test_only_one_dialog_at_a_time() {
        let mut controller = loaded();
        controller.select([id("CCCCC")]);

        controller.request_remove(&id("AAAAA")).unwrap();
        assert_eq!(
            controller.request_remove_selected(),
            Err(ControllerError::DialogOpen)
        );
        assert_eq!(controller.begin_create(), Err(ControllerError::DialogOpen));
        controller.dismiss_remove();

        controller.begin_edit(&id("BBBBB")).unwrap();
        assert_eq!(
            controller.request_remove(&id("AAAAA")),
            Err(ControllerError::EditSurfaceOpen)
        );
        assert_eq!(
            controller.request_remove_selected(),
            Err(ControllerError::EditSurfaceOpen)
        );
        controller.cancel();

        controller.request_remove_selected().unwrap();
        assert_eq!(
            controller.request_remove(&id("AAAAA")),
            Err(ControllerError::DialogOpen)
        );
        assert!(!controller.is_confirming_delete());
    }

    #[test]
    fn test_name_options() {
        let controller = loaded();
        assert_eq!(controller.name_options(), vec!["Billing", "Ledger", "Portal"]);
    }
}
