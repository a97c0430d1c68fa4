use crate::data::application::{Application, ApplicationId};
use std::collections::HashSet;

/// Ordered in-memory collection of application records.
///
/// Every record held here carries an identifier; the controller assigns
/// one before anything is inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    records: Vec<Application>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Application>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Application] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_index_by_id(&self, id: &ApplicationId) -> Option<usize> {
        self.records.iter().position(|app| app.has_id(id))
    }

    pub fn get(&self, id: &ApplicationId) -> Option<&Application> {
        self.find_index_by_id(id).map(|idx| &self.records[idx])
    }

    pub fn contains(&self, id: &ApplicationId) -> bool {
        self.find_index_by_id(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ApplicationId> {
        self.records.iter().filter_map(|app| app.id.as_ref())
    }

    pub fn push(&mut self, app: Application) {
        self.records.push(app);
    }

    /// Replace the record sharing `app`'s identifier, keeping its position.
    /// Returns false when no record matches.
    pub fn replace(&mut self, app: Application) -> bool {
        let Some(id) = app.id.as_ref() else {
            return false;
        };
        match self.find_index_by_id(id) {
            Some(idx) => {
                self.records[idx] = app;
                true
            }
            None => false,
        }
    }

    /// Drop every record with this identifier, returning how many went
    pub fn remove(&mut self, id: &ApplicationId) -> usize {
        let before = self.records.len();
        self.records.retain(|app| !app.has_id(id));
        before - self.records.len()
    }

    /// Drop every record whose identifier is in `ids`
    pub fn remove_all(&mut self, ids: &HashSet<ApplicationId>) -> usize {
        let before = self.records.len();
        self.records.retain(|app| match &app.id {
            Some(id) => !ids.contains(id),
            None => true,
        });
        before - self.records.len()
    }

    /// Distinct names in registry order
    pub fn names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|app| seen.insert(app.name.as_str()))
            .map(|app| app.name.clone())
            .collect()
    }
}
