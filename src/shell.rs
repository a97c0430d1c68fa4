//! Line-oriented presentation layer.
//!
//! Turns parsed [`Command`]s into controller intents and renders the
//! resulting state as text. It holds only display state (page, sort, page
//! size); everything else lives in the controller.

use crate::commands::{help_text, Command};
use crate::config::config::Config;
use crate::data::data_exporter::DataExporter;
use crate::data::table_view::{ViewOptions, ROWS_PER_PAGE_OPTIONS};
use crate::state::controller::{ControllerError, LoadState, RegistryController};
use crate::table_display::{render_draft, render_page};
use crate::utils::logging::LogRingBuffer;
use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::debug;

/// What the shell wants printed after a command
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShellResponse {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl ShellResponse {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

pub struct Shell {
    controller: RegistryController,
    options: ViewOptions,
    use_glyphs: bool,
    log_buffer: Option<LogRingBuffer>,
}

impl Shell {
    pub fn new(controller: RegistryController, config: &Config) -> Self {
        Self {
            controller,
            options: ViewOptions {
                filter_mode: config.behavior.filter_mode,
                rows_per_page: config.display.rows_per_page,
                ..ViewOptions::default()
            },
            use_glyphs: config.display.use_glyphs,
            log_buffer: None,
        }
    }

    pub fn with_log_buffer(mut self, buffer: LogRingBuffer) -> Self {
        self.log_buffer = Some(buffer);
        self
    }

    pub fn controller(&self) -> &RegistryController {
        &self.controller
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Current page as text, or the load placeholder
    pub fn render(&self) -> String {
        if let Some(placeholder) = self.controller.load_state().placeholder() {
            return placeholder;
        }
        let page = self.controller.page_view(&self.options);
        let controller = &self.controller;
        render_page(&page, |id| controller.is_selected(id), self.use_glyphs)
    }

    /// Run one command, then append any notifications it produced
    pub fn execute(&mut self, command: Command) -> Result<ShellResponse> {
        debug!(target: "shell", "{:?}", command);
        let mut response = self.dispatch(command)?;
        response.lines.extend(
            self.controller
                .drain_notifications()
                .into_iter()
                .map(|n| n.to_string()),
        );
        Ok(response)
    }

    fn dispatch(&mut self, command: Command) -> Result<ShellResponse> {
        let needs_registry = !matches!(command, Command::Help | Command::Quit | Command::Logs(_));
        if needs_registry && *self.controller.load_state() != LoadState::Ready {
            return Ok(ShellResponse::line(self.render()));
        }

        let response = match command {
            Command::List => ShellResponse::line(self.render()),
            Command::Page(page) => {
                self.options.page = page;
                ShellResponse::line(self.render())
            }
            Command::Rows(rows) => {
                if !ROWS_PER_PAGE_OPTIONS.contains(&rows) {
                    bail!("Rows per page must be one of {:?}", ROWS_PER_PAGE_OPTIONS);
                }
                self.options.rows_per_page = rows;
                self.options.page = 0;
                ShellResponse::line(self.render())
            }
            Command::Sort(sort) => {
                self.options.sort = sort;
                ShellResponse::line(self.render())
            }
            Command::Find(query) => {
                self.controller.set_filter(&query);
                self.options.page = 0;
                ShellResponse::line(self.render())
            }
            Command::New => {
                self.controller.begin_create()?;
                self.draft_view()
            }
            Command::Edit(id) => {
                self.controller.begin_edit(&id)?;
                self.draft_view()
            }
            Command::Set(field, value) => {
                self.controller.update_draft(field, &value)?;
                self.draft_view()
            }
            Command::ShowDraft => self.draft_view(),
            Command::Save => match self.controller.commit() {
                Ok(_) => ShellResponse::line(self.render()),
                Err(ControllerError::Validation(_)) => self.draft_view(),
                Err(e) => return Err(e.into()),
            },
            Command::Cancel => {
                self.controller.cancel();
                ShellResponse::line("Edit cancelled.")
            }
            Command::Delete(id) => {
                self.controller.request_remove(&id)?;
                let name = self
                    .controller
                    .pending_delete()
                    .map(|app| app.name.clone())
                    .unwrap_or_default();
                ShellResponse::line(format!(
                    "Are you sure you want to delete {}? (yes/no)",
                    name
                ))
            }
            Command::Select(ids) => {
                self.controller.select(ids);
                self.selection_summary()
            }
            Command::Deselect(ids) => {
                self.controller.deselect(ids);
                self.selection_summary()
            }
            Command::SelectNone => {
                self.controller.clear_selection();
                self.selection_summary()
            }
            Command::DeleteSelected => {
                self.controller.request_remove_selected()?;
                ShellResponse::line(
                    "Are you sure you want to delete the selected applications? (yes/no)",
                )
            }
            Command::Yes => {
                if self.controller.is_confirming_delete() {
                    self.controller.confirm_remove()?;
                } else if self.controller.is_confirming_delete_selected() {
                    self.controller.confirm_remove_selected()?;
                } else {
                    return Ok(ShellResponse::line("Nothing to confirm."));
                }
                ShellResponse::line(self.render())
            }
            Command::No => {
                self.controller.dismiss_remove();
                self.controller.dismiss_remove_selected();
                ShellResponse::line("Cancelled.")
            }
            Command::Names => {
                let names = self.controller.name_options();
                if names.is_empty() {
                    ShellResponse::line("No applications.")
                } else {
                    ShellResponse::lines(names)
                }
            }
            Command::Export(file) => {
                let path = PathBuf::from(file.unwrap_or_else(DataExporter::default_filename));
                let rows = self.controller.visible_rows(&self.options);
                ShellResponse::line(DataExporter::export_to_csv(&rows, &path)?)
            }
            Command::Logs(count) => self.logs(count),
            Command::Help => ShellResponse::line(help_text()),
            Command::Quit => ShellResponse {
                lines: Vec::new(),
                quit: true,
            },
        };

        Ok(response)
    }

    fn draft_view(&self) -> ShellResponse {
        match (self.controller.draft(), self.controller.edit_surface().mode()) {
            (Some(draft), Some(mode)) => ShellResponse::line(render_draft(draft, mode)),
            _ => ShellResponse::line("No application is being edited."),
        }
    }

    fn selection_summary(&self) -> ShellResponse {
        let selected = self.controller.selected_ids();
        if selected.is_empty() {
            ShellResponse::line("No applications selected.")
        } else {
            let ids: Vec<String> = selected.iter().map(|id| id.to_string()).collect();
            ShellResponse::line(format!("{} selected: {}", ids.len(), ids.join(", ")))
        }
    }

    fn logs(&self, count: usize) -> ShellResponse {
        match &self.log_buffer {
            Some(buffer) => ShellResponse::lines(
                buffer
                    .get_recent(count)
                    .iter()
                    .map(|entry| entry.format_for_display())
                    .collect(),
            ),
            None => ShellResponse::line("Logging is not initialized."),
        }
    }
}
