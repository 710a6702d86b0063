use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::clipboard::ChainedClipboard;
use crate::error::SessionError;
use crate::models::BatchEntry;
use crate::templates::{TemplateCategory, Theme, NOTES_TEMPLATE, STAT_KEYWORDS, STAT_LANGUAGES};

pub const PLAIN_TEXT_BANNER: &str =
    "Advanced editor unavailable. Using the plain text editor instead; statistics, templates and shortcuts still work.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteStats {
    pub words: usize,
    pub concepts: usize,
    pub languages: usize,
}

pub fn note_stats(text: &str) -> NoteStats {
    let lowered = text.to_lowercase();
    NoteStats {
        words: text.split_whitespace().count(),
        concepts: STAT_KEYWORDS
            .iter()
            .filter(|keyword| lowered.contains(&keyword.to_lowercase()))
            .count(),
        languages: STAT_LANGUAGES
            .iter()
            .filter(|language| lowered.contains(*language))
            .count(),
    }
}

/// Clipboard payload: one block per student, separated by a blank line.
pub fn format_batch(entries: &[BatchEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("Student: {}\nObservations:\n{}\n---", entry.name, entry.notes))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Rich,
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    AddToBatch,
    ExportBatch,
    ClearBatch,
    PreviousTemplate,
    NextTemplate,
}

impl Shortcut {
    /// Maps a key pressed with Ctrl or Cmd held to a shortcut.
    pub fn from_key(key: &str, ctrl_or_meta: bool) -> Option<Self> {
        if !ctrl_or_meta {
            return None;
        }
        match key {
            "Enter" => Some(Shortcut::AddToBatch),
            "e" => Some(Shortcut::ExportBatch),
            "r" | "R" => Some(Shortcut::ClearBatch),
            "ArrowLeft" => Some(Shortcut::PreviousTemplate),
            "ArrowRight" => Some(Shortcut::NextTemplate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Copied { count: usize, method: String },
    /// Every clipboard mechanism failed; the payload must be copied by hand.
    ManualCopy { payload: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutOutcome {
    Added(BatchEntry),
    Exported(ExportOutcome),
    Cleared(usize),
    TemplateSelected(TemplateCategory),
}

/// In-memory state of one note-taking session.
#[derive(Debug, Clone)]
pub struct NotesSession {
    current_student: String,
    current_notes: String,
    batch: Vec<BatchEntry>,
    theme: Theme,
    active_template: TemplateCategory,
    processing: bool,
    editor_mode: EditorMode,
    stats: NoteStats,
}

impl Default for NotesSession {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesSession {
    pub fn new() -> Self {
        Self {
            current_student: String::new(),
            current_notes: NOTES_TEMPLATE.to_string(),
            batch: Vec::new(),
            theme: Theme::default(),
            active_template: TemplateCategory::Engagement,
            processing: false,
            editor_mode: EditorMode::default(),
            stats: note_stats(NOTES_TEMPLATE),
        }
    }

    pub fn current_student(&self) -> &str {
        &self.current_student
    }

    pub fn set_student(&mut self, name: &str) {
        self.current_student = name.to_string();
    }

    pub fn notes(&self) -> &str {
        &self.current_notes
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.current_notes = notes.to_string();
        self.stats = note_stats(&self.current_notes);
    }

    pub fn append_line(&mut self, line: &str) {
        if !self.current_notes.is_empty() {
            self.current_notes.push('\n');
        }
        self.current_notes.push_str(line);
        self.stats = note_stats(&self.current_notes);
    }

    pub fn insert_observation(&mut self, observation: &str) {
        self.append_line(&format!("- {observation}"));
    }

    pub fn stats(&self) -> NoteStats {
        self.stats
    }

    pub fn batch(&self) -> &[BatchEntry] {
        &self.batch
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn active_template(&self) -> TemplateCategory {
        self.active_template
    }

    pub fn next_template(&mut self) -> TemplateCategory {
        self.active_template = self.active_template.next();
        self.active_template
    }

    pub fn previous_template(&mut self) -> TemplateCategory {
        self.active_template = self.active_template.prev();
        self.active_template
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn editor_mode(&self) -> EditorMode {
        self.editor_mode
    }

    /// Switches to plain text editing after the rich editor failed to load.
    pub fn fall_back_to_plain_text(&mut self) -> &'static str {
        self.editor_mode = EditorMode::PlainText;
        if self.current_notes.is_empty() {
            self.set_notes(NOTES_TEMPLATE);
        }
        PLAIN_TEXT_BANNER
    }

    pub fn add_to_batch(&mut self) -> Result<&BatchEntry, SessionError> {
        let name = self.current_student.trim();
        if name.is_empty() {
            return Err(SessionError::MissingStudentName);
        }
        let notes = self.current_notes.trim();
        if notes.is_empty() {
            return Err(SessionError::MissingNotes);
        }

        let entry = BatchEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            notes: notes.to_string(),
            created_at: Utc::now(),
            word_count: self.stats.words,
            concepts_found: self.stats.concepts,
        };
        info!(student = %entry.name, words = entry.word_count, "Added notes to batch");

        self.batch.push(entry);
        self.current_student.clear();
        self.set_notes(NOTES_TEMPLATE);
        Ok(&self.batch[self.batch.len() - 1])
    }

    pub fn export_payload(&self) -> String {
        format_batch(&self.batch)
    }

    pub async fn export_batch(
        &mut self,
        clipboard: &ChainedClipboard,
    ) -> Result<ExportOutcome, SessionError> {
        if self.batch.is_empty() {
            return Err(SessionError::EmptyBatch);
        }

        self.processing = true;
        let payload = self.export_payload();
        let outcome = match clipboard.copy(&payload).await {
            Ok(method) => {
                info!(count = self.batch.len(), %method, "Exported batch to clipboard");
                ExportOutcome::Copied {
                    count: self.batch.len(),
                    method,
                }
            }
            Err(err) => {
                error!(error = %err, "Export to clipboard failed");
                ExportOutcome::ManualCopy {
                    payload,
                    error: err.to_string(),
                }
            }
        };
        self.processing = false;
        Ok(outcome)
    }

    /// Removes every entry; returns how many were removed.
    pub fn clear_batch(&mut self) -> usize {
        let cleared = self.batch.len();
        self.batch.clear();
        if cleared > 0 {
            info!(cleared, "Cleared batch");
        }
        cleared
    }

    pub async fn handle_shortcut(
        &mut self,
        shortcut: Shortcut,
        clipboard: &ChainedClipboard,
    ) -> Result<ShortcutOutcome, SessionError> {
        match shortcut {
            Shortcut::AddToBatch => self
                .add_to_batch()
                .map(|entry| ShortcutOutcome::Added(entry.clone())),
            Shortcut::ExportBatch => self
                .export_batch(clipboard)
                .await
                .map(ShortcutOutcome::Exported),
            Shortcut::ClearBatch => Ok(ShortcutOutcome::Cleared(self.clear_batch())),
            Shortcut::PreviousTemplate => {
                Ok(ShortcutOutcome::TemplateSelected(self.previous_template()))
            }
            Shortcut::NextTemplate => Ok(ShortcutOutcome::TemplateSelected(self.next_template())),
        }
    }
}
