//! Adapter between the suggestion engine and an editor's completion-provider hook.
//!
//! Positions and ranges are 1-based, counted in characters, matching what
//! embeddable editors report.

use tracing::debug;

use crate::engine::{Suggestion, SuggestionEngine, SuggestionKind};

pub const TRIGGER_CHARACTERS: [char; 1] = ['-'];
pub const MAX_COMPLETION_ITEMS: usize = 15;
const CONTEXT_LINES: usize = 5;
const MIN_CONTEXT_CHARS: usize = 10;

const LANGUAGE_KEYWORDS: [(&str, &[&str]); 3] = [
    (
        "Python",
        &["python", "print(", "def ", "import ", "for i in", "if __name__"],
    ),
    (
        "JavaScript",
        &["javascript", "function(", "const ", "let ", "console.log", "document."],
    ),
    (
        "Java",
        &["java", "public class", "system.out", "public static void", "import java."],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line_number: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start_line_number: usize,
    pub start_column: usize,
    pub end_line_number: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionItemKind {
    Keyword,
    Snippet,
    Module,
    Text,
}

impl From<SuggestionKind> for CompletionItemKind {
    fn from(kind: SuggestionKind) -> Self {
        match kind {
            SuggestionKind::Concept => CompletionItemKind::Keyword,
            SuggestionKind::Phrase => CompletionItemKind::Snippet,
            SuggestionKind::Language => CompletionItemKind::Module,
            SuggestionKind::General => CompletionItemKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    pub insert_text: String,
    pub documentation: String,
    pub sort_text: String,
    pub filter_text: String,
    pub range: Range,
}

/// Read-only snapshot of the editor buffer.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text
                .split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line_number: usize) -> Option<&str> {
        line_number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    /// Text from up to five lines above the cursor through the cursor itself.
    pub fn text_before(&self, position: Position) -> String {
        let first = position.line_number.saturating_sub(CONTEXT_LINES).max(1);
        let mut parts = Vec::new();

        for line_number in first..=position.line_number {
            let Some(line) = self.line(line_number) else {
                break;
            };
            if line_number == position.line_number {
                let taken = position.column.saturating_sub(1);
                parts.push(line.chars().take(taken).collect::<String>());
            } else {
                parts.push(line.to_string());
            }
        }

        parts.join("\n")
    }
}

pub trait CompletionProvider {
    fn trigger_characters(&self) -> &[char];

    fn provide_completion_items(
        &mut self,
        document: &Document,
        position: Position,
    ) -> Vec<CompletionItem>;
}

pub fn detect_language(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    LANGUAGE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(language, _)| *language)
}

fn short_documentation(kind: SuggestionKind) -> &'static str {
    match kind {
        SuggestionKind::Concept => "Programming concept",
        SuggestionKind::Phrase => "Teaching observation",
        SuggestionKind::Language => "Language-specific",
        SuggestionKind::General => "General observation",
    }
}

fn insertion_range(position: Position, current_line: &str, fresh_bullet: bool) -> Range {
    if fresh_bullet {
        Range {
            start_line_number: position.line_number,
            start_column: 1,
            end_line_number: position.line_number,
            end_column: current_line.chars().count() + 1,
        }
    } else {
        Range {
            start_line_number: position.line_number,
            start_column: position.column,
            end_line_number: position.line_number,
            end_column: position.column,
        }
    }
}

pub struct EditorIntegration {
    engine: SuggestionEngine,
    registered: bool,
}

impl EditorIntegration {
    pub fn new(engine: SuggestionEngine) -> Self {
        Self {
            engine,
            registered: false,
        }
    }

    /// Marks the provider as attached; re-registering replaces the previous attachment.
    pub fn register(&mut self) -> &mut Self {
        if self.registered {
            debug!("Replacing existing completion provider registration");
        }
        self.registered = true;
        self
    }

    pub fn dispose(&mut self) {
        self.registered = false;
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn engine_mut(&mut self) -> &mut SuggestionEngine {
        &mut self.engine
    }

    fn to_item(
        suggestion: Suggestion,
        position: Position,
        current_line: &str,
        fresh_bullet: bool,
    ) -> CompletionItem {
        CompletionItem {
            kind: suggestion.kind.into(),
            insert_text: if fresh_bullet {
                suggestion.insert_text
            } else {
                suggestion.label.clone()
            },
            documentation: short_documentation(suggestion.kind).to_string(),
            sort_text: suggestion.sort_text,
            filter_text: suggestion.label.clone(),
            range: insertion_range(position, current_line, fresh_bullet),
            label: suggestion.label,
        }
    }
}

impl CompletionProvider for EditorIntegration {
    fn trigger_characters(&self) -> &[char] {
        &TRIGGER_CHARACTERS
    }

    fn provide_completion_items(
        &mut self,
        document: &Document,
        position: Position,
    ) -> Vec<CompletionItem> {
        let Some(current_line) = document.line(position.line_number) else {
            debug!(line = position.line_number, "Completion requested outside the document");
            return Vec::new();
        };

        let before_cursor = document.text_before(position);
        let trimmed = current_line.trim();
        let fresh_bullet = trimmed.is_empty() || trimmed == "-";
        let after_dash = current_line.starts_with("- ") && position.column > 2;
        let has_context = before_cursor.trim().chars().count() >= MIN_CONTEXT_CHARS;

        if !fresh_bullet && !(after_dash && has_context) {
            return Vec::new();
        }

        let language = detect_language(&before_cursor);
        self.engine
            .get_suggestions(&before_cursor, position.column, language)
            .into_iter()
            .take(MAX_COMPLETION_ITEMS)
            .map(|suggestion| Self::to_item(suggestion, position, current_line, fresh_bullet))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::loader::fallback_dataset;
    use crate::models::{ConceptSuggestion, SuggestionDataset};

    fn integration() -> EditorIntegration {
        let engine = SuggestionEngine::new(Some(Arc::new(fallback_dataset())));
        let mut integration = EditorIntegration::new(engine);
        integration.register();
        integration
    }

    #[test]
    fn fresh_bullet_replaces_whole_line() {
        let document = Document::new("Main Activity: loops\nShe did great work.\n-");
        let position = Position { line_number: 3, column: 2 };

        let items = integration().provide_completion_items(&document, position);
        assert!(!items.is_empty());
        assert!(items.len() <= MAX_COMPLETION_ITEMS);
        for item in &items {
            assert!(item.insert_text.starts_with("- "));
            assert_eq!(
                item.range,
                Range { start_line_number: 3, start_column: 1, end_line_number: 3, end_column: 2 }
            );
        }
    }

    #[test]
    fn never_returns_more_than_fifteen_items() {
        let concept_suggestions = (0..20)
            .map(|i| ConceptSuggestion {
                text: format!("used loop variant {i}"),
                concept: "loop".to_string(),
                frequency: 3,
            })
            .collect();
        let dataset = SuggestionDataset {
            concept_suggestions,
            ..SuggestionDataset::default()
        };
        let mut integration = EditorIntegration::new(SuggestionEngine::new(Some(Arc::new(dataset))));

        let document = Document::new("great loop in python\n");
        let position = Position { line_number: 2, column: 1 };

        let items = integration.provide_completion_items(&document, position);
        assert_eq!(items.len(), MAX_COMPLETION_ITEMS);
        assert!(items.iter().all(|item| item.kind == CompletionItemKind::Keyword));
    }

    #[test]
    fn existing_bullet_inserts_at_cursor_once_context_exists() {
        let document = Document::new("Warm Up: variables\n- worked through the ");
        let position = Position { line_number: 2, column: 22 };

        let items = integration().provide_completion_items(&document, position);
        assert!(!items.is_empty());
        let item = &items[0];
        assert_eq!(item.insert_text, item.label);
        assert_eq!(item.filter_text, item.label);
        assert_eq!(
            item.range,
            Range { start_line_number: 2, start_column: 22, end_line_number: 2, end_column: 22 }
        );
    }

    #[test]
    fn suppressed_without_enough_context_or_outside_bullets() {
        let mut integration = integration();

        let short = Document::new("- ok");
        let items = integration.provide_completion_items(&short, Position { line_number: 1, column: 5 });
        assert!(items.is_empty());

        let prose = Document::new("The student wrote a long paragraph here");
        let items = integration.provide_completion_items(&prose, Position { line_number: 1, column: 20 });
        assert!(items.is_empty());

        let items = integration.provide_completion_items(&prose, Position { line_number: 9, column: 1 });
        assert!(items.is_empty());
    }

    #[test]
    fn detects_language_hints() {
        assert_eq!(detect_language("she wrote def main():"), Some("Python"));
        assert_eq!(detect_language("used console.log to trace"), Some("JavaScript"));
        assert_eq!(detect_language("System.out.println calls"), Some("Java"));
        assert_eq!(detect_language("drew a diagram"), None);
    }

    #[test]
    fn text_before_cursor_spans_recent_lines() {
        let document = Document::new("one\ntwo\nthree\nfour\nfive\nsix\nseven");
        let text = document.text_before(Position { line_number: 7, column: 3 });
        assert_eq!(text, "two\nthree\nfour\nfive\nsix\nse");
        assert_eq!(document.line_count(), 7);
    }

    #[test]
    fn registration_can_be_disposed() {
        let mut integration = integration();
        assert!(integration.is_registered());
        assert_eq!(integration.trigger_characters(), &['-']);
        integration.dispose();
        assert!(!integration.is_registered());
    }
}
