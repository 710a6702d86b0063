use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::models::{PhraseCategory, SuggestionDataset};

pub const MAX_SUGGESTIONS: usize = 50;
const CONCEPT_LIMIT: usize = 15;
const PHRASE_LIMIT: usize = 20;
const RECENT_WORDS: usize = 10;
const FREQUENCY_CEILING: usize = 999_999;

const FALLBACK_PHRASES: [&str; 5] = [
    "engaged actively with the learning material",
    "demonstrated problem-solving skills during the session",
    "showed willingness to ask questions when confused",
    "participated meaningfully in class discussions",
    "exhibited growth mindset when facing challenges",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Programming,
    Positive,
    Challenges,
    Progress,
    Collaboration,
    Assessment,
    General,
}

impl ContextKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextKind::Programming => "programming",
            ContextKind::Positive => "positive",
            ContextKind::Challenges => "challenges",
            ContextKind::Progress => "progress",
            ContextKind::Collaboration => "collaboration",
            ContextKind::Assessment => "assessment",
            ContextKind::General => "general",
        }
    }

    /// Phrase bucket that feeds suggestions for this context.
    pub fn phrase_bucket(self) -> PhraseCategory {
        match self {
            ContextKind::Positive => PhraseCategory::Positive,
            ContextKind::Challenges => PhraseCategory::Constructive,
            ContextKind::Progress => PhraseCategory::Progress,
            _ => PhraseCategory::Neutral,
        }
    }
}

const CONTEXT_KEYWORDS: [(ContextKind, &[&str]); 6] = [
    (
        ContextKind::Programming,
        &["loop", "function", "variable", "array", "object", "class", "method"],
    ),
    (
        ContextKind::Positive,
        &["excellent", "great", "fantastic", "outstanding", "impressive", "strong"],
    ),
    (
        ContextKind::Challenges,
        &["struggle", "difficulty", "challenge", "problem", "confusion", "error"],
    ),
    (
        ContextKind::Progress,
        &["improvement", "progress", "growth", "development", "mastery", "learning"],
    ),
    (
        ContextKind::Collaboration,
        &["collaborate", "pair", "team", "peer", "group", "together"],
    ),
    (
        ContextKind::Assessment,
        &["ready", "prepare", "advance", "next", "evaluation", "assessment"],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedContext {
    pub kind: ContextKind,
    pub categories: Vec<ContextKind>,
    pub keywords: Vec<&'static str>,
    pub word_count: usize,
}

/// Memoization key for one suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextSignature {
    pub kind: ContextKind,
    pub keywords: Vec<&'static str>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    Concept,
    Phrase,
    Language,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub insert_text: String,
    pub documentation: String,
    pub sort_text: String,
    pub kind: SuggestionKind,
}

impl Suggestion {
    fn new(label: String, documentation: String, sort_text: String, kind: SuggestionKind) -> Self {
        Self {
            insert_text: format!("- {label}"),
            label,
            documentation,
            sort_text,
            kind,
        }
    }
}

pub fn detect_context(text: &str) -> DetectedContext {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let recent = &words[words.len().saturating_sub(RECENT_WORDS)..];

    let mut categories = Vec::new();
    let mut keywords = Vec::new();

    for (kind, candidates) in CONTEXT_KEYWORDS.iter() {
        let matches: Vec<&'static str> = candidates
            .iter()
            .copied()
            .filter(|keyword| recent.iter().any(|word| word.contains(keyword)))
            .collect();
        if !matches.is_empty() {
            categories.push(*kind);
            keywords.extend(matches);
        }
    }

    DetectedContext {
        kind: categories.first().copied().unwrap_or(ContextKind::General),
        categories,
        keywords,
        word_count: words.len(),
    }
}

#[derive(Debug, Default)]
pub struct SuggestionEngine {
    dataset: Option<Arc<SuggestionDataset>>,
    cache: HashMap<ContextSignature, Vec<Suggestion>>,
}

impl SuggestionEngine {
    pub fn new(dataset: Option<Arc<SuggestionDataset>>) -> Self {
        Self {
            dataset,
            cache: HashMap::new(),
        }
    }

    /// Ranked candidates for the text before the cursor. The column is accepted
    /// for provider parity; ranking depends only on the trailing words.
    pub fn get_suggestions(
        &mut self,
        text: &str,
        _column: usize,
        language: Option<&str>,
    ) -> Vec<Suggestion> {
        let context = detect_context(text);
        let signature = ContextSignature {
            kind: context.kind,
            keywords: context.keywords.clone(),
            language: language.map(str::to_string),
        };

        if let Some(cached) = self.cache.get(&signature) {
            return cached.clone();
        }

        let ranked = rank(self.generate(&context, language));
        debug!(
            context = context.kind.as_str(),
            keywords = context.keywords.len(),
            suggestions = ranked.len(),
            "Generated suggestions"
        );
        self.cache.insert(signature, ranked.clone());
        ranked
    }

    fn generate(&self, context: &DetectedContext, language: Option<&str>) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        if let Some(dataset) = self.dataset.as_deref() {
            if context.categories.contains(&ContextKind::Programming) {
                suggestions.extend(concept_suggestions(dataset, context));
            }
            suggestions.extend(phrase_suggestions(dataset, context));
            if let Some(language) = language {
                suggestions.extend(language_suggestions(language));
            }
        }

        suggestions.extend(fallback_suggestions());
        suggestions
    }

    pub fn cached_contexts(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Swaps in a new dataset; memoized results from the old one are dropped.
    pub fn update_data(&mut self, dataset: Arc<SuggestionDataset>) {
        self.dataset = Some(dataset);
        self.clear_cache();
    }
}

fn concept_suggestions(dataset: &SuggestionDataset, context: &DetectedContext) -> Vec<Suggestion> {
    dataset
        .concept_suggestions
        .iter()
        .filter(|entry| {
            context
                .keywords
                .iter()
                .any(|keyword| entry.text.contains(keyword))
        })
        .take(CONCEPT_LIMIT)
        .map(|entry| {
            let rank = FREQUENCY_CEILING - entry.frequency.min(FREQUENCY_CEILING);
            Suggestion::new(
                entry.text.clone(),
                format!(
                    "Programming concept: {} (used {} times)",
                    entry.concept, entry.frequency
                ),
                format!("1_{rank:06}_{}", entry.text),
                SuggestionKind::Concept,
            )
        })
        .collect()
}

fn phrase_suggestions(dataset: &SuggestionDataset, context: &DetectedContext) -> Vec<Suggestion> {
    let category = context.kind.phrase_bucket();
    dataset
        .phrases
        .get(category)
        .iter()
        .take(PHRASE_LIMIT)
        .enumerate()
        .map(|(index, phrase)| {
            Suggestion::new(
                phrase.clone(),
                format!("{} observation from real teaching notes", category.as_str()),
                format!("2_{index:02}_{phrase}"),
                SuggestionKind::Phrase,
            )
        })
        .collect()
}

fn language_suggestions(language: &str) -> Vec<Suggestion> {
    let templates = [
        format!("demonstrated understanding of {language} syntax and conventions"),
        format!("effectively used {language} built-in functions and libraries"),
        format!("showed proficiency with {language} data structures and methods"),
    ];

    templates
        .into_iter()
        .enumerate()
        .map(|(index, template)| {
            let sort_text = format!("3_{index:02}_{template}");
            Suggestion::new(
                template,
                format!("{language}-specific observation template"),
                sort_text,
                SuggestionKind::Language,
            )
        })
        .collect()
}

fn fallback_suggestions() -> Vec<Suggestion> {
    FALLBACK_PHRASES
        .iter()
        .enumerate()
        .map(|(index, phrase)| {
            Suggestion::new(
                phrase.to_string(),
                "General teaching observation".to_string(),
                format!("9_{index:02}_{phrase}"),
                SuggestionKind::General,
            )
        })
        .collect()
}

fn rank(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| a.sort_text.cmp(&b.sort_text));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::fallback_dataset;
    use crate::models::{ConceptSuggestion, PhraseBuckets};

    fn rich_dataset() -> SuggestionDataset {
        let concept_suggestions = (0..40)
            .map(|i| ConceptSuggestion {
                text: format!("demonstrated understanding of loop pattern {i}"),
                concept: format!("loop pattern {i}"),
                frequency: i,
            })
            .collect();
        let phrases = (0..30).map(|i| format!("neutral phrase number {i}")).collect();

        SuggestionDataset {
            concept_suggestions,
            phrases: PhraseBuckets {
                neutral: phrases,
                constructive: vec!["needed additional support with recursion".to_string()],
                ..PhraseBuckets::default()
            },
            ..SuggestionDataset::default()
        }
    }

    #[test]
    fn detects_challenges_and_maps_to_constructive() {
        let context = detect_context("struggled with the");
        assert_eq!(context.kind, ContextKind::Challenges);
        assert_eq!(context.keywords, vec!["struggle"]);
        assert_eq!(context.kind.phrase_bucket(), PhraseCategory::Constructive);

        let mut engine = SuggestionEngine::new(Some(Arc::new(rich_dataset())));
        let suggestions = engine.get_suggestions("struggled with the", 18, None);
        let phrases: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Phrase)
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(phrases, vec!["needed additional support with recursion"]);
    }

    #[test]
    fn primary_kind_follows_category_order() {
        let context = detect_context("great work on the loop");
        assert_eq!(context.kind, ContextKind::Programming);
        assert_eq!(
            context.categories,
            vec![ContextKind::Programming, ContextKind::Positive]
        );
        assert_eq!(context.keywords, vec!["loop", "great"]);

        assert_eq!(detect_context("").kind, ContextKind::General);
    }

    #[test]
    fn only_recent_words_count() {
        let text = "struggled one two three four five six seven eight nine ten";
        assert_eq!(detect_context(text).kind, ContextKind::General);
    }

    #[test]
    fn merges_streams_in_priority_bands() {
        let mut engine = SuggestionEngine::new(Some(Arc::new(rich_dataset())));
        let suggestions = engine.get_suggestions("nested loop", 12, Some("Python"));

        assert_eq!(suggestions.len(), 15 + 20 + 3 + 5);
        assert!(suggestions.len() <= MAX_SUGGESTIONS);

        let kinds: Vec<SuggestionKind> = suggestions.iter().map(|s| s.kind).collect();
        assert!(kinds[..15].iter().all(|k| *k == SuggestionKind::Concept));
        assert!(kinds[15..35].iter().all(|k| *k == SuggestionKind::Phrase));
        assert!(kinds[35..38].iter().all(|k| *k == SuggestionKind::Language));
        assert!(kinds[38..].iter().all(|k| *k == SuggestionKind::General));

        // The first 15 matching concepts are kept, highest frequency first.
        assert_eq!(suggestions[0].label, "demonstrated understanding of loop pattern 14");
        assert_eq!(suggestions[14].label, "demonstrated understanding of loop pattern 0");
        assert_eq!(suggestions[15].label, "neutral phrase number 0");
        assert_eq!(suggestions[0].insert_text, "- demonstrated understanding of loop pattern 14");
        assert_eq!(
            suggestions[35].label,
            "demonstrated understanding of Python syntax and conventions"
        );
    }

    #[test]
    fn concepts_need_a_programming_context() {
        let mut engine = SuggestionEngine::new(Some(Arc::new(fallback_dataset())));
        let suggestions = engine.get_suggestions("She struggled with the", 23, None);

        assert!(suggestions.iter().all(|s| s.kind != SuggestionKind::Concept));
        assert_eq!(suggestions[0].label, "needed additional support with complex concepts");
        assert_eq!(suggestions[0].kind, SuggestionKind::Phrase);
    }

    #[test]
    fn without_dataset_only_fallbacks_are_offered() {
        let mut engine = SuggestionEngine::default();
        let suggestions = engine.get_suggestions("loop", 4, Some("Python"));
        assert_eq!(suggestions.len(), 5);
        assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::General));
        assert_eq!(suggestions[0].label, FALLBACK_PHRASES[0]);
    }

    #[test]
    fn results_are_memoized_per_signature() {
        let mut engine = SuggestionEngine::new(Some(Arc::new(fallback_dataset())));
        let first = engine.get_suggestions("great loop", 10, None);
        let second = engine.get_suggestions("another great loop", 18, None);
        assert_eq!(first, second);
        assert_eq!(engine.cached_contexts(), 1);

        engine.get_suggestions("great loop", 10, Some("Java"));
        assert_eq!(engine.cached_contexts(), 2);

        engine.clear_cache();
        assert_eq!(engine.cached_contexts(), 0);
    }

    #[test]
    fn update_data_drops_stale_results() {
        let mut engine = SuggestionEngine::new(Some(Arc::new(fallback_dataset())));
        let before = engine.get_suggestions("nested loop", 11, None);
        assert_eq!(before[0].label, "demonstrated understanding of for loops");

        engine.update_data(Arc::new(rich_dataset()));
        assert_eq!(engine.cached_contexts(), 0);
        let after = engine.get_suggestions("nested loop", 11, None);
        assert_eq!(after[0].label, "demonstrated understanding of loop pattern 14");
    }
}
