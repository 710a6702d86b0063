use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::models::{
    ConceptCount, ConceptSuggestion, DatasetStats, NoteRecord, PhraseBuckets, PhraseCategory,
    StudentRecord, SuggestionDataset, TagCount,
};

const TOP_CONCEPT_LIMIT: usize = 50;
const SUGGESTION_CONCEPT_LIMIT: usize = 15;
const APPLICATION_LIMIT: usize = 20;

// Phrase lengths are kept when strictly inside this window, in characters.
const PHRASE_MIN_CHARS: usize = 20;
const PHRASE_MAX_CHARS: usize = 200;

const CONCEPT_TEMPLATES: [&str; 10] = [
    "demonstrated understanding of {concept}",
    "applied {concept} effectively in their solution",
    "showed mastery of {concept} implementation",
    "struggled with {concept} syntax initially",
    "made good progress with {concept} fundamentals",
    "needed additional support with {concept}",
    "creatively used {concept} in their approach",
    "debugged {concept}-related errors independently",
    "explained {concept} clearly to peers",
    "connected {concept} to previous learning",
];

/// A named sentence pattern anchored on a lexical cue.
pub struct PhraseRule {
    pub name: &'static str,
    pattern: Regex,
}

impl PhraseRule {
    fn new(name: &'static str, cue: &str) -> Self {
        let pattern = Regex::new(&format!(r"(?i)[A-Z][^.!?]*{cue}[^.!?]*[.!?]"))
            .expect("Valid phrase rule regex");
        Self { name, pattern }
    }

    pub fn find_all<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.pattern.find_iter(text).map(|m| m.as_str())
    }
}

static PHRASE_RULES: Lazy<Vec<PhraseRule>> = Lazy::new(|| {
    vec![
        PhraseRule::new(
            "achievement",
            r"(?:did a? (?:great|excellent|fantastic|amazing|wonderful|outstanding) job|performed (?:well|excellently|admirably))",
        ),
        PhraseRule::new(
            "demonstration",
            r"(?:demonstrated|showed|exhibited|displayed) (?:strong|excellent|impressive|solid|good|remarkable)",
        ),
        PhraseRule::new(
            "application",
            r"(?:applied|used|utilized|implemented) [^.!?]*(?:effectively|successfully|skillfully|confidently)",
        ),
        PhraseRule::new(
            "comprehension",
            r"(?:grasped|understood|mastered|learned|picked up)[^.!?]*(?:quickly|easily|well|effectively)",
        ),
        PhraseRule::new(
            "progress",
            r"(?:made (?:significant|great|good|solid|impressive) (?:progress|improvement|strides))",
        ),
        PhraseRule::new(
            "focus",
            r"(?:worked|engaged|focused|concentrated) (?:independently|diligently|hard|effectively)",
        ),
        PhraseRule::new(
            "problem_solving",
            r"(?:broke down|approached|tackled|solved) [^.!?]*(?:systematically|methodically|logically|creatively)",
        ),
        PhraseRule::new(
            "debugging",
            r"(?:debugged|troubleshot|identified|resolved)",
        ),
        PhraseRule::new(
            "struggle",
            r"(?:struggled|had difficulty|found challenging|needed (?:help|support|guidance))",
        ),
        PhraseRule::new(
            "support",
            r"(?:required|benefited from) (?:additional|extra|more|some) (?:support|guidance|explanation|practice)",
        ),
        PhraseRule::new(
            "participation",
            r"(?:participated|engaged|contributed) (?:actively|enthusiastically|well|effectively)",
        ),
        PhraseRule::new(
            "questioning",
            r"(?:asked|posed) (?:thoughtful|insightful|good|relevant) questions?",
        ),
    ]
});

// Checked in this order; the first hit decides the bucket.
static CATEGORY_RULES: Lazy<Vec<(PhraseCategory, Regex)>> = Lazy::new(|| {
    let table = [
        (
            PhraseCategory::Positive,
            r"(?i)(?:excellent|great|fantastic|outstanding|impressive|strong|good|well|effectively|successfully|confidently|enthusiastically|actively)",
        ),
        (
            PhraseCategory::Constructive,
            r"(?i)(?:struggled|difficulty|challenging|needed help|required support|benefited from|could improve|should focus)",
        ),
        (
            PhraseCategory::Progress,
            r"(?i)(?:improvement|progress|growth|development|mastered|learned|grasped|picked up)",
        ),
        (
            PhraseCategory::Challenges,
            r"(?i)(?:obstacles|barriers|difficulties|challenges|problems|issues|confusion)",
        ),
    ];
    table
        .into_iter()
        .map(|(category, pattern)| {
            (
                category,
                Regex::new(pattern).expect("Valid category regex"),
            )
        })
        .collect()
});

pub fn phrase_rules() -> &'static [PhraseRule] {
    &PHRASE_RULES
}

/// Counter that remembers first-seen order so rankings are reproducible.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries by descending count; equal counts stay in first-seen order.
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut values = self.entries.clone();
        values.sort_by(|a, b| b.1.cmp(&a.1));
        values
    }
}

fn notes(students: &[StudentRecord]) -> impl Iterator<Item = &NoteRecord> {
    students.iter().flat_map(|student| student.notes.iter())
}

pub fn extract_concepts(students: &[StudentRecord]) -> FrequencyTable {
    let mut table = FrequencyTable::default();

    for note in notes(students) {
        let Some(field) = note.working_concepts.as_deref() else {
            continue;
        };
        for concept in field.split(',') {
            let concept = concept.trim().to_lowercase();
            if !concept.is_empty() {
                table.add(&concept);
            }
        }
    }

    table
}

/// Pools every rule match, dedups, applies the length window and orders by length.
pub fn extract_phrases(students: &[StudentRecord], rules: &[PhraseRule]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut phrases = Vec::new();

    for note in notes(students) {
        let Some(text) = note.session_notes.as_deref() else {
            continue;
        };
        for rule in rules {
            for found in rule.find_all(text) {
                let phrase = found.trim();
                if seen.insert(phrase.to_string()) {
                    phrases.push(phrase.to_string());
                }
            }
        }
    }

    phrases.retain(|phrase| {
        let len = phrase.chars().count();
        len > PHRASE_MIN_CHARS && len < PHRASE_MAX_CHARS
    });
    phrases.sort_by_key(|phrase| phrase.chars().count());
    phrases
}

pub fn categorize_phrase(phrase: &str) -> PhraseCategory {
    CATEGORY_RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(phrase))
        .map(|(category, _)| *category)
        .unwrap_or(PhraseCategory::Neutral)
}

pub fn categorize(phrases: &[String]) -> PhraseBuckets {
    let mut buckets = PhraseBuckets::default();
    for phrase in phrases {
        buckets.get_mut(categorize_phrase(phrase)).push(phrase.clone());
    }
    buckets
}

fn tally_tags<F>(students: &[StudentRecord], field: F) -> FrequencyTable
where
    F: Fn(&NoteRecord) -> Option<&str>,
{
    let mut table = FrequencyTable::default();
    for note in notes(students) {
        if let Some(tag) = field(note).map(str::trim).filter(|tag| !tag.is_empty()) {
            table.add(tag);
        }
    }
    table
}

pub fn concept_suggestions(top_concepts: &[ConceptCount]) -> Vec<ConceptSuggestion> {
    top_concepts
        .iter()
        .take(SUGGESTION_CONCEPT_LIMIT)
        .flat_map(|entry| {
            CONCEPT_TEMPLATES.iter().map(move |template| ConceptSuggestion {
                text: template.replacen("{concept}", &entry.concept, 1),
                concept: entry.concept.clone(),
                frequency: entry.frequency,
            })
        })
        .collect()
}

fn cap(mut values: Vec<String>, limit: usize) -> Vec<String> {
    values.truncate(limit);
    values
}

fn to_tag_counts(table: &FrequencyTable, limit: Option<usize>) -> Vec<TagCount> {
    table
        .ranked()
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(tag, count)| TagCount { tag, count })
        .collect()
}

#[tracing::instrument(skip_all, fields(students = students.len()))]
pub fn analyze(students: &[StudentRecord]) -> SuggestionDataset {
    let total_notes: usize = students.iter().map(|student| student.notes.len()).sum();
    debug!("Analyzing {} students with {} notes", students.len(), total_notes);

    let concepts = extract_concepts(students);
    let phrases = extract_phrases(students, phrase_rules());
    let buckets = categorize(&phrases);
    let languages = tally_tags(students, |note| note.language_focus.as_deref());
    let applications = tally_tags(students, |note| note.application.as_deref());

    let top_concepts: Vec<ConceptCount> = concepts
        .ranked()
        .into_iter()
        .take(TOP_CONCEPT_LIMIT)
        .map(|(concept, frequency)| ConceptCount { concept, frequency })
        .collect();

    let stats = DatasetStats {
        total_students: students.len(),
        total_notes,
        unique_concepts: concepts.len(),
        unique_phrases: phrases.len(),
        languages: languages.len(),
        applications: applications.len(),
    };

    info!(
        students = stats.total_students,
        notes = stats.total_notes,
        concepts = stats.unique_concepts,
        phrases = stats.unique_phrases,
        "Corpus analysis complete"
    );

    SuggestionDataset {
        concept_suggestions: concept_suggestions(&top_concepts),
        top_concepts,
        phrases: PhraseBuckets {
            positive: cap(buckets.positive, 30),
            constructive: cap(buckets.constructive, 20),
            progress: cap(buckets.progress, 25),
            challenges: cap(buckets.challenges, 15),
            neutral: cap(buckets.neutral, 20),
        },
        languages: to_tag_counts(&languages, None),
        applications: to_tag_counts(&applications, Some(APPLICATION_LIMIT)),
        stats,
    }
}
