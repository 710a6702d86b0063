use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Student entry as it arrives in the corpus document, before sanitization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStudentRecord {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub author_info: Option<serde_json::Value>,
    #[serde(default)]
    pub notes: Vec<RawNoteRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNoteRecord {
    #[serde(default)]
    pub session_notes: Option<String>,
    #[serde(default)]
    pub working_concepts: Option<String>,
    #[serde(default)]
    pub language_focus: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub author_info: Option<serde_json::Value>,
    #[serde(default)]
    pub date_written: Option<String>,
}

/// A sanitized observation entry. Identifying fields do not exist at this stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteRecord {
    pub session_notes: Option<String>,
    pub working_concepts: Option<String>,
    pub language_focus: Option<String>,
    pub application: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRecord {
    pub notes: Vec<NoteRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseCategory {
    Positive,
    Constructive,
    Progress,
    Challenges,
    Neutral,
}

impl PhraseCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PhraseCategory::Positive => "positive",
            PhraseCategory::Constructive => "constructive",
            PhraseCategory::Progress => "progress",
            PhraseCategory::Challenges => "challenges",
            PhraseCategory::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptCount {
    pub concept: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSuggestion {
    pub text: String,
    pub concept: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseBuckets {
    pub positive: Vec<String>,
    pub constructive: Vec<String>,
    pub progress: Vec<String>,
    pub challenges: Vec<String>,
    pub neutral: Vec<String>,
}

impl PhraseBuckets {
    pub fn get(&self, category: PhraseCategory) -> &[String] {
        match category {
            PhraseCategory::Positive => &self.positive,
            PhraseCategory::Constructive => &self.constructive,
            PhraseCategory::Progress => &self.progress,
            PhraseCategory::Challenges => &self.challenges,
            PhraseCategory::Neutral => &self.neutral,
        }
    }

    pub fn get_mut(&mut self, category: PhraseCategory) -> &mut Vec<String> {
        match category {
            PhraseCategory::Positive => &mut self.positive,
            PhraseCategory::Constructive => &mut self.constructive,
            PhraseCategory::Progress => &mut self.progress,
            PhraseCategory::Challenges => &mut self.challenges,
            PhraseCategory::Neutral => &mut self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive.len()
            + self.constructive.len()
            + self.progress.len()
            + self.challenges.len()
            + self.neutral.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_students: usize,
    pub total_notes: usize,
    pub unique_concepts: usize,
    pub unique_phrases: usize,
    pub languages: usize,
    pub applications: usize,
}

/// Everything the suggestion engine needs, produced once per corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionDataset {
    pub top_concepts: Vec<ConceptCount>,
    pub concept_suggestions: Vec<ConceptSuggestion>,
    pub phrases: PhraseBuckets,
    pub languages: Vec<TagCount>,
    pub applications: Vec<TagCount>,
    pub stats: DatasetStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub id: Uuid,
    pub name: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub word_count: usize,
    pub concepts_found: usize,
}
