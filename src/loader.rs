use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::analyzer;
use crate::error::CorpusError;
use crate::models::{
    ConceptCount, ConceptSuggestion, DatasetStats, PhraseBuckets, RawNoteRecord, RawStudentRecord,
    SuggestionDataset, TagCount,
};
use crate::sanitize;

/// Where the raw corpus document comes from.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<RawStudentRecord>, CorpusError>;
}

pub struct HttpCorpusSource {
    client: Client,
    url: String,
}

impl HttpCorpusSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CorpusSource for HttpCorpusSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<RawStudentRecord>, CorpusError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(CorpusError::Status(response.status()));
        }
        let body = response.bytes().await?;
        parse_json_corpus(&body)
    }
}

pub struct FileCorpusSource {
    path: PathBuf,
}

impl FileCorpusSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

#[async_trait]
impl CorpusSource for FileCorpusSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<RawStudentRecord>, CorpusError> {
        let body = tokio::fs::read(&self.path).await?;
        if self.is_csv() {
            parse_csv_corpus(&body)
        } else {
            parse_json_corpus(&body)
        }
    }
}

/// Picks a network or file source from a user-supplied location.
pub fn source_for(location: &str) -> Box<dyn CorpusSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpCorpusSource::new(location))
    } else {
        Box::new(FileCorpusSource::new(Path::new(location)))
    }
}

pub fn parse_json_corpus(body: &[u8]) -> Result<Vec<RawStudentRecord>, CorpusError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_array() {
        return Err(CorpusError::Malformed);
    }
    Ok(serde_json::from_value(value)?)
}

/// Reads a flat CSV export, one row per note, grouping rows by student name.
pub fn parse_csv_corpus(body: &[u8]) -> Result<Vec<RawStudentRecord>, CorpusError> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        student_name: Option<String>,
        session_notes: Option<String>,
        working_concepts: Option<String>,
        language_focus: Option<String>,
        application: Option<String>,
        date_written: Option<String>,
    }

    let mut reader = csv::Reader::from_reader(body);
    let mut students: Vec<RawStudentRecord> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let note = RawNoteRecord {
            session_notes: row.session_notes,
            working_concepts: row.working_concepts,
            language_focus: row.language_focus,
            application: row.application,
            author_info: None,
            date_written: row.date_written,
        };

        let slot = match row.student_name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => *by_name.entry(name.to_string()).or_insert_with(|| {
                students.push(RawStudentRecord {
                    student_name: Some(name.to_string()),
                    ..RawStudentRecord::default()
                });
                students.len() - 1
            }),
            None => {
                students.push(RawStudentRecord::default());
                students.len() - 1
            }
        };
        students[slot].notes.push(note);
    }

    Ok(students)
}

/// Small literal dataset served whenever the corpus cannot be loaded.
pub fn fallback_dataset() -> SuggestionDataset {
    fn concept(concept: &str, frequency: usize) -> ConceptCount {
        ConceptCount {
            concept: concept.to_string(),
            frequency,
        }
    }

    fn suggestion(text: &str, concept: &str, frequency: usize) -> ConceptSuggestion {
        ConceptSuggestion {
            text: text.to_string(),
            concept: concept.to_string(),
            frequency,
        }
    }

    fn tag(tag: &str, count: usize) -> TagCount {
        TagCount {
            tag: tag.to_string(),
            count,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    let top_concepts = vec![
        concept("for loop", 50),
        concept("conditionals", 45),
        concept("variables", 40),
        concept("functions", 35),
        concept("lists", 30),
        concept("input", 25),
    ];

    let phrases = PhraseBuckets {
        positive: strings(&[
            "did an excellent job demonstrating their understanding",
            "showed strong problem-solving skills throughout the session",
            "applied concepts effectively and with confidence",
            "demonstrated impressive focus and engagement",
            "worked independently with minimal guidance needed",
        ]),
        constructive: strings(&[
            "needed additional support with complex concepts",
            "benefited from step-by-step guidance during problems",
            "required assistance with debugging techniques",
            "would benefit from additional practice with fundamentals",
        ]),
        progress: strings(&[
            "made significant improvement from previous sessions",
            "showed growing confidence with programming concepts",
            "demonstrated clear progress in problem-solving approach",
            "exhibited developing understanding of core principles",
        ]),
        challenges: Vec::new(),
        neutral: strings(&[
            "participated in class discussions and activities",
            "completed assigned exercises during the session",
            "followed along with instruction and examples",
            "asked clarifying questions when needed",
        ]),
    };

    let languages = vec![tag("Python", 200), tag("JavaScript", 150), tag("Java", 100)];
    let applications = vec![
        tag("Warm-up Exercise", 80),
        tag("Main Project", 70),
        tag("Practice Problems", 60),
    ];

    let stats = DatasetStats {
        total_students: 0,
        total_notes: 0,
        unique_concepts: top_concepts.len(),
        unique_phrases: phrases.total(),
        languages: languages.len(),
        applications: applications.len(),
    };

    SuggestionDataset {
        concept_suggestions: vec![
            suggestion("demonstrated understanding of for loops", "for loop", 50),
            suggestion("applied conditionals effectively", "conditionals", 45),
            suggestion("showed mastery of variable usage", "variables", 40),
        ],
        top_concepts,
        phrases,
        languages,
        applications,
        stats,
    }
}

/// Fetches, sanitizes and analyzes the corpus once, then serves the cached result.
pub struct DataLoader {
    source: Box<dyn CorpusSource>,
    cache: Mutex<Option<Arc<SuggestionDataset>>>,
    loading: AtomicBool,
}

impl DataLoader {
    pub fn new(source: Box<dyn CorpusSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
            loading: AtomicBool::new(false),
        }
    }

    /// Callers arriving while a load is in flight wait on the same lock and
    /// receive the `Arc` the first caller stored.
    pub async fn load_dataset(&self) -> Arc<SuggestionDataset> {
        let mut cache = self.cache.lock().await;
        if let Some(dataset) = cache.as_ref() {
            return Arc::clone(dataset);
        }

        self.loading.store(true, Ordering::SeqCst);
        let dataset = Arc::new(self.perform_load().await);
        self.loading.store(false, Ordering::SeqCst);

        *cache = Some(Arc::clone(&dataset));
        dataset
    }

    async fn perform_load(&self) -> SuggestionDataset {
        let location = self.source.describe();
        debug!(%location, "Loading corpus");

        match self.source.fetch().await {
            Ok(raw) => {
                let students = sanitize::sanitize_corpus(raw);
                let dataset = analyzer::analyze(&students);
                info!(
                    %location,
                    students = dataset.stats.total_students,
                    notes = dataset.stats.total_notes,
                    "Corpus loaded"
                );
                dataset
            }
            Err(err) => {
                warn!(%location, error = %err, "Failed to load corpus, using fallback dataset");
                fallback_dataset()
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Cached dataset without triggering a load. `None` while a load holds the lock.
    pub fn cached(&self) -> Option<Arc<SuggestionDataset>> {
        self.cache.try_lock().ok().and_then(|cache| cache.clone())
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        body: &'static str,
    }

    #[async_trait]
    impl CorpusSource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        async fn fetch(&self) -> Result<Vec<RawStudentRecord>, CorpusError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            parse_json_corpus(self.body.as_bytes())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CorpusSource for FailingSource {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        async fn fetch(&self) -> Result<Vec<RawStudentRecord>, CorpusError> {
            Err(CorpusError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    const SCENARIO: &str = r#"[{
        "student_name": "Alex",
        "notes": [{
            "working_concepts": "for loop, variables",
            "session_notes": "Alex did a great job demonstrating for loops."
        }]
    }]"#;

    fn counting(fetches: &Arc<AtomicUsize>) -> DataLoader {
        DataLoader::new(Box::new(CountingSource {
            fetches: Arc::clone(fetches),
            body: SCENARIO,
        }))
    }

    #[test]
    fn fallback_stats_match_its_content() {
        let dataset = fallback_dataset();
        assert_eq!(dataset.stats.unique_phrases, 17);
        assert_eq!(dataset.stats.unique_phrases, dataset.phrases.total());
        assert_eq!(dataset.stats.unique_concepts, 6);
        assert_eq!(dataset.stats.total_notes, 0);
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_fetch() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let loader = counting(&fetches);

        let (a, b, c) = tokio::join!(
            loader.load_dataset(),
            loader.load_dataset(),
            loader.load_dataset()
        );

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn cache_survives_until_cleared() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let loader = counting(&fetches);

        assert!(loader.cached().is_none());
        let first = loader.load_dataset().await;
        let second = loader.load_dataset().await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(loader.cached().is_some());

        loader.clear_cache().await;
        assert!(loader.cached().is_none());
        let third = loader.load_dataset().await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(*first, *third);
    }

    #[tokio::test]
    async fn sanitizes_before_analysis() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let dataset = counting(&fetches).load_dataset().await;

        assert_eq!(
            dataset.phrases.positive,
            vec!["the student did a great job demonstrating for loops.".to_string()]
        );
        let concepts: Vec<(&str, usize)> = dataset
            .top_concepts
            .iter()
            .map(|entry| (entry.concept.as_str(), entry.frequency))
            .collect();
        assert_eq!(concepts, vec![("for loop", 1), ("variables", 1)]);
    }

    #[tokio::test]
    async fn fetch_failure_resolves_to_fallback() {
        let loader = DataLoader::new(Box::new(FailingSource));
        let dataset = loader.load_dataset().await;

        assert_eq!(dataset.stats.total_students, 0);
        assert_eq!(*dataset, fallback_dataset());
    }

    #[tokio::test]
    async fn network_error_resolves_to_fallback() {
        let loader = DataLoader::new(source_for("http://127.0.0.1:1/scraped_notes.json"));
        let dataset = loader.load_dataset().await;

        assert_eq!(dataset.stats.total_students, 0);
    }

    #[tokio::test]
    async fn reads_json_and_csv_files() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(SCENARIO.as_bytes()).unwrap();
        let records = FileCorpusSource::new(json.path()).fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].notes.len(), 1);

        let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        csv.write_all(
            b"student_name,session_notes,working_concepts,language_focus,application,date_written\n\
              Alex,Alex did a great job.,for loop,Python,Warm Up,1/2/2024\n\
              Riley,Riley struggled with lists.,lists,Python,,\n\
              Alex,Alex solved it.,variables,,,\n",
        )
        .unwrap();
        let records = FileCorpusSource::new(csv.path()).fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].notes.len(), 2);
        assert_eq!(records[1].student_name.as_deref(), Some("Riley"));
    }

    #[tokio::test]
    async fn malformed_document_falls_back() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"students": []}"#).unwrap();

        let source = FileCorpusSource::new(file.path());
        assert!(matches!(source.fetch().await, Err(CorpusError::Malformed)));

        let dataset = DataLoader::new(Box::new(source)).load_dataset().await;
        assert_eq!(*dataset, fallback_dataset());
    }
}
