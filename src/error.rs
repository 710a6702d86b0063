use thiserror::Error;

/// Failures while fetching or decoding the corpus. The loader recovers from
/// all of them with the built-in dataset.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("corpus request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corpus CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("corpus is not a sequence of student records")]
    Malformed,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please enter a student name")]
    MissingStudentName,

    #[error("Please add some notes for this student")]
    MissingNotes,

    #[error("No students in batch to process")]
    EmptyBatch,
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("failed to launch {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("failed to write to {command}: {source}")]
    Write {
        command: String,
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    Exit { command: String, status: String },

    #[error("all clipboard mechanisms failed (primary: {primary}; fallback: {fallback})")]
    Exhausted {
        primary: Box<ClipboardError>,
        fallback: Box<ClipboardError>,
    },
}
