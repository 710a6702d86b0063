//! Privacy scrubbing applied to every corpus record before analysis.
//!
//! Identifying fields are dropped by converting the raw wire records into
//! [`StudentRecord`]/[`NoteRecord`], which have nowhere to keep them. Narrative
//! text is rewritten so names and written dates never reach the analyzer.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::{NoteRecord, RawNoteRecord, RawStudentRecord, StudentRecord};

pub const STUDENT_PLACEHOLDER: &str = "the student";
pub const DATE_PLACEHOLDER: &str = "during a recent session";

pub const NAME_DENYLIST: &[&str] = &[
    "Alexis", "Zoe", "Chelsea", "Thomas", "Samay", "Oliver", "Dylan", "Bradley", "Camden",
    "Alejandro", "Pablo", "Anderson", "Chang", "Kaya", "Concepcion", "Deng", "Parekh", "Garcia",
    "Shah", "Hogue", "Tsang", "Alex", "Sam", "Chris", "Jordan", "Taylor", "Morgan", "Casey",
    "Riley", "Avery", "Quinn", "Blake", "Cameron", "Dakota", "Emery", "Hayden", "Jamie", "Kai",
    "Logan", "Parker", "Peyton", "Reese", "Sage", "Skyler",
];

pub const SAFE_TERMS: &[&str] = &[
    "Warm", "Up", "Main", "Activity", "Project", "Python", "JavaScript", "Java", "Big", "Idea",
    "Temperature", "Converter", "Perfect", "Number", "Checker", "Keep", "Fantastic", "Great",
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "January",
    "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

static DENYLIST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let names: Vec<String> = NAME_DENYLIST.iter().map(|name| regex::escape(name)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", names.join("|"))).expect("Valid denylist regex")
});

static CAPITALIZED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\p{Lu}\p{Ll}+\b").expect("Valid capitalized word regex"));

static POSSESSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bthe student's\b").expect("Valid possessive regex"));

static REPEATED_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bthe student\s+the student\b").expect("Valid repeated placeholder regex")
});

static WRITTEN_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b")
        .expect("Valid written date regex")
});

static SLASH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").expect("Valid slash date regex")
});

/// Rewrites narrative text so no name or written date survives.
pub fn scrub_narrative(text: &str) -> String {
    let scrubbed = DENYLIST_PATTERN.replace_all(text, STUDENT_PLACEHOLDER);

    // Dates go before the capitalized-word pass so abbreviated months are still recognizable.
    let scrubbed = WRITTEN_DATE.replace_all(&scrubbed, DATE_PLACEHOLDER);
    let scrubbed = SLASH_DATE.replace_all(&scrubbed, DATE_PLACEHOLDER);

    let scrubbed = CAPITALIZED_WORD.replace_all(&scrubbed, |caps: &Captures| {
        let word = &caps[0];
        if SAFE_TERMS.contains(&word) {
            word.to_string()
        } else {
            STUDENT_PLACEHOLDER.to_string()
        }
    });

    let mut scrubbed = POSSESSIVE
        .replace_all(&scrubbed, "the student's")
        .into_owned();
    loop {
        let collapsed = REPEATED_PLACEHOLDER.replace_all(&scrubbed, STUDENT_PLACEHOLDER);
        if collapsed == scrubbed {
            break;
        }
        scrubbed = collapsed.into_owned();
    }
    scrubbed
}

fn sanitize_note(note: RawNoteRecord) -> NoteRecord {
    NoteRecord {
        session_notes: note.session_notes.as_deref().map(scrub_narrative),
        working_concepts: note.working_concepts,
        language_focus: note.language_focus,
        application: note.application,
    }
}

pub fn sanitize_student(student: RawStudentRecord) -> StudentRecord {
    StudentRecord {
        notes: student.notes.into_iter().map(sanitize_note).collect(),
    }
}

pub fn sanitize_corpus(students: Vec<RawStudentRecord>) -> Vec<StudentRecord> {
    students.into_iter().map(sanitize_student).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_denylisted_names() {
        assert_eq!(
            scrub_narrative("Alex did a great job demonstrating for loops."),
            "the student did a great job demonstrating for loops."
        );
        assert_eq!(
            scrub_narrative("we paired alex with RILEY on lists."),
            "we paired the student with the student on lists."
        );
    }

    #[test]
    fn leaves_no_denylisted_name_behind() {
        let text = "Zoe and Avery helped Chang; later chelsea asked Quinn about loops.";
        let scrubbed = scrub_narrative(text).to_lowercase();
        for name in NAME_DENYLIST {
            let pattern = Regex::new(&format!(r"\b{}\b", name.to_lowercase())).unwrap();
            assert!(!pattern.is_match(&scrubbed), "{name} survived in {scrubbed}");
        }
    }

    #[test]
    fn replaces_unknown_capitalized_words_but_keeps_safe_terms() {
        assert_eq!(
            scrub_narrative("Priya wrote Python on Monday."),
            "the student wrote Python on Monday."
        );
    }

    #[test]
    fn replaces_accented_names() {
        assert_eq!(
            scrub_narrative("Zoë struggled with lists."),
            "the student struggled with lists."
        );
        assert_eq!(
            scrub_narrative("Renée asked Chloé for help."),
            "the student asked the student for help."
        );
    }

    #[test]
    fn collapses_duplicates_and_normalizes_possessives() {
        assert_eq!(
            scrub_narrative("Alex Garcia Tsang finished the task."),
            "the student finished the task."
        );
        assert_eq!(
            scrub_narrative("Reviewed Kai's code."),
            "the student's code."
        );
    }

    #[test]
    fn replaces_written_dates() {
        assert_eq!(
            scrub_narrative("on Jan 5, 2024 we covered loops"),
            "on during a recent session we covered loops"
        );
        assert_eq!(
            scrub_narrative("graded on 3/14/24 after class"),
            "graded on during a recent session after class"
        );
        assert_eq!(
            scrub_narrative("on march 3 2025 we met"),
            "on during a recent session we met"
        );
    }

    #[test]
    fn drops_identifying_fields() {
        let raw: Vec<RawStudentRecord> = serde_json::from_str(
            r#"[{
                "student_name": "Alex Chang",
                "author_info": {"name": "Ms. Deng"},
                "notes": [{
                    "session_notes": "Alex did a great job demonstrating for loops.",
                    "working_concepts": "for loop, variables",
                    "language_focus": "Python",
                    "author_info": "Ms. Deng",
                    "date_written": "Jan 5, 2024"
                }]
            }]"#,
        )
        .unwrap();

        let sanitized = sanitize_corpus(raw);
        assert_eq!(sanitized.len(), 1);
        let note = &sanitized[0].notes[0];
        assert_eq!(
            note.session_notes.as_deref(),
            Some("the student did a great job demonstrating for loops.")
        );
        assert_eq!(note.working_concepts.as_deref(), Some("for loop, variables"));
        assert_eq!(note.language_focus.as_deref(), Some("Python"));
        assert_eq!(note.application, None);
    }
}
