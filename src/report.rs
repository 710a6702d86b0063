use std::fmt::Write;

use crate::models::{PhraseCategory, SuggestionDataset};

const BUCKET_ORDER: [PhraseCategory; 5] = [
    PhraseCategory::Positive,
    PhraseCategory::Constructive,
    PhraseCategory::Progress,
    PhraseCategory::Challenges,
    PhraseCategory::Neutral,
];

pub fn build_report(source: &str, dataset: &SuggestionDataset, limit: usize) -> String {
    let mut output = String::new();
    let stats = &dataset.stats;

    let _ = writeln!(output, "# Teaching Notes Corpus Report");
    let _ = writeln!(output, "Generated from {}", source);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- {} students, {} notes",
        stats.total_students, stats.total_notes
    );
    let _ = writeln!(
        output,
        "- {} distinct concepts, {} distinct phrases",
        stats.unique_concepts, stats.unique_phrases
    );
    let _ = writeln!(
        output,
        "- {} languages, {} applications",
        stats.languages, stats.applications
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Concepts");
    if dataset.top_concepts.is_empty() {
        let _ = writeln!(output, "No concepts recorded.");
    } else {
        for entry in dataset.top_concepts.iter().take(limit) {
            let _ = writeln!(output, "- {}: {} notes", entry.concept, entry.frequency);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Languages");
    if dataset.languages.is_empty() {
        let _ = writeln!(output, "No language tags recorded.");
    } else {
        for entry in dataset.languages.iter().take(limit) {
            let _ = writeln!(output, "- {}: {}", entry.tag, entry.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Phrase Buckets");
    for category in BUCKET_ORDER {
        let phrases = dataset.phrases.get(category);
        let _ = writeln!(output, "### {} ({})", category.as_str(), phrases.len());
        for phrase in phrases.iter().take(limit) {
            let _ = writeln!(output, "- {}", phrase);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::fallback_dataset;

    #[test]
    fn report_lists_summary_and_buckets() {
        let report = build_report("fallback", &fallback_dataset(), 2);

        assert!(report.starts_with("# Teaching Notes Corpus Report\nGenerated from fallback\n"));
        assert!(report.contains("- 0 students, 0 notes"));
        assert!(report.contains("- for loop: 50 notes\n- conditionals: 45 notes\n\n"));
        assert!(report.contains("### challenges (0)"));
        assert!(report.contains("### positive (5)"));
    }

    #[test]
    fn empty_dataset_reports_gaps() {
        let report = build_report("empty", &SuggestionDataset::default(), 5);
        assert!(report.contains("No concepts recorded."));
        assert!(report.contains("No language tags recorded."));
    }
}
