//! Interview script — the question lists and the keyword heuristics that drive the stage machine.
//!
//! Loaded once at startup (built-in default or a JSON file) and shared read-only by every session.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("{0} must contain at least one question")]
    NoQuestions(&'static str),

    #[error("{list} entry {index} is blank")]
    BlankQuestion { list: &'static str, index: usize },

    #[error("{0} contains a blank phrase")]
    BlankPhrase(&'static str),
}

/// Fixed, process-wide interview content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewScript {
    pub warmup_questions: Vec<String>,
    pub technical_questions: Vec<String>,
    /// Acknowledgements that only matter while a clarification is pending. Exact match.
    pub filler_phrases: Vec<String>,
    /// Substring match against the normalized message.
    pub confusion_keywords: Vec<String>,
}

impl Default for InterviewScript {
    fn default() -> Self {
        Self {
            warmup_questions: to_strings(&[
                "Can you briefly introduce yourself?",
                "How comfortable are you with using Excel on a daily basis?",
                "What kinds of Excel tasks do you typically perform?",
            ]),
            technical_questions: to_strings(&[
                "What is the difference between VLOOKUP and INDEX/MATCH, and when would you prefer one over the other?",
                "How would you use a PivotTable to summarize sales data by region and month?",
                "Explain the difference between relative, absolute, and mixed cell references.",
                "How would you find and remove duplicate rows from a large dataset?",
                "Describe how you would use conditional formatting to highlight values that exceed a threshold.",
            ]),
            filler_phrases: to_strings(&[
                "okay",
                "ok",
                "i get it",
                "yeah i get it",
                "got it",
                "makes sense",
                "understood",
                "cool",
                "alright",
                "sure",
                "thanks",
                "thank you",
            ]),
            confusion_keywords: to_strings(&[
                "don't understand",
                "didn't understand",
                "can you explain",
                "not sure",
                "what does",
                "elaborate",
                "please clarify",
                "confused",
            ]),
        }
    }
}

impl InterviewScript {
    /// Reads a script from a JSON file and validates it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read interview script {}", path.display()))?;
        let script: InterviewScript = serde_json::from_str(&raw)
            .with_context(|| format!("Interview script {} is not valid JSON", path.display()))?;
        Ok(script.validated()?)
    }

    /// Checks the question lists and normalizes the keyword lists the same way messages are normalized.
    pub fn validated(mut self) -> Result<Self, ScriptError> {
        check_questions("warmup_questions", &self.warmup_questions)?;
        check_questions("technical_questions", &self.technical_questions)?;
        self.filler_phrases = normalize_phrases("filler_phrases", &self.filler_phrases)?;
        self.confusion_keywords = normalize_phrases("confusion_keywords", &self.confusion_keywords)?;
        Ok(self)
    }

    pub fn warmup_question(&self, index: usize) -> Option<&str> {
        self.warmup_questions.get(index).map(String::as_str)
    }

    pub fn technical_question(&self, index: usize) -> Option<&str> {
        self.technical_questions.get(index).map(String::as_str)
    }

    /// True when any confusion keyword appears anywhere in the normalized message.
    pub fn signals_confusion(&self, normalized: &str) -> bool {
        self.confusion_keywords
            .iter()
            .any(|keyword| normalized.contains(keyword.as_str()))
    }

    /// True when the normalized message is exactly one of the filler phrases.
    pub fn is_filler(&self, normalized: &str) -> bool {
        self.filler_phrases.iter().any(|phrase| phrase == normalized)
    }
}

/// Classification form of a message: trimmed and lower-cased.
pub fn normalize(message: &str) -> String {
    message.trim().to_lowercase()
}

fn check_questions(list: &'static str, questions: &[String]) -> Result<(), ScriptError> {
    if questions.is_empty() {
        return Err(ScriptError::NoQuestions(list));
    }
    match questions.iter().position(|q| q.trim().is_empty()) {
        Some(index) => Err(ScriptError::BlankQuestion { list, index }),
        None => Ok(()),
    }
}

fn normalize_phrases(list: &'static str, phrases: &[String]) -> Result<Vec<String>, ScriptError> {
    phrases
        .iter()
        .map(|p| {
            let p = normalize(p);
            if p.is_empty() {
                Err(ScriptError::BlankPhrase(list))
            } else {
                Ok(p)
            }
        })
        .collect()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_script_is_valid() {
        let script = InterviewScript::default().validated().unwrap();
        assert_eq!(script.warmup_questions.len(), 3);
        assert_eq!(script.technical_questions.len(), 5);
    }

    #[test]
    fn test_confusion_is_substring_match() {
        let script = InterviewScript::default();
        assert!(script.signals_confusion("honestly i'm a bit confused here"));
        assert!(script.signals_confusion("i don't understand"));
        // Known false positive: keyword embedded in a real answer.
        assert!(script.signals_confusion("index/match, not sure if this is optimal"));
        assert!(!script.signals_confusion("i use vlookup for lookups"));
    }

    #[test]
    fn test_empty_message_matches_nothing() {
        let script = InterviewScript::default();
        assert!(!script.signals_confusion(""));
        assert!(!script.is_filler(""));
    }

    #[test]
    fn test_filler_is_exact_match() {
        let script = InterviewScript::default();
        assert!(script.is_filler("got it"));
        assert!(script.is_filler(&normalize("  Thanks ")));
        assert!(!script.is_filler("got it, vlookup searches the first column"));
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  I Don't UNDERSTAND \n"), "i don't understand");
    }

    #[test]
    fn test_validated_rejects_empty_technical_list() {
        let script = InterviewScript {
            technical_questions: vec![],
            ..InterviewScript::default()
        };
        assert_eq!(
            script.validated().unwrap_err(),
            ScriptError::NoQuestions("technical_questions")
        );
    }

    #[test]
    fn test_validated_rejects_blank_question() {
        let script = InterviewScript {
            warmup_questions: vec!["Who are you?".to_string(), "  ".to_string()],
            ..InterviewScript::default()
        };
        assert_eq!(
            script.validated().unwrap_err(),
            ScriptError::BlankQuestion {
                list: "warmup_questions",
                index: 1
            }
        );
    }

    #[test]
    fn test_validated_rejects_blank_keyword() {
        let script = InterviewScript {
            confusion_keywords: vec!["confused".to_string(), " ".to_string()],
            ..InterviewScript::default()
        };
        assert_eq!(
            script.validated().unwrap_err(),
            ScriptError::BlankPhrase("confusion_keywords")
        );
    }

    #[test]
    fn test_validated_normalizes_keywords() {
        let script = InterviewScript {
            confusion_keywords: vec!["  HUH ".to_string()],
            filler_phrases: vec!["Roger".to_string()],
            ..InterviewScript::default()
        }
        .validated()
        .unwrap();
        assert!(script.signals_confusion("huh?"));
        assert!(script.is_filler("roger"));
    }

    #[test]
    fn test_from_file_reads_custom_question_count() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::json!({
            "warmup_questions": ["Hello?"],
            "technical_questions": ["Q1", "Q2", "Q3", "Q4", "Q5", "Q6", "Q7"],
            "filler_phrases": ["ok"],
            "confusion_keywords": ["confused"]
        });
        write!(file, "{json}").unwrap();

        let script = InterviewScript::from_file(file.path()).unwrap();
        assert_eq!(script.technical_questions.len(), 7);
        assert_eq!(script.technical_question(6), Some("Q7"));
        assert_eq!(script.technical_question(7), None);
    }

    #[test]
    fn test_from_file_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(InterviewScript::from_file(file.path()).is_err());
    }
}
