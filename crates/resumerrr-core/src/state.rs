//! UI-agnostic transcript types
//!
//! This module contains the data structures that make up a chat transcript.
//! They don't depend on any specific UI framework.

use serde::Deserialize;

/// Structured feedback returned by the analysis backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub recommended_projects: Vec<String>,
    #[serde(default)]
    pub skills_to_focus: Vec<String>,
}

/// A single entry in the chat transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    User {
        content: String,
        attached_file_name: Option<String>,
    },
    Ai(Analysis),
    Error { content: String },
}

impl Message {
    pub fn user(content: impl Into<String>, attached_file_name: Option<String>) -> Self {
        Message::User {
            content: content.into(),
            attached_file_name,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Message::Error {
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_defaults_missing_lists() {
        let analysis: Analysis = serde_json::from_str(r#"{"answer":"Looks solid"}"#).unwrap();
        assert_eq!(analysis.answer, "Looks solid");
        assert!(analysis.recommended_projects.is_empty());
        assert!(analysis.skills_to_focus.is_empty());
    }

    #[test]
    fn test_analysis_ignores_unknown_fields() {
        let analysis: Analysis =
            serde_json::from_str(r#"{"answer":"Ok","skills_to_focus":["Go"],"score":7}"#).unwrap();
        assert_eq!(analysis.skills_to_focus, vec!["Go".to_string()]);
    }

    #[test]
    fn test_user_message_keeps_file_name() {
        assert_eq!(
            Message::user("Review my resume", Some("cv.pdf".to_string())),
            Message::User {
                content: "Review my resume".to_string(),
                attached_file_name: Some("cv.pdf".to_string()),
            }
        );
    }
}
