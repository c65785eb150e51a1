//! Chat session state and the submission pipeline
//!
//! A [`ChatSession`] owns the transcript and the draft. A submission moves it
//! from idle to submitting; the caller performs the network call and hands the
//! outcome back through [`ChatSession::finish_submission`]. Only one
//! submission can be in flight at a time.

use crate::analyzer::{Reply, TRANSPORT_FAILURE, UNRECOGNIZED_REPLY};
use crate::attachment::Attachment;
use crate::error::AnalyzerError;
use crate::state::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
}

/// Everything the network call needs for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub question: String,
    pub resume: Option<Attachment>,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    draft: String,
    attachment: Option<Attachment>,
    phase: Phase,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && !self.draft.trim().is_empty()
    }

    /// Select a file for the next submission, replacing any previous one
    pub fn attach(&mut self, attachment: Attachment) {
        tracing::debug!(name = %attachment.name, "attachment selected");
        self.attachment = Some(attachment);
    }

    pub fn remove_attachment(&mut self) {
        self.attachment = None;
    }

    /// Start a submission from the current draft.
    ///
    /// Returns `None` without touching any state when a submission is already
    /// in flight or the draft is blank. Otherwise the user message is appended,
    /// the draft text cleared and the session enters [`Phase::Submitting`].
    /// The attachment stays selected until the submission settles.
    pub fn begin_submission(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }

        let content = std::mem::take(&mut self.draft);
        let question = content.trim().to_string();
        let resume = self.attachment.clone();

        self.messages.push(Message::user(
            content,
            resume.as_ref().map(|a| a.name.clone()),
        ));
        self.phase = Phase::Submitting;

        Some(Submission { question, resume })
    }

    /// Settle the in-flight submission.
    ///
    /// Appends exactly one `Ai` or `Error` message, clears the attachment and
    /// returns to idle. Ignored when nothing is in flight.
    pub fn finish_submission(&mut self, outcome: Result<Reply, AnalyzerError>) {
        if !self.is_submitting() {
            tracing::warn!("reply arrived with no submission in flight; ignoring");
            return;
        }

        let message = match outcome {
            Ok(Reply::Analysis(analysis)) => Message::Ai(analysis),
            Ok(Reply::Failure(text)) => {
                tracing::warn!(error = %text, "backend reported an error");
                Message::error(text)
            }
            Ok(Reply::Unrecognized) => {
                tracing::warn!("backend reply had an unrecognized shape");
                Message::error(UNRECOGNIZED_REPLY)
            }
            Err(e) => {
                tracing::error!(error = %e, "analyzer request failed");
                Message::error(TRANSPORT_FAILURE)
            }
        };

        self.messages.push(message);
        self.attachment = None;
        self.phase = Phase::Idle;
    }

    /// Reset transcript, draft and attachment.
    ///
    /// Refused while a submission is in flight; returns whether the reset
    /// happened.
    pub fn new_chat(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.messages.clear();
        self.draft.clear();
        self.attachment = None;
        true
    }
}
