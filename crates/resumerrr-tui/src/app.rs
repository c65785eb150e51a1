use std::path::PathBuf;

use ratatui::layout::Rect;
use resumerrr_core::analyzer::TRANSPORT_FAILURE;
use resumerrr_core::{AnalyzerClient, AnalyzerError, Attachment, ChatSession, Reply};
use tokio::task::JoinHandle;

use crate::composer::Composer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    AttachPrompt,
}

/// Width class of the terminal, updated from resize events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Narrow,
    Compact,
    Wide,
}

impl Viewport {
    pub fn from_width(cols: u16) -> Self {
        match cols {
            0..=49 => Viewport::Narrow,
            50..=99 => Viewport::Compact,
            _ => Viewport::Wide,
        }
    }

    /// Maximum bubble width as a percentage of the transcript width
    pub fn bubble_percent(self) -> u16 {
        match self {
            Viewport::Narrow | Viewport::Compact => 85,
            Viewport::Wide => 75,
        }
    }

    pub fn shows_button_labels(self) -> bool {
        self != Viewport::Narrow
    }
}

/// Clickable regions that react to the mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    NewChat,
    RemoveAttachment,
}

/// A modal message the user has to dismiss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub text: String,
}

pub struct App {
    pub should_quit: bool,
    pub session: ChatSession,
    pub composer: Composer,
    pub focus: Focus,

    // Attach prompt (path entry)
    pub attach_input: String,
    pub attach_composer: Composer,

    pub notice: Option<Notice>,

    // Presentation state
    pub viewport: Viewport,
    pub hovered: Option<HitTarget>,
    pub keyboard_enhanced: bool,
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Transcript scrolling; height and line count are written by the renderer
    pub transcript_scroll: u16,
    pub follow_tail: bool,
    pub transcript_height: u16,
    pub transcript_lines: u16,

    // Areas for mouse hit-testing, written by the renderer
    pub transcript_area: Option<Rect>,
    pub new_chat_area: Option<Rect>,
    pub remove_attachment_area: Option<Rect>,

    client: AnalyzerClient,
    reply_task: Option<JoinHandle<Result<Reply, AnalyzerError>>>,
}

impl App {
    pub fn new(client: AnalyzerClient, keyboard_enhanced: bool) -> Self {
        Self {
            should_quit: false,
            session: ChatSession::new(),
            composer: Composer::new(),
            focus: Focus::Composer,

            attach_input: String::new(),
            attach_composer: Composer::new(),

            notice: None,

            viewport: Viewport::Wide,
            hovered: None,
            keyboard_enhanced,
            animation_frame: 0,

            transcript_scroll: 0,
            follow_tail: true,
            transcript_height: 0,
            transcript_lines: 0,

            transcript_area: None,
            new_chat_area: None,
            remove_attachment_area: None,

            client,
            reply_task: None,
        }
    }

    /// Send the draft if the session allows it; otherwise nothing happens
    pub fn submit(&mut self) {
        let Some(submission) = self.session.begin_submission() else {
            return;
        };
        self.composer.reset();
        self.animation_frame = 0;
        self.follow_tail = true;

        let client = self.client.clone();
        self.reply_task = Some(tokio::spawn(async move {
            client
                .analyze(&submission.question, submission.resume.as_ref())
                .await
        }));
    }

    pub fn is_waiting_for_reply(&self) -> bool {
        self.reply_task.is_some()
    }

    /// Apply the reply if the in-flight request has finished
    pub async fn poll_reply(&mut self) {
        let finished = self
            .reply_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.reply_task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(error = %e, "analyzer task did not complete");
                    Ok(Reply::Failure(TRANSPORT_FAILURE.to_string()))
                }
            };
            self.session.finish_submission(outcome);
            self.follow_tail = true;
        }
    }

    pub fn new_chat(&mut self) {
        if self.session.new_chat() {
            self.composer.reset();
            self.transcript_scroll = 0;
            self.follow_tail = true;
            self.hovered = None;
            tracing::info!("started a new chat");
        }
    }

    pub fn open_attach_prompt(&mut self) {
        self.attach_input.clear();
        self.attach_composer.reset();
        self.focus = Focus::AttachPrompt;
    }

    pub fn cancel_attach_prompt(&mut self) {
        self.attach_input.clear();
        self.attach_composer.reset();
        self.focus = Focus::Composer;
    }

    pub async fn confirm_attach_prompt(&mut self) {
        let input = std::mem::take(&mut self.attach_input);
        self.attach_composer.reset();
        self.focus = Focus::Composer;

        if let Some(path) = parse_path_input(&input) {
            self.attach_path(path).await;
        }
    }

    /// Select a file from disk. A rejected file leaves the current selection alone.
    pub async fn attach_path(&mut self, path: PathBuf) {
        match Attachment::load(&path).await {
            Ok(attachment) => self.session.attach(attachment),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "attachment rejected");
                self.notice = Some(Notice {
                    title: "Attachment".to_string(),
                    text: e.to_string(),
                });
            }
        }
    }

    pub fn remove_attachment(&mut self) {
        self.session.remove_attachment();
        if self.hovered == Some(HitTarget::RemoveAttachment) {
            self.hovered = None;
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_submitting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn set_viewport(&mut self, width: u16) {
        self.viewport = Viewport::from_width(width);
    }

    fn max_transcript_scroll(&self) -> u16 {
        self.transcript_lines.saturating_sub(self.transcript_height)
    }

    pub fn scroll_transcript_up(&mut self, lines: u16) {
        if self.follow_tail {
            self.transcript_scroll = self.max_transcript_scroll();
        }
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
        self.follow_tail = false;
    }

    pub fn scroll_transcript_down(&mut self, lines: u16) {
        if self.follow_tail {
            return;
        }
        let max = self.max_transcript_scroll();
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines).min(max);
        if self.transcript_scroll >= max {
            self.follow_tail = true;
        }
    }

    pub fn scroll_transcript_to_bottom(&mut self) {
        self.follow_tail = true;
    }

    pub fn half_page(&self) -> u16 {
        (self.transcript_height / 2).max(1)
    }
}

/// Interpret what the user typed or dropped into the attach prompt.
///
/// Terminals paste dropped files as quoted or backslash-escaped paths.
fn parse_path_input(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.replace("\\ ", " "));

    if unquoted.is_empty() {
        return None;
    }

    if let Some(rest) = unquoted.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Some(home.join(rest));
        }
    }
    Some(PathBuf::from(unquoted))
}
