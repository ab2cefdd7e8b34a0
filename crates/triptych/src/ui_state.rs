use std::time::{Duration, Instant};

use pagecore::SourceKind;

#[derive(Clone, Copy, PartialEq)]
pub enum Mode {
    Edit,
    Help,
    ResetPrompt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub level: StatusLevel,
    created_at: Instant,
    ttl: Duration,
}

impl StatusMessage {
    fn new(content: String, level: StatusLevel) -> Self {
        let ttl = match level {
            StatusLevel::Info => Duration::from_secs(3),
            StatusLevel::Success => Duration::from_secs(2),
            StatusLevel::Warning => Duration::from_secs(5),
            StatusLevel::Error => Duration::from_secs(7),
        };
        Self {
            content,
            level,
            created_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// View state of the shell: which pane is being edited, what mode the
/// keymap is in, and the transient status line. None of this is part of
/// the project's content.
pub struct UIState {
    pub mode: Mode,
    pub active: SourceKind,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl UIState {
    pub fn new(active: SourceKind) -> Self {
        Self {
            mode: Mode::Edit,
            active,
            status: None,
            should_quit: false,
        }
    }

    pub fn active(&self) -> SourceKind {
        self.active
    }

    pub fn select(&mut self, kind: SourceKind) {
        self.active = kind;
    }

    pub fn select_next(&mut self) {
        let all = SourceKind::ALL;
        let pos = all.iter().position(|k| *k == self.active).unwrap_or(0);
        self.active = all[(pos + 1) % all.len()];
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Help => Mode::Edit,
            _ => Mode::Help,
        };
    }

    pub fn enter_reset_prompt(&mut self) {
        self.mode = Mode::ResetPrompt;
        self.set_warning("Reset all panes to placeholders? This cannot be undone (y/n)".to_string());
    }

    pub fn leave_prompt(&mut self) {
        self.mode = Mode::Edit;
        self.clear_status();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_info(&mut self, message: String) {
        self.status = Some(StatusMessage::new(message, StatusLevel::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.status = Some(StatusMessage::new(message, StatusLevel::Success));
    }

    pub fn set_warning(&mut self, message: String) {
        self.status = Some(StatusMessage::new(message, StatusLevel::Warning));
    }

    pub fn set_error(&mut self, message: String) {
        self.status = Some(StatusMessage::new(message, StatusLevel::Error));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Drops the status message once its display time is over. Called once
    /// per event-loop tick.
    pub fn update_status(&mut self) {
        if let Some(ref message) = self.status {
            if message.is_expired() {
                self.status = None;
            }
        }
    }
}
