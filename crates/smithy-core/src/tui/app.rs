//! TUI application state and key handling

use crate::error::ForgeError;
use crate::estimator::{EstimatorKind, Flag};
use crate::form::{Field, ForgeForm, FormReport};
use crate::request::ForgeRequest;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// Currently focused form element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Text(Field),
    Kind,
    Flag(Flag),
}

impl Focus {
    /// Focus order, top to bottom
    pub const ORDER: [Focus; 10] = [
        Focus::Text(Field::Name),
        Focus::Kind,
        Focus::Text(Field::Required),
        Focus::Text(Field::Optional),
        Focus::Flag(Flag::SampleWeight),
        Focus::Flag(Flag::Linear),
        Focus::Flag(Flag::PredictProba),
        Focus::Flag(Flag::DecisionFunction),
        Focus::Text(Field::Tags),
        Focus::Text(Field::Output),
    ];
}

/// Work the event loop must carry out after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Render and format into the preview pane
    Forge,
    /// Forge and write to the output file
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Main application state
pub struct App {
    form: ForgeForm,
    focus: Focus,
    /// Cursor position in characters within the focused text field
    cursor: usize,
    preview: Option<String>,
    preview_scroll: u16,
    notice: Option<Notice>,
    saved: Option<PathBuf>,
}

impl App {
    pub fn new(form: ForgeForm) -> Self {
        let cursor = form.text(Field::Name).chars().count();
        Self {
            form,
            focus: Focus::Text(Field::Name),
            cursor,
            preview: None,
            preview_scroll: 0,
            notice: None,
            saved: None,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn form(&self) -> &ForgeForm {
        &self.form
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn preview_scroll(&self) -> u16 {
        self.preview_scroll
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Last file written in this session
    pub fn saved(&self) -> Option<&PathBuf> {
        self.saved.as_ref()
    }

    pub fn report(&mut self) -> FormReport {
        self.form.report()
    }

    pub fn request(&mut self) -> Result<ForgeRequest, ForgeError> {
        self.form.to_request()
    }

    /// Whether a focus target is currently shown
    pub fn is_focusable(&self, focus: Focus) -> bool {
        match focus {
            Focus::Flag(flag) => self.form.kind().is_some()
                && flag.is_offerable(&self.form.availability()),
            _ => true,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Action::Quit,
                KeyCode::Char('f') => Action::Forge,
                KeyCode::Char('s') => Action::Save,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::PageDown => self.preview_scroll = self.preview_scroll.saturating_add(10),
            KeyCode::PageUp => self.preview_scroll = self.preview_scroll.saturating_sub(10),
            code => match self.focus {
                Focus::Text(field) => self.edit_text(field, code),
                Focus::Kind => self.edit_kind(code),
                Focus::Flag(flag) => {
                    if matches!(code, KeyCode::Char(' ') | KeyCode::Enter) {
                        self.form.toggle_flag(flag);
                        self.invalidate();
                    }
                }
            },
        }
        Action::None
    }

    /// Show the outcome of forging into the preview pane
    pub fn show_forged(&mut self, result: Result<String, ForgeError>) {
        match result {
            Ok(code) => {
                self.preview = Some(code);
                self.preview_scroll = 0;
                self.notice = Some(Notice {
                    level: NoticeLevel::Info,
                    message: "Estimator forged, press Ctrl+S to save".to_string(),
                });
            }
            Err(e) => self.show_error(e),
        }
    }

    /// Show the outcome of writing the output file
    pub fn show_saved(&mut self, result: Result<PathBuf, ForgeError>) {
        match result {
            Ok(path) => {
                self.notice = Some(Notice {
                    level: NoticeLevel::Info,
                    message: format!("Template forged at {}", path.display()),
                });
                self.saved = Some(path);
            }
            Err(e) => self.show_error(e),
        }
    }

    pub fn show_error(&mut self, error: ForgeError) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            message: error.to_string(),
        });
    }

    fn move_focus(&mut self, step: isize) {
        let len = Focus::ORDER.len() as isize;
        let mut idx = Focus::ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0) as isize;

        for _ in 0..len {
            idx = (idx + step).rem_euclid(len);
            let candidate = Focus::ORDER[idx as usize];
            if self.is_focusable(candidate) {
                self.focus = candidate;
                break;
            }
        }

        if let Focus::Text(field) = self.focus {
            self.cursor = self.form.text(field).chars().count();
        }
    }

    fn edit_text(&mut self, field: Field, code: KeyCode) {
        let cursor = self.cursor;
        let Some(text) = self.form.text_mut(field) else {
            return;
        };
        let len = text.chars().count();
        let byte_at = |text: &str, pos: usize| {
            text.char_indices()
                .nth(pos)
                .map(|(i, _)| i)
                .unwrap_or(text.len())
        };

        match code {
            KeyCode::Char(c) => {
                let at = byte_at(text, cursor);
                text.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if cursor > 0 => {
                let at = byte_at(text, cursor - 1);
                text.remove(at);
                self.cursor -= 1;
            }
            KeyCode::Delete if cursor < len => {
                let at = byte_at(text, cursor);
                text.remove(at);
            }
            KeyCode::Left => self.cursor = cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (cursor + 1).min(len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len,
            KeyCode::Enter => {
                self.move_focus(1);
                return;
            }
            _ => return,
        }
        self.invalidate();
    }

    fn edit_kind(&mut self, code: KeyCode) {
        let step: isize = match code {
            KeyCode::Char(' ') | KeyCode::Right => 1,
            KeyCode::Left => -1,
            KeyCode::Enter => {
                if self.form.kind().is_none() {
                    self.form.set_kind(EstimatorKind::ALL[0]);
                    self.invalidate();
                }
                self.move_focus(1);
                return;
            }
            _ => return,
        };

        let len = EstimatorKind::ALL.len() as isize;
        let next = match self.form.kind() {
            Some(kind) => {
                let idx = EstimatorKind::ALL
                    .iter()
                    .position(|k| *k == kind)
                    .unwrap_or(0) as isize;
                (idx + step).rem_euclid(len)
            }
            None if step > 0 => 0,
            None => len - 1,
        };
        self.form.set_kind(EstimatorKind::ALL[next as usize]);
        self.invalidate();
    }

    /// The form changed: the preview no longer matches it
    fn invalidate(&mut self) {
        self.preview = None;
        self.notice = None;
    }
}
