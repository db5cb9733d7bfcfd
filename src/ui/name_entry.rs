//! Game-over name prompt

use thiserror::Error;

use crate::platform::KeyEvent;

/// Longest name accepted (in characters)
pub const MAX_NAME_LEN: usize = 15;

/// Why a submission was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameEntryError {
    #[error("Please enter a name!")]
    EmptyName,
}

/// Text field collecting the player's name after a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameEntry {
    text: String,
    error: Option<NameEntryError>,
}

impl NameEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text typed so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Prompt line shown above the field
    pub fn prompt(&self) -> String {
        match self.error {
            Some(error) => error.to_string(),
            None => "Enter your name:".to_string(),
        }
    }

    pub fn error(&self) -> Option<NameEntryError> {
        self.error
    }

    /// Field contents with a caret
    pub fn display(&self) -> String {
        format!("{}|", self.text)
    }

    /// Feed one key. Returns `Some` only when Enter was pressed.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Result<String, NameEntryError>> {
        match key {
            KeyEvent::Backspace => {
                self.text.pop();
                None
            }
            KeyEvent::Char(c) if !c.is_control() => {
                if self.text.chars().count() < MAX_NAME_LEN {
                    self.text.push(c);
                }
                None
            }
            KeyEvent::Enter => Some(self.submit()),
            KeyEvent::Char(_) | KeyEvent::Other => None,
        }
    }

    /// Validate the current text. Whitespace-only names are refused.
    pub fn submit(&mut self) -> Result<String, NameEntryError> {
        let name = self.text.trim();
        if name.is_empty() {
            self.error = Some(NameEntryError::EmptyName);
            return Err(NameEntryError::EmptyName);
        }
        self.error = None;
        Ok(name.to_string())
    }
}
