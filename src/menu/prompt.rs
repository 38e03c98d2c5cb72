//! Text prompt dialog. Declared but not implemented.

use tracing::warn;

use crate::error::{MenuError, Result};

use super::MenuMut;

/// Parameters of a prompt dialog.
pub struct Prompt {
    pub text: String,
    pub message: Option<String>,
    /// Mask the typed characters.
    pub password: bool,
    pub on_complete: Option<Box<dyn FnOnce(&mut MenuMut<'_>, String)>>,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message: None,
            password: false,
            on_complete: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce(&mut MenuMut<'_>, String) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl<'p> MenuMut<'p> {
    /// Always fails with [`MenuError::NotImplemented`]; the menu is left as it was.
    pub fn prompt(&mut self, prompt: Prompt) -> Result<&mut Self> {
        warn!(menu = ?self.id, text = %prompt.text, "prompt dialog requested but not implemented");
        Err(MenuError::NotImplemented("prompt"))
    }
}
