//! Read-only per-menu settings and the constants they default to.

use std::time::Duration;

use crate::event::binding::KeyMap;

/// How long a first click on an option waits for a second one.
pub const DOUBLE_CLICK_TIMEOUT: Duration = Duration::from_millis(250);
/// Default label of the affirmative confirm option.
pub const CONFIRM_AFFIRMATIVE: &str = "OK";
/// Default label of the negative confirm option.
pub const CONFIRM_NEGATIVE: &str = "Cancel";
/// Default label of every dialog's submit button.
pub const SUBMIT_LABEL: &str = "OK";

/// Class marking the selected option of a select dialog.
pub const ACTIVE_CLASS: &str = "active";
/// Class marking the element reached by tab traversal.
pub const TAB_MARK_CLASS: &str = "tab-active";

/// Labels of the two confirm options, affirmative first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmLabels {
    pub affirmative: String,
    pub negative: String,
}

impl Default for ConfirmLabels {
    fn default() -> Self {
        Self {
            affirmative: CONFIRM_AFFIRMATIVE.to_owned(),
            negative: CONFIRM_NEGATIVE.to_owned(),
        }
    }
}

/// Settings a menu reads but never changes.
///
/// Each instance owns its copy, so two menus on one page can differ without
/// affecting each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSettings {
    pub keymap: KeyMap,
    pub double_click_timeout: Duration,
    pub labels: ConfirmLabels,
    pub submit_label: String,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            keymap: KeyMap::with_defaults(),
            double_click_timeout: DOUBLE_CLICK_TIMEOUT,
            labels: ConfirmLabels::default(),
            submit_label: SUBMIT_LABEL.to_owned(),
        }
    }
}

impl MenuSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the key map (builder).
    pub fn with_keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Set the double-click window (builder).
    pub fn with_double_click_timeout(mut self, timeout: Duration) -> Self {
        self.double_click_timeout = timeout;
        self
    }

    /// Set the confirm labels (builder).
    pub fn with_labels(mut self, affirmative: impl Into<String>, negative: impl Into<String>) -> Self {
        self.labels = ConfirmLabels {
            affirmative: affirmative.into(),
            negative: negative.into(),
        };
        self
    }

    /// Set the submit button label (builder).
    pub fn with_submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_constants() {
        let settings = MenuSettings::default();
        assert_eq!(settings.double_click_timeout, Duration::from_millis(250));
        assert_eq!(settings.labels.affirmative, "OK");
        assert_eq!(settings.labels.negative, "Cancel");
        assert_eq!(settings.submit_label, "OK");
        assert_eq!(settings.keymap, KeyMap::with_defaults());
    }

    #[test]
    fn builders_override() {
        let settings = MenuSettings::new()
            .with_double_click_timeout(Duration::from_millis(400))
            .with_labels("Yes", "No")
            .with_submit_label("Go")
            .with_keymap(KeyMap::new());
        assert_eq!(settings.double_click_timeout, Duration::from_millis(400));
        assert_eq!(settings.labels.affirmative, "Yes");
        assert_eq!(settings.labels.negative, "No");
        assert_eq!(settings.submit_label, "Go");
        assert!(settings.keymap.is_empty());
    }
}
