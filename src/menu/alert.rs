//! Alert dialog: a message and a single submit button.

use tracing::debug;

use crate::dom::node::NodeData;
use crate::event::handler::EventKind;

use super::session::{AlertCallback, Completion, DialogSession, SessionKind};
use super::{Command, MenuMut};

/// Parameters of an alert dialog.
pub struct Alert {
    pub text: String,
    /// Extra content shown under the text.
    pub message: Option<String>,
    pub on_complete: Option<AlertCallback>,
}

impl Alert {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message: None,
            on_complete: None,
        }
    }

    /// Show extra content under the text (builder).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Run `f` once the alert is submitted (builder).
    ///
    /// Without a callback, submitting does nothing and the alert stays until
    /// the menu is destroyed.
    pub fn on_complete(mut self, f: impl FnOnce(&mut MenuMut<'_>) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl<'p> MenuMut<'p> {
    /// Show an alert, replacing whatever the menu was showing.
    ///
    /// ```text
    /// div.dialog.alert
    ///  ├ p.text          click submits
    ///  ├ div.message     optional
    ///  └ form            submit completes
    ///     └ button.submit
    /// ```
    pub fn alert(&mut self, alert: Alert) -> &mut Self {
        self.init();
        let Alert {
            text,
            message,
            on_complete,
        } = alert;

        let menu = self.menu_mut();
        let generation = menu.bump_generation();
        let surface = menu.surface;
        let submit_label = menu.settings.submit_label.clone();

        let doc = &mut self.page.document;
        let root = doc.create_child(surface, NodeData::new("div").with_classes(["dialog", "alert"]));
        let text_node = doc.create_child(root, NodeData::new("p").with_class("text").with_text(text));
        if let Some(message) = message {
            doc.create_child(root, NodeData::new("div").with_class("message").with_text(message));
        }
        let form = doc.create_child(root, NodeData::new("form"));
        let submit = doc.create_child(
            form,
            NodeData::new("button")
                .with_class("submit")
                .with_attr("type", "submit")
                .with_text(submit_label)
                .focusable(true),
        );
        doc.focus(submit);

        let subscriptions = vec![
            self.listen(text_node, EventKind::Click, Command::ForwardSubmit),
            self.listen(form, EventKind::Submit, Command::SubmitDialog),
            self.listen(surface, EventKind::Click, Command::FocusSubmit),
        ];

        self.menu_mut().session = Some(DialogSession {
            generation,
            root,
            form,
            submit,
            subscriptions,
            kind: SessionKind::Alert,
            on_complete: on_complete.map(Completion::Alert),
        });
        debug!(menu = ?self.id, generation, "alert shown");
        self
    }
}
