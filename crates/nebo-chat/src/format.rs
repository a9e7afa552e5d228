//! Format templates.

use tracing::warn;

/// Replaced by the sender's display name.
pub const DISPLAY_NAME_PLACEHOLDER: &str = "{display_name}";

/// Replaced by the parsed message body.
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// Id of the fallback template.
pub const DEFAULT_TEMPLATE_ID: &str = "default";

/// Text of the default template when the configuration has none.
pub const DEFAULT_TEMPLATE_TEXT: &str = "<gray>{display_name}</gray> <white>{message}</white>";

/// Replacement text for a template that never shows the message.
pub const FALLBACK_TEMPLATE_TEXT: &str = "{display_name}: {message}";

/// An administrator-authored format with an optional permission gate.
///
/// The text is trusted markup containing `{display_name}` and `{message}`
/// placeholders. Other `{...}` sequences are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    id: String,
    text: String,
    permission: Option<String>,
}

impl FormatTemplate {
    /// An ungated template.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            permission: None,
        }
    }

    /// Gates the template behind `permission`. An empty or blank node means
    /// no gate.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        let permission = permission.into();
        self.permission = if permission.trim().is_empty() {
            None
        } else {
            Some(permission)
        };
        self
    }

    /// Builds a template from configuration values, repairing a text that
    /// never shows the message.
    ///
    /// Such a template is replaced by `{display_name}: {message}` with no
    /// gate, and a warning is logged.
    pub fn validated(
        id: impl Into<String>,
        text: impl Into<String>,
        permission: Option<String>,
    ) -> Self {
        let id = id.into();
        let text = text.into();
        if !text.contains(MESSAGE_PLACEHOLDER) {
            warn!(
                template = %id,
                "format has no {} placeholder, using '{}'",
                MESSAGE_PLACEHOLDER,
                FALLBACK_TEMPLATE_TEXT
            );
            return Self::new(id, FALLBACK_TEMPLATE_TEXT);
        }
        let template = Self::new(id, text);
        match permission {
            Some(permission) => template.with_permission(permission),
            None => template,
        }
    }

    /// The default used when the configuration has no `default` entry.
    pub fn synthesized_default() -> Self {
        Self::new(DEFAULT_TEMPLATE_ID, DEFAULT_TEMPLATE_TEXT)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn required_permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// Whether a permission is needed to use this template.
    pub fn is_gated(&self) -> bool {
        self.permission.is_some()
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_TEMPLATE_ID
    }
}
