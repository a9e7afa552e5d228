//! The host-facing chat formatter.
//!
//! [`ChatFormatter`] ties the pieces together the way a server wires them
//! to its events:
//!
//! - on a chat event, [`handle_message`](ChatFormatter::handle_message)
//!   remembers the raw text
//! - for each viewer, [`render_for`](ChatFormatter::render_for) renders it
//! - on quit, [`remove_sender`](ChatFormatter::remove_sender) forgets it
//!
//! ```rust
//! use nebo_chat::{ChatConfig, ChatFormatter, PermissionSet};
//!
//! let config = ChatConfig::from_yaml(r#"
//! settings:
//!   parse-player-colors: true
//! formats:
//!   default:
//!     format: "<gray>{display_name}</gray>: {message}"
//! "#).unwrap();
//!
//! let chat = ChatFormatter::new(config);
//! chat.handle_message(7u64, "&cHi");
//! let out = chat.render_for(&7, Some("Ann"), &PermissionSet::new());
//! assert_eq!(out.plain_text(), "Ann: Hi");
//! ```

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use nebo_markup::Component;
use tracing::info;

use crate::cache::RecentMessageCache;
use crate::config::{ChatConfig, Settings};
use crate::permission::Permissions;
use crate::registry::FormatSnapshot;
use crate::renderer::{message_markup, render_snapshot, PlaceholderExpander};

/// Log target for per-message diagnostics, emitted only in debug mode.
pub const DEBUG_TARGET: &str = "nebo::debug";

/// Settings and templates published together by one reload.
#[derive(Debug, Clone)]
struct ChatState {
    settings: Settings,
    formats: Arc<FormatSnapshot>,
}

impl ChatState {
    fn from_config(config: ChatConfig) -> Self {
        Self {
            settings: config.settings,
            formats: Arc::new(FormatSnapshot::build(config.templates)),
        }
    }
}

/// Formats chat for one server.
///
/// `K` identifies a sender (a UUID, a connection id, ...).
pub struct ChatFormatter<K>
where
    K: Eq + Hash,
{
    state: ArcSwap<ChatState>,
    placeholders: Option<Arc<dyn PlaceholderExpander>>,
    cache: RecentMessageCache<K>,
}

impl<K> ChatFormatter<K>
where
    K: Eq + Hash + Debug,
{
    pub fn new(config: ChatConfig) -> Self {
        Self {
            state: ArcSwap::from_pointee(ChatState::from_config(config)),
            placeholders: None,
            cache: RecentMessageCache::new(),
        }
    }

    /// Installs a third-party placeholder hook for player templates.
    pub fn with_placeholders(mut self, expander: Arc<dyn PlaceholderExpander>) -> Self {
        self.placeholders = Some(expander);
        self
    }

    /// Replaces the message cache, e.g. to change its capacity.
    pub fn with_cache(mut self, cache: RecentMessageCache<K>) -> Self {
        self.cache = cache;
        self
    }

    /// Remembers `raw` as the latest message of `sender`.
    pub fn handle_message(&self, sender: K, raw: &str) {
        let settings = self.settings();
        if settings.debug {
            info!(
                target: DEBUG_TARGET,
                sender = ?sender,
                original = raw,
                processed = %message_markup(raw, settings.legacy_mixing),
                legacy_mixing = settings.legacy_mixing,
                "chat message received"
            );
        }
        self.cache.put(sender, raw);
    }

    /// Renders the cached message of `sender` for one viewer.
    ///
    /// A sender without a cached message renders with an empty body.
    /// `display_name` of `None` renders as the console.
    pub fn render_for(
        &self,
        sender: &K,
        display_name: Option<&str>,
        perms: &dyn Permissions,
    ) -> Component {
        let raw = self.cache.get(sender);
        if self.debug_enabled() {
            info!(
                target: DEBUG_TARGET,
                sender = ?sender,
                cached = raw.is_some(),
                "rendering chat message"
            );
        }
        self.format_message(display_name, Some(raw.as_deref().unwrap_or("")), perms)
    }

    /// Renders `raw` directly, without the cache.
    ///
    /// Templates and the legacy-mixing flag come from the same published
    /// state, so a concurrent reload is seen entirely or not at all.
    pub fn format_message(
        &self,
        display_name: Option<&str>,
        raw: Option<&str>,
        perms: &dyn Permissions,
    ) -> Component {
        let state = self.state.load();
        render_snapshot(
            &state.formats,
            self.placeholders.as_deref(),
            display_name,
            raw,
            perms,
            state.settings.legacy_mixing,
        )
    }

    /// Forgets the cached message of a sender who left.
    pub fn remove_sender(&self, sender: &K) -> bool {
        self.cache.remove(sender).is_some()
    }

    /// Shows what `sample` would look like for someone holding `perms`,
    /// rendered with the console as the sender.
    pub fn preview_format(&self, perms: &dyn Permissions, sample: &str) -> Component {
        self.format_message(None, Some(sample), perms)
    }

    /// Like [`preview_format`](Self::preview_format), with a chosen name.
    pub fn preview_format_as(
        &self,
        display_name: &str,
        perms: &dyn Permissions,
        sample: &str,
    ) -> Component {
        self.format_message(Some(display_name), Some(sample), perms)
    }

    /// Swaps in a new configuration with a single atomic store.
    ///
    /// A render in flight finishes with the templates and settings it
    /// started with.
    pub fn reload(&self, config: ChatConfig) {
        let next = ChatState::from_config(config);
        info!(
            formats = next.formats.len(),
            debug = next.settings.debug,
            legacy_mixing = next.settings.legacy_mixing,
            "chat configuration reloaded"
        );
        self.state.store(Arc::new(next));
    }

    /// Flips debug mode and returns the new state.
    pub fn toggle_debug(&self) -> bool {
        let previous = self.state.rcu(|current| ChatState {
            settings: Settings {
                debug: !current.settings.debug,
                ..current.settings
            },
            formats: Arc::clone(&current.formats),
        });
        !previous.settings.debug
    }

    pub fn debug_enabled(&self) -> bool {
        self.state.load().settings.debug
    }

    pub fn legacy_mixing_enabled(&self) -> bool {
        self.state.load().settings.legacy_mixing
    }

    pub fn settings(&self) -> Settings {
        self.state.load().settings
    }

    /// The live template snapshot, for dumping the configuration.
    pub fn templates(&self) -> Arc<FormatSnapshot> {
        Arc::clone(&self.state.load().formats)
    }

    pub fn cache(&self) -> &RecentMessageCache<K> {
        &self.cache
    }
}

impl<K> Debug for ChatFormatter<K>
where
    K: Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatFormatter")
            .field("state", &self.state)
            .field("placeholders", &self.placeholders.is_some())
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatTemplate;
    use crate::permission::PermissionSet;

    fn config(legacy_mixing: bool) -> ChatConfig {
        ChatConfig::new(
            Settings {
                debug: false,
                legacy_mixing,
            },
            vec![
                FormatTemplate::new("default", "{display_name}: {message}"),
                FormatTemplate::new("staff", "[Staff] {display_name}: {message}")
                    .with_permission("nebo.staff"),
            ],
        )
    }

    mod messages {
        use super::*;

        #[test]
        fn render_uses_cached_message() {
            let chat = ChatFormatter::new(config(true));
            chat.handle_message("ann", "&aHello");
            let out = chat.render_for(&"ann", Some("Ann"), &PermissionSet::new());
            assert_eq!(out.plain_text(), "Ann: Hello");
        }

        #[test]
        fn uncached_sender_has_empty_body() {
            let chat: ChatFormatter<&str> = ChatFormatter::new(config(true));
            let out = chat.render_for(&"ghost", Some("Ghost"), &PermissionSet::new());
            assert_eq!(out.plain_text(), "Ghost: ");
        }

        #[test]
        fn remove_sender_forgets() {
            let chat = ChatFormatter::new(config(true));
            chat.handle_message(1u8, "hi");
            assert!(chat.remove_sender(&1));
            assert!(!chat.remove_sender(&1));
            assert!(chat.cache().is_empty());
        }

        #[test]
        fn console_name() {
            let chat: ChatFormatter<u8> = ChatFormatter::new(config(false));
            let out = chat.format_message(None, Some("hello"), &PermissionSet::new());
            assert_eq!(out.plain_text(), "Console: hello");
        }

        #[test]
        fn permissions_pick_template() {
            let chat: ChatFormatter<u8> = ChatFormatter::new(config(false));
            let staff = PermissionSet::new().with("nebo.staff");
            let out = chat.preview_format_as("Bo", &staff, "yo");
            assert_eq!(out.plain_text(), "[Staff] Bo: yo");
            let out = chat.preview_format(&staff, "yo");
            assert_eq!(out.plain_text(), "[Staff] Console: yo");
        }

        #[test]
        fn eviction_keeps_the_message_just_sent() {
            let chat = ChatFormatter::new(config(false))
                .with_cache(RecentMessageCache::bounded(1, 10));
            chat.handle_message(1u8, "first");
            chat.handle_message(2u8, "second");
            let out = chat.render_for(&2, Some("Bo"), &PermissionSet::new());
            assert_eq!(out.plain_text(), "Bo: second");
        }

        #[test]
        fn placeholder_hook_applies() {
            let expander = |name: &str, template: &str| format!("[{}] {}", name.len(), template);
            let chat: ChatFormatter<u8> = ChatFormatter::new(config(false))
                .with_placeholders(Arc::new(expander));
            let out = chat.format_message(Some("Ann"), Some("x"), &PermissionSet::new());
            assert_eq!(out.plain_text(), "[3] Ann: x");
            let out = chat.preview_format(&PermissionSet::new(), "x");
            assert_eq!(out.plain_text(), "Console: x");
        }
    }

    mod settings {
        use super::*;

        #[test]
        fn toggle_debug_flips() {
            let chat: ChatFormatter<u8> = ChatFormatter::new(config(false));
            assert!(!chat.debug_enabled());
            assert!(chat.toggle_debug());
            assert!(chat.debug_enabled());
            assert!(!chat.toggle_debug());
            // Legacy mixing is untouched by the toggle.
            assert!(!chat.legacy_mixing_enabled());
        }

        #[test]
        fn debug_mode_still_caches() {
            let chat = ChatFormatter::new(config(true));
            chat.toggle_debug();
            chat.handle_message(3u8, "&cx");
            assert_eq!(chat.cache().get(&3).as_deref(), Some("&cx"));
        }

        #[test]
        fn reload_swaps_templates_and_settings() {
            let chat: ChatFormatter<u8> = ChatFormatter::new(config(false));
            let mut next = config(true);
            next.templates = vec![FormatTemplate::new("default", "<< {message}")];
            chat.reload(next);

            assert!(chat.legacy_mixing_enabled());
            assert_eq!(chat.templates().len(), 1);
            let out = chat.format_message(Some("Ann"), Some("&ahi"), &PermissionSet::new().with("*"));
            assert_eq!(out.plain_text(), "<< hi");
        }

        #[test]
        fn reload_publishes_templates_with_settings() {
            let chat: ChatFormatter<u8> = ChatFormatter::new(config(false));
            let before = chat.templates();
            chat.toggle_debug();
            // Toggling settings republishes the same template snapshot.
            assert!(Arc::ptr_eq(&before, &chat.templates()));

            let mut next = config(true);
            next.templates = vec![FormatTemplate::new("default", "new {message}")];
            chat.reload(next);
            assert!(!Arc::ptr_eq(&before, &chat.templates()));
            assert_eq!(chat.settings(), Settings { debug: false, legacy_mixing: true });
        }
    }
}
