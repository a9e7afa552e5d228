//! Permission-aware chat formatting.
//!
//! Administrators write format templates in trusted markup; players write
//! messages in a restricted subset of it. This crate picks the template for
//! a sender by permission, parses both halves with the right parser, and
//! splices the message into the template.
//!
//! ```rust
//! use std::sync::Arc;
//! use nebo_chat::{FormatRegistry, FormatTemplate, PermissionSet, TemplateRenderer};
//!
//! let registry = Arc::new(FormatRegistry::new(vec![
//!     FormatTemplate::new("default", "<gray>{display_name}</gray>: {message}"),
//!     FormatTemplate::new("admin", "<red>[Admin]</red> {display_name}: {message}")
//!         .with_permission("nebo.format.admin"),
//! ]));
//! let renderer = TemplateRenderer::new(registry);
//!
//! let admin = PermissionSet::new().with("nebo.format.*");
//! let out = renderer.render("Ann", Some("&cHi"), &admin, true);
//! assert_eq!(out.plain_text(), "[Admin] Ann: Hi");
//! ```
//!
//! # Modules
//!
//! - [`FormatTemplate`] and [`FormatRegistry`]: the templates and the
//!   first-match-wins resolution over them, swapped atomically on reload
//! - [`TemplateRenderer`]: the render pipeline
//! - [`Permissions`]: how the host answers permission questions
//! - [`RecentMessageCache`]: bounded sender → raw message store
//! - [`ChatConfig`]: YAML configuration
//! - [`ChatFormatter`]: all of the above behind one host-facing type
//!
//! # Failure Behavior
//!
//! Rendering never fails. Unknown or disallowed tags render as literal
//! text, a permission backend error counts as denied, a missing default
//! template is synthesized. Only reading a configuration file returns
//! errors ([`ConfigError`]).
//!
//! Diagnostics go through `tracing`. Installing a subscriber is up to the
//! host.

mod cache;
mod chat;
mod config;
mod error;
mod format;
mod permission;
mod registry;
mod renderer;

pub use cache::{RecentMessageCache, DEFAULT_CACHE_CAPACITY, DEFAULT_EVICTION_BATCH};
pub use chat::{ChatFormatter, DEBUG_TARGET};
pub use config::{ChatConfig, Settings};
pub use error::{ConfigError, PermissionError};
pub use format::{
    FormatTemplate, DEFAULT_TEMPLATE_ID, DEFAULT_TEMPLATE_TEXT, DISPLAY_NAME_PLACEHOLDER,
    FALLBACK_TEMPLATE_TEXT, MESSAGE_PLACEHOLDER,
};
pub use permission::{Fallible, NoPermissions, PermissionSet, Permissions};
pub use registry::{FormatRegistry, FormatSnapshot};
pub use renderer::{
    message_markup, parse_message, PlaceholderExpander, TemplateRenderer, CONSOLE_NAME,
};

pub use nebo_markup::{Component, MarkupParser, ParseMode, Span, Style};
