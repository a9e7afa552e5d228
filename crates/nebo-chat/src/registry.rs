//! Permission-ordered template registry.
//!
//! The registry holds one immutable [`FormatSnapshot`] at a time. Reloading
//! builds a complete new snapshot and publishes it with a single atomic
//! swap, so a render that loaded the old snapshot keeps a consistent view
//! until it finishes.
//!
//! # Resolution
//!
//! [`FormatSnapshot::resolve`] walks templates in insertion order and picks
//! the first gated template whose permission the caller holds. Ungated
//! templates are never picked by that walk; the default template is the
//! only unconditional choice.
//!
//! ```rust
//! use nebo_chat::{FormatRegistry, FormatTemplate};
//!
//! let registry = FormatRegistry::new(vec![
//!     FormatTemplate::new("default", "{display_name}: {message}"),
//!     FormatTemplate::new("admin", "[A] {display_name}: {message}").with_permission("nebo.admin"),
//! ]);
//!
//! let admin = |node: &str| node == "nebo.admin";
//! assert_eq!(registry.resolve(&admin).id(), "admin");
//!
//! let guest = |_: &str| false;
//! assert_eq!(registry.resolve(&guest).id(), "default");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::warn;

use crate::format::{FormatTemplate, DEFAULT_TEMPLATE_ID};
use crate::permission::Permissions;

/// One complete, immutable set of templates.
#[derive(Debug, Clone)]
pub struct FormatSnapshot {
    templates: Vec<Arc<FormatTemplate>>,
    default: Arc<FormatTemplate>,
}

impl FormatSnapshot {
    /// Builds a snapshot, keeping insertion order.
    ///
    /// A missing `default` entry is synthesized. Of several entries sharing
    /// an id, the first is kept.
    pub fn build(templates: impl IntoIterator<Item = FormatTemplate>) -> Self {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for template in templates {
            if !seen.insert(template.id().to_string()) {
                warn!(template = %template.id(), "duplicate format id, keeping the first");
                continue;
            }
            if !template.is_gated() && !template.is_default() {
                warn!(
                    template = %template.id(),
                    "format has no permission and is not the default; it will never be selected"
                );
            }
            ordered.push(Arc::new(template));
        }

        let default = match ordered.iter().find(|t| t.is_default()) {
            Some(default) => Arc::clone(default),
            None => {
                warn!("no '{}' format configured, using the built-in one", DEFAULT_TEMPLATE_ID);
                Arc::new(FormatTemplate::synthesized_default())
            }
        };

        Self {
            templates: ordered,
            default,
        }
    }

    /// First gated template whose permission `perms` grants, else the default.
    pub fn resolve(&self, perms: &dyn Permissions) -> Arc<FormatTemplate> {
        self.templates
            .iter()
            .find(|template| {
                template
                    .required_permission()
                    .is_some_and(|node| perms.allows(node))
            })
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(&self.default))
    }

    /// Templates in insertion order.
    pub fn templates(&self) -> &[Arc<FormatTemplate>] {
        &self.templates
    }

    pub fn default_template(&self) -> &Arc<FormatTemplate> {
        &self.default
    }

    pub fn get(&self, id: &str) -> Option<&Arc<FormatTemplate>> {
        self.templates.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for FormatSnapshot {
    fn default() -> Self {
        Self::build(std::iter::empty())
    }
}

/// The live template set, swappable at runtime.
#[derive(Debug)]
pub struct FormatRegistry {
    snap: ArcSwap<FormatSnapshot>,
}

impl FormatRegistry {
    pub fn new(templates: impl IntoIterator<Item = FormatTemplate>) -> Self {
        Self {
            snap: ArcSwap::from_pointee(FormatSnapshot::build(templates)),
        }
    }

    /// The live snapshot. Hold on to it to see one consistent template set
    /// across several lookups.
    pub fn snapshot(&self) -> Arc<FormatSnapshot> {
        self.snap.load_full()
    }

    /// Resolves against the live snapshot.
    pub fn resolve(&self, perms: &dyn Permissions) -> Arc<FormatTemplate> {
        self.snap.load().resolve(perms)
    }

    /// Builds a new snapshot from `templates` and publishes it.
    pub fn reload(&self, templates: impl IntoIterator<Item = FormatTemplate>) {
        self.snap.store(Arc::new(FormatSnapshot::build(templates)));
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}
