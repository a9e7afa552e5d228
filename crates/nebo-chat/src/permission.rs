//! Permission checks.
//!
//! The formatter knows nothing about how permissions are stored. It asks a
//! [`Permissions`] implementation one node at a time. Plain closures work:
//!
//! ```rust
//! use nebo_chat::Permissions;
//!
//! let staff = |node: &str| node == "nebo.format.staff";
//! assert!(staff.allows("nebo.format.staff"));
//! assert!(!staff.allows("nebo.format.admin"));
//! ```
//!
//! Backends that can fail (a remote authorization service, say) implement
//! [`Permissions::check`] with a real error, or wrap a fallible closure in
//! [`Fallible`]. A failed check is always treated as denied.

use std::collections::HashSet;

use tracing::debug;

use crate::error::PermissionError;

/// Answers "does the caller hold this permission node?".
pub trait Permissions: Send + Sync {
    /// Checks one node. An `Err` means the backend could not answer.
    fn check(&self, node: &str) -> Result<bool, PermissionError>;

    /// Checks one node, counting a failed check as denied.
    fn allows(&self, node: &str) -> bool {
        match self.check(node) {
            Ok(granted) => granted,
            Err(err) => {
                debug!(node, error = %err, "permission check failed, treating as denied");
                false
            }
        }
    }
}

impl<F> Permissions for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn check(&self, node: &str) -> Result<bool, PermissionError> {
        Ok(self(node))
    }
}

/// Adapts a fallible closure into a [`Permissions`] backend.
pub struct Fallible<F>(pub F);

impl<F> Permissions for Fallible<F>
where
    F: Fn(&str) -> Result<bool, PermissionError> + Send + Sync,
{
    fn check(&self, node: &str) -> Result<bool, PermissionError> {
        (self.0)(node)
    }
}

/// Nobody holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPermissions;

impl Permissions for NoPermissions {
    fn check(&self, _node: &str) -> Result<bool, PermissionError> {
        Ok(false)
    }
}

/// An in-memory set of granted nodes.
///
/// Supports wildcards: `*` grants everything, and `a.b.*` grants `a.b` and
/// every node below it.
///
/// ```rust
/// use nebo_chat::{PermissionSet, Permissions};
///
/// let perms = PermissionSet::new().with("nebo.format.*");
/// assert!(perms.allows("nebo.format.admin"));
/// assert!(!perms.allows("nebo.reload"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    nodes: HashSet<String>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`grant`](Self::grant).
    pub fn with(mut self, node: impl Into<String>) -> Self {
        self.grant(node);
        self
    }

    pub fn grant(&mut self, node: impl Into<String>) {
        self.nodes.insert(node.into().to_ascii_lowercase());
    }

    pub fn revoke(&mut self, node: &str) -> bool {
        self.nodes.remove(&node.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn holds(&self, node: &str) -> bool {
        if node.is_empty() {
            return false;
        }
        let node = node.to_ascii_lowercase();
        if self.nodes.contains("*") || self.nodes.contains(&node) {
            return true;
        }
        // Walk up the dotted path looking for `prefix.*` grants.
        let mut prefix = node.as_str();
        loop {
            if self.nodes.contains(&format!("{}.*", prefix)) {
                return true;
            }
            match prefix.rfind('.') {
                Some(dot) => prefix = &prefix[..dot],
                None => return false,
            }
        }
    }
}

impl Permissions for PermissionSet {
    fn check(&self, node: &str) -> Result<bool, PermissionError> {
        Ok(self.holds(node))
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = PermissionSet::new();
        for node in iter {
            set.grant(node);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod closures {
        use super::*;

        #[test]
        fn closure_is_permissions() {
            let only_admin = |node: &str| node == "admin";
            assert!(only_admin.allows("admin"));
            assert!(!only_admin.allows("mod"));
        }

        #[test]
        fn failing_backend_denies() {
            let broken = Fallible(|node: &str| -> Result<bool, PermissionError> {
                Err(PermissionError::new(node, "backend offline"))
            });
            assert!(broken.check("x").is_err());
            assert!(!broken.allows("x"));
        }

        #[test]
        fn nothing_granted() {
            assert!(!NoPermissions.allows("anything"));
        }
    }

    mod sets {
        use super::*;

        #[test]
        fn exact_nodes() {
            let perms: PermissionSet = ["nebo.format.vip", "nebo.reload"].into_iter().collect();
            assert!(perms.allows("nebo.format.vip"));
            assert!(perms.allows("NEBO.RELOAD"));
            assert!(!perms.allows("nebo.format.admin"));
            assert_eq!(perms.len(), 2);
        }

        #[test]
        fn prefix_wildcard() {
            let perms = PermissionSet::new().with("nebo.format.*");
            assert!(perms.allows("nebo.format"));
            assert!(perms.allows("nebo.format.admin"));
            assert!(perms.allows("nebo.format.a.b"));
            assert!(!perms.allows("nebo.formats"));
            assert!(!perms.allows("nebo"));
        }

        #[test]
        fn star_grants_everything() {
            let perms = PermissionSet::new().with("*");
            assert!(perms.allows("anything.at.all"));
            assert!(!perms.allows(""));
        }

        #[test]
        fn revoke() {
            let mut perms = PermissionSet::new().with("a");
            assert!(perms.revoke("a"));
            assert!(!perms.allows("a"));
            assert!(perms.is_empty());
        }
    }
}
