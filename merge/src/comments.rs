//! Per-call store of comments authored above declarations and members.
//!
//! The registry is a plain value owned by one merge call. The merger fills it
//! while folding declarations and the serializer reads it back when rendering
//! descriptions as comments, so concurrent merges never observe each other.

use std::collections::HashMap;

use sdl_merge_core::CommentLookup;

/// Comments keyed by node path (`User`, `User.id`, `User.id.first`,
/// `Color.RED`, `@auth`, `@auth.role`, `schema`).
///
/// # Examples
///
/// ```
/// use sdl_merge::CommentRegistry;
///
/// let mut registry = CommentRegistry::new();
/// registry.record("User", "Account holder");
/// registry.record("User", "ignored, first comment wins");
/// assert_eq!(registry.lookup("User"), Some("Account holder"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommentRegistry {
    entries: HashMap<String, String>,
}

impl CommentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every recorded comment.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Records `text` for `path` unless the path already has a comment.
    /// Blank text is ignored.
    pub fn record(&mut self, path: impl Into<String>, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.entries.entry(path.into()).or_insert(text);
    }

    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CommentLookup for CommentRegistry {
    fn comment_for(&self, path: &str) -> Option<&str> {
        self.lookup(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_recorded_comment_wins() {
        let mut registry = CommentRegistry::new();
        registry.record("User.id", "primary key");
        registry.record("User.id", "later");
        assert_eq!(registry.lookup("User.id"), Some("primary key"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_blank_comments_are_skipped() {
        let mut registry = CommentRegistry::new();
        registry.record("User", "   ");
        assert!(registry.is_empty());
        registry.record("User", "real");
        assert_eq!(registry.comment_for("User"), Some("real"));
    }

    #[test]
    fn test_reset_clears_entries() {
        let mut registry = CommentRegistry::new();
        registry.record("schema", "roots");
        registry.reset();
        assert!(registry.is_empty());
        assert_eq!(registry.lookup("schema"), None);
    }
}
