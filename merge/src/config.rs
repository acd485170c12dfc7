//! Merge configuration.
//!
//! [`MergeConfig`] is an immutable snapshot read by every stage of one merge
//! call. It can be built in code or loaded from a YAML or JSON file; every
//! key is optional and missing keys take their defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! use_schema_definition: true
//! force_schema_definition: false
//! throw_on_conflict: true
//! comment_descriptions: false
//! reverse_directives: false
//! exclusions:
//!   - Internal
//!   - User.password
//! sort: true
//! convert_extensions: true
//! consistent_enum_merge: false
//! ignore_field_conflicts: false
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use sdl_merge_core::TypeRef;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Comparator over declaration names; the root schema block passes `None`.
pub type Comparator = Arc<dyn Fn(Option<&str>, Option<&str>) -> Ordering + Send + Sync>;

/// How the final declaration list is ordered.
///
/// Deserializes from a boolean (`true` selects [`SortOrder::Lexical`]); a
/// [`SortOrder::Custom`] comparator can only be set in code.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum SortOrder {
    /// First-seen order, root block last.
    #[default]
    Unsorted,
    /// Ascending by name, root block last.
    Lexical,
    /// Caller-supplied comparator.
    Custom(Comparator),
}

impl SortOrder {
    pub fn custom<F>(compare: F) -> Self
    where
        F: Fn(Option<&str>, Option<&str>) -> Ordering + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(compare))
    }

    pub fn is_sorted(&self) -> bool {
        !matches!(self, Self::Unsorted)
    }
}

/// Default comparator: ascending by name, nameless entries last.
pub fn lexical_order(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl From<bool> for SortOrder {
    fn from(sort: bool) -> Self {
        if sort { Self::Lexical } else { Self::Unsorted }
    }
}

impl From<SortOrder> for bool {
    fn from(sort: SortOrder) -> Self {
        sort.is_sorted()
    }
}

impl fmt::Debug for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsorted => f.write_str("Unsorted"),
            Self::Lexical => f.write_str("Lexical"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A shared field whose definitions could not be reconciled.
///
/// When the clash is in one of the field's arguments, `argument` names it
/// and `existing`/`incoming` are that argument's types.
#[derive(Debug, Clone, Copy)]
pub struct FieldConflict<'a> {
    pub type_name: &'a str,
    pub field_name: &'a str,
    pub argument: Option<&'a str>,
    pub existing: &'a TypeRef,
    pub incoming: &'a TypeRef,
}

/// Outcome chosen by a field conflict hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Keep the earlier field.
    KeepExisting,
    /// Replace the earlier field with the later one.
    TakeIncoming,
    /// Apply the configured conflict policy.
    Default,
}

/// Callback consulted before the configured conflict policy.
#[derive(Clone)]
pub struct FieldConflictHook(Arc<dyn Fn(&FieldConflict<'_>) -> ConflictResolution + Send + Sync>);

impl FieldConflictHook {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&FieldConflict<'_>) -> ConflictResolution + Send + Sync + 'static,
    {
        Self(Arc::new(hook))
    }

    pub fn resolve(&self, conflict: &FieldConflict<'_>) -> ConflictResolution {
        (*self.0)(conflict)
    }
}

impl fmt::Debug for FieldConflictHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldConflictHook(..)")
    }
}

/// Options for one merge call.
///
/// # Examples
///
/// ```
/// use sdl_merge::{MergeConfig, SortOrder};
///
/// let config = MergeConfig::default()
///     .with_throw_on_conflict(true)
///     .with_sort(SortOrder::Lexical)
///     .with_exclusions(["User.secret"]);
/// assert!(config.use_schema_definition);
/// assert!(config.is_member_excluded("User", "secret"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Infer the root block from conventional type names when absent.
    pub use_schema_definition: bool,
    /// Synthesize `schema { query: Query }` when no root entry exists.
    pub force_schema_definition: bool,
    /// Unresolved conflicts fail instead of keeping the earlier definition.
    pub throw_on_conflict: bool,
    /// Render descriptions as `#` comments; output becomes text.
    pub comment_descriptions: bool,
    /// Later directives are prepended instead of appended.
    pub reverse_directives: bool,
    /// Qualified names (`Type`, `Type.member`, `@directive`) dropped from output.
    pub exclusions: Vec<String>,
    /// Final ordering of declarations.
    pub sort: SortOrder,
    /// Emit merged extensions as plain definitions.
    pub convert_extensions: bool,
    /// Differing enum value definitions are conflicts.
    pub consistent_enum_merge: bool,
    /// Keep the earliest field on structural conflict, never failing.
    pub ignore_field_conflicts: bool,
    /// Consulted first whenever two field types conflict.
    #[serde(skip)]
    pub on_field_conflict: Option<FieldConflictHook>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            use_schema_definition: true,
            force_schema_definition: false,
            throw_on_conflict: false,
            comment_descriptions: false,
            reverse_directives: false,
            exclusions: Vec::new(),
            sort: SortOrder::Unsorted,
            convert_extensions: false,
            consistent_enum_merge: false,
            ignore_field_conflicts: false,
            on_field_conflict: None,
        }
    }
}

impl MergeConfig {
    /// Parses a (possibly partial) configuration from YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a (possibly partial) configuration from JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads configuration from a `.yml`, `.yaml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownFormat`] for other extensions,
    /// [`ConfigError::Io`] if the file cannot be read, and a parse error if
    /// its contents are malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "yml" | "yaml" => Self::from_yaml_str(&std::fs::read_to_string(path)?),
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?),
            _ => Err(ConfigError::UnknownFormat(path.display().to_string())),
        }
    }

    pub fn with_use_schema_definition(mut self, enabled: bool) -> Self {
        self.use_schema_definition = enabled;
        self
    }

    pub fn with_force_schema_definition(mut self, enabled: bool) -> Self {
        self.force_schema_definition = enabled;
        self
    }

    pub fn with_throw_on_conflict(mut self, enabled: bool) -> Self {
        self.throw_on_conflict = enabled;
        self
    }

    pub fn with_comment_descriptions(mut self, enabled: bool) -> Self {
        self.comment_descriptions = enabled;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = exclusions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_on_field_conflict(mut self, hook: FieldConflictHook) -> Self {
        self.on_field_conflict = Some(hook);
        self
    }

    /// Whether the whole declaration at `path` (`Type` or `@directive`) is excluded.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclusions.iter().any(|excluded| excluded == path)
    }

    /// Whether `owner.member` is excluded.
    pub fn is_member_excluded(&self, owner: &str, member: &str) -> bool {
        self.exclusions.iter().any(|excluded| {
            excluded
                .split_once('.')
                .is_some_and(|(ty, name)| ty == owner && name == member)
        })
    }
}
