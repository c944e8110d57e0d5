//! dotted key space on top of a [TreeSource]
//!
//! - values are read through on every access, nothing is cached
//! - keys are discovered by a depth-first walk of the tree
//! - `clear` records a tombstone locally, the source is never written to
//! - `add`/`set` are rejected, the source is managed elsewhere
//!
//! Every failure reported by the source while reading a value counts as "absent".
use super::{join, Entry, TreeError, TreeSource};
use crate::configuration::{Configuration, ConfigurationMut};
use crate::error::ConfigError;
use crate::interpolate::{Interpolator, Lookup};
use crate::options::Options;
use crate::value::{Scalar, Value};
use crate::visit::Visit;
use indexmap::IndexSet;
use std::borrow::Cow;

const TARGET: &str = "hierarchical configuration";

#[derive(Debug, Clone)]
pub struct HierarchicalConfiguration<S> {
    source: S,
    /// native path all keys are relative to
    root: String,
    tombstones: IndexSet<String>,
    options: Options,
}

/// How a key is resolved before the source is asked
enum Overlay {
    Tombstoned,
    Live { path: String },
}

impl<S: TreeSource> HierarchicalConfiguration<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            root: String::new(),
            tombstones: Default::default(),
            options: Options::default(),
        }
    }

    /// Resolve all keys relative to the sub-tree at native path `root`
    pub fn rooted_at(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_tombstoned(&self, key: &str) -> bool {
        self.tombstones.contains(key)
    }

    fn overlay(&self, key: &str) -> Overlay {
        if self.is_tombstoned(key) {
            return Overlay::Tombstoned;
        }

        let separator = self.source.separator();
        let native = key.replace('.', &separator.to_string());
        Overlay::Live {
            path: join(&self.root, &native, separator),
        }
    }

    /// Native path of the sub-tree addressed by the dotted `segments`
    ///
    /// Each segment has to name a sub-tree among the children of the previous
    /// one. Returns `None` as soon as one does not, or when listing fails.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn starting_point(&self, segments: &[&str]) -> Option<String> {
        let separator = self.source.separator();
        let mut path = self.root.clone();

        for segment in segments {
            let children = match self.source.list_children(&path) {
                Ok(children) => children,
                Err(err) => {
                    tracing::trace!(%path, %err, "listing failed");
                    return None;
                }
            };

            let found = children
                .iter()
                .any(|child| child.is_subtree() && child.name == *segment);
            if !found {
                tracing::trace!(%path, segment, "no such sub-tree");
                return None;
            }

            path = join(&path, segment, separator);
        }

        Some(path)
    }

    /// All leaf keys below the dotted `prefix`, depth first
    ///
    /// Keys are full dotted keys (including `prefix`), without duplicates and
    /// without tombstoned keys. A prefix naming a leaf yields just that key, an
    /// unknown prefix yields no keys.
    pub fn keys_under(&self, prefix: &str) -> Vec<String> {
        let segments: Vec<&str> = prefix.split('.').filter(|s| !s.is_empty()).collect();
        let Some(start) = self.starting_point(&segments) else {
            let key = segments.join(".");
            if !key.is_empty() && self.contains_key(&key) {
                return vec![key];
            }
            return vec![];
        };

        let mut keys = IndexSet::new();
        let result = self.walk(&start, &segments.join("."), &mut |key: String| {
            keys.insert(key);
        });
        if let Err(err) = result {
            tracing::warn!(%err, "incomplete key listing");
        }

        keys.into_iter()
            .filter(|key| !self.is_tombstoned(key))
            .collect()
    }

    fn walk(&self, path: &str, key: &str, visitor: &mut dyn Visit<String>) -> Result<(), TreeError> {
        let separator = self.source.separator();

        for child in self.source.list_children(path)? {
            let child_key = join(key, &child.name, '.');
            match child.entry {
                Entry::Subtree => {
                    let child_path = join(path, &child.name, separator);
                    tracing::trace!(path = %child_path, "descend");
                    self.walk(&child_path, &child_key, visitor)?;
                }
                Entry::Leaf(_) => visitor.visit(child_key),
            }
        }

        Ok(())
    }
}

impl<S: TreeSource> Lookup for HierarchicalConfiguration<S> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, [Scalar]>> {
        let Overlay::Live { path } = self.overlay(key) else {
            return None;
        };

        match self.source.lookup(&path) {
            Ok(value) => Some(Cow::Owned(vec![value])),
            Err(err) => {
                tracing::trace!(%path, %err, "lookup failed");
                None
            }
        }
    }
}

impl<S: TreeSource> Configuration for HierarchicalConfiguration<S> {
    fn contains_key(&self, key: &str) -> bool {
        match self.overlay(key) {
            Overlay::Tombstoned => false,
            Overlay::Live { path } => self.source.lookup(&path).is_ok(),
        }
    }

    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(self.keys_under("").into_iter())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(self.keys_under(prefix).into_iter())
    }

    fn is_empty(&self) -> bool {
        match self.source.list_children(&self.root) {
            Ok(children) => children.is_empty(),
            Err(err) => {
                tracing::warn!(root = %self.root, %err, "listing failed");
                true
            }
        }
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn interpolator(&self) -> Interpolator<'_> {
        Interpolator::new(self, self.options.max_interpolation_depth)
    }
}

impl<S: TreeSource> ConfigurationMut for HierarchicalConfiguration<S> {
    fn add_property(&mut self, _key: &str, _value: Value) -> Result<(), ConfigError> {
        Err(ConfigError::Unsupported {
            operation: "add",
            target: TARGET,
        })
    }

    fn set_property(&mut self, _key: &str, _value: Value) -> Result<(), ConfigError> {
        Err(ConfigError::Unsupported {
            operation: "set",
            target: TARGET,
        })
    }

    /// Hide `key` from now on. The source keeps it.
    fn clear_property(&mut self, key: &str) {
        if self.tombstones.insert(key.to_string()) {
            tracing::debug!(key, "tombstoned");
        }
    }
}
