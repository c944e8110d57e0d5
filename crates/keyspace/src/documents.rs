//! collection of json/yaml documents and their source paths
//!
//! [Documents] keeps every loaded document as a [Value] together with the
//! index of its source. A collection can be turned into
//! - a [PropertyStore]: nested objects become dotted keys, every leaf is added
//! - a [MemoryTree]: objects become sub-trees, everything else a leaf
use crate::hierarchy::MemoryTree;
use crate::options::Options;
use crate::store::PropertyStore;
use crate::value::{Scalar, Value};
use crate::visit::VisitLeaves;
use std::path::{Path, PathBuf};

pub type Source = Option<PathBuf>;

#[derive(Default, Debug)]
pub struct Documents {
    sources: Vec<Source>,
    roots: Vec<(usize, Value)>,
}

impl Documents {
    /// Inserts a parsed document
    pub fn insert(&mut self, document: Value, path: impl Into<Source>) {
        let source_index = self.sources.len();
        self.sources.push(path.into());
        self.roots.push((source_index, document));
    }

    pub fn documents(&self) -> impl Iterator<Item = (&Source, &Value)> {
        self.roots
            .iter()
            .map(|(source_index, value)| (&self.sources[*source_index], value))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Adds every leaf of every document, in load order
    ///
    /// Later documents add to the values of earlier ones.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn to_store(&self, options: Options) -> PropertyStore {
        let mut store = PropertyStore::with_options(options);

        for (source, document) in self.documents() {
            document.clone().visit_leaves("", &mut |(key, value): (String, Value)| {
                if key.is_empty() {
                    tracing::warn!(?source, "document root is not an object, skipped");
                    return;
                }
                store.add(key, value);
            });
        }

        store
    }

    /// Merges all documents into one tree
    ///
    /// Nulls are skipped. Arrays are kept whole as opaque leaves.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn to_tree(&self) -> MemoryTree {
        let mut tree = MemoryTree::new();

        for (source, document) in self.documents() {
            if !matches!(document, Value::Object(_)) {
                tracing::warn!(?source, "document root is not an object, skipped");
                continue;
            }
            insert_into_tree(&mut tree, &mut vec![], document);
        }

        tree
    }
}

fn insert_into_tree(tree: &mut MemoryTree, segments: &mut Vec<String>, value: &Value) {
    match value {
        Value::Null => {}
        Value::Scalar(scalar) => tree.insert_segments(segments.as_slice(), scalar.clone()),
        Value::Array(_) => {
            tree.insert_segments(segments.as_slice(), Scalar::Opaque(Box::new(value.clone())))
        }
        Value::Object(object) => {
            if object.is_empty() {
                tree.insert_subtree(segments.as_slice());
            }
            for (name, child) in object {
                segments.push(name.clone());
                insert_into_tree(tree, segments, child);
                segments.pop();
            }
        }
    }
}

impl Documents {
    /// Loads a `.json`, `.yaml` or `.yml` file
    pub fn load_file(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading file");

        let extension = file_path
            .extension()
            .map(|extension| extension.to_string_lossy().to_lowercase());
        let file_contents = std::fs::read_to_string(&file_path)?;

        let document = match extension.as_deref() {
            Some("json") => parse_json(&file_contents)?,
            Some("yaml" | "yml") => parse_yaml(&file_contents)?,
            _ => return Err(LoadError::UnsupportedFormat(file_path)),
        };

        self.insert(document, Some(file_path));
        Ok(())
    }

    /// Loads every supported file in `dir_path`, sorted by file name
    pub fn load_directory(&mut self, dir_path: &Path) -> Result<(), LoadError> {
        let mut file_paths = vec![];

        for dir_entry in std::fs::read_dir(dir_path)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }

            let file_path = dir_entry.path();
            if is_supported(&file_path) {
                file_paths.push(file_path);
            }
        }

        if file_paths.is_empty() {
            return Err(LoadError::NoFilesFound(dir_path.to_path_buf()));
        }

        file_paths.sort();
        for file_path in file_paths {
            self.load_file(&file_path)?;
        }

        Ok(())
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|extension| extension.to_string_lossy().to_lowercase())
        .is_some_and(|extension| matches!(extension.as_str(), "json" | "yaml" | "yml"))
}

pub fn parse_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str::<serde_yaml::Value>(text).map(Value::from)
}

pub fn parse_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str::<serde_json::Value>(text).map(Value::from)
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("No files found in directory {}", .0.display())]
    NoFilesFound(PathBuf),
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse json file")]
    Json(#[from] serde_json::Error),
    #[error("Unable to parse yaml file")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unsupported file type {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl From<Value> for Documents {
    fn from(value: Value) -> Self {
        let mut documents = Documents::default();
        documents.insert(value, None);
        documents
    }
}

/// Utility macro to create [Documents] from yaml text
///
/// Create from a single document
/// ```
/// # use keyspace::documents;
/// documents!("key: 42");
/// ```
///
/// Create from multiple documents (path required)
/// ```
/// # use keyspace::documents;
/// documents! {
///   "one.yaml" => "key: 1",
///   "two.yaml" => "key: 2"
/// };
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use keyspace::documents;
/// documents!("key: [unclosed");
/// ```
#[macro_export]
macro_rules! documents {
    // single document without source
    { $expr:expr } => {
        $crate::documents::Documents::from($crate::documents::parse_yaml($expr).expect("document must parse"))
    };
    // multi document with sources
    { $($source:expr => $expr:expr),+ } => {{
        let mut docs = $crate::documents::Documents::default();
        $(
            docs.insert($crate::documents::parse_yaml($expr).expect("document must parse"), Some(::std::path::PathBuf::from($source)));
        )+

        docs
    }};
}

#[cfg(test)]
mod test {
    use crate::configuration::Configuration;
    use crate::hierarchy::{HierarchicalConfiguration, TreeSource};
    use crate::options::Options;
    use crate::value::{Scalar, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn store_from_nested_documents() {
        let documents = documents! {
            "base.yaml" => r#"
                server:
                  hosts: alpha, beta
                  port: 8080
                nothing: ~
            "#,
            "override.yaml" => r#"
                server:
                  hosts: [gamma]
            "#
        };
        assert_eq!(documents.source_count(), 2);

        let store = documents.to_store(Options::default());
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["server.hosts", "server.port"]);
        assert_eq!(
            store.get_string_list("server.hosts"),
            Ok(vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()])
        );
        assert_eq!(store.get_typed::<i32>("server.port"), Ok(Some(8080)));
    }

    #[test]
    fn tree_from_nested_documents() {
        let documents = documents!(
            r#"
            java:comp:
              env:
                db: { url: "jdbc:h2:mem", pool: [1, 2] }
                empty: {}
                unset: ~
            "#
        );

        let tree = documents.to_tree();
        assert_eq!(
            tree.lookup("java:comp/env/db/url"),
            Ok(Scalar::from("jdbc:h2:mem"))
        );
        assert_eq!(
            tree.lookup("java:comp/env/db/pool"),
            Ok(Scalar::Opaque(Box::new(Value::from([1i64, 2]))))
        );
        assert_eq!(tree.list_children("java:comp/env/empty"), Ok(vec![]));
        assert!(tree.lookup("java:comp/env/unset").is_err());

        let config = HierarchicalConfiguration::new(tree).rooted_at("java:comp/env");
        assert_eq!(config.keys().collect::<Vec<_>>(), vec!["db.url", "db.pool"]);
    }

    #[test]
    fn scalar_root_is_skipped() {
        let documents = documents!("just text");
        assert!(documents.to_store(Options::default()).is_empty());
        assert!(documents.to_tree().list_children("").unwrap().is_empty());
    }

    #[test]
    fn json_documents() {
        let value = super::parse_json(r#"{"a": {"b": [true, null, 1.5]}}"#).unwrap();
        let store = super::Documents::from(value).to_store(Options::default());

        assert_eq!(
            store.get("a.b"),
            Some([Scalar::Boolean(true), Scalar::F64(1.5)].as_slice())
        );
    }
}
