//! in-memory [TreeSource]
use super::{Binding, Entry, TreeError, TreeSource};
use crate::value::Scalar;
use indexmap::IndexMap;

/// Order preserving tree of named sub-trees and leaves
#[derive(Debug, Clone)]
pub struct MemoryTree {
    root: IndexMap<String, Node>,
    separator: char,
}

/// A sub-tree when `value` is `None`, a leaf otherwise
#[derive(Debug, Clone, Default)]
struct Node {
    children: IndexMap<String, Node>,
    value: Option<Scalar>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::with_separator('/')
    }
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(separator: char) -> Self {
        Self {
            root: Default::default(),
            separator,
        }
    }

    /// Bind `value` at `path`, creating sub-trees on the way
    ///
    /// Leaves in the way are replaced by sub-trees.
    pub fn insert(&mut self, path: &str, value: impl Into<Scalar>) {
        let segments = self.segments(path);
        self.insert_segments(&segments, value);
    }

    pub fn insert_segments<S: AsRef<str>>(&mut self, segments: &[S], value: impl Into<Scalar>) {
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let children = get_or_insert(&mut self.root, parents);
        children.insert(
            last.as_ref().to_string(),
            Node {
                children: Default::default(),
                value: Some(value.into()),
            },
        );
    }

    /// Make sure an (possibly empty) sub-tree exists at `segments`
    pub fn insert_subtree<S: AsRef<str>>(&mut self, segments: &[S]) {
        get_or_insert(&mut self.root, segments);
    }

    fn segments<'p>(&self, path: &'p str) -> Vec<&'p str> {
        path.split(self.separator)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    fn get(&self, path: &str) -> Option<&Node> {
        let segments = self.segments(path);
        let (last, parents) = segments.split_last()?;

        let mut children = &self.root;
        for segment in parents {
            let node = children.get(*segment)?;
            if node.value.is_some() {
                return None;
            }
            children = &node.children;
        }

        children.get(*last)
    }
}

fn get_or_insert<'t, S: AsRef<str>>(
    mut children: &'t mut IndexMap<String, Node>,
    segments: &[S],
) -> &'t mut IndexMap<String, Node> {
    for segment in segments {
        let node = children.entry(segment.as_ref().to_string()).or_default();
        // a leaf in the way becomes a sub-tree
        node.value = None;
        children = &mut node.children;
    }

    children
}

impl TreeSource for MemoryTree {
    fn separator(&self) -> char {
        self.separator
    }

    fn list_children(&self, path: &str) -> Result<Vec<Binding>, TreeError> {
        let children = if self.segments(path).is_empty() {
            &self.root
        } else {
            match self.get(path) {
                Some(Node { value: Some(_), .. }) => {
                    return Err(TreeError::NotASubtree(path.to_string()))
                }
                Some(node) => &node.children,
                None => return Err(TreeError::NotFound(path.to_string())),
            }
        };

        Ok(children
            .iter()
            .map(|(name, node)| Binding {
                name: name.clone(),
                entry: match &node.value {
                    Some(value) => Entry::Leaf(value.clone()),
                    None => Entry::Subtree,
                },
            })
            .collect())
    }

    fn lookup(&self, path: &str) -> Result<Scalar, TreeError> {
        match self.get(path) {
            Some(Node {
                value: Some(value), ..
            }) => Ok(value.clone()),
            Some(_) => Err(TreeError::NotALeaf(path.to_string())),
            None => Err(TreeError::NotFound(path.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leaf_in_the_way_becomes_a_subtree() {
        let mut tree = MemoryTree::new();
        tree.insert("a/b", "leaf");
        tree.insert("a/b/c", "deeper");

        assert_eq!(tree.lookup("a/b/c"), Ok(Scalar::from("deeper")));
        assert_eq!(tree.lookup("a/b"), Err(TreeError::NotALeaf("a/b".to_string())));
        assert_eq!(tree.list_children("a").unwrap(), vec![Binding::subtree("b")]);
    }

    #[test]
    fn subtree_replaced_by_leaf() {
        let mut tree = MemoryTree::new();
        tree.insert("a/b", "x");
        tree.insert("a", "flat");

        assert_eq!(tree.lookup("a"), Ok(Scalar::from("flat")));
        assert_eq!(tree.lookup("a/b"), Err(TreeError::NotFound("a/b".to_string())));
        assert_eq!(
            tree.list_children("a"),
            Err(TreeError::NotASubtree("a".to_string()))
        );
    }

    #[test]
    fn empty_subtree() {
        let mut tree = MemoryTree::new();
        tree.insert_subtree(&["a", "b"][..]);

        assert_eq!(tree.list_children("a/b"), Ok(vec![]));
        assert_eq!(tree.list_children("/"), Ok(vec![Binding::subtree("a")]));
    }
}
