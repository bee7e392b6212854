//! Nesting of dotted keys into a tree.
//!
//! `{"a.b.c": "x"}` becomes `{"a": {"b": {"c": "x"}}}`. Two keys can collide
//! when one is a prefix of the other:
//!
//! - a leaf landing on an existing group replaces the group;
//! - a key that would descend through an existing leaf is dropped and the
//!   leaf is kept.
//!
//! Both cases are reported as [`DiagnosticKind::TreeConflict`] warnings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::diagnostics::{Diagnostic, DiagnosticKind};

/// A node of the nested translation document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum KeyTree {
    Leaf(String),
    Node(BTreeMap<String, KeyTree>),
}

impl Default for KeyTree {
    fn default() -> Self {
        KeyTree::Node(BTreeMap::new())
    }
}

impl KeyTree {
    /// Joins the tree back into dotted keys.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        self.flatten_into(String::new(), &mut out);
        out
    }

    fn flatten_into(&self, prefix: String, out: &mut BTreeMap<String, String>) {
        match self {
            KeyTree::Leaf(value) => {
                out.insert(prefix, value.clone());
            }
            KeyTree::Node(children) => {
                for (segment, child) in children {
                    let path = if prefix.is_empty() {
                        segment.clone()
                    } else {
                        format!("{}.{}", prefix, segment)
                    };
                    child.flatten_into(path, out);
                }
            }
        }
    }
}

/// Builds a tree from flat entries, in the order given.
///
/// Entries are processed in a single pass; which side of a collision survives
/// depends on that order.
pub fn build_tree<'a, I>(entries: I) -> (KeyTree, Vec<Diagnostic>)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut root: BTreeMap<String, KeyTree> = BTreeMap::new();
    let mut diagnostics = Vec::new();

    'entries: for (key, value) in entries {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        let mut node = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            node = match node
                .entry(segment.to_string())
                .or_insert_with(KeyTree::default)
            {
                KeyTree::Node(children) => children,
                KeyTree::Leaf(_) => {
                    let blocker = segments[..=depth].join(".");
                    diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::TreeConflict,
                        format!(
                            "key {:?} skipped: {:?} already holds a string value",
                            key, blocker
                        ),
                    ));
                    continue 'entries;
                }
            };
        }

        if let Some(KeyTree::Node(_)) = node.get(*leaf) {
            diagnostics.push(Diagnostic::warning(
                DiagnosticKind::TreeConflict,
                format!("key {:?} replaces a nested group of keys", key),
            ));
        }
        node.insert(leaf.to_string(), KeyTree::Leaf(value.to_string()));
    }

    (KeyTree::Node(root), diagnostics)
}
