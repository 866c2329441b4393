use super::{NodeFlags, TreeNode};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Flattened view of one tree entry.
#[derive(Debug, Clone)]
pub struct IndexedNode {
    pub name: String,
    pub url: Option<String>,
    pub flags: NodeFlags,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub depth: usize,
}

/// Id-keyed index over an immutable tree.
///
/// Duplicate ids are a contract violation; the later occurrence wins and a
/// warning is logged.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    root: Option<String>,
    nodes: HashMap<String, IndexedNode>,
}

impl TreeIndex {
    pub fn build(root: &TreeNode) -> Self {
        let mut index = Self {
            root: Some(root.id.clone()),
            nodes: HashMap::with_capacity(root.subtree_size()),
        };
        index.insert(root, None, 0);
        index
    }

    fn insert(&mut self, node: &TreeNode, parent: Option<&str>, depth: usize) {
        let entry = IndexedNode {
            name: node.name.clone(),
            url: node.url.clone(),
            flags: node.flags,
            parent: parent.map(str::to_string),
            children: node.children().iter().map(|c| c.id.clone()).collect(),
            depth,
        };
        if self.nodes.insert(node.id.clone(), entry).is_some() {
            warn!(id = %node.id, "duplicate node id in tree");
        }
        for child in node.children() {
            self.insert(child, Some(&node.id), depth + 1);
        }
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&IndexedNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// All strict descendants of `id`, walked through the data tree.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<&str> = self.children(id).iter().rev().map(String::as_str).collect();
        while let Some(current) = stack.pop() {
            out.push(current.to_string());
            stack.extend(self.children(current).iter().rev().map(String::as_str));
        }
        out
    }

    /// Ancestors of `id` from the root down, excluding `id` itself.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(|n| n.parent.clone());
        while let Some(parent) = current {
            current = self.get(&parent).and_then(|n| n.parent.clone());
            chain.push(parent);
            if chain.len() > self.nodes.len() {
                break;
            }
        }
        chain.reverse();
        chain
    }

    /// Every id that has at least one child.
    pub fn branch_ids(&self) -> BTreeSet<String> {
        self.nodes
            .iter()
            .filter(|(_, n)| !n.children.is_empty())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Case-insensitive substring match on names, ordered by depth then id.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        let mut hits: Vec<(&usize, &String)> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.name.to_lowercase().contains(&needle))
            .map(|(id, n)| (&n.depth, id))
            .collect();
        hits.sort();
        hits.into_iter().map(|(_, id)| id.clone()).collect()
    }
}
