use serde::{Deserialize, Serialize};

/// Boolean attributes carried by a reference-tree entry.
///
/// They only affect styling and are not mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFlags {
    #[serde(default)]
    pub tool: bool,
    #[serde(default)]
    pub registration: bool,
    #[serde(default)]
    pub darkweb: bool,
    #[serde(default)]
    pub manual: bool,
}

/// One node of the externally supplied reference tree.
///
/// A missing `children` field and an empty list both mean "leaf".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub flags: NodeFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
            flags: NodeFlags::default(),
            children: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Children in order; empty for leaves.
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(TreeNode::subtree_size)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_empty_children_are_leaves() {
        let missing: TreeNode = serde_json::from_str(r#"{"id":"a","name":"A"}"#).unwrap();
        let empty: TreeNode =
            serde_json::from_str(r#"{"id":"b","name":"B","children":[]}"#).unwrap();

        assert!(!missing.has_children());
        assert!(!empty.has_children());
        assert!(missing.children().is_empty());
    }

    #[test]
    fn test_flags_deserialize_flat() {
        let node: TreeNode = serde_json::from_str(
            r#"{"id":"x","name":"X","url":"https://example.org","tool":true,"darkweb":true}"#,
        )
        .unwrap();

        assert!(node.flags.tool);
        assert!(node.flags.darkweb);
        assert!(!node.flags.registration);
        assert!(!node.flags.manual);
        assert_eq!(node.url.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_subtree_size_counts_descendants() {
        let tree = TreeNode::new("root", "Root").with_children(vec![
            TreeNode::new("a", "A").with_children(vec![TreeNode::new("a1", "A1")]),
            TreeNode::new("b", "B"),
        ]);
        assert_eq!(tree.subtree_size(), 4);
    }
}
