//! Organization tree panel state

use crate::models::OrgNode;
use std::collections::HashSet;

/// Key of the synthetic root standing for "no organization filter"
pub const ALL_KEY: &str = "all";

/// Title of the synthetic root
pub const ALL_TITLE: &str = "All nodes";

/// Message shown when the hierarchy cannot be loaded
pub const TREE_FALLBACK: &str = "Failed to load organization tree";

/// Display tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub key: String,
    pub title: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn from_org(node: &OrgNode) -> Self {
        Self {
            key: node.id.clone(),
            title: node.name.clone(),
            children: node.children().iter().map(Self::from_org).collect(),
        }
    }

    /// Wrap the server's top-level nodes under the synthetic root
    pub fn root(nodes: &[OrgNode]) -> Self {
        Self {
            key: ALL_KEY.to_string(),
            title: ALL_TITLE.to_string(),
            children: nodes.iter().map(Self::from_org).collect(),
        }
    }
}

/// One visible line of the flattened tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub key: String,
    pub title: String,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Tree panel: hierarchy, expansion, cursor and current selection
#[derive(Debug, Default)]
pub struct OrgTree {
    root: Option<TreeNode>,
    expanded: HashSet<String>,
    cursor: usize,
    selected_key: Option<String>,
    pub loading: bool,
}

impl OrgTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the hierarchy. The root starts expanded and selected.
    pub fn set_nodes(&mut self, nodes: &[OrgNode]) {
        self.root = Some(TreeNode::root(nodes));
        self.expanded = HashSet::from([ALL_KEY.to_string()]);
        self.cursor = 0;
        self.selected_key = Some(ALL_KEY.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    /// Visible rows in display order
    pub fn rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        if let Some(root) = &self.root {
            self.flatten(root, 0, &mut rows);
        }
        rows
    }

    fn flatten(&self, node: &TreeNode, depth: usize, rows: &mut Vec<TreeRow>) {
        let expanded = self.expanded.contains(&node.key);
        rows.push(TreeRow {
            key: node.key.clone(),
            title: node.title.clone(),
            depth,
            has_children: !node.children.is_empty(),
            expanded,
        });
        if expanded {
            for child in &node.children {
                self.flatten(child, depth + 1, rows);
            }
        }
    }

    fn current_row(&self) -> Option<TreeRow> {
        self.rows().into_iter().nth(self.cursor)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.rows().len() {
            self.cursor += 1;
        }
    }

    pub fn expand(&mut self) {
        if let Some(row) = self.current_row().filter(|r| r.has_children) {
            self.expanded.insert(row.key);
        }
    }

    pub fn collapse(&mut self) {
        if let Some(row) = self.current_row() {
            self.expanded.remove(&row.key);
        }
    }

    pub fn toggle(&mut self) {
        match self.current_row() {
            Some(row) if row.expanded => self.collapse(),
            Some(_) => self.expand(),
            None => {}
        }
    }

    /// Select the node under the cursor.
    ///
    /// Returns `None` when the tree is empty, `Some(None)` for the "all" node
    /// and `Some(Some(id))` for any other node.
    pub fn select(&mut self) -> Option<Option<String>> {
        let row = self.current_row()?;
        self.selected_key = Some(row.key.clone());
        Some((row.depth > 0).then_some(row.key))
    }
}
