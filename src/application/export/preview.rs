//! Terminal preview of a tree via `termtree`.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{format_currency, TreeNode};

/// Titles longer than this are shortened in the preview.
const MAX_TITLE_CHARS: usize = 60;

/// Limits keeping a preview of a large tree readable.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOptions {
    /// Deepest level expanded; `None` expands everything
    pub max_depth: Option<usize>,
    /// Children shown per node before eliding the rest
    pub max_items: usize,
    pub currency_symbol: String,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(3),
            max_items: 10,
            currency_symbol: "₱".to_string(),
        }
    }
}

pub trait TreeNodeConvert {
    fn to_preview_tree(&self, options: &PreviewOptions) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    #[instrument(level = "debug", skip_all, fields(root = %self.title))]
    fn to_preview_tree(&self, options: &PreviewOptions) -> Tree<String> {
        build(self, 0, options)
    }
}

fn build(node: &TreeNode, depth: usize, options: &PreviewOptions) -> Tree<String> {
    let mut tree = Tree::new(label(node, options));
    if node.is_leaf() {
        return tree;
    }

    if options.max_depth.is_some_and(|max| depth >= max) {
        tree.push(Tree::new(format!(
            "... {} descendants",
            node.node_count() - 1
        )));
        return tree;
    }

    let leaves: Vec<_> = node
        .children
        .iter()
        .take(options.max_items)
        .map(|child| build(child, depth + 1, options))
        .collect();
    tree = tree.with_leaves(leaves);

    let hidden = node.children.len().saturating_sub(options.max_items);
    if hidden > 0 {
        tree.push(Tree::new(format!("... {hidden} more")));
    }
    tree
}

fn label(node: &TreeNode, options: &PreviewOptions) -> String {
    let title = if node.title.chars().count() > MAX_TITLE_CHARS {
        let head: String = node.title.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{head}...")
    } else {
        node.title.clone()
    };
    match node.amount {
        Some(amount) => format!("{title} ({})", format_currency(amount, &options.currency_symbol)),
        None => title,
    }
}
