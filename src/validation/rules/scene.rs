//! Dialog scene requirement

use crate::types::block::{Block, BlockId, ContainerKind, preorder};
use crate::validation::{Issue, IssueCode, RuleId, ValidationContext};

/// Dialogue and character commands only make sense inside an open dialog
/// scene, at any depth.
pub fn check(block: &Block, context: &ValidationContext<'_>) -> Vec<Issue> {
    if context.location.is_none() || inside_dialog(context.blocks, &block.id) {
        return Vec::new();
    }
    vec![Issue::error(
        RuleId::DialogScene,
        IssueCode::NoDialogScene,
        block,
        format!("{} needs an open dialog scene (ShowDlgScene)", block.command_type()),
    )]
}

fn inside_dialog(blocks: &[Block], id: &BlockId) -> bool {
    blocks.iter().any(|block| {
        if block.container_kind() == Some(ContainerKind::Dialog) {
            preorder(&block.children).any(|child| &child.id == id)
        } else {
            inside_dialog(&block.children, id)
        }
    })
}
