//! Jump targets

use crate::types::block::{Block, preorder};
use crate::types::command::CommandKind;
use crate::validation::{Issue, IssueCode, RuleId, ValidationContext};

/// A GO target must be a label of the campaign or of the forest being edited.
pub fn check(block: &Block, context: &ValidationContext<'_>) -> Vec<Issue> {
    let CommandKind::Goto { target } = &block.command.kind else {
        return Vec::new();
    };
    if target.is_empty() || context.known.labels.contains(target) {
        return Vec::new();
    }
    let defined_here = preorder(context.blocks).any(|candidate| {
        matches!(&candidate.command.kind, CommandKind::Label { name } if name == target)
    });
    if defined_here {
        return Vec::new();
    }
    vec![Issue::error(
        RuleId::GotoLabel,
        IssueCode::UnknownLabel,
        block,
        format!("GO target '{target}' is not defined by any LABEL"),
    )]
}
