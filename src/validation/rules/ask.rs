//! Consecutive Ask detection

use crate::types::block::Block;
use crate::types::command::CommandType;
use crate::validation::{Issue, IssueCode, RuleId, ValidationContext};

/// An Ask right after another Ask in the same section is an error. Any block
/// in between, containers included, separates the two.
pub fn check(block: &Block, context: &ValidationContext<'_>) -> Vec<Issue> {
    let previous = context.location.and_then(|location| location.previous());

    match previous {
        Some(previous) if previous.command_type() == CommandType::Question => {
            vec![Issue::error(
                RuleId::AskConsecutive,
                IssueCode::AskConsecutive,
                block,
                format!(
                    "Ask directly follows another Ask (line {}) in the same branch",
                    previous.command.line
                ),
            )]
        }
        _ => Vec::new(),
    }
}
