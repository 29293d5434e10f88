//! Menu prerequisites

use crate::types::block::Block;
use crate::validation::{Issue, IssueCode, RuleId, ValidationContext};

pub fn check(block: &Block, context: &ValidationContext<'_>) -> Vec<Issue> {
    if context.last_ask_in_branch().is_some() {
        return Vec::new();
    }
    vec![Issue::error(
        RuleId::MenuPrerequisites,
        IssueCode::MenuNeedsAsk,
        block,
        "Menu must be preceded by an Ask in the same branch",
    )]
}
