//! RETURN placement

use crate::types::block::Block;
use crate::validation::{Issue, IssueCode, RuleId, ValidationContext};

pub fn check(block: &Block, context: &ValidationContext<'_>) -> Vec<Issue> {
    match context.location {
        Some(location) if location.parent.is_none() => vec![Issue::warning(
            RuleId::ReturnPlacement,
            IssueCode::ReturnAtRoot,
            block,
            "RETURN at root level will exit the entire script",
        )],
        _ => Vec::new(),
    }
}
