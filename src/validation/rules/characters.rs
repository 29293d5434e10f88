//! Character visibility

use crate::types::block::Block;
use crate::types::command::CommandType;
use crate::validation::{Issue, IssueCode, RuleId, ValidationContext};

/// Hiding or changing a character needs it on screen at that point.
pub fn check(block: &Block, context: &ValidationContext<'_>) -> Vec<Issue> {
    let Some(character) = block.command.kind.character() else {
        return Vec::new();
    };
    // blank names are reported by parameter_validation
    if character.is_empty() || context.state.is_shown(character) {
        return Vec::new();
    }
    let action = match block.command_type() {
        CommandType::HideCharacter => "hide",
        _ => "change",
    };
    vec![Issue::error(
        RuleId::CharacterVisibility,
        IssueCode::CharacterNotVisible,
        block,
        format!("Cannot {action} '{character}': character is not visible"),
    )]
}
