//! Required parameters

use crate::types::block::Block;
use crate::types::command::CommandKind;
use crate::validation::{Issue, IssueCode, RuleId, ValidationContext};

pub fn check(block: &Block, _context: &ValidationContext<'_>) -> Vec<Issue> {
    let kind = &block.command.kind;
    let mut required: Vec<(&str, &str)> = match kind {
        CommandKind::Dialogue { text }
        | CommandKind::Question { text }
        | CommandKind::Announce { text }
        | CommandKind::MenuOption { text }
        | CommandKind::MenuOptionConditional { text, .. }
        | CommandKind::MenuOptionConditionalNot { text, .. } => vec![("text", text.as_str())],
        CommandKind::ShowCharacter { character, .. }
        | CommandKind::HideCharacter { character }
        | CommandKind::FocusCharacter { character } => vec![("character", character.as_str())],
        CommandKind::ChangeCharacter { character, image } => {
            vec![("character", character.as_str()), ("image", image.as_str())]
        }
        CommandKind::Label { name } => vec![("label", name.as_str())],
        CommandKind::Goto { target } => vec![("label", target.as_str())],
        CommandKind::Subscript { script_name } => vec![("script", script_name.as_str())],
        CommandKind::StartMission { mission_name } => vec![("mission", mission_name.as_str())],
        CommandKind::CenterMap { node }
        | CommandKind::ShowNode { node }
        | CommandKind::HideNode { node } => vec![("node", node.as_str())],
        CommandKind::ShowPath { route } | CommandKind::HidePath { route } => {
            vec![("route", route.as_str())]
        }
        CommandKind::ShowButton { button }
        | CommandKind::HideButton { button }
        | CommandKind::SetFocus { button }
        | CommandKind::ResetFocus { button } => vec![("button", button.as_str())],
        CommandKind::AddInfoWindow { image } => vec![("image", image.as_str())],
        _ => Vec::new(),
    };
    if let Some(reference) = kind.variable_ref() {
        required.push(("variable", reference.name()));
    }

    let mut issues: Vec<Issue> = required
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| {
            Issue::error(
                RuleId::ParameterValidation,
                IssueCode::MissingParameter,
                block,
                format!(
                    "Missing required parameter '{name}' for {}",
                    block.command_type()
                ),
            )
        })
        .collect();

    if let CommandKind::Delay { milliseconds: 0 } = kind {
        issues.push(Issue::error(
            RuleId::ParameterValidation,
            IssueCode::InvalidParameter,
            block,
            "DELAY duration must be greater than zero",
        ));
    }
    issues
}
