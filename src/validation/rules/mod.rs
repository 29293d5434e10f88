//! Per-block validation rules
//!
//! The registry is a static table; each entry names the block types it
//! applies to and a plain function doing the check.

use crate::types::block::{Block, BlockType, ContainerKind};
use crate::types::command::CommandType;

use super::{Issue, RuleId, ValidationContext};

pub mod ask;
pub mod balance;
pub mod characters;
pub mod labels;
pub mod menu;
pub mod parameters;
pub mod returns;
pub mod scene;
pub mod variables;

/// Signature of a rule check
pub type CheckFn = fn(&Block, &ValidationContext<'_>) -> Vec<Issue>;

/// A registered per-block rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: RuleId,
    pub description: &'static str,
    pub applies: &'static [BlockType],
    pub check: CheckFn,
}

impl Rule {
    pub fn applies_to(&self, block_type: BlockType) -> bool {
        self.applies.contains(&block_type)
    }
}

const fn command(command_type: CommandType) -> BlockType {
    BlockType::Command(command_type)
}

/// Every per-block rule, in evaluation order
pub static RULES: &[Rule] = &[
    Rule {
        id: RuleId::CharacterVisibility,
        description: "Hide and change need the character on screen",
        applies: &[
            command(CommandType::HideCharacter),
            command(CommandType::ChangeCharacter),
        ],
        check: characters::check,
    },
    Rule {
        id: RuleId::AskConsecutive,
        description: "An Ask may not directly follow another Ask in the same branch",
        applies: &[command(CommandType::Question)],
        check: ask::check,
    },
    Rule {
        id: RuleId::MenuPrerequisites,
        description: "A menu needs an Ask earlier in its branch",
        applies: &[BlockType::Container(ContainerKind::Menu)],
        check: menu::check,
    },
    Rule {
        id: RuleId::VariableExistence,
        description: "Referenced semafori and variables should be declared",
        applies: &[
            command(CommandType::VariableSet),
            command(CommandType::VariableReset),
            command(CommandType::VariableSetTo),
            BlockType::Container(ContainerKind::Condition),
            BlockType::Container(ContainerKind::Option),
        ],
        check: variables::check,
    },
    Rule {
        id: RuleId::ParameterValidation,
        description: "Required parameters must not be blank",
        applies: &[
            command(CommandType::Dialogue),
            command(CommandType::Question),
            command(CommandType::Announce),
            command(CommandType::ShowCharacter),
            command(CommandType::HideCharacter),
            command(CommandType::ChangeCharacter),
            command(CommandType::FocusCharacter),
            command(CommandType::VariableSet),
            command(CommandType::VariableReset),
            command(CommandType::VariableSetTo),
            command(CommandType::Delay),
            command(CommandType::Label),
            command(CommandType::Goto),
            command(CommandType::Subscript),
            command(CommandType::StartMission),
            command(CommandType::CenterMap),
            command(CommandType::ShowNode),
            command(CommandType::HideNode),
            command(CommandType::ShowPath),
            command(CommandType::HidePath),
            command(CommandType::ShowButton),
            command(CommandType::HideButton),
            command(CommandType::SetFocus),
            command(CommandType::ResetFocus),
            command(CommandType::AddInfoWindow),
            BlockType::Container(ContainerKind::Condition),
            BlockType::Container(ContainerKind::Option),
        ],
        check: parameters::check,
    },
    Rule {
        id: RuleId::DialogScene,
        description: "Dialogue and character commands need an open dialog scene",
        applies: &[
            command(CommandType::Dialogue),
            command(CommandType::Question),
            command(CommandType::ShowCharacter),
            command(CommandType::HideCharacter),
            command(CommandType::ChangeCharacter),
            command(CommandType::FocusCharacter),
        ],
        check: scene::check,
    },
    Rule {
        id: RuleId::GotoLabel,
        description: "A GO target must be defined by a LABEL",
        applies: &[command(CommandType::Goto)],
        check: labels::check,
    },
    Rule {
        id: RuleId::ReturnPlacement,
        description: "RETURN at root level exits the whole script",
        applies: &[command(CommandType::Return)],
        check: returns::check,
    },
];

/// Description of any rule, including the script-level balance pass
pub fn describe(id: RuleId) -> &'static str {
    match id {
        RuleId::ContainerBalance => balance::DESCRIPTION,
        _ => RULES
            .iter()
            .find(|rule| rule.id == id)
            .map_or("", |rule| rule.description),
    }
}
