//! Typed script commands
//!
//! A [`Command`] is one source line after tokenizing. Its [`CommandKind`] is a
//! tagged union carrying exactly the parameters of that command, and
//! [`CommandType`] is the fieldless discriminant used wherever only the kind
//! of a command matters (rule tables, legality sets).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::block::ContainerKind;

/// One parsed source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Source line number (1-indexed)
    pub line: usize,
    /// Trimmed original line
    pub content: String,
    /// Command kind with its parameters
    pub kind: CommandKind,
}

impl Command {
    pub fn new(line: usize, content: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            line,
            content: content.into(),
            kind,
        }
    }

    /// Build a command whose content is the canonical source form of `kind`.
    pub fn from_kind(kind: CommandKind) -> Self {
        let content = kind.to_string();
        Self {
            line: 0,
            content,
            kind,
        }
    }

    pub fn command_type(&self) -> CommandType {
        self.kind.command_type()
    }

    /// The line to emit when writing this command back to source.
    pub fn source_line(&self) -> String {
        if self.content.is_empty() {
            self.kind.to_string()
        } else {
            self.content.clone()
        }
    }
}

/// Command kinds and their parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandKind {
    /// `ShowDlgScene`
    DialogStart,
    /// `HideDlgScene`
    DialogEnd,
    /// `ShowChar <character> <position> [image]`
    ShowCharacter {
        character: String,
        position: String,
        image: Option<String>,
    },
    /// `HideChar <character>`
    HideCharacter { character: String },
    /// `ChangeChar <character> <image>`
    ChangeCharacter { character: String, image: String },
    /// `FocusChar <character>`
    FocusCharacter { character: String },
    /// `Say "<text>"`
    Dialogue { text: String },
    /// `Ask "<text>"`
    Question { text: String },
    /// `Announce "<text>"`
    Announce { text: String },
    /// `MENU`
    MenuStart,
    /// `END_OF_MENU`
    MenuEnd,
    /// `OPT "<text>"`
    MenuOption { text: String },
    /// `OPT_IF <semaforo> "<text>"`
    MenuOptionConditional { condition: String, text: String },
    /// `OPT_IFNOT <semaforo> "<text>"`
    MenuOptionConditionalNot { condition: String, text: String },
    /// `END_OF_OPT`
    MenuOptionEnd,
    /// `EXIT_MENU`
    MenuExit,
    /// One of the built-in `IF_*` conditions
    ConditionPredefined { predefined: PredefinedCondition },
    /// `IF <semaforo>`
    ConditionStart { condition: String },
    /// `IFNOT <semaforo>`
    ConditionStartNot { condition: String },
    /// `ELSE`
    ConditionElse,
    /// `END_OF_IF`
    ConditionEnd,
    /// `SET <semaforo>`
    VariableSet { variable: String },
    /// `RESET <semaforo>`
    VariableReset { variable: String },
    /// `SET_TO <variable> <value>`
    VariableSetTo { variable: String, value: String },
    /// `DELAY <milliseconds>`
    Delay { milliseconds: u64 },
    /// `LABEL <name>`
    Label { name: String },
    /// `GO <label>`
    Goto { target: String },
    /// `SUB_SCRIPT <script>`
    Subscript { script_name: String },
    /// `RETURN`
    Return,
    /// `ACT_MISSION <mission>`
    StartMission { mission_name: String },
    /// `SetCredits <amount>`
    SetCredits { amount: i64 },
    /// `AddCredits <amount>`
    AddCredits { amount: i64 },
    /// `CenterMapByNode <node>`
    CenterMap { node: String },
    /// `ShowNode <node>`
    ShowNode { node: String },
    /// `HideNode <node>`
    HideNode { node: String },
    /// `ShowPath <route>`
    ShowPath { route: String },
    /// `HidePath <route>`
    HidePath { route: String },
    /// `ShowButton <button>`
    ShowButton { button: String },
    /// `HideButton <button>`
    HideButton { button: String },
    /// `SetFocus <button>`
    SetFocus { button: String },
    /// `ResetFocus <button>`
    ResetFocus { button: String },
    /// `AddInfoWindow <image>`
    AddInfoWindow { image: String },
    /// `ShowInfoWindow [image]`
    ShowInfoWindow { image: Option<String> },
    /// `SetFlightStatusBar "<message>"`
    StatusBar { message: String },
    /// Any line with an unrecognized keyword
    Unknown,
}

/// Built-in conditions that open a condition container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "predefined_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredefinedCondition {
    TutorialSeen,
    FromCampaign,
    Debug,
    MissionWon,
    Prob {
        probability: String,
    },
    Min {
        variable: String,
        min_value: String,
    },
    Max {
        variable: String,
        max_value: String,
    },
    Is {
        variable: String,
        exact_value: String,
    },
    HasCredits {
        credits_amount: String,
    },
    Order {
        player_index: String,
        position_value: String,
    },
    MissionResultIs {
        value: String,
    },
    MissionResultMin {
        value: String,
    },
}

impl PredefinedCondition {
    /// Source keyword of this condition
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::TutorialSeen => "IF_TUTORIAL_SEEN",
            Self::FromCampaign => "IF_FROM_CAMPAIGN",
            Self::Debug => "IF_DEBUG",
            Self::MissionWon => "IF_MISSION_WON",
            Self::Prob { .. } => "IF_PROB",
            Self::Min { .. } => "IF_MIN",
            Self::Max { .. } => "IF_MAX",
            Self::Is { .. } => "IF_IS",
            Self::HasCredits { .. } => "IF_HAS_CREDITS",
            Self::Order { .. } => "IF_ORDER",
            Self::MissionResultIs { .. } => "IFMISSIONRESULTIS",
            Self::MissionResultMin { .. } => "IFMISSIONRESULTMIN",
        }
    }

    /// Numeric variable tested by this condition, if any
    pub fn variable(&self) -> Option<&str> {
        match self {
            Self::Min { variable, .. } | Self::Max { variable, .. } | Self::Is { variable, .. } => {
                Some(variable)
            }
            _ => None,
        }
    }
}

impl fmt::Display for PredefinedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.keyword();
        match self {
            Self::TutorialSeen | Self::FromCampaign | Self::Debug | Self::MissionWon => {
                write!(f, "{keyword}")
            }
            Self::Prob { probability } => write!(f, "{keyword} {probability}"),
            Self::Min {
                variable,
                min_value: value,
            }
            | Self::Max {
                variable,
                max_value: value,
            }
            | Self::Is {
                variable,
                exact_value: value,
            } => write!(f, "{keyword} {variable} {value}"),
            Self::HasCredits { credits_amount } => write!(f, "{keyword} {credits_amount}"),
            Self::Order {
                player_index,
                position_value,
            } => write!(f, "{keyword} {player_index} {position_value}"),
            Self::MissionResultIs { value } => write!(f, "IfMissionResultIs {value}"),
            Self::MissionResultMin { value } => write!(f, "IfMissionResultMin {value}"),
        }
    }
}

/// A variable name referenced by a command, split by how it is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRef<'a> {
    /// Boolean flag touched by SET/RESET or tested by IF/IFNOT/OPT_IF
    Semaforo(&'a str),
    /// Value variable touched by SET_TO or tested by IF_IS/IF_MIN/IF_MAX
    Real(&'a str),
}

impl<'a> VariableRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Semaforo(name) | Self::Real(name) => name,
        }
    }
}

impl CommandKind {
    pub fn command_type(&self) -> CommandType {
        match self {
            Self::DialogStart => CommandType::DialogStart,
            Self::DialogEnd => CommandType::DialogEnd,
            Self::ShowCharacter { .. } => CommandType::ShowCharacter,
            Self::HideCharacter { .. } => CommandType::HideCharacter,
            Self::ChangeCharacter { .. } => CommandType::ChangeCharacter,
            Self::FocusCharacter { .. } => CommandType::FocusCharacter,
            Self::Dialogue { .. } => CommandType::Dialogue,
            Self::Question { .. } => CommandType::Question,
            Self::Announce { .. } => CommandType::Announce,
            Self::MenuStart => CommandType::MenuStart,
            Self::MenuEnd => CommandType::MenuEnd,
            Self::MenuOption { .. } => CommandType::MenuOption,
            Self::MenuOptionConditional { .. } => CommandType::MenuOptionConditional,
            Self::MenuOptionConditionalNot { .. } => CommandType::MenuOptionConditionalNot,
            Self::MenuOptionEnd => CommandType::MenuOptionEnd,
            Self::MenuExit => CommandType::MenuExit,
            Self::ConditionPredefined { .. } => CommandType::ConditionPredefined,
            Self::ConditionStart { .. } => CommandType::ConditionStart,
            Self::ConditionStartNot { .. } => CommandType::ConditionStartNot,
            Self::ConditionElse => CommandType::ConditionElse,
            Self::ConditionEnd => CommandType::ConditionEnd,
            Self::VariableSet { .. } => CommandType::VariableSet,
            Self::VariableReset { .. } => CommandType::VariableReset,
            Self::VariableSetTo { .. } => CommandType::VariableSetTo,
            Self::Delay { .. } => CommandType::Delay,
            Self::Label { .. } => CommandType::Label,
            Self::Goto { .. } => CommandType::Goto,
            Self::Subscript { .. } => CommandType::Subscript,
            Self::Return => CommandType::Return,
            Self::StartMission { .. } => CommandType::StartMission,
            Self::SetCredits { .. } => CommandType::SetCredits,
            Self::AddCredits { .. } => CommandType::AddCredits,
            Self::CenterMap { .. } => CommandType::CenterMap,
            Self::ShowNode { .. } => CommandType::ShowNode,
            Self::HideNode { .. } => CommandType::HideNode,
            Self::ShowPath { .. } => CommandType::ShowPath,
            Self::HidePath { .. } => CommandType::HidePath,
            Self::ShowButton { .. } => CommandType::ShowButton,
            Self::HideButton { .. } => CommandType::HideButton,
            Self::SetFocus { .. } => CommandType::SetFocus,
            Self::ResetFocus { .. } => CommandType::ResetFocus,
            Self::AddInfoWindow { .. } => CommandType::AddInfoWindow,
            Self::ShowInfoWindow { .. } => CommandType::ShowInfoWindow,
            Self::StatusBar { .. } => CommandType::StatusBar,
            Self::Unknown => CommandType::Unknown,
        }
    }

    /// Character targeted by a character command
    pub fn character(&self) -> Option<&str> {
        match self {
            Self::ShowCharacter { character, .. }
            | Self::HideCharacter { character }
            | Self::ChangeCharacter { character, .. }
            | Self::FocusCharacter { character } => Some(character),
            _ => None,
        }
    }

    /// Variable or semaforo read or written by this command
    pub fn variable_ref(&self) -> Option<VariableRef<'_>> {
        match self {
            Self::VariableSet { variable } | Self::VariableReset { variable } => {
                Some(VariableRef::Semaforo(variable))
            }
            Self::ConditionStart { condition }
            | Self::ConditionStartNot { condition }
            | Self::MenuOptionConditional { condition, .. }
            | Self::MenuOptionConditionalNot { condition, .. } => {
                Some(VariableRef::Semaforo(condition))
            }
            Self::VariableSetTo { variable, .. } => Some(VariableRef::Real(variable)),
            Self::ConditionPredefined { predefined } => {
                predefined.variable().map(VariableRef::Real)
            }
            _ => None,
        }
    }
}

fn quoted(f: &mut fmt::Formatter<'_>, keyword: &str, text: &str) -> fmt::Result {
    write!(f, "{keyword} \"{text}\"")
}

impl fmt::Display for CommandKind {
    /// Canonical source form of the command
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DialogStart => write!(f, "ShowDlgScene"),
            Self::DialogEnd => write!(f, "HideDlgScene"),
            Self::ShowCharacter {
                character,
                position,
                image,
            } => match image {
                Some(image) => write!(f, "ShowChar {character} {position} {image}"),
                None => write!(f, "ShowChar {character} {position}"),
            },
            Self::HideCharacter { character } => write!(f, "HideChar {character}"),
            Self::ChangeCharacter { character, image } => {
                write!(f, "ChangeChar {character} {image}")
            }
            Self::FocusCharacter { character } => write!(f, "FocusChar {character}"),
            Self::Dialogue { text } => quoted(f, "Say", text),
            Self::Question { text } => quoted(f, "Ask", text),
            Self::Announce { text } => quoted(f, "Announce", text),
            Self::MenuStart => write!(f, "MENU"),
            Self::MenuEnd => write!(f, "END_OF_MENU"),
            Self::MenuOption { text } => quoted(f, "OPT", text),
            Self::MenuOptionConditional { condition, text } => {
                quoted(f, &format!("OPT_IF {condition}"), text)
            }
            Self::MenuOptionConditionalNot { condition, text } => {
                quoted(f, &format!("OPT_IFNOT {condition}"), text)
            }
            Self::MenuOptionEnd => write!(f, "END_OF_OPT"),
            Self::MenuExit => write!(f, "EXIT_MENU"),
            Self::ConditionPredefined { predefined } => write!(f, "{predefined}"),
            Self::ConditionStart { condition } => write!(f, "IF {condition}"),
            Self::ConditionStartNot { condition } => write!(f, "IFNOT {condition}"),
            Self::ConditionElse => write!(f, "ELSE"),
            Self::ConditionEnd => write!(f, "END_OF_IF"),
            Self::VariableSet { variable } => write!(f, "SET {variable}"),
            Self::VariableReset { variable } => write!(f, "RESET {variable}"),
            Self::VariableSetTo { variable, value } => write!(f, "SET_TO {variable} {value}"),
            Self::Delay { milliseconds } => write!(f, "DELAY {milliseconds}"),
            Self::Label { name } => write!(f, "LABEL {name}"),
            Self::Goto { target } => write!(f, "GO {target}"),
            Self::Subscript { script_name } => write!(f, "SUB_SCRIPT {script_name}"),
            Self::Return => write!(f, "RETURN"),
            Self::StartMission { mission_name } => write!(f, "ACT_MISSION {mission_name}"),
            Self::SetCredits { amount } => write!(f, "SetCredits {amount}"),
            Self::AddCredits { amount } => write!(f, "AddCredits {amount}"),
            Self::CenterMap { node } => write!(f, "CenterMapByNode {node}"),
            Self::ShowNode { node } => write!(f, "ShowNode {node}"),
            Self::HideNode { node } => write!(f, "HideNode {node}"),
            Self::ShowPath { route } => write!(f, "ShowPath {route}"),
            Self::HidePath { route } => write!(f, "HidePath {route}"),
            Self::ShowButton { button } => write!(f, "ShowButton {button}"),
            Self::HideButton { button } => write!(f, "HideButton {button}"),
            Self::SetFocus { button } => write!(f, "SetFocus {button}"),
            Self::ResetFocus { button } => write!(f, "ResetFocus {button}"),
            Self::AddInfoWindow { image } => write!(f, "AddInfoWindow {image}"),
            Self::ShowInfoWindow { image } => match image {
                Some(image) => write!(f, "ShowInfoWindow {image}"),
                None => write!(f, "ShowInfoWindow"),
            },
            Self::StatusBar { message } => quoted(f, "SetFlightStatusBar", message),
            Self::Unknown => Ok(()),
        }
    }
}

/// Fieldless command discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    DialogStart,
    DialogEnd,
    ShowCharacter,
    HideCharacter,
    ChangeCharacter,
    FocusCharacter,
    Dialogue,
    Question,
    Announce,
    MenuStart,
    MenuEnd,
    MenuOption,
    MenuOptionConditional,
    MenuOptionConditionalNot,
    MenuOptionEnd,
    MenuExit,
    ConditionPredefined,
    ConditionStart,
    ConditionStartNot,
    ConditionElse,
    ConditionEnd,
    VariableSet,
    VariableReset,
    VariableSetTo,
    Delay,
    Label,
    Goto,
    Subscript,
    Return,
    StartMission,
    SetCredits,
    AddCredits,
    CenterMap,
    ShowNode,
    HideNode,
    ShowPath,
    HidePath,
    ShowButton,
    HideButton,
    SetFocus,
    ResetFocus,
    AddInfoWindow,
    ShowInfoWindow,
    StatusBar,
    Unknown,
}

impl CommandType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DialogStart => "dialog_start",
            Self::DialogEnd => "dialog_end",
            Self::ShowCharacter => "show_character",
            Self::HideCharacter => "hide_character",
            Self::ChangeCharacter => "change_character",
            Self::FocusCharacter => "focus_character",
            Self::Dialogue => "dialogue",
            Self::Question => "question",
            Self::Announce => "announce",
            Self::MenuStart => "menu_start",
            Self::MenuEnd => "menu_end",
            Self::MenuOption => "menu_option",
            Self::MenuOptionConditional => "menu_option_conditional",
            Self::MenuOptionConditionalNot => "menu_option_conditional_not",
            Self::MenuOptionEnd => "menu_option_end",
            Self::MenuExit => "menu_exit",
            Self::ConditionPredefined => "condition_predefined",
            Self::ConditionStart => "condition_start",
            Self::ConditionStartNot => "condition_start_not",
            Self::ConditionElse => "condition_else",
            Self::ConditionEnd => "condition_end",
            Self::VariableSet => "variable_set",
            Self::VariableReset => "variable_reset",
            Self::VariableSetTo => "variable_set_to",
            Self::Delay => "delay",
            Self::Label => "label",
            Self::Goto => "goto",
            Self::Subscript => "subscript",
            Self::Return => "return",
            Self::StartMission => "start_mission",
            Self::SetCredits => "set_credits",
            Self::AddCredits => "add_credits",
            Self::CenterMap => "center_map",
            Self::ShowNode => "show_node",
            Self::HideNode => "hide_node",
            Self::ShowPath => "show_path",
            Self::HidePath => "hide_path",
            Self::ShowButton => "show_button",
            Self::HideButton => "hide_button",
            Self::SetFocus => "set_focus",
            Self::ResetFocus => "reset_focus",
            Self::AddInfoWindow => "add_info_window",
            Self::ShowInfoWindow => "show_info_window",
            Self::StatusBar => "status_bar",
            Self::Unknown => "unknown",
        }
    }

    /// Container kind opened by this command type
    pub fn opens(self) -> Option<ContainerKind> {
        match self {
            Self::DialogStart => Some(ContainerKind::Dialog),
            Self::MenuStart => Some(ContainerKind::Menu),
            Self::MenuOption | Self::MenuOptionConditional | Self::MenuOptionConditionalNot => {
                Some(ContainerKind::Option)
            }
            Self::ConditionStart | Self::ConditionStartNot | Self::ConditionPredefined => {
                Some(ContainerKind::Condition)
            }
            _ => None,
        }
    }

    /// Container kind closed by this command type
    pub fn closes(self) -> Option<ContainerKind> {
        match self {
            Self::DialogEnd => Some(ContainerKind::Dialog),
            Self::MenuEnd => Some(ContainerKind::Menu),
            Self::MenuOptionEnd => Some(ContainerKind::Option),
            Self::ConditionEnd => Some(ContainerKind::Condition),
            _ => None,
        }
    }

    /// Closers and `ELSE` shape the tree but never become blocks.
    pub fn is_structural_marker(self) -> bool {
        self.closes().is_some() || self == Self::ConditionElse
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
