//! Block tree representation of a script
//!
//! Containers own their children. A condition container with an `ELSE`
//! section keeps a single children list split at `else_index`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::command::{Command, CommandKind, CommandType, PredefinedCondition};

/// Block identifier, unique within a script
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the block built from the command at `index` of a script.
    pub fn for_command(prefix: &str, index: usize) -> Self {
        Self(format!("{prefix}_block_{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four container kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContainerKind {
    #[serde(rename = "dialog_container")]
    Dialog,
    #[serde(rename = "menu_container")]
    Menu,
    #[serde(rename = "option_container")]
    Option,
    #[serde(rename = "condition_container")]
    Condition,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dialog => "dialog_container",
            Self::Menu => "menu_container",
            Self::Option => "option_container",
            Self::Condition => "condition_container",
        }
    }

    /// Command that closes this container in source
    pub fn closer(self) -> CommandKind {
        match self {
            Self::Dialog => CommandKind::DialogEnd,
            Self::Menu => CommandKind::MenuEnd,
            Self::Option => CommandKind::MenuOptionEnd,
            Self::Condition => CommandKind::ConditionEnd,
        }
    }
}

/// Block type: a leaf command type or a container kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockType {
    Command(CommandType),
    Container(ContainerKind),
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command(command_type) => command_type.as_str(),
            Self::Container(kind) => kind.as_str(),
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, Self::Container(_))
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a condition container's test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfType {
    /// `IF x` / `IFNOT x` on a semaforo
    Standard,
    /// One of the built-in `IF_*` conditions
    Predefined,
}

/// Metadata of a condition container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionMeta {
    /// Tested semaforo, or the predefined keyword
    pub condition: String,
    pub is_not: bool,
    /// Start of the ELSE-section; `None` when the condition has no ELSE
    pub else_index: Option<usize>,
    pub if_type: IfType,
    pub predefined: Option<PredefinedCondition>,
}

impl ConditionMeta {
    pub fn has_else(&self) -> bool {
        self.else_index.is_some()
    }
}

/// Metadata of an option container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionMeta {
    pub is_conditional: bool,
    pub is_not: bool,
    pub condition: Option<String>,
}

/// Container-specific block metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockMetadata {
    #[default]
    None,
    Option(OptionMeta),
    Condition(ConditionMeta),
}

impl BlockMetadata {
    fn for_command(kind: &CommandKind) -> Self {
        match kind {
            CommandKind::MenuOption { .. } => Self::Option(OptionMeta {
                is_conditional: false,
                is_not: false,
                condition: None,
            }),
            CommandKind::MenuOptionConditional { condition, .. } => Self::Option(OptionMeta {
                is_conditional: true,
                is_not: false,
                condition: Some(condition.clone()),
            }),
            CommandKind::MenuOptionConditionalNot { condition, .. } => Self::Option(OptionMeta {
                is_conditional: true,
                is_not: true,
                condition: Some(condition.clone()),
            }),
            CommandKind::ConditionStart { condition } => Self::Condition(ConditionMeta {
                condition: condition.clone(),
                is_not: false,
                else_index: None,
                if_type: IfType::Standard,
                predefined: None,
            }),
            CommandKind::ConditionStartNot { condition } => Self::Condition(ConditionMeta {
                condition: condition.clone(),
                is_not: true,
                else_index: None,
                if_type: IfType::Standard,
                predefined: None,
            }),
            CommandKind::ConditionPredefined { predefined } => Self::Condition(ConditionMeta {
                condition: predefined.keyword().to_string(),
                is_not: false,
                else_index: None,
                if_type: IfType::Predefined,
                predefined: Some(predefined.clone()),
            }),
            _ => Self::None,
        }
    }
}

/// Which section of a container a child lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// All children of a non-condition container, or the IF-section
    Main,
    /// ELSE-section of a condition container
    Else,
}

/// A node of a script's block tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub block_type: BlockType,
    /// Originating command, or the opening command of a container
    pub command: Command,
    pub children: Vec<Block>,
    /// Nesting level, root = 0
    pub depth: usize,
    pub metadata: BlockMetadata,
    /// Whether the container's closer was seen (always true for leaves)
    pub closed: bool,
    /// Line of the closer, when parsed from source
    pub end_line: Option<usize>,
}

impl Block {
    /// Build a block for `command`: a container if it opens one, a leaf otherwise.
    ///
    /// Containers start out closed and empty; the tree builder reopens them
    /// until it sees their closer.
    pub fn from_command(id: impl Into<BlockId>, command: Command) -> Self {
        let command_type = command.command_type();
        let block_type = match command_type.opens() {
            Some(kind) => BlockType::Container(kind),
            None => BlockType::Command(command_type),
        };
        Self {
            id: id.into(),
            block_type,
            metadata: BlockMetadata::for_command(&command.kind),
            command,
            children: Vec::new(),
            depth: 0,
            closed: true,
            end_line: None,
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn is_container(&self) -> bool {
        self.block_type.is_container()
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self.block_type {
            BlockType::Container(kind) => Some(kind),
            BlockType::Command(_) => None,
        }
    }

    pub fn command_type(&self) -> CommandType {
        self.command.command_type()
    }

    pub fn condition(&self) -> Option<&ConditionMeta> {
        match &self.metadata {
            BlockMetadata::Condition(meta) => Some(meta),
            _ => None,
        }
    }

    pub fn condition_mut(&mut self) -> Option<&mut ConditionMeta> {
        match &mut self.metadata {
            BlockMetadata::Condition(meta) => Some(meta),
            _ => None,
        }
    }

    /// Effective else index, clamped to the children length
    pub fn else_index(&self) -> Option<usize> {
        self.condition()
            .and_then(|meta| meta.else_index)
            .map(|index| index.min(self.children.len()))
    }

    /// Children split into (IF-section, ELSE-section); the second is empty
    /// for everything but a condition with an ELSE.
    pub fn branches(&self) -> (&[Block], &[Block]) {
        match self.else_index() {
            Some(index) => self.children.split_at(index),
            None => (&self.children, &[]),
        }
    }

    /// Children belonging to `branch`
    pub fn branch(&self, branch: Branch) -> &[Block] {
        let (main, other) = self.branches();
        match branch {
            Branch::Main => main,
            Branch::Else => other,
        }
    }
}

/// Pre-order iterator over a block forest
pub struct Preorder<'a> {
    stack: Vec<&'a Block>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.stack.pop()?;
        self.stack.extend(block.children.iter().rev());
        Some(block)
    }
}

/// Iterate a forest depth-first, parents before children
pub fn preorder(blocks: &[Block]) -> Preorder<'_> {
    Preorder {
        stack: blocks.iter().rev().collect(),
    }
}

/// Find a block anywhere in a forest
pub fn find_block<'a>(blocks: &'a [Block], id: &BlockId) -> Option<&'a Block> {
    preorder(blocks).find(|block| &block.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, text: &str) -> Block {
        Block::from_command(
            id,
            Command::from_kind(CommandKind::Dialogue {
                text: text.to_string(),
            }),
        )
    }

    fn condition(id: &str) -> Block {
        Block::from_command(
            id,
            Command::from_kind(CommandKind::ConditionStart {
                condition: "flag".to_string(),
            }),
        )
    }

    #[test]
    fn from_command_builds_condition_container() {
        let block = condition("c");
        assert_eq!(block.block_type, BlockType::Container(ContainerKind::Condition));
        let meta = block.condition().unwrap();
        assert_eq!(meta.condition, "flag");
        assert!(!meta.is_not);
        assert!(!meta.has_else());
        assert_eq!(meta.if_type, IfType::Standard);
    }

    #[test]
    fn branches_split_at_else_index() {
        let mut block =
            condition("c").with_children(vec![leaf("a", "a"), leaf("b", "b"), leaf("x", "x")]);
        block.condition_mut().unwrap().else_index = Some(2);

        let (main, other) = block.branches();
        assert_eq!(main.len(), 2);
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].id, BlockId::from("x"));
    }

    #[test]
    fn branches_clamp_out_of_range_else_index() {
        let mut block = condition("c").with_children(vec![leaf("a", "a")]);
        block.condition_mut().unwrap().else_index = Some(5);

        assert_eq!(block.else_index(), Some(1));
        let (main, other) = block.branches();
        assert_eq!(main.len(), 1);
        assert!(other.is_empty());
    }

    #[test]
    fn preorder_visits_parents_first() {
        let forest = vec![
            leaf("a", "a"),
            condition("c").with_children(vec![leaf("b", "b")]),
            leaf("d", "d"),
        ];
        let ids: Vec<&str> = preorder(&forest).map(|block| block.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b", "d"]);
        assert!(find_block(&forest, &BlockId::from("b")).is_some());
        assert!(find_block(&forest, &BlockId::from("z")).is_none());
    }

    #[test]
    fn block_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&BlockType::Container(ContainerKind::Menu)).unwrap();
        assert_eq!(json, "\"menu_container\"");
        let json = serde_json::to_string(&BlockType::Command(CommandType::Question)).unwrap();
        assert_eq!(json, "\"question\"");
        let back: BlockType = serde_json::from_str("\"option_container\"").unwrap();
        assert_eq!(back, BlockType::Container(ContainerKind::Option));
    }
}
