//! Core types for the campaign-flow library
//!
//! - Command: one tokenized script line and its typed parameters
//! - Block: node of a script's block tree
//! - Script: parsed scripts and the files they come from
//! - State: flow state snapshots and the seed a replay starts from

pub mod block;
pub mod command;
pub mod script;
pub mod state;

pub use block::{
    Block, BlockId, BlockMetadata, BlockType, Branch, ConditionMeta, ContainerKind, IfType,
    OptionMeta, find_block, preorder,
};
pub use command::{Command, CommandKind, CommandType, PredefinedCondition, VariableRef};
pub use script::{ParsedScript, SourceFile};
pub use state::{CharacterState, FlowSeed, FlowState, VarValue};
