//! Error types for fallible operations
//!
//! Parsing, tree building, flow replay and validation never fail. Only
//! structural edits and configuration loading return errors.

use crate::types::block::{BlockId, BlockType};
use thiserror::Error;

/// A structural edit that cannot be applied to a forest
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    #[error("Block '{id}' not found")]
    BlockNotFound { id: BlockId },

    #[error("Block id '{id}' is already used in this forest")]
    DuplicateId { id: BlockId },

    #[error("Block '{id}' is a {block_type}, not a container")]
    NotAContainer { id: BlockId, block_type: BlockType },

    #[error("Block '{id}' is not a condition container")]
    NotACondition { id: BlockId },

    #[error("Condition '{id}' has no ELSE branch")]
    NoElseBranch { id: BlockId },

    #[error("Else index {index} out of bounds for condition '{id}' with {len} children")]
    ElseIndexOutOfBounds { id: BlockId, index: usize, len: usize },

    #[error("Insert index {index} out of bounds, section holds {len} blocks")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot replace {expected} block '{id}' with a {actual} command")]
    KindMismatch {
        id: BlockId,
        expected: BlockType,
        actual: BlockType,
    },

    #[error("'{command}' is a structural marker and cannot be a block")]
    StructuralMarker { command: String },

    #[error("Cannot move block '{id}' inside itself")]
    MoveIntoSelf { id: BlockId },
}

impl EditError {
    pub fn block_not_found(id: &BlockId) -> Self {
        Self::BlockNotFound { id: id.clone() }
    }

    pub fn duplicate_id(id: &BlockId) -> Self {
        Self::DuplicateId { id: id.clone() }
    }

    pub fn not_a_container(id: &BlockId, block_type: BlockType) -> Self {
        Self::NotAContainer {
            id: id.clone(),
            block_type,
        }
    }

    pub fn not_a_condition(id: &BlockId) -> Self {
        Self::NotACondition { id: id.clone() }
    }

    pub fn else_out_of_bounds(id: &BlockId, index: usize, len: usize) -> Self {
        Self::ElseIndexOutOfBounds {
            id: id.clone(),
            index,
            len,
        }
    }

    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    pub fn structural_marker(command: impl Into<String>) -> Self {
        Self::StructuralMarker {
            command: command.into(),
        }
    }
}

/// Configuration that could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
