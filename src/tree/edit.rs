//! Structural edits on a block forest
//!
//! Every edit takes a forest by reference and returns a new one; the input
//! is never modified. Depths are renormalised after each edit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::EditError;
use crate::types::block::{Block, BlockId, BlockMetadata, Branch, preorder};
use crate::types::command::Command;

/// Section of the forest a block can be placed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Root,
    Inside { parent: BlockId, branch: Branch },
}

impl Slot {
    pub fn inside(parent: impl Into<BlockId>) -> Self {
        Self::Inside {
            parent: parent.into(),
            branch: Branch::Main,
        }
    }

    pub fn else_of(parent: impl Into<BlockId>) -> Self {
        Self::Inside {
            parent: parent.into(),
            branch: Branch::Else,
        }
    }
}

/// A structural edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    /// Swap the command of a block, keeping its children.
    ReplaceCommand { id: BlockId, command: Command },
    /// Insert `block` at `index` of the section `slot`.
    Insert { slot: Slot, index: usize, block: Block },
    Remove { id: BlockId },
    /// Detach a block and re-insert it; `index` refers to the section after removal.
    Move { id: BlockId, slot: Slot, index: usize },
    /// Set or clear the ELSE split of a condition container.
    SetElse {
        id: BlockId,
        else_index: Option<usize>,
    },
}

/// Apply `edit` to a copy of `blocks`.
pub fn apply_edit(blocks: &[Block], edit: &Edit) -> Result<Vec<Block>, EditError> {
    let mut forest = blocks.to_vec();
    match edit {
        Edit::ReplaceCommand { id, command } => replace_command(&mut forest, id, command)?,
        Edit::Insert { slot, index, block } => {
            check_insertable(&forest, block)?;
            insert(&mut forest, slot, *index, block.clone())?;
        }
        Edit::Remove { id } => {
            remove(&mut forest, id).ok_or_else(|| EditError::block_not_found(id))?;
        }
        Edit::Move { id, slot, index } => {
            if let Slot::Inside { parent, .. } = slot {
                let moved =
                    find_mut(&mut forest, id).ok_or_else(|| EditError::block_not_found(id))?;
                if &moved.id == parent || preorder(&moved.children).any(|b| &b.id == parent) {
                    return Err(EditError::MoveIntoSelf { id: id.clone() });
                }
            }
            let block = remove(&mut forest, id).ok_or_else(|| EditError::block_not_found(id))?;
            insert(&mut forest, slot, *index, block)?;
        }
        Edit::SetElse { id, else_index } => set_else(&mut forest, id, *else_index)?,
    }
    renormalize(&mut forest, 0);
    log::debug!("applied {}", edit_name(edit));
    Ok(forest)
}

/// An id of the form `<prefix>_block_<n>` not yet used in `blocks`.
pub fn fresh_id(blocks: &[Block], prefix: &str) -> BlockId {
    let used: BTreeSet<&BlockId> = preorder(blocks).map(|block| &block.id).collect();
    let mut n = used.len();
    loop {
        let id = BlockId::for_command(prefix, n);
        if !used.contains(&id) {
            return id;
        }
        n += 1;
    }
}

fn edit_name(edit: &Edit) -> &'static str {
    match edit {
        Edit::ReplaceCommand { .. } => "replace_command",
        Edit::Insert { .. } => "insert",
        Edit::Remove { .. } => "remove",
        Edit::Move { .. } => "move",
        Edit::SetElse { .. } => "set_else",
    }
}

fn check_insertable(forest: &[Block], block: &Block) -> Result<(), EditError> {
    let used: BTreeSet<&BlockId> = preorder(forest).map(|b| &b.id).collect();
    for inserted in preorder(std::slice::from_ref(block)) {
        if inserted.command_type().is_structural_marker() {
            return Err(EditError::structural_marker(inserted.command.source_line()));
        }
        if used.contains(&inserted.id) {
            return Err(EditError::duplicate_id(&inserted.id));
        }
    }
    Ok(())
}

fn replace_command(forest: &mut [Block], id: &BlockId, command: &Command) -> Result<(), EditError> {
    if command.command_type().is_structural_marker() {
        return Err(EditError::structural_marker(command.source_line()));
    }
    let block = find_mut(forest, id).ok_or_else(|| EditError::block_not_found(id))?;
    let replacement = Block::from_command(id.clone(), command.clone());

    let compatible = match (block.container_kind(), replacement.container_kind()) {
        (None, None) => true,
        (Some(old), Some(new)) => old == new,
        _ => false,
    };
    if !compatible {
        return Err(EditError::KindMismatch {
            id: id.clone(),
            expected: block.block_type,
            actual: replacement.block_type,
        });
    }

    let else_index = block.condition().and_then(|meta| meta.else_index);
    block.block_type = replacement.block_type;
    block.command = replacement.command;
    block.metadata = replacement.metadata;
    if let Some(meta) = block.condition_mut() {
        meta.else_index = else_index;
    }
    Ok(())
}

fn set_else(
    forest: &mut [Block],
    id: &BlockId,
    else_index: Option<usize>,
) -> Result<(), EditError> {
    let block = find_mut(forest, id).ok_or_else(|| EditError::block_not_found(id))?;
    let len = block.children.len();
    let meta = match &mut block.metadata {
        BlockMetadata::Condition(meta) => meta,
        _ => return Err(EditError::not_a_condition(id)),
    };
    if let Some(index) = else_index
        && index > len
    {
        return Err(EditError::else_out_of_bounds(id, index, len));
    }
    meta.else_index = else_index;
    Ok(())
}

fn insert(
    forest: &mut Vec<Block>,
    slot: &Slot,
    index: usize,
    block: Block,
) -> Result<(), EditError> {
    let (parent_id, branch) = match slot {
        Slot::Root => {
            if index > forest.len() {
                return Err(EditError::index_out_of_bounds(index, forest.len()));
            }
            forest.insert(index, block);
            return Ok(());
        }
        Slot::Inside { parent, branch } => (parent, *branch),
    };

    let parent = find_mut(forest, parent_id).ok_or_else(|| EditError::block_not_found(parent_id))?;
    if !parent.is_container() {
        return Err(EditError::not_a_container(parent_id, parent.block_type));
    }

    let len = parent.children.len();
    let else_index = parent.else_index();
    let position = match branch {
        Branch::Main => {
            let section = else_index.unwrap_or(len);
            if index > section {
                return Err(EditError::index_out_of_bounds(index, section));
            }
            index
        }
        Branch::Else => {
            if parent.condition().is_none() {
                return Err(EditError::not_a_condition(parent_id));
            }
            let start = else_index.ok_or_else(|| EditError::NoElseBranch {
                id: parent_id.clone(),
            })?;
            if index > len - start {
                return Err(EditError::index_out_of_bounds(index, len - start));
            }
            start + index
        }
    };

    parent.children.insert(position, block);
    if branch == Branch::Main
        && let Some(meta) = parent.condition_mut()
        && let Some(split) = meta.else_index.as_mut()
    {
        *split = (*split).min(len) + 1;
    }
    Ok(())
}

/// Detach the block `id`, shifting the else split of its parent when the
/// block came from the IF-section.
fn remove(forest: &mut Vec<Block>, id: &BlockId) -> Option<Block> {
    if let Some(index) = forest.iter().position(|block| &block.id == id) {
        return Some(forest.remove(index));
    }
    for parent in forest.iter_mut() {
        if let Some(index) = parent.children.iter().position(|block| &block.id == id) {
            let len = parent.children.len();
            let removed = parent.children.remove(index);
            if let Some(meta) = parent.condition_mut()
                && let Some(split) = meta.else_index.as_mut()
            {
                let clamped = (*split).min(len);
                *split = if index < clamped { clamped - 1 } else { clamped };
            }
            return Some(removed);
        }
        if let Some(removed) = remove(&mut parent.children, id) {
            return Some(removed);
        }
    }
    None
}

fn find_mut<'a>(blocks: &'a mut [Block], id: &BlockId) -> Option<&'a mut Block> {
    for block in blocks {
        if &block.id == id {
            return Some(block);
        }
        if let Some(found) = find_mut(&mut block.children, id) {
            return Some(found);
        }
    }
    None
}

fn renormalize(blocks: &mut [Block], depth: usize) {
    for block in blocks {
        block.depth = depth;
        renormalize(&mut block.children, depth + 1);
    }
}
