//! Block tree builder
//!
//! Turns a flat command list into a forest of [`Block`]s. The builder is
//! lenient: it always produces a tree. A closer that does not match the
//! innermost open container is dropped with a warning, and containers left
//! open at the end stay open (`closed == false`). The strict account of those
//! problems is the `container_balance` validation pass.

use crate::types::block::{Block, BlockId, Branch};
use crate::types::command::{Command, CommandType};
use crate::types::script::ParsedScript;

pub mod edit;
pub mod serialize;

#[cfg(test)]
mod tests;

pub use edit::{Edit, Slot, apply_edit, fresh_id};
pub use serialize::{flatten, flatten_sourced, serialize, serialize_script};

/// Id prefix used when building commands that do not belong to a named script
pub const DEFAULT_PREFIX: &str = "block";

/// Build a forest from `commands`, with ids prefixed by `block`.
pub fn build(commands: &[Command]) -> Vec<Block> {
    build_with_prefix(DEFAULT_PREFIX, commands)
}

/// Build a script's forest; ids are prefixed with the script name.
pub fn build_script(script: &ParsedScript) -> Vec<Block> {
    build_with_prefix(&script.name, &script.commands)
}

pub fn build_with_prefix(prefix: &str, commands: &[Command]) -> Vec<Block> {
    let mut builder = TreeBuilder::default();
    for (index, command) in commands.iter().enumerate() {
        builder.push(BlockId::for_command(prefix, index), command);
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Block>,
    stack: Vec<Block>,
}

impl TreeBuilder {
    fn push(&mut self, id: BlockId, command: &Command) {
        let command_type = command.command_type();

        if command_type.opens().is_some() {
            let mut block = Block::from_command(id, command.clone());
            block.closed = false;
            block.depth = self.stack.len();
            self.stack.push(block);
            return;
        }

        if let Some(kind) = command_type.closes() {
            match self.stack.last() {
                Some(top) if top.container_kind() == Some(kind) => {
                    if let Some(mut block) = self.stack.pop() {
                        block.closed = true;
                        block.end_line = Some(command.line);
                        self.attach(block);
                    }
                }
                top => log::warn!(
                    "line {}: dropping '{}', innermost open container is {}",
                    command.line,
                    command.content,
                    top.map_or("none", |block| block.block_type.as_str())
                ),
            }
            return;
        }

        if command_type == CommandType::ConditionElse {
            self.open_else(command);
            return;
        }

        let mut block = Block::from_command(id, command.clone());
        block.depth = self.stack.len();
        self.attach(block);
    }

    fn open_else(&mut self, command: &Command) {
        let Some(top) = self.stack.last_mut() else {
            log::warn!("line {}: ELSE outside any container", command.line);
            return;
        };
        let len = top.children.len();
        match top.condition_mut() {
            Some(meta) if meta.else_index.is_none() => meta.else_index = Some(len),
            Some(_) => log::warn!("line {}: second ELSE in the same condition", command.line),
            None => log::warn!("line {}: ELSE inside a non-condition container", command.line),
        }
    }

    /// Append a finished block to the innermost open container, or the roots.
    fn attach(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(block),
            None => self.roots.push(block),
        }
    }

    fn finish(mut self) -> Vec<Block> {
        while let Some(block) = self.stack.pop() {
            log::warn!(
                "line {}: {} '{}' never closed",
                block.command.line,
                block.block_type,
                block.command.content
            );
            self.attach(block);
        }
        self.roots
    }
}

/// Where a block sits inside its forest
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    /// Enclosing container, `None` at the root
    pub parent: Option<&'a Block>,
    /// The section of the parent (or the root forest) holding the block
    pub siblings: &'a [Block],
    /// Position of the block within `siblings`
    pub index: usize,
    pub branch: Branch,
}

impl<'a> Location<'a> {
    pub fn block(&self) -> &'a Block {
        &self.siblings[self.index]
    }

    /// Sibling immediately before the block in the same section
    pub fn previous(&self) -> Option<&'a Block> {
        self.index.checked_sub(1).map(|i| &self.siblings[i])
    }

    pub fn next(&self) -> Option<&'a Block> {
        self.siblings.get(self.index + 1)
    }
}

/// Find a block and describe its position.
pub fn locate<'a>(blocks: &'a [Block], id: &BlockId) -> Option<Location<'a>> {
    locate_in(None, blocks, Branch::Main, id)
}

fn locate_in<'a>(
    parent: Option<&'a Block>,
    section: &'a [Block],
    branch: Branch,
    id: &BlockId,
) -> Option<Location<'a>> {
    for (index, block) in section.iter().enumerate() {
        if &block.id == id {
            return Some(Location {
                parent,
                siblings: section,
                index,
                branch,
            });
        }
        let (main, other) = block.branches();
        if let Some(found) = locate_in(Some(block), main, Branch::Main, id) {
            return Some(found);
        }
        if let Some(found) = locate_in(Some(block), other, Branch::Else, id) {
            return Some(found);
        }
    }
    None
}
