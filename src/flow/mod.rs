//! Flow state replay
//!
//! The state at a block is rebuilt from scratch on every query by walking the
//! forest depth-first, parents before children, and applying each block's
//! effect. The walk stops *before* the target block, so the snapshot never
//! includes the target's own effect. Nothing is cached between queries.
//!
//! The last `Ask` is tracked per branch: the IF-section and ELSE-section of a
//! condition and the body of each menu option start with no Ask. Dialog and
//! menu bodies share the scope around them.

use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

use crate::types::block::{Block, BlockId, ContainerKind};
use crate::types::command::CommandKind;
use crate::types::state::{CharacterState, FlowSeed, FlowState, VarValue};

#[cfg(test)]
mod tests;

/// Where a replay stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopAt {
    /// Stop right before this block
    Block(BlockId),
    /// Replay the whole forest
    End,
}

impl From<Option<BlockId>> for StopAt {
    fn from(id: Option<BlockId>) -> Self {
        id.map_or(Self::End, Self::Block)
    }
}

/// Replay `blocks` from `seed` until `stop`.
pub fn compute_flow_state(blocks: &[Block], stop: &StopAt, seed: &FlowSeed) -> FlowState {
    let mut replay = Replay {
        state: seed.initial_state(),
        scopes: vec![None],
        stop,
    };
    let reached = replay.section(blocks).is_break();
    if let StopAt::Block(id) = stop
        && !reached
    {
        log::debug!("flow replay: block '{id}' not found, returning end state");
    }

    let mut state = replay.state;
    state.last_ask_block_id = replay.scopes.pop().flatten();
    state.reached_target = reached;
    state
}

/// State right before block `id`.
pub fn state_at(blocks: &[Block], id: &BlockId, seed: &FlowSeed) -> FlowState {
    compute_flow_state(blocks, &StopAt::Block(id.clone()), seed)
}

/// State after the whole forest.
pub fn final_state(blocks: &[Block], seed: &FlowSeed) -> FlowState {
    compute_flow_state(blocks, &StopAt::End, seed)
}

struct Replay<'a> {
    state: FlowState,
    /// Last Ask per open branch, innermost last
    scopes: Vec<Option<BlockId>>,
    stop: &'a StopAt,
}

impl Replay<'_> {
    fn section(&mut self, blocks: &[Block]) -> ControlFlow<()> {
        for block in blocks {
            self.visit(block)?;
        }
        ControlFlow::Continue(())
    }

    fn visit(&mut self, block: &Block) -> ControlFlow<()> {
        if let StopAt::Block(target) = self.stop
            && target == &block.id
        {
            log::trace!("flow replay: stopped at '{target}'");
            return ControlFlow::Break(());
        }

        self.apply(block);

        let Some(kind) = block.container_kind() else {
            return ControlFlow::Continue(());
        };
        let (main, other) = block.branches();
        match kind {
            ContainerKind::Dialog | ContainerKind::Menu => self.section(main)?,
            ContainerKind::Option | ContainerKind::Condition => self.branch(main)?,
        }
        if block.else_index().is_some() {
            self.branch(other)?;
        }
        ControlFlow::Continue(())
    }

    /// Replay a section in a fresh Ask scope. On a stop the scope is left in
    /// place so the caller reads the Ask of the branch the target lives in.
    fn branch(&mut self, blocks: &[Block]) -> ControlFlow<()> {
        self.scopes.push(None);
        self.section(blocks)?;
        self.scopes.pop();
        ControlFlow::Continue(())
    }

    fn apply(&mut self, block: &Block) {
        let state = &mut self.state;
        match &block.command.kind {
            CommandKind::ShowCharacter {
                character, image, ..
            } if !character.is_empty() => {
                let entry = state
                    .characters
                    .entry(character.clone())
                    .or_insert_with(|| CharacterState::hidden(image.clone().unwrap_or_default()));
                entry.is_shown = true;
                if let Some(image) = image {
                    entry.current_image = image.clone();
                }
            }
            CommandKind::HideCharacter { character } => {
                if let Some(entry) = state.characters.get_mut(character) {
                    entry.is_shown = false;
                }
            }
            CommandKind::ChangeCharacter { character, image } if !character.is_empty() => {
                state
                    .characters
                    .entry(character.clone())
                    .or_insert_with(|| CharacterState::hidden(""))
                    .current_image = image.clone();
            }
            CommandKind::VariableSet { variable } if !variable.is_empty() => {
                state.semafori.insert(variable.clone(), true);
            }
            CommandKind::VariableReset { variable } if !variable.is_empty() => {
                state.semafori.insert(variable.clone(), false);
            }
            CommandKind::VariableSetTo { variable, value } if !variable.is_empty() => {
                state
                    .variables
                    .insert(variable.clone(), VarValue::from_literal(value));
            }
            CommandKind::Question { .. } => {
                if let Some(scope) = self.scopes.last_mut() {
                    *scope = Some(block.id.clone());
                }
            }
            _ => {}
        }
    }
}
