//! Flow state snapshots

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::block::BlockId;

/// Visibility and pose of one character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    pub base_image: String,
    pub current_image: String,
    pub is_shown: bool,
}

impl CharacterState {
    /// Hidden character showing its base image
    pub fn hidden(base_image: impl Into<String>) -> Self {
        let base_image = base_image.into();
        Self {
            current_image: base_image.clone(),
            base_image,
            is_shown: false,
        }
    }
}

/// Value of a non-boolean variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Number(i64),
    Text(String),
}

impl VarValue {
    /// Interpret a `SET_TO` literal: integers become numbers, anything else stays text.
    pub fn from_literal(literal: &str) -> Self {
        match literal.trim().parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(literal.to_string()),
        }
    }
}

impl Default for VarValue {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// World state reconstructed by replaying a script up to some point
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowState {
    pub characters: BTreeMap<String, CharacterState>,
    pub semafori: BTreeMap<String, bool>,
    pub variables: BTreeMap<String, VarValue>,
    /// Last `Ask` in the branch scope active where replay stopped
    pub last_ask_block_id: Option<BlockId>,
    /// Whether replay stopped at the requested block
    pub reached_target: bool,
}

impl FlowState {
    pub fn is_shown(&self, character: &str) -> bool {
        self.characters
            .get(character)
            .is_some_and(|state| state.is_shown)
    }

    /// Names of characters currently on screen
    pub fn visible_characters(&self) -> impl Iterator<Item = &str> {
        self.characters
            .iter()
            .filter(|(_, state)| state.is_shown)
            .map(|(name, _)| name.as_str())
    }

    pub fn semaforo(&self, name: &str) -> bool {
        self.semafori.get(name).copied().unwrap_or(false)
    }
}

/// Initial world a replay starts from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowSeed {
    /// Known characters and their base image
    pub characters: BTreeMap<String, String>,
    pub semafori: BTreeSet<String>,
    pub variables: BTreeSet<String>,
}

impl FlowSeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(
        mut self,
        name: impl Into<String>,
        base_image: impl Into<String>,
    ) -> Self {
        self.characters.insert(name.into(), base_image.into());
        self
    }

    pub fn with_semaforo(mut self, name: impl Into<String>) -> Self {
        self.semafori.insert(name.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variables.insert(name.into());
        self
    }

    /// Everything hidden, semafori false, variables at their default.
    pub fn initial_state(&self) -> FlowState {
        FlowState {
            characters: self
                .characters
                .iter()
                .map(|(name, image)| (name.clone(), CharacterState::hidden(image.clone())))
                .collect(),
            semafori: self.semafori.iter().map(|name| (name.clone(), false)).collect(),
            variables: self
                .variables
                .iter()
                .map(|name| (name.clone(), VarValue::default()))
                .collect(),
            last_ask_block_id: None,
            reached_target: false,
        }
    }
}
