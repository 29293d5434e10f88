//! Scripts and source files

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::command::Command;

/// One loaded campaign file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub file_name: String,
    /// Language code, e.g. `EN`
    pub language: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(
        file_name: impl Into<String>,
        language: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            language: language.into(),
            text: text.into(),
        }
    }
}

/// A named script between `SCRIPT <name>` and `END_OF_SCRIPT`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedScript {
    pub name: String,
    pub file_name: String,
    pub language: String,
    pub commands: Vec<Command>,
    /// Names defined by `LABEL`
    pub labels: BTreeSet<String>,
    /// Targets of `GO`
    pub references: BTreeSet<String>,
    pub sub_scripts: BTreeSet<String>,
    pub missions: BTreeSet<String>,
    /// Union of `semafori` and `real_variables`
    pub variables: BTreeSet<String>,
    pub semafori: BTreeSet<String>,
    pub real_variables: BTreeSet<String>,
    pub characters: BTreeSet<String>,
    pub nodes: BTreeSet<String>,
}

impl ParsedScript {
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
