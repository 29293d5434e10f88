//! Per-script metadata extraction
//!
//! Each command type routes to at most one bucket. The collector is fed one
//! command at a time while a script is being segmented.

use std::collections::BTreeSet;

use crate::types::command::{Command, CommandKind};
use crate::types::script::ParsedScript;

/// Extraction target of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Semafori,
    RealVariables,
    Labels,
    References,
    SubScripts,
    Characters,
    Missions,
    Nodes,
}

/// Bucket and extracted name for a command, if it feeds one
pub fn route(kind: &CommandKind) -> Option<(Bucket, &str)> {
    let routed = match kind {
        CommandKind::VariableSet { variable } | CommandKind::VariableReset { variable } => {
            (Bucket::Semafori, variable.as_str())
        }
        CommandKind::VariableSetTo { variable, .. } => (Bucket::RealVariables, variable.as_str()),
        CommandKind::Label { name } => (Bucket::Labels, name.as_str()),
        CommandKind::Goto { target } => (Bucket::References, target.as_str()),
        CommandKind::Subscript { script_name } => (Bucket::SubScripts, script_name.as_str()),
        CommandKind::ShowCharacter { character, .. }
        | CommandKind::ChangeCharacter { character, .. } => {
            (Bucket::Characters, character.as_str())
        }
        CommandKind::StartMission { mission_name } => (Bucket::Missions, mission_name.as_str()),
        CommandKind::CenterMap { node } | CommandKind::ShowNode { node } => {
            (Bucket::Nodes, node.as_str())
        }
        _ => return None,
    };
    Some(routed)
}

/// Incremental reducer over a script's commands
#[derive(Debug, Default)]
pub struct MetadataCollector {
    labels: BTreeSet<String>,
    references: BTreeSet<String>,
    sub_scripts: BTreeSet<String>,
    missions: BTreeSet<String>,
    semafori: BTreeSet<String>,
    real_variables: BTreeSet<String>,
    characters: BTreeSet<String>,
    nodes: BTreeSet<String>,
}

impl MetadataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: &Command) {
        let Some((bucket, name)) = route(&command.kind) else {
            return;
        };
        if name.is_empty() {
            return;
        }
        let set = match bucket {
            Bucket::Semafori => &mut self.semafori,
            Bucket::RealVariables => &mut self.real_variables,
            Bucket::Labels => &mut self.labels,
            Bucket::References => &mut self.references,
            Bucket::SubScripts => &mut self.sub_scripts,
            Bucket::Characters => &mut self.characters,
            Bucket::Missions => &mut self.missions,
            Bucket::Nodes => &mut self.nodes,
        };
        set.insert(name.to_string());
    }

    /// Move the collected sets into `script`.
    pub fn finish(self, mut script: ParsedScript) -> ParsedScript {
        script.variables = self.semafori.union(&self.real_variables).cloned().collect();
        script.labels = self.labels;
        script.references = self.references;
        script.sub_scripts = self.sub_scripts;
        script.missions = self.missions;
        script.semafori = self.semafori;
        script.real_variables = self.real_variables;
        script.characters = self.characters;
        script.nodes = self.nodes;
        script
    }
}

/// Run the collector over an already tokenized command list.
pub fn extract(script: ParsedScript) -> ParsedScript {
    let mut collector = MetadataCollector::new();
    for command in &script.commands {
        collector.push(command);
    }
    collector.finish(script)
}
