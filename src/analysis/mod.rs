//! Campaign-wide analysis
//!
//! Aggregates the metadata of every script of the primary language, builds
//! each script's block tree and the call graph between scripts.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::parser::segment;
use crate::tree;
use crate::types::block::Block;
use crate::types::script::{ParsedScript, SourceFile};
use crate::types::state::FlowSeed;

pub mod metadata;

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Only sources in this language are analyzed; others carry translations.
    pub primary_language: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            primary_language: "EN".to_string(),
        }
    }
}

/// Aggregate view of a campaign
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignAnalysis {
    pub scripts: Vec<ParsedScript>,
    /// Script name to index in `scripts`; a later duplicate wins
    pub script_map: BTreeMap<String, usize>,
    /// Scripts each script calls or jumps into
    pub script_connections: BTreeMap<String, BTreeSet<String>>,
    pub variables: BTreeSet<String>,
    pub semafori: BTreeSet<String>,
    pub real_variables: BTreeSet<String>,
    pub characters: BTreeSet<String>,
    pub missions: BTreeSet<String>,
    pub labels: BTreeSet<String>,
    /// Names used both as semaforo and as variable
    pub variable_conflicts: BTreeSet<String>,
    /// Map node to the scripts referencing it
    pub node_scripts: BTreeMap<String, BTreeSet<String>>,
    pub flow_structure: BTreeMap<String, Vec<Block>>,
}

/// Segment every source in the primary language and analyze the result.
pub fn analyze_sources(sources: &[SourceFile], config: &AnalysisConfig) -> CampaignAnalysis {
    let scripts = sources
        .iter()
        .filter(|source| source.language.eq_ignore_ascii_case(&config.primary_language))
        .flat_map(|source| segment(&source.text, &source.file_name, &source.language))
        .collect();
    analyze(scripts)
}

/// Analyze already segmented scripts.
pub fn analyze(scripts: Vec<ParsedScript>) -> CampaignAnalysis {
    let mut analysis = CampaignAnalysis::default();

    for (index, script) in scripts.iter().enumerate() {
        if analysis.script_map.insert(script.name.clone(), index).is_some() {
            log::warn!(
                "script '{}' defined more than once, using the one from {}",
                script.name,
                script.file_name
            );
        }
        analysis.variables.extend(script.variables.iter().cloned());
        analysis.semafori.extend(script.semafori.iter().cloned());
        analysis.real_variables.extend(script.real_variables.iter().cloned());
        analysis.characters.extend(script.characters.iter().cloned());
        analysis.missions.extend(script.missions.iter().cloned());
        analysis.labels.extend(script.labels.iter().cloned());
        for node in &script.nodes {
            analysis
                .node_scripts
                .entry(node.clone())
                .or_default()
                .insert(script.name.clone());
        }
        analysis
            .flow_structure
            .insert(script.name.clone(), tree::build_script(script));
    }

    analysis.variable_conflicts = analysis
        .semafori
        .intersection(&analysis.real_variables)
        .cloned()
        .collect();
    for name in &analysis.variable_conflicts {
        log::warn!("'{name}' is used both as a semaforo and as a variable");
    }

    for script in &scripts {
        let mut connections: BTreeSet<String> = script
            .sub_scripts
            .iter()
            .filter(|name| analysis.script_map.contains_key(*name))
            .cloned()
            .collect();
        for (name, &index) in &analysis.script_map {
            if name != &script.name
                && scripts[index]
                    .labels
                    .iter()
                    .any(|label| script.references.contains(label))
            {
                connections.insert(name.clone());
            }
        }
        analysis
            .script_connections
            .entry(script.name.clone())
            .or_default()
            .extend(connections);
    }

    analysis.scripts = scripts;
    log::debug!(
        "analyzed {} scripts, {} semafori, {} variables",
        analysis.scripts.len(),
        analysis.semafori.len(),
        analysis.real_variables.len()
    );
    analysis
}

impl CampaignAnalysis {
    pub fn script(&self, name: &str) -> Option<&ParsedScript> {
        self.script_map.get(name).map(|&index| &self.scripts[index])
    }

    /// Block tree of a script
    pub fn blocks(&self, name: &str) -> Option<&[Block]> {
        self.flow_structure.get(name).map(Vec::as_slice)
    }

    /// Scripts directly called or jumped into by `name`
    pub fn connected_scripts(&self, name: &str) -> Vec<&ParsedScript> {
        self.script_connections
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|target| self.script(target))
            .collect()
    }

    pub fn scripts_by_node(&self, node: &str) -> Vec<&ParsedScript> {
        self.node_scripts
            .get(node)
            .into_iter()
            .flatten()
            .filter_map(|name| self.script(name))
            .collect()
    }

    /// Scripts referencing `node` plus everything reachable from them through
    /// calls, in either direction.
    pub fn related_scripts_for_node(&self, node: &str) -> BTreeSet<String> {
        let start = self.node_scripts.get(node).cloned().unwrap_or_default();
        self.related_closure(start)
    }

    /// Scripts starting `mission` plus everything connected to them.
    pub fn related_scripts_for_mission(&self, mission: &str) -> BTreeSet<String> {
        let start = self
            .scripts
            .iter()
            .filter(|script| script.missions.contains(mission))
            .map(|script| script.name.clone())
            .collect();
        self.related_closure(start)
    }

    fn related_closure(&self, start: BTreeSet<String>) -> BTreeSet<String> {
        let mut neighbours: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (from, targets) in &self.script_connections {
            for to in targets {
                neighbours.entry(from).or_default().insert(to);
                neighbours.entry(to).or_default().insert(from);
            }
        }

        let mut seen = start.clone();
        let mut queue: VecDeque<String> = start.into_iter().collect();
        while let Some(name) = queue.pop_front() {
            for next in neighbours.get(name.as_str()).into_iter().flatten() {
                if seen.insert(next.to_string()) {
                    queue.push_back(next.to_string());
                }
            }
        }
        seen
    }
}

impl From<&CampaignAnalysis> for FlowSeed {
    fn from(analysis: &CampaignAnalysis) -> Self {
        Self {
            characters: analysis
                .characters
                .iter()
                .map(|name| (name.clone(), String::new()))
                .collect(),
            semafori: analysis.semafori.clone(),
            variables: analysis.real_variables.clone(),
        }
    }
}
