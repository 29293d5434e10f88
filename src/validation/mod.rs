//! Validation engine
//!
//! Per-block rules run against the flow state at the block and its position
//! in the forest. A separate strict pass checks container balance over the
//! command sequence. Validation is exhaustive: every block is checked and
//! problems are returned as data, never as errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::analysis::CampaignAnalysis;
use crate::flow::state_at;
use crate::tree::{self, Location, locate};
use crate::types::block::{Block, BlockId, BlockType, ContainerKind, preorder};
use crate::types::command::{Command, CommandType};
use crate::types::script::ParsedScript;
use crate::types::state::{FlowSeed, FlowState};

pub mod config;
pub mod rules;


pub use config::ValidationConfig;
pub use rules::{RULES, Rule};

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Marks the block invalid
    Error,
    /// Advisory only
    Warning,
}

/// Rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    CharacterVisibility,
    AskConsecutive,
    MenuPrerequisites,
    VariableExistence,
    ParameterValidation,
    DialogScene,
    GotoLabel,
    ReturnPlacement,
    /// Script-level structural pass
    ContainerBalance,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CharacterVisibility => "character_visibility",
            Self::AskConsecutive => "ask_consecutive",
            Self::MenuPrerequisites => "menu_prerequisites",
            Self::VariableExistence => "variable_existence",
            Self::ParameterValidation => "parameter_validation",
            Self::DialogScene => "dialog_scene",
            Self::GotoLabel => "goto_label",
            Self::ReturnPlacement => "return_placement",
            Self::ContainerBalance => "container_balance",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable issue code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    CharacterNotVisible,
    AskConsecutive,
    MenuNeedsAsk,
    UnknownVariable,
    UnknownSemaforo,
    AmbiguousVariable,
    MissingParameter,
    InvalidParameter,
    NoDialogScene,
    UnknownLabel,
    ReturnAtRoot,
    UnmatchedCloser,
    UnclosedContainer,
    StrayElse,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub rule: RuleId,
    pub code: IssueCode,
    pub severity: Severity,
    pub message: String,
    pub block_id: Option<BlockId>,
    /// Source line (1-indexed)
    pub line: usize,
}

impl Issue {
    pub fn error(rule: RuleId, code: IssueCode, block: &Block, message: impl Into<String>) -> Self {
        Self::for_block(rule, code, Severity::Error, block, message)
    }

    pub fn warning(
        rule: RuleId,
        code: IssueCode,
        block: &Block,
        message: impl Into<String>,
    ) -> Self {
        Self::for_block(rule, code, Severity::Warning, block, message)
    }

    fn for_block(
        rule: RuleId,
        code: IssueCode,
        severity: Severity,
        block: &Block,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            code,
            severity,
            message: message.into(),
            block_id: Some(block.id.clone()),
            line: block.command.line,
        }
    }
}

/// Names a script is allowed to reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnownNames {
    pub semafori: BTreeSet<String>,
    pub real_variables: BTreeSet<String>,
    pub characters: BTreeSet<String>,
    /// Jump targets
    pub labels: BTreeSet<String>,
    /// Names used both as semaforo and as variable
    pub conflicts: BTreeSet<String>,
}

impl KnownNames {
    /// Names declared by a single script.
    pub fn from_script(script: &ParsedScript) -> Self {
        Self {
            semafori: script.semafori.clone(),
            real_variables: script.real_variables.clone(),
            characters: script.characters.clone(),
            labels: script.labels.clone(),
            conflicts: script
                .semafori
                .intersection(&script.real_variables)
                .cloned()
                .collect(),
        }
    }

    /// Initial world for replaying a script against these names
    pub fn seed(&self) -> FlowSeed {
        FlowSeed {
            characters: self
                .characters
                .iter()
                .map(|name| (name.clone(), String::new()))
                .collect(),
            semafori: self.semafori.clone(),
            variables: self.real_variables.clone(),
        }
    }
}

impl From<&CampaignAnalysis> for KnownNames {
    fn from(analysis: &CampaignAnalysis) -> Self {
        Self {
            semafori: analysis.semafori.clone(),
            real_variables: analysis.real_variables.clone(),
            characters: analysis.characters.clone(),
            labels: analysis.labels.clone(),
            conflicts: analysis.variable_conflicts.clone(),
        }
    }
}

/// Everything a rule may look at for one block
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    /// State right before the block
    pub state: FlowState,
    /// The whole forest
    pub blocks: &'a [Block],
    /// Position of the block, `None` if it is not part of `blocks`
    pub location: Option<Location<'a>>,
    pub known: &'a KnownNames,
    pub config: &'a ValidationConfig,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        blocks: &'a [Block],
        block: &Block,
        seed: &FlowSeed,
        known: &'a KnownNames,
        config: &'a ValidationConfig,
    ) -> Self {
        Self {
            state: state_at(blocks, &block.id, seed),
            blocks,
            location: locate(blocks, &block.id),
            known,
            config,
        }
    }

    pub fn parent(&self) -> Option<&'a Block> {
        self.location.and_then(|location| location.parent)
    }

    pub fn last_ask_in_branch(&self) -> Option<&BlockId> {
        self.state.last_ask_block_id.as_ref()
    }
}

/// Validation result for one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockReport {
    pub block_id: BlockId,
    pub block_type: BlockType,
    pub line: usize,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    /// Command types that may be inserted right before the block
    pub can_insert_before: Vec<CommandType>,
    /// Command types that may be inserted right after the block
    pub can_insert_after: Vec<CommandType>,
    /// Command types that may be inserted as children
    pub can_insert_inside: Vec<CommandType>,
}

impl BlockReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validation result for a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptReport {
    pub script: String,
    pub blocks: Vec<BlockReport>,
    /// Findings of the container balance pass
    pub structural: Vec<Issue>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl ScriptReport {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            blocks: Vec::new(),
            structural: Vec::new(),
            error_count: 0,
            warning_count: 0,
        }
    }

    pub fn add_block(&mut self, report: BlockReport) {
        self.error_count += report.errors.len();
        self.warning_count += report.warnings.len();
        self.blocks.push(report);
    }

    pub fn add_structural(&mut self, issue: Issue) {
        match issue.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.structural.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Every finding, block issues first in block order
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.blocks
            .iter()
            .flat_map(|block| block.errors.iter().chain(&block.warnings))
            .chain(&self.structural)
    }

    pub fn block(&self, id: &BlockId) -> Option<&BlockReport> {
        self.blocks.iter().find(|report| &report.block_id == id)
    }
}

/// Run every enabled rule that applies to `block`.
pub fn validate_block(block: &Block, context: &ValidationContext<'_>) -> BlockReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for rule in RULES
        .iter()
        .filter(|rule| rule.applies_to(block.block_type) && context.config.is_enabled(rule.id))
    {
        for issue in (rule.check)(block, context) {
            match issue.severity {
                Severity::Error => errors.push(issue),
                Severity::Warning => warnings.push(issue),
            }
        }
    }

    BlockReport {
        block_id: block.id.clone(),
        block_type: block.block_type,
        line: block.command.line,
        errors,
        warnings,
        can_insert_before: insertable_before(context),
        can_insert_after: insertable_after(block, context),
        can_insert_inside: insertable_inside(block),
    }
}

/// Validate a script's forest and its command sequence.
///
/// `commands` feed the strict balance pass; `blocks` are what the per-block
/// rules see. Block ids cited by the balance pass use `name` as prefix.
pub fn validate_script(
    name: &str,
    commands: &[Command],
    blocks: &[Block],
    known: &KnownNames,
    config: &ValidationConfig,
) -> ScriptReport {
    let sequence = rules::balance::numbered(name, commands);
    validate_sequence(name, &sequence, blocks, known, config)
}

fn validate_sequence(
    name: &str,
    sequence: &[(BlockId, Command)],
    blocks: &[Block],
    known: &KnownNames,
    config: &ValidationConfig,
) -> ScriptReport {
    let mut report = ScriptReport::new(name);
    let seed = known.seed();

    for block in preorder(blocks) {
        let context = ValidationContext::new(blocks, block, &seed, known, config);
        report.add_block(validate_block(block, &context));
    }

    if config.is_enabled(RuleId::ContainerBalance) {
        for issue in rules::balance::check(sequence) {
            report.add_structural(issue);
        }
    }

    log::debug!(
        "validated '{name}': {} blocks, {} errors, {} warnings",
        report.blocks.len(),
        report.error_count,
        report.warning_count
    );
    report
}

/// Validate a parsed script, building its tree.
pub fn validate_parsed(
    script: &ParsedScript,
    known: &KnownNames,
    config: &ValidationConfig,
) -> ScriptReport {
    let blocks = tree::build_script(script);
    validate_script(&script.name, &script.commands, &blocks, known, config)
}

/// Validate an edited forest. The balance pass runs over the flattened
/// forest and cites the blocks' own ids and source lines.
pub fn validate_forest(
    name: &str,
    blocks: &[Block],
    known: &KnownNames,
    config: &ValidationConfig,
) -> ScriptReport {
    let sequence = tree::flatten_sourced(blocks);
    validate_sequence(name, &sequence, blocks, known, config)
}

/// Leaf types that may go anywhere inside a branch
pub const BASE_TYPES: &[CommandType] = &[
    CommandType::Dialogue,
    CommandType::Question,
    CommandType::Announce,
    CommandType::ShowCharacter,
    CommandType::HideCharacter,
    CommandType::ChangeCharacter,
    CommandType::VariableSet,
    CommandType::VariableReset,
    CommandType::VariableSetTo,
];

/// Container openers that may go anywhere inside a branch
pub const CONTAINER_TYPES: &[CommandType] = &[
    CommandType::DialogStart,
    CommandType::ConditionStart,
    CommandType::ConditionStartNot,
];

/// Openers accepted directly inside a menu
pub const OPTION_TYPES: &[CommandType] = &[
    CommandType::MenuOption,
    CommandType::MenuOptionConditional,
    CommandType::MenuOptionConditionalNot,
];

fn in_menu(context: &ValidationContext<'_>) -> bool {
    context
        .parent()
        .is_some_and(|parent| parent.container_kind() == Some(ContainerKind::Menu))
}

fn branch_types(menu_allowed: bool) -> Vec<CommandType> {
    let mut types = BASE_TYPES.to_vec();
    if menu_allowed {
        types.push(CommandType::MenuStart);
    }
    types.extend_from_slice(CONTAINER_TYPES);
    types
}

fn insertable_before(context: &ValidationContext<'_>) -> Vec<CommandType> {
    if in_menu(context) {
        return OPTION_TYPES.to_vec();
    }
    let previous = context.location.and_then(|location| location.previous());
    let menu_allowed = match (context.last_ask_in_branch(), previous) {
        (Some(ask), Some(previous)) => ask == &previous.id,
        _ => false,
    };
    branch_types(menu_allowed)
}

fn insertable_after(block: &Block, context: &ValidationContext<'_>) -> Vec<CommandType> {
    if in_menu(context) {
        return OPTION_TYPES.to_vec();
    }
    let last_ask_after = if block.command_type() == CommandType::Question {
        Some(&block.id)
    } else {
        context.last_ask_in_branch()
    };
    branch_types(last_ask_after == Some(&block.id))
}

fn insertable_inside(block: &Block) -> Vec<CommandType> {
    match block.container_kind() {
        Some(ContainerKind::Menu) => OPTION_TYPES.to_vec(),
        Some(_) => branch_types(false),
        None => Vec::new(),
    }
}
