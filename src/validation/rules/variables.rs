//! Variable and semaforo existence

use crate::types::block::Block;
use crate::types::command::VariableRef;
use crate::validation::{Issue, IssueCode, RuleId, ValidationContext};

/// Warn about names missing from the known sets, and about names used both
/// as a semaforo and as a variable.
pub fn check(block: &Block, context: &ValidationContext<'_>) -> Vec<Issue> {
    let Some(reference) = block.command.kind.variable_ref() else {
        return Vec::new();
    };
    let name = reference.name();
    if name.is_empty() {
        return Vec::new();
    }

    let known = context.known;
    let mut issues = Vec::new();
    match reference {
        VariableRef::Semaforo(_) if !known.semafori.contains(name) => issues.push(Issue::warning(
            RuleId::VariableExistence,
            IssueCode::UnknownSemaforo,
            block,
            format!("Semaforo '{name}' is never set or reset"),
        )),
        VariableRef::Real(_) if !known.real_variables.contains(name) => {
            issues.push(Issue::warning(
                RuleId::VariableExistence,
                IssueCode::UnknownVariable,
                block,
                format!("Variable '{name}' is never assigned"),
            ))
        }
        _ => {}
    }

    if context.config.variables.warn_on_conflicts && known.conflicts.contains(name) {
        issues.push(Issue::warning(
            RuleId::VariableExistence,
            IssueCode::AmbiguousVariable,
            block,
            format!("'{name}' is used both as a semaforo and as a variable"),
        ));
    }
    issues
}
