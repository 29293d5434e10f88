//! Validation configuration

use serde::{Deserialize, Serialize};

use super::RuleId;
use crate::error::ConfigError;

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Per-rule switches
    pub rules: RuleSwitches,
    /// Variable checks
    pub variables: VariablesConfig,
}

impl ValidationConfig {
    /// Load from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        let rules = &self.rules;
        match rule {
            RuleId::CharacterVisibility => rules.character_visibility,
            RuleId::AskConsecutive => rules.ask_consecutive,
            RuleId::MenuPrerequisites => rules.menu_prerequisites,
            RuleId::VariableExistence => rules.variable_existence,
            RuleId::ParameterValidation => rules.parameter_validation,
            RuleId::DialogScene => rules.dialog_scene,
            RuleId::GotoLabel => rules.goto_label,
            RuleId::ReturnPlacement => rules.return_placement,
            RuleId::ContainerBalance => rules.container_balance,
        }
    }
}

/// Rule on/off switches, all on by default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSwitches {
    pub character_visibility: bool,
    pub ask_consecutive: bool,
    pub menu_prerequisites: bool,
    pub variable_existence: bool,
    pub parameter_validation: bool,
    pub dialog_scene: bool,
    pub goto_label: bool,
    pub return_placement: bool,
    pub container_balance: bool,
}

impl Default for RuleSwitches {
    fn default() -> Self {
        Self {
            character_visibility: true,
            ask_consecutive: true,
            menu_prerequisites: true,
            variable_existence: true,
            parameter_validation: true,
            dialog_scene: true,
            goto_label: true,
            return_placement: true,
            container_balance: true,
        }
    }
}

/// Variable checking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariablesConfig {
    /// Warn when a name is used both as a semaforo and as a variable
    pub warn_on_conflicts: bool,
}

impl Default for VariablesConfig {
    fn default() -> Self {
        Self {
            warn_on_conflicts: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "rules": { "ask_consecutive": false, "dialog_scene": true } }"#;
        let config = ValidationConfig::from_json_str(json).unwrap();
        assert!(!config.is_enabled(RuleId::AskConsecutive));
        assert!(config.is_enabled(RuleId::MenuPrerequisites));
        assert!(config.is_enabled(RuleId::DialogScene));
        assert!(config.variables.warn_on_conflicts);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = ValidationConfig::from_json_str("{ rules: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
