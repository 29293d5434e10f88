//! Line tokenizer for campaign scripts
//!
//! Every source line maps to exactly one [`Command`]. Tokenizing never fails:
//! a line whose leading keyword is not recognized becomes
//! [`CommandKind::Unknown`] with its raw content kept.

use crate::types::command::{Command, CommandKind, PredefinedCondition};

pub mod segment;


pub use segment::segment;

type Builder = fn(&str) -> CommandKind;

/// Keyword table, checked in order. A keyword matches when the upper-cased
/// line starts with it and is followed by whitespace or the end of line, so
/// `IF_PROB` can never be taken for `IF` and `SET_TO` never for `SET`.
const KEYWORDS: &[(&str, Builder)] = &[
    ("SHOWDLGSCENE", |_| CommandKind::DialogStart),
    ("HIDEDLGSCENE", |_| CommandKind::DialogEnd),
    ("SHOWCHAR", show_character),
    ("HIDECHAR", |rest| CommandKind::HideCharacter {
        character: word(rest, 0),
    }),
    ("CHANGECHAR", |rest| CommandKind::ChangeCharacter {
        character: word(rest, 0),
        image: word(rest, 1),
    }),
    ("FOCUSCHAR", |rest| CommandKind::FocusCharacter {
        character: word(rest, 0),
    }),
    ("SAY", |rest| CommandKind::Dialogue { text: unquote(rest) }),
    ("ASK", |rest| CommandKind::Question { text: unquote(rest) }),
    ("ANNOUNCE", |rest| CommandKind::Announce { text: unquote(rest) }),
    ("MENU", |_| CommandKind::MenuStart),
    ("END_OF_MENU", |_| CommandKind::MenuEnd),
    ("OPT_IFNOT", |rest| {
        let (condition, text) = split_word(rest);
        CommandKind::MenuOptionConditionalNot {
            condition,
            text: unquote(text),
        }
    }),
    ("OPT_IF", |rest| {
        let (condition, text) = split_word(rest);
        CommandKind::MenuOptionConditional {
            condition,
            text: unquote(text),
        }
    }),
    ("OPT", |rest| CommandKind::MenuOption { text: unquote(rest) }),
    ("END_OF_OPT", |_| CommandKind::MenuOptionEnd),
    ("EXIT_MENU", |_| CommandKind::MenuExit),
    ("IF_TUTORIAL_SEEN", |_| predefined(PredefinedCondition::TutorialSeen)),
    ("IF_FROM_CAMPAIGN", |_| predefined(PredefinedCondition::FromCampaign)),
    ("IF_DEBUG", |_| predefined(PredefinedCondition::Debug)),
    ("IF_MISSION_WON", |_| predefined(PredefinedCondition::MissionWon)),
    ("IF_PROB", |rest| {
        predefined(PredefinedCondition::Prob {
            probability: word(rest, 0),
        })
    }),
    ("IF_MIN", |rest| {
        predefined(PredefinedCondition::Min {
            variable: word(rest, 0),
            min_value: word(rest, 1),
        })
    }),
    ("IF_MAX", |rest| {
        predefined(PredefinedCondition::Max {
            variable: word(rest, 0),
            max_value: word(rest, 1),
        })
    }),
    ("IF_IS", |rest| {
        predefined(PredefinedCondition::Is {
            variable: word(rest, 0),
            exact_value: word(rest, 1),
        })
    }),
    ("IF_HAS_CREDITS", |rest| {
        predefined(PredefinedCondition::HasCredits {
            credits_amount: word(rest, 0),
        })
    }),
    ("IF_ORDER", |rest| {
        predefined(PredefinedCondition::Order {
            player_index: word(rest, 0),
            position_value: word(rest, 1),
        })
    }),
    ("IFMISSIONRESULTIS", |rest| {
        predefined(PredefinedCondition::MissionResultIs {
            value: word(rest, 0),
        })
    }),
    ("IFMISSIONRESULTMIN", |rest| {
        predefined(PredefinedCondition::MissionResultMin {
            value: word(rest, 0),
        })
    }),
    ("IF", |rest| CommandKind::ConditionStart {
        condition: word(rest, 0),
    }),
    ("IFNOT", |rest| CommandKind::ConditionStartNot {
        condition: word(rest, 0),
    }),
    ("ELSE", |_| CommandKind::ConditionElse),
    ("END_OF_IF", |_| CommandKind::ConditionEnd),
    ("SET_TO", |rest| {
        let value = word(rest, 1);
        CommandKind::VariableSetTo {
            variable: word(rest, 0),
            value: if value.is_empty() { "0".to_string() } else { value },
        }
    }),
    ("SET", |rest| CommandKind::VariableSet {
        variable: word(rest, 0),
    }),
    ("RESET", |rest| CommandKind::VariableReset {
        variable: word(rest, 0),
    }),
    ("DELAY", |rest| CommandKind::Delay {
        milliseconds: number(rest),
    }),
    ("LABEL", |rest| CommandKind::Label { name: word(rest, 0) }),
    ("GO", |rest| CommandKind::Goto {
        target: word(rest, 0),
    }),
    ("SUB_SCRIPT", |rest| CommandKind::Subscript {
        script_name: word(rest, 0),
    }),
    ("RETURN", |_| CommandKind::Return),
    ("ACT_MISSION", |rest| CommandKind::StartMission {
        mission_name: word(rest, 0),
    }),
    ("SETCREDITS", |rest| CommandKind::SetCredits {
        amount: number(rest),
    }),
    ("ADDCREDITS", |rest| CommandKind::AddCredits {
        amount: number(rest),
    }),
    ("CENTERMAPBYNODE", |rest| CommandKind::CenterMap { node: word(rest, 0) }),
    ("SHOWNODE", |rest| CommandKind::ShowNode { node: word(rest, 0) }),
    ("HIDENODE", |rest| CommandKind::HideNode { node: word(rest, 0) }),
    ("SHOWPATH", |rest| CommandKind::ShowPath { route: word(rest, 0) }),
    ("HIDEPATH", |rest| CommandKind::HidePath { route: word(rest, 0) }),
    ("SHOWBUTTON", |rest| CommandKind::ShowButton {
        button: word(rest, 0),
    }),
    ("HIDEBUTTON", |rest| CommandKind::HideButton {
        button: word(rest, 0),
    }),
    ("SETFOCUS", |rest| CommandKind::SetFocus {
        button: word(rest, 0),
    }),
    ("RESETFOCUS", |rest| CommandKind::ResetFocus {
        button: word(rest, 0),
    }),
    ("ADDINFOWINDOW", |rest| CommandKind::AddInfoWindow {
        image: word(rest, 0),
    }),
    ("SHOWINFOWINDOW", |rest| CommandKind::ShowInfoWindow {
        image: optional_word(rest, 0),
    }),
    ("SETFLIGHTSTATUSBAR", |rest| CommandKind::StatusBar {
        message: unquote(rest),
    }),
];

/// Tokenize one source line
pub fn parse_line(line: &str, line_number: usize) -> Command {
    let content = line.trim();
    let kind = match_keyword(content)
        .map(|(build, rest)| build(rest))
        .unwrap_or(CommandKind::Unknown);
    Command::new(line_number, content, kind)
}

/// Tokenize a bare script body (no `SCRIPT` wrapper), skipping blank and
/// comment lines.
pub fn parse_body(text: &str) -> Vec<Command> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !is_skippable(line.trim()))
        .map(|(index, line)| parse_line(line, index + 1))
        .collect()
}

pub(crate) fn is_skippable(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with("//")
}

fn match_keyword(content: &str) -> Option<(Builder, &str)> {
    // ASCII upper-casing keeps byte offsets aligned with `content`
    let upper = content.to_ascii_uppercase();
    KEYWORDS.iter().find_map(|(keyword, build)| {
        let tail = upper.strip_prefix(keyword)?;
        if tail.is_empty() || tail.starts_with(char::is_whitespace) {
            Some((*build, content[keyword.len()..].trim()))
        } else {
            None
        }
    })
}

fn predefined(condition: PredefinedCondition) -> CommandKind {
    CommandKind::ConditionPredefined {
        predefined: condition,
    }
}

fn show_character(rest: &str) -> CommandKind {
    let position = word(rest, 1);
    CommandKind::ShowCharacter {
        character: word(rest, 0),
        position: if position.is_empty() {
            "center".to_string()
        } else {
            position
        },
        image: optional_word(rest, 2),
    }
}

fn optional_word(rest: &str, index: usize) -> Option<String> {
    rest.split_whitespace().nth(index).map(str::to_string)
}

fn word(rest: &str, index: usize) -> String {
    optional_word(rest, index).unwrap_or_default()
}

/// Split off the first word, returning it and the trimmed remainder.
fn split_word(rest: &str) -> (String, &str) {
    match rest.split_once(char::is_whitespace) {
        Some((first, remainder)) => (first.to_string(), remainder.trim()),
        None => (rest.to_string(), ""),
    }
}

fn unquote(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);
    text.to_string()
}

fn number<T: std::str::FromStr + Default>(rest: &str) -> T {
    rest.split_whitespace()
        .next()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}
