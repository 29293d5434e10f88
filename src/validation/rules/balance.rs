//! Container balance
//!
//! Strict counterpart of the tree builder's pairing: every opener needs its
//! closer and every closer must match the innermost open container. Nothing
//! is dropped or repaired here, each problem is one error.

use crate::types::block::{BlockId, ContainerKind};
use crate::types::command::{Command, CommandType};
use crate::validation::{Issue, IssueCode, RuleId, Severity};

pub const DESCRIPTION: &str = "Every container opener needs a matching closer and vice versa";

struct Open<'a> {
    kind: ContainerKind,
    id: &'a BlockId,
    opener: &'a Command,
    has_else: bool,
}

/// Pair a parsed command list with the ids its blocks get under `prefix`.
pub fn numbered(prefix: &str, commands: &[Command]) -> Vec<(BlockId, Command)> {
    commands
        .iter()
        .enumerate()
        .map(|(index, command)| (BlockId::for_command(prefix, index), command.clone()))
        .collect()
}

/// Check a command sequence; each finding cites the id paired with the
/// offending command and that command's line.
pub fn check(sequence: &[(BlockId, Command)]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut stack: Vec<Open<'_>> = Vec::new();

    for (id, command) in sequence {
        let command_type = command.command_type();

        if let Some(kind) = command_type.opens() {
            stack.push(Open {
                kind,
                id,
                opener: command,
                has_else: false,
            });
        } else if let Some(kind) = command_type.closes() {
            if stack.last().is_some_and(|open| open.kind == kind) {
                stack.pop();
            } else {
                let expected = stack
                    .last()
                    .map_or("no open container".to_string(), |open| {
                        format!("{} opened at line {}", open.kind.as_str(), open.opener.line)
                    });
                issues.push(issue(
                    IssueCode::UnmatchedCloser,
                    id,
                    command.line,
                    format!("'{}' does not match {expected}", command.source_line()),
                ));
            }
        } else if command_type == CommandType::ConditionElse {
            match stack.last_mut() {
                Some(open) if open.kind == ContainerKind::Condition && !open.has_else => {
                    open.has_else = true;
                }
                _ => issues.push(issue(
                    IssueCode::StrayElse,
                    id,
                    command.line,
                    "ELSE outside a condition or repeated in the same condition",
                )),
            }
        }
    }

    for open in stack {
        issues.push(issue(
            IssueCode::UnclosedContainer,
            open.id,
            open.opener.line,
            format!(
                "'{}' is never closed, expected {}",
                open.opener.source_line(),
                open.kind.closer()
            ),
        ));
    }

    issues
}

fn issue(code: IssueCode, id: &BlockId, line: usize, message: impl Into<String>) -> Issue {
    Issue {
        rule: RuleId::ContainerBalance,
        code,
        severity: Severity::Error,
        message: message.into(),
        block_id: Some(id.clone()),
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_body, parse_line};

    fn check_body(body: &str) -> Vec<Issue> {
        check(&numbered("s", &parse_body(body)))
    }

    #[test]
    fn balanced_script_has_no_issues() {
        let body = "MENU\nOPT \"a\"\nEND_OF_OPT\nEND_OF_MENU\nIF x\nELSE\nEND_OF_IF\n";
        assert!(check_body(body).is_empty());
    }

    #[test]
    fn extra_closer_is_one_error() {
        let issues = check_body("ShowDlgScene\nSay \"a\"\nHideDlgScene\nEND_OF_IF\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::UnmatchedCloser);
        assert_eq!(issues[0].line, 4);
        assert_eq!(issues[0].block_id, Some(BlockId::from("s_block_3")));
    }

    #[test]
    fn unclosed_opener_is_reported_at_its_line() {
        let issues = check_body("Say \"a\"\nIF x\nSay \"b\"\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::UnclosedContainer);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].block_id, Some(BlockId::from("s_block_1")));
        assert!(issues[0].message.contains("END_OF_IF"));
    }

    #[test]
    fn findings_cite_the_paired_id() {
        let sequence = vec![
            (BlockId::from("s_block_7"), parse_line("Say \"a\"", 8)),
            (BlockId::from("s_block_9"), parse_line("MENU", 10)),
        ];
        let issues = check(&sequence);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].block_id, Some(BlockId::from("s_block_9")));
        assert_eq!(issues[0].line, 10);
    }

    #[test]
    fn stray_else_is_reported() {
        let issues = check_body("MENU\nELSE\nEND_OF_MENU\nIF x\nELSE\nELSE\nEND_OF_IF\n");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|issue| issue.code == IssueCode::StrayElse));
        assert_eq!(issues[1].line, 6);
    }
}
