//! Block forest back to source text

use crate::types::block::{Block, BlockId};
use crate::types::command::{Command, CommandKind};

const INDENT: &str = "  ";

/// Render a forest as script source, one command per line.
///
/// Closers are written only for containers whose closer was seen, so the
/// command sequence of a parsed script is reproduced exactly.
pub fn serialize(blocks: &[Block]) -> String {
    let mut out = String::new();
    for command in walk(blocks) {
        out.push_str(&INDENT.repeat(command.depth));
        out.push_str(&command.text);
        out.push('\n');
    }
    out
}

/// Render a forest wrapped in `SCRIPT <name>` / `END_OF_SCRIPT`.
pub fn serialize_script(name: &str, blocks: &[Block]) -> String {
    let mut out = format!("SCRIPT {name}\n");
    for line in serialize(blocks).lines() {
        out.push_str(INDENT);
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("END_OF_SCRIPT\n");
    out
}

/// The forest's command sequence, with structural markers restored and
/// lines renumbered from 1.
pub fn flatten(blocks: &[Block]) -> Vec<Command> {
    walk(blocks)
        .into_iter()
        .enumerate()
        .map(|(index, line)| Command::new(index + 1, line.text, line.kind))
        .collect()
}

/// The forest's command sequence paired with the block each command belongs
/// to. Commands keep their source lines; an ELSE or closer is paired with its
/// container and carries the container's line or end line.
pub fn flatten_sourced(blocks: &[Block]) -> Vec<(BlockId, Command)> {
    walk(blocks)
        .into_iter()
        .map(|line| (line.block_id, Command::new(line.line, line.text, line.kind)))
        .collect()
}

struct Line {
    depth: usize,
    text: String,
    kind: CommandKind,
    block_id: BlockId,
    line: usize,
}

fn walk(blocks: &[Block]) -> Vec<Line> {
    let mut lines = Vec::new();
    emit_section(blocks, 0, &mut lines);
    lines
}

fn emit_section(blocks: &[Block], depth: usize, lines: &mut Vec<Line>) {
    for block in blocks {
        emit_block(block, depth, lines);
    }
}

fn emit_block(block: &Block, depth: usize, lines: &mut Vec<Line>) {
    lines.push(Line {
        depth,
        text: block.command.source_line(),
        kind: block.command.kind.clone(),
        block_id: block.id.clone(),
        line: block.command.line,
    });

    let Some(kind) = block.container_kind() else {
        return;
    };

    let (main, other) = block.branches();
    emit_section(main, depth + 1, lines);
    if block.else_index().is_some() {
        push_marker(CommandKind::ConditionElse, block, block.command.line, depth, lines);
        emit_section(other, depth + 1, lines);
    }
    if block.closed {
        let line = block.end_line.unwrap_or(block.command.line);
        push_marker(kind.closer(), block, line, depth, lines);
    }
}

fn push_marker(
    kind: CommandKind,
    owner: &Block,
    line: usize,
    depth: usize,
    lines: &mut Vec<Line>,
) {
    lines.push(Line {
        depth,
        text: kind.to_string(),
        kind,
        block_id: owner.id.clone(),
        line,
    });
}
