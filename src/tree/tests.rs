//! Tests for the tree builder, serializer and edits

use super::*;
use crate::error::EditError;
use crate::parser::parse_body;
use crate::types::block::{BlockType, ContainerKind};
use crate::types::command::CommandKind;

fn ids(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|block| block.id.as_str()).collect()
}

fn types(commands: &[Command]) -> Vec<CommandType> {
    commands.iter().map(Command::command_type).collect()
}

const NESTED: &str = r#"
ShowDlgScene
  ShowChar tutor center
  Ask "Ready?"
  MENU
    OPT "Yes"
      SET ready
    END_OF_OPT
    OPT_IFNOT ready "Not yet"
      IF met_tutor
        Say "Again?"
      ELSE
        Say "Nice to meet you"
        Say "Take your time"
      END_OF_IF
    END_OF_OPT
  END_OF_MENU
HideDlgScene
"#;

#[test]
fn build_nests_containers() {
    let blocks = build(&parse_body(NESTED));
    assert_eq!(blocks.len(), 1);

    let dialog = &blocks[0];
    assert_eq!(dialog.block_type, BlockType::Container(ContainerKind::Dialog));
    assert!(dialog.closed);
    assert_eq!(dialog.end_line, Some(18));
    assert_eq!(ids(&dialog.children), vec!["block_1", "block_2", "block_3"]);

    let menu = &dialog.children[2];
    assert_eq!(menu.depth, 1);
    assert_eq!(menu.children.len(), 2);
    let option = &menu.children[1];
    assert_eq!(option.block_type, BlockType::Container(ContainerKind::Option));

    let condition = &option.children[0];
    assert_eq!(condition.depth, 3);
    assert_eq!(condition.else_index(), Some(1));
    let (main, other) = condition.branches();
    assert_eq!(main.len(), 1);
    assert_eq!(other.len(), 2);
    assert_eq!(other[1].depth, 4);
}

#[test]
fn mismatched_closer_is_dropped() {
    let commands = parse_body("MENU\nOPT \"a\"\nEND_OF_IF\nEND_OF_OPT\nEND_OF_MENU\n");
    let blocks = build(&commands);
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].closed);
    assert_eq!(blocks[0].children.len(), 1);
    assert!(blocks[0].children[0].closed);
}

#[test]
fn closer_without_opener_is_dropped() {
    let blocks = build(&parse_body("Say \"a\"\nEND_OF_MENU\nSay \"b\"\n"));
    assert_eq!(ids(&blocks), vec!["block_0", "block_2"]);
}

#[test]
fn unclosed_containers_stay_open() {
    let blocks = build(&parse_body("ShowDlgScene\nIF x\nSay \"a\"\n"));
    assert_eq!(blocks.len(), 1);
    assert!(!blocks[0].closed);
    assert!(!blocks[0].children[0].closed);
    assert_eq!(blocks[0].children[0].children.len(), 1);
}

#[test]
fn stray_and_repeated_else_are_ignored() {
    let blocks = build(&parse_body(
        "ELSE\nMENU\nELSE\nEND_OF_MENU\n\
         IF x\nSay \"a\"\nELSE\nSay \"b\"\nELSE\nSay \"c\"\nEND_OF_IF\n",
    ));
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].condition(), None);
    assert_eq!(blocks[1].else_index(), Some(1));
    assert_eq!(blocks[1].children.len(), 3);
}

#[test]
fn build_script_prefixes_ids_with_script_name() {
    let mut script = ParsedScript::new("intro", "f.txt", "EN");
    script.commands = parse_body("Say \"a\"\nAsk \"b\"\n");
    let blocks = build_script(&script);
    assert_eq!(ids(&blocks), vec!["intro_block_0", "intro_block_1"]);
}

#[test]
fn locate_reports_branch_and_siblings() {
    let blocks = build(&parse_body(NESTED));
    let location = locate(&blocks, &BlockId::from("block_12")).unwrap();
    assert_eq!(location.branch, Branch::Else);
    assert_eq!(location.index, 1);
    assert_eq!(location.previous().unwrap().id.as_str(), "block_11");
    assert_eq!(location.parent.unwrap().id.as_str(), "block_8");

    let root = locate(&blocks, &BlockId::from("block_0")).unwrap();
    assert!(root.parent.is_none());
    assert!(locate(&blocks, &BlockId::from("missing")).is_none());
}

#[test]
fn serialize_preserves_command_sequence() {
    let commands = parse_body(NESTED);
    let blocks = build(&commands);
    let text = serialize(&blocks);
    let reparsed = parse_body(&text);
    assert_eq!(types(&reparsed), types(&commands));
    assert_eq!(types(&flatten(&blocks)), types(&commands));
    assert!(text.contains("\n        Say \"Again?\"\n      ELSE\n"));
}

#[test]
fn flatten_sourced_keeps_block_ids_and_lines() {
    let blocks = build(&parse_body("Say \"a\"\nIF x\nSay \"b\"\nEND_OF_IF\n"));
    let sequence = flatten_sourced(&blocks[1..]);
    let cited: Vec<(&str, usize)> = sequence
        .iter()
        .map(|(id, command)| (id.as_str(), command.line))
        .collect();
    assert_eq!(cited, vec![("block_1", 2), ("block_2", 3), ("block_1", 4)]);
    assert_eq!(sequence[2].1.command_type(), CommandType::ConditionEnd);
}

#[test]
fn serialize_keeps_unclosed_containers_unclosed() {
    let commands = parse_body("IF x\nSay \"a\"\n");
    let text = serialize(&build(&commands));
    assert_eq!(text, "IF x\n  Say \"a\"\n");
}

#[test]
fn serialize_script_wraps_body() {
    let blocks = build(&parse_body("Say \"a\""));
    assert_eq!(serialize_script("s", &blocks), "SCRIPT s\n  Say \"a\"\nEND_OF_SCRIPT\n");
}

fn say(id: &str, text: &str) -> Block {
    Block::from_command(
        id,
        Command::from_kind(CommandKind::Dialogue {
            text: text.to_string(),
        }),
    )
}

fn condition_forest() -> Vec<Block> {
    build(&parse_body("IF x\nSay \"a\"\nELSE\nSay \"b\"\nEND_OF_IF\n"))
}

#[test]
fn insert_into_if_section_shifts_else_index() {
    let forest = condition_forest();
    let edited = apply_edit(
        &forest,
        &Edit::Insert {
            slot: Slot::inside("block_0"),
            index: 1,
            block: say("new", "n"),
        },
    )
    .unwrap();

    let condition = &edited[0];
    assert_eq!(condition.else_index(), Some(2));
    assert_eq!(ids(&condition.children), vec!["block_1", "new", "block_3"]);
    assert_eq!(condition.children[1].depth, 1);
    assert_eq!(forest[0].children.len(), 2);
}

#[test]
fn insert_into_else_section_keeps_else_index() {
    let forest = condition_forest();
    let edited = apply_edit(
        &forest,
        &Edit::Insert {
            slot: Slot::else_of("block_0"),
            index: 0,
            block: say("new", "n"),
        },
    )
    .unwrap();
    assert_eq!(edited[0].else_index(), Some(1));
    assert_eq!(ids(edited[0].branch(Branch::Else)), vec!["new", "block_3"]);
}

#[test]
fn remove_from_if_section_shifts_else_index() {
    let forest = condition_forest();
    let edited = apply_edit(&forest, &Edit::Remove { id: "block_1".into() }).unwrap();
    assert_eq!(edited[0].else_index(), Some(0));
    assert_eq!(ids(&edited[0].children), vec!["block_3"]);
}

#[test]
fn set_else_rejects_out_of_range_index() {
    let forest = condition_forest();
    let err = apply_edit(
        &forest,
        &Edit::SetElse {
            id: "block_0".into(),
            else_index: Some(3),
        },
    )
    .unwrap_err();
    assert!(matches!(err, EditError::ElseIndexOutOfBounds { index: 3, len: 2, .. }));

    let edited = apply_edit(
        &forest,
        &Edit::SetElse {
            id: "block_0".into(),
            else_index: Some(2),
        },
    )
    .unwrap();
    assert_eq!(edited[0].else_index(), Some(2));
}

#[test]
fn replace_command_keeps_children_and_else() {
    let forest = condition_forest();
    let command = Command::from_kind(CommandKind::ConditionStartNot {
        condition: "y".to_string(),
    });
    let edited = apply_edit(
        &forest,
        &Edit::ReplaceCommand {
            id: "block_0".into(),
            command,
        },
    )
    .unwrap();
    let meta = edited[0].condition().unwrap();
    assert!(meta.is_not);
    assert_eq!(meta.condition, "y");
    assert_eq!(meta.else_index, Some(1));
    assert_eq!(edited[0].children.len(), 2);
}

#[test]
fn replace_command_rejects_kind_change() {
    let forest = condition_forest();
    let err = apply_edit(
        &forest,
        &Edit::ReplaceCommand {
            id: "block_1".into(),
            command: Command::from_kind(CommandKind::MenuStart),
        },
    )
    .unwrap_err();
    assert!(matches!(err, EditError::KindMismatch { .. }));

    let err = apply_edit(
        &forest,
        &Edit::ReplaceCommand {
            id: "block_1".into(),
            command: Command::from_kind(CommandKind::ConditionEnd),
        },
    )
    .unwrap_err();
    assert!(matches!(err, EditError::StructuralMarker { .. }));
}

#[test]
fn move_between_sections() {
    let forest = condition_forest();
    let edited = apply_edit(
        &forest,
        &Edit::Move {
            id: "block_3".into(),
            slot: Slot::Root,
            index: 1,
        },
    )
    .unwrap();
    assert_eq!(ids(&edited), vec!["block_0", "block_3"]);
    assert_eq!(edited[1].depth, 0);
    assert_eq!(edited[0].else_index(), Some(1));
    assert!(edited[0].branch(Branch::Else).is_empty());
}

#[test]
fn move_into_own_subtree_is_rejected() {
    let forest = condition_forest();
    let err = apply_edit(
        &forest,
        &Edit::Move {
            id: "block_0".into(),
            slot: Slot::inside("block_0"),
            index: 0,
        },
    )
    .unwrap_err();
    assert!(matches!(err, EditError::MoveIntoSelf { .. }));
}

#[test]
fn insert_rejects_duplicate_ids_and_bad_slots() {
    let forest = condition_forest();
    let err = apply_edit(
        &forest,
        &Edit::Insert {
            slot: Slot::Root,
            index: 0,
            block: say("block_1", "dup"),
        },
    )
    .unwrap_err();
    assert!(matches!(err, EditError::DuplicateId { .. }));

    let err = apply_edit(
        &forest,
        &Edit::Insert {
            slot: Slot::inside("block_1"),
            index: 0,
            block: say("new", "n"),
        },
    )
    .unwrap_err();
    assert!(matches!(err, EditError::NotAContainer { .. }));

    let err = apply_edit(
        &forest,
        &Edit::Insert {
            slot: Slot::Root,
            index: 5,
            block: say("new", "n"),
        },
    )
    .unwrap_err();
    assert!(matches!(err, EditError::IndexOutOfBounds { index: 5, len: 1 }));
}

#[test]
fn fresh_id_skips_used_ids() {
    let forest = condition_forest();
    let id = fresh_id(&forest, "block");
    assert!(locate(&forest, &id).is_none());
    assert_eq!(id.as_str(), "block_4");
}
