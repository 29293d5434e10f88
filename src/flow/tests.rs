use super::*;
use crate::parser::parse_body;
use crate::tree::{self, Edit, Slot, apply_edit};
use crate::types::command::Command;

fn forest(text: &str) -> Vec<Block> {
    tree::build(&parse_body(text))
}

fn seed() -> FlowSeed {
    FlowSeed::new()
        .with_character("tutor", "tutor.png")
        .with_semaforo("met_tutor")
        .with_variable("score")
}

const SCENE: &str = r#"
ShowDlgScene
  ShowChar tutor center
  Say "Hi"
  ChangeChar tutor tutor_smile.png
  SET met_tutor
  SET_TO score 7
  HideChar tutor
HideDlgScene
"#;

#[test]
fn stop_excludes_target_effect() {
    let blocks = forest(SCENE);

    let before_show = state_at(&blocks, &"block_1".into(), &seed());
    assert!(before_show.reached_target);
    assert!(!before_show.is_shown("tutor"));

    let before_hide = state_at(&blocks, &"block_6".into(), &seed());
    assert!(before_hide.is_shown("tutor"));
    assert_eq!(before_hide.characters["tutor"].current_image, "tutor_smile.png");
    assert_eq!(before_hide.characters["tutor"].base_image, "tutor.png");
    assert!(before_hide.semaforo("met_tutor"));
    assert_eq!(before_hide.variables["score"], VarValue::Number(7));

    let end = final_state(&blocks, &seed());
    assert!(!end.reached_target);
    assert!(!end.is_shown("tutor"));
}

#[test]
fn unknown_target_replays_everything() {
    let blocks = forest(SCENE);
    let state = state_at(&blocks, &"nowhere".into(), &seed());
    assert!(!state.reached_target);
    assert_eq!(state, final_state(&blocks, &seed()));
}

#[test]
fn show_adds_characters_missing_from_seed() {
    let blocks = forest("ShowChar pilot left pilot.png\n");
    let state = final_state(&blocks, &FlowSeed::new());
    assert!(state.is_shown("pilot"));
    assert_eq!(state.characters["pilot"].current_image, "pilot.png");
    assert_eq!(state.visible_characters().collect::<Vec<_>>(), vec!["pilot"]);
}

#[test]
fn change_adds_hidden_characters_missing_from_seed() {
    let blocks = forest("ChangeChar pilot pilot_sad.png\n");
    let state = final_state(&blocks, &FlowSeed::new());
    let pilot = &state.characters["pilot"];
    assert!(!pilot.is_shown);
    assert_eq!(pilot.current_image, "pilot_sad.png");
    assert_eq!(pilot.base_image, "");
}

#[test]
fn stop_inside_nested_container_halts_everything_after() {
    let blocks = forest(
        "IF met_tutor\n  SET a\n  SET b\nELSE\n  SET c\nEND_OF_IF\nSET d\n",
    );
    let state = state_at(&blocks, &"block_2".into(), &FlowSeed::new());
    assert_eq!(state.semafori.get("a"), Some(&true));
    assert!(!state.semafori.contains_key("b"));
    assert!(!state.semafori.contains_key("c"));
    assert!(!state.semafori.contains_key("d"));
}

#[test]
fn replay_walks_both_condition_sections() {
    let blocks = forest("IF x\n  SET a\nELSE\n  SET b\nEND_OF_IF\n");
    let state = final_state(&blocks, &FlowSeed::new());
    assert!(state.semaforo("a"));
    assert!(state.semaforo("b"));
}

#[test]
fn last_ask_is_scoped_per_branch() {
    let blocks = forest(
        r#"
Ask "Outer?"
IF x
  Say "inside"
  Ask "Inner?"
  Say "after inner"
ELSE
  Say "else"
END_OF_IF
Say "tail"
"#,
    );

    let inside = state_at(&blocks, &"block_2".into(), &FlowSeed::new());
    assert_eq!(inside.last_ask_block_id, None);

    let after_inner = state_at(&blocks, &"block_4".into(), &FlowSeed::new());
    assert_eq!(after_inner.last_ask_block_id, Some(BlockId::from("block_3")));

    let in_else = state_at(&blocks, &"block_6".into(), &FlowSeed::new());
    assert_eq!(in_else.last_ask_block_id, None);

    let tail = state_at(&blocks, &"block_8".into(), &FlowSeed::new());
    assert_eq!(tail.last_ask_block_id, Some(BlockId::from("block_0")));
}

#[test]
fn dialog_body_shares_enclosing_ask_scope() {
    let blocks = forest("Ask \"q\"\nShowDlgScene\n  MENU\n  END_OF_MENU\nHideDlgScene\n");
    let state = state_at(&blocks, &"block_2".into(), &FlowSeed::new());
    assert_eq!(state.last_ask_block_id, Some(BlockId::from("block_0")));
}

#[test]
fn trailing_insert_does_not_change_state() {
    let blocks = forest(SCENE);
    let target = BlockId::from("block_4");
    let before = state_at(&blocks, &target, &seed());

    let extra = Block::from_command(
        "extra",
        Command::from_kind(CommandKind::VariableReset {
            variable: "met_tutor".to_string(),
        }),
    );
    let edited = apply_edit(
        &blocks,
        &Edit::Insert {
            slot: Slot::inside("block_0"),
            index: 4,
            block: extra,
        },
    )
    .unwrap();

    assert_eq!(state_at(&edited, &target, &seed()), before);
    assert_ne!(final_state(&edited, &seed()), final_state(&blocks, &seed()));
}
