use campaign_flow::analysis::{AnalysisConfig, analyze_sources};
use campaign_flow::tree::{self, Edit, Slot, apply_edit};
use campaign_flow::types::{
    Block, BlockId, BlockType, CommandKind, CommandType, ContainerKind, FlowSeed, SourceFile,
};
use campaign_flow::validation::{
    IssueCode, KnownNames, ValidationConfig, validate_forest, validate_parsed,
};
use campaign_flow::{StopAt, compute_flow_state, final_state, parse_line};

const CAMPAIGN: &str = r#"
SCRIPTS

SCRIPT intro
  ShowDlgScene
    ShowChar tutor center tutor_base.png
    Say "Welcome, commander."
    Ask "Shall we start?"
    MENU
      OPT "Yes"
        SET ready
        SUB_SCRIPT briefing
      END_OF_OPT
      OPT_IFNOT ready "Later"
        GO wait_here
      END_OF_OPT
    END_OF_MENU
    HideChar tutor
  HideDlgScene
END_OF_SCRIPT

SCRIPT briefing
  SET_TO attempts 1
  IF_MIN attempts 2
    Announce "Back again"
  ELSE
    ShowDlgScene
      ShowChar tutor left tutor_smile.png
    HideDlgScene
  END_OF_IF
  ShowNode mars
  ACT_MISSION mission_mars
END_OF_SCRIPT

SCRIPT waiting
  LABEL wait_here
  ShowDlgScene
    Say "Take your time."
  HideDlgScene
END_OF_SCRIPT
"#;

fn campaign() -> campaign_flow::CampaignAnalysis {
    analyze_sources(
        &[
            SourceFile::new("missions_EN.txt", "EN", CAMPAIGN),
            SourceFile::new(
                "missions_IT.txt",
                "IT",
                "SCRIPT intro\nSay \"Benvenuto\"\nEND_OF_SCRIPT\n",
            ),
        ],
        &AnalysisConfig::default(),
    )
}

/// The whole campaign segments into three scripts of the primary language.
#[test]
fn analyze_campaign_file() {
    let analysis = campaign();
    assert_eq!(analysis.scripts.len(), 3);
    assert_eq!(analysis.script("intro").unwrap().file_name, "missions_EN.txt");

    assert!(analysis.characters.contains("tutor"));
    assert!(analysis.semafori.contains("ready"));
    assert!(analysis.real_variables.contains("attempts"));
    assert!(analysis.missions.contains("mission_mars"));
    assert!(analysis.variable_conflicts.is_empty());

    let connected: Vec<&str> = analysis
        .connected_scripts("intro")
        .iter()
        .map(|script| script.name.as_str())
        .collect();
    assert_eq!(connected, vec!["briefing", "waiting"]);
    assert!(analysis.related_scripts_for_node("mars").contains("waiting"));
}

/// The intro tree nests the menu inside the dialog scene.
#[test]
fn intro_tree_shape() {
    let analysis = campaign();
    let blocks = analysis.blocks("intro").unwrap();
    assert_eq!(blocks.len(), 1);

    let dialog = &blocks[0];
    assert_eq!(dialog.block_type, BlockType::Container(ContainerKind::Dialog));
    let types: Vec<BlockType> = dialog.children.iter().map(|block| block.block_type).collect();
    assert_eq!(
        types,
        vec![
            BlockType::Command(CommandType::ShowCharacter),
            BlockType::Command(CommandType::Dialogue),
            BlockType::Command(CommandType::Question),
            BlockType::Container(ContainerKind::Menu),
            BlockType::Command(CommandType::HideCharacter),
        ]
    );
    let menu = &dialog.children[3];
    assert_eq!(menu.children.len(), 2);
    assert!(menu.children.iter().all(|option| option.depth == 2));
}

/// Replay through a menu and a condition with both sections.
#[test]
fn replay_campaign_scripts() {
    let analysis = campaign();
    let seed = FlowSeed::from(&analysis);

    let intro = analysis.blocks("intro").unwrap();
    let hide = StopAt::Block(BlockId::from("intro_block_13"));
    let before_hide = compute_flow_state(intro, &hide, &seed);
    assert!(before_hide.reached_target);
    assert!(before_hide.is_shown("tutor"));
    assert!(before_hide.semaforo("ready"));
    assert_eq!(before_hide.characters["tutor"].current_image, "tutor_base.png");

    let end = final_state(intro, &seed);
    assert!(!end.is_shown("tutor"));
    assert!(!end.reached_target);

    let briefing = analysis.blocks("briefing").unwrap();
    let end = final_state(briefing, &seed);
    assert_eq!(end.variables["attempts"].to_string(), "1");
    assert!(end.is_shown("tutor"));
    assert_eq!(end.characters["tutor"].current_image, "tutor_smile.png");
}

/// The well-formed campaign validates cleanly; an edit can break it.
#[test]
fn validate_and_edit_campaign() {
    let analysis = campaign();
    let known = KnownNames::from(&analysis);
    let config = ValidationConfig::default();

    for script in &analysis.scripts {
        let report = validate_parsed(script, &known, &config);
        assert!(report.is_clean(), "{}: {:?}", script.name, report.issues().collect::<Vec<_>>());
    }

    let blocks = analysis.blocks("intro").unwrap();
    let edited = apply_edit(
        blocks,
        &Edit::Remove {
            id: BlockId::from("intro_block_3"),
        },
    )
    .unwrap();
    let report = validate_forest("intro", &edited, &known, &config);
    let menu = report.block(&BlockId::from("intro_block_4")).unwrap();
    assert_eq!(menu.errors.len(), 1);
    assert_eq!(menu.errors[0].code, IssueCode::MenuNeedsAsk);
    assert!(!menu.can_insert_before.contains(&CommandType::MenuStart));

    let edited = apply_edit(
        &edited,
        &Edit::Insert {
            slot: Slot::inside("intro_block_0"),
            index: 2,
            block: Block::from_command("intro_block_99", parse_line("Ask \"Ready?\"", 0)),
        },
    )
    .unwrap();
    assert!(validate_forest("intro", &edited, &known, &config).is_clean());
}

/// Serializing a forest yields source that parses back to the same commands.
#[test]
fn serialized_script_reparses() {
    let analysis = campaign();
    let blocks = analysis.blocks("briefing").unwrap();
    let text = tree::serialize_script("briefing", blocks);
    assert!(text.starts_with("SCRIPT briefing\n"));

    let reparsed = campaign_flow::segment(&text, "round.txt", "EN");
    assert_eq!(reparsed.len(), 1);
    let command_types = |script: &campaign_flow::ParsedScript| -> Vec<CommandType> {
        script.commands.iter().map(|command| command.command_type()).collect()
    };
    let original = command_types(analysis.script("briefing").unwrap());
    let again = command_types(&reparsed[0]);
    assert_eq!(again, original);
    assert!(matches!(
        &reparsed[0].commands[0].kind,
        CommandKind::VariableSetTo { variable, value } if variable == "attempts" && value == "1"
    ));
}

/// Config files are partial JSON layered over the defaults.
#[test]
fn partial_validation_config() {
    let json = r#"{ "rules": { "menu_prerequisites": false } }"#;
    let config = ValidationConfig::from_json_str(json).unwrap();
    assert!(!config.rules.menu_prerequisites);
    assert!(config.rules.ask_consecutive);
    assert!(ValidationConfig::from_json_str("{ not json").is_err());
}
