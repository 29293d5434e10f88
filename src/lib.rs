//! # campaign-flow
//!
//! Static analysis for line-oriented campaign scripts: dialog scenes,
//! choice menus, conditions and variable updates that drive a game's
//! story. Scripts are tokenized into typed commands, nested into a block
//! tree, replayed to reconstruct the world state at any block, and
//! validated so an editor can tell which blocks are broken and what may
//! be inserted where.
//!
//! ## Quick Start
//!
//! ```rust
//! use campaign_flow::{analysis, flow, parser, validation};
//! use campaign_flow::types::{BlockId, FlowSeed};
//! use campaign_flow::validation::{KnownNames, ValidationConfig};
//!
//! let source = r#"
//! SCRIPT intro
//!   ShowDlgScene
//!   ShowChar tutor center
//!   Say "Welcome aboard."
//!   Ask "Ready?"
//!   MENU
//!     OPT "Yes"
//!       SET ready
//!     END_OF_OPT
//!   END_OF_MENU
//!   HideDlgScene
//! END_OF_SCRIPT
//! "#;
//!
//! let campaign = analysis::analyze(parser::segment(source, "scripts.txt", "EN"));
//! let blocks = campaign.blocks("intro").unwrap();
//!
//! // State right before the dialogue line: the tutor is already on screen.
//! let state = flow::state_at(blocks, &BlockId::from("intro_block_2"), &FlowSeed::from(&campaign));
//! assert!(state.is_shown("tutor"));
//!
//! let report = validation::validate_parsed(
//!     campaign.script("intro").unwrap(),
//!     &KnownNames::from(&campaign),
//!     &ValidationConfig::default(),
//! );
//! assert!(report.is_clean());
//! ```

pub mod analysis;
pub mod cli;
pub mod debug;
pub mod error;
pub mod flow;
pub mod parser;
pub mod tree;
pub mod types;
pub mod validation;

pub use analysis::{AnalysisConfig, CampaignAnalysis, analyze, analyze_sources};
pub use error::{ConfigError, EditError};
pub use flow::{StopAt, compute_flow_state, final_state, state_at};
pub use parser::{parse_line, segment};
pub use tree::{Edit, Slot, apply_edit, serialize};
pub use types::{
    Block, BlockId, Command, CommandKind, CommandType, FlowSeed, FlowState, ParsedScript,
};
pub use validation::{KnownNames, ScriptReport, ValidationConfig, validate_parsed, validate_script};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_replay_validate() {
        let scripts = segment(
            "SCRIPT s\nShowDlgScene\nShowChar hero left\nHideChar hero\n\
             ChangeChar hero sad.png\nHideDlgScene\nEND_OF_SCRIPT\n",
            "s.txt",
            "EN",
        );
        let campaign = analyze(scripts);
        let blocks = campaign.blocks("s").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].children.len(), 3);

        let state = final_state(blocks, &FlowSeed::from(&campaign));
        assert!(!state.is_shown("hero"));
        assert_eq!(state.characters["hero"].current_image, "sad.png");

        let report = validate_parsed(
            campaign.script("s").unwrap(),
            &KnownNames::from(&campaign),
            &ValidationConfig::default(),
        );
        assert_eq!(report.error_count, 1);
        assert!(!report.blocks[3].is_valid());
    }
}
