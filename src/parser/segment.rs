//! Splits a campaign file into named scripts

use crate::analysis::metadata::MetadataCollector;
use crate::types::command::Command;
use crate::types::script::ParsedScript;

use super::{is_skippable, parse_line};

/// Split `source` into the scripts it defines.
///
/// `SCRIPT <name>` opens a script and `END_OF_SCRIPT` closes it. Lines outside
/// any script are ignored. A script still open when the next `SCRIPT` starts,
/// or when the file ends, is finalized as if it had been closed.
pub fn segment(source: &str, file_name: &str, language: &str) -> Vec<ParsedScript> {
    let mut scripts = Vec::new();
    let mut current: Option<OpenScript> = None;

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if is_skippable(trimmed) {
            continue;
        }

        let upper = trimmed.to_ascii_uppercase();
        if let Some(name) = script_header(&upper, trimmed) {
            if let Some(open) = current.take() {
                log::warn!(
                    "{file_name}:{line_number}: script '{}' not closed before SCRIPT {name}",
                    open.script.name
                );
                scripts.push(open.finish());
            }
            log::trace!("{file_name}:{line_number}: opening script '{name}'");
            current = Some(OpenScript::new(name, file_name, language));
            continue;
        }

        if upper == "END_OF_SCRIPT" {
            match current.take() {
                Some(open) => scripts.push(open.finish()),
                None => log::debug!("{file_name}:{line_number}: END_OF_SCRIPT outside a script"),
            }
            continue;
        }

        if upper == "SCRIPTS" {
            continue;
        }

        if let Some(open) = current.as_mut() {
            open.push(parse_line(trimmed, line_number));
        }
    }

    if let Some(open) = current {
        log::warn!(
            "{file_name}: script '{}' still open at end of file",
            open.script.name
        );
        scripts.push(open.finish());
    }

    log::debug!("{file_name}: segmented {} scripts", scripts.len());
    scripts
}

fn script_header<'a>(upper: &str, trimmed: &'a str) -> Option<&'a str> {
    let tail = upper.strip_prefix("SCRIPT")?;
    if !tail.starts_with(char::is_whitespace) {
        return None;
    }
    let name = trimmed["SCRIPT".len()..].trim();
    (!name.is_empty()).then_some(name)
}

struct OpenScript {
    script: ParsedScript,
    collector: MetadataCollector,
}

impl OpenScript {
    fn new(name: &str, file_name: &str, language: &str) -> Self {
        Self {
            script: ParsedScript::new(name, file_name, language),
            collector: MetadataCollector::new(),
        }
    }

    fn push(&mut self, command: Command) {
        self.collector.push(&command);
        self.script.commands.push(command);
    }

    fn finish(self) -> ParsedScript {
        self.collector.finish(self.script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::command::CommandType;

    #[test]
    fn segments_named_scripts() {
        let source = r#"
SCRIPTS

SCRIPT intro
  ShowDlgScene
  Say "Welcome"
  HideDlgScene
END_OF_SCRIPT

// between scripts
Say "ignored"

SCRIPT second
  SUB_SCRIPT intro
END_OF_SCRIPT
"#;
        let scripts = segment(source, "campaign.txt", "EN");
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].name, "intro");
        assert_eq!(scripts[0].commands.len(), 3);
        assert_eq!(scripts[0].commands[1].command_type(), CommandType::Dialogue);
        assert_eq!(scripts[0].commands[1].line, 6);
        assert_eq!(scripts[1].name, "second");
        assert!(scripts[1].sub_scripts.contains("intro"));
        assert_eq!(scripts[1].file_name, "campaign.txt");
        assert_eq!(scripts[1].language, "EN");
    }

    #[test]
    fn unclosed_script_is_finalized_by_next_header() {
        let source = "SCRIPT a\nSET flag\nSCRIPT b\nRESET flag\nEND_OF_SCRIPT\n";
        let scripts = segment(source, "f.txt", "EN");
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].name, "a");
        assert!(scripts[0].semafori.contains("flag"));
        assert_eq!(scripts[1].commands.len(), 1);
    }

    #[test]
    fn unclosed_script_is_finalized_at_end_of_file() {
        let scripts = segment("SCRIPT tail\nSay \"x\"\n", "f.txt", "EN");
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].commands.len(), 1);
    }

    #[test]
    fn script_keyword_needs_a_name() {
        let scripts = segment("SCRIPTS\nSCRIPT\nSay \"x\"\n", "f.txt", "EN");
        assert!(scripts.is_empty());
    }
}
