//! Line commands read from stdin.
//!
//! The binary is headless; these commands stand in for a presenter's
//! clicks so the selection and configuration surface can be driven by
//! hand or from a script.

use std::path::PathBuf;

/// A command typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// `list` — print every row.
    List,
    /// `toggle ROW` — flip the selection of a row.
    Toggle(usize),
    /// `all` — select every row.
    SelectAll,
    /// `clear` — deselect every row.
    Clear,
    /// `single on|off` — change the selection policy.
    Single(bool),
    /// `filters PREFIX...` — replace the type filters.
    Filters(Vec<String>),
    /// `folders DIR...` — replace the watched folders.
    Folders(Vec<PathBuf>),
    /// `quit` — exit.
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a human-readable message for unknown commands or bad arguments.
pub fn parse_command(line: &str) -> Result<Option<InputCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match head {
        "list" | "ls" => InputCommand::List,
        "toggle" | "t" => {
            let row = rest
                .first()
                .ok_or_else(|| "toggle needs a row number".to_string())?;
            let row = row
                .parse::<usize>()
                .map_err(|_| format!("not a row number: {row}"))?;
            InputCommand::Toggle(row)
        }
        "all" => InputCommand::SelectAll,
        "clear" => InputCommand::Clear,
        "single" => match rest.first().copied() {
            Some("on") | Some("true") => InputCommand::Single(true),
            Some("off") | Some("false") => InputCommand::Single(false),
            _ => return Err("usage: single on|off".to_string()),
        },
        "filters" => InputCommand::Filters(rest.iter().map(|s| s.to_string()).collect()),
        "folders" => InputCommand::Folders(rest.iter().map(PathBuf::from).collect()),
        "quit" | "q" | "exit" => InputCommand::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_none() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn toggle_parses_row() {
        assert_eq!(parse_command("toggle 3"), Ok(Some(InputCommand::Toggle(3))));
        assert_eq!(parse_command("t 0"), Ok(Some(InputCommand::Toggle(0))));
    }

    #[test]
    fn toggle_requires_number() {
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("toggle x").is_err());
    }

    #[test]
    fn single_on_off() {
        assert_eq!(parse_command("single on"), Ok(Some(InputCommand::Single(true))));
        assert_eq!(parse_command("single off"), Ok(Some(InputCommand::Single(false))));
        assert!(parse_command("single maybe").is_err());
    }

    #[test]
    fn filters_and_folders_take_lists() {
        assert_eq!(
            parse_command("filters image/ video/"),
            Ok(Some(InputCommand::Filters(vec![
                "image/".to_string(),
                "video/".to_string()
            ])))
        );
        assert_eq!(
            parse_command("filters"),
            Ok(Some(InputCommand::Filters(vec![])))
        );
        assert_eq!(
            parse_command("folders /a /b"),
            Ok(Some(InputCommand::Folders(vec![
                PathBuf::from("/a"),
                PathBuf::from("/b")
            ])))
        );
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("list"), Ok(Some(InputCommand::List)));
        assert_eq!(parse_command("all"), Ok(Some(InputCommand::SelectAll)));
        assert_eq!(parse_command("clear"), Ok(Some(InputCommand::Clear)));
        assert_eq!(parse_command("quit"), Ok(Some(InputCommand::Quit)));
    }

    #[test]
    fn unknown_command_is_error() {
        assert_eq!(
            parse_command("delete 1"),
            Err("unknown command: delete".to_string())
        );
    }
}
