/// Command-line surface of the bookmark host.
///
/// Line and column numbers are 1-based here and converted to the 0-based
/// values used by the store while parsing.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use line_marks_core::Position;

/// Line bookmarks that follow their content through edits.
#[derive(Parser, Debug)]
#[command(name = "line-marks", version, about)]
pub struct Cli {
    /// Config file (defaults to line-marks.json next to the executable).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// State database (overrides the config's state_file).
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Toggle bookmarks, one cursor per LINE, or clear those inside --span.
    Toggle {
        file: PathBuf,
        #[arg(value_parser = parse_line, required_unless_present = "span")]
        lines: Vec<usize>,
        /// A selection FROM-TO; marks inside it are cleared, else TO is marked.
        #[arg(long, value_parser = parse_span, conflicts_with = "lines")]
        span: Option<(usize, usize)>,
    },
    /// Remove bookmarks and their notes.
    Remove {
        file: PathBuf,
        #[arg(value_parser = parse_line, required = true)]
        lines: Vec<usize>,
    },
    /// List bookmarks of one file, or of every file.
    List { file: Option<PathBuf> },
    /// Print the next bookmarked line after LINE.
    Next {
        file: PathBuf,
        #[arg(value_parser = parse_line)]
        line: usize,
    },
    /// Print the previous bookmarked line before LINE.
    Prev {
        file: PathBuf,
        #[arg(value_parser = parse_line)]
        line: usize,
    },
    /// Show, set, or (with an empty TEXT) delete the note of a bookmark.
    Note {
        file: PathBuf,
        #[arg(value_parser = parse_line)]
        line: usize,
        text: Option<String>,
    },
    /// Remove every bookmark of a file.
    Clear { file: PathBuf },
    /// Remove every bookmark of every file.
    ClearAll,
    /// Report a text edit so bookmarks follow their lines.
    Edit {
        file: PathBuf,
        /// Start of the replaced text, LINE[:COL].
        #[arg(long, value_parser = parse_position)]
        start: Position,
        /// End of the replaced text, LINE[:COL]. Defaults to --start.
        #[arg(long, value_parser = parse_position)]
        end: Option<Position>,
        /// Replacement text.
        #[arg(long, default_value = "")]
        text: String,
    },
}

fn parse_one_based(s: &str, what: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid {what} '{s}': {e}"))?;
    n.checked_sub(1)
        .ok_or_else(|| format!("{what} numbers start at 1"))
}

/// Parses a 1-based line number.
pub fn parse_line(s: &str) -> Result<usize, String> {
    parse_one_based(s, "line")
}

/// Parses `LINE[:COL]`, both 1-based.
pub fn parse_position(s: &str) -> Result<Position, String> {
    match s.split_once(':') {
        Some((line, col)) => Ok(Position::new(
            parse_one_based(line, "line")?,
            parse_one_based(col, "column")?,
        )),
        None => Ok(Position::new(parse_one_based(s, "line")?, 0)),
    }
}

/// Parses `FROM-TO` line numbers.
pub fn parse_span(s: &str) -> Result<(usize, usize), String> {
    let (from, to) = s
        .split_once('-')
        .ok_or_else(|| format!("expected FROM-TO, got '{s}'"))?;
    Ok((parse_line(from)?, parse_line(to)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_line_is_one_based() {
        assert_eq!(parse_line("1"), Ok(0));
        assert_eq!(parse_line(" 42 "), Ok(41));
        assert!(parse_line("0").is_err());
        assert!(parse_line("-3").is_err());
        assert!(parse_line("abc").is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("7"), Ok(Position::new(6, 0)));
        assert_eq!(parse_position("7:5"), Ok(Position::new(6, 4)));
        assert!(parse_position("7:0").is_err());
        assert!(parse_position(":3").is_err());
    }

    #[test]
    fn test_parse_span() {
        assert_eq!(parse_span("3-8"), Ok((2, 7)));
        assert!(parse_span("3").is_err());
        assert!(parse_span("3-x").is_err());
    }

    #[test]
    fn test_parse_toggle_lines() {
        let cli = Cli::parse_from(["line-marks", "toggle", "src/main.rs", "3", "10"]);
        match cli.command {
            Command::Toggle { file, lines, span } => {
                assert_eq!(file, PathBuf::from("src/main.rs"));
                assert_eq!(lines, vec![2, 9]);
                assert!(span.is_none());
            }
            other => panic!("expected Toggle, got {other:?}"),
        }
    }

    #[test]
    fn test_toggle_needs_lines_or_span() {
        assert!(Cli::try_parse_from(["line-marks", "toggle", "a.rs"]).is_err());
        assert!(Cli::try_parse_from(["line-marks", "toggle", "a.rs", "--span", "2-4"]).is_ok());
        assert!(
            Cli::try_parse_from(["line-marks", "toggle", "a.rs", "1", "--span", "2-4"]).is_err()
        );
    }

    #[test]
    fn test_parse_edit_with_global_state() {
        let cli = Cli::parse_from([
            "line-marks",
            "edit",
            "a.rs",
            "--start",
            "7:1",
            "--end",
            "10:1",
            "--state",
            "/tmp/s.redb",
        ]);
        assert_eq!(cli.state, Some(PathBuf::from("/tmp/s.redb")));
        match cli.command {
            Command::Edit {
                start, end, text, ..
            } => {
                assert_eq!(start, Position::new(6, 0));
                assert_eq!(end, Some(Position::new(9, 0)));
                assert_eq!(text, "");
            }
            other => panic!("expected Edit, got {other:?}"),
        }
    }
}
