//! Interactive exploration session.
//!
//! The dataset is loaded once; every input line updates the [`ViewState`] and
//! the whole current view is recomputed and rendered again.

use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

use crate::dashboard::{self, Mode, Report, ViewState};
use crate::record::Dataset;

pub const USAGE: &str = "\
commands:
  mode <lines|stations|trend>  switch the analysis view
  search [text]                set (or clear) the search box
  line <name>                  pick the line for the trend view
  lines                        list selectable line names
  help                         show this message
  quit                         leave the session";

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(Mode),
    Search(Option<String>),
    Line(String),
    ListLines,
    Help,
    Quit,
}

/// Parses a command line. Arguments are taken verbatim after the first
/// whitespace following the command word.
pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim_end_matches(['\r', '\n']).trim_start();
    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (input, ""),
    };

    match word {
        "mode" => Ok(Command::Mode(rest.parse()?)),
        "search" => Ok(Command::Search(Some(rest.to_string()).filter(|s| !s.is_empty()))),
        "line" if !rest.trim().is_empty() => Ok(Command::Line(rest.trim().to_string())),
        "line" => bail!("line needs a line name"),
        "lines" => Ok(Command::ListLines),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => bail!("empty command"),
        other => bail!("unknown command '{other}'"),
    }
}

/// What the session loop should do after a command has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rerender,
    ListLines,
    Help,
    Quit,
}

/// Applies `command` to `state`.
///
/// Switching mode clears the search box, since each view has its own.
pub fn apply(state: &mut ViewState, command: Command) -> Outcome {
    match command {
        Command::Mode(mode) => {
            if state.mode != mode {
                state.search = None;
            }
            state.mode = mode;
            Outcome::Rerender
        }
        Command::Search(search) => {
            state.search = search;
            Outcome::Rerender
        }
        Command::Line(line) => {
            state.selected_line = Some(line);
            Outcome::Rerender
        }
        Command::ListLines => Outcome::ListLines,
        Command::Help => Outcome::Help,
        Command::Quit => Outcome::Quit,
    }
}

/// Runs the read-apply-render loop until `quit` or end of input.
pub fn run_session<R, W, F>(
    dataset: &Dataset,
    mut state: ViewState,
    input: R,
    out: &mut W,
    mut render: F,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&mut W, &Report) -> Result<()>,
{
    info!(mode = %state.mode, "Exploration session started");
    render(out, &dashboard::run(dataset, &state))?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let outcome = match parse_command(&line) {
            Ok(command) => {
                debug!(?command, "Session command");
                apply(&mut state, command)
            }
            Err(e) => {
                warn!(input = %line, error = %e, "Rejected session command");
                writeln!(out, "{e}\n{USAGE}")?;
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }
        };

        match outcome {
            Outcome::Rerender => render(out, &dashboard::run(dataset, &state))?,
            Outcome::ListLines => {
                for name in dataset.line_names() {
                    writeln!(out, "{name}")?;
                }
            }
            Outcome::Help => writeln!(out, "{USAGE}")?,
            Outcome::Quit => break,
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    info!("Exploration session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RidershipRecord;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        Dataset::new(vec![
            RidershipRecord::new(date, "2호선", "강남", 100, 90),
            RidershipRecord::new(date, "1호선", "서울역", 80, 70),
        ])
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("mode trend").unwrap(), Command::Mode(Mode::Trend));
        assert_eq!(
            parse_command("search 강남\n").unwrap(),
            Command::Search(Some("강남".to_string()))
        );
        assert_eq!(parse_command("search").unwrap(), Command::Search(None));
        assert_eq!(
            parse_command("line 2호선").unwrap(),
            Command::Line("2호선".to_string())
        );
        assert_eq!(parse_command("lines").unwrap(), Command::ListLines);
        assert_eq!(parse_command("  quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_search_keeps_inner_text_verbatim() {
        assert_eq!(
            parse_command("search Line 2").unwrap(),
            Command::Search(Some("Line 2".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_command("").is_err());
        assert!(parse_command("mode weather").is_err());
        assert!(parse_command("line").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_mode_switch_clears_search() {
        let mut state = ViewState::new(Mode::Lines).with_search(Some("2".to_string()));
        assert_eq!(apply(&mut state, Command::Mode(Mode::Lines)), Outcome::Rerender);
        assert_eq!(state.search.as_deref(), Some("2"));

        apply(&mut state, Command::Mode(Mode::Stations));
        assert_eq!(state.mode, Mode::Stations);
        assert!(state.search.is_none());
    }

    #[test]
    fn test_line_selection_survives_mode_switch() {
        let mut state = ViewState::new(Mode::Trend);
        apply(&mut state, Command::Line("2호선".to_string()));
        apply(&mut state, Command::Mode(Mode::Lines));
        apply(&mut state, Command::Mode(Mode::Trend));
        assert_eq!(state.selected_line.as_deref(), Some("2호선"));
    }

    #[test]
    fn test_session_rerenders_after_each_change() {
        let input = "search 강\nbogus\nmode trend\nlines\nquit\nmode stations\n";
        let mut out = Vec::new();
        let mut modes = Vec::new();

        run_session(
            &dataset(),
            ViewState::new(Mode::Stations),
            input.as_bytes(),
            &mut out,
            |_, report| {
                modes.push(report.mode());
                Ok(())
            },
        )
        .unwrap();

        // initial render, search, mode trend; nothing after quit
        assert_eq!(modes, vec![Mode::Stations, Mode::Stations, Mode::Trend]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unknown command 'bogus'"));
        assert!(text.contains("1호선\n2호선\n"));
    }
}
