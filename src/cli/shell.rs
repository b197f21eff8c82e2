use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::context::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;
use crate::query::Column;

/// Environment variable that switches the shell to line-by-line stdin mode.
pub const SCRIPT_ENV: &str = "LEDGER_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output::info("Type `help` for a list of commands.");

    while context.running {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                output::info("Use `exit` to leave the shell.");
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    let tokens = split(line).map_err(|err| CliError::Usage(err.to_string()))?;
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let control = context.dispatch(&command, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    /// Completions for the word ending at the end of `prefix`, with the
    /// byte offset where that word starts.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();
        let mut words = prefix[..start].split_whitespace();

        let pool = match (words.next(), words.next()) {
            (None, _) => self.commands.clone(),
            (Some(command), None) => Self::arguments_for(&command.to_ascii_lowercase()),
            _ => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|name| name.starts_with(&needle))
            .collect();
        (start, matches)
    }

    /// Second-word candidates for commands that take a fixed vocabulary.
    fn arguments_for(command: &str) -> Vec<String> {
        match command {
            "sort" => Column::ALL
                .iter()
                .map(|column| column.header().to_ascii_lowercase())
                .collect(),
            "report" => ["categories", "trend", "monthly"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, pool) = self.candidates(&line[..pos]);
        let candidates = pool
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_arguments_use_column_names() {
        let args = CommandHelper::arguments_for("sort");
        assert!(args.contains(&"amount".to_string()));
        assert!(args.contains(&"type".to_string()));
        assert!(CommandHelper::arguments_for("list").is_empty());
    }

    #[test]
    fn completion_stops_after_the_first_argument() {
        let helper = CommandHelper::new(vec!["sort", "report", "list"]);
        assert_eq!(helper.candidates("so"), (0, vec!["sort".to_string()]));
        assert_eq!(helper.candidates("sort am"), (5, vec!["amount".to_string()]));
        assert_eq!(helper.candidates("sort ").1.len(), 6);
        assert!(helper.candidates("sort amount ").1.is_empty());
        assert!(helper.candidates("sort amount a").1.is_empty());
        assert!(helper.candidates("list ").1.is_empty());
    }
}
