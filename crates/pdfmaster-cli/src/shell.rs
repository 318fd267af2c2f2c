//! Interactive shell.
//!
//! Reads one command per line and applies it to a [`MergeSession`]. Every
//! action of the merge view has a command; positions are 1-based, matching
//! the numbered listing.

use anyhow::{Context, bail};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use pdfmaster::config::Config;
use pdfmaster::download::DownloadSink;
use pdfmaster::error::Result;
use pdfmaster::files::{Direction, FileId};
use pdfmaster::intake::{IntakeSource, handles_from_patterns};
use pdfmaster::output::{OutputFormatter, display_merge_report, render_file_grid, selection_label};
use pdfmaster::session::{MergeSession, PROCESSING_MESSAGE, RESET_PROMPT};
use pdfmaster::state::ViewMode;

const PROMPT: &str = "pdfmaster> ";

const HELP: &str = "\
Commands:
  add <path>...     add files as picked (no type filter)
  drop <path>...    add files as dropped (PDFs only)
  list              show the files in merge order
  rm <#|id>         remove a file by position or id
  left <#>          move a file one place toward the start
  right <#>         move a file one place toward the end
  merge             merge the files and write the result
  clear             remove all files (asks first)
  mode merge|split  switch view
  status            show the session status
  help              show this help
  quit              leave the shell
";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add paths through the picker.
    Add(Vec<String>),
    /// Add paths as a drop payload.
    Drop(Vec<String>),
    /// Print the listing.
    List,
    /// Remove by 1-based position or by id.
    Remove(String),
    /// Move the file at a 1-based position toward the start.
    Left(usize),
    /// Move the file at a 1-based position toward the end.
    Right(usize),
    /// Merge and deliver.
    Merge,
    /// Clear the list after confirmation.
    Clear,
    /// Switch the view.
    Mode(ViewMode),
    /// Print status.
    Status,
    /// Print help.
    Help,
    /// Leave the shell.
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("empty command");
        };
        let args: Vec<String> = words.map(str::to_string).collect();

        let command = match name.to_lowercase().as_str() {
            "add" => Self::Add(require_paths(name, args)?),
            "drop" => Self::Drop(require_paths(name, args)?),
            "list" | "ls" => Self::List,
            "rm" | "remove" => Self::Remove(single_arg(name, &args)?.to_string()),
            "left" => Self::Left(parse_position(single_arg(name, &args)?)?),
            "right" => Self::Right(parse_position(single_arg(name, &args)?)?),
            "merge" => Self::Merge,
            "clear" | "reset" => Self::Clear,
            "mode" => Self::Mode(single_arg(name, &args)?.parse::<ViewMode>()?),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command: {other} (type `help`)"),
        };

        Ok(command)
    }
}

fn require_paths(name: &str, args: Vec<String>) -> anyhow::Result<Vec<String>> {
    if args.is_empty() {
        bail!("{name} needs at least one path");
    }
    Ok(args)
}

fn single_arg<'a>(name: &str, args: &'a [String]) -> anyhow::Result<&'a str> {
    match args {
        [arg] => Ok(arg),
        _ => bail!("{name} takes exactly one argument"),
    }
}

/// Parse a 1-based position into a 0-based index.
fn parse_position(arg: &str) -> anyhow::Result<usize> {
    let position: usize = arg
        .parse()
        .with_context(|| format!("not a position: {arg}"))?;
    if position == 0 {
        bail!("positions start at 1");
    }
    Ok(position - 1)
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive command loop over `input`.
pub struct Shell<'a, S, R> {
    session: &'a mut MergeSession<S>,
    formatter: &'a OutputFormatter,
    config: &'a Config,
    lines: Lines<R>,
}

impl<'a, S, R> Shell<'a, S, R>
where
    S: DownloadSink,
    R: AsyncBufRead + Unpin,
{
    /// Shell driving `session`, reading commands from `input`.
    pub fn new(
        session: &'a mut MergeSession<S>,
        formatter: &'a OutputFormatter,
        config: &'a Config,
        input: R,
    ) -> Self {
        Self {
            session,
            formatter,
            config,
            lines: input.lines(),
        }
    }

    /// Read and run commands until `quit` or end of input.
    ///
    /// Command errors are reported and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading the input fails.
    pub async fn run(&mut self) -> Result<()> {
        self.show_listing();

        loop {
            let Some(line) = self.read_line(PROMPT).await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    self.formatter.error(&err.to_string());
                    continue;
                }
            };

            tracing::debug!(?command, "shell command");

            if self.execute(command).await? == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Add(paths) => self.add(IntakeSource::Picker, &paths),
            Command::Drop(paths) => self.add(IntakeSource::Drop, &paths),
            Command::List => self.show_listing(),
            Command::Remove(target) => self.remove(&target),
            Command::Left(index) => self.move_file(index, Direction::TowardStart),
            Command::Right(index) => self.move_file(index, Direction::TowardEnd),
            Command::Merge => self.merge().await,
            Command::Clear => self.clear().await?,
            Command::Mode(view_mode) => {
                self.session.set_view_mode(view_mode);
                if view_mode == ViewMode::Split {
                    self.formatter.info("Split feature coming soon.");
                } else {
                    self.formatter.info("Merge mode");
                }
            }
            Command::Status => self.show_status(),
            Command::Help => self.formatter.block(HELP),
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn add(&mut self, source: IntakeSource, patterns: &[String]) {
        let handles = match handles_from_patterns(patterns) {
            Ok(handles) => handles,
            Err(err) => {
                self.formatter.error(&err.to_string());
                return;
            }
        };

        match self.session.add_files(source, handles) {
            Ok(0) => self.formatter.warning("No PDF files to add"),
            Ok(added) => {
                self.formatter.success(&format!("Added {added} file(s)"));
                self.show_listing();
            }
            Err(err) => self.formatter.error(&err.to_string()),
        }
    }

    fn remove(&mut self, target: &str) {
        let id = match parse_position(target) {
            Ok(index) => match self.session.files().get(index) {
                Some(entry) => entry.id.clone(),
                None => {
                    self.formatter.warning(&format!("No file at position {target}"));
                    return;
                }
            },
            Err(_) => FileId::from(target),
        };

        match self.session.remove(&id) {
            Ok(true) => self.show_listing(),
            Ok(false) => self.formatter.warning(&format!("No file with id {id}")),
            Err(err) => self.formatter.error(&err.to_string()),
        }
    }

    fn move_file(&mut self, index: usize, direction: Direction) {
        match self.session.move_file(index, direction) {
            Ok(true) => self.show_listing(),
            Ok(false) => self.formatter.debug("Nothing to move"),
            Err(err) => self.formatter.error(&err.to_string()),
        }
    }

    async fn merge(&mut self) {
        announce_merge(self.formatter, self.session);

        match self.session.merge().await {
            Ok(report) => display_merge_report(self.formatter, &report),
            Err(err) if err.is_validation() || err.is_processing() => {
                self.formatter.status(self.session.state());
            }
            Err(err) => self.formatter.error(&err.to_string()),
        }
    }

    async fn clear(&mut self) -> Result<()> {
        let confirmed = if self.config.assume_yes {
            true
        } else {
            let answer = self.read_line(&format!("{RESET_PROMPT} [y/N]: ")).await?;
            answer.is_some_and(|a| is_yes(&a))
        };

        if self.session.reset(&|_: &str| confirmed) {
            self.formatter.success("Cleared all files");
        }
        Ok(())
    }

    fn show_listing(&self) {
        let files = self.session.files();
        if files.is_empty() {
            self.formatter.info("No files selected");
        } else {
            self.formatter
                .block(&render_file_grid(files, self.formatter.is_verbose()));
        }
    }

    fn show_status(&self) {
        let state = self.session.state();
        self.formatter.info(&format!(
            "View: {} | {} | {:?}",
            self.session.view_mode(),
            selection_label(self.session.files().len()),
            state.phase()
        ));
        self.formatter.status(state);
    }

    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if self.formatter.should_print() {
            print!("{prompt}");
            std::io::stdout().flush()?;
        }
        Ok(self.lines.next_line().await?)
    }
}

/// Print the processing message if `session` is about to start merging.
/// Returns whether it was printed.
pub fn announce_merge<S: DownloadSink>(
    formatter: &OutputFormatter,
    session: &MergeSession<S>,
) -> bool {
    if !session.ready_to_merge() {
        return false;
    }
    formatter.info(PROCESSING_MESSAGE);
    true
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
