//! Line-oriented interactive browser

use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;
use tocnav_core::{CacheStatus, EntryKind, TocAction, TocController, Transition, ViewModel};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Prompt printed before each command
pub const PROMPT: &str = "tocnav> ";

/// Command summary printed by `help`
pub const HELP: &str = "\
commands:
  cd <name>       enter a subdirectory
  up              go up one level
  search [term]   filter entries; no term clears the filter
  page <n>        jump to page n (1-based)
  next, prev      move one page
  refresh         reload the current directory
  reset           back to the root
  help            show this message
  quit            leave";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enter subdirectory
    Cd(String),
    /// Go up one level
    Up,
    /// Set or clear the search term
    Search(Option<String>),
    /// Jump to 1-based page
    Page(usize),
    /// Next page
    Next,
    /// Previous page
    Prev,
    /// Reload current directory
    Refresh,
    /// Back to root
    Reset,
    /// Print help
    Help,
    /// Leave the browser
    Quit,
}

impl Command {
    /// Controller action for this command given the view on screen
    ///
    /// Returns `None` for commands handled by the shell itself.
    #[must_use]
    pub fn to_action(&self, view: &ViewModel) -> Option<TocAction> {
        let action = match self {
            Self::Cd(name) if name == ".." => TocAction::Ascend,
            Self::Cd(name) => TocAction::Descend(name.clone()),
            Self::Up => TocAction::Ascend,
            Self::Search(term) => TocAction::SetSearch(term.clone()),
            Self::Page(number) => TocAction::SetPage(number.saturating_sub(1)),
            Self::Next => TocAction::SetPage(view.current_page_index + 1),
            Self::Prev => TocAction::SetPage(view.current_page_index.saturating_sub(1)),
            Self::Refresh => TocAction::Refresh,
            Self::Reset => TocAction::Reset,
            Self::Help | Self::Quit => return None,
        };
        Some(action)
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        match word {
            "" => Err(ParseCommandError::Empty),
            "cd" => arg.map(Self::Cd).ok_or(ParseCommandError::MissingArgument("cd")),
            "up" | ".." => Ok(Self::Up),
            "search" | "/" => Ok(Self::Search(arg)),
            "page" => {
                let raw = arg.ok_or(ParseCommandError::MissingArgument("page"))?;
                match raw.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(Self::Page(n)),
                    _ => Err(ParseCommandError::InvalidPage(raw)),
                }
            }
            "next" | "n" => Ok(Self::Next),
            "prev" | "p" => Ok(Self::Prev),
            "refresh" => Ok(Self::Refresh),
            "reset" => Ok(Self::Reset),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

/// Input line that is not a command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    /// Blank line
    #[error("empty command")]
    Empty,

    /// Unrecognized command word
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),

    /// Command needs an argument
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// Page number is not a positive integer
    #[error("invalid page number {0:?}")]
    InvalidPage(String),
}

/// Render a view as text
#[must_use]
pub fn render_view(view: &ViewModel) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{}  page {}/{}  {} entries",
        view.path,
        view.page_number(),
        view.total_pages,
        view.filtered_count
    );
    if let Some(term) = &view.search_term {
        let _ = write!(out, "  search {term:?}");
    }
    out.push('\n');

    match view.status {
        CacheStatus::Loading => out.push_str("  (loading)\n"),
        CacheStatus::Miss if view.visible_entries.is_empty() => {
            out.push_str("  (not loaded)\n");
        }
        _ if view.visible_entries.is_empty() => out.push_str("  (empty)\n"),
        _ => {}
    }
    for entry in &view.visible_entries {
        let _ = write!(out, "  {}", entry.name());
        if entry.kind() == EntryKind::Subdirectory {
            out.push('/');
        }
        let classes = entry.metadata_classes();
        if !classes.is_empty() {
            let labels: Vec<_> = classes.iter().map(ToString::to_string).collect();
            let _ = write!(out, "  [{}]", labels.join(", "));
        }
        out.push('\n');
    }
    out
}

/// Render a view plus its error line, if any
#[must_use]
pub fn render_transition(transition: &Transition) -> String {
    let mut out = render_view(&transition.view);
    if let Some(error) = &transition.error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

/// Read commands from `input` until `quit` or end of input
///
/// # Errors
/// Returns error if reading input or writing output fails
pub async fn run<R, W>(toc: &TocController, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", render_transition(&toc.on_open().await))?;
    let mut lines = input.lines();

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseCommandError::Empty) => continue,
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };
        tracing::debug!(?command, "command");

        match command {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            other => {
                if let Some(action) = other.to_action(&toc.view()) {
                    let transition = toc.dispatch(action).await;
                    write!(out, "{}", render_transition(&transition))?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tocnav_core::Entry;

    #[test]
    fn parse_commands() {
        assert_eq!("cd runs".parse::<Command>(), Ok(Command::Cd("runs".into())));
        assert_eq!("cd  my runs ".parse::<Command>(), Ok(Command::Cd("my runs".into())));
        assert_eq!("up".parse::<Command>(), Ok(Command::Up));
        assert_eq!("search bench".parse::<Command>(), Ok(Command::Search(Some("bench".into()))));
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(None)));
        assert_eq!("page 3".parse::<Command>(), Ok(Command::Page(3)));
        assert_eq!(" q ".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn render_marks_metadata_classes() {
        let view = ViewModel {
            path: "/benchmarks".parse().unwrap(),
            visible_entries: vec![
                Entry::subdirectory("fio")
                    .unwrap()
                    .with_metadata("dataset.metalog.tools.sar", "default")
                    .with_metadata("server.tarball-path", "/srv/fio.tar.xz"),
                Entry::file("notes.txt").unwrap(),
            ],
            current_page_index: 0,
            total_pages: 1,
            filtered_count: 2,
            search_term: None,
            status: CacheStatus::Loaded,
        };
        assert_eq!(
            render_view(&view),
            "/benchmarks  page 1/1  2 entries\n  fio/  [tarball, tools]\n  notes.txt\n"
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ParseCommandError::Empty));
        assert_eq!("cd".parse::<Command>(), Err(ParseCommandError::MissingArgument("cd")));
        assert_eq!(
            "page 0".parse::<Command>(),
            Err(ParseCommandError::InvalidPage("0".into()))
        );
        assert!(matches!(
            "frobnicate".parse::<Command>(),
            Err(ParseCommandError::Unknown(_))
        ));
    }
}
