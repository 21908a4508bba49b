//! Line-oriented interactive loop.

use std::io::{IsTerminal, Write};

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{ChatSession, TypingRenderer};
use crate::agent::{Speaker, Turn};
use crate::error::Result;

const PROMPT: &str = "you> ";
const THINKING: &str = "🤖 Thinking...";

/// A line of user input, classified
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Message(&'a str),
    Reset,
    History,
    Help,
    Quit,
    Unknown(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Input::Message(line);
    };
    // `//text` sends `/text`
    if rest.starts_with('/') {
        return Input::Message(rest);
    }
    // A leading path such as `/var/log/app.log` is text, not a command
    let command = rest.split_whitespace().next().unwrap_or(rest);
    if command.contains('/') {
        return Input::Message(line);
    }
    match line.to_lowercase().as_str() {
        "/reset" | "/clear" => Input::Reset,
        "/history" => Input::History,
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        _ => Input::Unknown(line),
    }
}

fn help_text() -> String {
    [
        "Type a request, for example: create a bug in PROJ called Login fails".to_string(),
        format!("  {}  forget the conversation", "/reset".cyan()),
        format!("  {}  show the conversation so far", "/history".cyan()),
        format!("  {}  leave (Ctrl-D works too)", "/quit".cyan()),
        format!("Start a line with {} to send text that begins with /", "//".cyan()),
    ]
    .join("\n")
}

fn history_line(turn: &Turn) -> String {
    let time = turn
        .at
        .to_zoned(jiff::tz::TimeZone::system())
        .strftime("%H:%M:%S")
        .to_string();
    let speaker = match turn.speaker {
        Speaker::User => turn.speaker.to_string().cyan().to_string(),
        Speaker::Assistant => turn.speaker.to_string().green().to_string(),
    };
    format!("[{}] {} {speaker}: {}", turn.index, time.dimmed(), turn.text)
}

/// Show a transient "thinking" line on stderr while the agent works
struct Spinner {
    enabled: bool,
}

impl Spinner {
    fn start(enabled: bool) -> Self {
        if enabled {
            eprint!("{}", THINKING.dimmed());
            let _ = std::io::stderr().flush();
        }
        Self { enabled }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if self.enabled {
            eprint!("\r\x1b[2K");
            let _ = std::io::stderr().flush();
        }
    }
}

/// Run the chat loop until `/quit` or end of input.
pub async fn run<R, W>(
    session: &mut ChatSession,
    renderer: TypingRenderer,
    input: R,
    out: &mut W,
    spinner: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        out.write_all(PROMPT.cyan().bold().to_string().as_bytes())
            .await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            out.write_all(b"\n").await?;
            break;
        };

        match classify(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Reset => {
                session.reset();
                out.write_all(format!("{}\n", "Conversation cleared.".dimmed()).as_bytes())
                    .await?;
            }
            Input::History => {
                let transcript = session.transcript();
                if transcript.is_empty() {
                    out.write_all(format!("{}\n", "No messages yet.".dimmed()).as_bytes())
                        .await?;
                }
                for turn in transcript {
                    out.write_all(format!("{}\n", history_line(turn)).as_bytes())
                        .await?;
                }
            }
            Input::Help => {
                out.write_all(format!("{}\n", help_text()).as_bytes()).await?;
            }
            Input::Unknown(command) => {
                out.write_all(
                    format!("Unknown command {command}. Type /help for commands.\n").as_bytes(),
                )
                .await?;
            }
            Input::Message(text) => {
                let reply = {
                    let _spinner = Spinner::start(spinner);
                    session.submit(text).await
                };
                out.write_all(format!("{} ", "🤖".bold()).as_bytes()).await?;
                renderer.render(out, &reply).await?;
            }
        }
    }

    Ok(())
}

/// Interactive chat on stdin/stdout
pub async fn run_repl(session: &mut ChatSession, renderer: TypingRenderer) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            format!(
                "{}\n{}\n\n",
                "Jira Assistant".bold(),
                "Type /help for commands.".dimmed()
            )
            .as_bytes(),
        )
        .await?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run(
        session,
        renderer,
        stdin,
        &mut stdout,
        std::io::stderr().is_terminal(),
    )
    .await
}
