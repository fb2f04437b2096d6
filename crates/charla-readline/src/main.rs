mod attachment;
mod command;
mod format;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use charla_application::{ChatEngine, SubmitOutcome};
use charla_core::error::ChatError;
use charla_core::session::{ConversationMode, Turn, TurnId, TurnRole};
use charla_interaction::HttpCompletionClient;
use charla_interaction::config;

use command::{COMMANDS, Command};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    /// Shown on an empty line; follows the conversation mode.
    input_hint: String,
}

impl CliHelper {
    fn new(mode: ConversationMode) -> Self {
        Self {
            input_hint: mode.input_hint().to_string(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates = COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.is_empty() {
            return Some(self.input_hint.clone());
        }

        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Logs go to stderr so they never interleave with the transcript on stdout.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_assistant(text: &str) {
    println!("{}", "[Charla]".bright_magenta());
    for line in format::format_message(text) {
        println!("{}", line.bright_blue());
    }
    println!();
}

fn print_turn(turn: &Turn) {
    match turn.role {
        TurnRole::User => {
            println!("{}", format!("> {}", turn.text).green());
            if let Some(attachment) = &turn.attachment {
                println!("{}", format!("  [imagen: {}]", attachment.name).bright_black());
            }
        }
        TurnRole::Assistant => print_assistant(&turn.text),
    }
}

fn print_help() {
    println!(
        "{}",
        "/mode [amigo|profesor]  switch persona (toggles without argument)".bright_black()
    );
    println!("{}", "/reset                  start over with a new topic".bright_black());
    println!("{}", "/attach <path>          attach an image to the next message".bright_black());
    println!("{}", "/detach                 drop the pending image".bright_black());
    println!("{}", "/history                reprint the conversation".bright_black());
    println!("{}", "/quit                   exit".bright_black());
}

/// Prints a reply turn as it is revealed, until the engine is idle again.
async fn stream_reply(engine: &ChatEngine, turn: TurnId) {
    let mut revisions = engine.subscribe();
    let mut shown = 0usize;

    println!("{}", "[Charla]".bright_magenta());
    loop {
        let session = engine.snapshot().await;
        let Some(current) = session.turn(turn) else {
            break;
        };

        let delta: String = current.text.chars().skip(shown).collect();
        if !delta.is_empty() {
            shown += delta.chars().count();
            print!("{}", delta.bright_blue());
            let _ = std::io::stdout().flush();
        }

        if !session.busy || revisions.changed().await.is_err() {
            break;
        }
    }
    println!("\n");
}

async fn send_message(engine: &ChatEngine, text: &str) {
    match engine.submit(text, None).await {
        Ok(SubmitOutcome::Revealing { reply_turn, .. }) => stream_reply(engine, reply_turn).await,
        Ok(SubmitOutcome::Revealed { .. }) => {
            println!("{}", "(respuesta vacía)".bright_black());
        }
        Ok(SubmitOutcome::Fallback { reply_turn, error }) => {
            tracing::debug!("fallback after {}: {}", error.kind(), error);
            if let Some(turn) = engine.snapshot().await.turn(reply_turn) {
                print_assistant(&turn.text);
            }
            eprintln!("{}", format!("({})", error).bright_black());
        }
        Ok(SubmitOutcome::Discarded) => {}
        Err(ChatError::Busy) => {
            println!("{}", "Still answering, one moment...".yellow());
        }
        Err(ChatError::EmptyInput) => {}
        Err(err) => eprintln!("{}", format!("Error: {}", err).red()),
    }
}

/// Handles one REPL line. Returns false when the REPL should exit.
async fn dispatch(
    engine: &ChatEngine,
    rl: &mut Editor<CliHelper, DefaultHistory>,
    line: &str,
) -> bool {
    match command::parse(line) {
        Command::Quit => {
            println!("{}", "¡Hasta luego!".bright_green());
            return false;
        }
        Command::Message(text) => {
            let pending = engine.snapshot().await.pending_attachment;
            if let Some(attachment) = pending {
                println!("{}", format!("  [imagen: {}]", attachment.name).bright_black());
            }
            send_message(engine, &text).await;
        }
        Command::Mode(requested) => {
            let current = engine.snapshot().await.mode;
            let mode = requested.unwrap_or(match current {
                ConversationMode::Supportive => ConversationMode::Instructive,
                ConversationMode::Instructive => ConversationMode::Supportive,
            });
            engine.set_mode(mode).await;
            if let Some(helper) = rl.helper_mut() {
                *helper = CliHelper::new(mode);
            }
            println!("{}", mode.display_name().bright_yellow());
        }
        Command::Reset => match engine.reset().await {
            Ok(session) => {
                println!("{}", "--- nueva conversación ---".bright_black());
                session.transcript.iter().for_each(print_turn);
            }
            Err(err) => eprintln!("{}", format!("Error: {}", err).red()),
        },
        Command::Attach(path) => match attachment::load_image(&path) {
            Ok(attachment) => {
                println!("{}", format!("Imagen lista: {}", attachment.name).bright_black());
                engine.attach(attachment).await;
            }
            Err(err) => eprintln!("{}", format!("Error: {:#}", err).red()),
        },
        Command::Detach => match engine.detach().await {
            Some(removed) => {
                println!("{}", format!("Imagen quitada: {}", removed.name).bright_black())
            }
            None => println!("{}", "No image attached".bright_black()),
        },
        Command::History => {
            engine.snapshot().await.transcript.iter().for_each(print_turn);
        }
        Command::Help => print_help(),
        Command::Invalid(message) => println!("{}", message.yellow()),
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // ===== Engine Initialization =====
    let config = Arc::new(config::load_config()?);
    let client = Arc::new(HttpCompletionClient::from_config(&config)?);
    let engine = ChatEngine::new(config.clone(), client)?;
    let session = engine.snapshot().await;

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(session.mode)));

    println!("{}", "=== Charla ===".bright_magenta().bold());
    println!("{}", format!("Endpoint: {}", config.endpoint).bright_black());
    println!("{}", "Type '/help' for commands or 'quit' to exit.".bright_black());
    println!();
    session.transcript.iter().for_each(print_turn);

    // ===== Main REPL Loop =====
    loop {
        let session = engine.snapshot().await;
        let prompt = match &session.pending_attachment {
            Some(attachment) => format!("{} [{}] >> ", session.mode, attachment.name),
            None => format!("{} >> ", session.mode),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                if !dispatch(&engine, &mut rl, &line).await {
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
