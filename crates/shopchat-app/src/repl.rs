//! Interactive terminal front end for a [`ChatSession`].
//!
//! Reads one line at a time from stdin. Plain text is sent as a query; lines
//! starting with `:` are commands. The transcript and the detail panel are
//! re-rendered after every event.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use shopchat_chat::{ChatError, ChatSession, ConfirmationGate, ResetOutcome, SessionState};
use shopchat_core::error::ShopchatError;
use shopchat_core::types::{Product, ProductId, Sender, Turn};

pub const HELP: &str = "Type a question, or one of:
  :open N     show details for the Nth product of the last listing
  :detail ID  show details for a product id
  :close      close the detail panel
  :reset      clear the conversation
  :quit       leave";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Query(String),
    Open(usize),
    Detail(ProductId),
    Close,
    Reset,
    Help,
    Quit,
}

/// Parse one input line. Usage errors come back as a message for the user.
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Ok(ReplCommand::Query(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (name, arg) {
        ("open", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Ok(ReplCommand::Open(n)),
            _ => Err(format!("':open' expects a positive number, got '{}'", n)),
        },
        ("detail", Some(id)) => id
            .parse::<i64>()
            .map(|id| ReplCommand::Detail(ProductId(id)))
            .map_err(|_| format!("':detail' expects a product id, got '{}'", id)),
        ("open", None) | ("detail", None) => Err(format!("':{}' needs an argument", name)),
        ("close", _) => Ok(ReplCommand::Close),
        ("reset", _) => Ok(ReplCommand::Reset),
        ("help", _) => Ok(ReplCommand::Help),
        ("quit", _) | ("q", _) | ("exit", _) => Ok(ReplCommand::Quit),
        _ => Err(format!("Unknown command ':{}'", name)),
    }
}

/// Whether a confirmation answer means yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Asks on stdout and reads the answer from stdin. EOF counts as no.
pub struct StdinConfirm;

impl ConfirmationGate for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if std::io::stdout().flush().is_err() {
            return false;
        }
        match read_line() {
            Ok(Some(answer)) => is_affirmative(&answer),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn format_price(price: f64) -> String {
    format!("${}", price)
}

/// Render the transcript, numbering the products of each listing from 1.
pub fn render_transcript(turns: &[Turn]) -> String {
    let mut out = String::new();
    if turns.is_empty() {
        out.push_str("(no messages yet)\n");
        return out;
    }
    for turn in turns {
        let who = match turn.sender {
            Sender::User => "you",
            Sender::Bot => "bot",
        };
        let _ = writeln!(out, "{}: {}", who, turn.text);
        for (i, product) in turn.products().iter().enumerate() {
            let _ = writeln!(
                out,
                "     {}. {} ({}) {}",
                i + 1,
                product.name,
                product.category,
                format_price(product.price)
            );
        }
    }
    out
}

/// Render the detail panel for the selected product.
pub fn render_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[ {} ]", product.name);
    let _ = writeln!(out, "  Category: {}", product.category);
    let _ = writeln!(out, "  Price:    {}", format_price(product.price));
    if !product.description.is_empty() {
        let _ = writeln!(out, "  {}", product.description);
    }
    let _ = writeln!(out, "  (:close to dismiss)");
    out
}

/// Render the whole view: transcript, then the detail panel if one is open.
pub fn render(state: &SessionState) -> String {
    let mut out = render_transcript(state.conversation.turns());
    if let Some(product) = state.selection.current() {
        out.push('\n');
        out.push_str(&render_detail(product));
    }
    out
}

/// The Nth (1-based) product of the most recent listing.
pub fn nth_listed(state: &SessionState, n: usize) -> Option<Product> {
    state
        .conversation
        .last_product_listing()
        .and_then(|turn| turn.products().get(n.checked_sub(1)?))
        .cloned()
}

// =============================================================================
// Loop
// =============================================================================

fn read_line() -> std::io::Result<Option<String>> {
    tokio::task::block_in_place(|| {
        let mut line = String::new();
        let n = std::io::stdin().lock().read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    })
}

/// Run the read-eval-render loop until `:quit` or EOF.
pub async fn run(session: &ChatSession) -> Result<(), ShopchatError> {
    println!("Logged in as {}. {}", session.user(), HELP);
    println!("{}", render(&session.snapshot()?));

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = read_line()? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(usage) => {
                eprintln!("{}", usage);
                continue;
            }
        };

        let outcome = match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                println!("{}", HELP);
                continue;
            }
            ReplCommand::Query(text) => session.handle_user_query(&text).await,
            ReplCommand::Open(n) => match nth_listed(&session.snapshot()?, n) {
                Some(product) => session.select_product(&product).await,
                None => {
                    eprintln!("No product #{} in the last listing", n);
                    continue;
                }
            },
            ReplCommand::Detail(id) => session.open_detail(id).await,
            ReplCommand::Close => session.close_detail(),
            ReplCommand::Reset => session.reset().await.map(|outcome| {
                if outcome == ResetOutcome::Declined {
                    println!("Reset cancelled.");
                }
            }),
        };

        match outcome {
            Ok(()) | Err(ChatError::EmptyMessage) => {}
            // Already logged by the session; the transcript shows what stuck.
            Err(ChatError::ServiceUnavailable(_)) | Err(ChatError::InvalidTurn(_)) => {}
            Err(e) => return Err(e.into()),
        }

        println!("{}", render(&session.snapshot()?));
    }

    tracing::info!(session = %session.id(), "Chat session ended");
    Ok(())
}
