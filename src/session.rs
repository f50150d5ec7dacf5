use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::dialogue::engine::PROTOCOL_HEADER;
use crate::dialogue::{ConversationState, DialogueError, Sender, TranscriptEntry, TriageEngine};

// ---------------------------------------------------------------------------
// Session configuration
// ---------------------------------------------------------------------------

pub struct SessionConfig {
    /// Pause before showing the assistant's reply. Zero disables it.
    pub typing_delay: Duration,
    /// JSON tree document to load instead of the built-in protocols.
    pub tree_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(600),
            tree_path: None,
        }
    }
}

/// What happened during one terminal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub final_node_id: String,
    pub transcript_len: usize,
    pub selections: usize,
    pub protocols_delivered: usize,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_entry(out: &mut impl Write, entry: &TranscriptEntry) -> Result<()> {
    match entry.sender {
        Sender::User => writeln!(out, "\n[You]: {}", entry.text)?,
        Sender::Assistant if entry.is_protocol_block => {
            let body = entry
                .text
                .strip_prefix(PROTOCOL_HEADER)
                .unwrap_or(&entry.text)
                .trim_start_matches('\n');
            writeln!(out, "\n  -- MEDICAL PROTOCOL --")?;
            for line in body.lines() {
                writeln!(out, "  {line}")?;
            }
        }
        Sender::Assistant => writeln!(out, "\n[Emerge AI]: {}", entry.text)?,
    }
    Ok(())
}

fn render_entries(out: &mut impl Write, entries: &[TranscriptEntry]) -> Result<()> {
    for entry in entries {
        render_entry(out, entry)?;
    }
    Ok(())
}

fn render_options(
    out: &mut impl Write,
    engine: &TriageEngine,
    state: &ConversationState,
) -> Result<()> {
    let node = engine.current_node(state)?;
    if node.options.is_empty() {
        writeln!(out, "\n  (no options here, type 'reset' to start over)")?;
        return Ok(());
    }
    writeln!(out)?;
    for (i, choice) in node.options.iter().enumerate() {
        writeln!(out, "  [{}] {} ({})", i + 1, choice.label, choice.urgency_style)?;
    }
    Ok(())
}

fn thinking(out: &mut impl Write, delay: Duration) -> Result<()> {
    if delay.is_zero() {
        return Ok(());
    }
    writeln!(out, "\n(Thinking...)")?;
    out.flush()?;
    thread::sleep(delay);
    Ok(())
}

// ---------------------------------------------------------------------------
// Interactive loop
// ---------------------------------------------------------------------------

/// Drive one triage session over a line-oriented input until `quit`, `exit`
/// or end of input.
pub fn run(
    engine: &TriageEngine,
    config: &SessionConfig,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<SessionSummary> {
    writeln!(out, "========================================")?;
    writeln!(out, "        EMERGE AI FIRST-AID TRIAGE")?;
    writeln!(out, "========================================")?;
    writeln!(out, "Pick an option by number, or type 'reset' to start over.")?;

    let mut state = engine.start();
    render_entries(out, state.transcript())?;
    let mut selections = 0;

    info!("Triage session started at node: {}", state.current_node_id());

    loop {
        render_options(out, engine, &state)?;

        write!(out, "\n> ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line).context("failed to read input")? == 0 {
            debug!("End of input");
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            writeln!(out, "(Please select an option or type a message.)")?;
            continue;
        }

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        let next = match line.parse::<usize>() {
            Ok(n) => match engine.select_option(&state, n.wrapping_sub(1)) {
                Ok(next) => {
                    selections += 1;
                    next
                }
                Err(err @ DialogueError::InvalidChoice { .. }) => {
                    warn!("{err}");
                    writeln!(out, "(No option {n} here.)")?;
                    continue;
                }
                Err(err) => return Err(err).context("triage engine failed"),
            },
            Err(_) => engine.handle_free_text(&state, line),
        };

        // The user's own line is shown right away, the reply after the delay.
        let added = &next.transcript()[state.transcript().len()..];
        let (said, replies) = added.split_at(added.len().min(1));
        render_entries(out, said)?;
        thinking(out, config.typing_delay)?;
        render_entries(out, replies)?;
        state = next;
    }

    let protocols_delivered = state
        .transcript()
        .iter()
        .filter(|e| e.is_protocol_block)
        .count();

    let summary = SessionSummary {
        final_node_id: state.current_node_id().to_string(),
        transcript_len: state.transcript().len(),
        selections,
        protocols_delivered,
    };
    info!("Session ended: {summary:?}");

    writeln!(out, "\n========================================")?;
    writeln!(
        out,
        "  {} selections, {} protocols delivered",
        summary.selections, summary.protocols_delivered
    )?;
    writeln!(out, "========================================")?;

    Ok(summary)
}
