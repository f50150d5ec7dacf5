use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use triage::dialogue::{first_aid_protocols, DialogueTree, TriageEngine};
use triage::session::{self, SessionConfig};

fn main() -> Result<()> {
    // Initialize logging. Control verbosity with RUST_LOG env var:
    //   RUST_LOG=info   cargo run               # transitions + session summary
    //   RUST_LOG=debug  cargo run               # + protocol delivery
    //   RUST_LOG=trace  cargo run               # + ignored blank input
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let defaults = SessionConfig::default();
    let config = SessionConfig {
        tree_path: args
            .get(1)
            .filter(|s| s.as_str() != "-")
            .map(PathBuf::from),
        typing_delay: match args.get(2) {
            Some(ms) => Duration::from_millis(ms.parse().with_context(|| {
                format!(
                    "invalid typing delay '{ms}'\n\
                     \n\
                     Usage: triage [tree.json|-] [typing_delay_ms]\n\
                     \n\
                     Example:\n  triage - 0"
                )
            })?),
            None => defaults.typing_delay,
        },
    };

    let tree = match &config.tree_path {
        Some(path) => {
            println!("Loading tree: {}", path.display());
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            DialogueTree::from_json(&document)
                .with_context(|| format!("failed to load tree from {}", path.display()))?
        }
        None => first_aid_protocols(),
    };

    let engine = TriageEngine::new(tree).context("dialogue tree is invalid")?;

    let stdin = io::stdin();
    let summary = session::run(&engine, &config, &mut stdin.lock(), &mut io::stdout())?;
    info!("Finished at node {}", summary.final_node_id);

    Ok(())
}
