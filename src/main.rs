mod cli;
mod derivation;
mod error_handling;
mod generator;
mod grammar;
mod parser;
mod render;
mod repl;
mod service;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use cli::Cli;
use repl::Session;
use service::HttpGrammarService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .parse_default_env()
        .init();

    let service = HttpGrammarService::new(cli.server_url).with_timeout(Duration::from_secs(cli.timeout));
    let mut session = Session::new(Arc::new(service), std::io::stdout());

    if let Some(path) = &cli.grammar {
        session.load(path)?;
    }

    match &cli.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            session.run(BufReader::new(file)).await
        }
        None => {
            println!("Type `help` for the list of commands");
            session.run(BufReader::new(tokio::io::stdin())).await
        }
    }
}
