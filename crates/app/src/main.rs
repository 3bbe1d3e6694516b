mod args;
mod error;
mod host;
mod render;
mod ticker;

use services::{Clock, Tutor};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command, print_usage};
use crate::error::AppError;
use crate::host::Host;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHAPEVILLE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), AppError> {
    let args = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())?;
    if args.help {
        print_usage();
        return Ok(());
    }

    match args.command {
        Command::Catalog => {
            print!("{}", render::catalog());
            Ok(())
        }
        Command::Play => {
            let tutor = Tutor::from_draft(args.settings, Clock::default())?;
            info!(
                session_id = %tutor.ledger().session_id()?,
                time_limit_secs = tutor.settings().time_limit_secs(),
                seeded = tutor.settings().seed().is_some(),
                "session started"
            );
            let (tick_tx, tick_rx) = mpsc::unbounded_channel();
            let summary = Host::new(tutor, args.json, tick_tx).run(tick_rx).await?;
            info!(score = summary.score, "goodbye");
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
