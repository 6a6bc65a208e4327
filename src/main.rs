use anyhow::Result;
use clap::Parser;
use medal_board::board::{compute_scores, LeaderboardPage};
use medal_board::config::{BoardConfig, BoardConfigBuilder, SourceKind};
use medal_board::medals::MedalFetcherBuilder;
use medal_board::participants::load_participants;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Render the Olympics sweepstake leaderboard page")]
struct Args {
    /// Where to read medal counts from
    #[arg(long, default_value = "api")]
    source: SourceKind,
    /// Override the source endpoint
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long, default_value = "participants.json")]
    participants: PathBuf,
    #[arg(long, default_value = "index.html")]
    out: PathBuf,
    /// Browser auto-refresh interval written into the page, in seconds
    #[arg(long, default_value_t = 300)]
    refresh_secs: u32,
    /// How long to wait for the rendered page's table, in seconds
    #[arg(long, default_value_t = 30)]
    page_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = build_config(args)?;

    let fetcher = MedalFetcherBuilder::default()
        .endpoint(config.endpoint.clone())
        .kind(config.source)
        .timeout_secs(config.page_timeout_secs)
        .poll_secs(config.page_poll_secs)
        .build()?;

    let medals = fetcher.fetch().await?;
    tracing::info!(countries = medals.len(), source = %config.source, "fetched medal table");

    let participants = load_participants(&config.participants_file)?;
    let board = compute_scores(&participants, &medals);

    let page = LeaderboardPage::new(board, config.refresh_secs);
    fs::write(&config.output_file, page.generate()?)?;
    tracing::info!(path = %config.output_file.display(), "leaderboard written");

    Ok(())
}

fn build_config(args: Args) -> Result<BoardConfig> {
    let endpoint = args
        .endpoint
        .unwrap_or_else(|| args.source.default_endpoint().to_string());

    Ok(BoardConfigBuilder::default()
        .source(args.source)
        .endpoint(endpoint)
        .participants_file(args.participants)
        .output_file(args.out)
        .refresh_secs(args.refresh_secs)
        .page_timeout_secs(args.page_timeout_secs)
        .build()?)
}
