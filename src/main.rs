mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "handvault")]
#[command(about = "Import 6-max hold'em hand histories and track Hero's results")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "HANDVAULT_DB", default_value = "poker_data.db", global = true)]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import .txt/.zip hand histories (files or directories), skipping known hands
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Parse a file and print the records as JSON without storing them
    Parse {
        path: PathBuf,

        #[arg(long)]
        pretty: bool,
    },

    /// Show one stored hand
    Show { hand_id: String },

    /// Print the rakeback percentage, or set it and refresh adjusted profit
    Rakeback { percentage: Option<f64> },

    /// Recompute contribution and adjusted profit for every stored hand
    Recalculate,

    /// Parse a file and overwrite any stored copy of its hands
    Save { path: PathBuf },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Import { paths } => app::import(&cli.db, &paths),
        Commands::Parse { path, pretty } => app::parse(&path, pretty),
        Commands::Show { hand_id } => app::show(&cli.db, &hand_id),
        Commands::Rakeback { percentage } => app::rakeback(&cli.db, percentage),
        Commands::Recalculate => app::recalculate(&cli.db),
        Commands::Save { path } => app::save(&cli.db, &path),
    }
}
