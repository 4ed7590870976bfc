//! # solopress CLI
//!
//! Command-line interface for the solopress static site generator.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use solopress_core::Kind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solopress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "solopress.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new solopress project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Build the static site
    Build,

    /// Create a new content file with a front matter template
    New {
        /// Title of the new document
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Content kind
        #[arg(long, value_enum, default_value_t = KindArg::Blog)]
        kind: KindArg,

        /// Publication or event date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = commands::new::parse_date)]
        date: Option<chrono::NaiveDate>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Blog,
    Events,
    Podcast,
}

impl From<KindArg> for Kind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Blog => Kind::Post,
            KindArg::Events => Kind::Event,
            KindArg::Podcast => Kind::Episode,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build => commands::build_site(&cli.config),
        Commands::New { title, kind, date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            commands::new_content(&cli.config, &title.join(" "), kind.into(), date)
        }
    }
}
