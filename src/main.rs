//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::content::{Collection, Projection};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Resolve essays and interesting links from the remote database or local markdown", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List essays or interesting items, newest first
    #[command(alias = "ls")]
    List {
        /// Collection to list (essays, interesting)
        #[arg(default_value = "essays")]
        collection: Collection,

        /// Comma-separated fields to include (default: all)
        #[arg(short, long)]
        fields: Option<String>,

        /// Maximum number of records
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Show one essay or item
    Show {
        /// Collection the record belongs to (essays, interesting)
        collection: Collection,

        /// Identifier (essay slug or item id)
        id: String,

        /// Comma-separated fields to include (default: all)
        #[arg(short, long)]
        fields: Option<String>,

        /// Render the markdown body to HTML
        #[arg(long)]
        html: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Search titles, bodies and summaries
    Search {
        /// Text to look for (case-insensitive)
        #[arg(default_value = "")]
        query: String,

        /// Collection to search
        #[arg(short = 'C', long, default_value = "essays")]
        collection: Collection,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new local document
    New {
        /// Title of the new document
        title: String,

        /// Collection to create it in
        #[arg(short = 'C', long, default_value = "essays")]
        collection: Collection,

        /// File name (identifier) instead of the slugified title
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check the connection to the remote backend
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,folio=debug,info"
    } else {
        "folio_rs=info,folio=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List {
            collection,
            fields,
            limit,
            json,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let projection = projection(fields.as_deref());
            folio_rs::commands::list::run(&folio, collection, &projection, limit, json).await?;
        }

        Commands::Show {
            collection,
            id,
            fields,
            html,
            json,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let projection = projection(fields.as_deref());
            folio_rs::commands::show::run(&folio, collection, &id, &projection, html, json)
                .await?;
        }

        Commands::Search {
            query,
            collection,
            json,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::search::run(&folio, collection, &query, json).await?;
        }

        Commands::New {
            title,
            collection,
            path,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", collection, title);
            folio_rs::commands::new::run(&folio, collection, &title, path.as_deref())?;
        }

        Commands::Check => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::check::run(&folio).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn projection(fields: Option<&str>) -> Projection {
    fields.map(Projection::parse).unwrap_or_default()
}
