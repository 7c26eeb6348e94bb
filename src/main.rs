mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "anylist")]
#[command(about = "Manage AnyList meal-planning calendar labels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or initialize the client configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Create, update or delete meal-planning calendar labels
    Label {
        #[command(subcommand)]
        action: LabelAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum LabelAction {
    /// Create a new label
    Create {
        /// Label name
        name: String,

        /// Display color (e.g., "#FF0000")
        #[arg(long)]
        color: Option<String>,

        /// Position among the calendar's labels
        #[arg(long)]
        sort_index: Option<i32>,

        /// Calendar to create the label in (defaults to calendar_id from config)
        #[arg(short, long)]
        calendar: Option<String>,
    },
    /// Replace an existing label's state (fields not given are sent unset)
    Update {
        /// Label identifier
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        sort_index: Option<i32>,

        /// Version counter the server last reported for this label
        #[arg(long)]
        logical_timestamp: Option<i64>,

        #[arg(short, long)]
        calendar: Option<String>,
    },
    /// Delete a label
    Delete {
        /// Label identifier
        id: String,

        #[arg(short, long)]
        calendar: Option<String>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ANYLIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Config { action } => match action {
            Some(ConfigAction::Init { force }) => commands::config::init(force),
            None => commands::config::show(),
        },
        Commands::Label { action } => match action {
            LabelAction::Create {
                name,
                color,
                sort_index,
                calendar,
            } => commands::label::create(name, color, sort_index, calendar).await,
            LabelAction::Update {
                id,
                name,
                color,
                sort_index,
                logical_timestamp,
                calendar,
            } => {
                let fields = commands::label::LabelFields {
                    name,
                    color,
                    sort_index,
                    logical_timestamp,
                };
                commands::label::update(id, fields, calendar).await
            }
            LabelAction::Delete { id, calendar } => commands::label::delete(id, calendar).await,
        },
    }
}
