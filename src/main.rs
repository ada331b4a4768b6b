use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qsort_survey::{
    api,
    client::QsortClient,
    config::ServerConfig,
    layout::layout,
    render,
    session::Placement,
};

#[derive(Parser)]
#[command(name = "qsort")]
#[command(about = "Q-sort survey server and terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve(ServerConfig),
    /// Print the empty pyramid for a number of cards
    Layout {
        /// Number of cards to lay out
        count: usize,
    },
    /// List teams from a running server
    Teams {
        #[arg(long, env = "QSORT_URL", default_value = "http://127.0.0.1:3000")]
        server: String,
    },
    /// List the versions offered to a team
    Versions {
        #[arg(long, env = "QSORT_URL", default_value = "http://127.0.0.1:3000")]
        server: String,
        #[arg(long)]
        team: String,
    },
    /// Show the cards and empty pyramid for a team and version
    Cards {
        #[arg(long, env = "QSORT_URL", default_value = "http://127.0.0.1:3000")]
        server: String,
        #[arg(long)]
        team: String,
        #[arg(long)]
        version: String,
    },
    /// Place cards from an arrangement file and submit the result
    Submit {
        #[arg(long, env = "QSORT_URL", default_value = "http://127.0.0.1:3000")]
        server: String,
        #[arg(long)]
        team: String,
        #[arg(long)]
        version: String,
        /// Participant name recorded with the submission
        #[arg(long)]
        name: String,
        /// JSON array of {"card", "row", "column"} placements
        #[arg(long)]
        arrangement: PathBuf,
    },
}

/// Running with no subcommand serves with flags taken from the environment.
#[derive(Parser)]
struct DefaultServe {
    #[command(flatten)]
    config: ServerConfig,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "qsort_survey=debug,tower_http=debug".into()),
    );

    // Client commands print to stdout, so logs go to stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Reading survey definition from {}", config.workbook.display());
    let repository = config
        .open_repository()
        .context("Failed to open submission store")?;
    let state = api::AppState::new(config.data_source(), repository);
    let app = api::build_router(state, &config.http());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Q-sort server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(DefaultServe::parse_from(["qsort"]).config));

    match command {
        Commands::Serve(config) => serve(config).await?,
        Commands::Layout { count } => {
            let pyramid = layout(count);
            println!("Rows: {:?}", pyramid.row_sizes());
            print!("{}", render::render_layout(&pyramid));
        }
        Commands::Teams { server } => {
            for team in QsortClient::new(server).teams().await? {
                println!("{}", team);
            }
        }
        Commands::Versions { server, team } => {
            for version in QsortClient::new(server).versions(&team).await? {
                println!("{}", version.name);
            }
        }
        Commands::Cards {
            server,
            team,
            version,
        } => {
            let session = QsortClient::new(server)
                .start_session(&team, &version)
                .await?;
            for card in session.cards() {
                println!("{:<24} {}", card.id, card.text);
            }
            println!();
            print!("{}", render::render_session(&session));
        }
        Commands::Submit {
            server,
            team,
            version,
            name,
            arrangement,
        } => {
            let content = std::fs::read_to_string(&arrangement)
                .with_context(|| format!("Failed to read {}", arrangement.display()))?;
            let placements: Vec<Placement> =
                serde_json::from_str(&content).context("Failed to parse arrangement")?;

            let client = QsortClient::new(server);
            let mut session = client.start_session(&team, &version).await?;
            match client.sort_and_submit(&mut session, &placements, &name).await {
                Ok(number) => println!("Submission {} recorded for {}", number, name.trim()),
                Err(e) => {
                    eprint!("{}", render::render_session(&session));
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
