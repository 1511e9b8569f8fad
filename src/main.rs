use clap::{Parser, Subcommand};
use prism::config::Config;
use prism::handlers::Handlers;
use prism_common::OperationOutput;
use prism_guide::{GenerateOptions, SplitStrategy};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prism", about = "Match designs to a component catalog and generate code")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server exposing all operations
    Serve {
        #[arg(long, default_value_t = 4310)]
        port: u16,
    },
    /// Scan the component repository and load the catalog
    ScanCatalog,
    /// Match a design URL against the catalog
    Analyze { design_url: String },
    /// Generate a full implementation guide for a design URL
    Guide { design_url: String },
    /// Show details for one catalog component
    Component { name: String },
    /// Generate a React component from a design URL
    Generate {
        design_url: String,
        #[arg(long)]
        component_name: Option<String>,
        #[arg(long)]
        javascript: bool,
        #[arg(long)]
        comments: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let handlers = Arc::new(Handlers::from_config(&config)?);

    let result = match cli.command {
        Command::Serve { port } => {
            prism::server::serve(handlers, port).await?;
            return Ok(());
        }
        Command::ScanCatalog => handlers.scan_catalog().await,
        Command::Analyze { design_url } => handlers.analyze_design(&design_url).await,
        Command::Guide { design_url } => handlers.generate_guide(&design_url).await,
        Command::Component { name } => handlers.get_component(&name).await,
        Command::Generate {
            design_url,
            component_name,
            javascript,
            comments,
        } => {
            let options = GenerateOptions {
                component_name,
                include_typescript: !javascript,
                include_comments: comments,
                split_strategy: SplitStrategy::Auto,
            };
            handlers.generate_code(&design_url, &options).await
        }
    };

    let output = result.unwrap_or_else(|err| OperationOutput::error(err.to_string()));

    for warning in &output.warnings {
        tracing::warn!("{}", warning);
    }
    println!("{}", output.text);

    if output.is_error {
        std::process::exit(1);
    }
    Ok(())
}
