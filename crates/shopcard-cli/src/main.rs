mod cards;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopcard_core::Template;
use tracing_subscriber::EnvFilter;

use crate::cards::{read_product, write_output, CardContext};

#[derive(Debug, Parser)]
#[command(name = "shopcard")]
#[command(about = "Generate promotional product cards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the marketing description for a product
    Describe {
        /// Path to a product JSON file
        #[arg(long)]
        product: PathBuf,
    },
    /// Print the layout plan for a card as JSON
    Plan {
        /// Path to a product JSON file
        #[arg(long)]
        product: PathBuf,
        /// Template name (defaults to the profile's first template)
        #[arg(long, value_parser = parse_template)]
        template: Option<Template>,
    },
    /// Render one card to an SVG file
    Render {
        /// Path to a product JSON file
        #[arg(long)]
        product: PathBuf,
        #[arg(long, value_parser = parse_template)]
        template: Option<Template>,
        /// Where to write the SVG
        #[arg(long)]
        output: PathBuf,
    },
    /// Render several templates and write them as one download
    Pack {
        /// Path to a product JSON file
        #[arg(long)]
        product: PathBuf,
        /// Comma-separated template names (defaults to the profile's list)
        #[arg(long, value_delimiter = ',', value_parser = parse_template)]
        templates: Vec<Template>,
        /// Where to write the SVG (one template) or zip archive
        #[arg(long)]
        output: PathBuf,
    },
}

fn parse_template(value: &str) -> Result<Template, String> {
    Template::from_keyword(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = shopcard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let context = CardContext::from_config(&config)?;

    match cli.command {
        Commands::Describe { product } => {
            let product = read_product(&product)?;
            let description = context.describe(&product).await?;
            tracing::debug!(source = ?description.source, "description resolved");
            println!("{}", description.text);
        }
        Commands::Plan { product, template } => {
            let product = read_product(&product)?;
            let plan = context.plan(&product, template).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Render {
            product,
            template,
            output,
        } => {
            let product = read_product(&product)?;
            let svg = context.render(&product, template).await?;
            write_output(&output, svg)?;
            println!("wrote {}", output.display());
        }
        Commands::Pack {
            product,
            templates,
            output,
        } => {
            let product = read_product(&product)?;
            let download = context.pack(&product, templates).await?;
            write_output(&output, download.bytes)?;
            println!("wrote {} to {}", download.file_name, output.display());
        }
    }

    Ok(())
}
