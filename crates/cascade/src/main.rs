//! Cascade CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(version = cascade_util::cli_version())]
#[command(about = "Compile Sass/SCSS assets to CSS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a stylesheet and rewrite its relative URLs
    Compile {
        /// Input stylesheet (.scss/.sass)
        input: String,

        /// Write output to FILE (defaults to the input with a .css extension)
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Embed a source map in the compiled output
        #[arg(long)]
        source_map: bool,

        /// Silence transformer warnings
        #[arg(long)]
        quiet: bool,

        /// Silence warnings from dependency stylesheets
        #[arg(long)]
        quiet_deps: bool,

        /// Output style (expanded, compact, nested, compressed)
        #[arg(long)]
        style: Option<String>,

        /// Additional load path (repeatable; entries may be ;/,-delimited)
        #[arg(long)]
        load_path: Vec<String>,

        /// Browserslist query enabling autoprefixing via postcss
        #[arg(long)]
        autoprefix: Option<String>,

        /// Directory containing the sass/postcss binaries
        #[arg(long)]
        tool_dir: Option<String>,

        /// Leave url(...) references exactly as the transformer emitted them
        #[arg(long)]
        no_rewrite_urls: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cascade=info,cascade_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            source_map,
            quiet,
            quiet_deps,
            style,
            load_path,
            autoprefix,
            tool_dir,
            no_rewrite_urls,
        } => commands::compile::execute(commands::compile::CompileArgs {
            input,
            output,
            source_map,
            quiet,
            quiet_deps,
            style,
            load_paths: load_path,
            autoprefix,
            tool_dir,
            no_rewrite_urls,
        }),
    }
}
