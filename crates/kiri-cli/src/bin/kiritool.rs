use clap::{Parser, Subcommand};

use kiri_cli::commands::{config_ops, features_ops, tokenize_ops};
use kiri_cli::trace_init::init_tracing;
use kiri_core::segmenter::Mode;

#[derive(Parser)]
#[command(name = "kiritool", about = "Search-oriented re-segmentation diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment every sentence of a recorded lattice dump
    Tokenize {
        /// Path to the lattice dump (JSON array or JSON lines)
        dump_file: String,
        /// Path to a settings TOML file (default: embedded settings)
        #[arg(long)]
        config: Option<String>,
        /// Override the segmentation mode (normal, search, extended)
        #[arg(long)]
        mode: Option<Mode>,
        /// Keep one-character punctuation tokens
        #[arg(long)]
        keep_punctuation: bool,
        /// Output one JSON object per token
        #[arg(long)]
        json: bool,
    },

    /// Parse a feature record and show the attributes it resolves to
    Features {
        /// Comma-separated feature record, as the analyzer reports it
        record: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the effective settings
    Config {
        /// Path to a settings TOML file to validate and show
        #[arg(long)]
        config: Option<String>,
        /// Print the embedded default settings file verbatim
        #[arg(long, conflicts_with = "config")]
        defaults: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Tokenize {
            dump_file,
            config,
            mode,
            keep_punctuation,
            json,
        } => {
            let opts = tokenize_ops::TokenizeOptions {
                config: config.as_deref(),
                mode,
                keep_punctuation,
                json,
            };
            tokenize_ops::tokenize(&dump_file, &opts);
        }
        Command::Features { record, json } => features_ops::features_cmd(&record, json),
        Command::Config { config, defaults } => {
            if defaults {
                config_ops::settings_export();
            } else {
                config_ops::settings_show(config.as_deref());
            }
        }
    }
}
