//! CLI entry point for whisky review embeddings.
//!
//! Loads the reviews and word vectors named in the settings, builds the
//! embedding table in memory and answers one query per invocation.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use whiskyvec::display::{
    create_description_table, create_neighbors_table, create_report_table, create_terms_table,
    format_resolution,
};
use whiskyvec::io::{ExitCode, JsonResponse, OutputFormat, ResponseMeta, load_reviews, load_word_vectors};
use whiskyvec::{
    Attribute, BuildError, CorpusMode, LoadError, Pipeline, PipelineOptions, QueryError, Settings,
    training_corpus,
};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Whisky review embeddings
#[derive(Parser)]
#[command(
    name = "whiskyvec",
    version = env!("CARGO_PKG_VERSION"),
    about = "Find similar whiskies and describe them in tasting vocabulary",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Set up .whiskyvec directory with default configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,

    /// List the items most similar to NAME
    #[command(
        after_help = "Examples:\n  whiskyvec similar \"ardbeg 10\"\n  whiskyvec similar argbed --attribute nos -n 5\n  whiskyvec similar lagavulin --min-count 1 --json"
    )]
    Similar {
        /// Item name; typos and partial names are resolved
        name: String,

        /// Attribute to compare on: nos, pal, fin or ful
        #[arg(short, long, default_value = "ful")]
        attribute: Attribute,

        /// Ranks to consider (the item itself takes the first)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Minimum number of reviews behind a listed item
        #[arg(long)]
        min_count: Option<usize>,
    },

    /// Describe NAME with the vocabulary closest to its nose, palate and finish
    Describe {
        name: String,

        /// Ranks to consider per attribute (the top term is skipped)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// List vocabulary terms closest to TOKEN
    Terms {
        token: String,

        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Print the word2vec training corpus, one sentence per line
    Corpus {
        /// One sentence per review instead of per attribute
        #[arg(long)]
        whole_review: bool,
    },

    /// Build the table and print what happened to the input reviews
    Stats,
}

/// Exit code for an error that reached the CLI edge.
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if let Some(e) = error.downcast_ref::<QueryError>() {
        ExitCode::from_query_error(e)
    } else if let Some(e) = error.downcast_ref::<LoadError>() {
        ExitCode::from_load_error(e)
    } else if let Some(e) = error.downcast_ref::<BuildError>() {
        ExitCode::from_build_error(e)
    } else if error.downcast_ref::<figment::Error>().is_some() {
        ExitCode::ConfigError
    } else {
        ExitCode::GeneralError
    }
}

fn error_response(error: &anyhow::Error) -> JsonResponse {
    if let Some(e) = error.downcast_ref::<QueryError>() {
        JsonResponse::from_query_error(e)
    } else if let Some(e) = error.downcast_ref::<LoadError>() {
        JsonResponse::from_load_error(e)
    } else if let Some(e) = error.downcast_ref::<BuildError>() {
        JsonResponse::from_build_error(e)
    } else {
        JsonResponse::error(exit_code_for(error), &format!("{error:#}"), vec![])
    }
}

fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    match &cli.config {
        Some(path) => Settings::load_from(path)
            .map_err(|e| anyhow::Error::from(*e))
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => {
            if !matches!(cli.command, Commands::Init { .. }) {
                if let Err(warning) = Settings::check_init() {
                    eprintln!("Warning: {warning}");
                    eprintln!("Using default configuration for now.");
                }
            }
            Settings::load().map_err(|e| anyhow::Error::from(*e))
        }
    }
}

fn build_pipeline(settings: &Settings) -> anyhow::Result<Pipeline> {
    let space = load_word_vectors(&settings.data.vectors)?;
    let records = load_reviews(&settings.data.reviews)?;
    let pipeline = Pipeline::build(Arc::new(space), records, &PipelineOptions::from(settings))?;
    Ok(pipeline)
}

/// Prints `data` as a JSON envelope or via the text renderer.
fn emit<T: Serialize>(
    format: OutputFormat,
    started: Instant,
    data: T,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if format.is_json() {
        let elapsed_ms = started.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        let response = JsonResponse::success(data).with_meta(ResponseMeta::now(Some(elapsed_ms)));
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", render(&data));
    }
    Ok(())
}

fn run(cli: &Cli, settings: &Settings, format: OutputFormat) -> anyhow::Result<()> {
    let started = Instant::now();

    match &cli.command {
        Commands::Init { force } => {
            let path = Settings::init_config_file(".", *force)
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            emit(format, started, path, |path| {
                format!(
                    "Created configuration file at: {}\nEdit this file to customize your settings.",
                    path.display()
                )
            })
        }

        Commands::Config => {
            if format.is_json() {
                emit(format, started, settings, |_| "Current configuration".to_string())
            } else {
                println!("Current Configuration:");
                println!("{}", "=".repeat(50));
                println!("{}", toml::to_string_pretty(settings)?);
                Ok(())
            }
        }

        Commands::Similar {
            name,
            attribute,
            limit,
            min_count,
        } => {
            let pipeline = build_pipeline(settings)?;
            let result = pipeline.most_similar(
                name,
                *attribute,
                limit.unwrap_or(settings.query.top_n),
                min_count.unwrap_or(settings.query.min_count),
            )?;
            emit(format, started, result, |result| {
                format!(
                    "Most similar to {} by {}:\n{}",
                    format_resolution(name, &result.resolution),
                    result.attribute.label(),
                    create_neighbors_table(result)
                )
            })
        }

        Commands::Describe { name, limit } => {
            let pipeline = build_pipeline(settings)?;
            let description =
                pipeline.describe(name, limit.unwrap_or(settings.query.describe_n))?;
            emit(format, started, description, |description| {
                format!(
                    "Tasting vocabulary for {}:\n{}",
                    format_resolution(name, &description.resolution),
                    create_description_table(description)
                )
            })
        }

        Commands::Terms { token, limit } => {
            let pipeline = build_pipeline(settings)?;
            let matches = pipeline.similar_terms(token, *limit)?;
            emit(format, started, matches, |matches| {
                format!("Terms closest to '{token}':\n{}", create_terms_table(matches))
            })
        }

        Commands::Corpus { whole_review } => {
            let records = load_reviews(&settings.data.reviews)?;
            let mode = if *whole_review {
                CorpusMode::WholeReview
            } else {
                CorpusMode::PerAttribute
            };
            let corpus = training_corpus(&records, mode);
            tracing::info!("{} training sentences from {} reviews", corpus.len(), records.len());
            emit(format, started, corpus, |corpus| {
                corpus
                    .iter()
                    .map(|sentence| sentence.join(" "))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }

        Commands::Stats => {
            let pipeline = build_pipeline(settings)?;
            emit(format, started, pipeline.report().clone(), |report| {
                format!("Build summary:\n{}", create_report_table(report))
            })
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let format = OutputFormat::from_json_flag(cli.json);

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            std::process::exit(ExitCode::ConfigError.into());
        }
    };

    init_logging(settings.debug);

    if let Err(error) = run(&cli, &settings, format) {
        let code = exit_code_for(&error);

        if format.is_json() {
            match serde_json::to_string_pretty(&error_response(&error)) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Error: {error:#} ({e})"),
            }
        } else {
            eprintln!("Error: {error:#}");
            let suggestions = error_response(&error)
                .error
                .map(|details| details.suggestions)
                .unwrap_or_default();
            for suggestion in suggestions {
                eprintln!("  - {suggestion}");
            }
        }

        std::process::exit(code.into());
    }
}
