pub mod cli;
pub mod condition;
pub mod config;
pub mod editor;
pub mod session;

use crate::condition::{Catalog, Selection, suggest};
use anyhow::Context;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde_json::json;
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Commands, OutputFormat, cli_parse};
pub use condition::{
    Column, ColumnType, Condition, Operator, OperatorCatalog, Value, decode, encode,
    is_valid_condition,
};
pub use config::{EditorConfig, load_config};
pub use editor::{ConditionListController, ConditionSink, FieldUpdate, RowEditor, RowState};
pub use session::{Session, run_session};

/// Install the stderr log subscriber; `RUST_LOG` overrides the verbosity flag
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn validity_label(valid: bool) -> colored::ColoredString {
    if valid {
        "valid".green()
    } else {
        "invalid".red()
    }
}

fn print_columns(catalog: &Catalog, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Column", "Type", "Operators"]);
            for column in catalog.columns() {
                let operators = catalog
                    .operators()
                    .allowed_for(column.column_type)
                    .iter()
                    .map(|op| op.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                table.add_row(vec![
                    column.name.clone(),
                    column.column_type.to_string(),
                    operators,
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&json!({
                "columns": catalog.columns(),
                "operators": catalog.operators(),
            }))
            .context("Failed to serialize catalog")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn print_decoded(text: &str, catalog: &Catalog, format: OutputFormat) -> anyhow::Result<bool> {
    let condition = decode(text, catalog);
    let valid = is_valid_condition(&condition, catalog);

    match format {
        OutputFormat::Text => {
            let slot = |s: Option<String>| s.unwrap_or_else(|| "-".dimmed().to_string());
            println!("column:    {}", slot(condition.column.clone()));
            println!(
                "operator:  {}",
                slot(condition.operator.map(|op| op.to_string()))
            );
            println!(
                "value:     {}",
                slot(condition.value.as_ref().map(|v| v.to_string()))
            );
            println!("canonical: {}", encode(&condition));
            println!("status:    {}", validity_label(valid));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&json!({
                "condition": condition,
                "canonical": encode(&condition),
                "valid": valid,
            }))
            .context("Failed to serialize condition")?;
            println!("{}", json);
        }
    }
    Ok(valid)
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = cli_parse();
    init_tracing(cli.verbose);

    let editor_config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    let catalog = editor_config.catalog();
    tracing::info!(
        profile = %editor_config.profile_name,
        columns = catalog.columns().len(),
        "catalog ready"
    );

    match &cli.command {
        Commands::Columns => print_columns(&catalog, cli.format)?,
        Commands::Decode { text } => {
            print_decoded(text, &catalog, cli.format)?;
        }
        Commands::Validate { text } => {
            if !print_decoded(text, &catalog, cli.format)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Suggest {
            text,
            column,
            operator,
        } => {
            let selection = Selection::new(column.clone(), *operator);
            let suggestions = suggest(text, &selection, &catalog);
            match cli.format {
                OutputFormat::Text => {
                    if suggestions.is_empty() {
                        println!("(no suggestions)");
                    }
                    for suggestion in &suggestions {
                        println!("{}", suggestion.label);
                    }
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&suggestions)
                        .context("Failed to serialize suggestions")?;
                    println!("{}", json);
                }
            }
        }
        Commands::Session { script } => {
            let mut session = Session::new(catalog);
            let stdout = io::stdout().lock();
            match script {
                Some(path) => {
                    let file = File::open(path).with_context(|| {
                        format!("Failed to open session script '{}'", path.display())
                    })?;
                    run_session(&mut session, BufReader::new(file), stdout)
                        .context("Session failed")?;
                }
                None => {
                    run_session(&mut session, io::stdin().lock(), stdout)
                        .context("Session failed")?;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
