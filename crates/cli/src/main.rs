use crate::{
    commands::{Commands, FilterCommand},
    error::CliError,
};
use clap::Parser;
use compiler::Compiler;
use connectors::{
    FilterStore, HttpFilterStore, HttpQueryExecutor, QueryExecutor, StoreConfig,
};
use model::{FilterId, NewCustomFilter, Pipeline, catalog};
use std::{process::ExitCode, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "filterbuilder",
    version = "0.1.0",
    about = "Compile and run visual filter pipelines"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Filter store base URL (overrides FILTER_STORE_URL)"
    )]
    store_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match cli.store_url {
        Some(url) => StoreConfig::from_env().with_base_url(url),
        None => StoreConfig::from_env(),
    };

    match cli.command {
        Commands::Compile {
            pipeline,
            query,
            report,
        } => {
            let pipeline = load_pipeline(&pipeline).await?;
            let compiler = Compiler::new(open_store(&config)?);
            let compiled = compiler.compile(&pipeline).await;

            if !compiled.is_clean() {
                warn!("{} step(s) were skipped", compiled.issues.len());
            }

            if report {
                output::print_json(&compiled)?;
            } else if query {
                output::print_json(&compiled.into_query())?;
            } else {
                output::print_json(&compiled.expression)?;
            }
        }
        Commands::Run { pipeline } => {
            let pipeline = load_pipeline(&pipeline).await?;
            let compiler = Compiler::new(open_store(&config)?);
            let query = compiler.compile(&pipeline).await.into_query();

            if query.is_empty() {
                warn!("Pipeline has no complete steps, running an unfiltered query");
            }

            let executor = HttpQueryExecutor::new(&config)?;
            let results = executor.run_query(&query).await?;
            info!("Query returned {} document(s)", results.len());
            output::print_json(&results)?;
        }
        Commands::Filters { command } => {
            let store = open_store(&config)?;
            manage_filters(store.as_ref(), command).await?;
        }
        Commands::Operators { search } => {
            let operators = catalog::search(search.as_deref().unwrap_or_default());
            output::print_operators(&operators);
        }
        Commands::Fields { search } => {
            let fields = catalog::fields::search_fields(search.as_deref().unwrap_or_default());
            output::print_fields(&fields);
        }
    }

    Ok(())
}

async fn manage_filters(store: &dyn FilterStore, command: FilterCommand) -> Result<(), CliError> {
    match command {
        FilterCommand::List { search } => {
            let query = search.unwrap_or_default();
            let filters: Vec<_> = store
                .list_filters()
                .await?
                .into_iter()
                .filter(|filter| filter.matches_label(&query))
                .collect();
            output::print_filters(&filters);
        }
        FilterCommand::Get { id } => {
            let filter = store.get_filter(&FilterId::from(id)).await?;
            output::print_json(&filter)?;
        }
        FilterCommand::Save { pipeline, label } => {
            let pipeline = load_pipeline(&pipeline).await?;
            let payload = NewCustomFilter::from_pipeline(&label, &pipeline)?;
            let id = store.save_filter(&payload).await?;
            println!("{id}");
        }
        FilterCommand::Delete { id } => {
            let id = FilterId::from(id);
            store.delete_filter(&id).await?;
            info!("Filter {} deleted", id);
        }
    }

    Ok(())
}

async fn load_pipeline(path: &str) -> Result<Pipeline, CliError> {
    let source = tokio::fs::read_to_string(path).await?;
    let pipeline: Pipeline = serde_json::from_str(&source)?;
    info!("Loaded pipeline with {} step(s) from {}", pipeline.len(), path);
    Ok(pipeline)
}

fn open_store(config: &StoreConfig) -> Result<Arc<dyn FilterStore>, CliError> {
    Ok(Arc::new(HttpFilterStore::new(config.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_global_store_url() {
        let cli = Cli::try_parse_from([
            "filterbuilder",
            "filters",
            "get",
            "--id",
            "65a1",
            "--store-url",
            "http://filters:5001",
        ])
        .unwrap();

        assert_eq!(cli.store_url.as_deref(), Some("http://filters:5001"));
        assert!(matches!(
            cli.command,
            Commands::Filters {
                command: FilterCommand::Get { ref id }
            } if id == "65a1"
        ));
    }

    #[test]
    fn test_report_and_query_conflict() {
        let parsed = Cli::try_parse_from([
            "filterbuilder",
            "compile",
            "--pipeline",
            "p.json",
            "--query",
            "--report",
        ]);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_load_pipeline_normalizes_connectors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"steps": [
                {{"id": "a", "field": "rb", "kind": "range", "operator": "gt", "value": "0.5"}},
                {{"id": "b", "field": "drb", "kind": "range", "operator": "lt", "value": "0.9"}}
            ], "operators": []}}"#
        )
        .unwrap();

        let pipeline = load_pipeline(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.connectors(), &[model::Connector::And]);
    }

    #[tokio::test]
    async fn test_missing_pipeline_file_is_read_error() {
        let err = load_pipeline("/nonexistent/pipeline.json").await.unwrap_err();
        assert!(matches!(err, CliError::PipelineRead(_)));
    }
}
