mod cli;
mod command;
mod error;

use error::WrapErr;

use autofocus::{AutoFocus, ClientConfig, ListTagsParams};
use clap::CommandFactory;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("autofocus={level},afsearch={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &cli::Cli) -> error::Result<ClientConfig> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?.with_api_key_override(
            std::env::var(config::constants::API_KEY_ENV).ok(),
        ),
        None => ClientConfig::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> error::Result<()> {
    color_eyre::install()?;

    let command_line = cli::Cli::parse();
    init_tracing(command_line.verbose);

    let Some(command) = command_line.command.as_ref() else {
        cli::Cli::command().print_help()?;
        return Ok(());
    };

    let cfg = load_config(&command_line).context("Load configuration error")?;
    let client = AutoFocus::from_config(&cfg).context("Create AutoFocus client error")?;

    let cmd: Box<dyn command::Command> = match command {
        cli::Commands::Samples(args) => Box::new(command::SearchCommand::new(
            client,
            cli::Resource::Samples,
            args.clone(),
        )),
        cli::Commands::Sessions(args) => Box::new(command::SearchCommand::new(
            client,
            cli::Resource::Sessions,
            args.clone(),
        )),
        cli::Commands::Raw { resource, query, limit } => Box::new(
            command::RawSearchCommand::new(client, *resource, query.clone(), *limit),
        ),
        cli::Commands::Tags {
            scope,
            sort_by,
            order,
            page_size,
            page_num,
        } => Box::new(command::ListTagsCommand::new(
            client,
            ListTagsParams {
                scope: scope.clone(),
                sort_by: sort_by.clone(),
                order: *order,
                page_size: *page_size,
                page_num: *page_num,
            },
        )),
        cli::Commands::Tag { name } => Box::new(command::TagCommand::new(client, name.clone())),
        cli::Commands::Sample { hash } => {
            Box::new(command::SampleCommand::new(client, hash.clone()))
        }
        cli::Commands::Analysis {
            sha256,
            sections,
            platforms,
        } => Box::new(command::AnalysisCommand::new(
            client,
            sha256.clone(),
            sections.clone(),
            platforms.clone(),
        )),
    };
    cmd.execute().await?;

    Ok(())
}
