//! Query commands: parse, search and ask

use crate::app::{OutputFormat, QueryArgs, TargetArgs};
use crate::output;
use anyhow::{anyhow, Result};
use pinequery_core::{AgentFactory, Config, QueryAgent};

pub async fn run_parse(
    args: QueryArgs,
    config: &Config,
    provider: &str,
    format: OutputFormat,
) -> Result<()> {
    let query = args.query.join(" ");
    let agent = load_agent(config, provider)?;

    let outcome = agent.process_query(&query).await?;

    print!("{}", output::format_outcome(&outcome, format)?);
    Ok(())
}

pub async fn run_search(
    args: TargetArgs,
    config: &Config,
    provider: &str,
    format: OutputFormat,
) -> Result<()> {
    let query = args.query.join(" ");
    let (index, namespace) = resolve_target(&args, config)?;
    let agent = load_agent(config, provider)?;

    let records = agent.search_records(&query, &index, &namespace).await?;

    print!("{}", output::format_records(&records, format)?);
    Ok(())
}

pub async fn run_ask(
    args: TargetArgs,
    config: &Config,
    provider: &str,
    format: OutputFormat,
) -> Result<()> {
    let query = args.query.join(" ");
    let (index, namespace) = resolve_target(&args, config)?;
    let agent = load_agent(config, provider)?;

    let answer = agent.generate_answer(&query, &index, &namespace).await?;
    if answer.is_none() && format == OutputFormat::Cli {
        eprintln!("No supporting records found.");
    }

    print!("{}", output::format_answer(&query, answer.as_deref(), format)?);
    Ok(())
}

fn load_agent(config: &Config, provider: &str) -> Result<QueryAgent> {
    let factory = AgentFactory::from_config(config)?;
    let agent = factory.agent(provider)?;
    tracing::debug!(provider = agent.provider(), model = %config.llm.model, "agent ready");
    Ok(agent)
}

fn resolve_target(args: &TargetArgs, config: &Config) -> Result<(String, String)> {
    let index = args
        .index
        .clone()
        .or_else(|| config.search.default_index.clone())
        .ok_or_else(|| anyhow!("No index given. Use --index or set PINECONE_INDEX_NAME."))?;
    let namespace = args
        .namespace
        .clone()
        .or_else(|| config.search.default_namespace.clone())
        .unwrap_or_default();
    Ok((index, namespace))
}
