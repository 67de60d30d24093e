//! Providers command

use crate::app::OutputFormat;
use anyhow::Result;
use pinequery_core::{Config, ProviderRegistry};

pub fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let providers = ProviderRegistry::with_defaults().available();

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "supported_providers": providers,
                "model": config.llm.model,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Cli => {
            for provider in providers {
                println!("{}", provider);
            }
        }
    }
    Ok(())
}
