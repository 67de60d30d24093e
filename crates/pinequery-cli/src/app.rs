//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pinequery")]
#[command(
    author,
    version,
    about = "Natural-language search over Pinecone with LLM-generated filters"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Language-model provider
    #[arg(long, global = true, default_value = "gemini")]
    pub provider: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a query into a metadata filter
    Parse(QueryArgs),

    /// Search records matching a query
    Search(TargetArgs),

    /// Answer a query from retrieved records
    Ask(TargetArgs),

    /// List supported language-model providers
    Providers,

    /// Start HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct QueryArgs {
    /// Natural-language query
    #[arg(required = true)]
    pub query: Vec<String>,
}

#[derive(Args)]
pub struct TargetArgs {
    /// Natural-language query
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Index name (defaults to PINECONE_INDEX_NAME)
    #[arg(short, long)]
    pub index: Option<String>,

    /// Namespace (defaults to PINECONE_NAMESPACE)
    #[arg(short, long)]
    pub namespace: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
