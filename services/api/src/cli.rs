use crate::batch::{run_classify, run_explain, run_rules, ClassifyArgs, ExplainArgs, RulesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use role_classifier::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "role-classifier",
    about = "Label job postings with a role category using prioritized title and skills rules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Label every row of a CSV file of job postings
    Classify(ClassifyArgs),
    /// Print the active rule book in priority order
    Rules(RulesArgs),
    /// Show which patterns fire for a single title and skills pair
    Explain(ExplainArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load rules from this JSON file instead of ROLE_RULES_PATH
    #[arg(long)]
    pub(crate) rules: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Classify(args) => run_classify(args),
        Command::Rules(args) => run_rules(args),
        Command::Explain(args) => run_explain(args),
    }
}
