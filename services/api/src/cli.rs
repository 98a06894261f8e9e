use crate::demo::{run_demo, DemoArgs};
use crate::evaluate::{run_evaluate, run_interactive, EvaluateArgs, InteractiveArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use spendsense::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SpendSense",
    about = "Evaluate the financial risk of a planned purchase, or serve the evaluation API",
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
    /// Evaluate one purchase from flags, a CSV item list or a JSON request
    Evaluate(EvaluateArgs),
    /// Prompt for a purchase on stdin and evaluate it, repeatedly
    Interactive(InteractiveArgs),
    /// Run the reference scenarios in rule-only mode
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Interactive(args) => run_interactive(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_when_no_subcommand_is_given() {
        let cli = Cli::try_parse_from(["spendsense-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_repeated_items() {
        let cli = Cli::try_parse_from([
            "spendsense-api",
            "evaluate",
            "--income",
            "5000",
            "--expenses",
            "1500",
            "--savings",
            "500",
            "--item",
            "Laptop=1000",
            "--item",
            "Dock=200",
            "--rule-only",
            "--format",
            "json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.item.len(), 2);
                assert!(args.rule_only);
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_items_without_a_cost() {
        let result = Cli::try_parse_from(["spendsense-api", "evaluate", "--item", "Laptop"]);
        assert!(result.is_err());
    }
}
