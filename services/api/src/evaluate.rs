use crate::infra::{build_orchestrator, parse_item};
use crate::render::render_report;
use clap::{Args, ValueEnum};
use serde_json::Value;
use spendsense::config::AppConfig;
use spendsense::error::AppError;
use spendsense::pipeline::{
    items_from_csv_path, DecisionOrchestrator, EvaluationOptions, PipelineError, RawPurchaseItem,
    RawPurchaseRequest,
};
use spendsense::telemetry;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// Monthly income after tax
    #[arg(long)]
    pub(crate) income: Option<String>,
    /// Fixed monthly expenses (rent, utilities, subscriptions)
    #[arg(long)]
    pub(crate) expenses: Option<String>,
    /// Amount to set aside for savings this month
    #[arg(long)]
    pub(crate) savings: Option<String>,
    /// Purchase item as NAME=COST (repeatable)
    #[arg(long, value_parser = parse_item)]
    pub(crate) item: Vec<RawPurchaseItem>,
    /// CSV file with `name,cost` columns appended to the item list
    #[arg(long)]
    pub(crate) items_csv: Option<PathBuf>,
    /// Raw JSON request file, or `-` for stdin. Overrides the other input flags.
    #[arg(long, conflicts_with_all = ["income", "expenses", "savings", "item", "items_csv"])]
    pub(crate) json: Option<String>,
    /// Skip the remote reasoning service
    #[arg(long)]
    pub(crate) rule_only: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug, Default)]
pub(crate) struct InteractiveArgs {
    /// Skip the remote reasoning service
    #[arg(long)]
    pub(crate) rule_only: bool,
}

fn options(rule_only: bool) -> EvaluationOptions {
    if rule_only {
        EvaluationOptions::rule_only()
    } else {
        EvaluationOptions::default()
    }
}

fn prepare() -> Result<DecisionOrchestrator, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    build_orchestrator(&config)
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let orchestrator = prepare()?;
    let raw = raw_request_from_args(&args)?;

    match orchestrator.evaluate(&raw, options(args.rule_only)).await {
        Ok(report) => {
            match args.format {
                OutputFormat::Text => print!("{}", render_report(&report)),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report.view())?)
                }
            }
            Ok(())
        }
        Err(error) => {
            if args.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&error.failure_view())?);
            }
            Err(error.into())
        }
    }
}

pub(crate) fn raw_request_from_args(args: &EvaluateArgs) -> Result<RawPurchaseRequest, AppError> {
    if let Some(source) = &args.json {
        let text = if source == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            std::fs::read_to_string(source)?
        };
        return Ok(serde_json::from_str(&text)?);
    }

    let mut items = args.item.clone();
    if let Some(path) = &args.items_csv {
        items.extend(items_from_csv_path(path)?);
    }

    Ok(RawPurchaseRequest::from_parts(
        args.income.clone(),
        args.expenses.clone(),
        args.savings.clone(),
        items,
    ))
}

pub(crate) async fn run_interactive(args: InteractiveArgs) -> Result<(), AppError> {
    let orchestrator = prepare()?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("SpendSense interactive evaluation");
    println!("Enter amounts as plain numbers. Finish the item list with an empty line.");

    loop {
        let Some(raw) = prompt_request(&mut lines)? else {
            return Ok(());
        };

        match orchestrator.evaluate(&raw, options(args.rule_only)).await {
            Ok(report) => print!("{}", render_report(&report)),
            Err(error) => print_failure(&error),
        }

        match prompt(&mut lines, "\nEvaluate another purchase? [y/N]: ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") => {
                continue
            }
            _ => return Ok(()),
        }
    }
}

fn print_failure(error: &PipelineError) {
    let view = error.failure_view();
    match view.field {
        Some(field) => println!("\nError ({field}): {}", view.error),
        None => println!("\nError: {}", view.error),
    }
}

/// Read one request from the prompt. `None` means stdin was closed.
fn prompt_request<L>(lines: &mut L) -> Result<Option<RawPurchaseRequest>, AppError>
where
    L: Iterator<Item = io::Result<String>>,
{
    let Some(income) = prompt(lines, "\nMonthly income: ")? else {
        return Ok(None);
    };
    let Some(expenses) = prompt(lines, "Fixed expenses: ")? else {
        return Ok(None);
    };
    let Some(savings) = prompt(lines, "Savings goal: ")? else {
        return Ok(None);
    };

    let mut items = Vec::new();
    loop {
        let label = format!("Item {} (NAME=COST, empty to finish): ", items.len() + 1);
        match prompt(lines, &label)? {
            None => return Ok(None),
            Some(entry) if entry.is_empty() => break,
            Some(entry) => match parse_item(&entry) {
                Ok(item) => items.push(item),
                Err(message) => println!("  {message}"),
            },
        }
    }

    Ok(Some(RawPurchaseRequest::from_parts(
        Value::String(income),
        Value::String(expenses),
        Value::String(savings),
        items,
    )))
}

fn prompt<L>(lines: &mut L, label: &str) -> Result<Option<String>, AppError>
where
    L: Iterator<Item = io::Result<String>>,
{
    print!("{label}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}
