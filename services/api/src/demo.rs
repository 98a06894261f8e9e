use crate::render::render_report;
use clap::Args;
use spendsense::error::AppError;
use spendsense::pipeline::{
    DecisionOrchestrator, EvaluationOptions, RawPurchaseItem, RawPurchaseRequest,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the full text report for every scenario
    #[arg(long)]
    pub(crate) full: bool,
}

pub(crate) struct DemoScenario {
    pub(crate) title: &'static str,
    pub(crate) request: RawPurchaseRequest,
}

fn scenario(
    title: &'static str,
    income: f64,
    expenses: f64,
    savings: f64,
    item: &str,
    cost: f64,
) -> DemoScenario {
    DemoScenario {
        title,
        request: RawPurchaseRequest::from_parts(
            income,
            expenses,
            savings,
            [RawPurchaseItem::new(item, cost)],
        ),
    }
}

pub(crate) fn scenarios() -> Vec<DemoScenario> {
    vec![
        scenario("Moderate purchase", 5000.0, 1500.0, 500.0, "Laptop", 1200.0),
        scenario("Overcommitted budget", 3000.0, 2800.0, 500.0, "Sofa", 2000.0),
        scenario("Small purchase", 6000.0, 2000.0, 1000.0, "Bike", 800.0),
        scenario("Invalid income", -5000.0, 1500.0, 500.0, "Phone", 600.0),
        scenario(
            "Large purchase without remote reasoning",
            6000.0,
            2000.0,
            1000.0,
            "Television",
            2500.0,
        ),
    ]
}

/// Runs every scenario through a rule-only orchestrator so no network access is needed.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let orchestrator = DecisionOrchestrator::rule_only();

    println!("SpendSense decision pipeline demo (rule-only)");
    for (index, scenario) in scenarios().into_iter().enumerate() {
        println!("\n{}. {}", index + 1, scenario.title);
        match orchestrator
            .evaluate(&scenario.request, EvaluationOptions::rule_only())
            .await
        {
            Ok(report) => {
                let view = report.view();
                let pct = view
                    .risk_assessment
                    .percentage_of_disposable
                    .map(|pct| format!("{pct}%"))
                    .unwrap_or_else(|| "n/a".to_string());
                println!(
                    "   risk {} | score {} ({}) | disposable {:.2} | share {} | reasoning {}",
                    view.risk_assessment.risk_level,
                    view.risk_assessment.confidence_score,
                    view.risk_assessment.score_band.code(),
                    view.financial_analysis.disposable_income,
                    pct,
                    view.ai_reasoning.mode.label()
                );
                if let Some(detail) = &view.financial_analysis.hard_stop_detail {
                    println!("   hard stop: {detail}");
                }
                if args.full {
                    print!("{}", render_report(&report));
                }
            }
            Err(error) => {
                let view = error.failure_view();
                println!(
                    "   status {} ({}) | {}",
                    view.status, view.error_kind, view.error
                );
            }
        }
    }

    Ok(())
}
