use spendsense::pipeline::DecisionReport;
use std::fmt::Write as _;

/// Plain-text rendering of a report for terminal output.
pub(crate) fn render_report(report: &DecisionReport) -> String {
    let view = report.view();
    let analysis = &view.financial_analysis;
    let risk = &view.risk_assessment;
    let mut out = String::new();

    let generated = view.generated_at.format("%Y-%m-%d %H:%M UTC");
    writeln!(&mut out, "\nPurchase evaluation ({generated})").expect("write report");

    writeln!(&mut out, "\nFinancial analysis").expect("write report");
    writeln!(&mut out, "- Monthly income: {:.2}", analysis.monthly_income).expect("write report");
    writeln!(&mut out, "- Fixed expenses: {:.2}", analysis.fixed_expenses).expect("write report");
    writeln!(&mut out, "- Savings goal: {:.2}", analysis.savings_goal).expect("write report");
    writeln!(&mut out, "- Disposable income: {:.2}", analysis.disposable_income)
        .expect("write report");
    for item in &analysis.items {
        writeln!(&mut out, "- Item {}: {:.2}", item.name, item.cost).expect("write report");
    }
    writeln!(&mut out, "- Total cost: {:.2}", analysis.total_cost).expect("write report");
    writeln!(
        &mut out,
        "- Remaining after purchase: {:.2}",
        analysis.remaining_after_purchase
    )
    .expect("write report");

    writeln!(&mut out, "\nRisk assessment").expect("write report");
    writeln!(&mut out, "- Risk level: {} ({})", risk.risk_level, risk.risk_label)
        .expect("write report");
    if let Some(detail) = &analysis.hard_stop_detail {
        writeln!(&mut out, "- Hard stop: {detail}").expect("write report");
    }
    let share = match risk.percentage_of_disposable {
        Some(pct) => format!("{pct}%"),
        None => "n/a (no disposable income)".to_string(),
    };
    writeln!(&mut out, "- Share of disposable income: {share}").expect("write report");
    writeln!(
        &mut out,
        "- Affordability score: {} ({} band, {})",
        risk.confidence_score,
        risk.score_band.code(),
        risk.score_color
    )
    .expect("write report");
    if !risk.classification_agreement {
        writeln!(
            &mut out,
            "- Note: the score band differs from the rule-based risk level; the rule level is authoritative"
        )
        .expect("write report");
    }

    writeln!(
        &mut out,
        "\nExplanation ({} reasoning)\n{}",
        view.ai_reasoning.mode.label(),
        view.ai_reasoning.explanation
    )
    .expect("write report");

    writeln!(&mut out, "\nAlternatives").expect("write report");
    for alternative in &view.ai_reasoning.alternatives {
        writeln!(&mut out, "- {alternative}").expect("write report");
    }

    let decision = &view.final_decision;
    writeln!(&mut out, "\nSummary: {}", decision.summary).expect("write report");
    writeln!(&mut out, "\nNext steps").expect("write report");
    for (index, step) in decision.next_steps.iter().enumerate() {
        writeln!(&mut out, "{}. {step}", index + 1).expect("write report");
    }
    writeln!(&mut out, "\n{}", decision.recommendation).expect("write report");

    out
}
