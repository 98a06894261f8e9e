use std::fmt::Write as _;

use super::ReasoningRequest;

/// Fixed instruction set sent with every remote request. Guardrails are enforced only
/// through these instructions; the reply text is not filtered.
pub const SYSTEM_PROMPT: &str = "You are a budgeting decision assistant helping users understand the risk of a planned purchase.

GUARDRAILS:
- Do NOT provide financial, tax, investment, or credit advice.
- Do NOT tell the user to buy or not to buy; explain the risk and suggest alternatives only.
- Do NOT make assumptions about the user's future income or circumstances.
- Do NOT contradict the risk level computed by the rules; explain it.
- Be conservative, clear, and concise. Avoid jargon.

Reply with a single JSON object and nothing else, using exactly these fields:
{\"decision\": \"<risk level code>\", \"confidence_score\": <number between 0 and 1>, \"explanation\": \"<plain text>\", \"alternatives\": [\"<suggestion>\", ...]}";

/// Render the per-request prompt containing the financial facts and computed risk.
pub fn build_user_prompt(input: &ReasoningRequest<'_>) -> String {
    let facts = input.facts;
    let mut prompt = String::new();

    writeln!(&mut prompt, "User financial situation:").expect("write prompt");
    writeln!(&mut prompt, "- Monthly income: {:.2}", facts.monthly_income).expect("write prompt");
    writeln!(&mut prompt, "- Fixed expenses: {:.2}", facts.fixed_expenses).expect("write prompt");
    writeln!(&mut prompt, "- Savings goal: {:.2}", facts.savings_goal).expect("write prompt");
    writeln!(
        &mut prompt,
        "- Disposable income (after expenses and savings): {:.2}",
        facts.disposable_income
    )
    .expect("write prompt");

    writeln!(&mut prompt, "\nPlanned purchase:").expect("write prompt");
    for item in input.request.items() {
        writeln!(&mut prompt, "- {}: {:.2}", item.name, item.cost).expect("write item");
    }
    writeln!(&mut prompt, "- Total cost: {:.2}", facts.total_cost).expect("write prompt");

    writeln!(&mut prompt, "\nRisk assessment (computed by deterministic rules):")
        .expect("write prompt");
    writeln!(
        &mut prompt,
        "- Risk level: {} ({})",
        input.risk.code(),
        input.risk.label()
    )
    .expect("write prompt");
    if let Some(reason) = input.risk.hard_stop_reason() {
        writeln!(
            &mut prompt,
            "- Hard stop: {} ({})",
            reason.code(),
            reason.detail(facts)
        )
        .expect("write hard stop");
    }
    let share = match facts.percentage_of_disposable {
        Some(pct) => format!("{pct:.1}%"),
        None if facts.has_disposable_income() => "beyond the representable range".to_string(),
        None => "unbounded (no disposable income)".to_string(),
    };
    writeln!(&mut prompt, "- Share of disposable income: {share}").expect("write prompt");
    writeln!(&mut prompt, "- Affordability score: {}", input.score.value).expect("write prompt");

    writeln!(&mut prompt, "\nTask:").expect("write prompt");
    writeln!(
        &mut prompt,
        "1. Explain why this purchase is classified as {}.",
        input.risk.code()
    )
    .expect("write prompt");
    writeln!(&mut prompt, "2. List the key financial risks.").expect("write prompt");
    writeln!(
        &mut prompt,
        "3. Suggest 2-3 lower-risk alternatives (e.g. waiting, buying used, cheaper options)."
    )
    .expect("write prompt");
    prompt.push_str(
        "Remember: do not tell the user to buy or not buy. Explain the situation and let them decide.",
    );

    prompt
}
