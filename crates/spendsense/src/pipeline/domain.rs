use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Purchase evaluation request exactly as supplied by a caller, before validation.
///
/// Every field is kept as loose JSON so the validator can report which field failed and why
/// instead of surfacing a generic deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPurchaseRequest {
    #[serde(default)]
    pub monthly_income: Option<Value>,
    #[serde(default)]
    pub fixed_expenses: Option<Value>,
    #[serde(default)]
    pub savings_goal: Option<Value>,
    #[serde(default)]
    pub items: Option<Value>,
    /// Single-item form `{ "item": ..., "cost": ... }` accepted for older callers.
    #[serde(default)]
    pub planned_purchase: Option<Value>,
}

impl RawPurchaseRequest {
    /// Convenience constructor used by shells that already hold typed values.
    pub fn from_parts<I>(
        monthly_income: impl Into<Value>,
        fixed_expenses: impl Into<Value>,
        savings_goal: impl Into<Value>,
        items: I,
    ) -> Self
    where
        I: IntoIterator<Item = RawPurchaseItem>,
    {
        let items = items
            .into_iter()
            .map(|item| {
                let mut entry = serde_json::Map::new();
                entry.insert("name".to_string(), item.name);
                entry.insert("cost".to_string(), item.cost);
                Value::Object(entry)
            })
            .collect();

        Self {
            monthly_income: Some(monthly_income.into()),
            fixed_expenses: Some(fixed_expenses.into()),
            savings_goal: Some(savings_goal.into()),
            items: Some(Value::Array(items)),
            planned_purchase: None,
        }
    }
}

/// One unvalidated `{name, cost}` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPurchaseItem {
    pub name: Value,
    pub cost: Value,
}

impl RawPurchaseItem {
    pub fn new(name: impl Into<Value>, cost: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            cost: cost.into(),
        }
    }
}

/// A validated line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub name: String,
    pub cost: Decimal,
}

/// Validated, immutable purchase evaluation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseRequest {
    monthly_income: Decimal,
    fixed_expenses: Decimal,
    savings_goal: Decimal,
    items: Vec<PurchaseItem>,
    total_cost: Decimal,
}

impl PurchaseRequest {
    pub(crate) fn new(
        monthly_income: Decimal,
        fixed_expenses: Decimal,
        savings_goal: Decimal,
        items: Vec<PurchaseItem>,
        total_cost: Decimal,
    ) -> Self {
        Self {
            monthly_income,
            fixed_expenses,
            savings_goal,
            items,
            total_cost,
        }
    }

    pub fn monthly_income(&self) -> Decimal {
        self.monthly_income
    }

    pub fn fixed_expenses(&self) -> Decimal {
        self.fixed_expenses
    }

    pub fn savings_goal(&self) -> Decimal {
        self.savings_goal
    }

    pub fn items(&self) -> &[PurchaseItem] {
        &self.items
    }

    /// Sum of all item costs.
    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    /// Human readable label for the purchase, e.g. `Laptop` or `Laptop, Dock (+1 more)`.
    pub fn purchase_label(&self) -> String {
        match self.items.as_slice() {
            [] => "purchase".to_string(),
            [only] => only.name.clone(),
            [first, second] => format!("{}, {}", first.name, second.name),
            [first, second, rest @ ..] => {
                format!("{}, {} (+{} more)", first.name, second.name, rest.len())
            }
        }
    }
}

/// Financial facts derived once per evaluation from a validated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialFacts {
    pub monthly_income: Decimal,
    pub fixed_expenses: Decimal,
    pub savings_goal: Decimal,
    pub total_cost: Decimal,
    /// Saturates at `Decimal::MIN` when expenses plus savings fall outside the decimal range.
    pub disposable_income: Decimal,
    /// `None` when disposable income is zero or negative, or when a cost at or above income
    /// makes the share too large to represent.
    pub percentage_of_disposable: Option<Decimal>,
    pub remaining_after_purchase: Decimal,
}

impl FinancialFacts {
    pub fn has_disposable_income(&self) -> bool {
        self.disposable_income > Decimal::ZERO
    }
}

/// Why the rule evaluator refused to tier a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HardStopReason {
    InsufficientDisposableIncome,
    CostExceedsIncome,
}

impl HardStopReason {
    pub const fn code(self) -> &'static str {
        match self {
            HardStopReason::InsufficientDisposableIncome => "INSUFFICIENT_DISPOSABLE_INCOME",
            HardStopReason::CostExceedsIncome => "COST_EXCEEDS_INCOME",
        }
    }

    /// Detail sentence explaining the stop in terms of the request's own numbers.
    pub fn detail(self, facts: &FinancialFacts) -> String {
        match self {
            HardStopReason::InsufficientDisposableIncome => {
                let committed = facts
                    .fixed_expenses
                    .checked_add(facts.savings_goal)
                    .map(|sum| format!("{sum:.2}"))
                    .unwrap_or_else(|| "beyond supported range".to_string());
                format!(
                    "no disposable income available (income {:.2}, expenses + savings {})",
                    facts.monthly_income, committed
                )
            }
            HardStopReason::CostExceedsIncome => format!(
                "purchase cost ({:.2}) meets or exceeds monthly income ({:.2})",
                facts.total_cost, facts.monthly_income
            ),
        }
    }
}

/// Rule-based risk classification. `HardStop` is terminal and bypasses tiering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    HardStop { reason: HardStopReason },
}

impl RiskLevel {
    pub const fn code(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::HardStop { .. } => "HARD_STOP",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::HardStop { .. } => "Hard Stop",
        }
    }

    pub const fn is_hard_stop(self) -> bool {
        matches!(self, RiskLevel::HardStop { .. })
    }

    pub const fn hard_stop_reason(self) -> Option<HardStopReason> {
        match self {
            RiskLevel::HardStop { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Risk band derived independently from the confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub const fn code(self) -> &'static str {
        match self {
            ScoreBand::Low => "LOW",
            ScoreBand::Medium => "MEDIUM",
            ScoreBand::High => "HIGH",
        }
    }

    /// Display colour used by presentation layers.
    pub const fn color(self) -> &'static str {
        match self {
            ScoreBand::Low => "green",
            ScoreBand::Medium => "yellow",
            ScoreBand::High => "red",
        }
    }

    /// Whether this band tells the same story as the rule classification. A hard stop only
    /// agrees with the top band.
    pub const fn agrees_with(self, risk: RiskLevel) -> bool {
        matches!(
            (self, risk),
            (ScoreBand::Low, RiskLevel::Low)
                | (ScoreBand::Medium, RiskLevel::Medium)
                | (ScoreBand::High, RiskLevel::High)
                | (ScoreBand::High, RiskLevel::HardStop { .. })
        )
    }
}

/// Continuous affordability score in `[0, 1]` plus its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfidenceScore {
    pub value: Decimal,
    pub band: ScoreBand,
}

/// Where an explanation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningMode {
    Remote,
    Fallback,
}

impl ReasoningMode {
    pub const fn label(self) -> &'static str {
        match self {
            ReasoningMode::Remote => "remote",
            ReasoningMode::Fallback => "fallback",
        }
    }
}

/// Natural-language explanation with ordered alternative suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub text: String,
    pub alternatives: Vec<String>,
    pub mode: ReasoningMode,
}
