use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::domain::{ConfidenceScore, FinancialFacts, ScoreBand};

const SCORE_DECIMALS: u32 = 3;

/// Lower bounds of the medium and high score bands. Bands are half-open: `[0, medium)`,
/// `[medium, high)`, `[high, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBands {
    pub medium_floor: Decimal,
    pub high_floor: Decimal,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            medium_floor: dec!(0.4),
            high_floor: dec!(0.7),
        }
    }
}

impl ScoreBands {
    pub fn band_for(&self, score: Decimal) -> ScoreBand {
        if score >= self.high_floor {
            ScoreBand::High
        } else if score >= self.medium_floor {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// Reduces financial facts to a single affordability score.
///
/// Disposable income is floored at 1 before dividing, so the scorer never fails and never
/// hard-stops; that decision belongs to the rule evaluator.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    bands: ScoreBands,
}

impl ConfidenceScorer {
    pub fn new(bands: ScoreBands) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &ScoreBands {
        &self.bands
    }

    pub fn score(&self, facts: &FinancialFacts) -> ConfidenceScore {
        let value = raw_score(facts.total_cost, facts.disposable_income);
        ConfidenceScore {
            value,
            band: self.bands.band_for(value),
        }
    }
}

/// `min(1, cost / max(disposable, 1))` rounded half-to-even at three decimals.
pub fn raw_score(total_cost: Decimal, disposable_income: Decimal) -> Decimal {
    let denominator = disposable_income.max(Decimal::ONE);
    let ratio = total_cost
        .checked_div(denominator)
        .unwrap_or(Decimal::ONE)
        .min(Decimal::ONE)
        .max(Decimal::ZERO);

    ratio
        .round_dp_with_strategy(SCORE_DECIMALS, RoundingStrategy::MidpointNearestEven)
        .normalize()
}
