use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Percentage-of-disposable-income ceilings for the tiered classification.
///
/// A purchase at exactly a ceiling stays in the lower tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub low_ceiling_pct: Decimal,
    pub medium_ceiling_pct: Decimal,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_ceiling_pct: dec!(30),
            medium_ceiling_pct: dec!(60),
        }
    }
}
