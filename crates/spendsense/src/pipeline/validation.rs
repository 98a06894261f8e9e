use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::domain::{PurchaseItem, PurchaseRequest, RawPurchaseRequest};

/// Validation errors raised by the input validator. Every variant names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: String },
    #[error("{field} must be a number, got {found}")]
    NotNumeric { field: String, found: &'static str },
    #[error("{field} is outside the supported numeric range")]
    OutOfRange { field: String },
    #[error("{field} cannot be negative (got {value})")]
    Negative { field: String, value: Decimal },
    #[error("{field} must be greater than 0 (got {value})")]
    NotPositive { field: String, value: Decimal },
    #[error("{field} must be {expected}")]
    Malformed {
        field: String,
        expected: &'static str,
    },
    #[error("{field} must contain at least one purchase item")]
    NoItems { field: String },
    #[error("{field} must be a string, got {found}")]
    NotText { field: String, found: &'static str },
    #[error("{field} cannot be empty or whitespace")]
    EmptyName { field: String },
    #[error("{field} is too long (max {max} characters, got {length})")]
    NameTooLong {
        field: String,
        max: usize,
        length: usize,
    },
}

impl ValidationError {
    /// Path of the field that failed, e.g. `monthly_income` or `items[1].cost`.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::NotNumeric { field, .. }
            | ValidationError::OutOfRange { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::Malformed { field, .. }
            | ValidationError::NoItems { field }
            | ValidationError::NotText { field, .. }
            | ValidationError::EmptyName { field }
            | ValidationError::NameTooLong { field, .. } => field,
        }
    }
}

const DEFAULT_MAX_ITEM_NAME_CHARS: usize = 200;

/// Limits applied while validating requests.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    max_item_name_chars: usize,
}

impl ValidationPolicy {
    pub fn new(max_item_name_chars: usize) -> Self {
        let sanitized = if max_item_name_chars > 0 {
            max_item_name_chars
        } else {
            DEFAULT_MAX_ITEM_NAME_CHARS
        };

        Self {
            max_item_name_chars: sanitized,
        }
    }

    pub fn max_item_name_chars(&self) -> usize {
        self.max_item_name_chars
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEM_NAME_CHARS)
    }
}

/// Whether zero is an acceptable amount for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountRule {
    Positive,
    NonNegative,
}

/// Sole gate between raw caller input and the rest of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    policy: ValidationPolicy,
}

impl InputValidator {
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Convert a raw request into a validated [`PurchaseRequest`].
    ///
    /// Fields are checked in a fixed order (income, expenses, savings, items) and the first
    /// failure is returned. No rounding or unit conversion is applied.
    pub fn validate(&self, raw: &RawPurchaseRequest) -> Result<PurchaseRequest, ValidationError> {
        let monthly_income = parse_amount(
            "monthly_income",
            raw.monthly_income.as_ref(),
            AmountRule::Positive,
        )?;
        let fixed_expenses = parse_amount(
            "fixed_expenses",
            raw.fixed_expenses.as_ref(),
            AmountRule::NonNegative,
        )?;
        let savings_goal = parse_amount(
            "savings_goal",
            raw.savings_goal.as_ref(),
            AmountRule::NonNegative,
        )?;

        let mut items = Vec::new();
        for entry in raw_items(raw)? {
            let name = self.validate_name(&entry.name_field, entry.name)?;
            let cost = parse_amount(&entry.cost_field, entry.cost, AmountRule::Positive)?;
            items.push(PurchaseItem { name, cost });
        }

        let total_cost = items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.cost))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "items".to_string(),
            })?;

        Ok(PurchaseRequest::new(
            monthly_income,
            fixed_expenses,
            savings_goal,
            items,
            total_cost,
        ))
    }

    fn validate_name(&self, field: &str, value: Option<&Value>) -> Result<String, ValidationError> {
        let raw = match value {
            None | Some(Value::Null) => {
                return Err(ValidationError::Missing {
                    field: field.to_string(),
                })
            }
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(ValidationError::NotText {
                    field: field.to_string(),
                    found: json_kind(other),
                })
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName {
                field: field.to_string(),
            });
        }

        let length = trimmed.chars().count();
        if length > self.policy.max_item_name_chars {
            return Err(ValidationError::NameTooLong {
                field: field.to_string(),
                max: self.policy.max_item_name_chars,
                length,
            });
        }

        Ok(trimmed.to_string())
    }
}

struct RawItemRef<'a> {
    name_field: String,
    cost_field: String,
    name: Option<&'a Value>,
    cost: Option<&'a Value>,
}

fn raw_items(raw: &RawPurchaseRequest) -> Result<Vec<RawItemRef<'_>>, ValidationError> {
    match (&raw.items, &raw.planned_purchase) {
        (Some(items), _) if !items.is_null() => item_list(items),
        (_, Some(purchase)) if !purchase.is_null() => {
            planned_purchase(purchase).map(|item| vec![item])
        }
        _ => Err(ValidationError::Missing {
            field: "items".to_string(),
        }),
    }
}

fn item_list(items: &Value) -> Result<Vec<RawItemRef<'_>>, ValidationError> {
    let entries = items.as_array().ok_or_else(|| ValidationError::Malformed {
        field: "items".to_string(),
        expected: "a list of {name, cost} objects",
    })?;

    if entries.is_empty() {
        return Err(ValidationError::NoItems {
            field: "items".to_string(),
        });
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object = entry.as_object().ok_or_else(|| ValidationError::Malformed {
                field: format!("items[{index}]"),
                expected: "an object with name and cost",
            })?;
            Ok(RawItemRef {
                name_field: format!("items[{index}].name"),
                cost_field: format!("items[{index}].cost"),
                name: object.get("name"),
                cost: object.get("cost"),
            })
        })
        .collect()
}

fn planned_purchase(purchase: &Value) -> Result<RawItemRef<'_>, ValidationError> {
    let object: &Map<String, Value> =
        purchase.as_object().ok_or_else(|| ValidationError::Malformed {
            field: "planned_purchase".to_string(),
            expected: "an object with item and cost",
        })?;

    let (name_field, name) = match object.get("item") {
        Some(value) => ("planned_purchase.item", Some(value)),
        None => ("planned_purchase.name", object.get("name")),
    };

    Ok(RawItemRef {
        name_field: name_field.to_string(),
        cost_field: "planned_purchase.cost".to_string(),
        name,
        cost: object.get("cost"),
    })
}

fn parse_amount(
    field: &str,
    value: Option<&Value>,
    rule: AmountRule,
) -> Result<Decimal, ValidationError> {
    let value = match value {
        None | Some(Value::Null) => {
            return Err(ValidationError::Missing {
                field: field.to_string(),
            })
        }
        Some(value) => value,
    };

    let amount = match value {
        Value::Number(number) => {
            decimal_from_text(&number.to_string()).ok_or_else(|| ValidationError::OutOfRange {
                field: field.to_string(),
            })?
        }
        Value::String(text) => {
            decimal_from_text(text.trim()).ok_or_else(|| ValidationError::NotNumeric {
                field: field.to_string(),
                found: "non-numeric string",
            })?
        }
        other => {
            return Err(ValidationError::NotNumeric {
                field: field.to_string(),
                found: json_kind(other),
            })
        }
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: amount,
        });
    }

    if rule == AmountRule::Positive && amount.is_zero() {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value: amount,
        });
    }

    Ok(amount.normalize())
}

fn decimal_from_text(text: &str) -> Option<Decimal> {
    let numeric_chars = |c: char| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-');
    if text.is_empty() || !text.chars().all(numeric_chars) {
        return None;
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn numeric_strings_are_coerced_without_rounding() {
        assert_eq!(
            parse_amount(
                "savings_goal",
                Some(&json!(" 500.125 ")),
                AmountRule::NonNegative
            ),
            Ok(dec!(500.125))
        );
    }

    #[test]
    fn scientific_notation_numbers_are_accepted() {
        assert_eq!(
            parse_amount("monthly_income", Some(&json!(1e3)), AmountRule::Positive),
            Ok(dec!(1000))
        );
    }

    #[test]
    fn negative_zero_is_treated_as_zero() {
        let result = parse_amount("fixed_expenses", Some(&json!("-0")), AmountRule::NonNegative);
        assert_eq!(result, Ok(Decimal::ZERO));
    }

    #[test]
    fn policy_falls_back_to_default_limit() {
        assert_eq!(
            ValidationPolicy::new(0).max_item_name_chars(),
            DEFAULT_MAX_ITEM_NAME_CHARS
        );
    }
}
