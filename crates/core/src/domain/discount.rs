use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscountRuleId(pub String);

/// Global duration-keyed discount. `percentage_off` is already a fraction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    pub id: DiscountRuleId,
    pub min_days: u32,
    pub percentage_off: Decimal,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ar: Option<String>,
}

impl DiscountRule {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.min_days == 0 {
            return Err(DomainError::InvariantViolation(format!(
                "discount rule `{}` min_days must be at least 1",
                self.id.0
            )));
        }
        if self.percentage_off < Decimal::ZERO || self.percentage_off > Decimal::ONE {
            return Err(DomainError::InvariantViolation(format!(
                "discount rule `{}` percentage_off must be a fraction in 0..=1",
                self.id.0
            )));
        }
        Ok(())
    }
}

/// Keeps a rule list ordered by ascending threshold, the order it is stored
/// and displayed in.
pub fn sort_rules(rules: &mut [DiscountRule]) {
    rules.sort_by_key(|rule| rule.min_days);
}
