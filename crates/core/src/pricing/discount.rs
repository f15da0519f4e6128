use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::discount::{DiscountRule, DiscountRuleId};
use crate::domain::rental::RentalDuration;
use crate::domain::vehicle::Vehicle;
use crate::locale::{localize, Locale};

pub const MONTHLY_SPECIAL_LABEL: &str = "Monthly Special";
pub const MONTHLY_SPECIAL_LABEL_AR: &str = "عرض شهري خاص";
pub const WEEKLY_SPECIAL_LABEL: &str = "Weekly Special";
pub const WEEKLY_SPECIAL_LABEL_AR: &str = "عرض أسبوعي خاص";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rule_id", rename_all = "snake_case")]
pub enum DiscountSource {
    None,
    VehicleMonthly,
    VehicleWeekly,
    Rule(DiscountRuleId),
}

/// The single discount that applies to a rental. `percent` is a fraction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDiscount {
    pub percent: Decimal,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ar: Option<String>,
    pub source: DiscountSource,
}

impl ResolvedDiscount {
    pub fn none() -> Self {
        Self {
            percent: Decimal::ZERO,
            label: String::new(),
            label_ar: None,
            source: DiscountSource::None,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.percent > Decimal::ZERO
    }

    pub fn label(&self, locale: Locale) -> &str {
        localize(&self.label, self.label_ar.as_deref(), locale)
    }

    /// Whole percentage for display, e.g. `10` for a 0.1 fraction.
    pub fn whole_percent(&self) -> Decimal {
        (self.percent * Decimal::ONE_HUNDRED).round()
    }

    fn from_vehicle(percent: Decimal, label: &str, label_ar: &str, source: DiscountSource) -> Self {
        Self {
            percent: percent / Decimal::ONE_HUNDRED,
            label: label.to_string(),
            label_ar: Some(label_ar.to_string()),
            source,
        }
    }
}

fn positive(percent: Option<Decimal>) -> Option<Decimal> {
    percent.filter(|value| *value > Decimal::ZERO)
}

/// Resolves which discount applies to `vehicle` for `duration`.
///
/// Order, first match wins:
/// 1. 30+ days and a positive vehicle monthly discount.
/// 2. 7+ days and a positive vehicle weekly discount.
/// 3. The global rule with the largest `min_days` that the duration reaches.
///
/// Vehicle-level offers beat global rules even when a rule pays more.
pub fn resolve(
    duration: RentalDuration,
    vehicle: &Vehicle,
    rules: &[DiscountRule],
) -> ResolvedDiscount {
    let days = duration.days();

    if days >= RentalDuration::MONTH {
        if let Some(percent) = positive(vehicle.monthly_discount) {
            return ResolvedDiscount::from_vehicle(
                percent,
                MONTHLY_SPECIAL_LABEL,
                MONTHLY_SPECIAL_LABEL_AR,
                DiscountSource::VehicleMonthly,
            );
        }
    }

    if days >= RentalDuration::WEEK {
        if let Some(percent) = positive(vehicle.weekly_discount) {
            return ResolvedDiscount::from_vehicle(
                percent,
                WEEKLY_SPECIAL_LABEL,
                WEEKLY_SPECIAL_LABEL_AR,
                DiscountSource::VehicleWeekly,
            );
        }
    }

    let mut ordered: Vec<&DiscountRule> = rules.iter().collect();
    ordered.sort_by(|left, right| right.min_days.cmp(&left.min_days));

    ordered.into_iter().find(|rule| rule.min_days <= days).map_or_else(
        ResolvedDiscount::none,
        |rule| ResolvedDiscount {
            percent: rule.percentage_off,
            label: rule.label.clone(),
            label_ar: rule.label_ar.clone(),
            source: DiscountSource::Rule(rule.id.clone()),
        },
    )
}
