use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// USD → AED peg used for display.
pub const AED_PER_USD: Decimal = Decimal::from_parts(367, 0, 0, false, 2);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayCurrency {
    #[default]
    Usd,
    Aed,
}

impl DisplayCurrency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Aed => "AED",
        }
    }

    /// Converts a USD amount. AED is rounded to whole dirhams and saturates
    /// at `Decimal::MAX`, USD passes through untouched.
    pub fn convert(&self, amount_usd: Decimal) -> Decimal {
        match self {
            Self::Usd => amount_usd,
            Self::Aed => amount_usd
                .saturating_mul(AED_PER_USD)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    pub fn format(&self, amount_usd: Decimal) -> String {
        let whole = self
            .convert(amount_usd)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        match self {
            Self::Usd => format!("${}", group_thousands(whole)),
            Self::Aed => format!("AED {}", group_thousands(whole)),
        }
    }
}

impl std::str::FromStr for DisplayCurrency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "AED" => Ok(Self::Aed),
            other => Err(format!("unsupported display currency `{other}` (expected USD|AED)")),
        }
    }
}

fn group_thousands(whole: Decimal) -> String {
    let raw = whole.trunc().abs().to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (index, digit) in raw.chars().enumerate() {
        if index > 0 && (raw.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if whole.is_sign_negative() && !whole.is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}
