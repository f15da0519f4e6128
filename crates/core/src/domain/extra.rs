use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::locale::{localize, Locale};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtraId(pub String);

/// Flat-priced add-on that can be attached to any rental.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingExtra {
    pub id: ExtraId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
}

impl BookingExtra {
    pub fn display_name(&self, locale: Locale) -> &str {
        localize(&self.name, self.name_ar.as_deref(), locale)
    }
}
