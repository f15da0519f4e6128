use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::discount::DiscountRule;
use crate::domain::extra::{BookingExtra, ExtraId};
use crate::domain::rental::RentalDuration;
use crate::domain::vehicle::{Vehicle, VehicleId};
use crate::pricing::discount::{resolve, ResolvedDiscount};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedExtra {
    pub id: ExtraId,
    pub name: String,
    pub price: Decimal,
}

/// Ephemeral price breakdown, all amounts in USD.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub vehicle_id: VehicleId,
    pub duration_days: u32,
    pub day_rate: Decimal,
    pub base_price: Decimal,
    pub discount: ResolvedDiscount,
    pub discount_amount: Decimal,
    pub extras: Vec<QuotedExtra>,
    pub extras_total: Decimal,
    pub total: Decimal,
    pub trace: Vec<PricingTraceStep>,
}

#[derive(Clone, Copy, Debug)]
pub struct QuoteRequest<'a> {
    pub vehicle: &'a Vehicle,
    pub duration: RentalDuration,
    pub extra_ids: &'a [ExtraId],
    pub extra_catalog: &'a [BookingExtra],
    pub rules: &'a [DiscountRule],
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, request: &QuoteRequest<'_>) -> Quote;
}

#[derive(Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, request: &QuoteRequest<'_>) -> Quote {
        let discount = resolve(request.duration, request.vehicle, request.rules);
        quote(request.vehicle, request.duration, request.extra_ids, request.extra_catalog, discount)
    }
}

/// Prices a rental with an already resolved discount. Unknown extra ids are
/// skipped. No rounding happens here; display rounding lives in
/// [`crate::pricing::currency`]. Arithmetic saturates at `Decimal::MAX`, so
/// unvalidated stored rates cannot abort a request.
pub fn quote(
    vehicle: &Vehicle,
    duration: RentalDuration,
    extra_ids: &[ExtraId],
    extra_catalog: &[BookingExtra],
    discount: ResolvedDiscount,
) -> Quote {
    let days = duration.days();
    let base_price = vehicle.price_per_day.saturating_mul(Decimal::from(days));
    let discount_amount = base_price.saturating_mul(discount.percent);

    let extras: Vec<QuotedExtra> = extra_ids
        .iter()
        .filter_map(|id| extra_catalog.iter().find(|extra| &extra.id == id))
        .map(|extra| QuotedExtra {
            id: extra.id.clone(),
            name: extra.name.clone(),
            price: extra.price,
        })
        .collect();
    let extras_total =
        extras.iter().fold(Decimal::ZERO, |sum, extra| sum.saturating_add(extra.price));
    let total = base_price.saturating_sub(discount_amount).saturating_add(extras_total);

    let mut trace = vec![PricingTraceStep {
        stage: "base".to_string(),
        detail: format!("price_per_day {} * {days} days", vehicle.price_per_day),
        amount: base_price,
    }];
    if discount.is_applied() {
        trace.push(PricingTraceStep {
            stage: "discount".to_string(),
            detail: format!("{} ({}% off)", discount.label, discount.whole_percent()),
            amount: -discount_amount,
        });
    }
    for extra in &extras {
        trace.push(PricingTraceStep {
            stage: "extra".to_string(),
            detail: extra.name.clone(),
            amount: extra.price,
        });
    }
    trace.push(PricingTraceStep {
        stage: "total".to_string(),
        detail: "base - discount + extras".to_string(),
        amount: total,
    });

    Quote {
        vehicle_id: vehicle.id.clone(),
        duration_days: days,
        day_rate: vehicle.price_per_day,
        base_price,
        discount,
        discount_amount,
        extras,
        extras_total,
        total,
        trace,
    }
}
