pub mod currency;
pub mod discount;
pub mod quote;

pub use currency::DisplayCurrency;
pub use discount::{resolve, DiscountSource, ResolvedDiscount};
pub use quote::{
    quote, DeterministicPricingEngine, PricingEngine, PricingTraceStep, Quote, QuoteRequest,
    QuotedExtra,
};
