pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handoff;
pub mod locale;
pub mod pricing;

pub use catalog::{facets, filter_and_sort, CatalogFacets, CatalogFilter, Selection};
pub use domain::booking::{Booking, BookingId, BookingOverview, BookingStatus};
pub use domain::discount::{DiscountRule, DiscountRuleId};
pub use domain::extra::{BookingExtra, ExtraId};
pub use domain::rental::{DurationMode, RentalDuration, RentalWindow};
pub use domain::settings::{Settings, SettingsPatch};
pub use domain::user::{ProfileStats, User, UserId};
pub use domain::vehicle::{Vehicle, VehicleId, VehicleType};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use handoff::{Handoff, HandoffRequest};
pub use locale::{localize, Locale};
pub use pricing::{DisplayCurrency, PricingEngine, Quote, ResolvedDiscount};
