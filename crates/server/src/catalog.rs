//! Public catalog surface.
//!
//! - `GET  /api/v1/catalog`                  - filtered list, recommended first
//! - `GET  /api/v1/catalog/facets`           - brand/type/year dropdown values
//! - `GET  /api/v1/vehicles/{id}`            - one vehicle, localized view included
//! - `GET  /api/v1/vehicles/{id}/quote`      - price breakdown for a duration
//! - `GET  /api/v1/vehicles/{id}/inquiry`    - quick enquiry deep link
//! - `POST /api/v1/vehicles/{id}/handoff`    - booking message and deep link
//! - `POST /api/v1/recommendations`          - assistant suggestions
//! - `GET  /api/v1/settings`                 - site settings
//! - `GET  /api/v1/extras`                   - bookable extras

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use qcars_agent::Recommendation;
use qcars_core::catalog::{facets, filter_and_sort, CatalogFacets, CatalogFilter, Selection};
use qcars_core::domain::extra::{BookingExtra, ExtraId};
use qcars_core::domain::rental::{DurationMode, RentalDuration, RentalWindow};
use qcars_core::domain::settings::Settings;
use qcars_core::domain::vehicle::{Vehicle, VehicleId};
use qcars_core::errors::DomainError;
use qcars_core::handoff::{self, Handoff, HandoffRequest};
use qcars_core::locale::Locale;
use qcars_core::pricing::{DisplayCurrency, Quote, QuoteRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub brand: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub year: Option<String>,
    pub search: Option<String>,
    pub lang: Option<String>,
    /// Comma separated ids, usually the last recommendation.
    pub recommended: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub locale: Locale,
    pub total: usize,
    pub active_filters: usize,
    pub vehicles: Vec<Vehicle>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub lang: Option<String>,
}

/// Vehicle fields resolved for one locale, ready for the details page.
#[derive(Debug, Serialize)]
pub struct VehicleDisplay {
    pub locale: Locale,
    pub direction: &'static str,
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub description: String,
    pub features: Vec<String>,
    pub gallery: Vec<String>,
}

impl VehicleDisplay {
    fn new(vehicle: &Vehicle, locale: Locale) -> Self {
        Self {
            locale,
            direction: locale.direction(),
            name: vehicle.display_name(locale).to_string(),
            brand: vehicle.display_brand(locale).to_string(),
            vehicle_type: vehicle.display_type(locale).to_string(),
            description: vehicle.display_description(locale).to_string(),
            features: vehicle.display_features(locale).to_vec(),
            gallery: vehicle.gallery_images().into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleDetail {
    pub vehicle: Vehicle,
    pub display: VehicleDisplay,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteQuery {
    pub days: Option<i64>,
    pub mode: Option<String>,
    pub quantity: Option<u32>,
    /// Comma separated extra ids.
    pub extras: Option<String>,
    pub currency: Option<String>,
}

/// Amounts rendered in the display currency. The quote itself stays in USD.
#[derive(Debug, Serialize)]
pub struct QuoteDisplay {
    pub day_rate: String,
    pub base_price: String,
    pub discount_amount: String,
    pub extras_total: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub currency: DisplayCurrency,
    pub quote: Quote,
    pub display: QuoteDisplay,
}

#[derive(Debug, Deserialize)]
pub struct HandoffBody {
    pub start_date: NaiveDate,
    pub days: Option<i64>,
    pub mode: Option<String>,
    pub quantity: Option<u32>,
    #[serde(default)]
    pub extras: Vec<ExtraId>,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HandoffResponse {
    #[serde(flatten)]
    pub handoff: Handoff,
    pub quote: Quote,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationBody {
    pub prompt: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/catalog", get(list_catalog))
        .route("/api/v1/catalog/facets", get(catalog_facets))
        .route("/api/v1/vehicles/{id}", get(vehicle_detail))
        .route("/api/v1/vehicles/{id}/quote", get(vehicle_quote))
        .route("/api/v1/vehicles/{id}/inquiry", get(vehicle_inquiry))
        .route("/api/v1/vehicles/{id}/handoff", post(vehicle_handoff))
        .route("/api/v1/recommendations", post(recommend))
        .route("/api/v1/settings", get(public_settings))
        .route("/api/v1/extras", get(list_extras))
        .with_state(state)
}

async fn list_catalog(
    Query(query): Query<CatalogQuery>,
    State(state): State<AppState>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let locale = parse_locale(query.lang.as_deref())?;
    let filter = CatalogFilter {
        brand: Selection::<String>::parse_text(query.brand.as_deref()),
        vehicle_type: Selection::<String>::parse_text(query.vehicle_type.as_deref()),
        year: Selection::<u16>::parse_year(query.year.as_deref()).map_err(ApiError::bad_request)?,
        search: query.search.unwrap_or_default(),
    };
    let recommended: Vec<VehicleId> =
        split_list(query.recommended.as_deref()).map(VehicleId).collect();

    let catalog = state.catalog().await?;
    let vehicles: Vec<Vehicle> =
        filter_and_sort(&catalog, &filter, &recommended, locale).into_iter().cloned().collect();

    Ok(Json(CatalogResponse {
        locale,
        total: vehicles.len(),
        active_filters: filter.active_count(),
        vehicles,
    }))
}

async fn catalog_facets(
    Query(query): Query<LocaleQuery>,
    State(state): State<AppState>,
) -> Result<Json<CatalogFacets>, ApiError> {
    let locale = parse_locale(query.lang.as_deref())?;
    let catalog = state.catalog().await?;
    Ok(Json(facets(&catalog, locale)))
}

async fn vehicle_detail(
    Path(id): Path<String>,
    Query(query): Query<LocaleQuery>,
    State(state): State<AppState>,
) -> Result<Json<VehicleDetail>, ApiError> {
    let locale = parse_locale(query.lang.as_deref())?;
    let vehicle = load_vehicle(&state, id).await?;
    let display = VehicleDisplay::new(&vehicle, locale);
    Ok(Json(VehicleDetail { vehicle, display }))
}

async fn vehicle_quote(
    Path(id): Path<String>,
    Query(query): Query<QuoteQuery>,
    State(state): State<AppState>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let vehicle = load_vehicle(&state, id).await?;
    let (duration, _) = rental_duration(query.days, query.mode.as_deref(), query.quantity)?;
    let extra_ids: Vec<ExtraId> = split_list(query.extras.as_deref()).map(ExtraId).collect();
    let currency = match query.currency.as_deref() {
        Some(raw) => raw.parse::<DisplayCurrency>().map_err(ApiError::bad_request)?,
        None => display_currency(&state.settings.get().await?),
    };

    let extra_catalog = state.extras.list().await?;
    let rules = state.discount_rules.list().await?;
    let quote = state.pricing.price(&QuoteRequest {
        vehicle: &vehicle,
        duration,
        extra_ids: &extra_ids,
        extra_catalog: &extra_catalog,
        rules: &rules,
    });

    let display = QuoteDisplay {
        day_rate: currency.format(quote.day_rate),
        base_price: currency.format(quote.base_price),
        discount_amount: currency.format(quote.discount_amount),
        extras_total: currency.format(quote.extras_total),
        total: currency.format(quote.total),
    };
    Ok(Json(QuoteResponse { currency, quote, display }))
}

async fn vehicle_inquiry(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Handoff>, ApiError> {
    let vehicle = load_vehicle(&state, id).await?;
    let settings = state.settings.get().await?;

    let message = handoff::inquiry_message(&settings.company_name, &vehicle);
    let link = handoff::whatsapp_link(&settings.whatsapp_number, &message);
    Ok(Json(Handoff { message, link }))
}

async fn vehicle_handoff(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<HandoffBody>,
) -> Result<Json<HandoffResponse>, ApiError> {
    let locale = parse_locale(body.lang.as_deref())?;
    let vehicle = load_vehicle(&state, id).await?;
    let (duration, unit) = rental_duration(body.days, body.mode.as_deref(), body.quantity)?;
    let window = RentalWindow::starting(body.start_date, duration)?;

    let settings = state.settings.get().await?;
    let extra_catalog = state.extras.list().await?;
    let rules = state.discount_rules.list().await?;
    let quote = state.pricing.price(&QuoteRequest {
        vehicle: &vehicle,
        duration,
        extra_ids: &body.extras,
        extra_catalog: &extra_catalog,
        rules: &rules,
    });

    let handoff = handoff::prepare(&HandoffRequest {
        company_name: &settings.company_name,
        whatsapp_number: &settings.whatsapp_number,
        currency: display_currency(&settings),
        locale,
        vehicle: &vehicle,
        quote: &quote,
        window,
        duration_text: unit.map(|(mode, quantity)| mode.describe(quantity, locale)),
        extra_names: extra_names(&body.extras, &extra_catalog, locale),
    })?;

    info!(
        event_name = "catalog.handoff.prepared",
        vehicle_id = %vehicle.id.0,
        duration_days = quote.duration_days,
        total = %quote.total,
        "booking handoff prepared"
    );
    Ok(Json(HandoffResponse { handoff, quote }))
}

async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<RecommendationBody>,
) -> Result<Json<Recommendation>, ApiError> {
    let prompt = body.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::bad_request("prompt must not be blank"));
    }
    let catalog = state.catalog().await?;
    Ok(Json(state.recommendations.recommend(prompt, &catalog).await))
}

async fn public_settings(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    Ok(Json(state.settings.get().await?))
}

async fn list_extras(State(state): State<AppState>) -> Result<Json<Vec<BookingExtra>>, ApiError> {
    Ok(Json(state.extras.list().await?))
}

/// Resolves a duration from either a day count or a configurator unit and
/// quantity. A day count wins when both are given; neither means one day.
pub(crate) fn rental_duration(
    days: Option<i64>,
    mode: Option<&str>,
    quantity: Option<u32>,
) -> Result<(RentalDuration, Option<(DurationMode, u32)>), ApiError> {
    match (days, mode) {
        (Some(days), _) => Ok((RentalDuration::try_from(days)?, None)),
        (None, Some(mode)) => {
            let mode = mode.parse::<DurationMode>()?;
            let quantity = quantity.unwrap_or(1);
            if quantity == 0 || quantity > mode.max_quantity() {
                return Err(ApiError::bad_request(format!(
                    "quantity must be between 1 and {}",
                    mode.max_quantity()
                )));
            }
            Ok((mode.duration(quantity)?, Some((mode, quantity))))
        }
        (None, None) => Ok((RentalDuration::new(1)?, None)),
    }
}

async fn load_vehicle(state: &AppState, id: String) -> Result<Vehicle, ApiError> {
    let id = VehicleId(id);
    let vehicle = state.find_vehicle(&id).await?;
    vehicle.ok_or_else(|| DomainError::VehicleNotFound(id).into())
}

fn parse_locale(raw: Option<&str>) -> Result<Locale, ApiError> {
    raw.unwrap_or_default().parse::<Locale>().map_err(ApiError::bad_request)
}

fn display_currency(settings: &Settings) -> DisplayCurrency {
    settings.currency.parse::<DisplayCurrency>().unwrap_or_else(|error| {
        warn!(event_name = "catalog.currency.unsupported", error = %error, "falling back to USD");
        DisplayCurrency::Usd
    })
}

fn extra_names(ids: &[ExtraId], catalog: &[BookingExtra], locale: Locale) -> Vec<String> {
    ids.iter()
        .filter_map(|id| catalog.iter().find(|extra| &extra.id == id))
        .map(|extra| extra.display_name(locale).to_string())
        .collect()
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = String> + '_ {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        Json,
    };
    use chrono::NaiveDate;
    use qcars_core::domain::extra::ExtraId;
    use rust_decimal::Decimal;

    use super::{
        catalog_facets, list_catalog, recommend, rental_duration, vehicle_detail, vehicle_handoff,
        vehicle_quote, CatalogQuery, HandoffBody, LocaleQuery, QuoteQuery, RecommendationBody,
    };
    use crate::state::tests::{state_with_reply, test_state};

    #[tokio::test]
    async fn recommended_ids_lead_the_catalog() {
        let query = CatalogQuery {
            recommended: Some("car-camry, car-ghost".to_string()),
            ..CatalogQuery::default()
        };

        let Json(response) = list_catalog(Query(query), State(test_state())).await.expect("catalog");

        assert_eq!(response.vehicles[0].id.0, "car-camry");
        assert_eq!(response.total, response.vehicles.len());
        assert_eq!(response.active_filters, 0);
    }

    #[tokio::test]
    async fn arabic_brand_filter_uses_localized_labels() {
        let query = CatalogQuery {
            brand: Some("تويوتا".to_string()),
            lang: Some("ar".to_string()),
            ..CatalogQuery::default()
        };

        let Json(response) = list_catalog(Query(query), State(test_state())).await.expect("catalog");

        assert_eq!(response.total, 1);
        assert_eq!(response.vehicles[0].id.0, "car-camry");
    }

    #[tokio::test]
    async fn invalid_year_filter_is_a_bad_request() {
        let query = CatalogQuery { year: Some("soon".to_string()), ..CatalogQuery::default() };

        let result = list_catalog(Query(query), State(test_state())).await;

        assert_eq!(result.map(|_| ()).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn facets_list_years_newest_first() {
        let Json(facets) = catalog_facets(Query(LocaleQuery::default()), State(test_state()))
            .await
            .expect("facets");

        assert_eq!(facets.years.first(), Some(&2024));
        assert!(facets.brands.contains(&"Toyota".to_string()));
    }

    #[tokio::test]
    async fn weekly_quote_applies_the_vehicle_discount() {
        let query = QuoteQuery {
            mode: Some("weekly".to_string()),
            quantity: Some(1),
            extras: Some("extra-insurance,unknown".to_string()),
            currency: Some("usd".to_string()),
            ..QuoteQuery::default()
        };

        let Json(response) =
            vehicle_quote(Path("car-rr-sport".to_string()), Query(query), State(test_state()))
                .await
                .expect("quote");

        assert_eq!(response.quote.duration_days, 7);
        assert_eq!(response.quote.base_price, Decimal::from(3150));
        assert_eq!(response.quote.discount_amount, Decimal::from(315));
        assert_eq!(response.quote.extras_total, Decimal::from(50));
        assert_eq!(response.quote.total, Decimal::from(2885));
        assert_eq!(response.display.total, "$2,885");
    }

    #[tokio::test]
    async fn aed_quote_rounds_for_display_only() {
        let query = QuoteQuery {
            days: Some(3),
            currency: Some("aed".to_string()),
            ..QuoteQuery::default()
        };

        let Json(response) =
            vehicle_quote(Path("car-camry".to_string()), Query(query), State(test_state()))
                .await
                .expect("quote");

        assert_eq!(response.quote.total, Decimal::from(360));
        assert_eq!(response.display.total, "AED 1,321");
    }

    #[tokio::test]
    async fn oversized_day_count_is_a_bad_request() {
        let query = QuoteQuery { days: Some(1_000_000_000), ..QuoteQuery::default() };

        let result =
            vehicle_quote(Path("car-huracan".to_string()), Query(query), State(test_state())).await;

        assert_eq!(result.map(|_| ()).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn longest_rental_of_priciest_car_prices_in_aed() {
        let query = QuoteQuery {
            days: Some(4380),
            currency: Some("aed".to_string()),
            ..QuoteQuery::default()
        };

        let Json(response) =
            vehicle_quote(Path("car-huracan".to_string()), Query(query), State(test_state()))
                .await
                .expect("quote");

        assert_eq!(response.quote.base_price, Decimal::from(6_570_000));
        assert!(response.display.total.starts_with("AED "));
    }

    #[tokio::test]
    async fn arabic_detail_view_falls_back_per_field() {
        let query = LocaleQuery { lang: Some("ar".to_string()) };

        let Json(detail) =
            vehicle_detail(Path("car-camry".to_string()), Query(query), State(test_state()))
                .await
                .expect("detail");

        assert_eq!(detail.display.direction, "rtl");
        assert_eq!(detail.display.brand, "تويوتا");
        assert_eq!(detail.display.gallery.first(), Some(&detail.vehicle.image));
    }

    #[tokio::test]
    async fn unknown_vehicle_quote_is_not_found() {
        let result = vehicle_quote(
            Path("car-404".to_string()),
            Query(QuoteQuery::default()),
            State(test_state()),
        )
        .await;

        assert_eq!(result.map(|_| ()).unwrap_err().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn handoff_renders_message_and_link() {
        let body = HandoffBody {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"),
            days: None,
            mode: Some("weekly".to_string()),
            quantity: Some(1),
            extras: vec![ExtraId("extra-child-seat".to_string())],
            lang: None,
        };

        let Json(response) =
            vehicle_handoff(Path("car-rr-sport".to_string()), State(test_state()), Json(body))
                .await
                .expect("handoff");

        assert!(response.handoff.message.contains("- Duration: 1 Weeks"));
        assert!(response.handoff.message.contains("- Dates: 2026-03-01 to 2026-03-08"));
        assert!(response.handoff.message.contains("Child Seat"));
        assert!(response.handoff.message.contains("(10% OFF)"));
        assert!(response.handoff.message.contains("- Total: 10460 AED"));
        assert_eq!(response.quote.total, Decimal::from(2850));
        assert!(response.handoff.link.starts_with("https://wa.me/"));
    }

    #[tokio::test]
    async fn unavailable_vehicle_handoff_is_rejected() {
        let body = HandoffBody {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"),
            days: Some(2),
            mode: None,
            quantity: None,
            extras: Vec::new(),
            lang: None,
        };

        let result =
            vehicle_handoff(Path("car-huracan".to_string()), State(test_state()), Json(body)).await;

        assert_eq!(result.map(|_| ()).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_assistant_reply_degrades_to_fallback() {
        let state = state_with_reply("not json at all");

        let Json(recommendation) = recommend(
            State(state),
            Json(RecommendationBody { prompt: "family road trip".to_string() }),
        )
        .await
        .expect("recommendation");

        assert!(recommendation.is_fallback());
    }

    #[tokio::test]
    async fn blank_prompt_is_a_bad_request() {
        let result =
            recommend(State(test_state()), Json(RecommendationBody { prompt: " ".to_string() }))
                .await;

        assert_eq!(result.map(|_| ()).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duration_inputs_resolve_to_days() {
        let days = |d, m, q| rental_duration(d, m, q).map(|(duration, _)| duration.days()).ok();

        assert_eq!(days(None, None, None), Some(1));
        assert_eq!(days(Some(10), Some("monthly"), Some(2)), Some(10));
        assert_eq!(days(None, Some("monthly"), Some(2)), Some(60));
        assert_eq!(days(Some(0), None, None), None);
        assert_eq!(days(None, Some("weekly"), Some(13)), None);
        assert_eq!(days(None, Some("fortnightly"), Some(1)), None);
    }
}
