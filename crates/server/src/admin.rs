//! Admin console API. Every route except `login` checks the fixed admin
//! credentials sent in the `x-qcars-admin-user` and `x-qcars-admin-password`
//! headers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use qcars_core::domain::booking::{Booking, BookingOverview};
use qcars_core::domain::discount::{DiscountRule, DiscountRuleId};
use qcars_core::domain::extra::{BookingExtra, ExtraId};
use qcars_core::domain::settings::{merge, Settings, SettingsPatch};
use qcars_core::domain::vehicle::{Vehicle, VehicleId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_USER_HEADER: &str = "x-qcars-admin-user";
pub const ADMIN_PASSWORD_HEADER: &str = "x-qcars-admin-password";

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub authenticated: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub id: VehicleId,
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExtraInput {
    pub id: Option<ExtraId>,
    pub name: String,
    pub name_ar: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub description_ar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiscountRuleInput {
    pub id: Option<DiscountRuleId>,
    pub min_days: u32,
    pub percentage_off: Decimal,
    pub label: String,
    pub label_ar: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/admin/login", post(login))
        .route("/api/v1/admin/overview", get(overview))
        .route("/api/v1/admin/bookings", get(list_bookings))
        .route("/api/v1/admin/vehicles", get(list_vehicles).post(upsert_vehicle))
        .route("/api/v1/admin/vehicles/{id}", delete(delete_vehicle))
        .route("/api/v1/admin/vehicles/{id}/availability", put(set_availability))
        .route("/api/v1/admin/settings", get(get_settings).put(put_settings))
        .route("/api/v1/admin/extras", get(list_extras).post(add_extra))
        .route("/api/v1/admin/extras/{id}", delete(delete_extra))
        .route("/api/v1/admin/discount-rules", get(list_rules).post(add_rule))
        .route("/api/v1/admin/discount-rules/{id}", delete(delete_rule))
        .with_state(state)
}

fn authorize(headers: &HeaderMap, state: &AppState) -> Result<(), ApiError> {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    match (header(ADMIN_USER_HEADER), header(ADMIN_PASSWORD_HEADER)) {
        (Some(username), Some(password)) if state.admin.verify(username, password) => Ok(()),
        (Some(username), _) => {
            warn!(event_name = "admin.auth.rejected", username = %username, "admin credentials rejected");
            Err(ApiError::unauthorized("admin credentials rejected"))
        }
        _ => Err(ApiError::unauthorized("admin credentials missing")),
    }
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    if !state.admin.verify(&body.username, &body.password) {
        return Err(ApiError::unauthorized("admin credentials rejected"));
    }
    Ok(Json(AdminLoginResponse { authenticated: true }))
}

async fn overview(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<BookingOverview>, ApiError> {
    authorize(&headers, &state)?;
    let bookings = state.bookings.list().await?;
    let fleet = state.catalog().await?;
    Ok(Json(BookingOverview::from_bookings(&bookings, fleet.len())))
}

async fn list_bookings(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    authorize(&headers, &state)?;
    Ok(Json(state.bookings.list().await?))
}

async fn list_vehicles(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    authorize(&headers, &state)?;
    Ok(Json(state.catalog().await?))
}

/// Accepts a full vehicle document. A missing or blank id creates a new
/// vehicle at the front of the catalog.
async fn upsert_vehicle(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    authorize(&headers, &state)?;
    state.materialize_catalog().await?;
    let Some(document) = body.as_object_mut() else {
        return Err(ApiError::bad_request("vehicle must be a JSON object"));
    };

    let has_id = document
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.trim().is_empty());
    if !has_id {
        document.insert("id".to_string(), Value::String(VehicleId::generate().0));
    }

    let vehicle: Vehicle = serde_json::from_value(body)
        .map_err(|error| ApiError::bad_request(format!("invalid vehicle: {error}")))?;
    vehicle.validate()?;
    state.vehicles.upsert(vehicle.clone()).await?;

    info!(
        event_name = "admin.vehicle.saved",
        vehicle_id = %vehicle.id.0,
        created = !has_id,
        "vehicle saved"
    );
    let status = if has_id { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(vehicle)))
}

async fn delete_vehicle(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers, &state)?;
    state.materialize_catalog().await?;
    if !state.vehicles.delete(&VehicleId(id.clone())).await? {
        return Err(ApiError::not_found(format!("vehicle `{id}` not found")));
    }
    info!(event_name = "admin.vehicle.deleted", vehicle_id = %id, "vehicle deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn set_availability(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(body): Json<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    authorize(&headers, &state)?;
    state.materialize_catalog().await?;
    let id = VehicleId(id);
    if !state.vehicles.set_availability(&id, body.is_available).await? {
        return Err(ApiError::not_found(format!("vehicle `{}` not found", id.0)));
    }
    Ok(Json(AvailabilityResponse { id, is_available: body.is_available }))
}

async fn get_settings(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Settings>, ApiError> {
    authorize(&headers, &state)?;
    Ok(Json(state.settings.get().await?))
}

/// Partial update: fields left out keep their current values.
async fn put_settings(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>, ApiError> {
    authorize(&headers, &state)?;
    let current = state.settings.get().await?;
    let updated = merge(patch, current);
    state.settings.put(&updated).await?;

    info!(event_name = "admin.settings.saved", company_name = %updated.company_name, "settings saved");
    Ok(Json(updated))
}

async fn list_extras(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingExtra>>, ApiError> {
    authorize(&headers, &state)?;
    Ok(Json(state.extras.list().await?))
}

async fn add_extra(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(body): Json<ExtraInput>,
) -> Result<(StatusCode, Json<BookingExtra>), ApiError> {
    authorize(&headers, &state)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("extra name is required"));
    }
    if body.price < Decimal::ZERO {
        return Err(ApiError::bad_request("extra price must be >= 0"));
    }

    let extra = BookingExtra {
        id: body.id.unwrap_or_else(|| ExtraId(format!("extra-{}", short_id()))),
        name: body.name,
        name_ar: body.name_ar,
        price: body.price,
        description: body.description,
        description_ar: body.description_ar,
    };
    state.extras.add(extra.clone()).await?;
    Ok((StatusCode::CREATED, Json(extra)))
}

async fn delete_extra(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers, &state)?;
    if !state.extras.delete(&ExtraId(id.clone())).await? {
        return Err(ApiError::not_found(format!("extra `{id}` not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_rules(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<DiscountRule>>, ApiError> {
    authorize(&headers, &state)?;
    Ok(Json(state.discount_rules.list().await?))
}

async fn add_rule(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(body): Json<DiscountRuleInput>,
) -> Result<(StatusCode, Json<DiscountRule>), ApiError> {
    authorize(&headers, &state)?;
    let rule = DiscountRule {
        id: body.id.unwrap_or_else(|| DiscountRuleId(format!("rule-{}", short_id()))),
        min_days: body.min_days,
        percentage_off: body.percentage_off,
        label: body.label,
        label_ar: body.label_ar,
    };
    rule.validate()?;
    state.discount_rules.add(rule.clone()).await?;

    info!(
        event_name = "admin.discount_rule.saved",
        rule_id = %rule.id.0,
        min_days = rule.min_days,
        "discount rule saved"
    );
    Ok((StatusCode::CREATED, Json(rule)))
}

async fn delete_rule(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers, &state)?;
    if !state.discount_rules.delete(&DiscountRuleId(id.clone())).await? {
        return Err(ApiError::not_found(format!("discount rule `{id}` not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}
