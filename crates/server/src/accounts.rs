//! Mocked site accounts. There are no passwords: an email is an identity.
//!
//! - `POST /api/v1/accounts/signup`        - create an account
//! - `POST /api/v1/accounts/login`         - look an account up by email
//! - `GET  /api/v1/accounts/{id}`          - profile with bookings and stats
//! - `GET  /api/v1/accounts/{id}/bookings` - bookings, newest first
//! - `POST /api/v1/accounts/{id}/bookings` - record a booking for the account

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use qcars_core::domain::booking::{Booking, BookingId, BookingStatus};
use qcars_core::domain::extra::ExtraId;
use qcars_core::domain::rental::RentalWindow;
use qcars_core::domain::user::{ProfileStats, User, UserId};
use qcars_core::domain::vehicle::VehicleId;
use qcars_core::errors::DomainError;
use qcars_core::pricing::QuoteRequest;
use qcars_db::repositories::{BookingRepository, RepositoryError, UserRepository};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::rental_duration;
use crate::error::ApiError;
use crate::state::AppState;

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { users, bookings }
    }

    /// `None` when the email is already registered.
    pub async fn signup(&self, name: &str, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = User::new(name.trim(), email.trim());
        if !self.users.create(user.clone()).await? {
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// `None` for an unknown email.
    pub async fn login(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        match self.users.find_by_email(email.trim()).await? {
            Some(user) => self.with_bookings(user).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn find(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        match self.users.find_by_id(id).await? {
            Some(user) => self.with_bookings(user).await.map(Some),
            None => Ok(None),
        }
    }

    /// Stores the booking against the user and returns the updated profile,
    /// the new booking first.
    pub async fn add_booking(
        &self,
        id: &UserId,
        mut booking: Booking,
    ) -> Result<Option<User>, RepositoryError> {
        let Some(mut user) = self.find(id).await? else {
            return Ok(None);
        };
        booking.user_id = Some(user.id.clone());
        booking.customer_name = Some(user.name.clone());
        booking.customer_email = Some(user.email.clone());
        self.bookings.save(booking.clone()).await?;

        user.record_booking(booking);
        Ok(Some(user))
    }

    async fn with_bookings(&self, mut user: User) -> Result<User, RepositoryError> {
        user.bookings = self.bookings.list_for_user(&user.id).await?;
        Ok(user)
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub stats: ProfileStats,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        let stats = user.stats();
        Self { user, stats }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub vehicle_id: VehicleId,
    pub start_date: NaiveDate,
    pub days: Option<i64>,
    pub mode: Option<String>,
    pub quantity: Option<u32>,
    #[serde(default)]
    pub extras: Vec<ExtraId>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/accounts/signup", post(signup))
        .route("/api/v1/accounts/login", post(login))
        .route("/api/v1/accounts/{id}", get(profile))
        .route("/api/v1/accounts/{id}/bookings", get(list_bookings).post(create_booking))
        .with_state(state)
}

async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() {
        return Err(ApiError::bad_request("name and email are required"));
    }

    let user = state
        .accounts
        .signup(&body.name, &body.email)
        .await?
        .ok_or_else(|| ApiError::bad_request("an account with this email already exists"))?;

    info!(event_name = "accounts.signup", user_id = %user.id.0, "account created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .accounts
        .login(&body.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("unknown email"))?;

    info!(event_name = "accounts.login", user_id = %user.id.0, "account signed in");
    Ok(Json(user.into()))
}

async fn profile(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .accounts
        .find(&UserId(id))
        .await?
        .ok_or_else(|| ApiError::not_found("account not found"))?;
    Ok(Json(user.into()))
}

async fn list_bookings(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let user = state
        .accounts
        .find(&UserId(id))
        .await?
        .ok_or_else(|| ApiError::not_found("account not found"))?;
    Ok(Json(user.bookings))
}

async fn create_booking(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let vehicle = state
        .find_vehicle(&body.vehicle_id)
        .await?
        .ok_or_else(|| DomainError::VehicleNotFound(body.vehicle_id.clone()))?;
    if !vehicle.is_available {
        return Err(DomainError::VehicleUnavailable(vehicle.id).into());
    }

    let (duration, _) = rental_duration(body.days, body.mode.as_deref(), body.quantity)?;
    let window = RentalWindow::starting(body.start_date, duration)?;
    let extra_catalog = state.extras.list().await?;
    let rules = state.discount_rules.list().await?;
    let quote = state.pricing.price(&QuoteRequest {
        vehicle: &vehicle,
        duration,
        extra_ids: &body.extras,
        extra_catalog: &extra_catalog,
        rules: &rules,
    });

    let booking = Booking {
        id: BookingId::generate(),
        vehicle_id: vehicle.id.clone(),
        vehicle_name: format!("{} {}", vehicle.brand, vehicle.name),
        vehicle_image: vehicle.image.clone(),
        start_date: window.start,
        end_date: window.end,
        total_price: quote.total,
        status: BookingStatus::Confirmed,
        extras: quote.extras.iter().map(|extra| extra.id.clone()).collect(),
        booked_at: Utc::now(),
        user_id: None,
        customer_name: None,
        customer_email: None,
    };

    let user = state
        .accounts
        .add_booking(&UserId(id), booking)
        .await?
        .ok_or_else(|| ApiError::not_found("account not found"))?;
    let booking = user
        .bookings
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("booking was not recorded"))?;

    info!(
        event_name = "accounts.booking.created",
        booking_id = %booking.id.0,
        vehicle_id = %booking.vehicle_id.0,
        total = %booking.total_price,
        "booking recorded"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        Json,
    };
    use chrono::NaiveDate;
    use qcars_core::domain::extra::ExtraId;
    use qcars_core::domain::vehicle::VehicleId;
    use rust_decimal::Decimal;

    use super::{create_booking, login, profile, signup, BookingRequest, LoginRequest, SignupRequest};
    use crate::state::tests::test_state;

    fn signup_body(email: &str) -> Json<SignupRequest> {
        Json(SignupRequest { name: "Layla".to_string(), email: email.to_string() })
    }

    #[tokio::test]
    async fn duplicate_signup_is_rejected() {
        let state = test_state();

        let first = signup(State(state.clone()), signup_body("layla@example.com")).await;
        let second = signup(State(state), signup_body("layla@example.com")).await;

        assert_eq!(first.map(|(status, _)| status).ok(), Some(StatusCode::CREATED));
        assert_eq!(second.map(|_| ()).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_unauthorized() {
        let state = test_state();

        let result =
            login(State(state), Json(LoginRequest { email: "nobody@example.com".to_string() })).await;

        assert_eq!(result.map(|_| ()).unwrap_err().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn booking_is_priced_and_listed_first_on_the_profile() {
        let state = test_state();
        let (_, Json(created)) =
            signup(State(state.clone()), signup_body("omar@example.com")).await.expect("signup");
        let user_id = created.user.id.0.clone();

        let (status, Json(booking)) = create_booking(
            Path(user_id.clone()),
            State(state.clone()),
            Json(BookingRequest {
                vehicle_id: VehicleId("car-camry".to_string()),
                start_date: NaiveDate::from_ymd_opt(2026, 6, 1).expect("date"),
                days: Some(3),
                mode: None,
                quantity: None,
                extras: vec![ExtraId("extra-child-seat".to_string())],
            }),
        )
        .await
        .expect("booking");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(booking.end_date, NaiveDate::from_ymd_opt(2026, 6, 4).expect("date"));
        assert_eq!(booking.customer_email.as_deref(), Some("omar@example.com"));
        assert!(booking.total_price > Decimal::from(15));

        let Json(profile) = profile(Path(user_id), State(state)).await.expect("profile");
        assert_eq!(profile.stats.total_bookings, 1);
        assert_eq!(profile.stats.active_rentals, 1);
        assert_eq!(profile.user.bookings[0].id, booking.id);
    }

    #[tokio::test]
    async fn unavailable_vehicle_cannot_be_booked() {
        let state = test_state();
        let (_, Json(created)) =
            signup(State(state.clone()), signup_body("sara@example.com")).await.expect("signup");

        let result = create_booking(
            Path(created.user.id.0),
            State(state),
            Json(BookingRequest {
                vehicle_id: VehicleId("car-huracan".to_string()),
                start_date: NaiveDate::from_ymd_opt(2026, 6, 1).expect("date"),
                days: Some(2),
                mode: None,
                quantity: None,
                extras: Vec::new(),
            }),
        )
        .await;

        assert_eq!(result.map(|_| ()).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
