use axum::Router;
use qcars_db::DbPool;

use crate::state::AppState;
use crate::{accounts, admin, catalog, health};

pub fn router(state: AppState, db_pool: DbPool) -> Router {
    Router::new()
        .merge(health::router(db_pool))
        .merge(catalog::router(state.clone()))
        .merge(accounts::router(state.clone()))
        .merge(admin::router(state))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use qcars_db::{connect_with_settings, migrations};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::router;
    use crate::admin::{ADMIN_PASSWORD_HEADER, ADMIN_USER_HEADER};
    use crate::state::tests::test_state;

    async fn app() -> Router {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool");
        migrations::run_pending(&pool).await.expect("migrations");
        router(test_state(), pool)
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_and_catalog_share_one_listener() {
        let app = app().await;

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("health response");
        assert_eq!(health.status(), StatusCode::OK);

        let catalog = app
            .oneshot(
                Request::get("/api/v1/catalog?type=SUV&lang=en")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("catalog response");
        assert_eq!(catalog.status(), StatusCode::OK);
        let body = read_json(catalog).await;
        assert_eq!(body["active_filters"], 1);
        assert!(body["vehicles"]
            .as_array()
            .expect("vehicles")
            .iter()
            .all(|vehicle| vehicle["type"] == "SUV"));
    }

    #[tokio::test]
    async fn missing_vehicle_returns_json_error_with_correlation_id() {
        let response = app()
            .await
            .oneshot(Request::get("/api/v1/vehicles/car-404").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json(response).await;
        assert!(body["correlation_id"].as_str().expect("correlation id").starts_with("req-"));
    }

    #[tokio::test]
    async fn admin_routes_require_credentials() {
        let app = app().await;

        let anonymous = app
            .clone()
            .oneshot(Request::get("/api/v1/admin/bookings").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let authorized = app
            .oneshot(
                Request::get("/api/v1/admin/bookings")
                    .header(ADMIN_USER_HEADER, "admin")
                    .header(ADMIN_PASSWORD_HEADER, "admin123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(authorized.status(), StatusCode::OK);
        assert_eq!(read_json(authorized).await, json!([]));
    }

    #[tokio::test]
    async fn signup_over_http_returns_created_profile() {
        let response = app()
            .await
            .oneshot(
                Request::post("/api/v1/accounts/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "name": "Noor", "email": "noor@example.com" }).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["user"]["email"], "noor@example.com");
        assert_eq!(body["stats"]["total_bookings"], 0);
    }
}
