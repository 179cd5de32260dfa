//! Item lookup endpoints.
//!
//! Two read-only operations against the items table. The 404 body is the
//! fixed `{"detail": "Item not found"}` shape existing clients expect, so
//! the miss is answered directly instead of through the shared error
//! envelope.

use crate::db;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// GET /api/items
pub async fn list_items(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let items = db::items::list_items(&state.db).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/items/{id}
pub async fn get_item(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match db::items::get_item(&state.db, id).await? {
        Some(item) => Ok(HttpResponse::Ok().json(item)),
        None => Ok(HttpResponse::NotFound().json(json!({ "detail": "Item not found" }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use actix_web::{test, App};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn seeded_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_schema(&pool).await.unwrap();

        sqlx::query("INSERT INTO items (id, name) VALUES (1, 'thermocouple'), (2, 'gyroscope')")
            .execute(&pool)
            .await
            .unwrap();

        AppState::new(AppConfig::default(), pool)
    }

    #[actix_web::test]
    async fn test_list_items() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/api/items", web::get().to(list_items)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/items").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.as_array().unwrap().len(), 2);
        assert_eq!(resp[0]["id"], 1);
        assert_eq!(resp[0]["name"], "thermocouple");
        assert_eq!(resp[1]["name"], "gyroscope");
    }

    #[actix_web::test]
    async fn test_get_item_found() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/api/items/{id}", web::get().to(get_item)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/items/2").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp, serde_json::json!({"id": 2, "name": "gyroscope"}));
    }

    #[actix_web::test]
    async fn test_get_item_not_found() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/api/items/{id}", web::get().to(get_item)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/items/999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"detail": "Item not found"}));
    }
}
