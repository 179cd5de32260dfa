//! Sensor data endpoint.
//!
//! The typed `web::Json` extractor is the validation gate: a payload with
//! a missing or mistyped field never reaches this handler (actix rejects
//! it with a 400 first). The report emission is deferred to a detached
//! task created after the response value exists, so slow log formatting
//! can never delay the acknowledgment.

use crate::telemetry::{self, SensorReading};
use actix_web::{web, HttpResponse};
use serde_json::json;

/// POST /sensor_data
pub async fn receive_sensor_data(reading: web::Json<SensorReading>) -> HttpResponse {
    let reading = reading.into_inner();

    let response = HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Sensor data received and processed"
    }));

    // Fire-and-forget: not awaited, no result channel back to the request
    tokio::spawn(async move {
        telemetry::emit_report(&reading);
    });

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    fn valid_payload() -> serde_json::Value {
        serde_json::json!({
            "device_id": "m5stick-01",
            "button_press_duration": 850,
            "initial_gyro": {"x": 0.1, "y": 0.2, "z": 0.3},
            "final_gyro": {"x": 0.4, "y": 0.5, "z": 0.6},
            "accelerometer": {"x": 0.0, "y": 9.81, "z": 0.0},
            "gyroscope": {"x": 1.0, "y": 2.0, "z": 3.0},
            "temperature": 31.5,
            "battery": {"voltage": 3.7, "percentage": 0.5},
            "screen_rotation": 1,
            "rtc_time": "2025-01-01 12:00:00",
            "wifi_rssi": -60
        })
    }

    #[actix_web::test]
    async fn test_valid_reading_acknowledged() {
        let app = test::init_service(
            App::new().route("/sensor_data", web::post().to(receive_sensor_data)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/sensor_data")
            .set_json(valid_payload())
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["status"], "success");
        assert_eq!(resp["message"], "Sensor data received and processed");
    }

    #[actix_web::test]
    async fn test_missing_field_rejected() {
        let app = test::init_service(
            App::new().route("/sensor_data", web::post().to(receive_sensor_data)),
        )
        .await;

        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("battery");

        let req = test::TestRequest::post()
            .uri("/sensor_data")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    async fn test_mistyped_field_rejected() {
        let app = test::init_service(
            App::new().route("/sensor_data", web::post().to(receive_sensor_data)),
        )
        .await;

        let mut payload = valid_payload();
        payload["wifi_rssi"] = serde_json::json!("strong");

        let req = test::TestRequest::post()
            .uri("/sensor_data")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
