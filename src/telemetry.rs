//! # Sensor Telemetry
//!
//! Typed model of the sensor payload the device posts on every button
//! release, plus the human-readable report emitted for it.
//!
//! Validation is the serde schema itself: a payload missing a field or
//! carrying a mistyped value fails deserialization in the extractor and
//! is rejected with a 400 before any processing happens. Readings are
//! consumed once for the report and never persisted.

use serde::{Deserialize, Serialize};
use tracing::info;

/// One 3-axis vector reading (gyro or accelerometer).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Battery voltage plus fractional state of charge (0.0 to 1.0).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatteryState {
    pub voltage: f64,
    pub percentage: f64,
}

/// The full reading the device sends with every button press.
///
/// Field names mirror the firmware's JSON exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub device_id: String,
    /// How long the button was held, in milliseconds
    pub button_press_duration: i64,
    /// Orientation when the button was pressed
    pub initial_gyro: Vector3,
    /// Orientation when the button was released
    pub final_gyro: Vector3,
    pub accelerometer: Vector3,
    /// Orientation at transmission time
    pub gyroscope: Vector3,
    pub temperature: f64,
    pub battery: BatteryState,
    pub screen_rotation: i32,
    pub rtc_time: String,
    pub wifi_rssi: i32,
}

/// Render the multi-line report for one reading.
///
/// Battery percentage arrives as a fraction; it is scaled to percent here
/// (0.5 → "50.00%").
pub fn format_report(reading: &SensorReading) -> String {
    let mut lines = Vec::new();
    lines.push("--------------------".to_string());
    lines.push(format!("Device ID: {}", reading.device_id));
    lines.push(format!("RTC time: {}", reading.rtc_time));
    lines.push(format!("Button press: {} ms", reading.button_press_duration));
    lines.push(format!(
        "Gyro at press: X={:.2}, Y={:.2}, Z={:.2}",
        reading.initial_gyro.x, reading.initial_gyro.y, reading.initial_gyro.z
    ));
    lines.push(format!(
        "Gyro at release: X={:.2}, Y={:.2}, Z={:.2}",
        reading.final_gyro.x, reading.final_gyro.y, reading.final_gyro.z
    ));
    lines.push(format!(
        "Gyro at send: X={:.2}, Y={:.2}, Z={:.2}",
        reading.gyroscope.x, reading.gyroscope.y, reading.gyroscope.z
    ));
    lines.push(format!(
        "Accelerometer: X={:.2}, Y={:.2}, Z={:.2}",
        reading.accelerometer.x, reading.accelerometer.y, reading.accelerometer.z
    ));
    lines.push(format!("Temperature: {:.2}°C", reading.temperature));
    lines.push(format!(
        "Battery: {:.2}V, Percentage={:.2}%",
        reading.battery.voltage,
        reading.battery.percentage * 100.0
    ));
    lines.push(format!("Wi-Fi RSSI: {} dBm", reading.wifi_rssi));
    lines.push("--------------------".to_string());
    lines.join("\n")
}

/// Emit the report to the log. Runs on a detached task after the HTTP
/// response has been built; completion is neither awaited nor reported.
pub fn emit_report(reading: &SensorReading) {
    info!(device_id = %reading.device_id, "Sensor reading received\n{}", format_report(reading));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reading() -> SensorReading {
        serde_json::from_str(
            r#"{
                "device_id": "m5stick-01",
                "button_press_duration": 1200,
                "initial_gyro": {"x": 0.1, "y": -0.2, "z": 0.3},
                "final_gyro": {"x": 1.0, "y": 2.0, "z": 3.0},
                "accelerometer": {"x": 0.0, "y": 9.81, "z": 0.0},
                "gyroscope": {"x": -1.5, "y": 0.5, "z": 2.25},
                "temperature": 36.456,
                "battery": {"voltage": 3.7, "percentage": 0.5},
                "screen_rotation": 1,
                "rtc_time": "2025-01-01 12:00:00",
                "wifi_rssi": -67
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_battery_percentage_scaled_to_percent() {
        let report = format_report(&sample_reading());
        assert!(report.contains("Percentage=50.00%"), "report was: {}", report);
        assert!(report.contains("Battery: 3.70V"));
    }

    #[test]
    fn test_report_contains_all_sections() {
        let report = format_report(&sample_reading());
        assert!(report.contains("Device ID: m5stick-01"));
        assert!(report.contains("RTC time: 2025-01-01 12:00:00"));
        assert!(report.contains("Button press: 1200 ms"));
        assert!(report.contains("Gyro at press: X=0.10, Y=-0.20, Z=0.30"));
        assert!(report.contains("Gyro at release: X=1.00, Y=2.00, Z=3.00"));
        assert!(report.contains("Gyro at send: X=-1.50, Y=0.50, Z=2.25"));
        assert!(report.contains("Accelerometer: X=0.00, Y=9.81, Z=0.00"));
        assert!(report.contains("Temperature: 36.46°C"));
        assert!(report.contains("Wi-Fi RSSI: -67 dBm"));
    }

    #[test]
    fn test_missing_field_fails_deserialization() {
        // No battery section at all
        let json = r#"{
            "device_id": "m5stick-01",
            "button_press_duration": 1200,
            "initial_gyro": {"x": 0, "y": 0, "z": 0},
            "final_gyro": {"x": 0, "y": 0, "z": 0},
            "accelerometer": {"x": 0, "y": 0, "z": 0},
            "gyroscope": {"x": 0, "y": 0, "z": 0},
            "temperature": 20.0,
            "screen_rotation": 0,
            "rtc_time": "2025-01-01 00:00:00",
            "wifi_rssi": -50
        }"#;
        assert!(serde_json::from_str::<SensorReading>(json).is_err());
    }

    #[test]
    fn test_mistyped_field_fails_deserialization() {
        let json = r#"{
            "device_id": "m5stick-01",
            "button_press_duration": "long",
            "initial_gyro": {"x": 0, "y": 0, "z": 0},
            "final_gyro": {"x": 0, "y": 0, "z": 0},
            "accelerometer": {"x": 0, "y": 0, "z": 0},
            "gyroscope": {"x": 0, "y": 0, "z": 0},
            "temperature": 20.0,
            "battery": {"voltage": 3.7, "percentage": 1.0},
            "screen_rotation": 0,
            "rtc_time": "2025-01-01 00:00:00",
            "wifi_rssi": -50
        }"#;
        assert!(serde_json::from_str::<SensorReading>(json).is_err());
    }
}
