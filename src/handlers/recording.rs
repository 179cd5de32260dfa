//! Recording ingestion endpoint.
//!
//! The entire request body is treated as raw PCM samples; there is no
//! content negotiation. The body is persisted verbatim as a `.raw` blob,
//! framed into a `.wav`, and the blob is deleted once the container is
//! complete. Any failure along the way is reported with the fixed
//! `{status, message}` shape the device firmware parses.

use crate::audio::{framer, store::AudioStore};
use crate::config::AudioConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, info};

/// POST /recording
pub async fn receive_recording(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let config = state.get_config();
    let store = AudioStore::new(&config.storage.audio_dir);
    let body_len = body.len();

    // The blob and container writes are synchronous filesystem work, so
    // they run on the blocking pool instead of the actix worker.
    let outcome = web::block(move || save_and_convert(&store, &config.audio, &body))
        .await
        .unwrap_or_else(|e| Err(AppError::Internal(e.to_string())));

    match outcome {
        Ok((wav_name, n_frames)) => {
            state.record_recording(body_len as u64);
            info!(
                file_name = %wav_name,
                file_size = body_len,
                frames = n_frames,
                "Recording converted"
            );

            HttpResponse::Ok().json(json!({
                "status": "success",
                "message": "Audio file received, converted to WAV, and saved",
                "file_name": wav_name,
                "file_size": body_len
            }))
        }
        Err(e) => {
            // Whatever was partially written stays on disk; no handle is
            // reported back to the caller.
            error!("Recording conversion failed: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": e.to_string()
            }))
        }
    }
}

/// Persist the body, frame it, and delete the raw source.
///
/// Returns the container's bare file name and its declared frame count.
fn save_and_convert(
    store: &AudioStore,
    format: &AudioConfig,
    content: &[u8],
) -> AppResult<(String, u64)> {
    let raw_path = store.save_raw(content)?;
    let (wav_name, wav_path) = store.wav_destination();

    let n_frames = framer::frame_to_wav(&raw_path, &wav_path, format)?;

    // The raw blob is only removed after the container is fully written
    store.delete_raw(&raw_path)?;

    Ok((wav_name, n_frames))
}
