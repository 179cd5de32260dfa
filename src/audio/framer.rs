//! # Container Framer
//!
//! Wraps a raw PCM byte stream in a WAV header (via `hound`) so the file
//! becomes self-describing. The format is fixed by configuration, not
//! negotiated per request.
//!
//! ## Truncation policy:
//! The header's declared frame count is `floor(len / frame_size)`. A
//! trailing byte run that does not complete a full frame is DROPPED from
//! the payload, so the declared count and the payload always agree. (The
//! original firmware-side tooling was inconsistent here; this is the one
//! documented behavior.)

use crate::config::AudioConfig;
use crate::error::{AppError, AppResult};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Read a raw blob and re-emit it as a WAV file.
///
/// Returns the number of complete frames declared in the header. The raw
/// file is left in place; the caller decides when to delete it.
///
/// A zero-length input produces a valid zero-frame WAV, not an error. A
/// partially written WAV is not cleaned up on failure.
pub fn frame_to_wav(raw_path: &Path, wav_path: &Path, format: &AudioConfig) -> AppResult<u64> {
    // The framer decodes signed 16-bit little-endian samples, the only
    // format the device firmware produces.
    if format.bits_per_sample != 16 {
        return Err(AppError::Audio(format!(
            "Unsupported bit depth: {} (only 16-bit PCM is handled)",
            format.bits_per_sample
        )));
    }

    let raw_data = fs::read(raw_path)
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", raw_path.display(), e)))?;

    let frame_size = format.frame_size();
    let n_frames = raw_data.len() / frame_size;
    let payload = &raw_data[..n_frames * frame_size];

    debug!(
        "Converting to WAV: {} ({} bytes, {} frames)",
        wav_path.display(),
        raw_data.len(),
        n_frames
    );

    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(wav_path, spec)?;

    let mut cursor = Cursor::new(payload);
    while let Ok(sample) = cursor.read_i16::<LittleEndian>() {
        writer.write_sample(sample)?;
    }

    // finalize() patches the header sizes; without it the WAV is invalid
    writer.finalize()?;

    debug!("WAV file saved: {}", wav_path.display());

    Ok(n_frames as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn device_format() -> AudioConfig {
        AudioConfig {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
        }
    }

    fn frame(raw: &[u8]) -> (u64, TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let raw_path = temp.path().join("in.raw");
        let wav_path = temp.path().join("out.wav");
        fs::write(&raw_path, raw).unwrap();

        let frames = frame_to_wav(&raw_path, &wav_path, &device_format()).unwrap();
        (frames, temp, wav_path)
    }

    #[test]
    fn test_frame_count_is_floor_of_half_length() {
        let raw: Vec<u8> = (0u8..100).collect();
        let (frames, _temp, wav_path) = frame(&raw);
        let reader = hound::WavReader::open(&wav_path).unwrap();
        assert_eq!(frames, 50);
        assert_eq!(reader.len(), 50);
    }

    #[test]
    fn test_trailing_partial_frame_is_dropped() {
        // 7 bytes -> 3 complete frames, the trailing byte is discarded
        let raw = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let (frames, _temp, wav_path) = frame(&raw);
        let mut reader = hound::WavReader::open(&wav_path).unwrap();
        assert_eq!(frames, 3);
        assert_eq!(reader.len(), 3);

        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(
            samples,
            vec![
                i16::from_le_bytes([0x01, 0x02]),
                i16::from_le_bytes([0x03, 0x04]),
                i16::from_le_bytes([0x05, 0x06]),
            ]
        );
    }

    #[test]
    fn test_zero_length_input_yields_valid_empty_wav() {
        let (frames, _temp, wav_path) = frame(&[]);
        let reader = hound::WavReader::open(&wav_path).unwrap();
        assert_eq!(frames, 0);
        assert_eq!(reader.len(), 0);

        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);
    }

    #[test]
    fn test_header_declares_device_format() {
        let (_, _temp, wav_path) = frame(&[0x00, 0x10]);
        let reader = hound::WavReader::open(&wav_path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    }

    #[test]
    fn test_missing_raw_file_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let result = frame_to_wav(
            &temp.path().join("missing.raw"),
            &temp.path().join("out.wav"),
            &device_format(),
        );
        assert!(matches!(result, Err(crate::error::AppError::Io(_))));
    }

    #[test]
    fn test_unsupported_bit_depth_is_rejected() {
        let temp = TempDir::new().unwrap();
        let raw_path = temp.path().join("in.raw");
        fs::write(&raw_path, [0u8; 4]).unwrap();

        let format = AudioConfig {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 24,
        };
        let result = frame_to_wav(&raw_path, &temp.path().join("out.wav"), &format);
        assert!(matches!(result, Err(crate::error::AppError::Audio(_))));
    }
}
