//! # Audio Ingestion Pipeline
//!
//! Handles the raw-PCM-to-WAV path for recordings uploaded by the device.
//!
//! ## Key Components:
//! - **Blob Store**: Persists request bodies as uniquely-named `.raw` files
//! - **Container Framer**: Wraps raw samples in a WAV header
//!
//! ## Audio Format (fixed by the device firmware):
//! - **Sample Rate**: 16kHz (16,000 Hz)
//! - **Bit Depth**: 16-bit PCM
//! - **Channels**: Mono (1 channel)
//! - **Encoding**: Little-endian signed integers
//!
//! Data flows strictly one way: request body → `.raw` on disk → `.wav` on
//! disk. The `.raw` file is deleted only after the `.wav` has been fully
//! written and finalized.

pub mod framer;
pub mod store;
