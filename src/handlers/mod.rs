pub mod config;
pub mod items;
pub mod recording;
pub mod sensor;

pub use config::*;
pub use items::*;
pub use recording::*;
pub use sensor::*;
