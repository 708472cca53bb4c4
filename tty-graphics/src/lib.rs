// ABOUTME: Library exports for the tty-graphics kitty protocol encoder
// ABOUTME: Makes the probe, preparer and encoder available to the binary, tests and benchmarks

pub mod cli;
pub mod codec;
pub mod command;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod detection;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod prepare;

pub use command::{serialize_and_chunk, Frame, GraphicsCommand, ImageId, Medium};
pub use encoder::GraphicsEncoder;
pub use error::GraphicsError;
pub use metrics::{measure, CellMetrics};
pub use prepare::{ImagePreparer, PreparedImage};
