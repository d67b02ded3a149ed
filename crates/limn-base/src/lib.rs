pub mod logging;
pub mod vec2;

pub use logging::{FileLogger, LogConfig, StdoutLogger, init_file_logger, init_logger, init_stdout_logger};
pub use vec2::Vec2;

// Re-export log crate so downstream crates can use limn_base::log::*
pub use log;
