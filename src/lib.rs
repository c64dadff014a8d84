//! ML Register - model registration response
//!
//! The response a coordinating node returns once a model registration is
//! accepted or completed. It travels between nodes over the binary stream
//! codec and out to API clients as an ordered document.

pub mod config;
pub mod logging;
pub mod task;
pub mod transport;

pub use config::{CodecConfig, ConfigError};
pub use task::TaskState;
pub use transport::register::RegisterModelResponse;

pub use ml_stream::{
    DecodeError, Readable, StreamInput, StreamLimits, StreamOutput, ToXContent, Writeable,
    XContentBuilder, XContentError,
};
