//! ML Stream Types
//!
//! Wire primitives shared by transport responses:
//! - `StreamOutput` / `StreamInput`: length-prefixed binary framing between nodes
//! - `XContentBuilder`: ordered key-value documents for API response bodies

pub mod error;
pub mod input;
pub mod output;
pub mod xcontent;

pub use error::DecodeError;
pub use input::{Readable, StreamInput, StreamLimits, DEFAULT_MAX_STRING_BYTES};
pub use output::{StreamOutput, Writeable};
pub use xcontent::{ToXContent, XContentBuilder, XContentError};
