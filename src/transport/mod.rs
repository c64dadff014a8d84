//! Transport-layer responses.

pub mod register;
