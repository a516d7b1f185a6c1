#![warn(clippy::unwrap_used)]

pub mod db;
pub mod dir;
pub mod errors;
pub mod tables;
