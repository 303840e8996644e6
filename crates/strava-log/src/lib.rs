pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod storage;
pub mod sync;

pub use error::{Result, StravaError};
