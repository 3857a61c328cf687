pub mod catalog;
pub mod error;
pub mod filter;
pub mod schema;
pub mod scoring;
pub mod seed;
pub mod store;
pub mod timing;

pub use error::{CivicError, Result};
