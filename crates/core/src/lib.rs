pub mod aggregate;
pub mod application;
pub mod classifier;
pub mod continent;
pub mod domain;
pub mod error;
pub mod location;
pub mod ports;
pub mod preprocess;
pub mod query;
pub mod utils;
