pub mod metrics;
pub mod rating;
