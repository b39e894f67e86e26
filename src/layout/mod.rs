pub mod backdrop;
pub mod composite;
pub mod plan;
pub mod resolver;
