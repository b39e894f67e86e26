pub mod normalize;
pub mod registry;
pub mod spec;
