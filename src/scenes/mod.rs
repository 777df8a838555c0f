mod default_model;
pub mod primitives;

pub use default_model::create_default_model;
