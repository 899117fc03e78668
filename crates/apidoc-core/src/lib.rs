pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod store;
pub mod transform;
pub mod validate;

pub use store::SpecStore;
