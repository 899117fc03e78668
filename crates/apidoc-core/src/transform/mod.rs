pub mod flatten;
pub mod properties;
pub mod slug;
pub mod spec_to_portal;

pub use flatten::flatten_request_bodies;
pub use spec_to_portal::{transform, transform_document};
