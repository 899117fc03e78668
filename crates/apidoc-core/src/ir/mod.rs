pub mod grouping;
pub mod properties;
pub mod types;

pub use grouping::merge_documents;
pub use properties::{Keyword, Location, Property, RequestBodySchema, Response, ResponseItems};
pub use types::{HttpMethod, Method, OperationGroup};
