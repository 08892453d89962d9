//! Public types for the Curator API.

mod product;
mod request;

pub use product::ProductId;
pub use request::{CacheMode, MAX_PRODUCT_ID_LEN, RequestContext, parse_exclusions};
