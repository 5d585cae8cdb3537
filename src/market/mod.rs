pub mod normalizer;
pub mod types;

pub use normalizer::normalize;
pub use types::{NormalizedListing, RawListing, Side, SortDirection};
