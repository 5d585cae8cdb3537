pub mod core;
pub mod dashboard;
pub mod depth;
pub mod extractor;
pub mod market;
pub mod server;
