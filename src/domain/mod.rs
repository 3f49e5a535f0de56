pub mod errors;
pub mod models;
pub mod naming;
pub mod service;

pub use errors::*;
pub use models::*;
pub use service::{classify, is_diagnosed, ErrorClassifier};
