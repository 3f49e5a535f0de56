pub mod metrics;
pub mod relay;
pub mod reporting;
pub mod stream;

pub use metrics::*;
pub use relay::*;
pub use reporting::*;
pub use stream::*;
