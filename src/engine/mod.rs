pub mod metrics;

pub use metrics::{CharState, Metrics, compute_metrics};
