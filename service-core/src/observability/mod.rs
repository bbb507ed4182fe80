pub mod logging;
pub mod metrics;

pub use self::logging::init_tracing;
pub use self::metrics::{init_metrics, render_metrics, run_metrics_upkeep};
