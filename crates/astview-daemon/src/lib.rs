pub mod config;
pub mod context;
pub mod heartbeat;
pub mod observability;
pub mod reconciler;

pub use config::AppConfig;
pub use context::AppContext;
pub use observability::init_tracing;
pub use reconciler::{PassSummary, Reconciler};
