pub mod metrics;
pub mod serial;
pub mod sink;
