pub mod replay;

pub use replay::{ReplaySource, ReplaySourceConfig, ReplaySourceConfigBuilder};
