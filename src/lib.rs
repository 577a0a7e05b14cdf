//! Stream-operator demonstrations over a fixed set of city temperature
//! readings: iterator-based transforms (format, filter, expand, merge, zip)
//! plus a push-based debounce driven by a small tokio engine.

mod engine;
mod monitor;
pub mod ops;
mod reading;
mod source;
pub mod sources;

pub use engine::{Engine, EngineBuilder, EngineSource};
pub use monitor::TemperatureMonitor;
pub use reading::{city_readings, Reading, TimedReading, CITY_TEMPERATURES};
pub use source::{Debounced, IdleEmitter, Source, Stream};
