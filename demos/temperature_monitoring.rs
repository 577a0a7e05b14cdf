//! Temperature monitoring demo.
//!
//! Runs six transformations over a fixed set of ten Colombian city
//! temperature readings and prints each section to stdout. The final section
//! replays the readings through a debounced stream, so the process stays
//! alive for the one second quiescence window before exiting.
//!
//! Run with:
//! ```bash
//! cargo run --example temperature_monitoring
//! ```

use anyhow::Result;
use temp_streamz::TemperatureMonitor;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let monitor = TemperatureMonitor::from_fixed_dataset()?;
    monitor.run().await?;
    Ok(())
}
