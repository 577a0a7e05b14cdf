use crate::ops;
use crate::reading::{city_readings, Reading};
use crate::sources::replay::{ReplaySource, ReplaySourceConfigBuilder};
use crate::EngineBuilder;
use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const WARM_THRESHOLD: i32 = 20;

const REPORT_TIMES: [&str; 10] = [
    "9 AM", "12 PM", "3 PM", "6 PM", "9 PM", "12 AM", "3 AM", "6 AM", "9 AM", "12 PM",
];

/// The full temperature-monitoring demonstration as a value: the fixed
/// dataset plus the six transformations over it. Construction only parses
/// and stores data; nothing runs until [`TemperatureMonitor::run`].
pub struct TemperatureMonitor {
    readings: Vec<Reading>,
    window: Duration,
}

impl TemperatureMonitor {
    /// Builds the monitor over the ten-city literal dataset with a one
    /// second debounce window.
    pub fn from_fixed_dataset() -> Result<Self> {
        Ok(Self {
            readings: city_readings()?,
            window: Duration::from_secs(1),
        })
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Every reading as `"<celsius>°C"`, in dataset order.
    pub fn formatted(&self) -> Vec<String> {
        ops::format_celsius(&self.readings).collect()
    }

    /// Readings above 20°C as `"<city>: <celsius>°C"`, in dataset order.
    pub fn above_threshold(&self) -> Vec<String> {
        ops::warmer_than(&self.readings, WARM_THRESHOLD).collect()
    }

    /// Three hourly registers per reading, grouped by reading.
    pub fn hourly(&self) -> Vec<String> {
        ops::expand_hourly(&self.readings)
            .map(|timed| timed.to_string())
            .collect()
    }

    /// The first two readings merged with the next two, as if they came from
    /// two independent feeds.
    pub fn merged(&self) -> Vec<Reading> {
        ops::interleave(&self.readings[..2], &self.readings[2..4])
            .cloned()
            .collect()
    }

    /// Temperatures paired with report times, index by index.
    pub fn timed(&self) -> Vec<String> {
        let temps: Vec<i32> = self.readings.iter().map(|reading| reading.celsius).collect();
        ops::zip_with_times(&temps, &REPORT_TIMES).collect()
    }

    /// Replays the dataset as a burst through a debounced stream and returns
    /// whatever survives the quiescence window. For a burst that is exactly
    /// one element, the last reading.
    pub async fn debounced_last(&self) -> Result<Vec<String>> {
        let config = ReplaySourceConfigBuilder::new(self.readings.clone()).build();
        let replay = ReplaySource::new(config);
        let debounced = replay
            .source()
            .to_stream()
            .map(|reading: &Reading| reading.to_string())
            .debounce(self.window);

        let survivors = Rc::new(RefCell::new(Vec::new()));
        let sink_survivors = survivors.clone();
        debounced
            .stream()
            .sink(move |line: &String| sink_survivors.borrow_mut().push(line.clone()));

        EngineBuilder::new()
            .add_stream(replay.source().to_stream())
            .add_debounced(debounced)
            .add_source_owned("Temperaturas", replay)
            .build()
            .run()
            .await?;

        let result = survivors.borrow().clone();
        Ok(result)
    }

    /// Prints all six demonstrations to stdout in section order. Blocks for
    /// at least the quiescence window so the debounced emission is observed.
    pub async fn run(&self) -> Result<()> {
        for line in self.formatted() {
            println!("{line}");
        }

        println!("\nTemperaturas mayores de 20°C:");
        for line in self.above_threshold() {
            println!("{line}");
        }

        println!("\nTemperaturas por hora (con flatMap):");
        for line in self.hourly() {
            println!("{line}");
        }

        println!("\nCombinando datos de dos flujos (merge):");
        for reading in self.merged() {
            println!("{reading}");
        }

        println!("\nCombinando temperaturas con tiempos (zip):");
        for line in self.timed() {
            println!("{line}");
        }

        println!("\nTemperaturas con debounce:");
        for line in self.debounced_last().await? {
            println!("Última temperatura: {line}");
        }

        Ok(())
    }
}
