use crate::Source;
use anyhow::Result;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Configuration for a [`ReplaySource`]: the finite sequence to emit and an
/// optional cadence between consecutive emissions. Without a cadence the
/// whole sequence is emitted as a single burst.
#[derive(Clone, Debug)]
pub struct ReplaySourceConfig<T> {
    pub items: Vec<T>,
    pub cadence: Option<Duration>,
}

pub struct ReplaySourceConfigBuilder<T> {
    items: Vec<T>,
    cadence: Option<Duration>,
}

impl<T> ReplaySourceConfigBuilder<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            cadence: None,
        }
    }

    pub fn with_cadence(mut self, cadence: Duration) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn build(self) -> ReplaySourceConfig<T> {
        ReplaySourceConfig {
            items: self.items,
            cadence: self.cadence,
        }
    }
}

/// Emits a fixed sequence into its [`Source`] and completes. This is the only
/// source kind the demo needs; everything it feeds is literal data.
pub struct ReplaySource<T> {
    config: ReplaySourceConfig<T>,
    source: Source<T>,
}

impl<T> ReplaySource<T>
where
    T: Clone + 'static,
{
    pub fn new(config: ReplaySourceConfig<T>) -> Self {
        Self {
            config,
            source: Source::new(),
        }
    }

    pub fn source(&self) -> &Source<T> {
        &self.source
    }

    pub async fn start(&self) -> Result<()> {
        match self.config.cadence {
            Some(cadence) => {
                let mut ticker = interval(cadence);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                for item in &self.config.items {
                    ticker.tick().await;
                    self.source.emit(item.clone());
                }
            }
            None => {
                for item in &self.config.items {
                    self.source.emit(item.clone());
                }
            }
        }

        Ok(())
    }
}
