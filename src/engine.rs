use crate::sources::replay::ReplaySource;
use crate::{Debounced, IdleEmitter, Stream};
use anyhow::{anyhow, Result};
use futures_util::future::pending;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::Instant;

pub trait EngineSource: 'static {
    fn run<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>>;
}

pub struct EngineBuilder {
    streams: Vec<Box<dyn Any>>, // hold onto streams to keep pipelines alive
    sources: Vec<(String, Arc<dyn EngineSource>)>,
    idle_emitters: Vec<Rc<dyn IdleEmitter>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            streams: Vec::new(),
            sources: Vec::new(),
            idle_emitters: Vec::new(),
        }
    }

    pub fn add_stream<T>(mut self, stream: Stream<T>) -> Self
    where
        T: 'static,
    {
        self.streams.push(Box::new(stream));
        self
    }

    pub fn add_source<S>(mut self, label: impl Into<String>, source: Arc<S>) -> Self
    where
        S: EngineSource,
    {
        self.sources
            .push((label.into(), source as Arc<dyn EngineSource>));
        self
    }

    pub fn add_source_owned<S>(self, label: impl Into<String>, source: S) -> Self
    where
        S: EngineSource,
    {
        self.add_source(label, Arc::new(source))
    }

    pub fn add_debounced<T>(mut self, debounced: Debounced<T>) -> Self
    where
        T: Clone + 'static,
    {
        self.streams.push(Box::new(debounced.stream()));
        self.idle_emitters.push(debounced.as_idle_emitter());
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            streams: self.streams,
            sources: self.sources,
            idle_emitters: self.idle_emitters,
        }
    }
}

impl<T> EngineSource for ReplaySource<T>
where
    T: Clone + 'static,
{
    fn run<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(async move { self.start().await })
    }
}

pub struct Engine {
    #[allow(dead_code)]
    streams: Vec<Box<dyn Any>>,
    sources: Vec<(String, Arc<dyn EngineSource>)>,
    idle_emitters: Vec<Rc<dyn IdleEmitter>>,
}

impl Engine {
    /// Drives every source to completion, then keeps running until no idle
    /// emitter holds a pending deadline. That last part matters: a debounce
    /// window that spans past the final arrival must still get to fire.
    pub async fn run(self) -> Result<()> {
        let rearm = Rc::new(Notify::new());
        for emitter in &self.idle_emitters {
            let notify = rearm.clone();
            emitter.set_rearm_hook(Rc::new(move || notify.notify_one()));
        }

        let tasks = FuturesUnordered::new();
        for (label, source) in &self.sources {
            let label_clone = label.clone();
            let source_clone = Arc::clone(source);
            tasks.push(async move { source_clone.run().await.map_err(|err| (label_clone, err)) });
        }

        tokio::pin!(tasks);

        let mut sources_done = self.sources.is_empty();

        loop {
            let next_deadline = self
                .idle_emitters
                .iter()
                .filter_map(|emitter| emitter.deadline())
                .min();

            if sources_done && next_deadline.is_none() {
                return Ok(());
            }

            tokio::select! {
                res = tasks.next(), if !sources_done => {
                    match res {
                        Some(Ok(())) => continue,
                        Some(Err((label, err))) => return Err(anyhow!("{} source error: {}", label, err)),
                        None => sources_done = true,
                    }
                }
                // An arrival moved a deadline; recompute the next wakeup.
                _ = rearm.notified() => {}
                triggered = async {
                    if let Some(instant) = next_deadline {
                        tokio::time::sleep_until(instant).await;
                        true
                    } else {
                        pending::<()>().await;
                        false
                    }
                } => {
                    if triggered {
                        let now = Instant::now();
                        for emitter in &self.idle_emitters {
                            if emitter.deadline().is_some_and(|deadline| deadline <= now) {
                                emitter.flush();
                            }
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!("\nReceived interrupt. Shutting down engine...");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::replay::ReplaySourceConfigBuilder;
    use std::cell::RefCell;
    use std::time::Duration;

    struct FailingSource;

    impl EngineSource for FailingSource {
        fn run<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
            Box::pin(async { Err(anyhow!("boom")) })
        }
    }

    fn collected(stream: &Stream<i32>) -> Rc<RefCell<Vec<i32>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = seen.clone();
        stream.sink(move |item: &i32| sink_seen.borrow_mut().push(*item));
        seen
    }

    #[tokio::test]
    async fn empty_engine_completes_immediately() {
        EngineBuilder::new().build().run().await.unwrap();
    }

    #[tokio::test]
    async fn source_errors_carry_their_label() {
        let err = EngineBuilder::new()
            .add_source_owned("Lecturas", FailingSource)
            .build()
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Lecturas source error"));
    }

    #[tokio::test]
    async fn burst_debounce_emits_only_the_last_element_after_the_window() {
        let window = Duration::from_millis(30);
        let config = ReplaySourceConfigBuilder::new(vec![16, 22, 28, 30, 17]).build();
        let replay = ReplaySource::new(config);
        let debounced = replay.source().to_stream().debounce(window);
        let seen = collected(&debounced.stream());

        let started = Instant::now();
        EngineBuilder::new()
            .add_debounced(debounced)
            .add_source_owned("Lecturas", replay)
            .build()
            .run()
            .await
            .unwrap();

        assert_eq!(*seen.borrow(), vec![17]);
        assert!(started.elapsed() >= window);
    }

    #[tokio::test]
    async fn arrivals_within_the_window_keep_the_countdown_restarting() {
        let config = ReplaySourceConfigBuilder::new(vec![1, 2, 3, 4, 5])
            .with_cadence(Duration::from_millis(10))
            .build();
        let replay = ReplaySource::new(config);
        let debounced = replay
            .source()
            .to_stream()
            .debounce(Duration::from_millis(100));
        let seen = collected(&debounced.stream());

        EngineBuilder::new()
            .add_debounced(debounced)
            .add_source_owned("Lecturas", replay)
            .build()
            .run()
            .await
            .unwrap();

        assert_eq!(*seen.borrow(), vec![5]);
    }

    #[tokio::test]
    async fn gaps_longer_than_the_window_emit_per_element() {
        let config = ReplaySourceConfigBuilder::new(vec![1, 2, 3])
            .with_cadence(Duration::from_millis(60))
            .build();
        let replay = ReplaySource::new(config);
        let debounced = replay
            .source()
            .to_stream()
            .debounce(Duration::from_millis(15));
        let seen = collected(&debounced.stream());

        EngineBuilder::new()
            .add_debounced(debounced)
            .add_source_owned("Lecturas", replay)
            .build()
            .run()
            .await
            .unwrap();

        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn debounced_streams_compose_with_map() {
        let config = ReplaySourceConfigBuilder::new(vec![16, 34]).build();
        let replay = ReplaySource::new(config);
        let debounced = replay
            .source()
            .to_stream()
            .map(|celsius: &i32| format!("{celsius}°C"))
            .debounce(Duration::from_millis(20));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = seen.clone();
        debounced
            .stream()
            .sink(move |line: &String| sink_seen.borrow_mut().push(line.clone()));

        EngineBuilder::new()
            .add_debounced(debounced)
            .add_source_owned("Lecturas", replay)
            .build()
            .run()
            .await
            .unwrap();

        assert_eq!(*seen.borrow(), vec!["34°C".to_string()]);
    }
}
