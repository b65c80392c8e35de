use crate::generator::Generator;
use crate::sink::LogSink;
use rand::Rng;
use std::error::Error;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Delay between two ticks.
///
/// With `min == max` every tick waits the same amount; otherwise each
/// delay is drawn uniformly from `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickInterval {
    min: Duration,
    max: Duration,
}

impl TickInterval {
    pub fn fixed(every: Duration) -> Self {
        Self {
            min: every,
            max: every,
        }
    }

    /// Bounds given in the wrong order are swapped.
    pub fn jittered(min: Duration, max: Duration) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("log sink failed on tick {tick}: {source}")]
    Sink {
        tick: u64,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

/// Totals reported when the loop stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub records: u64,
}

/// Cancellable periodic task that drives a [`Generator`] into a
/// [`LogSink`], one tick at a time.
///
/// The sink is owned by the runner for its whole lifetime, so there is
/// exactly one writer per process.
pub struct Runner {
    generator: Generator,
    sink: Arc<dyn LogSink>,
    interval: TickInterval,
    /// Ticks started so far.
    pub ticks: Arc<AtomicU64>,
    /// Records accepted by the sink so far.
    pub emitted_records: Arc<AtomicU64>,
}

impl Runner {
    pub fn new(generator: Generator, sink: Arc<dyn LogSink>, interval: TickInterval) -> Self {
        Self {
            generator,
            sink,
            interval,
            ticks: Arc::new(AtomicU64::new(0)),
            emitted_records: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run until `cancel` fires or the sink fails.
    ///
    /// Cancellation is observed before each tick, right after the tick's
    /// records are written, and while sleeping. A tick that has started
    /// always finishes writing its records.
    ///
    /// **Returns**
    /// - `Ok(RunStats)` after a cancellation.
    /// - `Err(RunError::Sink)` on the first record the sink rejects; no
    ///   further records are attempted.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<RunStats, RunError> {
        info!(
            mode = ?self.generator.mode(),
            min_interval = ?self.interval.min(),
            max_interval = ?self.interval.max(),
            "log generator started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            let records = self.generator.tick();
            debug!(tick, records = records.len(), "tick");

            for record in &records {
                if let Err(source) = self.sink.send(record).await {
                    return Err(RunError::Sink { tick, source });
                }
                self.emitted_records.fetch_add(1, Ordering::Relaxed);
            }

            if cancel.is_cancelled() {
                break;
            }

            let delay = self.interval.next_delay(self.generator.rng());
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(delay) => {}
            }
        }

        if let Err(e) = self.sink.flush().await {
            warn!(error = %e, "flushing log sink on shutdown failed");
        }

        let stats = self.stats();
        info!(ticks = stats.ticks, records = stats.records, "log generator stopped");
        Ok(stats)
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            records: self.emitted_records.load(Ordering::Relaxed),
        }
    }
}
