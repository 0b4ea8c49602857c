//! # Frame Rate Measurement
//!
//! The render loop bumps a shared [`FrameCounter`] once per frame. A
//! [`FrameRateMonitor`] runs on its own thread, wakes once per sample interval
//! and turns the counter delta into frames per second:
//!
//! ```text
//! fps = (counter - previous_counter) / elapsed_ms * 1000
//! ```
//!
//! The result is published to an [`FpsGauge`] that the display thread reads
//! without locking. The monitor never touches particles or strategies.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use strokebench::performance::{FrameCounter, FrameRateMonitor};
//!
//! let counter = FrameCounter::new();
//! let mut monitor = FrameRateMonitor::new(counter.clone(), Duration::from_millis(1000));
//! monitor.start();
//!
//! // In the render loop
//! counter.increment();
//!
//! println!("FPS: {:.1}", monitor.gauge().get());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::drawing::DrawStats;
use crate::strategies::StrategyKind;

/// Default interval between FPS samples
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(1000);

/// Monotonic count of rendered frames, shared with the monitor thread
#[derive(Clone, Debug, Default)]
pub struct FrameCounter(Arc<AtomicU64>);

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished frame, returning the new total
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Latest published FPS value
#[derive(Clone, Debug, Default)]
pub struct FpsGauge {
    bits: Arc<AtomicU64>,
    samples: Arc<AtomicU64>,
}

impl FpsGauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, fps: f64) {
        self.bits.store(fps.to_bits(), Ordering::Relaxed);
        self.samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Number of values published so far
    pub fn samples(&self) -> u64 {
        self.samples.load(Ordering::Relaxed)
    }
}

/// The active strategy as seen from the monitor thread, for log lines
#[derive(Clone, Debug, Default)]
pub struct StrategyTag(Arc<AtomicUsize>);

impl StrategyTag {
    pub fn set(&self, kind: StrategyKind) {
        self.0.store(kind.index(), Ordering::Relaxed);
    }

    pub fn get(&self) -> StrategyKind {
        StrategyKind::from_index(self.0.load(Ordering::Relaxed)).unwrap_or_default()
    }
}

/// Frames per second for `frames` rendered over `elapsed`
///
/// Returns 0 when no time has passed.
pub fn compute_fps(frames: u64, elapsed: Duration) -> f64 {
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    if elapsed_ms <= 0.0 {
        return 0.0;
    }
    frames as f64 / elapsed_ms * 1000.0
}

/// Counter delta bookkeeping between two samples
#[derive(Debug, Clone, Copy)]
pub struct FrameRateSampler {
    previous_counter: u64,
    last_sample: Instant,
}

impl FrameRateSampler {
    pub fn new(counter: u64, now: Instant) -> Self {
        Self {
            previous_counter: counter,
            last_sample: now,
        }
    }

    /// Take a sample at `now` and restart the clock
    pub fn sample(&mut self, counter: u64, now: Instant) -> f64 {
        let frames = counter.wrapping_sub(self.previous_counter);
        let fps = compute_fps(frames, now.saturating_duration_since(self.last_sample));
        self.previous_counter = counter;
        self.last_sample = now;
        fps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Sampling,
}

/// Periodic FPS sampler running on a background thread
pub struct FrameRateMonitor {
    counter: FrameCounter,
    gauge: FpsGauge,
    strategy: StrategyTag,
    interval: Duration,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl FrameRateMonitor {
    pub fn new(counter: FrameCounter, interval: Duration) -> Self {
        Self {
            counter,
            gauge: FpsGauge::new(),
            strategy: StrategyTag::default(),
            interval,
            stop: None,
            worker: None,
        }
    }

    pub fn with_strategy_tag(mut self, tag: StrategyTag) -> Self {
        self.strategy = tag;
        self
    }

    pub fn gauge(&self) -> &FpsGauge {
        &self.gauge
    }

    pub fn state(&self) -> MonitorState {
        if self.worker.is_some() {
            MonitorState::Sampling
        } else {
            MonitorState::Idle
        }
    }

    /// Move from `Idle` to `Sampling`; does nothing when already sampling
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let counter = self.counter.clone();
        let gauge = self.gauge.clone();
        let strategy = self.strategy.clone();
        let interval = self.interval;

        let worker = thread::spawn(move || {
            let mut sampler = FrameRateSampler::new(counter.get(), Instant::now());
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let fps = sampler.sample(counter.get(), Instant::now());
                        gauge.publish(fps);
                        info!("FPS: {fps:.1} ({})", strategy.get());
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        debug!("Frame rate monitor sampling every {:?}", self.interval);
        self.stop = Some(stop_tx);
        self.worker = Some(worker);
    }

    /// Stop sampling and wait for the worker thread to exit
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            debug!("Frame rate monitor stopped");
        }
    }
}

impl Drop for FrameRateMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Rolling frame-time history and last draw statistics for display
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    last_draw: DrawStats,
}

impl FrameStats {
    pub fn new(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            frame_start: None,
            last_draw: DrawStats::default(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    pub fn end_frame(&mut self, draw: DrawStats) {
        if let Some(start) = self.frame_start.take() {
            self.push_frame_time(start.elapsed());
        }
        self.last_draw = draw;
    }

    pub fn push_frame_time(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    pub fn last_draw(&self) -> DrawStats {
        self.last_draw
    }

    /// Mean frame time in milliseconds over the history window
    pub fn average_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: Duration = self.frame_times.iter().sum();
        (total / self.frame_times.len() as u32).as_secs_f32() * 1000.0
    }

    /// Frame times in milliseconds, oldest first, for graphing
    pub fn history_ms(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}
