//! Latency sketches used by the `profiler` feature of rangefold.
#![deny(missing_docs)]

use core::cell::RefCell;
use minstant::Instant;
use sketches_ddsketch::{Config, DDSketch};
use std::rc::Rc;

/// Records the elapsed time of the enclosing scope into the given [Sketch].
///
/// ```
/// use rangefold_stats::{profile_scope, Sketch};
///
/// let sketch = Sketch::default();
/// {
///     profile_scope!(&sketch);
/// }
/// assert_eq!(sketch.percentiles().count(), 1);
/// ```
#[macro_export]
macro_rules! profile_scope {
    ($sketch:expr) => {
        let _measure = $crate::Measure::new($sketch);
    };
}

/// Summarises a sketch into a fixed set of percentiles
pub fn sketch_percentiles(sketch: &DDSketch) -> Percentiles {
    let quantile = |q: f64| sketch.quantile(q).ok().flatten().unwrap_or(0.0);
    Percentiles {
        count: sketch.count(),
        min: sketch.min().unwrap_or(0.0),
        p50: quantile(0.5),
        p99: quantile(0.99),
        p99_9: quantile(0.999),
        p99_99: quantile(0.9999),
        max: sketch.max().unwrap_or(0.0),
    }
}

/// Latency percentiles in nanoseconds
#[derive(Default, Clone, Copy)]
pub struct Percentiles {
    count: usize,
    min: f64,
    p50: f64,
    p99: f64,
    p99_9: f64,
    p99_99: f64,
    max: f64,
}

impl Percentiles {
    /// Number of recorded samples
    pub fn count(&self) -> usize {
        self.count
    }
    /// Median latency
    pub fn p50(&self) -> f64 {
        self.p50
    }
    /// Largest recorded latency
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl std::fmt::Debug for Percentiles {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Percentiles")
            .field("count", &self.count)
            .field("min", &format_args!("{:.2}ns", self.min))
            .field("p50", &format_args!("{:.2}ns", self.p50))
            .field("p99", &format_args!("{:.2}ns", self.p99))
            .field("p99.9", &format_args!("{:.2}ns", self.p99_9))
            .field("p99.99", &format_args!("{:.2}ns", self.p99_99))
            .field("max", &format_args!("{:.2}ns", self.max))
            .finish()
    }
}

/// A shared handle to a latency sketch
///
/// Cloning the handle shares the underlying sketch.
#[derive(Clone)]
pub struct Sketch {
    inner: Rc<RefCell<DDSketch>>,
}

impl Default for Sketch {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DDSketch::new(Config::new(0.01, 2048, 1.0e-9)))),
        }
    }
}

impl Sketch {
    /// Adds a sample to the sketch
    #[inline]
    pub fn add(&self, data: f64) {
        self.inner.borrow_mut().add(data)
    }
    /// Returns the current percentiles of the sketch
    pub fn percentiles(&self) -> Percentiles {
        sketch_percentiles(&self.inner.borrow())
    }
}

impl std::fmt::Debug for Sketch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.percentiles().fmt(f)
    }
}

// Inspired by https://github.com/spacejam/sled/blob/main/src/metrics.rs
/// Guard that records its own lifetime into a [Sketch] when dropped
pub struct Measure {
    start: Instant,
    sketch: Sketch,
}

impl Measure {
    /// Starts a new measurement
    #[inline]
    pub fn new(sketch: &Sketch) -> Measure {
        Measure {
            sketch: sketch.clone(), // clones Rc
            start: Instant::now(),
        }
    }
}

impl Drop for Measure {
    #[inline]
    fn drop(&mut self) {
        self.sketch.add(self.start.elapsed().as_nanos() as f64);
    }
}
