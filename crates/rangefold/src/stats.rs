use core::fmt;
use rangefold_stats::Sketch;

/// Latency sketches for the operations of a structure
///
/// A cloned structure starts out with fresh sketches.
#[derive(Default)]
pub struct Stats {
    /// A sketch for recording latencies of building the structure
    pub build: Sketch,
    /// A sketch for recording latencies of point updates
    pub update: Sketch,
    /// A sketch for recording latencies of range queries
    pub query: Sketch,
}

impl Clone for Stats {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Stats")
            .field("build", &self.build.percentiles())
            .field("update", &self.update.percentiles())
            .field("query", &self.query.percentiles())
            .finish()
    }
}
