/// Seed used for priorities when no seed is configured and `std` is disabled
#[cfg(not(feature = "std"))]
pub const FALLBACK_SEED: u64 = 0x2545_f491_4f6c_dd1d;

/// Configuration for a [Treap](super::Treap)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreapConf {
    /// Seed of the priority generator.
    ///
    /// If not set, priorities are drawn from a fresh unpredictable generator.
    pub seed: Option<u64>,
}

impl TreapConf {
    /// Configures a fixed seed which makes the tree shape reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            #[cfg(feature = "std")]
            None => fastrand::Rng::new(),
            #[cfg(not(feature = "std"))]
            None => fastrand::Rng::with_seed(FALLBACK_SEED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_is_reproducible() {
        let conf = TreapConf::default().with_seed(9);
        assert_eq!(conf.seed, Some(9));
        let mut a = conf.rng();
        let mut b = conf.rng();
        for _ in 0..16 {
            assert_eq!(a.u64(..), b.u64(..));
        }
    }
}
