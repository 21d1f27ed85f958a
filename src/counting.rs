//! Optimal foil and background counting times
//!
//! The average detected count rate over a trial window depends on the
//! window itself (the source decays while it is counted), so the
//! optimal-duration formula is coupled to a numerical quadrature of
//! the count-rate integrand and iterated to a fixed point.

use crate::nuclear::{self, ActivityUnit};

pub mod plan;
pub mod quad;

/// Fixed-point iteration bound; the slowest reference scenario
/// settles in under forty rounds
pub const MAX_ITERATIONS: usize = 100;

#[derive(thiserror::Error, Debug)]
pub enum CountingError {
    #[error("target statistics cannot be achieved on this line")]
    UnachievableStatistics,
    #[error("count-time iteration did not settle after {iterations} rounds")]
    NonConvergence { iterations: usize },
    #[error("{0}")]
    Invalid(&'static str),
}

/// Initial inventory of the decay product at the start of counting
#[derive(Debug, Clone, Copy)]
pub enum Inventory {
    /// Number of atoms
    Atoms(f64),
    /// Activity [Bq]
    Becquerels(f64),
}
impl Inventory {
    /// An activity in the given unit
    pub fn activity(value: f64, unit: ActivityUnit) -> Self {
        Inventory::Becquerels(unit.in_becquerels(value))
    }
    fn value(&self) -> f64 {
        match *self {
            Inventory::Atoms(n) => n,
            Inventory::Becquerels(a) => a,
        }
    }
    /// Detected count rate [1/s], `t` seconds into the count
    ///
    /// `efficiency` is counts per decay: the absolute photopeak
    /// efficiency already folded with the line emission probability.
    pub fn rate(&self, half_life: f64, efficiency: f64, t: f64) -> f64 {
        match *self {
            Inventory::Atoms(n) => nuclear::activity(half_life, n, t) * efficiency,
            Inventory::Becquerels(a) => nuclear::decay(half_life, a, t) * efficiency,
        }
    }
}

/// Converged counting plan for one line
#[derive(Debug, Clone, Copy)]
pub struct CountTimes {
    /// Foil count time [s]
    pub foil: f64,
    /// Background count time [s]
    pub background: f64,
    /// Average detected count rate over the foil window [1/s]
    pub mean_rate: f64,
}

/// Counting time reaching a target relative uncertainty `sigma`
///
/// Iterates the optimal-duration split between source and background
/// counting (Knoll eq. 3.54/3.55) against the window-averaged count
/// rate until the window stabilizes to within a second. A zero
/// background or a line with no counts makes the target precision
/// unreachable and is reported as such rather than as an arithmetic
/// fault.
pub fn foil_count_time(
    sigma: f64,
    half_life: f64,
    inventory: Inventory,
    efficiency: f64,
    background: f64,
) -> Result<CountTimes, CountingError> {
    if !(sigma > 0. && sigma <= 1.) {
        return Err(CountingError::Invalid(
            "the relative statistic level must be in (0, 1]",
        ));
    }
    if half_life <= 0. {
        return Err(CountingError::Invalid("the half-life must be positive"));
    }
    if inventory.value() < 0. {
        return Err(CountingError::Invalid(
            "the initial inventory cannot be negative",
        ));
    }
    if !(efficiency > 0. && efficiency <= 1.) {
        return Err(CountingError::Invalid("the efficiency must be in (0, 1]"));
    }
    if background < 0. {
        return Err(CountingError::Invalid("the background cannot be negative"));
    }
    if background == 0. {
        // the background-ratio term is singular
        return Err(CountingError::UnachievableStatistics);
    }

    let rate = |t: f64| inventory.rate(half_life, efficiency, t);
    let mut tf = 1f64;
    for _ in 0..MAX_ITERATIONS {
        let prev = tf;
        let s = quad::adaptive_simpson(&rate, 0., tf, quad::REL_TOL) / tf;
        if s <= 0. {
            return Err(CountingError::UnachievableStatistics);
        }
        // Knoll eqn 3.54/55
        tf = ((s + background).sqrt() + background.sqrt()).powi(2) / (sigma.powi(2) * s * s)
            / (1. + 1. / ((s + background) / background).sqrt());
        if !tf.is_finite() {
            return Err(CountingError::UnachievableStatistics);
        }
        if tf - prev <= 1. {
            let tb = tf / ((s + background) / background).sqrt();
            return Ok(CountTimes {
                foil: tf,
                background: tb,
                mean_rate: s,
            });
        }
    }
    Err(CountingError::NonConvergence {
        iterations: MAX_ITERATIONS,
    })
}
