//! Gamma-counting time planning for activated foils
//!
//! Given irradiation parameters, foil geometry, detector geometry and
//! a target statistical precision, the crate computes the optimal
//! gamma-counting time for an activated foil — and the matching
//! background counting time — and prints a human-readable report.
//!
//! The pipeline runs once per [`CountScenario`]:
//!
//! 1. [`nuclear::production_decay`] gives the product atoms present at
//!    the start of counting,
//! 2. [`detector::plan_standoff`] settles the counting position and
//!    the absolute photopeak efficiency,
//! 3. the decaying count-rate integrand is integrated and iterated by
//!    [`counting::foil_count_time`] to the counting window reaching
//!    the target precision.
//!
//! Decay data is injected through the [`DecayData`] trait: the
//! built-in [`NuclideTable`] or user-supplied [`Overrides`].
//!
//! ```no_run
//! use activation_counting::{CountScenario, NuclideTable};
//!
//! let report = CountScenario::default().plan(&NuclideTable::default())?;
//! report.summary();
//! # Ok::<(), activation_counting::scenario::ScenarioError>(())
//! ```

pub mod counting;
pub mod detector;
pub mod error;
pub mod nuclear;
pub mod nuclide;
#[cfg(feature = "plot")]
pub mod plot;
pub mod report;
pub mod scenario;

pub use counting::{foil_count_time, CountTimes, Inventory};
pub use error::Error;
pub use nuclide::{DecayData, GammaLine, Nuclide, NuclideTable, Overrides};
pub use report::{CountReport, Outcome};
pub use scenario::CountScenario;
