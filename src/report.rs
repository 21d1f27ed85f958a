//! Human-readable counting report

use crate::{
    counting::CountTimes,
    detector::Standoff,
    nuclide::{GammaLine, Nuclide},
};

/// What the count-time solver settled on
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Converged(CountTimes),
    /// The target precision cannot be reached on this line
    Unachievable,
    /// The fixed-point iteration hit its round cap
    NotConverged { iterations: usize },
}

/// Results of one counting scenario
#[derive(Debug, Clone)]
pub struct CountReport {
    pub nuclide: Nuclide,
    /// Half-life [s] used throughout
    pub half_life: f64,
    /// The line counted
    pub line: GammaLine,
    /// Product atoms at the start of counting
    pub atoms: f64,
    /// Activity at the start of counting [Bq]
    pub activity_bq: f64,
    /// Activity per gram of foil [Bq/g]
    pub specific_activity: f64,
    /// Counting position settled by the standoff search
    pub standoff: Standoff,
    /// Target relative uncertainty
    pub sigma: f64,
    pub outcome: Outcome,
}
impl CountReport {
    pub fn summary(&self) {
        println!(
            "COUNT PLAN: {} ({:.2} keV, {:.2}% branch)",
            self.nuclide, self.line.energy_kev, self.line.branching_pct
        );
        println!(
            " - half-life: {:12.1}s ({:8.2}hr)",
            self.half_life,
            self.half_life / 3600.
        );
        println!(" - atoms at count start: {:12.4e}", self.atoms);
        println!(
            " - starting activity: {:12.4e}Bq ({:.4e}Bq/g)",
            self.activity_bq, self.specific_activity
        );
        println!(" - foil standoff: {:.0}cm", self.standoff.distance);
        println!(
            " - absolute efficiency: {:12.4e}",
            self.standoff.efficiency
        );
        println!(
            " - predicted dead time: {:8.3}%",
            self.standoff.dead_time_fraction * 100.
        );
        if self.standoff.hot {
            println!(
                " - WARNING: foil still hot at the standoff limit; efficiency and times are degraded"
            );
        }
        match self.outcome {
            Outcome::Converged(times) => {
                println!(" - average count rate: {:12.4e}counts/s", times.mean_rate);
                println!(
                    " - foil count time: {:12.1}s ({:8.2}hr) for {:.1}% statistics",
                    times.foil,
                    times.foil / 3600.,
                    self.sigma * 100.
                );
                println!(
                    " - background count time: {:12.1}s ({:8.2}hr)",
                    times.background,
                    times.background / 3600.
                );
            }
            Outcome::Unachievable => {
                println!(
                    " - target statistics of {:.1}% are unachievable on this line",
                    self.sigma * 100.
                );
            }
            Outcome::NotConverged { iterations } => {
                println!(
                    " - count-time iteration did not settle after {} rounds; no plan",
                    iterations
                );
            }
        }
    }
}
