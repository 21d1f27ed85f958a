//! One counting experiment, from irradiation to counting plan

use serde::Deserialize;

use crate::{
    counting::{foil_count_time, CountingError, Inventory},
    detector::{plan_standoff, DetectorError, EfficiencyCurve},
    nuclear::{activity, production_decay, NuclearError},
    nuclide::{DecayData, GammaLine, Nuclide, NuclideError, Overrides},
    report::{CountReport, Outcome},
};

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("invalid scenario: {0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Nuclide(#[from] NuclideError),
    #[error(transparent)]
    Nuclear(#[from] NuclearError),
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    Counting(#[from] CountingError),
}

/// Flat record of the experimental inputs
///
/// The default is the Zr97 reference run: a zirconium foil irradiated
/// for 16 hours and counted on detector #2.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CountScenario {
    /// Activation product counted, e.g. "Zr97"
    pub isotope: String,
    /// Reaction rate per source particle per cm^3
    pub reaction_rate: f64,
    /// Foil radius [cm]
    pub foil_radius: f64,
    /// Foil height [cm]
    pub foil_height: f64,
    /// Foil density [g/cm^3]
    pub foil_density: f64,
    /// Branching-ratio override [%]; the tabulated value otherwise
    pub branching_pct: Option<f64>,
    /// Gamma-energy override [keV]; the tabulated line otherwise
    pub gamma_kev: Option<f64>,
    /// Post-irradiation transfer delay [s]
    pub decay_delay: f64,
    /// Source strength [particles/s]
    pub source_strength: f64,
    /// Irradiation duration [s]
    pub irradiation_time: f64,
    /// Detector radius [cm]
    pub detector_radius: f64,
    /// Minimum foil-to-detector distance [cm]
    pub min_standoff: f64,
    /// Background count rate at the line of interest [1/s]
    pub background: f64,
    /// Target relative statistical uncertainty, fractional form
    pub sigma: f64,
    /// Detector response curve
    pub curve: EfficiencyCurve,
}
impl Default for CountScenario {
    fn default() -> Self {
        Self {
            isotope: String::from("Zr97"),
            reaction_rate: 2.03e-9,
            foil_radius: 0.635,
            foil_height: 0.05593,
            foil_density: 6.506,
            branching_pct: None,
            gamma_kev: None,
            decay_delay: 360.,
            source_strength: 9.94e9,
            irradiation_time: 57600.,
            detector_radius: 3.245,
            min_standoff: 1.,
            background: 1e-7,
            sigma: 0.025,
            curve: EfficiencyCurve::default(),
        }
    }
}
impl CountScenario {
    /// Foil volume [cm^3]
    pub fn volume(&self) -> f64 {
        std::f64::consts::PI * self.foil_radius * self.foil_radius * self.foil_height
    }
    /// Foil mass [g]
    pub fn mass(&self) -> f64 {
        self.foil_density * self.volume()
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        use ScenarioError::Invalid;
        if self.foil_radius <= 0. {
            return Err(Invalid("the foil radius must be positive"));
        }
        if self.foil_height <= 0. {
            return Err(Invalid("the foil height must be positive"));
        }
        if self.foil_density <= 0. {
            return Err(Invalid("the foil density must be positive"));
        }
        if self.reaction_rate < 0. {
            return Err(Invalid("the reaction rate cannot be negative"));
        }
        if self.source_strength < 0. {
            return Err(Invalid("the source strength cannot be negative"));
        }
        if self.irradiation_time < 0. {
            return Err(Invalid("the irradiation time cannot be negative"));
        }
        if self.decay_delay < 0. {
            return Err(Invalid("the transfer delay cannot be negative"));
        }
        if self.detector_radius <= 0. {
            return Err(Invalid("the detector radius must be positive"));
        }
        if self.min_standoff < 1. {
            return Err(Invalid(
                "the minimum standoff must be at least 1 cm for the solid-angle series",
            ));
        }
        if self.background < 0. {
            return Err(Invalid("the background rate cannot be negative"));
        }
        if !(self.sigma > 0. && self.sigma <= 1.) {
            return Err(Invalid(
                "the relative statistic level must be a fraction in (0, 1]",
            ));
        }
        if let Some(br) = self.branching_pct {
            if !(br > 0. && br <= 100.) {
                return Err(Invalid("the branching ratio must be in (0, 100] percent"));
            }
        }
        if let Some(energy) = self.gamma_kev {
            if energy <= 0. {
                return Err(Invalid("the gamma energy must be positive"));
            }
        }
        Ok(())
    }

    /// Runs the pipeline: yield, standoff and efficiency, count times
    pub fn plan<D: DecayData>(&self, data: &D) -> Result<CountReport, ScenarioError> {
        self.validate()?;
        let nuclide = Nuclide::parse(&self.isotope)?;

        // direct user input wins over the tabulated line data
        let provider = match (self.gamma_kev, self.branching_pct) {
            (None, None) => Overrides::new(data),
            (energy_kev, branching_pct) => {
                let tabulated = data.gamma_line(&nuclide)?;
                Overrides::new(data).gamma_line(GammaLine {
                    energy_kev: energy_kev.unwrap_or(tabulated.energy_kev),
                    branching_pct: branching_pct.unwrap_or(tabulated.branching_pct),
                })
            }
        };
        let half_life = DecayData::half_life(&provider, &nuclide)?;
        if half_life <= 0. {
            return Err(ScenarioError::Invalid(
                "the tabulated half-life is not positive",
            ));
        }
        let line = DecayData::gamma_line(&provider, &nuclide)?;

        let atoms = production_decay(
            half_life,
            0.,
            self.irradiation_time,
            self.reaction_rate,
            self.source_strength,
            self.volume(),
            self.decay_delay,
        )?;
        let activity_bq = activity(half_life, atoms, 0.);

        let standoff = plan_standoff(
            &self.curve,
            line.energy_kev,
            self.foil_radius,
            self.detector_radius,
            self.min_standoff,
            activity_bq * line.branching_pct / 100.,
        )?;

        let efficiency = standoff.efficiency * line.branching_pct / 100.;
        let outcome = match foil_count_time(
            self.sigma,
            half_life,
            Inventory::Atoms(atoms),
            efficiency,
            self.background,
        ) {
            Ok(times) => Outcome::Converged(times),
            Err(CountingError::UnachievableStatistics) => Outcome::Unachievable,
            Err(CountingError::NonConvergence { iterations }) => {
                Outcome::NotConverged { iterations }
            }
            Err(err) => return Err(err.into()),
        };

        Ok(CountReport {
            nuclide,
            half_life,
            line,
            atoms,
            activity_bq,
            specific_activity: activity_bq / self.mass(),
            standoff,
            sigma: self.sigma,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nuclide::NuclideTable;

    #[test]
    fn reference_run() {
        let scenario = CountScenario::default();
        let report = scenario.plan(&NuclideTable::default()).unwrap();
        assert!((report.atoms - 5.998e4).abs() / 5.998e4 < 1e-3);
        assert_eq!(report.standoff.distance, 1.);
        assert!(!report.standoff.hot);
        assert!(report.standoff.dead_time_fraction < 1e-4);
        match report.outcome {
            Outcome::Converged(times) => {
                // counting this foil to 2.5% takes days, not hours;
                // the window is a steep function of the response-curve
                // calibration so only the order of magnitude is pinned
                assert!(times.foil > 1e5 && times.foil < 5e5);
                assert!(times.background > 300. && times.background < 2000.);
                assert!((times.mean_rate - 0.007).abs() < 0.003);
                // the mean rate is the decayed average over the window
                let r0 = report.activity_bq
                    * report.standoff.efficiency
                    * report.line.branching_pct
                    / 100.;
                let lambda = 2f64.ln() / report.half_life;
                let mean = r0 * (1. - (-lambda * times.foil).exp()) / (lambda * times.foil);
                assert!((times.mean_rate - mean).abs() / mean < 1e-3);
                // optimal split between foil and background windows
                let split = (scenario.background / (times.mean_rate + scenario.background)).sqrt();
                assert!((times.background / times.foil - split).abs() < 1e-12);
            }
            ref other => panic!("expected converged times, got {:?}", other),
        }
    }

    #[test]
    fn zero_background_reports_unachievable() {
        let scenario = CountScenario {
            background: 0.,
            ..Default::default()
        };
        let report = scenario.plan(&NuclideTable::default()).unwrap();
        assert!(matches!(report.outcome, Outcome::Unachievable));
    }

    #[test]
    fn unknown_isotope_is_fatal() {
        let scenario = CountScenario {
            isotope: String::from("Xx999"),
            ..Default::default()
        };
        assert!(matches!(
            scenario.plan(&NuclideTable::default()),
            Err(ScenarioError::Nuclide(NuclideError::Unknown(_)))
        ));
    }

    #[test]
    fn overrides_reach_the_report() {
        let scenario = CountScenario {
            branching_pct: Some(50.),
            gamma_kev: Some(800.),
            ..Default::default()
        };
        let report = scenario.plan(&NuclideTable::default()).unwrap();
        assert!((report.line.branching_pct - 50.).abs() < 1e-9);
        assert!((report.line.energy_kev - 800.).abs() < 1e-9);
    }

    #[test]
    fn partial_override_keeps_the_tabulated_rest() {
        let scenario = CountScenario {
            branching_pct: Some(50.),
            ..Default::default()
        };
        let report = scenario.plan(&NuclideTable::default()).unwrap();
        assert!((report.line.branching_pct - 50.).abs() < 1e-9);
        assert!((report.line.energy_kev - 743.36).abs() < 1e-9);
    }

    #[test]
    fn validation_catches_nonsense() {
        let bad = CountScenario {
            foil_radius: -1.,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ScenarioError::Invalid(_))));
        let bad = CountScenario {
            sigma: 0.,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ScenarioError::Invalid(_))));
        let bad = CountScenario {
            min_standoff: 0.5,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ScenarioError::Invalid(_))));
    }

    #[test]
    fn tighter_statistics_need_more_time() {
        let table = NuclideTable::default();
        let foil_time = |sigma: f64| {
            let scenario = CountScenario {
                sigma,
                ..Default::default()
            };
            match scenario.plan(&table).unwrap().outcome {
                Outcome::Converged(times) => times.foil,
                ref other => panic!("expected converged times, got {:?}", other),
            }
        };
        assert!(foil_time(0.05) < foil_time(0.025));
    }
}
