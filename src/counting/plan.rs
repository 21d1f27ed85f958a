//! Counting order for a batch of foils
//!
//! Foils queue for a single detector, so the order they are counted in
//! matters: everything waiting decays while one foil occupies the
//! counter. Every permutation of the foil set is simulated and the one
//! with the smallest total counter occupancy wins.

use std::cmp::Ordering;

use indicatif::{ParallelProgressIterator, ProgressBar};
use itertools::Itertools;
use rayon::prelude::*;
use serde::Deserialize;

use super::{foil_count_time, Inventory};
use crate::{
    detector::{volume_solid_angle, DetectorError, EfficiencyCurve},
    nuclear::{decay, fractional_solid_angle},
};

#[derive(thiserror::Error, Debug)]
pub enum PlanError {
    #[error("no reaction lines to schedule")]
    Empty,
    #[error("failed to read the reaction-line table")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Detector(#[from] DetectorError),
}

/// One reaction line of a foil, as read from the input table
///
/// A foil with several activation products carries one record per
/// line; records sharing a `Foil` value are counted together.
#[derive(Deserialize, Debug, Clone)]
pub struct ReactionLine {
    #[serde(rename = "Foil")]
    pub foil: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Gamma energy (keV)")]
    pub gamma_kev: f64,
    #[serde(rename = "Half-life (s)")]
    pub half_life_s: f64,
    #[serde(rename = "Activity (Bq)")]
    pub activity_bq: f64,
    #[serde(rename = "Activity uncertainty (Bq)")]
    pub activity_sigma_bq: f64,
    #[serde(rename = "Foil radius (cm)")]
    pub foil_radius_cm: f64,
    #[serde(rename = "Relative statistics")]
    pub rel_stat: f64,
}

/// Reads reaction lines from CSV contents
pub fn lines_from_csv(contents: &str) -> Result<Vec<ReactionLine>, PlanError> {
    let mut rdr = csv::Reader::from_reader(contents.as_bytes());
    let mut lines = Vec::new();
    for result in rdr.deserialize() {
        lines.push(result?);
    }
    Ok(lines)
}

/// A line with its settled counting window
#[derive(Debug, Clone)]
pub struct ScheduledLine {
    pub foil: String,
    pub product: String,
    /// Count time [s]; infinite when the target statistics are out of
    /// reach on this line
    pub count_time: f64,
}

/// Best counting order found for the batch
#[derive(Debug, Clone)]
pub struct CountPlan {
    /// Foil names in counting order
    pub order: Vec<String>,
    /// All lines, sorted by count time
    pub lines: Vec<ScheduledLine>,
    /// Total counter occupancy [s]
    pub total: f64,
}
impl CountPlan {
    pub fn summary(&self) {
        println!("COUNTING ORDER:");
        println!(" - foils: {}", self.order.join(" -> "));
        println!("   {:^12} {:^12} {:>14}", "FOIL", "PRODUCT", "COUNT [s]");
        for line in &self.lines {
            println!(
                " - {:^12} {:^12} {:>14.1}",
                line.foil, line.product, line.count_time
            );
        }
        if self.total.is_finite() {
            println!(
                " - total counter occupancy: {:.1}s ({:.2}hr)",
                self.total,
                self.total / 3600.
            );
        } else {
            println!(" - target statistics unachievable for at least one line");
        }
    }
    /// Writes the schedule to a CSV file
    pub fn to_csv(&self, filename: String) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_path(filename)?;
        wtr.write_record(["Foil", "Product", "Count time (s)"])?;
        for line in &self.lines {
            wtr.write_record(&[
                line.foil.clone(),
                line.product.clone(),
                format!("{}", line.count_time),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Counting-order search over a shared detector geometry
pub struct CountPlanner {
    curve: EfficiencyCurve,
    detector_radius: f64,
    standoff: f64,
    background: f64,
    handle_time: f64,
    to_minute: bool,
}
impl Default for CountPlanner {
    fn default() -> Self {
        Self {
            curve: EfficiencyCurve::default(),
            detector_radius: 5.,
            standoff: 100.,
            background: 0.001,
            handle_time: 60.,
            to_minute: false,
        }
    }
}
impl CountPlanner {
    pub fn curve(self, curve: EfficiencyCurve) -> Self {
        Self { curve, ..self }
    }
    pub fn detector_radius(self, detector_radius: f64) -> Self {
        Self {
            detector_radius,
            ..self
        }
    }
    pub fn standoff(self, standoff: f64) -> Self {
        Self { standoff, ..self }
    }
    pub fn background(self, background: f64) -> Self {
        Self { background, ..self }
    }
    /// Estimated foil swap time [s]
    pub fn handle_time(self, handle_time: f64) -> Self {
        Self {
            handle_time,
            ..self
        }
    }
    /// Rounds each count time up to a whole minute
    pub fn round_to_minute(self) -> Self {
        Self {
            to_minute: true,
            ..self
        }
    }

    fn absolute_efficiency(&self, line: &ReactionLine) -> Result<f64, DetectorError> {
        Ok(self.curve.efficiency(line.gamma_kev)
            * volume_solid_angle(line.foil_radius_cm, self.detector_radius, self.standoff)?
            / fractional_solid_angle(self.detector_radius, self.standoff))
    }

    fn line_count_time(&self, line: &ReactionLine, efficiency: f64, activity_bq: f64) -> f64 {
        let t = match foil_count_time(
            line.rel_stat,
            line.half_life_s,
            Inventory::Becquerels(activity_bq),
            efficiency,
            self.background,
        ) {
            Ok(times) => times.foil,
            Err(_) => return f64::INFINITY,
        };
        if self.to_minute {
            (t / 60.).ceil() * 60.
        } else {
            t
        }
    }

    fn evaluate(&self, order: &[&String], lines: &[ReactionLine], efficiencies: &[f64]) -> CountPlan {
        let mut activity: Vec<f64> = lines.iter().map(|l| l.activity_bq).collect();
        let mut sigma: Vec<f64> = lines.iter().map(|l| l.activity_sigma_bq).collect();
        let mut count_time = vec![0f64; lines.len()];
        let mut total = 0f64;
        for foil in order {
            let members: Vec<usize> = lines.iter().positions(|l| &&l.foil == foil).collect();
            let mut ct = 0f64;
            for &i in &members {
                // 3-sigma derating of the line activity
                let derated = activity[i] - 3. * sigma[i];
                let t = if derated > 0. {
                    self.line_count_time(&lines[i], efficiencies[i], derated)
                } else {
                    f64::INFINITY
                };
                if t > ct {
                    ct = t;
                }
            }
            // every line of a foil is counted for the longest of them
            for &i in &members {
                count_time[i] = ct;
            }
            total += ct;
            // foils still in the queue decay through this count
            for (i, line) in lines.iter().enumerate() {
                if count_time[i] == 0. {
                    let elapsed = ct + self.handle_time;
                    activity[i] = decay(line.half_life_s, activity[i], elapsed);
                    sigma[i] = decay(line.half_life_s, sigma[i], elapsed);
                }
            }
        }
        let mut scheduled: Vec<ScheduledLine> = lines
            .iter()
            .zip(&count_time)
            .map(|(line, &count_time)| ScheduledLine {
                foil: line.foil.clone(),
                product: line.product.clone(),
                count_time,
            })
            .collect();
        scheduled.sort_by(|a, b| {
            a.count_time
                .partial_cmp(&b.count_time)
                .unwrap_or(Ordering::Equal)
        });
        CountPlan {
            order: order.iter().map(|foil| (*foil).clone()).collect(),
            lines: scheduled,
            total,
        }
    }

    /// Finds the counting order minimizing total counter occupancy
    pub fn plan(&self, lines: &[ReactionLine]) -> Result<CountPlan, PlanError> {
        if lines.is_empty() {
            return Err(PlanError::Empty);
        }
        let efficiencies: Vec<f64> = lines
            .iter()
            .map(|line| self.absolute_efficiency(line))
            .collect::<Result<_, _>>()?;
        let foils: Vec<String> = lines.iter().map(|l| l.foil.clone()).unique().collect();
        let orders: Vec<Vec<&String>> = foils.iter().permutations(foils.len()).collect();
        log::info!(
            "scheduling {} lines over {} foils: {} orders to evaluate",
            lines.len(),
            foils.len(),
            orders.len()
        );
        let pb = ProgressBar::new(orders.len() as u64);
        orders
            .par_iter()
            .progress_with(pb)
            .map(|order| self.evaluate(order, lines, &efficiencies))
            .min_by(|a, b| a.total.partial_cmp(&b.total).unwrap_or(Ordering::Equal))
            .ok_or(PlanError::Empty)
    }
}
