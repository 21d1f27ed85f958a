//! Germanium detector response, dead time and foil standoff planning

use strum_macros::EnumIter;

use crate::nuclear::fractional_solid_angle;

/// Spectroscopy chain dead time [s], paralyzable model
pub const DEAD_TIME_S: f64 = 1e-5;
/// Largest acceptable true-to-observed count rate ratio (1% loss)
pub const MAX_LOSS_RATIO: f64 = 1.01;
/// Farthest the foil can be backed away from the detector face [cm]
pub const MAX_STANDOFF_CM: f64 = 5.;

#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    #[error("foil-to-detector distance {0} cm is below the 1 cm validity limit")]
    TooClose(f64),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

/// Fitted photopeak response model
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum CurveModel {
    /// 4-parameter fit in log10 of the energy
    Log10,
    /// 4-factor exponential form, not valid much below 100 keV
    Exponential,
    /// 6-term polynomial in ln of the energy
    LogPolynomial,
}
impl std::fmt::Display for CurveModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveModel::Log10 => write!(f, "log10"),
            CurveModel::Exponential => write!(f, "exponential"),
            CurveModel::LogPolynomial => write!(f, "log-poly"),
        }
    }
}
impl std::str::FromStr for CurveModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log10" => Ok(CurveModel::Log10),
            "exponential" | "exp" => Ok(CurveModel::Exponential),
            "log-poly" | "logpoly" => Ok(CurveModel::LogPolynomial),
            other => Err(format!("unknown efficiency curve model: {}", other)),
        }
    }
}
impl CurveModel {
    /// Calibration of detector #2, bldg 88 rm 131, foil at 1 cm
    pub fn default_curve(self) -> EfficiencyCurve {
        match self {
            CurveModel::Log10 => EfficiencyCurve::Log10 {
                a: 0.03279101,
                b: 0.01462466,
                c: 0.15007903,
                d: -0.0159574,
            },
            CurveModel::Exponential => EfficiencyCurve::Exponential {
                a: 6.00768900e-1,
                b: 5.84842744e-1,
                c: 3.11757094e-11,
                d: 3.76081347,
            },
            CurveModel::LogPolynomial => EfficiencyCurve::LogPolynomial {
                a: -5.86828677e1,
                b: 5.19051212e1,
                c: -1.81078895e1,
                d: 3.12451264,
                f: -2.67044186e-1,
                g: 9.05096028e-3,
            },
        }
    }
}

/// Photopeak efficiency at the calibration distance vs line energy
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub enum EfficiencyCurve {
    Log10 { a: f64, b: f64, c: f64, d: f64 },
    Exponential { a: f64, b: f64, c: f64, d: f64 },
    LogPolynomial { a: f64, b: f64, c: f64, d: f64, f: f64, g: f64 },
}
impl Default for EfficiencyCurve {
    fn default() -> Self {
        CurveModel::Log10.default_curve()
    }
}
impl EfficiencyCurve {
    pub fn model(&self) -> CurveModel {
        match self {
            EfficiencyCurve::Log10 { .. } => CurveModel::Log10,
            EfficiencyCurve::Exponential { .. } => CurveModel::Exponential,
            EfficiencyCurve::LogPolynomial { .. } => CurveModel::LogPolynomial,
        }
    }
    /// Efficiency at a line energy `e` [keV], fractional form
    pub fn efficiency(&self, e: f64) -> f64 {
        match *self {
            EfficiencyCurve::Log10 { a, b, c, d } => {
                let log_e = e.log10();
                a * 10. - b * 10. * log_e + c * 0.1 * log_e * log_e - d * 1e4 / (e * e)
            }
            EfficiencyCurve::Exponential { a, b, c, d } => 1. / (a * e.powf(b) + c * e.powf(d)),
            EfficiencyCurve::LogPolynomial { a, b, c, d, f, g } => {
                let ln_e = e.ln();
                a + b * ln_e
                    + c * ln_e.powi(2)
                    + d * ln_e.powi(3)
                    + f * ln_e.powi(4)
                    + g * ln_e.powi(5)
            }
        }
    }
}

/// Volume-averaged fractional solid angle of a foil of radius `r_src`
/// facing a detector of radius `r_det` at `det2src` cm (Knoll p. 119)
///
/// The series is for a large foil placed close to the detector, but
/// not closer than 1 cm.
pub fn volume_solid_angle(r_src: f64, r_det: f64, det2src: f64) -> Result<f64, DetectorError> {
    if det2src < 1. {
        return Err(DetectorError::TooClose(det2src));
    }
    if r_src < 0. {
        return Err(DetectorError::Negative("foil radius"));
    }
    if r_det < 0. {
        return Err(DetectorError::Negative("detector radius"));
    }
    let alpha = (r_src / det2src).powi(2);
    let beta = (r_det / det2src).powi(2);
    let f1 = 5. / 16. * (beta / (1. + beta).powf(7. / 2.))
        - 35. / 64. * (beta.powi(2) / (1. + beta).powf(9. / 2.));
    let f2 = 35. / 128. * (beta / (1. + beta).powf(9. / 2.))
        - 315. / 256. * (beta.powi(2) / (1. + beta).powf(11. / 2.))
        + 1155. / 1028. * (beta.powi(3) / (1. + beta).powf(13. / 2.));
    Ok(0.5
        * (1. - 1. / (1. + beta).sqrt() - 3. / 8. * (alpha * beta / (1. + beta).powf(5. / 2.))
            + alpha.powi(2) * f1
            - alpha.powi(3) * f2))
}

/// True interaction rate from an observed rate, nonparalyzable model
/// (Knoll p. 120): `n = m / (1 - m tau)`
pub fn true_rate_nonparalyzable(observed: f64, dead_time: f64) -> f64 {
    observed / (1. - observed * dead_time)
}

/// Observed rate from a true interaction rate, paralyzable model
/// (Knoll p. 121): `m = n exp(-n tau)`
pub fn observed_rate_paralyzable(true_rate: f64, dead_time: f64) -> f64 {
    true_rate * (-true_rate * dead_time).exp()
}

/// True interaction rate from an observed rate, paralyzable model
///
/// `m = n exp(-n tau)` has no explicit solution for `n`; walked out
/// incrementally from the nonparalyzable estimate until the observed
/// rate is matched to within one count per second.
pub fn true_rate_paralyzable(observed: f64, dead_time: f64) -> f64 {
    let mut true_rate = true_rate_nonparalyzable(observed, dead_time);
    while (observed_rate_paralyzable(true_rate, dead_time) - observed).abs() > 1. {
        true_rate += 1.;
    }
    true_rate
}

/// Counting position settled on by the standoff search
#[derive(Debug, Clone, Copy)]
pub struct Standoff {
    /// Foil-to-detector distance [cm]
    pub distance: f64,
    /// Absolute photopeak efficiency at that distance
    pub efficiency: f64,
    /// Predicted fraction of true events lost to dead time
    pub dead_time_fraction: f64,
    /// Set when the foil is still too hot at the distance cap
    pub hot: bool,
}

/// Backs the foil away from the detector until dead time is acceptable
///
/// Starting from `min_standoff`, the absolute efficiency is the fitted
/// curve corrected by the ratio of the foil's volume-averaged solid
/// angle to the point-source solid angle, and the predicted line count
/// rate `activity_bq * efficiency` is pushed through the paralyzable
/// dead-time model. More than 1% predicted loss moves the foil out
/// 1 cm, up to [`MAX_STANDOFF_CM`]; past that the foil is flagged hot
/// and the last (degraded) efficiency is returned.
pub fn plan_standoff(
    curve: &EfficiencyCurve,
    energy_kev: f64,
    foil_radius: f64,
    det_radius: f64,
    min_standoff: f64,
    activity_bq: f64,
) -> Result<Standoff, DetectorError> {
    let mut distance = min_standoff;
    loop {
        let gcf = volume_solid_angle(foil_radius, det_radius, distance)?;
        let efficiency =
            curve.efficiency(energy_kev) * gcf / fractional_solid_angle(det_radius, distance);
        let true_rate = activity_bq * efficiency;
        let observed = observed_rate_paralyzable(true_rate, DEAD_TIME_S);
        let (loss, dead_time_fraction) = if true_rate > 0. {
            (true_rate / observed, 1. - observed / true_rate)
        } else {
            (1., 0.)
        };
        if loss <= MAX_LOSS_RATIO {
            return Ok(Standoff {
                distance,
                efficiency,
                dead_time_fraction,
                hot: false,
            });
        }
        if distance >= MAX_STANDOFF_CM {
            log::warn!(
                "foil too hot at the {} cm standoff limit ({:.2}% dead time); counting anyway",
                MAX_STANDOFF_CM,
                dead_time_fraction * 100.
            );
            return Ok(Standoff {
                distance,
                efficiency,
                dead_time_fraction,
                hot: true,
            });
        }
        distance += 1.;
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn log10_curve_known_values() {
        let curve = CurveModel::Log10.default_curve();
        assert!((curve.efficiency(100.) - 0.1114059).abs() < 1e-4);
        assert!((curve.efficiency(1000.) - 0.0244010).abs() < 1e-4);
        assert!((curve.efficiency(1500.) - 0.0148815).abs() < 1e-4);
        assert!((curve.efficiency(2000.) - 0.00872368).abs() < 1e-4);
    }

    #[test]
    fn exponential_curve_known_values() {
        let curve = CurveModel::Exponential.default_curve();
        assert!((curve.efficiency(100.) - 0.112604667).abs() < 1e-6);
        assert!((curve.efficiency(1000.) - 0.02493038).abs() < 1e-6);
        assert!((curve.efficiency(1500.) - 0.0141400).abs() < 1e-6);
        assert!((curve.efficiency(2000.) - 0.00756533).abs() < 1e-6);
    }

    #[test]
    fn log_polynomial_curve_known_values() {
        let curve = CurveModel::LogPolynomial.default_curve();
        assert!((curve.efficiency(100.) - 0.1188029).abs() < 1e-6);
        assert!((curve.efficiency(1000.) - 0.0236653).abs() < 1e-6);
        assert!((curve.efficiency(1500.) - 0.0183139).abs() < 1e-6);
    }

    #[test]
    fn all_models_are_positive_over_the_fit_range() {
        for model in CurveModel::iter() {
            let curve = model.default_curve();
            for e in [150., 400., 743.36, 1100., 1500.] {
                assert!(curve.efficiency(e) > 0., "{} at {} keV", model, e);
            }
        }
    }

    #[test]
    fn volume_solid_angle_literature_values() {
        assert!((volume_solid_angle(1., 0.5, 1.).unwrap() - 0.0343).abs() < 5e-5);
        assert!((volume_solid_angle(1., 4., 1.).unwrap() - 0.3761).abs() < 5e-5);
        assert!((volume_solid_angle(0.3, 2.54, 20.).unwrap() - 0.0040).abs() < 5e-5);
        assert!((volume_solid_angle(2., 2.54, 5.).unwrap() - 0.0501).abs() < 5e-5);
    }

    #[test]
    fn volume_solid_angle_point_source_limits() {
        // zero-radius detector sees nothing
        assert_eq!(volume_solid_angle(2., 0., 3.).unwrap(), 0.);
        // vanishing foil converges to the point-source fraction
        let vanishing = volume_solid_angle(0., 2., 3.).unwrap();
        assert!((vanishing - fractional_solid_angle(2., 3.)).abs() < 1e-5);
        // so does a distant foil
        let distant = volume_solid_angle(2.54, 2.54, 300.).unwrap();
        assert!((distant - fractional_solid_angle(2.54, 300.)).abs() < 1e-5);
    }

    #[test]
    fn volume_solid_angle_validity_limit() {
        assert!(matches!(
            volume_solid_angle(2.54, 2.54, 0.),
            Err(DetectorError::TooClose(_))
        ));
    }

    #[test]
    fn dead_time_models() {
        let m = true_rate_nonparalyzable(1000., DEAD_TIME_S);
        assert!((m - 1000. / (1. - 0.01)).abs() < 1e-9);
        // paralyzable inversion recovers the observed rate
        let n = true_rate_paralyzable(1000., DEAD_TIME_S);
        assert!((observed_rate_paralyzable(n, DEAD_TIME_S) - 1000.).abs() <= 1.);
        assert!(n >= m - 1.);
    }

    #[test]
    fn standoff_stays_put_for_a_quiet_foil() {
        let curve = EfficiencyCurve::default();
        let standoff = plan_standoff(&curve, 743.36, 0.635, 3.245, 1., 0.69).unwrap();
        assert_eq!(standoff.distance, 1.);
        assert!(!standoff.hot);
        assert!(standoff.dead_time_fraction < 0.01);
        assert!(standoff.efficiency > 0.02 && standoff.efficiency < 0.05);
    }

    #[test]
    fn standoff_backs_away_from_a_hot_foil() {
        let curve = EfficiencyCurve::default();
        // no standoff within the cap tames a MBq-class line
        let hot = plan_standoff(&curve, 743.36, 0.635, 3.245, 1., 1e9).unwrap();
        assert_eq!(hot.distance, MAX_STANDOFF_CM);
        assert!(hot.hot);
        assert!(hot.dead_time_fraction > 0.01);
    }

    #[test]
    fn standoff_is_monotone_in_the_minimum() {
        let curve = EfficiencyCurve::default();
        let near = plan_standoff(&curve, 743.36, 0.635, 3.245, 1., 1.2e5).unwrap();
        let far = plan_standoff(&curve, 743.36, 0.635, 3.245, 3., 1.2e5).unwrap();
        assert!(near.distance >= 1.);
        assert!(far.distance >= 3.);
        assert!(far.distance >= near.distance);
    }
}
