//! Basic decay and production calculations for activation foils

use std::f64::consts::PI;

/// Becquerel per Curie
pub const BQ_PER_CURIE: f64 = 3.7e10;

#[derive(thiserror::Error, Debug)]
pub enum NuclearError {
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

/// Activity units accepted for an initial inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityUnit {
    Becquerel,
    Curie,
    MicroCurie,
}
impl ActivityUnit {
    /// Converts `value` in this unit to Bq
    pub fn in_becquerels(self, value: f64) -> f64 {
        match self {
            ActivityUnit::Becquerel => value,
            ActivityUnit::Curie => value * BQ_PER_CURIE,
            ActivityUnit::MicroCurie => value * 1e-6 * BQ_PER_CURIE,
        }
    }
}

/// Decay constant [1/s] of an isotope with the given half-life [s]
pub fn decay_constant(half_life: f64) -> f64 {
    2f64.ln() / half_life
}

/// Half-life [s] of an isotope with the given decay constant [1/s]
pub fn half_life(decay_constant: f64) -> f64 {
    2f64.ln() / decay_constant
}

/// Activity [Bq] of `n` atoms, `t` seconds after production
pub fn activity(half_life: f64, n: f64, t: f64) -> f64 {
    let lambda = decay_constant(half_life);
    lambda * n * (-lambda * t).exp()
}

/// Decays an atom count or an activity in Bq over `t` seconds
///
/// Ingrowth from parent isotopes is not accounted for.
pub fn decay(half_life: f64, quantity: f64, t: f64) -> f64 {
    quantity * (-decay_constant(half_life) * t).exp()
}

/// Atom population at the start of counting
///
/// Accounts for production and decay during the irradiation period
/// (saturation activity model) and for the post-irradiation transfer
/// time `tt`:
///
/// `n(t) = rate * vol * src / lambda * (1 - exp(-lambda t)) + n exp(-lambda t)`
///
/// The reaction `rate` is per source particle per cm^3 for simulated
/// tallies, or the macroscopic cross section [1/cm] for experimental
/// data; `src` is the source strength [particles/s] and `vol` the foil
/// volume [cm^3]. `n` is the parent population left over from previous
/// irradiations.
pub fn production_decay(
    half_life: f64,
    n: f64,
    t: f64,
    rate: f64,
    src: f64,
    vol: f64,
    tt: f64,
) -> Result<f64, NuclearError> {
    if half_life <= 0. {
        return Err(NuclearError::NonPositive("half-life"));
    }
    if vol <= 0. {
        return Err(NuclearError::NonPositive("foil volume"));
    }
    if n < 0. {
        return Err(NuclearError::Negative("initial atom count"));
    }
    if t < 0. {
        return Err(NuclearError::Negative("irradiation time"));
    }
    if rate < 0. {
        return Err(NuclearError::Negative("reaction rate"));
    }
    if src < 0. {
        return Err(NuclearError::Negative("source strength"));
    }
    if tt < 0. {
        return Err(NuclearError::Negative("transfer time"));
    }
    let lambda = decay_constant(half_life);
    let n0 = rate * vol * src / lambda * (1. - (-lambda * t).exp()) + n * (-lambda * t).exp();
    Ok(n0 * (-lambda * tt).exp())
}

/// Solid angle [sr] subtended by a detector of radius `a` at distance
/// `d` from a point source (Knoll 4.21)
pub fn solid_angle(a: f64, d: f64) -> f64 {
    2. * PI * (1. - d / (d * d + a * a).sqrt())
}

/// Point-source solid angle as a fraction of the full sphere
pub fn fractional_solid_angle(a: f64, d: f64) -> f64 {
    solid_angle(a, d) / (4. * PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_constant_round_trip() {
        assert!((decay_constant(100.) - 6.9314718e-3).abs() < 1e-8);
        assert!((decay_constant(50.) - 0.01386294).abs() < 1e-7);
        assert!((half_life(decay_constant(1e8)) - 1e8).abs() < 1e-3);
    }

    #[test]
    fn activity_at_count_start_is_lambda_n() {
        // rate(0) == n0 ln2 / half-life
        assert!((activity(100., 1000., 0.) - 6.9314718).abs() < 1e-6);
        assert!((activity(100., 1000., 100.) - 3.4657359).abs() < 1e-6);
    }

    #[test]
    fn decay_halves_after_one_half_life() {
        assert!((decay(100., 1000., 100.) - 500.).abs() < 1e-9);
        assert!((decay(1e10, 1000., 1.) - 1000.).abs() < 1e-4);
    }

    #[test]
    fn production_decay_known_cases() {
        // irradiation time << half-life: linear build-up
        assert!((production_decay(1e10, 0., 100., 1e-3, 1e6, 1., 0.).unwrap() - 1e5).abs() < 0.5);
        // short half-life saturates at rate*vol*src/lambda
        assert!(
            (production_decay(1e-3, 0., 100., 1e-3, 1e3, 1., 0.).unwrap() - 0.001442695).abs()
                < 1e-6
        );
        // one half-life of post-irradiation decay
        assert!(
            (production_decay(1e10, 0., 100., 1e-3, 1e6, 1., 1e10).unwrap() - 0.5e5).abs() < 0.5
        );
        // initial population decays alongside production
        assert!(
            (production_decay(100., 1000., 100., 1e-3, 1e3, 1., 0.).unwrap() - 572.1347520).abs()
                < 1e-6
        );
    }

    #[test]
    fn production_decay_monotonicity() {
        let base = production_decay(60296.4, 0., 57600., 2.03e-9, 9.94e9, 0.0708, 360.).unwrap();
        let more_src =
            production_decay(60296.4, 0., 57600., 2.03e-9, 2. * 9.94e9, 0.0708, 360.).unwrap();
        let more_rate =
            production_decay(60296.4, 0., 57600., 2. * 2.03e-9, 9.94e9, 0.0708, 360.).unwrap();
        let longer =
            production_decay(60296.4, 0., 2. * 57600., 2.03e-9, 9.94e9, 0.0708, 360.).unwrap();
        let delayed =
            production_decay(60296.4, 0., 57600., 2.03e-9, 9.94e9, 0.0708, 3600.).unwrap();
        assert!(more_src > base);
        assert!(more_rate > base);
        assert!(longer > base);
        assert!(delayed < base);
    }

    #[test]
    fn production_decay_rejects_bad_inputs() {
        assert!(production_decay(-100., 1000., 100., 1e-3, 1e3, 1., 0.).is_err());
        assert!(production_decay(100., -1000., 100., 1e-3, 1e3, 1., 0.).is_err());
        assert!(production_decay(100., 1000., -100., 1e-3, 1e3, 1., 0.).is_err());
        assert!(production_decay(100., 1000., 100., -1e-3, 1e3, 1., 0.).is_err());
        assert!(production_decay(100., 1000., 100., 1e-3, -1e3, 1., 0.).is_err());
        assert!(production_decay(100., 1000., 100., 1e-3, 1e3, -1., 0.).is_err());
    }

    #[test]
    fn solid_angles_known_cases() {
        assert!((solid_angle(100., 0.) - 6.283185307).abs() < 1e-6);
        assert!((solid_angle(5., 100.) - 7.839286e-3).abs() < 1e-8);
        assert_eq!(solid_angle(0., 10.), 0.);
        assert!((fractional_solid_angle(100., 0.) - 0.5).abs() < 1e-9);
        assert!((fractional_solid_angle(5., 100.) - 6.2343056e-4).abs() < 1e-9);
        assert_eq!(fractional_solid_angle(0., 10.), 0.);
    }

    #[test]
    fn activity_unit_conversions() {
        assert_eq!(ActivityUnit::Becquerel.in_becquerels(12.), 12.);
        assert_eq!(ActivityUnit::Curie.in_becquerels(1.), 3.7e10);
        assert_eq!(ActivityUnit::MicroCurie.in_becquerels(1.), 3.7e4);
    }
}
