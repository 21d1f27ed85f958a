//! Decay-data lookup for activation products
//!
//! The solver only ever consumes scalar half-lives and gamma lines, so
//! the source of those numbers is behind the [`DecayData`] trait: the
//! built-in [`NuclideTable`] for the trusted path, and [`Overrides`] to
//! shadow it with user-supplied values when the tabulated line data is
//! not to be trusted.

use std::{collections::BTreeMap, fmt};

use regex::Regex;
use serde::Deserialize;

static TABLE_CSV: &str = include_str!("nuclides.csv");

#[derive(thiserror::Error, Debug)]
pub enum NuclideError {
    #[error("cannot make sense of nuclide identifier {0:?}")]
    BadIdentifier(String),
    #[error("no decay data on record for {0}")]
    Unknown(String),
    #[error("no gamma line on record for {0}")]
    MissingGammaLine(String),
    #[error("failed to read the decay table")]
    Table(#[from] csv::Error),
}

/// A gamma transition: line energy and emission probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaLine {
    /// Line energy [keV]
    pub energy_kev: f64,
    /// Emission probability per decay [%]
    pub branching_pct: f64,
}

/// Normalized identity of an activation product
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nuclide {
    /// Element symbol, e.g. "Zr"
    pub element: String,
    /// Atomic mass number
    pub mass_number: u32,
    /// Metastable state flag
    pub metastable: bool,
}
impl Nuclide {
    /// Parses an identifier such as `"Zr97"`, `"Zr-97"` or `"In116m"`
    pub fn parse(id: &str) -> Result<Self, NuclideError> {
        let re = Regex::new(r"^([A-Za-z]{1,2})-?(\d{1,3})(m)?$").unwrap();
        let capts = re
            .captures(id.trim())
            .ok_or_else(|| NuclideError::BadIdentifier(id.to_string()))?;
        let symbol = capts.get(1).unwrap().as_str();
        let mut element = symbol[..1].to_uppercase();
        element.push_str(&symbol[1..].to_lowercase());
        let mass_number: u32 = capts
            .get(2)
            .unwrap()
            .as_str()
            .parse()
            .map_err(|_| NuclideError::BadIdentifier(id.to_string()))?;
        if mass_number == 0 {
            return Err(NuclideError::BadIdentifier(id.to_string()));
        }
        Ok(Self {
            element,
            mass_number,
            metastable: capts.get(3).is_some(),
        })
    }
}
impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.element,
            self.mass_number,
            if self.metastable { "m" } else { "" }
        )
    }
}

/// Source of half-lives and gamma lines, keyed by nuclide
pub trait DecayData {
    /// Half-life [s]
    fn half_life(&self, nuclide: &Nuclide) -> Result<f64, NuclideError>;
    /// The line used for counting this product
    fn gamma_line(&self, nuclide: &Nuclide) -> Result<GammaLine, NuclideError>;
}

impl<D: DecayData + ?Sized> DecayData for &D {
    fn half_life(&self, nuclide: &Nuclide) -> Result<f64, NuclideError> {
        (**self).half_life(nuclide)
    }
    fn gamma_line(&self, nuclide: &Nuclide) -> Result<GammaLine, NuclideError> {
        (**self).gamma_line(nuclide)
    }
}

#[derive(Deserialize, Debug)]
struct Record {
    #[serde(rename = "Nuclide")]
    nuclide: String,
    #[serde(rename = "Half-life (s)")]
    half_life_s: f64,
    #[serde(rename = "Gamma energy (keV)")]
    gamma_kev: f64,
    #[serde(rename = "Branching ratio (%)")]
    branching_pct: f64,
}

struct Entry {
    half_life_s: f64,
    line: GammaLine,
}

/// Decay table of common activation products
///
/// Built from the embedded table; [`NuclideTable::from_csv`] accepts a
/// replacement table with the same header row.
pub struct NuclideTable(BTreeMap<String, Entry>);
impl NuclideTable {
    pub fn from_csv(contents: &str) -> Result<Self, NuclideError> {
        let mut rdr = csv::Reader::from_reader(contents.as_bytes());
        let mut entries = BTreeMap::new();
        for result in rdr.deserialize() {
            let record: Record = result?;
            let nuclide = Nuclide::parse(&record.nuclide)?;
            entries.insert(
                nuclide.to_string(),
                Entry {
                    half_life_s: record.half_life_s,
                    line: GammaLine {
                        energy_kev: record.gamma_kev,
                        branching_pct: record.branching_pct,
                    },
                },
            );
        }
        Ok(Self(entries))
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    fn entry(&self, nuclide: &Nuclide) -> Result<&Entry, NuclideError> {
        self.0
            .get(&nuclide.to_string())
            .ok_or_else(|| NuclideError::Unknown(nuclide.to_string()))
    }
}
impl Default for NuclideTable {
    fn default() -> Self {
        Self::from_csv(TABLE_CSV).expect("embedded decay table is well formed")
    }
}
impl DecayData for NuclideTable {
    fn half_life(&self, nuclide: &Nuclide) -> Result<f64, NuclideError> {
        Ok(self.entry(nuclide)?.half_life_s)
    }
    fn gamma_line(&self, nuclide: &Nuclide) -> Result<GammaLine, NuclideError> {
        Ok(self.entry(nuclide)?.line)
    }
}

/// User-supplied values shadowing another provider
///
/// The tabulated line data is sparse for some products, so direct
/// input from the experimenter wins over the table for the nuclide
/// under study.
pub struct Overrides<D> {
    inner: D,
    half_life_s: Option<f64>,
    line: Option<GammaLine>,
}
impl<D: DecayData> Overrides<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            half_life_s: None,
            line: None,
        }
    }
    pub fn half_life(self, half_life_s: f64) -> Self {
        Self {
            half_life_s: Some(half_life_s),
            ..self
        }
    }
    pub fn gamma_line(self, line: GammaLine) -> Self {
        Self {
            line: Some(line),
            ..self
        }
    }
}
impl<D: DecayData> DecayData for Overrides<D> {
    fn half_life(&self, nuclide: &Nuclide) -> Result<f64, NuclideError> {
        match self.half_life_s {
            Some(value) => Ok(value),
            None => self.inner.half_life(nuclide),
        }
    }
    fn gamma_line(&self, nuclide: &Nuclide) -> Result<GammaLine, NuclideError> {
        match self.line {
            Some(line) => Ok(line),
            None => self.inner.gamma_line(nuclide),
        }
    }
}
