use activation_counting::{detector::CurveModel, CountScenario, NuclideTable};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "count-time",
    about = "Optimal gamma-counting time for an activated foil"
)]
struct Opt {
    /// Activation product counted, e.g. Zr97
    #[structopt(short, long)]
    isotope: Option<String>,
    /// Reaction rate per source particle per cm^3
    #[structopt(long)]
    reaction_rate: Option<f64>,
    /// Foil radius [cm]
    #[structopt(long)]
    foil_radius: Option<f64>,
    /// Foil height [cm]
    #[structopt(long)]
    foil_height: Option<f64>,
    /// Foil density [g/cm^3]
    #[structopt(long)]
    foil_density: Option<f64>,
    /// Branching-ratio override [%]
    #[structopt(long)]
    branching: Option<f64>,
    /// Gamma-energy override [keV]
    #[structopt(long)]
    gamma: Option<f64>,
    /// Post-irradiation transfer delay [s]
    #[structopt(long)]
    delay: Option<f64>,
    /// Source strength [particles/s]
    #[structopt(long)]
    source: Option<f64>,
    /// Irradiation duration [s]
    #[structopt(long)]
    irradiation: Option<f64>,
    /// Detector radius [cm]
    #[structopt(long)]
    detector_radius: Option<f64>,
    /// Minimum foil-to-detector distance [cm]
    #[structopt(long)]
    standoff: Option<f64>,
    /// Background count rate at the line of interest [1/s]
    #[structopt(long)]
    background: Option<f64>,
    /// Target relative uncertainty (1% = 0.01)
    #[structopt(short, long)]
    sigma: Option<f64>,
    /// Detector response model: log10, exponential or log-poly
    #[structopt(long)]
    curve: Option<CurveModel>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut scenario = CountScenario::default();
    if let Some(arg) = opt.isotope {
        scenario.isotope = arg;
    }
    if let Some(arg) = opt.reaction_rate {
        scenario.reaction_rate = arg;
    }
    if let Some(arg) = opt.foil_radius {
        scenario.foil_radius = arg;
    }
    if let Some(arg) = opt.foil_height {
        scenario.foil_height = arg;
    }
    if let Some(arg) = opt.foil_density {
        scenario.foil_density = arg;
    }
    if opt.branching.is_some() {
        scenario.branching_pct = opt.branching;
    }
    if opt.gamma.is_some() {
        scenario.gamma_kev = opt.gamma;
    }
    if let Some(arg) = opt.delay {
        scenario.decay_delay = arg;
    }
    if let Some(arg) = opt.source {
        scenario.source_strength = arg;
    }
    if let Some(arg) = opt.irradiation {
        scenario.irradiation_time = arg;
    }
    if let Some(arg) = opt.detector_radius {
        scenario.detector_radius = arg;
    }
    if let Some(arg) = opt.standoff {
        scenario.min_standoff = arg;
    }
    if let Some(arg) = opt.background {
        scenario.background = arg;
    }
    if let Some(arg) = opt.sigma {
        scenario.sigma = arg;
    }
    if let Some(arg) = opt.curve {
        scenario.curve = arg.default_curve();
    }

    let report = scenario.plan(&NuclideTable::default())?;
    report.summary();

    Ok(())
}
