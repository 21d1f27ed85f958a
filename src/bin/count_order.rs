use std::fs;

use activation_counting::{
    counting::plan::{lines_from_csv, CountPlanner},
    detector::CurveModel,
};
use anyhow::Context;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "count-order",
    about = "Best counting order for a batch of activated foils"
)]
struct Opt {
    /// Path to the reaction-line CSV table
    #[structopt(long, default_value = "foils.csv")]
    path: String,
    /// Detector radius [cm]
    #[structopt(long, default_value = "5.0")]
    detector_radius: f64,
    /// Foil-to-detector distance [cm]
    #[structopt(long, default_value = "100.0")]
    standoff: f64,
    /// Background count rate at the lines of interest [1/s]
    #[structopt(long, default_value = "0.001")]
    background: f64,
    /// Estimated foil swap time [s]
    #[structopt(long, default_value = "60.0")]
    handle_time: f64,
    /// Round count times up to whole minutes
    #[structopt(long)]
    to_minute: bool,
    /// Detector response model: log10, exponential or log-poly
    #[structopt(long)]
    curve: Option<CurveModel>,
    /// Write the schedule to this CSV file
    #[structopt(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let contents =
        fs::read_to_string(&opt.path).with_context(|| format!("reading {}", opt.path))?;
    let lines = lines_from_csv(&contents)?;

    let mut planner = CountPlanner::default()
        .detector_radius(opt.detector_radius)
        .standoff(opt.standoff)
        .background(opt.background)
        .handle_time(opt.handle_time);
    if opt.to_minute {
        planner = planner.round_to_minute();
    }
    if let Some(arg) = opt.curve {
        planner = planner.curve(arg.default_curve());
    }

    let plan = planner.plan(&lines)?;
    plan.summary();
    if let Some(filename) = opt.output {
        plan.to_csv(filename)?;
    }

    Ok(())
}
