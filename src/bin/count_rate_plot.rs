use activation_counting::{plot, CountScenario, NuclideTable};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "count-rate-plot",
    about = "Detected count-rate curve over the planned counting window"
)]
struct Opt {
    /// Activation product counted, e.g. Zr97
    #[structopt(short, long)]
    isotope: Option<String>,
    /// Target relative uncertainty (1% = 0.01)
    #[structopt(short, long)]
    sigma: Option<f64>,
    /// Output SVG file
    #[structopt(short, long, default_value = "count-rate.svg")]
    output: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut scenario = CountScenario::default();
    if let Some(arg) = opt.isotope {
        scenario.isotope = arg;
    }
    if let Some(arg) = opt.sigma {
        scenario.sigma = arg;
    }

    let report = scenario.plan(&NuclideTable::default())?;
    report.summary();
    plot::count_rate(&report, &opt.output);
    println!(" - count-rate curve written to {}", opt.output);

    Ok(())
}
