//! Count-rate curve over the planned window

use plotters::prelude::*;

use crate::{
    counting::Inventory,
    report::{CountReport, Outcome},
};

/// Draws the detected count rate over the planned counting window
///
/// The instantaneous rate decays across the window; the window
/// average the solver converged on is drawn alongside it. Nothing is
/// drawn for a plan that did not converge.
pub fn count_rate(report: &CountReport, filename: &str) {
    let times = match report.outcome {
        Outcome::Converged(times) => times,
        _ => return,
    };
    let efficiency = report.standoff.efficiency * report.line.branching_pct / 100.;
    let inventory = Inventory::Atoms(report.atoms);
    let n = 512;
    let rate: Vec<(f64, f64)> = (0..=n)
        .map(|i| {
            let t = times.foil * i as f64 / n as f64;
            (t / 3600., inventory.rate(report.half_life, efficiency, t))
        })
        .collect();
    let max_rate = rate[0].1;
    let xrange = times.foil / 3600.;

    let plot = SVGBackend::new(filename, (768, 512)).into_drawing_area();
    plot.fill(&WHITE).unwrap();
    let mut chart = ChartBuilder::on(&plot)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(
            -xrange * 1e-2..xrange * (1. + 1e-2),
            0f64..max_rate * (1. + 1e-2),
        )
        .unwrap();
    chart
        .configure_mesh()
        .x_desc("Time [hr]")
        .y_desc("Count rate [1/s]")
        .draw()
        .unwrap();

    let mut colors = colorous::TABLEAU10.iter().cycle();

    let color = colors.next().unwrap();
    let rgb = RGBColor(color.r, color.g, color.b);
    chart
        .draw_series(LineSeries::new(rate.iter().cloned(), &rgb))
        .unwrap()
        .label(format!("{} line rate", report.nuclide))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &rgb));

    let color = colors.next().unwrap();
    let rgb = RGBColor(color.r, color.g, color.b);
    chart
        .draw_series(LineSeries::new(
            vec![(0., times.mean_rate), (xrange, times.mean_rate)],
            &rgb,
        ))
        .unwrap()
        .label("window average")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &rgb));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .unwrap();
}
