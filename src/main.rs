//! `u-slotting <run-config.json>`
//!
//! Loads a run configuration, places items, evaluates the layout, and
//! writes `assignment.json`, `metrics.csv`, and `orders.json` into the
//! configured output directory.

use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use u_slotting::config::RunConfig;
use u_slotting::error::SlottingError;
use u_slotting::{io, logging, pipeline};

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: u-slotting <run-config.json>");
    };

    let config = RunConfig::from_file(&path)
        .with_context(|| format!("failed to load run configuration {path}"))?;

    let summary = match pipeline::execute(&config) {
        Ok(summary) => summary,
        Err(SlottingError::BlockExhaustion {
            required,
            placed,
            partial,
        }) => {
            std::fs::create_dir_all(&config.output_dir)?;
            let target = config.output_dir.join("partial_assignment.json");
            io::write_assignment(&target, &partial.assignment)
                .context("failed to write partial assignment")?;
            bail!(
                "layout too small: placed {placed} of {required} required blocks; partial assignment in {}",
                target.display()
            );
        }
        Err(e) => return Err(e).context("slotting run failed"),
    };

    let report = &summary.outcome.report;
    tracing::info!(
        total_distance = report.total_distance,
        total_handling_effort = report.total_handling_effort,
        orders = report.num_orders(),
        "slotting run complete"
    );
    for baseline in &summary.baselines {
        tracing::info!(
            baseline = baseline.label,
            total_distance = baseline.report.total_distance,
            total_handling_effort = baseline.report.total_handling_effort,
            "baseline"
        );
    }
    tracing::info!(
        assignment = %summary.files.assignment.display(),
        metrics = %summary.files.metrics.display(),
        orders = %summary.files.orders.display(),
        "results"
    );
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
