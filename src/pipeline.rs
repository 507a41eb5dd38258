//! End-to-end slotting run: preprocess → place → evaluate.

use crate::config::{LayoutSource, RunConfig, SlottingConfig};
use crate::demand::{DemandAnalysis, DemandPreprocessor};
use crate::error::Result;
use crate::evaluation::{EvaluationReport, Evaluator};
use crate::graph::WarehouseGraph;
use crate::io::{self, MetricRow, ResultFiles};
use crate::models::{InventoryLine, ItemSpec, Layout, OrderLine};
use crate::placement::{random_assignment, static_priority_assignment, Placement, PlacementEngine};

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Demand signals and grouped orders.
    pub analysis: DemandAnalysis,
    /// Greedy placement.
    pub placement: Placement,
    /// Evaluation of the greedy placement.
    pub report: EvaluationReport,
}

/// A baseline placement and its evaluation.
#[derive(Debug, Clone)]
pub struct BaselineOutcome {
    /// Metric prefix, `static` or `random`.
    pub label: &'static str,
    /// Baseline placement.
    pub placement: Placement,
    /// Evaluation of the baseline.
    pub report: EvaluationReport,
}

/// One slotting run over a fixed warehouse graph.
///
/// # Examples
///
/// ```
/// use u_slotting::config::SlottingConfig;
/// use u_slotting::graph::WarehouseGraph;
/// use u_slotting::models::{ItemSpec, Layout, OrderLine};
/// use u_slotting::pipeline::SlottingRun;
///
/// let graph = WarehouseGraph::new(&Layout::two_branch()).unwrap();
/// let config = SlottingConfig::default().with_block_capacity(10.0);
/// let lines = vec![
///     OrderLine::new("p1", "A", 12),
///     OrderLine::new("p1", "B", 3),
///     OrderLine::new("p2", "A", 4),
/// ];
/// let items = vec![ItemSpec::new("A", 1.0, 1.0), ItemSpec::new("B", 1.0, 2.0)];
///
/// let outcome = SlottingRun::new(&graph, &config).run(&lines, &items, None).unwrap();
/// assert_eq!(outcome.placement.assignment.blocks_of("A").len(), 2);
/// assert_eq!(outcome.report.num_orders(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SlottingRun<'a> {
    graph: &'a WarehouseGraph,
    config: &'a SlottingConfig,
}

impl<'a> SlottingRun<'a> {
    /// Creates a run over `graph` with `config`.
    pub fn new(graph: &'a WarehouseGraph, config: &'a SlottingConfig) -> Self {
        Self { graph, config }
    }

    /// Runs preprocessing, greedy placement, and evaluation.
    pub fn run(
        &self,
        lines: &[OrderLine],
        item_master: &[ItemSpec],
        inventory: Option<&[InventoryLine]>,
    ) -> Result<RunOutcome> {
        let analysis = DemandPreprocessor::new(self.config)?.analyze(lines, item_master, inventory)?;
        let placement =
            PlacementEngine::new(self.graph, self.config)?.place(&analysis.profile, &analysis.cooccurrence)?;
        let report = self.evaluate(&analysis, &placement)?;
        Ok(RunOutcome {
            analysis,
            placement,
            report,
        })
    }

    /// Places and evaluates the static-priority and seeded random baselines.
    pub fn baselines(&self, analysis: &DemandAnalysis, seed: u64) -> Result<Vec<BaselineOutcome>> {
        let static_placement = static_priority_assignment(
            self.graph,
            &analysis.profile,
            &analysis.cooccurrence,
            self.config.priority,
        )?;
        let random_placement = random_assignment(self.graph, &analysis.profile, seed)?;

        [("static", static_placement), ("random", random_placement)]
            .into_iter()
            .map(|(label, placement)| {
                let report = self.evaluate(analysis, &placement)?;
                tracing::info!(
                    baseline = label,
                    total_distance = report.total_distance,
                    total_handling_effort = report.total_handling_effort,
                    "baseline evaluated"
                );
                Ok(BaselineOutcome {
                    label,
                    placement,
                    report,
                })
            })
            .collect()
    }

    fn evaluate(&self, analysis: &DemandAnalysis, placement: &Placement) -> Result<EvaluationReport> {
        Evaluator::new(self.graph, &analysis.profile, self.config.route)
            .evaluate(&placement.assignment, &analysis.orders)
    }
}

/// Builds the warehouse graph named by a layout source.
pub fn load_graph(source: &LayoutSource) -> Result<WarehouseGraph> {
    let layout = match source {
        LayoutSource::TwoBranch => Layout::two_branch(),
        LayoutSource::File(path) => io::read_layout(path)?,
    };
    let graph = WarehouseGraph::new(&layout)?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        blocks = graph.block_ids().len(),
        "warehouse graph built"
    );
    Ok(graph)
}

/// Result of [`execute`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Greedy run outcome.
    pub outcome: RunOutcome,
    /// Baselines, when a seed was configured.
    pub baselines: Vec<BaselineOutcome>,
    /// Files written.
    pub files: ResultFiles,
}

/// Reads inputs, runs the greedy placement and any baselines, and writes
/// the result files described by `config`.
pub fn execute(config: &RunConfig) -> Result<RunSummary> {
    let graph = load_graph(&config.inputs.layout)?;
    let lines = io::read_order_lines(&config.inputs.orders)?;
    let items = io::read_item_master(&config.inputs.items)?;
    let inventory = config
        .inputs
        .inventory
        .as_ref()
        .map(io::read_inventory)
        .transpose()?;

    let run = SlottingRun::new(&graph, &config.slotting);
    let outcome = run.run(&lines, &items, inventory.as_deref())?;

    let baselines = match config.baseline_seed {
        Some(seed) => run.baselines(&outcome.analysis, seed)?,
        None => Vec::new(),
    };

    let mut metrics: Vec<MetricRow> = io::report_metrics(&outcome.report, None);
    metrics.push(MetricRow::new(
        "placed_blocks",
        outcome.placement.assignment.len() as f64,
    ));
    for baseline in &baselines {
        metrics.extend(io::report_metrics(&baseline.report, Some(baseline.label)));
    }

    let files = io::write_results(
        &config.output_dir,
        &outcome.placement.assignment,
        &outcome.report,
        &metrics,
    )?;
    Ok(RunSummary {
        outcome,
        baselines,
        files,
    })
}
