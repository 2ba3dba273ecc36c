use crate::bots::bot_ids;
use crate::runner::{load_scenario, run_bot, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use wizard_arena_core::Scenario;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Share of ticks spent doing something other than the inert wait.
    Activity,
    /// Share of ticks that fired a cast.
    Aggression,
    /// Penalizes flip-flopping between actions.
    Stability,
}

impl Objective {
    pub fn run_value(self, metrics: &RunMetrics) -> f64 {
        let frames = metrics.frame_count.max(1) as f64;
        match self {
            Self::Activity => 1.0 - metrics.wait_ticks as f64 / frames,
            Self::Aggression => {
                metrics.cast_ticks as f64 / frames + 0.1 * metrics.move_ticks as f64 / frames
            }
            Self::Stability => {
                1.0 - metrics.label_changes as f64 / frames
                    + 0.05 * (1.0 - metrics.wait_ticks as f64 / frames)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Aggression => "aggression",
            Self::Stability => "stability",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub scenarios: Vec<PathBuf>,
    /// Empty means each scenario runs once with its recorded seed.
    pub seeds: Vec<i64>,
    pub objective: Objective,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub scenario: String,
    pub seed: i64,
    pub seed_hex: String,
    pub frame_count: u32,
    pub cast_ticks: u32,
    pub move_ticks: u32,
    pub strafe_ticks: u32,
    pub wait_ticks: u32,
    pub label_changes: u32,
    pub respawns: u32,
    pub objective_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub runs: usize,
    pub avg_frames: f64,
    pub avg_cast_ticks: f64,
    pub avg_move_ticks: f64,
    pub avg_strafe_ticks: f64,
    pub avg_wait_ticks: f64,
    pub avg_label_changes: f64,
    pub total_respawns: u32,
    pub objective_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub objective: Objective,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub scenarios: Vec<String>,
    pub seeds: Vec<i64>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(bot_ids()),
        Some(raw) => {
            let mut bots = Vec::new();
            for token in raw.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                bots.push(token.to_string());
            }
            if bots.is_empty() {
                return Err(anyhow!("--bots resolved to empty list"));
            }
            Ok(bots)
        }
    }
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.scenarios.is_empty() {
        return Err(anyhow!("benchmark requires at least one scenario"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let scenarios: Vec<Scenario> = config
        .scenarios
        .iter()
        .map(|path| load_scenario(path))
        .collect::<Result<_>>()?;

    let seeds: Vec<Option<i64>> = if config.seeds.is_empty() {
        vec![None]
    } else {
        config.seeds.iter().copied().map(Some).collect()
    };

    let (scenario_refs, seed_refs) = (&scenarios, &seeds);
    let run_jobs: Vec<(&str, &Scenario, Option<i64>)> = config
        .bots
        .iter()
        .flat_map(move |bot| {
            scenario_refs.iter().flat_map(move |scenario| {
                seed_refs
                    .iter()
                    .map(move |seed| (bot.as_str(), scenario, *seed))
            })
        })
        .collect();
    info!(
        runs = run_jobs.len(),
        objective = config.objective.as_str(),
        "starting benchmark"
    );

    let run_one = |(bot_id, scenario, seed): &(&str, &Scenario, Option<i64>)| -> Result<RunRecord> {
        let artifact = run_bot(bot_id, scenario, *seed).with_context(|| {
            format!(
                "benchmark run failed for bot={bot_id} scenario={}",
                scenario.name
            )
        })?;
        let objective_value = config.objective.run_value(&artifact.metrics);
        let metrics = artifact.metrics;
        Ok(RunRecord {
            seed_hex: seed_to_hex(metrics.seed),
            bot_id: metrics.bot_id,
            bot_fingerprint: metrics.bot_fingerprint,
            scenario: metrics.scenario,
            seed: metrics.seed,
            frame_count: metrics.frame_count,
            cast_ticks: metrics.cast_ticks,
            move_ticks: metrics.move_ticks,
            strafe_ticks: metrics.strafe_ticks,
            wait_ticks: metrics.wait_ticks,
            label_changes: metrics.label_changes,
            respawns: metrics.respawns,
            objective_value,
        })
    };

    let run_results: Vec<Result<RunRecord>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    let rankings = rank_bots(&runs);

    runs.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| a.bot_id.cmp(&b.bot_id))
            .then_with(|| a.scenario.cmp(&b.scenario))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &runs)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        objective: config.objective,
        jobs: config.jobs,
        bots: config.bots.clone(),
        scenarios: scenarios.iter().map(|scenario| scenario.name.clone()).collect(),
        seeds: config.seeds,
        run_count: runs.len(),
        bot_rankings: rankings,
        runs,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn rank_bots(runs: &[RunRecord]) -> Vec<BotAggregate> {
    let mut grouped: HashMap<&str, Vec<&RunRecord>> = HashMap::new();
    for run in runs {
        grouped.entry(run.bot_id.as_str()).or_default().push(run);
    }

    let mut rankings = Vec::new();
    for (bot_id, bot_runs) in grouped {
        let count = bot_runs.len() as f64;
        let avg = |field: fn(&RunRecord) -> u32| -> f64 {
            bot_runs.iter().map(|run| field(run) as f64).sum::<f64>() / count
        };
        rankings.push(BotAggregate {
            bot_id: bot_id.to_string(),
            bot_fingerprint: bot_runs
                .first()
                .map(|run| run.bot_fingerprint.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            runs: bot_runs.len(),
            avg_frames: avg(|run| run.frame_count),
            avg_cast_ticks: avg(|run| run.cast_ticks),
            avg_move_ticks: avg(|run| run.move_ticks),
            avg_strafe_ticks: avg(|run| run.strafe_ticks),
            avg_wait_ticks: avg(|run| run.wait_ticks),
            avg_label_changes: avg(|run| run.label_changes),
            total_respawns: bot_runs.iter().map(|run| run.respawns).sum(),
            objective_value: bot_runs.iter().map(|run| run.objective_value).sum::<f64>() / count,
        });
    }

    rankings.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.avg_cast_ticks.total_cmp(&a.avg_cast_ticks))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });
    rankings
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "bot_id,bot_fingerprint,scenario,seed_hex,seed,frame_count,cast_ticks,move_ticks,strafe_ticks,wait_ticks,label_changes,respawns,objective_value\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{:.6}\n",
            row.bot_id,
            row.bot_fingerprint,
            row.scenario,
            row.seed_hex,
            row.seed,
            row.frame_count,
            row.cast_ticks,
            row.move_ticks,
            row.strafe_ticks,
            row.wait_ticks,
            row.label_changes,
            row.respawns,
            row.objective_value
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[BotAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,bot_id,bot_fingerprint,runs,avg_frames,avg_cast_ticks,avg_move_ticks,avg_strafe_ticks,avg_wait_ticks,avg_label_changes,total_respawns,objective_value\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{:.1},{:.2},{:.2},{:.2},{:.2},{:.2},{},{:.6}\n",
            idx + 1,
            row.bot_id,
            row.bot_fingerprint,
            row.runs,
            row.avg_frames,
            row.avg_cast_ticks,
            row.avg_move_ticks,
            row.avg_strafe_ticks,
            row.avg_wait_ticks,
            row.avg_label_changes,
            row.total_respawns,
            row.objective_value
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
