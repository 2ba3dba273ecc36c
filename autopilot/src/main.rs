use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use wizard_arena_core::model::{Command, TickInput};
use wizard_arena_core::rng::SeededRng;
use wizard_arena_core::validate_scenario;
use wizard_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig, Objective};
use wizard_autopilot::bots::{bot_ids, bot_manifest_entries, create_bot, describe_bots};
use wizard_autopilot::runner::{load_scenario, run_bot, write_commands};
use wizard_autopilot::tactics::lanes::{lane_for_agent_id, LaneRoutes};
use wizard_autopilot::util::{
    list_scenario_dir, parse_path_csv, parse_seed, parse_seed_csv, parse_seed_file,
    read_env_optional_usize, seed_sweep, seed_to_hex,
};

const JOBS_ENV: &str = "AUTOPILOT_JOBS";

#[derive(Parser, Debug)]
#[command(name = "wizard-autopilot")]
#[command(about = "Wizard lane autopilot: tick decisions, scenario replays, benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available bots
    ListBots,
    /// Export full bot manifest (including config fingerprints)
    RosterManifest {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Decide a single tick from a JSON tick input
    Decide {
        #[arg(long, default_value = "tactical-default")]
        bot: String,
        #[arg(long)]
        input: PathBuf,
    },
    /// Replay a recorded scenario through one bot
    Run {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        scenario: PathBuf,
        /// Override the scenario's recorded host seed
        #[arg(long)]
        seed: Option<String>,
        /// Write the per-tick commands as JSON
        #[arg(long)]
        commands_out: Option<PathBuf>,
    },
    /// Validate a scenario file and print its summary
    VerifyScenario {
        #[arg(long)]
        input: PathBuf,
    },
    /// Replay scenarios across bots and seeds in parallel
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        /// Comma-separated scenario files
        #[arg(long)]
        scenarios: Option<String>,
        /// Directory of scenario files (*.json)
        #[arg(long)]
        scenario_dir: Option<PathBuf>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        /// Consecutive seeds from --seed-start; 0 keeps each scenario's recorded seed
        #[arg(long, default_value_t = 0)]
        seed_count: u32,
        #[arg(long, value_enum, default_value_t = CliObjective::Activity)]
        objective: CliObjective,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Worker threads (defaults to $AUTOPILOT_JOBS, then rayon's choice)
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the lane routes generated for a map size and seed
    Routes {
        #[arg(long, default_value_t = 4_000.0)]
        map_size: f64,
        #[arg(long, default_value = "0")]
        seed: String,
        /// Report the opening lane for this wizard id
        #[arg(long)]
        agent_id: Option<i64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliObjective {
    Activity,
    Aggression,
    Stability,
}

impl From<CliObjective> for Objective {
    fn from(value: CliObjective) -> Self {
        match value {
            CliObjective::Activity => Objective::Activity,
            CliObjective::Aggression => Objective::Aggression,
            CliObjective::Stability => Objective::Stability,
        }
    }
}

#[derive(Serialize)]
struct DecideOutput {
    bot: String,
    tick: u32,
    label: Option<String>,
    command: Command,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::ListBots => {
            for (id, description) in describe_bots() {
                println!("{id:20} {description}");
            }
        }
        Commands::RosterManifest { output } => {
            let manifest = bot_manifest_entries();
            let encoded = serde_json::to_vec_pretty(&manifest)?;
            if let Some(path) = output {
                write_file(&path, &encoded)?;
                println!("wrote={}", path.display());
                println!("bots={}", manifest.len());
            } else {
                println!("{}", String::from_utf8_lossy(&encoded));
            }
        }
        Commands::Decide { bot, input } => {
            let mut instance = create_bot(&bot).ok_or_else(|| unknown_bot(&bot))?;
            let bytes =
                fs::read(&input).with_context(|| format!("failed reading {}", input.display()))?;
            let tick: TickInput = serde_json::from_slice(&bytes)
                .with_context(|| format!("invalid tick input {}", input.display()))?;
            let command = instance.next_command(&tick);
            let output = DecideOutput {
                bot: instance.id().to_string(),
                tick: tick.world.tick_index,
                label: instance.last_decision().map(|decision| decision.to_string()),
                command,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Run {
            bot,
            scenario,
            seed,
            commands_out,
        } => {
            if create_bot(&bot).is_none() {
                return Err(unknown_bot(&bot));
            }
            let seed = seed.as_deref().map(parse_seed).transpose()?;
            let loaded = load_scenario(&scenario)?;
            let artifact = run_bot(&bot, &loaded, seed)?;
            let metrics = &artifact.metrics;

            println!("bot={}", metrics.bot_id);
            println!("bot_fingerprint={}", metrics.bot_fingerprint);
            println!("scenario={}", metrics.scenario);
            println!("scenario_checksum={:#010x}", metrics.scenario_checksum);
            println!("seed={}", seed_to_hex(metrics.seed));
            println!("frames={}", metrics.frame_count);
            println!("cast_ticks={}", metrics.cast_ticks);
            println!("move_ticks={}", metrics.move_ticks);
            println!("strafe_ticks={}", metrics.strafe_ticks);
            println!("wait_ticks={}", metrics.wait_ticks);
            println!("label_changes={}", metrics.label_changes);
            println!("respawns={}", metrics.respawns);
            for (action, ticks) in &metrics.actions {
                println!("action.{action}={ticks}");
            }
            if let Some(label) = &metrics.final_label {
                println!("final_label={label}");
            }
            if let Some(path) = commands_out {
                write_commands(&path, &artifact.commands)?;
                println!("commands={}", path.display());
            }
        }
        Commands::VerifyScenario { input } => {
            let scenario = load_scenario(&input)?;
            let summary = validate_scenario(&scenario)
                .with_context(|| format!("scenario {} failed validation", input.display()))?;
            println!("input={}", input.display());
            println!("name={}", summary.name);
            println!("frames={}", summary.frames);
            println!("first_tick={}", summary.first_tick);
            println!("last_tick={}", summary.last_tick);
            println!("map_size={}", summary.map_size);
            println!("seed={}", seed_to_hex(summary.random_seed));
            println!("checksum={:#010x}", summary.checksum);
        }
        Commands::Benchmark {
            bots,
            scenarios,
            scenario_dir,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            objective,
            out_dir,
            jobs,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            let scenarios = resolve_scenarios(scenarios.as_deref(), scenario_dir.as_deref())?;
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let objective: Objective = objective.into();
            let jobs = jobs.or_else(|| read_env_optional_usize(JOBS_ENV));

            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "benchmarks/{}-{}",
                    objective.as_str(),
                    timestamp_suffix()
                ))
            });

            let report = run_benchmark(BenchmarkConfig {
                bots,
                scenarios,
                seeds,
                objective,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("objective={}", objective.as_str());
            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("top bots:");
            for (idx, bot) in report.bot_rankings.iter().take(5).enumerate() {
                println!(
                    "  {}. {}  objective={:.4} avg_cast={:.1} avg_move={:.1} avg_strafe={:.1} avg_wait={:.1} avg_label_changes={:.1} respawns={}",
                    idx + 1,
                    bot.bot_id,
                    bot.objective_value,
                    bot.avg_cast_ticks,
                    bot.avg_move_ticks,
                    bot.avg_strafe_ticks,
                    bot.avg_wait_ticks,
                    bot.avg_label_changes,
                    bot.total_respawns,
                );
            }
        }
        Commands::Routes {
            map_size,
            seed,
            agent_id,
        } => {
            if !(map_size.is_finite() && map_size > 0.0) {
                return Err(anyhow!("--map-size must be positive, got {map_size}"));
            }
            let seed = parse_seed(&seed)?;
            let mut rng = SeededRng::from_host_seed(seed);
            let routes = LaneRoutes::generate(map_size, &mut rng);
            println!("seed={}", seed_to_hex(seed));
            if let Some(id) = agent_id {
                let lane = lane_for_agent_id(id)
                    .map(|lane| lane.to_string())
                    .unwrap_or_else(|| "drawn".to_string());
                println!("lane={lane}");
            }
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
    }

    Ok(())
}

fn unknown_bot(bot: &str) -> anyhow::Error {
    let available = bot_ids().join(", ");
    anyhow!("unknown bot '{bot}'. available: {available}")
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}

fn resolve_scenarios(csv: Option<&str>, dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut paths = csv.map(parse_path_csv).unwrap_or_default();
    if let Some(dir) = dir {
        paths.extend(list_scenario_dir(dir)?);
    }
    if paths.is_empty() {
        return Err(anyhow!("pass --scenarios or --scenario-dir"));
    }
    Ok(paths)
}

fn resolve_seeds(
    seeds: Option<&str>,
    seed_file: Option<&Path>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<i64>> {
    if let Some(path) = seed_file {
        return parse_seed_file(path);
    }

    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }

    let start = match seed_start {
        Some(start) => parse_seed(start)?,
        None => 1,
    };
    Ok(seed_sweep(start, seed_count))
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
