use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use junction_sim::simulation::{
    render_history_entry, Direction, FileSink, IntersectionController, LogSink, MultiSink,
    SimConfig, StopSignal, TrafficHistory,
};

#[derive(Parser)]
#[command(name = "junction_sim")]
#[command(about = "Single-intersection traffic simulation")]
struct Cli {
    /// Present the interactive menu instead of running once
    #[arg(long)]
    interactive: bool,

    /// Simulation duration in ticks
    #[arg(long, default_value_t = 20)]
    ticks: u64,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Queue capacity per approach
    #[arg(long, default_value_t = 4)]
    capacity: usize,

    /// Percent chance a generated vehicle is an emergency vehicle
    #[arg(long, default_value_t = 20)]
    emergency_chance: u32,

    /// Percent chance of generating a vehicle each tick
    #[arg(long, default_value_t = 80)]
    generation_probability: u32,

    /// Base green light duration in ticks
    #[arg(long, default_value_t = 2)]
    base_green: u32,

    /// Base red light duration in ticks
    #[arg(long, default_value_t = 4)]
    base_red: u32,

    /// Extra green ticks granted while an approach is jammed
    #[arg(long, default_value_t = 1)]
    green_boost: u32,

    /// Red ticks removed while an approach is jammed
    #[arg(long, default_value_t = 1)]
    red_reduction: u32,

    /// Fraction of capacity at which a queue counts as jammed
    #[arg(long, default_value_t = 0.75)]
    jam_threshold: f64,

    /// Ticks the clock advances per pipeline pass
    #[arg(long, default_value_t = 1)]
    pass_through: u64,

    /// Vehicles released per green queue per tick
    #[arg(long, default_value_t = 1)]
    release_batch: usize,

    /// Send every generated vehicle to one approach (north/south/east/west)
    #[arg(long)]
    direction: Option<Direction>,

    /// Path of the append-only simulation log
    #[arg(long, default_value = "traffic_simulation.log")]
    log_file: PathBuf,
}

impl Cli {
    fn to_config(&self) -> SimConfig {
        SimConfig {
            queue_capacity: self.capacity,
            emergency_chance: self.emergency_chance,
            generation_probability: self.generation_probability,
            base_green: self.base_green,
            base_red: self.base_red,
            green_boost: self.green_boost,
            red_reduction: self.red_reduction,
            jam_threshold: self.jam_threshold,
            duration: self.ticks,
            pass_through: self.pass_through,
            release_batch: self.release_batch,
            target_direction: self.direction,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.to_config();

    if cli.interactive {
        run_menu(config, &cli.log_file)
    } else {
        run_once(config, &cli.log_file).map(|_| ())
    }
}

/// Run one full simulation, logging to the console and the log file, and
/// print the final report
fn run_once(config: SimConfig, log_path: &Path) -> Result<IntersectionController> {
    let file = FileSink::create(log_path)?;
    let mut sink = MultiSink::new(vec![Box::new(LogSink), Box::new(file)]);

    let mut controller = IntersectionController::new(config);
    let stop = StopSignal::new();
    controller.run(&mut sink, &stop);

    println!("=== Simulation complete ===");
    println!("{}", controller.stats().summary());
    Ok(controller)
}

/// Console menu driving the controller; keeps the most recent run around
/// so its history can be inspected
fn run_menu(config: SimConfig, log_path: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut last_run: Option<IntersectionController> = None;

    loop {
        println!();
        println!("=== Junction Simulation ===");
        println!("1) Run simulation");
        println!("2) Show traffic history");
        println!("3) Exit");
        print!("> ");
        io::stdout().flush()?;

        let mut choice = String::new();
        if stdin.lock().read_line(&mut choice)? == 0 {
            break;
        }
        match choice.trim() {
            "1" => last_run = Some(run_once(config.clone(), log_path)?),
            "2" => match &last_run {
                Some(controller) => print_history(controller.history()),
                None => println!("No simulation has run yet."),
            },
            "3" => break,
            other => println!("Unknown option '{}'", other),
        }
    }
    Ok(())
}

fn print_history(history: &TrafficHistory) {
    println!("=== Traffic history (most recent first) ===");
    if history.is_empty() {
        println!("No vehicles recorded.");
        return;
    }
    for (position, vehicle) in history.iter().enumerate() {
        println!("{}", render_history_entry(position + 1, vehicle));
    }
}
