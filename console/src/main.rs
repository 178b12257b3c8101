use std::io::{stdin, stdout, Write};

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use connect4_engine::{
    play_match, Board, GameMode, MatchResult, RngEntropy, Statistics,
    CPU_EASY_MAX_DEPTH, CPU_HARD_MAX_DEPTH,
};

mod ui;
use ui::{ConsoleInput, ConsoleRenderer};

fn main() -> Result<()> {
    init_tracing();
    let options = Options::parse(std::env::args().skip(1))?;

    if options.mode.is_demo() {
        run_demo(&options)
    } else {
        run_interactive(options.mode)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn,connect4_engine=info")
        .try_init();
}

struct Options {
    mode: GameMode,
    demo_matches: u32,
    json: bool,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = Options {
            mode: GameMode::PlayerVsCpuHard,
            demo_matches: 10,
            json: false,
        };
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "hard" => options.mode = GameMode::PlayerVsCpuHard,
                "easy" => options.mode = GameMode::PlayerVsCpuEasy,
                "pvp" => options.mode = GameMode::PlayerVsPlayer,
                "demo" => options.mode = GameMode::Demo,
                "--matches" => {
                    let value = args.next().context("--matches needs a value")?;
                    options.demo_matches = value
                        .parse()
                        .with_context(|| format!("--matches got {value}"))?;
                }
                "--json" => options.json = true,
                other => {
                    bail!("unknown argument {other} (expected hard|easy|pvp|demo, --matches N, --json)")
                }
            }
        }
        Ok(options)
    }
}

fn run_interactive(mode: GameMode) -> Result<()> {
    let mut renderer = ConsoleRenderer;
    let mut input = ConsoleInput;
    let mut entropy = RngEntropy(StdRng::from_entropy());
    let mut stats = Statistics::default();

    println!("connect 4");
    loop {
        let mut board = Board::new();
        let result = play_match(
            &mut board,
            mode,
            &mut renderer,
            &mut input,
            &mut entropy,
            &mut stats,
        )?;
        if result == MatchResult::Aborted || !play_again()? {
            return Ok(());
        }
    }
}

fn play_again() -> Result<bool> {
    loop {
        print!("play again? y/n: ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => println!("unknown answer given"),
        }
    }
}

fn run_demo(options: &Options) -> Result<()> {
    let mut renderer = ConsoleRenderer;
    let mut input = ConsoleInput; // never consulted: both seats are CPUs
    let mut entropy = RngEntropy(StdRng::from_entropy());
    let mut stats = Statistics::default();

    println!(
        "demo mode: CPU HARD (depth {CPU_HARD_MAX_DEPTH}) vs CPU EASY (depth {CPU_EASY_MAX_DEPTH})"
    );

    for match_number in 1..=options.demo_matches {
        let mut board = Board::new();
        let result = play_match(
            &mut board,
            GameMode::Demo,
            &mut renderer,
            &mut input,
            &mut entropy,
            &mut stats,
        )?;
        stats.record(&result);
        println!("{match_number} out of {}", options.demo_matches);
        info!(match_number, ?result, "demo match finished");
    }

    display_statistics(&stats, options.json)
}

fn display_statistics(stats: &Statistics, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    let matches = stats.matches().max(1);
    let total_time = (stats.cpu_hard_think_ms + stats.cpu_easy_think_ms).max(1);
    println!("STATS");
    println!("           TIME  VICTORIES");
    println!(
        "CPU HARD   {:3}%       {:3}%",
        stats.cpu_hard_think_ms * 100 / total_time,
        stats.cpu_hard_wins * 100 / matches,
    );
    println!(
        "CPU EASY   {:3}%       {:3}%",
        stats.cpu_easy_think_ms * 100 / total_time,
        stats.cpu_easy_wins * 100 / matches,
    );
    println!(
        "TIES                  {:3}%",
        stats.ties * 100 / matches,
    );
    Ok(())
}
