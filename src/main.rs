// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use clap::{crate_version, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;

use wheelsounds::config::Scenario;
use wheelsounds::simulator::{self, Simulator};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Wheel sounds for rovers, planes and landing gear."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs a scenario and prints the state of every part's sounds after each step.
    Simulate {
        /// The path to the scenario file.
        scenario_path: String,
        /// Seeds the rolling sounds' start offsets.
        #[arg[short, long]]
        seed: Option<u64>,
    },
    /// Reports which wheel backend each part in a scenario resolves to.
    Probe {
        /// The path to the scenario file.
        scenario_path: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            scenario_path,
            seed,
        } => {
            let scenario = Scenario::deserialize(&PathBuf::from(&scenario_path))?;
            let mut simulator = Simulator::new(scenario, seed);
            let frames = simulator.run();

            if frames.is_empty() {
                println!("No ticks in {}.", scenario_path);
                return Ok(());
            }

            for frame in frames {
                let paused = if frame.paused { " (paused)" } else { "" };
                println!("Tick {}{}:", frame.tick, paused);
                for part in frame.parts {
                    println!("- {}", part);
                }
            }
        }
        Commands::Probe { scenario_path } => {
            let scenario = Scenario::deserialize(&PathBuf::from(&scenario_path))?;
            let (reports, outcome) = simulator::probe(&scenario)?;

            match outcome {
                Some(true) => println!("Legacy wheel module: compatible"),
                Some(false) => println!("Legacy wheel module: missing or incompatible"),
                None => println!("Legacy wheel module: not needed"),
            }
            println!("Parts (count: {}):", reports.len());
            for report in reports {
                println!(
                    "- {}: {} (valid: {}, motor: {}, wheels: {})",
                    report.part, report.kind, report.valid, report.has_motor, report.wheels
                );
            }
        }
    }

    Ok(())
}
