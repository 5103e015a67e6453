//! Analytic versus free-flight propagation of the inner solar system
//!
//! Runs the same body file in both modes for one year and reports how far
//! the free-flight positions wander from the Keplerian ones.
//!
//! Run with: cargo run --package orrery --example analytic_vs_free_flight

use orrery::config::SimulationConfig;
use orrery::simulation::{Simulation, SimulationMode};

const INNER_SYSTEM: &str = "\
Sun, Earth, Moon and Mars
3
epoch:
2024 3 20 3 6 0 0
TYPE NAME SATELLITES NODE INCL PERI A_SIG A_EXP ECC MEAN M_SIG M_EXP
Star Sun 2 0 0 0 0 0 0 0 1.989 30
Planet Earth 1 0 0 1.796 1.496 11 0.0167 0 5.972 24
Planet Moon 0 0 0.0898 0 3.844 8 0.0549 0 7.342 22
Planet Mars 0 0.865 0.0323 5.0 2.279 11 0.0934 2.1 6.417 23
";

const AU: f64 = 1.496e11;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Analytic vs free flight: inner solar system\n");
    println!("{}", "=".repeat(60));

    // Six simulated hours per call
    let speed = 21_600.0;
    let analytic_config = SimulationConfig {
        speed,
        ..SimulationConfig::default()
    };
    let free_config = SimulationConfig {
        mode: SimulationMode::FreeFlight,
        speed,
        ..SimulationConfig::default()
    };

    let mut analytic = Simulation::load(INNER_SYSTEM, analytic_config)?;
    let mut free = Simulation::load(INNER_SYSTEM, free_config)?;

    println!("Epoch: {}", analytic.state().epoch);
    for body in analytic.snapshots() {
        println!(
            "  {:<6} {:?}  r = ({:.4}, {:.4}) AU",
            body.name,
            body.kind,
            body.position[0] / AU,
            body.position[1] / AU
        );
    }

    let steps_per_month = 4 * 30;
    let mut captures = 0;

    println!("\nMonth  Δ Earth (km)   Δ Mars (km)    date");
    for month in 1..=12 {
        for _ in 0..steps_per_month {
            analytic.advance(1.0)?;
            captures += free.advance(1.0)?.captures.len();
        }

        let drift = |name: &str| -> Option<f64> {
            let a = analytic.state().find_by_name(name)?;
            let f = free.state().find_by_name(name)?;
            let pa = analytic.state().get_body(a)?.position;
            let pf = free.state().get_body(f)?.position;
            Some((pa - pf).magnitude() / 1000.0)
        };

        println!(
            "{:>5}  {:>12.0}  {:>12.0}   {}",
            month,
            drift("Earth").unwrap_or(f64::NAN),
            drift("Mars").unwrap_or(f64::NAN),
            free.current_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        );
    }

    println!("\n{}", "=".repeat(60));
    println!("Primary changes in free flight: {}", captures);
    println!("Bodies remaining: {}", free.state().body_count());

    let state = free.dispose();
    println!("Final simulated time: {:.1} days", state.time / 86_400.0);
    Ok(())
}
