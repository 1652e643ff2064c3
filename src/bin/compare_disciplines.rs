use std::process::ExitCode;
use std::time::{Duration, Instant};

use bellman_grid::mdp::{
    wall_time_speedup, CellClass, Discipline, DisciplineComparison, Environment, GridWorld,
    GridWorldConfig, SolveOutcome, ValueIterationConfig,
};

fn timed_solve(
    world: &GridWorld,
    config: ValueIterationConfig,
    discipline: Discipline,
) -> bellman_grid::Result<(SolveOutcome, Duration)> {
    let start = Instant::now();
    let outcome = SolveOutcome::solve(world, config, discipline)?;
    Ok((outcome, start.elapsed()))
}

fn print_values(world: &GridWorld, outcome: &SolveOutcome) {
    let n = world.grid_size();
    for row in 0..n {
        let line: Vec<String> = (0..n)
            .map(|col| {
                let v = outcome.values[[row, col]];
                match world.cell_class(row, col) {
                    CellClass::Goal => format!("[{v:6.2}]"),
                    _ => format!(" {v:6.2} "),
                }
            })
            .collect();
        println!("{}", line.join(" "));
    }
}

fn print_combined(world: &GridWorld, outcome: &SolveOutcome) {
    let n = world.grid_size();
    for row in 0..n {
        let line: Vec<String> = (0..n)
            .map(|col| {
                let v = outcome.values[[row, col]];
                match outcome.policy.action_at(row, col) {
                    Some(a) => format!(" {v:5.1}/{}  ", a.arrow()),
                    None => format!("[{v:5.1}/GOAL]"),
                }
            })
            .collect();
        println!("{}", line.join(" "));
    }
}

fn report(world: &GridWorld, title: &str, outcome: &SolveOutcome, elapsed: Duration) {
    println!("\n{title}");
    println!("{}", "=".repeat(70));
    let c = &outcome.convergence;
    if c.converged() {
        println!("Converged in {} iterations", c.iterations);
    } else {
        println!(
            "Stopped at the iteration cap ({}) with delta {:e}",
            c.iterations, c.final_delta
        );
    }
    println!("Optimization time: {:.6} seconds", elapsed.as_secs_f64());
    println!("\nOptimal value function V*(s):");
    print_values(world, outcome);
    println!("\nOptimal policy:");
    print!("{}", outcome.policy);
    println!("\nValue / action:");
    print_combined(world, outcome);
}

fn print_costs(title: &str, outcome: &SolveOutcome, cells: usize) {
    println!("\n{title}:");
    println!(
        "  - Per sweep: {cells} x {cells} x 4 = {} operations",
        outcome.operations_per_sweep()
    );
    println!("  - Sweeps: {}", outcome.convergence.iterations);
    println!("  - Total operations: ~{}", outcome.total_operations());
    println!(
        "  - Memory: {} x {cells} values = {} f64 values",
        outcome.value_tables_live(),
        outcome.values_live()
    );
}

fn run() -> bellman_grid::Result<()> {
    let world_config = GridWorldConfig::default();
    let config = ValueIterationConfig::default();
    let world = GridWorld::new(world_config.clone())?;

    let n = world_config.grid_size;
    println!("Grid: {n}x{n}, discount {}", config.discount);
    for s in &world_config.terminal_states {
        println!("Goal state {s}: reward {:+}", world_config.rewards.goal);
    }
    let greys: Vec<String> = world_config.grey_states.iter().map(|s| s.to_string()).collect();
    println!("Grey states {}: reward {:+}", greys.join(", "), world_config.rewards.grey);
    println!("Regular states: reward {:+}", world_config.rewards.regular);
    println!("Convergence threshold: {:e}, cap: {}", config.theta, config.max_iterations);

    let (standard, standard_time) = timed_solve(&world, config, Discipline::Standard)?;
    let (in_place, in_place_time) = timed_solve(&world, config, Discipline::InPlace)?;
    report(&world, "STANDARD VALUE ITERATION", &standard, standard_time);
    report(&world, "IN-PLACE VALUE ITERATION", &in_place, in_place_time);

    let cmp = DisciplineComparison::from_outcomes(standard, in_place);
    let (standard, in_place) = (&cmp.standard, &cmp.in_place);
    let cells = n * n;

    println!("\nCOMPARISON");
    println!("{}", "=".repeat(80));
    println!("{:<40} {:<20} {:<20}", "Metric", "Standard", "In-Place");
    println!("{}", "-".repeat(80));
    println!(
        "{:<40} {:<20} {:<20}",
        "Iterations to convergence", standard.convergence.iterations, in_place.convergence.iterations
    );
    println!(
        "{:<40} {:<20.6} {:<20.6}",
        "Optimization time (seconds)",
        standard_time.as_secs_f64(),
        in_place_time.as_secs_f64()
    );
    println!(
        "{:<40} {:<20} {:<20}",
        "Live value entries",
        standard.values_live(),
        in_place.values_live()
    );
    println!(
        "{:<40} {:<20.10}",
        "Max value function difference", cmp.max_value_difference
    );
    println!(
        "{:<40} {:<20.2}",
        "Policy agreement (%)",
        100.0 * cmp.policy_agreement
    );
    match cmp.iterations_saved() {
        0 => println!("\nBoth disciplines needed the same number of sweeps"),
        k if k > 0 => println!("\nIn-place needed {k} fewer sweeps"),
        k => println!("\nStandard needed {} fewer sweeps", -k),
    }
    match wall_time_speedup(standard_time, in_place_time) {
        Some((Discipline::InPlace, pct)) => println!("In-place was {pct:.2}% faster in wall time"),
        Some((Discipline::Standard, pct)) => println!("Standard was {pct:.2}% faster in wall time"),
        None => println!("Solves finished too quickly to compare wall time"),
    }

    println!("\nCOST");
    println!("{}", "=".repeat(80));
    print_costs("Standard", standard, cells);
    print_costs("In-place", in_place, cells);

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
