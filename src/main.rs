use std::io::stderr;
use std::time::Duration;

use adder_cnf::sat_solver::{SatSolver, Solution};
use adder_cnf::solution::Addition;
use adder_cnf::{compile_adder, AdderParameters, BitPattern, CompiledAdder};
use anyhow::{anyhow, Context, Result};
use clap::{clap_app, App, ArgMatches};
use tokio::fs::File;
use tokio::io::{stdout, AsyncWriteExt, BufWriter};
use tokio::time::timeout;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_A_WIDTH: usize = 3;
const DEFAULT_B_WIDTH: usize = 4;

fn get_usize_arg(matches: &ArgMatches, name: &str) -> Result<Option<usize>> {
    matches
        .value_of(name)
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| anyhow!("expected a non-negative integer in --{} {}", name, s))
        })
        .transpose()
}

fn get_pattern_arg(matches: &ArgMatches, name: &str) -> Result<Option<BitPattern>> {
    matches
        .value_of(name)
        .map(|s| {
            s.parse::<BitPattern>()
                .with_context(|| anyhow!("bad bit pattern in --{} {}", name, s))
        })
        .transpose()
}

fn parameters(matches: &ArgMatches) -> Result<AdderParameters> {
    let a = get_pattern_arg(matches, "a")?;
    let b = get_pattern_arg(matches, "b")?;
    Ok(AdderParameters {
        a_width: get_usize_arg(matches, "a_width")?
            .or_else(|| a.as_ref().map(BitPattern::len))
            .unwrap_or(DEFAULT_A_WIDTH),
        b_width: get_usize_arg(matches, "b_width")?
            .or_else(|| b.as_ref().map(BitPattern::len))
            .unwrap_or(DEFAULT_B_WIDTH),
        a,
        b,
    })
}

async fn solve(adder: &CompiledAdder, solver_name: &str, limit: Option<Duration>) -> Result<()> {
    let mut solver = SatSolver::start(solver_name).await?;
    adder.formula().write_dimacs(solver.input()).await?;

    let solution = if let Some(duration) = limit {
        timeout(duration, solver.solve())
            .await
            .with_context(|| anyhow!("{} gave no answer within {:?}", solver_name, duration))??
    } else {
        solver.solve().await?
    };

    println!("{}", describe(adder, &solution)?);
    Ok(())
}

/// The line printed for a solver's answer. An unsatisfiable formula is an answer, not a failure.
fn describe(adder: &CompiledAdder, solution: &Solution) -> Result<String> {
    match solution {
        Solution::Satisfiable { assignments } => {
            Ok(Addition::decode(adder, assignments)?.to_string())
        }
        Solution::Unsatisfiable => Ok("UNSATISFIABLE".to_string()),
    }
}

fn app() -> App<'static, 'static> {
    clap_app!(adder_cnf =>
        (about: "Encodes unsigned binary addition as a DIMACS CNF formula")
        (@arg a: --a +takes_value "Bits of operand A, most significant first (default unconstrained)")
        (@arg b: --b +takes_value "Bits of operand B, most significant first (default unconstrained)")
        (@arg a_width: --a_width +takes_value "Width of operand A, at least 1 (default: length of --a, else 3)")
        (@arg b_width: --b_width +takes_value "Width of operand B, at least 1 (default: length of --b, else 4)")
        (@arg output: --output +takes_value conflicts_with[solve] "Write the formula to this file instead of stdout")
        (@arg solve: --solve "Solve the formula and print the decoded sum")
        (@arg solver: --solver +takes_value "Solver executable on the PATH (default kissat)")
        (@arg timeout_seconds: --timeout_seconds +takes_value "Seconds to search before giving up (default unbounded)")
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(stderr)
        .try_init();

    let matches = app().get_matches();

    let params = parameters(&matches)?;
    let timeout_duration = get_usize_arg(&matches, "timeout_seconds")?
        .map(|seconds| Duration::from_secs(seconds as u64));
    let adder = compile_adder(&params)?;
    info!(
        variables = adder.variable_count(),
        clauses = adder.clause_count(),
        "generated formula"
    );

    if matches.is_present("solve") {
        let solver_name = matches.value_of("solver").unwrap_or("kissat");
        return solve(&adder, solver_name, timeout_duration).await;
    }

    if let Some(path) = matches.value_of("output") {
        let file = File::create(path)
            .await
            .with_context(|| anyhow!("failed to create {}", path))?;
        let mut w = BufWriter::new(file);
        adder.formula().write_dimacs(&mut w).await?;
        w.shutdown().await?;
        info!(path, "wrote formula");
    } else {
        let mut w = BufWriter::new(stdout());
        adder.formula().write_dimacs(&mut w).await?;
        w.shutdown().await?;
    }

    Ok(())
}
