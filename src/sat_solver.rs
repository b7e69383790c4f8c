use std::collections::HashMap;
use std::env::{split_paths, var_os};
use std::num::NonZeroI32;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::fs::metadata;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, Command};
use tokio::spawn;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::formula_builder::{Literal, Variable};

/// Exit status of a competition-style solver that found a model.
const EXIT_SATISFIABLE: i32 = 10;
const EXIT_UNSATISFIABLE: i32 = 20;

async fn find_file_on_path(name: &str) -> Result<PathBuf> {
    let path = var_os("PATH").ok_or_else(|| anyhow!("PATH not defined in the environment"))?;

    for mut path in split_paths(&path) {
        path.push(name);
        if let Ok(metadata) = metadata(&path).await {
            if metadata.is_file() {
                return Ok(path);
            }
        }
    }

    Err(anyhow!("{} was not found on the PATH", name))
}

#[derive(Debug)]
pub enum Solution {
    Satisfiable {
        assignments: HashMap<Variable, bool>,
    },
    Unsatisfiable,
}

fn parse_status(line: &str) -> Result<Solution> {
    let mut words = line.split_ascii_whitespace();
    let status = match (words.next(), words.next()) {
        (Some(status), None) => status.to_lowercase(),
        _ => return Err(anyhow!("DIMACS parse error: bad solution line: {:?}", line)),
    };
    match &*status {
        "satisfiable" => Ok(Solution::Satisfiable {
            assignments: HashMap::new(),
        }),
        "unsatisfiable" => Ok(Solution::Unsatisfiable),
        _ => Err(anyhow!(
            "DIMACS parse error: unsupported solution line: {:?}",
            line
        )),
    }
}

fn parse_literal(part: &str) -> Result<Option<Literal>> {
    let value: i32 = part
        .parse()
        .with_context(|| anyhow!("DIMACS parse error: bad literal: {:?}", part))?;
    match NonZeroI32::new(value) {
        None => Ok(None),
        Some(index) => Literal::from_index(index)
            .map(Some)
            .ok_or_else(|| anyhow!("DIMACS parse error: literal out of range: {}", value)),
    }
}

/// Reads a solver's answer in SAT competition format. Comment lines are passed to the log.
pub async fn parse_output<R: AsyncRead + Unpin>(output: R) -> Result<Solution> {
    let mut solution = None;
    let mut lines = BufReader::new(output).lines();
    let mut variables_done = false;
    while let Some(line) = lines.next_line().await? {
        if let Some(suffix) = line.strip_prefix('s') {
            if solution.is_some() {
                return Err(anyhow!("DIMACS parse error: multiple solution lines"));
            }
            solution = Some(parse_status(suffix)?);
        } else if let Some(suffix) = line.strip_prefix('v') {
            let assignments = match solution.as_mut() {
                Some(Solution::Satisfiable { assignments }) => assignments,
                _ => {
                    return Err(anyhow!("DIMACS parse error: unexpected variable assignments"));
                }
            };
            for part in suffix.split_ascii_whitespace() {
                if variables_done {
                    return Err(anyhow!(
                        "DIMACS parse error: variable assignments after the zero terminator",
                    ));
                }
                match parse_literal(part)? {
                    Some(literal) => {
                        assignments.insert(literal.variable(), literal.is_positive());
                    }
                    None => variables_done = true,
                }
            }
        } else if !line.trim().is_empty() {
            debug!(target: "solver", "{}", line);
        }
    }

    match solution {
        Some(Solution::Satisfiable { .. }) if !variables_done => Err(anyhow!(
            "DIMACS parse error: variable assignments not terminated with a zero literal",
        )),
        Some(solution) => Ok(solution),
        None => Err(anyhow!("DIMACS parse error: no solution line")),
    }
}

/// Checks that the exit code agrees with the parsed solution line. `None` means the solver was
/// killed by a signal.
fn check_exit_status(code: Option<i32>, solution: &Solution) -> Result<()> {
    match (code, solution) {
        (Some(EXIT_SATISFIABLE), Solution::Satisfiable { .. })
        | (Some(EXIT_UNSATISFIABLE), Solution::Unsatisfiable) => Ok(()),
        _ => Err(anyhow!(
            "unexpected exit code {:?} with parsed solution {:?}",
            code,
            solution,
        )),
    }
}

/// A running solver process. Write the formula to `input()`, then call `solve()`.
pub struct SatSolver {
    name: String,
    child: Child,
    input: BufWriter<ChildStdin>,
    solution: JoinHandle<Result<Solution>>,
}

impl SatSolver {
    pub async fn start(name: &str) -> Result<Self> {
        let executable_path = find_file_on_path(name).await?;
        info!(solver = %executable_path.display(), "starting solver");

        let mut child = Command::new(&executable_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to execute {}", name))?;

        let input = BufWriter::new(
            child
                .stdin
                .take()
                .ok_or_else(|| anyhow!("{} stdin was not captured", name))?,
        );
        let output = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("{} stdout was not captured", name))?;
        let solution = spawn(async move { parse_output(output).await });

        Ok(Self {
            name: name.to_string(),
            child,
            input,
            solution,
        })
    }

    pub fn input(&mut self) -> &mut (impl AsyncWrite + Unpin) {
        &mut self.input
    }

    pub async fn solve(self) -> Result<Solution> {
        let Self {
            name,
            mut child,
            mut input,
            solution,
        } = self;
        input.shutdown().await?;
        drop(input);

        let exit_status = child.wait().await?;
        let solution = solution.await??;
        check_exit_status(exit_status.code(), &solution)
            .with_context(|| anyhow!("{} exited with {}", name, exit_status))?;

        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{check_exit_status, parse_output, Solution};
    use crate::formula_builder::Variable;

    fn var(index: u32) -> Variable {
        Variable::from_index(index).unwrap()
    }

    #[tokio::test]
    async fn parses_satisfiable_answer() {
        let output = b"c kissat\ns SATISFIABLE\nv 1 -2 3\nv -4 0\n" as &[u8];
        match parse_output(output).await.unwrap() {
            Solution::Satisfiable { assignments } => {
                assert_eq!(4, assignments.len());
                assert!(assignments[&var(1)]);
                assert!(!assignments[&var(2)]);
                assert!(assignments[&var(3)]);
                assert!(!assignments[&var(4)]);
            }
            Solution::Unsatisfiable => panic!("expected a model"),
        }
    }

    #[tokio::test]
    async fn parses_unsatisfiable_answer() {
        let output = b"s UNSATISFIABLE\n" as &[u8];
        assert!(matches!(
            parse_output(output).await.unwrap(),
            Solution::Unsatisfiable
        ));
    }

    #[tokio::test]
    async fn rejects_malformed_answers() {
        let cases: &[&[u8]] = &[
            b"",
            b"s MAYBE\n",
            b"s SATISFIABLE\ns SATISFIABLE\n",
            b"v 1 0\n",
            b"s SATISFIABLE\nv 1 -2\n",
            b"s SATISFIABLE\nv 1 0 2\n",
            b"s SATISFIABLE\nv x 0\n",
            b"s UNSATISFIABLE\nv 1 0\n",
        ];
        for output in cases {
            assert!(
                parse_output(*output).await.is_err(),
                "{:?}",
                String::from_utf8_lossy(output)
            );
        }
    }

    #[test]
    fn exit_code_must_match_solution_line() {
        let satisfiable = Solution::Satisfiable {
            assignments: HashMap::new(),
        };
        let unsatisfiable = Solution::Unsatisfiable;

        assert!(check_exit_status(Some(10), &satisfiable).is_ok());
        assert!(check_exit_status(Some(20), &unsatisfiable).is_ok());
        assert!(check_exit_status(Some(10), &unsatisfiable).is_err());
        assert!(check_exit_status(Some(20), &satisfiable).is_err());
        assert!(check_exit_status(Some(0), &satisfiable).is_err());
        assert!(check_exit_status(None, &unsatisfiable).is_err());
    }
}
