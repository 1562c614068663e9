use std::env;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use interval_bnb::{functions, MinimizeBuilder, SearchError};

/// Whitespace-separated tokens from stdin, read lazily line by line.
struct Tokens<R> {
    input: R,
    pending: Vec<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            pending: Vec::new(),
        }
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending = line.split_whitespace().rev().map(str::to_string).collect();
        }
        Ok(self.pending.pop())
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("{0}")]
    Input(String),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ibb: {err}");
        std::process::exit(1);
    }
}

fn workers_from_env() -> Result<usize, CliError> {
    let Ok(v) = env::var("IBB_WORKERS") else {
        return Ok(1);
    };
    match v.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::Input(format!(
            "IBB_WORKERS must be a positive integer, got {v:?}"
        ))),
    }
}

fn run() -> Result<(), CliError> {
    let workers = workers_from_env()?;
    let stdin = io::stdin();
    let mut tokens = Tokens::new(stdin.lock());
    let mut out = io::stdout();

    let problem = loop {
        writeln!(out, "Which function to optimize?")?;
        writeln!(out, "Possible choices: {}", functions::names().join(" "))?;
        out.flush()?;
        let choice = tokens
            .next_token()?
            .ok_or_else(|| CliError::Input("no function name given".into()))?;
        match functions::lookup(&choice) {
            Ok(p) => break p,
            Err(_) => eprintln!("Bad choice"),
        }
    };

    write!(out, "Precision? ")?;
    out.flush()?;
    let raw = tokens
        .next_token()?
        .ok_or_else(|| CliError::Input("no precision given".into()))?;
    let precision: f64 = raw
        .parse()
        .map_err(|_| CliError::Input(format!("precision must be a number, got {raw:?}")))?;

    let builder = MinimizeBuilder::from_problem(&problem).threshold(precision);
    let start = Instant::now();

    if workers > 1 {
        let result = builder.minimize_distributed(workers)?;
        let elapsed = start.elapsed();
        writeln!(out, "{result}")?;
        writeln!(out, "Workers: {workers}")?;
        writeln!(out, "Time: {:.3}s", elapsed.as_secs_f64())?;
    } else {
        let result = builder.minimize()?;
        let elapsed = start.elapsed();
        for m in &result.minimizers {
            writeln!(out, "{m}")?;
        }
        writeln!(out, "{result}")?;
        writeln!(out, "Time: {:.3}s", elapsed.as_secs_f64())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_span_lines() {
        let input = io::Cursor::new("booth  \n\n 0.01 extra\n");
        let mut t = Tokens::new(input);
        assert_eq!(t.next_token().unwrap().as_deref(), Some("booth"));
        assert_eq!(t.next_token().unwrap().as_deref(), Some("0.01"));
        assert_eq!(t.next_token().unwrap().as_deref(), Some("extra"));
        assert_eq!(t.next_token().unwrap(), None);
    }
}
