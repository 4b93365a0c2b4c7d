use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};

use hashi::{solve, EncodingLimits, Grid, Method, SolverFailure};

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum Format {
    /// Each row as a bracketed list of quoted cells, `0` for empty cells.
    #[default]
    List,
    /// Each row as a string of cells, `.` for empty cells.
    Plain,
}

/// Solve a Hashiwokakero ("Bridges") puzzle.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// The puzzle: one row per line, cells separated by commas or whitespace, 0 for an empty cell.
    #[arg(short, long)]
    input: PathBuf,

    /// The strategy to solve with: sat, best-first, backtrack or brute-force.
    #[arg(short, long, default_value_t)]
    method: Method,

    /// Where to write the solution; defaults to `Outputs/<input stem>_<method>.txt`.
    #[arg(short, long, conflicts_with = "no_write")]
    output: Option<PathBuf>,

    /// Only print the solution.
    #[arg(long)]
    no_write: bool,

    #[arg(short, long, value_enum, default_value_t)]
    format: Format,

    /// Upper bound on variables in the boolean encoding.
    #[arg(long)]
    max_variables: Option<usize>,

    /// Upper bound on clauses in the boolean encoding.
    #[arg(long)]
    max_clauses: Option<usize>,

    /// Log encoding sizes and search statistics.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn limits(&self) -> EncodingLimits {
        let defaults = EncodingLimits::default();
        EncodingLimits {
            max_variables: self.max_variables.unwrap_or(defaults.max_variables),
            max_clauses: self.max_clauses.unwrap_or(defaults.max_clauses),
        }
    }

    fn output_path(&self) -> Option<PathBuf> {
        if self.no_write {
            return None;
        }
        self.output.clone().or_else(|| Some(default_output(&self.input, self.method)))
    }
}

fn default_output(input: &Path, method: Method) -> PathBuf {
    let stem = input.file_stem().map_or_else(|| "puzzle".into(), |stem| stem.to_string_lossy());
    Path::new("Outputs").join(format!("{stem}_{method}.txt"))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .parse_default_env()
        .init();

    info!("reading {}", args.input.display());
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Error reading {}", args.input.display()))?;
    let grid: Grid = text.parse()
        .with_context(|| format!("Failed to parse a grid from {}", args.input.display()))?;

    let report = solve(&grid, args.method, args.limits());
    let solution = match report.outcome {
        Ok(solution) => solution,
        Err(SolverFailure::Unsatisfiable) => {
            println!("No solution found.");
            return Ok(());
        }
        Err(failure) => return Err(failure).context("Cannot solve this grid"),
    };

    let rendered = solution.render(&grid);
    let text = match args.format {
        Format::List => rendered.to_list_string(),
        Format::Plain => rendered.to_string(),
    };

    println!("Solved in {:.4} seconds.", report.elapsed.as_secs_f64());
    if let Some(path) = args.output_path() {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Error creating {}", parent.display()))?;
        }
        fs::write(&path, &text)
            .with_context(|| format!("Error writing {}", path.display()))?;
        println!("Output written to {}", path.display());
    }
    println!("{text}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::Parser;

    use hashi::Method;

    use crate::{default_output, Cli};

    #[test]
    fn default_output_path() {
        assert_eq!(default_output(Path::new("inputs/input-01.txt"), Method::BestFirst),
            PathBuf::from("Outputs/input-01_best-first.txt"));
    }

    #[test]
    fn parse_arguments() {
        let args = Cli::try_parse_from(["hashi", "--input", "a.txt", "--method", "astar", "--max-clauses", "10"]).unwrap();
        assert_eq!(args.method, Method::BestFirst);
        assert_eq!(args.limits().max_clauses, 10);
        assert_eq!(args.output_path(), Some(PathBuf::from("Outputs/a_best-first.txt")));

        let args = Cli::try_parse_from(["hashi", "-i", "a.txt", "--no-write"]).unwrap();
        assert_eq!(args.method, Method::Sat);
        assert_eq!(args.output_path(), None);

        assert!(Cli::try_parse_from(["hashi", "-i", "a.txt", "-m", "annealing"]).is_err());
    }
}
