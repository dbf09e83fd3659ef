use {
    clap::Parser,
    matgen::{MATRIX_SIZE, MatrixError, cholesky, load_csv},
    std::{
        path::{Path, PathBuf},
        process::ExitCode,
    },
};

fn validate_input_path(s: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err("Path does not exist".to_string())
    }
}

/// Checks generated matrix files and prints their summary statistics.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[arg(
        required = true,
        value_parser = validate_input_path,
        help = "Matrix files (must exist)"
    )]
    paths: Vec<PathBuf>,

    #[arg(short, long, default_value_t = MATRIX_SIZE)]
    size: usize,

    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Time a lower Cholesky of A*A^T + n*I, averaged over this many runs"
    )]
    cholesky_iters: Option<u32>,
}

fn inspect(path: &Path, size: usize, cholesky_iters: Option<u32>) -> matgen::Result<String> {
    let matrix = load_csv(path)?;
    if !matrix.is_square(size) {
        return Err(MatrixError::Shape {
            expected: size,
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }

    let mut report = match matrix.summary() {
        Some(s) => format!(
            "{}: {}x{}  min {:.4}  max {:.4}  mean {:.4}  std_dev {:.4}",
            path.display(),
            matrix.rows(),
            matrix.cols(),
            s.min,
            s.max,
            s.mean,
            s.std_dev
        ),
        None => format!("{}: empty", path.display()),
    };
    if let Some(iters) = cholesky_iters {
        report.push('\n');
        report += &cholesky::bench(&matrix, iters)?.to_json();
    }
    Ok(report)
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut failed = 0;
    for path in &args.paths {
        match inspect(path, args.size, args.cholesky_iters) {
            Ok(report) => println!("{report}"),
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                failed += 1;
            }
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{failed} of {} files failed", args.paths.len());
        ExitCode::FAILURE
    }
}
