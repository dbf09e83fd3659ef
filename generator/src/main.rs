use {clap::Parser, matgen::Generator, std::process::ExitCode};

/// Writes two random 32x32 standard normal matrices to data/data1.csv and
/// data/data2.csv. The data/ directory must already exist.
#[derive(Parser)]
#[command(version, about)]
struct Args {}

/// Error text goes to stderr independently of the log filter.
fn run(generator: &Generator) -> Result<(), String> {
    generator
        .run()
        .map(drop)
        .map_err(|e| format!("generator: {e}"))
}

fn main() -> ExitCode {
    let Args {} = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(&Generator::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}
