//! Parley CLI binary entrypoint.

fn main() {
    if let Err(err) = parley_cli::app::run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
