mod args;
mod config;
mod io;
mod parse;
mod run;

use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    if let Err(err) = run::run() {
        eprintln!("cardsnap: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CARDSNAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
