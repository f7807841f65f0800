use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,holdem_cli=info"));

    // Game output owns stdout; diagnostics go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    let code = holdem_cli::run(std::env::args(), &mut out, &mut err);
    std::process::exit(code);
}
