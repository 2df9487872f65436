use clap::Parser;
use dotup::cli::Cli;
use dotup::{commands, ui};

fn main() {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dotup=info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Parse CLI arguments. Help and version requests exit 0; a missing mode
    // or unknown flag exits 1 with the clap message on stderr.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    // Execute command, reporting fatal errors on stderr in the same
    // style as the rest of the output.
    if let Err(err) = commands::execute(cli) {
        ui::error(format!("{err:#}"));
        std::process::exit(1);
    }
}
