use assistant_chat::cli::{self, parse_args, run_info_command, USAGE};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `assistant_chat=debug`.
const LOG_ENV: &str = "ASSISTANT_CHAT_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // Stdout carries reply text only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    // Handle --version and --help before any initialization
    if run_info_command(&args.command) {
        return Ok(());
    }

    color_eyre::install()?;
    init_tracing();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(cli::run(args));
    // An interrupt at the prompt leaves a stdin read parked on a blocking thread.
    runtime.shutdown_background();
    result
}
