use clap::Parser;
use osintree::cli::{Cli, Command};
use osintree::{cmd_init, cmd_render, cmd_serve, cmd_show};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let exit_code = match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Show(args) => cmd_show(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
    tracing::debug!(?level, "logging initialised");
}
