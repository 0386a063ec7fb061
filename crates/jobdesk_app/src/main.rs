mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod render;

use jobdesk_logging::level_for_verbosity;

use crate::logging::LogDestination;

fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();

    let destination = if matches.get_flag("log-file") {
        LogDestination::File
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, level_for_verbosity(matches.get_count("verbose")));

    app::run(&matches)
}
