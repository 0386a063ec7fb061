use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("jobdesk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal dashboard for the job-search and auto-apply backend")
        .arg(
            Arg::new("api")
                .long("api")
                .help("Backend base URL (overrides JOBDESK_API and the config file)")
                .value_name("URL")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a RON config file (default: ./jobdesk.ron when present)")
                .value_name("PATH")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write logs to ./jobdesk.log instead of stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("watch")
                .about("Show the applications table and refresh it on every poll")
                .arg(
                    Arg::new("interval-ms")
                        .long("interval-ms")
                        .help("Poll interval in milliseconds (default from config: 4000)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("refreshes")
                        .long("refreshes")
                        .help("Exit after this many applied refreshes")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Search jobs and show each card's apply decision")
                .arg(
                    Arg::new("roles")
                        .long("roles")
                        .help("Comma-separated roles"),
                )
                .arg(
                    Arg::new("locations")
                        .long("locations")
                        .help("Comma-separated locations"),
                )
                .arg(
                    Arg::new("keywords")
                        .long("keywords")
                        .help("Comma-separated keywords"),
                )
                .arg(
                    Arg::new("min-score")
                        .long("min-score")
                        .help("Minimum fit score in percent (0-100)")
                        .value_parser(clap::value_parser!(u8).range(0..=100)),
                ),
        )
        .subcommand(
            job_args(
                Command::new("apply")
                    .about("Queue an application unless the URL is already tracked"),
            )
            .arg(
                Arg::new("source")
                    .long("source")
                    .help("Source portal (greenhouse, lever, ...)"),
            )
            .arg(Arg::new("location").long("location").help("Job location")),
        )
        .subcommand(
            job_args(Command::new("tailor").about("Generate tailored bullets and a cover letter"))
                .arg(
                    Arg::new("jd-text")
                        .long("jd-text")
                        .help("Job description text"),
                ),
        )
        .subcommand(
            Command::new("drafts")
                .about("Manage drafts and stuck applications")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("list").about("List drafts"))
                .subcommand(job_args(
                    Command::new("create").about("Create a draft for manual follow-up"),
                ))
                .subcommand(
                    Command::new("resume")
                        .about("Resume a draft")
                        .arg(Arg::new("id").help("Draft id").required(true).index(1)),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a draft")
                        .arg(Arg::new("id").help("Draft id").required(true).index(1)),
                ),
        )
        .subcommand(Command::new("health").about("Show the backend health report"))
}

fn job_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("url")
                .long("url")
                .help("Job posting URL")
                .required(true),
        )
        .arg(
            Arg::new("title")
                .long("title")
                .help("Job title")
                .required(true),
        )
        .arg(
            Arg::new("company")
                .long("company")
                .help("Company name")
                .required(true),
        )
}
