use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(
author,
version,
about,
long_about = None
)]
pub struct Cli {
    /// ARN of the state machine whose failed executions are collected (prompted if omitted)
    #[clap(value_parser, env = "SFNSCAN_STATE_MACHINE_ARN")]
    pub state_machine_arn: Option<String>,

    /// Stop at executions started before this point: epoch seconds, RFC 3339 or YYYY-MM-DD (prompted if omitted)
    #[clap(value_parser, env = "SFNSCAN_CUTOFF")]
    pub cutoff: Option<String>,

    /// Path to JSON config file
    #[clap(short, long, value_parser, default_value_t = String::from(crate::DEFAULT_CONFIG_PATH), env = "SFNSCAN_CONFIG")]
    pub config: String,

    /// Named AWS profile
    #[clap(short, long, value_parser, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region, overrides the region of the profile
    #[clap(short, long, value_parser, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Directory the result files are written to
    #[clap(short, long, value_parser, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of executions requested per page
    #[clap(long, value_parser = clap::value_parser!(i32).range(1..=1000))]
    pub page_size: Option<i32>,
}
