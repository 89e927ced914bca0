//! `sfnscan` collects the inputs of failed AWS Step Functions executions. It mainly uses `clap`
//! and the AWS SDK under the hood.
//!
//! The main logic for the application can be found in `clap_app.rs`, the pagination loop in
//! `execution.rs`.
//!
//! Have a look at the
//! [Step Functions API reference](https://docs.aws.amazon.com/step-functions/latest/apireference/)
//! if you have questions about `ListExecutions` or `DescribeExecution`.

mod clap_app;
mod clap_models;
mod client;
mod config;
mod errors;
mod execution;
mod models;
mod output;
mod prompt;

use crate::clap_app::init_cli;

const DEFAULT_CONFIG_PATH: &str = "./sfnscan.json";
const DEFAULT_FILE_PREFIX: &str = "result";
/// Upper limit of `maxResults` accepted by `ListExecutions`
const MAX_PAGE_SIZE: i32 = 1000;

#[tokio::main]
async fn main() {
    // enable logger
    env_logger::init();

    // Enable virtual terminal to correctly colorize output on Windows 10 machines
    #[cfg(target_os = "windows")]
    colored::control::set_virtual_terminal(true).ok();

    init_cli().await;
}
