use colored::*;

/// Prints a fatal error together with its chain of causes.
///
/// # Arguments
///
/// * `error` - The error that ended the run
pub fn throw_scan_error(error: &anyhow::Error) {
    eprintln!("{} {}", "❌".red(), format_error(error).red().bold());
}

/// Renders an error and its causes as `outer: cause: root cause`.
pub fn format_error(error: &anyhow::Error) -> String {
    error
        .chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
