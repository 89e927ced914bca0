use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model for an execution as it is returned by `ListExecutions`
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReference {
    pub execution_arn: String,
    /// Start of the execution in epoch seconds. Only informational, the cutoff is checked against
    /// `ExecutionDetail::start_date`.
    pub start_date: i64,
}

/// Model for one page of failed executions
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPage {
    pub executions: Vec<ExecutionReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Model for the parts of `DescribeExecution` we care about
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDetail {
    pub input: String,
    /// Start of the execution in epoch seconds
    pub start_date: i64,
}

/// A single entry of a result file
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub execution_arn: String,
    pub execution_input: String,
}

/// Why a scan stopped requesting pages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// An execution older than the cutoff was found
    CutoffReached,
    /// The list endpoint did not return a continuation token
    Exhausted,
}

/// Outcome of a finished scan
#[derive(Debug)]
pub struct ScanSummary {
    pub pages: u32,
    pub records: usize,
    pub files: Vec<PathBuf>,
    pub stop_reason: StopReason,
}
