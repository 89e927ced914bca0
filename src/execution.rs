use anyhow::Result;
use colored::Colorize;
use log::debug;

use crate::client::ExecutionSource;
use crate::config::ScannerConfig;
use crate::models::cutoff::Cutoff;
use crate::models::execution::{ExecutionPage, ExecutionResult, ScanSummary, StopReason};
use crate::output::write_page;

/// Results of a single page and whether the cutoff was hit while collecting them.
#[derive(Debug)]
pub struct PageResults {
    pub results: Vec<ExecutionResult>,
    pub cutoff_reached: bool,
}

/// Fetches the input of every execution on a page, in the order returned.
///
/// Stops at the first execution that started before the cutoff. That execution is still part of
/// the results, everything after it is neither fetched nor included.
pub async fn collect_page<S: ExecutionSource + Send>(
    client: &mut S,
    page: &ExecutionPage,
    cutoff: Cutoff,
) -> Result<PageResults> {
    let mut results = Vec::with_capacity(page.executions.len());

    for execution in &page.executions {
        let detail = client.describe_execution(&execution.execution_arn).await?;
        results.push(ExecutionResult {
            execution_arn: execution.execution_arn.clone(),
            execution_input: detail.input,
        });

        debug!(
            "execution date: {} and datelimit: {}",
            detail.start_date,
            cutoff.epoch_seconds()
        );
        if cutoff.is_passed_by(detail.start_date) {
            return Ok(PageResults {
                results,
                cutoff_reached: true,
            });
        }
    }

    Ok(PageResults {
        results,
        cutoff_reached: false,
    })
}

/// Collects the inputs of failed executions, newest first, until the cutoff is reached or the
/// list is exhausted. Every page is written to its own result file.
///
/// Any failing request aborts the scan. Files of earlier pages stay on disk, the current page is
/// not written.
///
/// # Arguments
///
/// * `client` - A mutable reference to an ExecutionSource
/// * `config` - Output location and page size
/// * `state_machine_arn` - ARN of the state machine to scan
/// * `cutoff` - Executions started before this point end the scan
pub async fn scan_failed_executions<S: ExecutionSource + Send>(
    client: &mut S,
    config: &ScannerConfig,
    state_machine_arn: &str,
    cutoff: Cutoff,
) -> Result<ScanSummary> {
    let mut next_token: Option<String> = None;
    let mut page_index: u32 = 0;
    let mut summary = ScanSummary {
        pages: 0,
        records: 0,
        files: Vec::new(),
        stop_reason: StopReason::Exhausted,
    };

    loop {
        println!("{} {}", "🔍 Searching through page".cyan(), page_index);
        let page = client
            .list_failed_executions(state_machine_arn, next_token.as_deref(), config.page_size)
            .await?;
        debug!(
            "page {} returned {} executions, next token present: {}",
            page_index,
            page.executions.len(),
            page.next_token.is_some()
        );

        let collected = collect_page(client, &page, cutoff).await?;
        let file = write_page(
            &config.output_dir,
            &config.file_prefix,
            page_index,
            &collected.results,
        )?;
        println!("{:>8} {}", "✍", file.display());

        summary.pages += 1;
        summary.records += collected.results.len();
        summary.files.push(file);

        if collected.cutoff_reached {
            summary.stop_reason = StopReason::CutoffReached;
            break;
        }
        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
        page_index += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::execution::{ExecutionDetail, ExecutionReference};
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;

    /// In-memory stand-in for Step Functions.
    struct FakeSource {
        pages: HashMap<Option<String>, ExecutionPage>,
        details: HashMap<String, ExecutionDetail>,
        list_calls: Vec<Option<String>>,
        page_sizes: Vec<i32>,
        describe_calls: Vec<String>,
    }

    impl FakeSource {
        fn new() -> Self {
            FakeSource {
                pages: HashMap::new(),
                details: HashMap::new(),
                list_calls: Vec::new(),
                page_sizes: Vec::new(),
                describe_calls: Vec::new(),
            }
        }

        /// Registers a page served for `token` with executions started at `start_dates`.
        fn page(mut self, token: Option<&str>, start_dates: &[i64], next: Option<&str>) -> Self {
            let offset = self.details.len();
            let mut executions = Vec::new();
            for (i, start_date) in start_dates.iter().enumerate() {
                let arn = format!("arn:aws:states:eu-west-1:1:execution:orders:run-{}", offset + i);
                self.details.insert(
                    arn.clone(),
                    ExecutionDetail {
                        input: format!("{{\"run\":{}}}", offset + i),
                        start_date: *start_date,
                    },
                );
                executions.push(ExecutionReference {
                    execution_arn: arn,
                    start_date: *start_date,
                });
            }
            self.pages.insert(
                token.map(str::to_owned),
                ExecutionPage {
                    executions,
                    next_token: next.map(str::to_owned),
                },
            );
            self
        }
    }

    #[async_trait::async_trait]
    impl ExecutionSource for FakeSource {
        async fn list_failed_executions(
            &mut self,
            _state_machine_arn: &str,
            next_token: Option<&str>,
            max_results: i32,
        ) -> Result<ExecutionPage> {
            self.page_sizes.push(max_results);
            let key = next_token.map(str::to_owned);
            self.list_calls.push(key.clone());
            self.pages
                .get(&key)
                .cloned()
                .ok_or_else(|| anyhow!("no page for token {:?}", key))
        }

        async fn describe_execution(&mut self, execution_arn: &str) -> Result<ExecutionDetail> {
            self.describe_calls.push(execution_arn.to_owned());
            self.details
                .get(execution_arn)
                .cloned()
                .ok_or_else(|| anyhow!("ExecutionDoesNotExist: {}", execution_arn))
        }
    }

    fn config_for(dir: &Path) -> ScannerConfig {
        let mut config = ScannerConfig::new();
        config.output_dir = dir.to_path_buf();
        config
    }

    fn read_results(path: &Path) -> Vec<ExecutionResult> {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn stops_on_first_execution_older_than_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FakeSource::new().page(None, &[100, 90, 80], None);

        let summary = scan_failed_executions(
            &mut source,
            &config_for(dir.path()),
            "arn:sm",
            Cutoff::from_epoch_seconds(95),
        )
        .await
        .unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.stop_reason, StopReason::CutoffReached);
        let results = read_results(&dir.path().join("result0.json"));
        // the execution that crosses the cutoff is still recorded
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].execution_input, "{\"run\":0}");
        assert_eq!(source.describe_calls.len(), 2);
    }

    #[tokio::test]
    async fn first_execution_past_cutoff_is_the_only_result() {
        let mut source = FakeSource::new().page(None, &[100, 90, 80], None);

        let page = source.pages.get(&None).cloned().unwrap();
        let collected = collect_page(&mut source, &page, Cutoff::from_epoch_seconds(101))
            .await
            .unwrap();

        assert!(collected.cutoff_reached);
        assert_eq!(collected.results.len(), 1);
        assert_eq!(source.describe_calls.len(), 1);
    }

    #[tokio::test]
    async fn follows_continuation_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FakeSource::new()
            .page(None, &[200, 150], Some("abc"))
            .page(Some("abc"), &[120], None);

        let summary = scan_failed_executions(
            &mut source,
            &config_for(dir.path()),
            "arn:sm",
            Cutoff::from_epoch_seconds(50),
        )
        .await
        .unwrap();

        assert_eq!(source.list_calls, vec![None, Some("abc".to_owned())]);
        assert_eq!(source.page_sizes, vec![1000, 1000]);
        assert_eq!(read_results(&dir.path().join("result0.json")).len(), 2);
        assert_eq!(read_results(&dir.path().join("result1.json")).len(), 1);
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.records, 3);
        assert_eq!(summary.stop_reason, StopReason::Exhausted);
    }

    #[tokio::test]
    async fn empty_page_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FakeSource::new().page(None, &[], None);

        let summary = scan_failed_executions(
            &mut source,
            &config_for(dir.path()),
            "arn:sm",
            Cutoff::from_epoch_seconds(50),
        )
        .await
        .unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.records, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("result0.json")).unwrap(),
            "[]"
        );
    }

    #[tokio::test]
    async fn failed_detail_aborts_without_writing_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FakeSource::new()
            .page(None, &[300], Some("abc"))
            .page(Some("abc"), &[200, 150], None);
        source
            .details
            .remove("arn:aws:states:eu-west-1:1:execution:orders:run-2");

        let err = scan_failed_executions(
            &mut source,
            &config_for(dir.path()),
            "arn:sm",
            Cutoff::from_epoch_seconds(50),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("ExecutionDoesNotExist"));
        assert!(dir.path().join("result0.json").exists());
        assert!(!dir.path().join("result1.json").exists());
    }

    #[tokio::test]
    async fn rerun_produces_identical_files() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        for dir in [&first, &second].iter() {
            let mut source = FakeSource::new()
                .page(None, &[200, 150], Some("abc"))
                .page(Some("abc"), &[120, 40], None);
            scan_failed_executions(
                &mut source,
                &config_for(dir.path()),
                "arn:sm",
                Cutoff::from_epoch_seconds(50),
            )
            .await
            .unwrap();
        }

        for name in ["result0.json", "result1.json"].iter() {
            assert_eq!(
                fs::read(first.path().join(name)).unwrap(),
                fs::read(second.path().join(name)).unwrap()
            );
        }
    }

    #[tokio::test]
    async fn cutoff_ends_scan_even_with_continuation_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FakeSource::new()
            .page(None, &[200, 40, 30], Some("abc"))
            .page(Some("abc"), &[20], None);

        let summary = scan_failed_executions(
            &mut source,
            &config_for(dir.path()),
            "arn:sm",
            Cutoff::from_epoch_seconds(50),
        )
        .await
        .unwrap();

        assert_eq!(source.list_calls, vec![None]);
        assert_eq!(source.describe_calls.len(), 2);
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.stop_reason, StopReason::CutoffReached);
        assert_eq!(read_results(&dir.path().join("result0.json")).len(), 2);
        assert!(!dir.path().join("result1.json").exists());
    }

    #[tokio::test]
    async fn configured_page_size_reaches_list_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FakeSource::new()
            .page(None, &[200], Some("abc"))
            .page(Some("abc"), &[150], None);
        let mut config = config_for(dir.path());
        config.page_size = 250;

        scan_failed_executions(&mut source, &config, "arn:sm", Cutoff::from_epoch_seconds(50))
            .await
            .unwrap();

        assert_eq!(source.page_sizes, vec![250, 250]);
    }
}
