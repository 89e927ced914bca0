use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sfn::config::ProvideCredentials;
use aws_sdk_sfn::error::DisplayErrorContext;
use aws_sdk_sfn::types::ExecutionStatus;
use log::{debug, warn};

use crate::config::ScannerConfig;
use crate::models::execution::{ExecutionDetail, ExecutionPage, ExecutionReference};

/// The two Step Functions endpoints the scanner relies on.
#[async_trait]
pub trait ExecutionSource {
    /// Lists one page of failed executions of a state machine.
    async fn list_failed_executions(
        &mut self,
        state_machine_arn: &str,
        next_token: Option<&str>,
        max_results: i32,
    ) -> Result<ExecutionPage>;

    /// Fetches input payload and start date of a single execution.
    async fn describe_execution(&mut self, execution_arn: &str) -> Result<ExecutionDetail>;
}

/// Model for the Step Functions client object
#[derive(Debug)]
pub struct StepFunctionsClient {
    pub client: aws_sdk_sfn::Client,
}

impl StepFunctionsClient {
    /// Builds a client from the shared AWS config of the configured profile.
    ///
    /// Credentials are resolved once up front, so a broken profile fails before scanning starts.
    pub async fn connect(config: &ScannerConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let profile_name = config.profile.as_deref().unwrap_or("default");
        if sdk_config.region().is_none() {
            return Err(anyhow!(
                "No AWS region configured for profile '{}'",
                profile_name
            ));
        }
        let credentials = sdk_config
            .credentials_provider()
            .ok_or_else(|| anyhow!("No credentials provider for profile '{}'", profile_name))?;
        credentials
            .provide_credentials()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("Unable to load credentials for profile '{}'", profile_name))?;
        debug!(
            "connected with profile {} in region {:?}",
            profile_name,
            sdk_config.region()
        );

        Ok(StepFunctionsClient {
            client: aws_sdk_sfn::Client::new(&sdk_config),
        })
    }
}

#[async_trait]
impl ExecutionSource for StepFunctionsClient {
    /// # Performed API Request
    ///
    /// ```
    /// ListExecutions { stateMachineArn, statusFilter: FAILED, maxResults, nextToken }
    /// ```
    async fn list_failed_executions(
        &mut self,
        state_machine_arn: &str,
        next_token: Option<&str>,
        max_results: i32,
    ) -> Result<ExecutionPage> {
        let output = self
            .client
            .list_executions()
            .state_machine_arn(state_machine_arn)
            .status_filter(ExecutionStatus::Failed)
            .max_results(max_results)
            .set_next_token(next_token.map(str::to_owned))
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("Error while fetching executions of {}", state_machine_arn))?;

        let executions = output
            .executions()
            .iter()
            .map(|item| ExecutionReference {
                execution_arn: item.execution_arn().to_owned(),
                start_date: item.start_date().secs(),
            })
            .collect();

        Ok(ExecutionPage {
            executions,
            next_token: output.next_token().map(str::to_owned),
        })
    }

    /// # Performed API Request
    ///
    /// ```
    /// DescribeExecution { executionArn }
    /// ```
    async fn describe_execution(&mut self, execution_arn: &str) -> Result<ExecutionDetail> {
        let output = self
            .client
            .describe_execution()
            .execution_arn(execution_arn)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("Error while fetching execution input of {}", execution_arn))?;

        Ok(ExecutionDetail {
            input: input_or_empty(execution_arn, output.input()),
            start_date: output.start_date().secs(),
        })
    }
}

/// Executions without an input payload (e.g. redacted ones) are recorded with an empty string.
fn input_or_empty(execution_arn: &str, input: Option<&str>) -> String {
    match input {
        Some(input) => input.to_owned(),
        None => {
            warn!("execution {} has no input payload", execution_arn);
            String::new()
        }
    }
}
