use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{DEFAULT_CONFIG_PATH, DEFAULT_FILE_PREFIX, MAX_PAGE_SIZE};

/// Model for the optional JSON configuration file.
///
/// Every field can be overridden on the command line.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ScannerConfig {
    /// Named AWS profile from the shared config/credentials files
    pub profile: Option<String>,
    /// AWS region, falls back to the profile's region
    pub region: Option<String>,
    /// Directory the result files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Maximum number of executions requested per page, 1 to 1000
    #[serde(default = "default_page_size")]
    pub page_size: i32,
    /// Result files are named `<file_prefix><page>.json`
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_page_size() -> i32 {
    MAX_PAGE_SIZE
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_owned()
}

impl ScannerConfig {
    pub fn new() -> Self {
        ScannerConfig {
            profile: None,
            region: None,
            output_dir: default_output_dir(),
            page_size: default_page_size(),
            file_prefix: default_file_prefix(),
        }
    }

    /// Reads a scanner configuration from a JSON file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Unable to read config at path '{}'", path.display()))?;
        let config: Self = serde_json::from_str(data.as_str())
            .with_context(|| format!("Invalid JSON format in '{}'", path.display()))?;
        if !(1..=MAX_PAGE_SIZE).contains(&config.page_size) {
            bail!(
                "page_size {} in '{}' is out of range, allowed are 1 to {}",
                config.page_size,
                path.display(),
                MAX_PAGE_SIZE
            );
        }
        Ok(config)
    }

    /// Loads the config file if there is one.
    ///
    /// A missing file is only tolerated at the default location.
    pub fn load(path: &str) -> Result<Self> {
        if path == DEFAULT_CONFIG_PATH && !Path::new(path).exists() {
            debug!("no config file at '{}', using defaults", path);
            return Ok(ScannerConfig::new());
        }
        ScannerConfig::from_file(path)
    }

    /// Applies values given on the command line on top of the file values.
    pub fn merge(
        mut self,
        profile: Option<String>,
        region: Option<String>,
        output_dir: Option<PathBuf>,
        page_size: Option<i32>,
    ) -> Self {
        if profile.is_some() {
            self.profile = profile;
        }
        if region.is_some() {
            self.region = region;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(size) = page_size {
            self.page_size = size;
        }
        self
    }
}
