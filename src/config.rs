use std::path::PathBuf;

use serde::Serialize;

use crate::timestep::StepRequest;

/// How the staging plan is written to stdout.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PJM job-script staging directives
    #[default]
    Pjm,
    /// the plan as JSON
    Json,
}

/// Everything one staging run needs.
#[derive(Clone, Debug, Serialize)]
pub struct StageConfig {
    /// directory holding the dfi file and the region files
    pub input_dir: PathBuf,
    pub step: StepRequest,
    pub nproc: usize,
    /// dfi file, relative to `input_dir` unless absolute
    pub dfi_file: PathBuf,
    pub format: OutputFormat,
}

impl StageConfig {
    pub fn new(nproc: usize, dfi_file: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: PathBuf::from("./"),
            step: StepRequest::Latest,
            nproc,
            dfi_file: dfi_file.into(),
            format: OutputFormat::Pjm,
        }
    }

    pub fn dfi_path(&self) -> PathBuf {
        self.input_dir.join(&self.dfi_file)
    }
}
