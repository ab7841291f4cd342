//! Stages particle restart files onto the ranks of a PJM job.
//!
//! Region files named `<base>_<region>_<timestep>.<ext>` are split into
//! contiguous, balanced region ranges per rank, and each rank's files are
//! emitted as `#PJM --stagin` directives.

pub mod config;
pub mod dfi;
pub mod error;
pub mod filename;
pub mod partition;
pub mod staging;
pub mod timestep;

use std::io::Write;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, info};

pub use config::{OutputFormat, StageConfig};
pub use dfi::{base_filename, DfiFile, MetadataSource};
pub use error::{Error, Result};
pub use partition::{determine_partition, rank_ranges, rank_start, StagingPlan};
pub use staging::{render_json, render_staging_directives, PjmDirective};
pub use timestep::{resolve_timestep, StepRequest};


/// names under `root` matching `pattern`, relative to `root` and sorted
pub(crate) fn list_matching(root: &Path, pattern: &str) -> Result<Vec<String>> {
    let full = PathBuf::from(Pattern::escape(&root.to_string_lossy())).join(pattern);
    let mut names = vec![];
    for entry in glob::glob(&full.to_string_lossy())? {
        let path = entry.map_err(glob::GlobError::into_error)?;
        let name = path.strip_prefix(root).unwrap_or(&path);
        names.push(name.to_string_lossy().into_owned());
    }
    debug!(pattern = %full.display(), n_matches = names.len(), "glob");
    Ok(names)
}

/// Resolves the timestep and partitions its files over `nproc` ranks.
pub fn plan_staging(
    root: &Path,
    nproc: usize,
    metadata: &dyn MetadataSource,
    step: &StepRequest,
) -> Result<StagingPlan> {
    if nproc == 0 {
        return Err(Error::InvalidProcessCount);
    }
    let base = base_filename(metadata)?;
    let timestep = resolve_timestep(root, &base, step)?;
    determine_partition(root, nproc, &base, &timestep)
}

/// Full staging run: read the dfi file, plan, and write the rendered plan to `out`.
/// Nothing is written unless every step succeeds.
pub fn run(config: &StageConfig, out: &mut impl Write) -> Result<()> {
    debug!(?config, "staging run");

    let dfi = DfiFile::open(config.dfi_path())?;
    let plan = plan_staging(&config.input_dir, config.nproc, &dfi, &config.step)?;

    for (rank, files) in plan.ranks.iter().enumerate() {
        info!(rank, n_files = files.len(), "rank staging");
    }

    let mut buf = vec![];
    match config.format {
        OutputFormat::Pjm => render_staging_directives(&plan, &mut buf)?,
        OutputFormat::Json => render_json(&plan, &mut buf)?,
    }
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}
