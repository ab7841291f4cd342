use std::ops::Range;
use std::path::Path;

use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filename::extract_region_index;
use crate::list_matching;


/// Files each rank must receive before the restart, indexed by rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingPlan {
    pub base_filename: String,
    pub timestep: String,
    pub region_count: usize,
    pub ranks: Vec<Vec<String>>,
}

impl StagingPlan {
    pub fn n_ranks(&self) -> usize {
        self.ranks.len()
    }

    pub fn files(&self, rank: usize) -> &[String] {
        &self.ranks[rank]
    }

    pub fn n_files(&self) -> usize {
        self.ranks.iter().map(|files| files.len()).sum()
    }
}

/// first region index owned by `rank`. For `rank == nproc` this is `region_count`.
/// The `region_count % nproc` leftover regions go one each to the lowest ranks.
pub fn rank_start(region_count: usize, nproc: usize, rank: usize) -> usize {
    assert!(nproc > 0, "process count must be positive");
    assert!(rank <= nproc, "rank {} out of bounds for {} processes", rank, nproc);
    let base = region_count / nproc * rank;
    let remainder = region_count % nproc;
    let extra = if remainder > rank { rank } else { remainder };
    base + extra
}

/// contiguous region ranges for every rank, in rank order
pub fn rank_ranges(region_count: usize, nproc: usize) -> Vec<Range<usize>> {
    let starts: Vec<_> = (0..=nproc)
        .map(|rank| rank_start(region_count, nproc, rank))
        .collect();
    starts.windows(2).map(|w| w[0]..w[1]).collect()
}

/// Assigns the region files of `timestep` under `root` to `nproc` ranks.
///
/// Region indices are assumed dense from zero, so the region count is one past the
/// largest index found. A region with no files simply adds nothing to its rank.
pub fn determine_partition(
    root: &Path,
    nproc: usize,
    base: &str,
    timestep: &str,
) -> Result<StagingPlan> {
    if nproc == 0 {
        return Err(Error::InvalidProcessCount);
    }

    let base_pat = Pattern::escape(base);
    let step_pat = Pattern::escape(timestep);

    let files_to_use = list_matching(root, &format!("{}*_{}.*", base_pat, step_pat))?;
    let mut max_region = 0;
    for f in &files_to_use {
        max_region = max_region.max(extract_region_index(f)?);
    }
    let region_count = max_region + 1;
    debug!(n_files = files_to_use.len(), region_count, "counted regions");

    let mut ranks = Vec::with_capacity(nproc);
    for (rank, regions) in rank_ranges(region_count, nproc).into_iter().enumerate() {
        let mut files = vec![];
        for region in regions.clone() {
            files.extend(list_matching(
                root,
                &format!("{}*_{}_{}.*", base_pat, region, step_pat),
            )?);
        }
        debug!(rank, ?regions, n_files = files.len(), "assigned regions");
        ranks.push(files);
    }

    info!(nproc, region_count, timestep, "partitioned restart files");

    Ok(StagingPlan {
        base_filename: base.to_string(),
        timestep: timestep.to_string(),
        region_count,
        ranks,
    })
}
