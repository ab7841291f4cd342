use std::fmt::Display;
use std::io::Write;

use crate::error::Result;
use crate::partition::StagingPlan;

const USE_RANKDIR: &str = "#PJM --mpi \"use-rankdir\"";


/// A single job-script line understood by the PJM scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PjmDirective {
    /// every rank runs in its own rank directory
    UseRankDir,
    /// copy a file into a rank directory before the job starts
    StageIn { rank: usize, file: String },
}

impl PjmDirective {
    pub fn format(&self) -> String {
        match &self {
            PjmDirective::UseRankDir => USE_RANKDIR.to_string(),
            // the three-space separators are part of the directive format
            PjmDirective::StageIn { rank, file } => {
                format!("#PJM --stagin \"rank =\" {}   {}   %r:./", rank, file)
            }
        }
    }
}

impl Display for PjmDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// all directives for a plan, ranks ascending and files in plan order
pub fn staging_directives(plan: &StagingPlan) -> Vec<PjmDirective> {
    let mut directives = vec![PjmDirective::UseRankDir];
    for (rank, files) in plan.ranks.iter().enumerate() {
        directives.extend(files.iter().map(|file| PjmDirective::StageIn {
            rank,
            file: file.clone(),
        }));
    }
    directives
}

pub fn render_staging_directives(plan: &StagingPlan, out: &mut impl Write) -> Result<()> {
    for directive in staging_directives(plan) {
        writeln!(out, "{}", directive)?;
    }
    Ok(())
}

/// pretty printed plan, for inspecting a partition without a job script
pub fn render_json(plan: &StagingPlan, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, plan).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
