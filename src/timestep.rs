use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use glob::Pattern;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filename::timestep_token;
use crate::list_matching;


/// Which timestep the restart should stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum StepRequest {
    /// newest timestep present on disk
    #[default]
    Latest,
    /// a specific timestep, kept as written so zero padding survives
    Exact(String),
}

impl FromStr for StepRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let step: i64 = s.parse().map_err(|_| Error::InvalidStep {
            step: s.to_string(),
        })?;
        if step < 0 {
            Ok(StepRequest::Latest)
        } else {
            Ok(StepRequest::Exact(s.to_string()))
        }
    }
}

impl Display for StepRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepRequest::Latest => write!(f, "latest"),
            StepRequest::Exact(step) => write!(f, "{}", step),
        }
    }
}

/// Picks a timestep that has data files under `root`, or fails if there is none.
pub fn resolve_timestep(root: &Path, base: &str, requested: &StepRequest) -> Result<String> {
    let candidates = list_matching(root, &format!("{}*", Pattern::escape(base)))?;
    let tokens: Vec<&str> = candidates.iter().filter_map(|name| timestep_token(name)).collect();
    debug!(base, n_candidates = tokens.len(), "scanned timestep candidates");

    if tokens.is_empty() {
        return Err(Error::NoFiles {
            base: base.to_string(),
        });
    }

    let timestep = match requested {
        StepRequest::Latest => {
            let mut latest: Option<u64> = None;
            for token in tokens {
                match token.parse::<u64>() {
                    Ok(t) => latest = latest.max(Some(t)),
                    Err(_) => debug!(token, "skipping non-numeric timestep"),
                }
            }
            latest
                .ok_or_else(|| Error::NoNumericTimestep {
                    base: base.to_string(),
                })?
                .to_string()
        }
        StepRequest::Exact(step) => step.clone(),
    };

    let pattern = format!("{}*_{}.*", Pattern::escape(base), Pattern::escape(&timestep));
    if list_matching(root, &pattern)?.is_empty() {
        return Err(Error::NoFieldData { timestep });
    }

    info!(%requested, timestep = %timestep, "resolved timestep");
    Ok(timestep)
}
