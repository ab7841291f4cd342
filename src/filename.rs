use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};


/// matches `<anything>_<region>_<timestep>.<ext>` where the extension holds no underscore
fn region_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:.*_)?(?P<region>[0-9]+)_(?P<timestep>[0-9]+)\.[^_]*$")
            .expect("region file pattern is valid")
    })
}

/// The two numeric fields encoded in a region data filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionFile {
    pub region: usize,
    pub timestep: u64,
}

impl RegionFile {
    pub fn parse(filename: &str) -> Result<Self> {
        let caps = region_file_regex()
            .captures(filename)
            .ok_or_else(|| Error::format(filename))?;
        let region = caps["region"]
            .parse()
            .map_err(|_| Error::format(filename))?;
        let timestep = caps["timestep"]
            .parse()
            .map_err(|_| Error::format(filename))?;
        Ok(Self { region, timestep })
    }
}

pub fn extract_timestep(filename: &str) -> Result<u64> {
    RegionFile::parse(filename).map(|f| f.timestep)
}

pub fn extract_region_index(filename: &str) -> Result<usize> {
    RegionFile::parse(filename).map(|f| f.region)
}

/// raw timestep text of a candidate file: after the last `_`, before the last `.`.
/// Returns None when the name holds no `_` or no `.` at all.
pub fn timestep_token(filename: &str) -> Option<&str> {
    if !filename.contains('.') {
        return None;
    }
    let (_, tail) = filename.rsplit_once('_')?;
    Some(tail.rsplit_once('.').map_or(tail, |(token, _)| token))
}
