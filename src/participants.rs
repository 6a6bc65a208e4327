use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A sweepstake entrant and the country codes they have claimed. The file
/// order of entrants and of codes is kept; codes are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub countries: Vec<String>,
}

pub fn load_participants(path: &Path) -> Result<Vec<Participant>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read participants file {}", path.display()))?;
    let participants = serde_json::from_str(&raw)
        .with_context(|| format!("participants file {} is not valid json", path.display()))?;

    Ok(participants)
}
