//! Persistent settings and inventory loading.

use anyhow::{Context, Result};
use chem_infer_core::{inventory, KnowledgeBase, Reaction, SolverConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `config.json`. Command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub solver: SolverConfig,
    /// Reaction file replacing the built-in inventory
    pub inventory: Option<PathBuf>,
    /// Most solutions printed in text mode
    pub max_display: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            inventory: None,
            max_display: 500,
        }
    }
}

impl Settings {
    /// Default location of the settings file
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chem-infer")
            .join("config.json")
    }

    /// Load settings from `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading settings {}", path.display()))
            }
        };
        serde_json::from_str(&json).with_context(|| format!("parsing settings {}", path.display()))
    }
}

/// Reactions the knowledge base is built from: a user file if given,
/// otherwise the curated list, optionally extended with generated exchanges.
pub fn load_reactions(file: Option<&Path>, generated: bool) -> Result<Vec<Reaction>> {
    if let Some(path) = file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading inventory {}", path.display()))?;
        let reactions = inventory::parse_lines(text.lines())
            .with_context(|| format!("parsing inventory {}", path.display()))?;
        tracing::debug!(path = %path.display(), count = reactions.len(), "loaded user inventory");
        return Ok(reactions);
    }

    let reactions = if generated {
        inventory::standard()?
    } else {
        inventory::curated()?
    };
    Ok(reactions)
}

pub fn load_knowledge(file: Option<&Path>, generated: bool) -> Result<KnowledgeBase> {
    Ok(KnowledgeBase::build(&load_reactions(file, generated)?))
}
