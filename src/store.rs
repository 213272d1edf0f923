//! Q-table persistence.
//!
//! Tables are written as a flat list of `(state, action, value)` records,
//! bincode-encoded, to `<dir>/trained_<epochs>.bin`. A JSON dump of the same
//! records can be written next to it for inspection.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::QAgent;
use crate::error::StoreError;
use crate::game::State;
use crate::pos::Dir;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QEntry {
    pub state: State,
    pub action: Dir,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTableFile {
    pub version: u32,
    /// Training episodes that produced the table
    pub epochs: u64,
    pub entries: Vec<QEntry>,
}

impl QTableFile {
    pub fn from_agent(agent: &QAgent, epochs: u64) -> Self {
        let entries = agent
            .entries()
            .into_iter()
            .map(|(state, action, value)| QEntry { state, action, value })
            .collect();
        Self { version: FORMAT_VERSION, epochs, entries }
    }

    pub fn into_agent(self, agent: &mut QAgent) {
        agent.load_entries(self.entries.into_iter().map(|e| (e.state, e.action, e.value)));
    }
}

pub fn model_path(dir: &Path, epochs: u64) -> PathBuf {
    dir.join(format!("trained_{epochs}.bin"))
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io { path: path.to_path_buf(), source }
}

pub fn save(agent: &QAgent, dir: &Path, epochs: u64) -> Result<PathBuf, StoreError> {
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    let path = model_path(dir, epochs);
    let file = QTableFile::from_agent(agent, epochs);
    let bytes = bincode::serde::encode_to_vec(&file, bincode::config::standard())?;
    std::fs::write(&path, bytes).map_err(|e| io_err(&path, e))?;
    info!(path = %path.display(), entries = file.entries.len(), "saved q-table");
    Ok(path)
}

/// Reads a table file. A missing file is `StoreError::Missing`, never an
/// empty table.
pub fn load(path: &Path) -> Result<QTableFile, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::Missing(path.to_path_buf())),
        Err(e) => return Err(io_err(path, e)),
    };
    let (file, _): (QTableFile, usize) = bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
    if file.version != FORMAT_VERSION {
        return Err(StoreError::Version { found: file.version, expected: FORMAT_VERSION });
    }
    debug!(path = %path.display(), entries = file.entries.len(), "loaded q-table");
    Ok(file)
}

/// Replaces the agent's table with the one trained for `epochs`.
pub fn load_into(agent: &mut QAgent, dir: &Path, epochs: u64) -> Result<usize, StoreError> {
    let file = load(&model_path(dir, epochs))?;
    let n = file.entries.len();
    file.into_agent(agent);
    Ok(n)
}

pub fn export_json(agent: &QAgent, path: &Path, epochs: u64) -> Result<(), StoreError> {
    let file = QTableFile::from_agent(agent, epochs);
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, json).map_err(|e| io_err(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use tempfile::TempDir;

    fn trained_agent() -> QAgent {
        let mut agent = QAgent::with_seed(&AgentConfig::default(), 2);
        let s = State([0, 1, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0]);
        agent.update(&s, Dir::Up, &State::default(), 1.0);
        agent.update(&s, Dir::Left, &State::default(), -10.0);
        agent
    }

    #[test]
    fn test_model_path_uses_epoch_count() {
        assert_eq!(model_path(Path::new("models"), 300), PathBuf::from("models/trained_300.bin"));
    }

    #[test]
    fn test_save_then_load_restores_values() {
        let dir = TempDir::new().unwrap();
        let agent = trained_agent();
        let path = save(&agent, dir.path(), 300).unwrap();
        assert!(path.exists());

        let mut restored = QAgent::with_seed(&AgentConfig::default(), 9);
        let n = load_into(&mut restored, dir.path(), 300).unwrap();
        assert_eq!(n, 2);
        assert_eq!(restored.entries(), agent.entries());
    }

    #[test]
    fn test_missing_file_is_distinct_from_empty_table() {
        let dir = TempDir::new().unwrap();
        let mut agent = QAgent::with_seed(&AgentConfig::default(), 9);
        let err = load_into(&mut agent, dir.path(), 5).unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));

        let empty = QAgent::with_seed(&AgentConfig::default(), 9);
        save(&empty, dir.path(), 5).unwrap();
        assert_eq!(load_into(&mut agent, dir.path(), 5).unwrap(), 0);
    }

    #[test]
    fn test_load_replaces_existing_entries() {
        let dir = TempDir::new().unwrap();
        save(&QAgent::with_seed(&AgentConfig::default(), 1), dir.path(), 1).unwrap();
        let mut agent = trained_agent();
        load_into(&mut agent, dir.path(), 1).unwrap();
        assert!(agent.is_empty());
    }

    #[test]
    fn test_garbage_file_fails_to_decode() {
        let dir = TempDir::new().unwrap();
        std::fs::write(model_path(dir.path(), 7), [0xffu8; 3]).unwrap();
        assert!(load(&model_path(dir.path(), 7)).is_err());
    }

    #[test]
    fn test_json_export_lists_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.json");
        export_json(&trained_agent(), &path, 10).unwrap();
        let file: QTableFile = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(file.epochs, 10);
        assert_eq!(file.entries.len(), 2);
        assert!(file.entries.iter().any(|e| e.action == Dir::Left && e.value == -5.0));
    }
}
