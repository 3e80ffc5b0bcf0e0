//! Persistence of weights and performance history
//!
//! The weight file holds one number per line, exactly one line per feature and
//! no header. The history file holds `episodes,average` rows, one per completed
//! testing block.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::planners::rl::{NUM_FEATURES, PerformanceHistory, Weights};

#[derive(Debug)]
pub enum StoreError {
    Missing { path: PathBuf },
    Malformed { path: PathBuf, reason: String },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Missing { path } => {
                write!(formatter, "{} does not exist", path.display())
            }
            StoreError::Malformed { path, reason } => {
                write!(formatter, "{} is malformed: {}", path.display(), reason)
            }
            StoreError::Io { path, source } => {
                write!(formatter, "I/O error on {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Durable storage for the agent's weights and test-phase history.
pub trait AgentStore {
    fn load_weights(&self) -> Result<Weights, StoreError>;

    fn save_weights(&self, weights: &Weights) -> Result<(), StoreError>;

    fn save_history(&self, history: &PerformanceHistory) -> Result<(), StoreError>;
}

pub fn format_weights(weights: &Weights) -> String {
    weights
        .values()
        .iter()
        .map(|w| format!("{:.6}\n", w))
        .collect()
}

pub fn parse_weights(text: &str, path: &Path) -> Result<Weights, StoreError> {
    let malformed = |reason: String| StoreError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() != NUM_FEATURES {
        return Err(malformed(format!(
            "expected {} weights, found {}",
            NUM_FEATURES,
            lines.len()
        )));
    }

    let mut values = [0.0; NUM_FEATURES];
    for (i, line) in lines.iter().enumerate() {
        values[i] = line
            .parse::<f64>()
            .map_err(|e| malformed(format!("line {}: {}", i + 1, e)))?;
    }
    Ok(Weights(values))
}

pub fn format_history(history: &PerformanceHistory) -> String {
    history
        .records()
        .iter()
        .map(|r| format!("{},{:.2}\n", r.episodes_played, r.average_reward))
        .collect()
}

/// File-backed store, creating parent directories on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    weights_path: PathBuf,
    history_path: PathBuf,
}

impl FileStore {
    pub fn new(weights_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        Self {
            weights_path: weights_path.into(),
            history_path: history_path.into(),
        }
    }

    fn write(path: &Path, contents: &str) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl AgentStore for FileStore {
    fn load_weights(&self) -> Result<Weights, StoreError> {
        if !self.weights_path.exists() {
            return Err(StoreError::Missing {
                path: self.weights_path.clone(),
            });
        }
        let text = fs::read_to_string(&self.weights_path).map_err(|source| StoreError::Io {
            path: self.weights_path.clone(),
            source,
        })?;
        parse_weights(&text, &self.weights_path)
    }

    fn save_weights(&self, weights: &Weights) -> Result<(), StoreError> {
        Self::write(&self.weights_path, &format_weights(weights))
    }

    fn save_history(&self, history: &PerformanceHistory) -> Result<(), StoreError> {
        Self::write(&self.history_path, &format_history(history))
    }
}

#[derive(Debug, Default)]
struct MemoryContents {
    weights: Option<String>,
    history: Option<String>,
    saves: usize,
}

/// In-memory store for headless runs. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Arc<Mutex<MemoryContents>>,
}

const MEMORY_WEIGHTS: &str = "memory://weights";

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with serialized weights.
    pub fn with_weights(weights: &Weights) -> Self {
        let store = Self::new();
        store.lock().weights = Some(format_weights(weights));
        store
    }

    /// Store pre-seeded with raw weight-file text.
    pub fn with_raw_weights(text: &str) -> Self {
        let store = Self::new();
        store.lock().weights = Some(text.to_string());
        store
    }

    pub fn weights_text(&self) -> Option<String> {
        self.lock().weights.clone()
    }

    pub fn history_text(&self) -> Option<String> {
        self.lock().history.clone()
    }

    /// Number of weight saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryContents> {
        self.contents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AgentStore for MemoryStore {
    fn load_weights(&self) -> Result<Weights, StoreError> {
        let path = Path::new(MEMORY_WEIGHTS);
        match self.lock().weights.as_deref() {
            Some(text) => parse_weights(text, path),
            None => Err(StoreError::Missing {
                path: path.to_path_buf(),
            }),
        }
    }

    fn save_weights(&self, weights: &Weights) -> Result<(), StoreError> {
        let mut contents = self.lock();
        contents.weights = Some(format_weights(weights));
        contents.saves += 1;
        Ok(())
    }

    fn save_history(&self, history: &PerformanceHistory) -> Result<(), StoreError> {
        self.lock().history = Some(format_history(history));
        Ok(())
    }
}
