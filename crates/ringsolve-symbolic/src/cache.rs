//! Memoized symbolic solutions, keyed by a hash of the topology definition.
//!
//! Solving is done once per distinct definition per process. With a
//! directory configured, solutions are also read from and written to
//! `{name}-{hash}.json` files; a file whose stored definition differs from
//! the topology's is ignored. Disk problems never fail a solve.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::solve::{solve, SymbolicSolution};
use crate::topology::Topology;

#[derive(Serialize, Deserialize)]
struct CacheFile {
    definition: String,
    solution: SymbolicSolution,
}

#[derive(Debug, Default)]
pub struct SolutionCache {
    memory: Mutex<HashMap<u64, Arc<SymbolicSolution>>>,
    directory: Option<PathBuf>,
}

impl SolutionCache {
    /// Cache that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Cache backed by JSON files under `directory`.
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            memory: Mutex::default(),
            directory: Some(directory.into()),
        }
    }

    /// Process-wide in-memory cache.
    pub fn global() -> &'static SolutionCache {
        static GLOBAL: OnceLock<SolutionCache> = OnceLock::new();
        GLOBAL.get_or_init(SolutionCache::in_memory)
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Cache key of a canonical definition.
    pub fn key(definition: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        definition.hash(&mut hasher);
        hasher.finish()
    }

    /// Number of solutions held in memory.
    pub fn len(&self) -> Result<usize> {
        Ok(self.memory.lock().map_err(|_| Error::CachePoisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Drop the in-memory entries. Files on disk are kept.
    pub fn clear(&self) -> Result<()> {
        self.memory.lock().map_err(|_| Error::CachePoisoned)?.clear();
        Ok(())
    }

    /// The solution for `topology`, solving it on a miss.
    pub fn get_or_solve<T: Topology + ?Sized>(&self, topology: &T) -> Result<Arc<SymbolicSolution>> {
        let definition = topology.definition();
        let key = Self::key(&definition);

        if let Some(hit) = self.lookup(key)? {
            log::debug!("solution cache hit for {} ({key:016x})", topology.name());
            return Ok(hit);
        }

        let path = self.file_path(topology.name(), key);
        let from_disk = path.as_deref().and_then(|p| load(p, &definition));
        let solution = match from_disk {
            Some(solution) => {
                log::debug!("loaded {} solution from disk", topology.name());
                solution
            }
            None => {
                log::info!(
                    "solving {} symbolically ({} pins)",
                    topology.name(),
                    topology.num_pins()
                );
                let solution = solve(&topology.linear_system()?)?;
                if let Some(p) = path.as_deref() {
                    store(p, &definition, &solution);
                }
                solution
            }
        };

        let mut memory = self.memory.lock().map_err(|_| Error::CachePoisoned)?;
        Ok(Arc::clone(
            memory.entry(key).or_insert_with(|| Arc::new(solution)),
        ))
    }

    fn lookup(&self, key: u64) -> Result<Option<Arc<SymbolicSolution>>> {
        let memory = self.memory.lock().map_err(|_| Error::CachePoisoned)?;
        Ok(memory.get(&key).cloned())
    }

    fn file_path(&self, name: &str, key: u64) -> Option<PathBuf> {
        self.directory
            .as_ref()
            .map(|dir| dir.join(format!("{name}-{key:016x}.json")))
    }
}

fn read_file(path: &Path) -> Result<CacheFile> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_file(path: &Path, file: &CacheFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string(file)?)?;
    Ok(())
}

fn load(path: &Path, definition: &str) -> Option<SymbolicSolution> {
    match read_file(path) {
        Ok(file) if file.definition == definition => Some(file.solution),
        Ok(_) => {
            log::warn!("ignoring {}: stored definition differs", path.display());
            None
        }
        Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            log::warn!("ignoring unreadable cache file {}: {e}", path.display());
            None
        }
    }
}

fn store(path: &Path, definition: &str, solution: &SymbolicSolution) {
    let file = CacheFile {
        definition: definition.to_string(),
        solution: solution.clone(),
    };
    if let Err(e) = write_file(path, &file) {
        log::warn!("could not write cache file {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Ring;

    #[test]
    fn test_memory_hit_returns_same_solution() {
        let cache = SolutionCache::in_memory();
        assert!(cache.is_empty().unwrap());
        let a = cache.get_or_solve(&Ring).unwrap();
        let b = cache.get_or_solve(&Ring).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len().unwrap(), 1);
        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_key_is_content_based() {
        let def = Ring.definition();
        assert_eq!(SolutionCache::key(&def), SolutionCache::key(&Ring.definition()));
        assert_ne!(SolutionCache::key(&def), SolutionCache::key(&format!("{def} ")));
    }
}
