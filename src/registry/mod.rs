// src/registry/mod.rs

//! The program registry: the one piece of shared mutable state.
//!
//! The scheduler reads it through [`Registry::snapshot`]; connection
//! handlers mutate it through [`Registry::append`]. A single mutex guards
//! the list, and every persist happens while that mutex is held, so an
//! append and its snapshot write are observed atomically by concurrent
//! appends and snapshots.

pub mod snapshot;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};

use crate::errors::Result;
use crate::fs::FileSystem;

/// Why a program was refused at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotFound,
    NotExecutable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotFound => f.write_str("not found"),
            Rejection::NotExecutable => f.write_str("no execute permission"),
        }
    }
}

#[derive(Debug)]
pub struct Registry {
    programs: Mutex<Vec<String>>,
    snapshot_path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl Registry {
    /// Load the registry from its snapshot (empty if there is none).
    pub fn open(fs: Arc<dyn FileSystem>, snapshot_path: impl Into<PathBuf>) -> Result<Self> {
        let snapshot_path = snapshot_path.into();
        let programs = snapshot::load(fs.as_ref(), &snapshot_path)?;
        info!(
            path = %snapshot_path.display(),
            count = programs.len(),
            "registry loaded"
        );
        Ok(Self::with_programs(fs, snapshot_path, programs))
    }

    pub fn with_programs(
        fs: Arc<dyn FileSystem>,
        snapshot_path: impl Into<PathBuf>,
        programs: Vec<String>,
    ) -> Self {
        Self {
            programs: Mutex::new(programs),
            snapshot_path: snapshot_path.into(),
            fs,
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Registration precondition: the path exists and is executable.
    pub fn check(&self, program: &str) -> std::result::Result<(), Rejection> {
        let path = Path::new(program);
        if !self.fs.exists(path) {
            return Err(Rejection::NotFound);
        }
        if !self.fs.is_executable(path) {
            return Err(Rejection::NotExecutable);
        }
        Ok(())
    }

    /// Append `program` if it passes [`Registry::check`], then persist.
    ///
    /// A failed persist is logged and does not undo the append.
    pub fn append(&self, program: &str) -> std::result::Result<(), Rejection> {
        if let Err(reason) = self.check(program) {
            warn!(program = %program, %reason, "registration rejected");
            return Err(reason);
        }

        let mut programs = self.lock();
        programs.push(program.to_string());
        info!(program = %program, count = programs.len(), "program registered");
        self.persist(&programs);
        Ok(())
    }

    /// Append launch-time programs without the executability check and
    /// persist once.
    pub fn seed<I>(&self, programs: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut current = self.lock();
        let before = current.len();
        current.extend(programs);
        if current.len() > before {
            info!(added = current.len() - before, "registry seeded from command line");
            self.persist(&current);
        }
    }

    /// Point-in-time copy for iteration outside the lock.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Persist the current list; returns whether the write succeeded.
    pub fn save(&self) -> bool {
        let programs = self.lock();
        self.persist(&programs)
    }

    fn persist(&self, programs: &[String]) -> bool {
        match snapshot::save(self.fs.as_ref(), &self.snapshot_path, programs) {
            Ok(()) => true,
            Err(e) => {
                let detail = format!("{e:#}");
                error!(
                    path = %self.snapshot_path.display(),
                    error = %detail,
                    "failed to persist registry; in-memory state kept"
                );
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.programs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn registry(fs: &MockFileSystem) -> Registry {
        Registry::with_programs(Arc::new(fs.clone()), "programs.json", Vec::new())
    }

    #[test]
    fn duplicates_are_appended_and_persisted_each_time() {
        let fs = MockFileSystem::new();
        fs.add_executable("/bin/job");
        let reg = registry(&fs);

        assert_eq!(reg.append("/bin/job"), Ok(()));
        assert_eq!(reg.append("/bin/job"), Ok(()));

        assert_eq!(reg.snapshot(), vec!["/bin/job", "/bin/job"]);
        assert_eq!(fs.write_count(), 2);
        let on_disk = snapshot::load(&fs, Path::new("programs.json")).unwrap();
        assert_eq!(on_disk, reg.snapshot());
    }

    #[test]
    fn rejections_leave_registry_untouched() {
        let fs = MockFileSystem::new();
        fs.add_file("/srv/notes.txt", "hello");
        let reg = registry(&fs);

        assert_eq!(reg.append("/no/such/file"), Err(Rejection::NotFound));
        assert_eq!(reg.append("/srv/notes.txt"), Err(Rejection::NotExecutable));

        assert!(reg.is_empty());
        assert_eq!(fs.write_count(), 0);
    }

    #[test]
    fn failed_persist_keeps_memory_authoritative_and_retries_next_time() {
        let fs = MockFileSystem::new();
        fs.add_executable("/bin/a");
        fs.add_executable("/bin/b");
        let reg = registry(&fs);

        fs.set_fail_writes(true);
        assert_eq!(reg.append("/bin/a"), Ok(()));
        assert_eq!(reg.snapshot(), vec!["/bin/a"]);
        assert!(fs.contents("programs.json").is_none());

        fs.set_fail_writes(false);
        assert_eq!(reg.append("/bin/b"), Ok(()));
        let on_disk = snapshot::load(&fs, Path::new("programs.json")).unwrap();
        assert_eq!(on_disk, vec!["/bin/a", "/bin/b"]);
    }

    #[test]
    fn seed_skips_check_and_persists_once() {
        let fs = MockFileSystem::new();
        let reg = registry(&fs);

        reg.seed(vec!["a.sh".to_string(), "b.sh".to_string()]);
        reg.seed(Vec::new());

        assert_eq!(reg.snapshot(), vec!["a.sh", "b.sh"]);
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        let fs = MockFileSystem::new();
        let names: Vec<String> = (0..32).map(|i| format!("/bin/p{i}")).collect();
        for name in &names {
            fs.add_executable(name);
        }
        let reg = Arc::new(registry(&fs));

        let handles: Vec<_> = names
            .iter()
            .cloned()
            .map(|name| {
                let reg = Arc::clone(&reg);
                thread::spawn(move || reg.append(&name))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Ok(()));
        }

        let mut got = reg.snapshot();
        got.sort();
        let mut want = names.clone();
        want.sort();
        assert_eq!(got, want);

        let mut on_disk = snapshot::load(&fs, Path::new("programs.json")).unwrap();
        on_disk.sort();
        assert_eq!(on_disk, want);
    }
}
