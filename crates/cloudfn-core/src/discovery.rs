//! Project directory discovery

use crate::error::{FunctionError, Result};
use crate::manifest::{DEFAULT_SOURCE, MANIFEST_FILE};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const PROJECT_DIR_ENV: &str = "CLOUDFN_PROJECT_DIR";

/// Locate the functions project directory
///
/// Search order:
/// 1. `CLOUDFN_PROJECT_DIR`
/// 2. the current directory and its ancestors, looking for
///    `functions.kdl` or `main.py`
#[tracing::instrument]
pub fn find_project_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var(PROJECT_DIR_ENV) {
        let path = PathBuf::from(&root);
        debug!(env_root = %root, "Checking CLOUDFN_PROJECT_DIR");
        if is_project_dir(&path) {
            info!(project_root = %path.display(), "Found project directory from environment variable");
            return Ok(path);
        }
        warn!(env_root = %root, "CLOUDFN_PROJECT_DIR does not contain functions.kdl or main.py");
    }

    find_project_root_from(std::env::current_dir()?)
}

/// Walk up from `start` until a project directory is found
pub fn find_project_root_from(start: impl AsRef<Path>) -> Result<PathBuf> {
    let start_dir = start.as_ref().to_path_buf();
    let mut current = start_dir.clone();
    debug!(start_dir = %start_dir.display(), "Searching for project directory");

    loop {
        if is_project_dir(&current) {
            info!(project_root = %current.display(), "Found project directory");
            return Ok(current);
        }

        if !current.pop() {
            break;
        }
    }

    warn!(start_dir = %start_dir.display(), "Project directory not found");
    Err(FunctionError::ProjectRootNotFound(start_dir))
}

fn is_project_dir(path: &Path) -> bool {
    path.join(MANIFEST_FILE).is_file() || path.join(DEFAULT_SOURCE).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_find_in_start_dir() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("main.py"), "").unwrap();

        let root = find_project_root_from(temp.path()).unwrap();
        assert_eq!(root, temp.path());
    }

    #[test]
    fn test_find_in_ancestor() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("functions.kdl"), "").unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root_from(&nested).unwrap();
        assert_eq!(root, temp.path());
    }

    #[test]
    fn test_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("empty");
        fs::create_dir_all(&nested).unwrap();

        // Ancestors of a temp dir are not expected to hold a main.py
        if let Err(e) = find_project_root_from(&nested) {
            assert!(matches!(e, FunctionError::ProjectRootNotFound(_)));
        }
    }

    #[test]
    #[serial]
    fn test_env_var_takes_priority() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("main.py"), "").unwrap();

        unsafe {
            std::env::set_var(PROJECT_DIR_ENV, temp.path());
        }

        let root = find_project_root().unwrap();
        assert_eq!(root, temp.path());

        unsafe {
            std::env::remove_var(PROJECT_DIR_ENV);
        }
    }
}
