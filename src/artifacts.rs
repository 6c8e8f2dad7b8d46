//! Text artifact lookup for diffing

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Source of named text artifacts
pub trait ArtifactSource: Send + Sync {
    /// Full text of `name`, or `None` when it is unavailable
    fn fetch(&self, name: &str) -> Option<String>;
}

/// Artifacts stored as files under a root directory
#[derive(Debug, Clone)]
pub struct FsArtifacts {
    root: PathBuf,
}

impl FsArtifacts {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` under the root; rejects absolute paths and `..`
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || !contained {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ArtifactSource for FsArtifacts {
    fn fetch(&self, name: &str) -> Option<String> {
        let Some(path) = self.resolve(name) else {
            tracing::warn!(name, "rejecting artifact name outside the artifact root");
            return None;
        };

        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "artifact unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_existing_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("app")).unwrap();
        fs::write(temp_dir.path().join("app/main.py"), "print('hi')\n").unwrap();

        let artifacts = FsArtifacts::new(temp_dir.path());
        assert_eq!(artifacts.fetch("app/main.py").as_deref(), Some("print('hi')\n"));
        assert_eq!(artifacts.fetch("./app/main.py").as_deref(), Some("print('hi')\n"));
        assert!(artifacts.fetch("app/absent.py").is_none());
    }

    #[test]
    fn test_rejects_escaping_names() {
        let artifacts = FsArtifacts::new("/srv/artifacts");
        assert!(artifacts.resolve("../etc/passwd").is_none());
        assert!(artifacts.resolve("app/../../secret").is_none());
        assert!(artifacts.resolve("/etc/passwd").is_none());
        assert!(artifacts.resolve("").is_none());
        assert_eq!(
            artifacts.resolve("patches/fixed.py"),
            Some(PathBuf::from("/srv/artifacts/patches/fixed.py"))
        );
    }
}
