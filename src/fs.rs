//! Filesystem seam for the commands.
//!
//! Commands take a `&dyn FileSystem` so tree loading and config generation
//! can run against the in-memory [`mock::MockFs`] in tests.

use std::io;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write `content` to `path`, replacing any existing file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Process-wide real filesystem for callers without an injected one.
pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::RwLock;

    /// In-memory filesystem. Directories are implied by the files written
    /// under them, plus any added with [`MockFs::with_dir`].
    #[derive(Debug, Default)]
    pub struct MockFs {
        files: RwLock<HashMap<String, String>>,
        dirs: RwLock<BTreeSet<String>>,
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_files<I, P, C>(files: I) -> Self
        where
            I: IntoIterator<Item = (P, C)>,
            P: AsRef<Path>,
            C: Into<String>,
        {
            let fs = Self::new();
            for (path, content) in files {
                fs.files
                    .write()
                    .unwrap()
                    .insert(key(path.as_ref()), content.into());
            }
            fs
        }

        pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
            self.dirs.write().unwrap().insert(key(path.as_ref()));
            self
        }

        pub fn file(&self, path: &Path) -> Option<String> {
            self.files.read().unwrap().get(&key(path)).cloned()
        }
    }

    impl FileSystem for MockFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.file(path).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file not found: {}", path.display()),
                )
            })
        }

        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.files
                .write()
                .unwrap()
                .insert(key(path), content.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.read().unwrap().contains_key(&key(path)) || self.is_dir(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            if self.dirs.read().unwrap().contains(&key(path)) {
                return true;
            }
            self.files
                .read()
                .unwrap()
                .keys()
                .any(|file| Path::new(file).starts_with(path) && Path::new(file) != path)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_fs_read_write() {
            let fs = MockFs::new();
            let path = Path::new("/trees/osint.json");

            assert!(!fs.exists(path));
            assert!(fs.read_to_string(path).is_err());

            fs.write(path, "{}").unwrap();
            assert!(fs.exists(path));
            assert_eq!(fs.read_to_string(path).unwrap(), "{}");
        }

        #[test]
        fn test_mock_fs_implied_dirs() {
            let fs = MockFs::with_files([(Path::new("/trees/osint.json"), "{}")]).with_dir("/empty");

            assert!(fs.is_dir(Path::new("/trees")));
            assert!(!fs.is_dir(Path::new("/trees/osint.json")));
            assert!(fs.is_dir(Path::new("/empty")));
            assert!(!fs.is_dir(Path::new("/missing")));
        }
    }
}
