//! Slash-normalized paths and home directory expansion

use std::fmt;
use std::path::{Path, PathBuf};

/// A path that always uses `/` as separator.
///
/// Storage and target files are addressed through this type so log lines and
/// error messages read the same on Windows and Unix. Turn it back into a
/// native path with [`NormalizedPath::to_native`] right before touching the
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(slashes(&path.as_ref().to_string_lossy()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Append `segment`, which may itself contain separators.
    pub fn join(&self, segment: &str) -> Self {
        let segment = slashes(segment);
        if self.0.ends_with('/') {
            Self(format!("{}{segment}", self.0))
        } else {
            Self(format!("{}/{segment}", self.0))
        }
    }

    /// Containing directory; `None` for a bare name.
    pub fn parent(&self) -> Option<Self> {
        let (dir, _) = self.trimmed().rsplit_once('/')?;
        Some(Self(if dir.is_empty() { "/".into() } else { dir.into() }))
    }

    pub fn file_name(&self) -> Option<&str> {
        let name = self.trimmed().rsplit('/').next()?;
        (!name.is_empty()).then_some(name)
    }

    /// Extension without the dot. Dot files like `.hidden` have none.
    pub fn extension(&self) -> Option<&str> {
        match self.file_name()?.rsplit_once('.')? {
            ("", _) => None,
            (_, ext) => Some(ext),
        }
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    fn trimmed(&self) -> &str {
        self.0.trim_end_matches('/')
    }
}

fn slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Expand a leading `~` to the current user's home directory.
///
/// `~user` forms and paths without the prefix come back unchanged, as does
/// everything when no home directory is known.
pub fn expand_home(path: &str) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };
    if !(rest.is_empty() || rest.starts_with(['/', '\\'])) {
        return PathBuf::from(path);
    }

    dirs::home_dir()
        .map(|home| home.join(rest.trim_start_matches(['/', '\\'])))
        .unwrap_or_else(|| PathBuf::from(path))
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}
