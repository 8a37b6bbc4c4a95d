use std::fmt;

/// A normalized absolute path in the virtual filesystem.
///
/// The string form always starts and ends with `/` (`/`, `/home/`, `/home/user/`).
/// Normalization collapses repeated slashes, drops `.` segments and resolves
/// `..` segments, clamping at the root. Two paths are equal exactly when their
/// normalized strings are equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VfsPath {
    path: String,
}

impl VfsPath {
    /// The root path `/`.
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
        }
    }

    /// Create a path from a string, treating it as absolute.
    pub fn new(path: &str) -> Self {
        Self {
            path: Self::normalize(path),
        }
    }

    /// Interpret `path` relative to `base`.
    ///
    /// A path starting with `/` ignores `base` entirely.
    pub fn interpret(base: &VfsPath, path: &str) -> Self {
        if path.starts_with('/') {
            Self::new(path)
        } else {
            Self::new(&format!("{}/{}", base.path, path))
        }
    }

    /// Normalize a slash-separated path into its canonical absolute form.
    pub fn normalize(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split('/').filter(|s| !s.is_empty()) {
            match part {
                ".." => {
                    parts.pop();
                }
                "." => {}
                _ => parts.push(part),
            }
        }

        if parts.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", parts.join("/"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// The path without its trailing slash; the root stays `/`.
    pub fn trimmed(&self) -> &str {
        if self.is_root() {
            &self.path
        } else {
            self.path.trim_end_matches('/')
        }
    }

    /// Segments after the leading slash, including the trailing empty string.
    ///
    /// `/a/b/` yields `["a", "b", ""]` and `/` yields `[""]`.
    pub fn parts(&self) -> Vec<&str> {
        self.path[1..].split('/').collect()
    }

    /// Non-empty segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// Name of the last segment, or the empty string for the root.
    pub fn file_name(&self) -> &str {
        self.segments().last().unwrap_or("")
    }

    /// The containing directory. The root is its own parent.
    pub fn parent(&self) -> Self {
        let trimmed = self.path.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) => Self::new(&trimmed[..=idx]),
            None => Self::root(),
        }
    }

    /// All ancestors from the root down to (but excluding) this path.
    pub fn ancestors(&self) -> Vec<VfsPath> {
        let mut ancestors = Vec::new();
        let mut current = Self::root();
        for segment in self.segments() {
            let next = current.get_child(segment);
            ancestors.push(current);
            current = next;
        }
        ancestors
    }

    /// Path of the entry `name` inside this directory.
    ///
    /// `.` yields this path and `..` yields the parent.
    pub fn get_child(&self, name: &str) -> Self {
        match name {
            "." => self.clone(),
            ".." => self.parent(),
            _ => Self::new(&format!("{}{}", self.path, name)),
        }
    }

    /// True if `other` lies strictly below this path.
    pub fn is_ancestor_of(&self, other: &VfsPath) -> bool {
        self != other && other.path.starts_with(&self.path)
    }

    /// Display form with `home` abbreviated as `~` and no trailing slash.
    pub fn to_display(&self, home: &VfsPath) -> String {
        if self == home {
            return "~".to_string();
        }
        if home.is_ancestor_of(self) && !home.is_root() {
            let rest = &self.path[home.path.len()..];
            return format!("~/{}", rest.trim_end_matches('/'));
        }
        self.trimmed().to_string()
    }
}

impl Default for VfsPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.trimmed())
    }
}

impl From<&str> for VfsPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
