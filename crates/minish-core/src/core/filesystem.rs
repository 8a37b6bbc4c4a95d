use tracing::debug;

use crate::core::error::FsError;
use crate::models::{Directory, Node, VfsPath};

/// In-memory filesystem rooted at a single owned [`Directory`].
///
/// # Path Convention
///
/// Every operation takes a normalized [`VfsPath`]; resolving user input
/// against the working directory is the caller's job.
///
/// Failures are returned as [`FsError`]. Nothing here applies policy (such as
/// refusing to delete `/`); that belongs to the commands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VirtualFs {
    root: Node,
}

impl VirtualFs {
    /// Create a filesystem with an empty root directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: Directory) -> Self {
        Self {
            root: Node::Directory(root),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Look up a node.
    ///
    /// Returns `None` when any segment is missing or an intermediate segment
    /// is a file.
    pub fn get(&self, path: &VfsPath) -> Option<&Node> {
        let mut current = &self.root;
        for part in path.parts().into_iter().filter(|p| !p.is_empty()) {
            current = current.as_directory()?.get(part)?;
        }
        Some(current)
    }

    pub fn get_mut(&mut self, path: &VfsPath) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for part in path.parts().into_iter().filter(|p| !p.is_empty()) {
            current = current.as_directory_mut()?.get_mut(part)?;
        }
        Some(current)
    }

    pub fn has(&self, path: &VfsPath) -> bool {
        self.get(path).is_some()
    }

    pub fn is_directory(&self, path: &VfsPath) -> bool {
        matches!(self.get(path), Some(Node::Directory(_)))
    }

    pub fn is_file(&self, path: &VfsPath) -> bool {
        matches!(self.get(path), Some(Node::File(_)))
    }

    /// Child names of a directory, sorted.
    pub fn list(&self, path: &VfsPath) -> Result<Vec<String>, FsError> {
        match self.get(path) {
            Some(Node::Directory(dir)) => Ok(dir.names().map(str::to_string).collect()),
            Some(Node::File(_)) => Err(FsError::NotADirectory(path.clone())),
            None => Err(FsError::NotFound(path.clone())),
        }
    }

    /// Attach `node` at `path`.
    ///
    /// With `create_parents`, missing ancestors are created as directories.
    /// Nothing is modified when the call fails.
    pub fn add(&mut self, path: &VfsPath, node: Node, create_parents: bool) -> Result<(), FsError> {
        if self.has(path) {
            return Err(FsError::AlreadyExists(path.clone()));
        }

        let parent = path.parent();
        if create_parents {
            for ancestor in path.ancestors() {
                if self.is_file(&ancestor) {
                    return Err(FsError::ParentNotDirectory(ancestor));
                }
            }
            self.create_directories(&parent)?;
        } else {
            self.check_parent(path)?;
        }

        self.attach(path, node)
    }

    /// Detach and return the node at `path`.
    ///
    /// Removing `/` hands back the whole tree and leaves an empty root.
    pub fn remove(&mut self, path: &VfsPath) -> Result<Node, FsError> {
        if path.is_root() {
            debug!("removing root directory contents");
            return Ok(std::mem::take(&mut self.root));
        }

        self.get_mut(&path.parent())
            .and_then(Node::as_directory_mut)
            .and_then(|dir| dir.remove(path.file_name()))
            .ok_or_else(|| FsError::NotFound(path.clone()))
    }

    /// Deep-copy the subtree at `source` to `destination`.
    pub fn copy(
        &mut self,
        source: &VfsPath,
        destination: &VfsPath,
        recursive: bool,
    ) -> Result<(), FsError> {
        let node = self
            .get(source)
            .ok_or_else(|| FsError::NotFound(source.clone()))?;
        if node.is_directory() {
            if !recursive {
                return Err(FsError::IsDirectoryWithoutRecursive(source.clone()));
            }
            if source.is_ancestor_of(destination) {
                return Err(FsError::IntoItself(source.clone()));
            }
        }

        let clone = node.clone();
        self.add(destination, clone, false)
    }

    /// Re-attach the node at `source` under `destination` without copying it.
    pub fn move_node(&mut self, source: &VfsPath, destination: &VfsPath) -> Result<(), FsError> {
        if !self.has(source) {
            return Err(FsError::NotFound(source.clone()));
        }
        if source.is_ancestor_of(destination) {
            return Err(FsError::IntoItself(source.clone()));
        }
        if self.has(destination) {
            return Err(FsError::AlreadyExists(destination.clone()));
        }
        self.check_parent(destination)?;

        let node = self.remove(source)?;
        self.attach(destination, node)
    }

    /// Resolve where each source of a copy or move should land.
    ///
    /// - One source and a `destination` that does not exist: the source goes
    ///   exactly to `destination`, whose parent must be a directory.
    /// - `destination` is a directory: every source goes inside it under its
    ///   own name.
    ///
    /// An existing non-directory destination is always rejected, as are
    /// multiple sources aimed at a path that does not exist.
    pub fn determine_move_mappings(
        &self,
        sources: &[VfsPath],
        destination: &VfsPath,
    ) -> Result<Vec<(VfsPath, VfsPath)>, FsError> {
        match self.get(destination) {
            Some(Node::Directory(_)) => Ok(sources
                .iter()
                .map(|source| (source.clone(), destination.get_child(source.file_name())))
                .collect()),
            Some(Node::File(_)) => Err(FsError::DestinationNotDirectory(destination.clone())),
            None => {
                if sources.len() > 1 {
                    return Err(FsError::MultipleSourcesNeedDirectory(destination.clone()));
                }
                self.check_parent(destination)?;
                Ok(sources
                    .iter()
                    .map(|source| (source.clone(), destination.clone()))
                    .collect())
            }
        }
    }

    fn check_parent(&self, path: &VfsPath) -> Result<(), FsError> {
        let parent = path.parent();
        match self.get(&parent) {
            Some(Node::Directory(_)) => Ok(()),
            Some(Node::File(_)) => Err(FsError::ParentNotDirectory(parent)),
            None => Err(FsError::ParentMissing(parent)),
        }
    }

    fn create_directories(&mut self, path: &VfsPath) -> Result<(), FsError> {
        let mut current = self.root_directory_mut()?;
        let mut walked = VfsPath::root();
        for segment in path.segments() {
            walked = walked.get_child(segment);
            current = current
                .directory_or_create(segment)
                .ok_or_else(|| FsError::ParentNotDirectory(walked.clone()))?;
        }
        Ok(())
    }

    fn attach(&mut self, path: &VfsPath, node: Node) -> Result<(), FsError> {
        let parent = path.parent();
        let dir = self
            .get_mut(&parent)
            .ok_or_else(|| FsError::ParentMissing(parent.clone()))?
            .as_directory_mut()
            .ok_or_else(|| FsError::ParentNotDirectory(parent.clone()))?;
        dir.add(path.file_name(), node)
            .map_err(|_| FsError::AlreadyExists(path.clone()))?;
        debug!(path = %path, "attached node");
        Ok(())
    }

    fn root_directory_mut(&mut self) -> Result<&mut Directory, FsError> {
        self.root
            .as_directory_mut()
            .ok_or_else(|| FsError::NotADirectory(VfsPath::root()))
    }
}
