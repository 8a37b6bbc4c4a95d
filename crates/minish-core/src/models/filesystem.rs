use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::NodeError;

// =============================================================================
// Node
// =============================================================================

/// An entry in the virtual filesystem.
///
/// Nodes do not know their own name; names belong to the containing
/// [`Directory`]. Serialized form is tagged by `type`:
///
/// ```json
/// {"type": "Directory", "nodes": {"a.txt": {"type": "File", "contents": "hi"}}}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    File(File),
    Directory(Directory),
}

impl Node {
    pub fn file(contents: impl Into<String>) -> Self {
        Node::File(File::new(contents))
    }

    pub fn directory() -> Self {
        Node::Directory(Directory::new())
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn as_directory_mut(&mut self) -> Option<&mut Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }

    /// Serialize this node and all its descendants.
    pub fn to_json(&self) -> Result<String, NodeError> {
        serde_json::to_string(self).map_err(|e| NodeError::Corrupt(e.to_string()))
    }

    /// Rebuild a node tree from its serialized form.
    ///
    /// Fails if a `type` tag is unknown or a required field is missing.
    pub fn from_json(json: &str) -> Result<Self, NodeError> {
        serde_json::from_str(json).map_err(|e| NodeError::Corrupt(e.to_string()))
    }
}

/// An empty directory.
impl Default for Node {
    fn default() -> Self {
        Node::directory()
    }
}

// =============================================================================
// File
// =============================================================================

/// How a [`File`] is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileMode {
    /// Contents readable, writes are ignored.
    Read,
    /// Contents cleared when the stream is opened.
    Write,
    /// Writes extend the existing contents.
    Append,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    contents: String,
}

impl File {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn set_contents(&mut self, contents: impl Into<String>) {
        self.contents = contents.into();
    }

    /// Open a stream over this file. Opening in [`FileMode::Write`] truncates.
    pub fn open(&mut self, mode: FileMode) -> FileStream<'_> {
        if mode == FileMode::Write {
            self.contents.clear();
        }
        FileStream { file: self, mode }
    }
}

/// A scoped stream over a single file's contents.
#[derive(Debug)]
pub struct FileStream<'a> {
    file: &'a mut File,
    mode: FileMode,
}

impl FileStream<'_> {
    pub fn read(&self) -> &str {
        &self.file.contents
    }

    /// Append text unless the stream was opened read-only.
    pub fn push(&mut self, text: &str) {
        if self.mode == FileMode::Read {
            tracing::warn!("ignoring write to a file opened for reading");
            return;
        }
        self.file.contents.push_str(text);
    }
}

// =============================================================================
// Directory
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    nodes: BTreeMap<String, Node>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children. `.` and `..` are never stored.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &BTreeMap<String, Node> {
        &self.nodes
    }

    /// Child names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn has(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    /// Insert a child, returning it back if the name is already taken.
    pub fn add(&mut self, name: &str, node: Node) -> Result<(), Node> {
        if self.nodes.contains_key(name) {
            return Err(node);
        }
        self.nodes.insert(name.to_string(), node);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.nodes.remove(name)
    }

    /// The child directory `name`, created if absent. `None` if a file has that name.
    pub(crate) fn directory_or_create(&mut self, name: &str) -> Option<&mut Directory> {
        self.nodes
            .entry(name.to_string())
            .or_insert_with(Node::directory)
            .as_directory_mut()
    }
}
