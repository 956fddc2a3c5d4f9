use indextree::{Arena, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::color::color_key;
use crate::error::{DiagramError, Result};

/// A commit that touched a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub author: String,
    pub message: String,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
}

/// A tracked file with its size, history and risk score
#[derive(Debug, Clone)]
pub struct GitFile {
    pub path: String,
    pub name: String,
    pub size: u64,
    pub commits: Vec<Commit>,
    risk_index: f64,
}

impl GitFile {
    pub fn risk_index(&self) -> f64 {
        self.risk_index
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Key used to look up this file's color
    pub fn color_key(&self) -> &str {
        color_key(&self.name)
    }
}

/// Represents a node in the repository tree
#[derive(Debug, Clone)]
pub enum TreeNode {
    Folder { name: String, path: String },
    File(GitFile),
}

/// Repository file tree backed by an arena allocator.
///
/// Folders are derived from the path prefixes of added files and created once,
/// at insertion time. Children keep insertion order.
pub struct GitTree {
    arena: Arena<TreeNode>,
    root: NodeId,
    path_to_node: HashMap<String, NodeId>,
    files: Vec<NodeId>,
}

impl Default for GitTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GitTree {
    /// Create an empty tree
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(TreeNode::Folder {
            name: String::new(),
            path: String::new(),
        });

        Self {
            arena,
            root,
            path_to_node: HashMap::new(),
            files: Vec::new(),
        }
    }

    /// Add a file, creating any folders along its path
    pub fn add_file(&mut self, path: &str, size: u64, commits: Vec<Commit>) -> Result<()> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(DiagramError::InvalidPath(path.to_string()));
        }
        if self.path_to_node.contains_key(path) {
            return Err(DiagramError::DuplicatePath(path.to_string()));
        }
        let Some((name, folders)) = segments.split_last() else {
            return Err(DiagramError::InvalidPath(path.to_string()));
        };

        let mut parent = self.root;
        let mut prefix = String::new();
        for segment in folders {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            parent = self.folder_node(parent, segment, &prefix)?;
        }

        let node_id = self.arena.new_node(TreeNode::File(GitFile {
            path: path.to_string(),
            name: name.to_string(),
            size,
            commits,
            risk_index: 0.0,
        }));
        parent.append(node_id, &mut self.arena);
        self.path_to_node.insert(path.to_string(), node_id);
        self.files.push(node_id);

        Ok(())
    }

    /// Find or create the folder at `path` under `parent`
    fn folder_node(&mut self, parent: NodeId, name: &str, path: &str) -> Result<NodeId> {
        if let Some(&existing) = self.path_to_node.get(path) {
            return match self.arena[existing].get() {
                TreeNode::Folder { .. } => Ok(existing),
                // A file already claims this prefix
                TreeNode::File(_) => Err(DiagramError::DuplicatePath(path.to_string())),
            };
        }

        let node_id = self.arena.new_node(TreeNode::Folder {
            name: name.to_string(),
            path: path.to_string(),
        });
        parent.append(node_id, &mut self.arena);
        self.path_to_node.insert(path.to_string(), node_id);
        Ok(node_id)
    }

    /// Set the risk score of a file. Negative or non-finite scores are rejected.
    pub fn set_risk_index(&mut self, path: &str, risk_index: f64) -> Result<()> {
        check_risk_index(path, risk_index)?;

        let node_id = self
            .path_to_node
            .get(path)
            .copied()
            .ok_or_else(|| DiagramError::UnknownFile(path.to_string()))?;

        match self.arena.get_mut(node_id).map(|n| n.get_mut()) {
            Some(TreeNode::File(file)) => {
                file.risk_index = risk_index;
                Ok(())
            }
            _ => Err(DiagramError::UnknownFile(path.to_string())),
        }
    }

    /// All files in insertion order
    pub fn files(&self) -> impl Iterator<Item = &GitFile> + '_ {
        self.files.iter().filter_map(|&id| match self.arena[id].get() {
            TreeNode::File(file) => Some(file),
            TreeNode::Folder { .. } => None,
        })
    }

    pub fn file(&self, path: &str) -> Option<&GitFile> {
        match self.arena[*self.path_to_node.get(path)?].get() {
            TreeNode::File(file) => Some(file),
            TreeNode::Folder { .. } => None,
        }
    }

    /// The unnamed folder holding everything
    pub fn root(&self) -> GitFolder<'_> {
        GitFolder {
            tree: self,
            id: self.root,
            name: "",
            path: "",
        }
    }

    /// Files with no directory component
    pub fn top_level_files(&self) -> Vec<&GitFile> {
        self.root().files()
    }

    /// Folders directly under the root, each navigable recursively
    pub fn folders(&self) -> Vec<GitFolder<'_>> {
        self.root().folders()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Reject risk scores that are negative or not finite
pub(crate) fn check_risk_index(path: &str, risk_index: f64) -> Result<()> {
    if !risk_index.is_finite() || risk_index < 0.0 {
        return Err(DiagramError::InvalidAttribute {
            path: path.to_string(),
            attribute: "risk index",
            value: risk_index,
        });
    }
    Ok(())
}

/// Borrowed view of a folder inside a [`GitTree`].
///
/// Only built from folder nodes, so the name and path are captured up front.
#[derive(Clone, Copy)]
pub struct GitFolder<'a> {
    tree: &'a GitTree,
    id: NodeId,
    name: &'a str,
    path: &'a str,
}

impl<'a> GitFolder<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Files directly inside this folder, in insertion order
    pub fn files(&self) -> Vec<&'a GitFile> {
        let arena = &self.tree.arena;
        self.id
            .children(arena)
            .filter_map(|child| match arena[child].get() {
                TreeNode::File(file) => Some(file),
                TreeNode::Folder { .. } => None,
            })
            .collect()
    }

    /// Subfolders directly inside this folder, in insertion order
    pub fn folders(&self) -> Vec<GitFolder<'a>> {
        let tree = self.tree;
        self.id
            .children(&tree.arena)
            .filter_map(|id| match tree.arena[id].get() {
                TreeNode::Folder { name, path } => Some(GitFolder {
                    tree,
                    id,
                    name,
                    path,
                }),
                TreeNode::File(_) => None,
            })
            .collect()
    }

    /// Every file below this folder, depth first
    pub fn descendant_files(&self) -> Vec<&'a GitFile> {
        let arena = &self.tree.arena;
        self.id
            .descendants(arena)
            .filter_map(|node| match arena[node].get() {
                TreeNode::File(file) => Some(file),
                TreeNode::Folder { .. } => None,
            })
            .collect()
    }
}
