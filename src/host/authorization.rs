//! Project path authorization gate
//!
//! Every registry and persistence operation on the host takes a
//! project path, and the host only honors paths whose resolved
//! absolute form was explicitly authorized beforehand. The grant
//! happens exactly once, when a project is successfully opened by the
//! project-loading collaborator. This keeps a compromised or buggy UI
//! caller from driving file I/O or window creation against arbitrary
//! filesystem locations.

use crate::error::HostError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The set of project roots the host will operate on.
#[derive(Debug, Default)]
pub struct AuthorizedRoots {
    roots: HashSet<PathBuf>,
}

impl AuthorizedRoots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant access to a project root. Resolves symlinks and relative
    /// components first so later lookups cannot be bypassed with an
    /// alternate spelling of the same directory.
    pub fn authorize(&mut self, project: &Path) -> Result<PathBuf, HostError> {
        let resolved = project.canonicalize()?;
        if self.roots.insert(resolved.clone()) {
            log::info!("Authorized project root {}", resolved.display());
        }
        Ok(resolved)
    }

    /// Resolve a caller-supplied path against the grant set.
    pub fn resolve(&self, project: &Path) -> Result<PathBuf, HostError> {
        let resolved = project
            .canonicalize()
            .map_err(|_| HostError::Unauthorized(project.to_path_buf()))?;
        if self.roots.contains(&resolved) {
            Ok(resolved)
        } else {
            Err(HostError::Unauthorized(project.to_path_buf()))
        }
    }

    /// Non-erroring check, for the operations that degrade to empty
    /// results instead of failing hard.
    pub fn is_authorized(&self, project: &Path) -> bool {
        self.resolve(project).is_ok()
    }
}
