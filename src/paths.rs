use petgraph::algo::all_simple_paths;
use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::mol::Mol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// More simple paths joined one vertex pair than the enumerator allows.
    #[error("more than {limit} simple paths between atoms {from} and {to}")]
    TooManyPaths {
        from: usize,
        to: usize,
        limit: usize,
    },
}

/// A simple path: consecutive vertices are bonded and no vertex repeats.
pub type Path = Vec<NodeIndex>;

/// Source of simple paths between two vertices.
///
/// `max_vertices` is a pruning hint: an implementation may omit paths with
/// more vertices than that, but callers must not rely on it doing so.
/// Implementations must be shareable across threads so rings can be
/// classified in parallel.
pub trait PathEnumerator: Sync {
    fn simple_paths<A, B>(
        &self,
        mol: &Mol<A, B>,
        from: NodeIndex,
        to: NodeIndex,
        max_vertices: Option<usize>,
    ) -> Result<Vec<Path>, PathError>;
}

/// Depth-first enumeration backed by [`petgraph::algo::all_simple_paths`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplePaths {
    max_paths: Option<usize>,
}

impl SimplePaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`PathError::TooManyPaths`] when a vertex pair yields more
    /// than `limit` paths.
    pub fn with_max_paths(mut self, limit: usize) -> Self {
        self.max_paths = Some(limit);
        self
    }
}

impl PathEnumerator for SimplePaths {
    fn simple_paths<A, B>(
        &self,
        mol: &Mol<A, B>,
        from: NodeIndex,
        to: NodeIndex,
        max_vertices: Option<usize>,
    ) -> Result<Vec<Path>, PathError> {
        if from == to {
            return Ok(vec![vec![from]]);
        }
        let max_intermediate = max_vertices.map(|m| m.saturating_sub(2));
        let mut paths = Vec::new();
        for path in all_simple_paths::<Path, _>(mol.graph(), from, to, 0, max_intermediate) {
            if let Some(limit) = self.max_paths {
                if paths.len() == limit {
                    return Err(PathError::TooManyPaths {
                        from: from.index(),
                        to: to.index(),
                        limit,
                    });
                }
            }
            paths.push(path);
        }
        Ok(paths)
    }
}
