//! Structural analysis of the revision graph.

use super::script::Revision;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::BTreeMap;
use std::fmt;

/// A structural problem in the revision graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// Two scripts declare the same revision id
    DuplicateRevision { id: String },
    /// A script revises a revision that does not exist
    UnknownParent { id: String, parent: String },
    /// Following down revisions leads back to this revision
    Cycle { id: String },
    /// Revision with neither parent nor child in a multi-revision history
    Orphan { id: String },
    /// More than one head while branch detection is on
    MultipleHeads { heads: Vec<String> },
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::DuplicateRevision { id } => write!(f, "Duplicate revision id: {}", id),
            GraphIssue::UnknownParent { id, parent } => {
                write!(f, "Revision {} revises unknown revision {}", id, parent)
            }
            GraphIssue::Cycle { id } => write!(f, "Cycle detected involving revision {}", id),
            GraphIssue::Orphan { id } => write!(f, "Orphan migration detected: {}", id),
            GraphIssue::MultipleHeads { heads } => {
                write!(f, "Multiple heads detected: {}", heads.join(", "))
            }
        }
    }
}

/// Result of analysing a set of revisions.
#[derive(Debug, Clone, Default)]
pub struct GraphAnalysis {
    pub revision_count: usize,
    pub heads: Vec<String>,
    pub bases: Vec<String>,
    pub issues: Vec<GraphIssue>,
}

impl GraphAnalysis {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Build the revision graph and collect every structural issue.
///
/// Heads, bases and issues come out ordered by revision id.
pub fn analyze(revisions: &[Revision], detect_branches: bool) -> GraphAnalysis {
    let mut issues = Vec::new();

    let mut by_id: BTreeMap<&str, &Revision> = BTreeMap::new();
    for revision in revisions {
        if by_id.insert(revision.id.as_str(), revision).is_some() {
            issues.push(GraphIssue::DuplicateRevision {
                id: revision.id.clone(),
            });
        }
    }

    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for id in by_id.keys() {
        graph.add_node(*id);
    }
    for (id, revision) in &by_id {
        for parent in &revision.down_revisions {
            match by_id.get_key_value(parent.as_str()) {
                Some((parent_id, _)) => {
                    graph.add_edge(*parent_id, *id, ());
                }
                None => issues.push(GraphIssue::UnknownParent {
                    id: id.to_string(),
                    parent: parent.clone(),
                }),
            }
        }
    }

    if let Err(cycle) = toposort(&graph, None) {
        issues.push(GraphIssue::Cycle {
            id: cycle.node_id().to_string(),
        });
    }

    let heads: Vec<String> = graph
        .nodes()
        .filter(|n| graph.neighbors_directed(*n, Direction::Outgoing).next().is_none())
        .map(str::to_string)
        .collect();

    let bases: Vec<&str> = by_id
        .iter()
        .filter(|(_, r)| r.down_revisions.is_empty())
        .map(|(id, _)| *id)
        .collect();

    if by_id.len() > 1 {
        for base in &bases {
            let childless = graph
                .neighbors_directed(*base, Direction::Outgoing)
                .next()
                .is_none();
            if childless {
                issues.push(GraphIssue::Orphan { id: base.to_string() });
            }
        }
    }

    if detect_branches && heads.len() > 1 {
        issues.push(GraphIssue::MultipleHeads {
            heads: heads.clone(),
        });
    }

    GraphAnalysis {
        revision_count: by_id.len(),
        heads,
        bases: bases.into_iter().map(str::to_string).collect(),
        issues,
    }
}
