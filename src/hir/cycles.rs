//! Cycle detection over import and management relations.
//!
//! Both searches share one iterative depth-first walk: a stack of frames,
//! each holding a node and the edges still to visit, plus the set of nodes
//! currently on the stack. Depth is bounded only by the graph, never by the
//! native call stack.

use std::hash::Hash;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use super::import_graph::ImportGraph;
use super::scope::ModelScope;
use crate::syntax::ElementId;

/// A path that closes back onto a node already on the visiting stack.
///
/// `nodes[i]` is connected to `nodes[i + 1]` by `edges[i]`; the last node
/// is the one that was found on the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclePath<N, E> {
    pub nodes: Vec<N>,
    pub edges: Vec<E>,
}

impl<N, E> CyclePath<N, E> {
    /// The node whose revisit closed the cycle.
    pub fn closing_node(&self) -> Option<&N> {
        self.nodes.last()
    }

    /// Render as `a -> b -> c`, or with labelled arrows.
    pub fn render(
        &self,
        mut node: impl FnMut(&N) -> String,
        mut arrow: impl FnMut(&E) -> String,
    ) -> String {
        let mut out = String::new();
        for (i, n) in self.nodes.iter().enumerate() {
            if i > 0 {
                out.push_str(&arrow(&self.edges[i - 1]));
            }
            out.push_str(&node(n));
        }
        out
    }
}

/// Depth-first search from `root`, following `first` and then `successors`.
///
/// Returns the first path that reaches a node already on the stack.
/// Nodes that were fully explored are not entered again.
pub(crate) fn find_cycle<N, E, F>(
    root: N,
    first: Vec<(E, N)>,
    mut successors: F,
) -> Option<CyclePath<N, E>>
where
    N: Clone + Eq + Hash,
    F: FnMut(&N) -> Vec<(E, N)>,
{
    let mut nodes = vec![root.clone()];
    let mut edges: Vec<E> = Vec::new();
    let mut on_stack: FxHashSet<N> = FxHashSet::default();
    on_stack.insert(root);
    let mut done: FxHashSet<N> = FxHashSet::default();
    let mut frames = vec![first.into_iter()];

    while let Some(frame) = frames.last_mut() {
        let Some((edge, next)) = frame.next() else {
            frames.pop();
            edges.pop();
            if let Some(node) = nodes.pop() {
                on_stack.remove(&node);
                done.insert(node);
            }
            continue;
        };

        if on_stack.contains(&next) {
            edges.push(edge);
            nodes.push(next);
            return Some(CyclePath { nodes, edges });
        }
        if done.contains(&next) {
            continue;
        }

        on_stack.insert(next.clone());
        frames.push(successors(&next).into_iter());
        edges.push(edge);
        nodes.push(next);
    }
    None
}

// ============================================================================
// IMPORT CYCLES
// ============================================================================

/// Search for an import cycle entered through `file`'s import of `target`.
pub fn find_import_cycle(
    graph: &ImportGraph,
    file: &Path,
    target: &Path,
) -> Option<CyclePath<PathBuf, ()>> {
    find_cycle(file.to_path_buf(), vec![((), target.to_path_buf())], |node| {
        graph.imports_of(node).map(|next| ((), next.clone())).collect()
    })
}

/// Render an import trail as `A.fidl -> B.fidl -> A.fidl`.
pub fn render_import_trail(cycle: &CyclePath<PathBuf, ()>) -> String {
    cycle.render(|path| path.display().to_string(), |_| " -> ".to_string())
}

// ============================================================================
// MANAGEMENT CYCLES
// ============================================================================

/// An edge of the management relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagementEdge {
    /// Entry `index` of the `manages` list.
    Manages(usize),
    /// The base interface.
    Extends,
}

impl ManagementEdge {
    fn arrow(&self) -> &'static str {
        match self {
            ManagementEdge::Manages(_) => " -[manages]-> ",
            ManagementEdge::Extends => " -[extends]-> ",
        }
    }
}

/// Outgoing management edges of an interface: managed interfaces in
/// declaration order, then the base interface.
pub fn management_edges(
    scope: &ModelScope<'_>,
    id: ElementId,
) -> Vec<(ManagementEdge, ElementId)> {
    let Some(handle) = scope.interface_by_id(id) else {
        return Vec::new();
    };
    let iface = handle.interface;
    let mut out: Vec<_> = iface
        .manages
        .iter()
        .enumerate()
        .filter_map(|(index, managed)| {
            let target = scope.resolve_interface(handle.file, &managed.name)?;
            Some((ManagementEdge::Manages(index), target.interface.id))
        })
        .collect();
    if let Some(base) = &iface.base {
        if let Some(target) = scope.resolve_interface(handle.file, &base.name) {
            out.push((ManagementEdge::Extends, target.interface.id));
        }
    }
    out
}

/// A management cycle found while checking one interface.
#[derive(Clone, Debug)]
pub struct ManagementCycle {
    pub path: CyclePath<ElementId, ManagementEdge>,
    /// The cycle closes on the interface under test.
    pub closes_on_owner: bool,
}

impl ManagementCycle {
    /// The first edge taken out of the interface under test.
    pub fn first_edge(&self) -> Option<ManagementEdge> {
        self.path.edges.first().copied()
    }

    /// Render as `A -[manages]-> B -[extends]-> A`.
    pub fn render(&self, scope: &ModelScope<'_>) -> String {
        self.path.render(
            |id| {
                scope
                    .interface_by_id(*id)
                    .map(|h| h.interface.name.to_string())
                    .unwrap_or_else(|| "?".to_string())
            },
            |edge| edge.arrow().to_string(),
        )
    }
}

/// Search the management relation (including base interfaces) from `owner`,
/// once per outgoing edge, so every `manages` entry and the base interface
/// that leads into a cycle gets its own result.
pub fn find_management_cycles(scope: &ModelScope<'_>, owner: ElementId) -> Vec<ManagementCycle> {
    management_edges(scope, owner)
        .into_iter()
        .filter_map(|edge| find_management_cycle_through(scope, owner, edge))
        .collect()
}

/// Search for a management cycle entered through one edge out of `owner`.
pub fn find_management_cycle_through(
    scope: &ModelScope<'_>,
    owner: ElementId,
    edge: (ManagementEdge, ElementId),
) -> Option<ManagementCycle> {
    let path = find_cycle(owner, vec![edge], |id| management_edges(scope, *id))?;
    let closes_on_owner = path.closing_node() == Some(&owner);
    Some(ManagementCycle {
        path,
        closes_on_owner,
    })
}
