//! Embedding pattern subgraphs into port graphs.
//!
//! Matching grows a [`Renaming`] from one seed pair of vertices by following edges: a pair is
//! consistent when the states agree, the degrees agree exactly, the names can be bound, and every
//! incident edge leads to another consistent pair with the same ports on both sides.
use crate::graph::{Graph, PortView, SemiEdge, Subgraph, Vertex, VertexName};
use crate::renaming::Renaming;

pub trait MatchTrace {
    fn on_event(&self, _event: MatchEvent<'_>) {}
}

pub struct NoopTrace;

impl MatchTrace for NoopTrace {}

pub(crate) static NOOP_TRACE: NoopTrace = NoopTrace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent<'a> {
    /// A new search from host vertex `host` onto the pattern's seed vertex.
    Seed {
        host: &'a VertexName,
        seed: &'a VertexName,
    },
    EnterFrame {
        local: &'a VertexName,
        other: &'a VertexName,
        depth: usize,
    },
    Bind {
        local: &'a VertexName,
        other: &'a VertexName,
        depth: usize,
    },
    Prune {
        reason: &'static str,
        depth: usize,
    },
    Solution,
    ExitFrame {
        depth: usize,
        consistent: bool,
    },
}

/// Test whether `local_vertex` of `local` can be glued onto `other_vertex` of `other`, extending
/// `renaming` (local names to other names) as the search propagates along edges.
///
/// On failure `renaming` holds a partial hypothesis and must be discarded.
pub fn two_vertices_consistent<L, O>(
    local: &L,
    local_vertex: &Vertex,
    other: &O,
    other_vertex: &Vertex,
    renaming: &mut Renaming,
    trace: &dyn MatchTrace,
) -> bool
where
    L: PortView + ?Sized,
    O: PortView + ?Sized,
{
    consistent_at(local, local_vertex, other, other_vertex, renaming, trace, 0)
}

fn consistent_at<L, O>(
    local: &L,
    local_vertex: &Vertex,
    other: &O,
    other_vertex: &Vertex,
    renaming: &mut Renaming,
    trace: &dyn MatchTrace,
    depth: usize,
) -> bool
where
    L: PortView + ?Sized,
    O: PortView + ?Sized,
{
    trace.on_event(MatchEvent::EnterFrame {
        local: &local_vertex.name,
        other: &other_vertex.name,
        depth,
    });
    let consistent = check_pair(local, local_vertex, other, other_vertex, renaming, trace, depth);
    trace.on_event(MatchEvent::ExitFrame { depth, consistent });
    consistent
}

fn check_pair<L, O>(
    local: &L,
    local_vertex: &Vertex,
    other: &O,
    other_vertex: &Vertex,
    renaming: &mut Renaming,
    trace: &dyn MatchTrace,
    depth: usize,
) -> bool
where
    L: PortView + ?Sized,
    O: PortView + ?Sized,
{
    let prune = |reason: &'static str| {
        trace.on_event(MatchEvent::Prune { reason, depth });
        false
    };

    if renaming.get(&local_vertex.name) == Some(&other_vertex.name) {
        return true;
    }
    if local_vertex.state != other_vertex.state {
        return prune("state");
    }
    if local.degree(&local_vertex.name) != other.degree(&other_vertex.name) {
        return prune("degree");
    }
    if !renaming.bind(local_vertex.name.clone(), other_vertex.name.clone()) {
        return prune("already bound");
    }
    tracing::trace!(local = %local_vertex.name, other = %other_vertex.name, depth, "bind");
    trace.on_event(MatchEvent::Bind {
        local: &local_vertex.name,
        other: &other_vertex.name,
        depth,
    });

    // Dangling ports of the local side must land on a used port of the other side.
    for half in local.semi_edges_at(&local_vertex.name) {
        let image = SemiEdge::new(other_vertex.name.clone(), half.port);
        if !other.contains_semi_edge(&image) && other.edge_for_half(&image).is_none() {
            return prune("semi-edge");
        }
    }

    for (near, far) in local.edges().iter().flat_map(|e| e.ends_at(&local_vertex.name)) {
        let image = SemiEdge::new(other_vertex.name.clone(), near.port);
        if other.contains_semi_edge(&image) {
            continue;
        }
        let Some(other_far) = other
            .edge_for_half(&image)
            .and_then(|other_edge| other_edge.opposite(&image))
        else {
            return prune("unmatched edge");
        };
        if other_far.port != far.port {
            return prune("far port");
        }
        let (Some(local_next), Some(other_next)) =
            (local.vertex(&far.name), other.vertex(&other_far.name))
        else {
            return prune("dangling edge");
        };
        if !consistent_at(local, local_next, other, other_next, renaming, trace, depth + 1) {
            return false;
        }
    }
    true
}

impl Graph {
    /// Find every occurrence of `pattern` in this graph.
    ///
    /// Each result maps every pattern vertex name to a distinct host vertex name. The search is
    /// seeded at the smallest pattern vertex and only discovers vertices reachable from it, so a
    /// disconnected pattern never matches. An empty pattern has no occurrences.
    pub fn find_pattern(&self, pattern: &Subgraph) -> Vec<Renaming> {
        self.find_pattern_traced(pattern, None)
    }

    pub fn find_pattern_traced(
        &self,
        pattern: &Subgraph,
        trace: Option<&dyn MatchTrace>,
    ) -> Vec<Renaming> {
        let trace = trace.unwrap_or(&NOOP_TRACE);
        let Some(seed) = pattern.vertices().next() else {
            return Vec::new();
        };

        let mut finds = Vec::new();
        for host_vertex in self.vertices() {
            trace.on_event(MatchEvent::Seed {
                host: &host_vertex.name,
                seed: &seed.name,
            });
            let mut renaming = Renaming::new();
            if !two_vertices_consistent(self, host_vertex, pattern, seed, &mut renaming, trace) {
                continue;
            }
            if !renaming.is_injective() {
                trace.on_event(MatchEvent::Prune {
                    reason: "non-injective",
                    depth: 0,
                });
                continue;
            }
            if renaming.len() != pattern.vertex_count() {
                trace.on_event(MatchEvent::Prune {
                    reason: "pattern not covered",
                    depth: 0,
                });
                continue;
            }
            trace.on_event(MatchEvent::Solution);
            let found = renaming.mirror();
            tracing::debug!(renaming = %found, "pattern occurrence");
            finds.push(found);
        }
        finds
    }
}
