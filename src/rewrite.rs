//! Applying cyclic rules to a host graph.
//!
//! One step of a rule program applies each [`CyclicPermutation`] once. For a cycle, every
//! occurrence of every part is found in the graph as it stands before the cycle runs; the
//! occurrences are then replaced one by one, part `Pk` by part `P(k+1) mod size`.
//!
//! Occurrences are not checked for independence. A later occurrence may refer to vertices an
//! earlier one already removed: its removals are then no-ops, its image vertices are inserted
//! regardless (the last replacement wins), and re-splices that find no live edge are skipped with
//! a warning.
use std::collections::BTreeMap;
use std::ops::AddAssign;

use thiserror::Error;

use crate::graph::{Edge, Graph, SemiEdge, Subgraph, Vertex, VertexName};
use crate::renaming::Renaming;
use crate::rule::{AttachmentMap, CyclicPermutation, Pcgd};

/// Internal invariant violations detected while rewriting.
///
/// These indicate an inconsistent rule or renaming, never bad host input. A faulting
/// [`replace`] leaves the graph unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteFault {
    #[error("undefined renaming on {entity}: `{name}` has no image")]
    UndefinedRenaming { entity: String, name: VertexName },

    #[error("fresh vertex `{name}` referenced but not created by this replacement")]
    UnboundPlaceholder { name: VertexName },

    #[error("semi-edge {half} has no attachment target")]
    MissingAttachment { half: SemiEdge },

    #[error("cyclic permutation has {parts} parts but {attachments} attachment maps")]
    IncompleteCycle { parts: usize, attachments: usize },
}

/// Counters describing what a rewrite did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Occurrences found before replacing.
    pub matches: usize,
    pub replacements: usize,
    /// Vertices created from fresh placeholders.
    pub vertices_created: usize,
    /// Re-splices skipped because no live edge carried the cut half-edge.
    pub splices_skipped: usize,
}

impl AddAssign for RewriteStats {
    fn add_assign(&mut self, other: Self) {
        self.matches += other.matches;
        self.replacements += other.replacements;
        self.vertices_created += other.vertices_created;
        self.splices_skipped += other.splices_skipped;
    }
}

/// Apply every cycle of `program` once, in order.
pub fn apply(graph: &mut Graph, program: &Pcgd) -> Result<RewriteStats, RewriteFault> {
    let mut stats = RewriteStats::default();
    for (idx, cycle) in program.iter().enumerate() {
        let cycle_stats = apply_cycle(graph, cycle)?;
        tracing::debug!(
            cycle = idx,
            matches = cycle_stats.matches,
            created = cycle_stats.vertices_created,
            "cycle applied"
        );
        stats += cycle_stats;
    }
    Ok(stats)
}

/// Apply one cyclic permutation: find all occurrences of all parts, then replace them in part
/// order.
pub fn apply_cycle(graph: &mut Graph, cycle: &CyclicPermutation) -> Result<RewriteStats, RewriteFault> {
    let incomplete = || RewriteFault::IncompleteCycle {
        parts: cycle.part_count(),
        attachments: cycle.attachment_count(),
    };
    let size = cycle.size().ok_or_else(incomplete)?;

    let found: Vec<Vec<Renaming>> = cycle.parts().iter().map(|p| graph.find_pattern(p)).collect();

    let mut stats = RewriteStats {
        matches: found.iter().map(Vec::len).sum(),
        ..RewriteStats::default()
    };
    for (k, matches) in found.iter().enumerate() {
        let (Some(pattern), Some(image), Some(attachment)) = (
            cycle.part(k),
            cycle.part((k + 1) % size),
            cycle.attachment(k),
        ) else {
            return Err(incomplete());
        };
        for renaming in matches {
            stats += replace(graph, pattern, image, attachment, renaming)?;
        }
    }
    Ok(stats)
}

/// Everything a replacement will do, resolved before the graph is touched.
struct Plan {
    removed_vertices: Vec<VertexName>,
    removed_edges: Vec<Edge>,
    inserted_vertices: Vec<Vertex>,
    /// `(host half cut by the pattern, half it is re-attached to)`
    splices: Vec<(SemiEdge, SemiEdge)>,
    inserted_edges: Vec<Edge>,
    fresh_counter: u64,
    created: usize,
}

/// Names of the image resolved for one occurrence: through the renaming, else through the
/// placeholders generated for this occurrence.
struct Resolver<'a> {
    renaming: &'a Renaming,
    generated: BTreeMap<VertexName, VertexName>,
}

impl Resolver<'_> {
    fn name(&self, name: &VertexName, entity: impl std::fmt::Display) -> Result<VertexName, RewriteFault> {
        if let Some(host) = self.renaming.get(name).or_else(|| self.generated.get(name)) {
            return Ok(host.clone());
        }
        if name.is_fresh() {
            return Err(RewriteFault::UnboundPlaceholder { name: name.clone() });
        }
        Err(RewriteFault::UndefinedRenaming {
            entity: entity.to_string(),
            name: name.clone(),
        })
    }

    fn half(&self, half: &SemiEdge, entity: impl std::fmt::Display) -> Result<SemiEdge, RewriteFault> {
        Ok(SemiEdge::new(self.name(&half.name, entity)?, half.port))
    }
}

fn plan(
    graph: &Graph,
    pattern: &Subgraph,
    image: &Subgraph,
    attachment: &AttachmentMap,
    renaming: &Renaming,
) -> Result<Plan, RewriteFault> {
    let removed_vertices = pattern
        .vertices()
        .map(|v| renaming.apply_vertex(v).map(|renamed| renamed.name))
        .collect::<Result<Vec<_>, _>>()?;
    let removed_edges = pattern
        .edges()
        .iter()
        .map(|e| renaming.apply_edge(e))
        .collect::<Result<Vec<_>, _>>()?;

    let mut resolver = Resolver {
        renaming,
        generated: BTreeMap::new(),
    };
    let mut fresh_counter = graph.fresh_counter();
    let mut inserted_vertices = Vec::with_capacity(image.vertex_count());
    for vertex in image.vertices() {
        let name = match renaming.get(&vertex.name) {
            Some(host) => host.clone(),
            None if vertex.name.is_fresh() => {
                fresh_counter += 1;
                let generated = VertexName::Generated(fresh_counter);
                resolver.generated.insert(vertex.name.clone(), generated.clone());
                generated
            }
            None => {
                return Err(RewriteFault::UndefinedRenaming {
                    entity: format!("vertex {vertex}"),
                    name: vertex.name.clone(),
                })
            }
        };
        inserted_vertices.push(Vertex::new(name, vertex.state));
    }

    let mut splices = Vec::with_capacity(pattern.semi_edge_count());
    for half in pattern.semi_edges() {
        let target = attachment
            .get(half)
            .ok_or_else(|| RewriteFault::MissingAttachment { half: half.clone() })?;
        let cut = renaming.apply_semi_edge(half)?;
        let target = resolver.half(target, format_args!("semi-edge {target}"))?;
        splices.push((cut, target));
    }

    let inserted_edges = image
        .edges()
        .iter()
        .map(|e| {
            Ok(Edge::from_halves(
                resolver.half(e.first(), format_args!("edge {e}"))?,
                resolver.half(e.second(), format_args!("edge {e}"))?,
            ))
        })
        .collect::<Result<Vec<_>, RewriteFault>>()?;

    Ok(Plan {
        removed_vertices,
        removed_edges,
        inserted_vertices,
        splices,
        inserted_edges,
        fresh_counter,
        created: resolver.generated.len(),
    })
}

/// Replace one occurrence of `pattern`, located by `renaming` (pattern names to host names), by
/// `image`.
///
/// Host edges cut by the pattern's semi-edges are re-attached to the image through
/// `attachment`. Image vertices either keep the host name of the pattern vertex they share a
/// name with, or are fresh placeholders which receive a newly generated name. On error the
/// graph is left untouched.
pub fn replace(
    graph: &mut Graph,
    pattern: &Subgraph,
    image: &Subgraph,
    attachment: &AttachmentMap,
    renaming: &Renaming,
) -> Result<RewriteStats, RewriteFault> {
    let plan = plan(graph, pattern, image, attachment, renaming)?;

    for name in &plan.removed_vertices {
        graph.vertices.remove(name);
    }
    for edge in &plan.removed_edges {
        if let Some(pos) = graph.edges.iter().position(|e| e == edge) {
            graph.edges.remove(pos);
        }
    }
    for vertex in plan.inserted_vertices {
        graph.vertices.insert(vertex.name.clone(), vertex);
    }

    // Locate every cut half before re-pointing any of them, so that a half re-attached to a
    // name still in use is not picked up again by a later splice.
    let mut skipped = 0;
    let mut repoints = Vec::with_capacity(plan.splices.len());
    for (cut, target) in plan.splices {
        let found = graph
            .edges
            .iter()
            .enumerate()
            .find_map(|(idx, e)| e.end_index(&cut).map(|end| (idx, end)));
        match found {
            Some((idx, end)) => repoints.push((idx, end, target)),
            None => {
                tracing::warn!(half = %cut, "no live edge to re-splice, skipping");
                skipped += 1;
            }
        }
    }
    for (idx, end, target) in repoints {
        graph.edges[idx].set_end(end, target);
    }

    graph.edges.extend(plan.inserted_edges);
    graph.set_fresh_counter(plan.fresh_counter);

    tracing::debug!(renaming = %renaming, created = plan.created, "replaced occurrence");
    Ok(RewriteStats {
        matches: 0,
        replacements: 1,
        vertices_created: plan.created,
        splices_skipped: skipped,
    })
}
