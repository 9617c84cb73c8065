use std::collections::BTreeSet;

use super::{check_ports_free, Edge, Graph, GraphError, Port, PortView, SemiEdge, Vertex, VertexName};
use crate::matching::{two_vertices_consistent, NOOP_TRACE};
use crate::renaming::Renaming;

/// A pattern: a port graph with dangling half-edges.
///
/// A vertex carrying at least one semi-edge is a *border vertex*. Unlike a host [`Graph`], a
/// subgraph may not contain an edge from a vertex to itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subgraph {
    graph: Graph,
    semi_edges: BTreeSet<SemiEdge>,
}

impl Subgraph {
    pub fn empty() -> Self {
        Subgraph::default()
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<(), GraphError> {
        self.graph.add_vertex(vertex)
    }

    /// Add an edge. Fails if an endpoint is missing, if both ends are on the same vertex, or if
    /// either `(vertex, port)` is used by an edge or a semi-edge.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        for end in edge.halves() {
            if !self.graph.contains_vertex(&end.name) {
                return Err(GraphError::UnknownVertex {
                    entity: format!("edge {edge}"),
                    name: end.name.clone(),
                });
            }
        }
        if edge.first().name == edge.second().name {
            return Err(GraphError::SelfLoop { edge });
        }
        check_ports_free(&edge, &self.graph.edges, self.semi_edges.iter())?;
        self.graph.edges.push(edge);
        Ok(())
    }

    /// Add a dangling half-edge on an existing vertex.
    pub fn add_semi_edge(&mut self, semi_edge: SemiEdge) -> Result<(), GraphError> {
        if !self.graph.contains_vertex(&semi_edge.name) {
            return Err(GraphError::UnknownVertex {
                entity: format!("semi-edge {semi_edge}"),
                name: semi_edge.name,
            });
        }
        if self.semi_edges.contains(&semi_edge) {
            return Err(GraphError::PortInUse {
                entity: format!("semi-edge {semi_edge}"),
                holder: semi_edge.to_string(),
                half: semi_edge,
            });
        }
        if let Some(holder) = self.graph.edge_for_half(&semi_edge) {
            return Err(GraphError::PortInUse {
                entity: format!("semi-edge {semi_edge}"),
                holder: holder.to_string(),
                half: semi_edge,
            });
        }
        self.semi_edges.insert(semi_edge);
        Ok(())
    }

    pub fn vertex(&self, name: &VertexName) -> Option<&Vertex> {
        self.graph.vertex(name)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.graph.vertices()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// Semi-edges in `(name, port)` order.
    pub fn semi_edges(&self) -> impl Iterator<Item = &SemiEdge> {
        self.semi_edges.iter()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn semi_edge_count(&self) -> usize {
        self.semi_edges.len()
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.graph.contains_edge(edge)
    }

    pub fn is_border(&self, name: &VertexName) -> bool {
        self.semi_edges_at(name).next().is_some()
    }

    pub fn border_vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices().filter(|v| self.is_border(&v.name))
    }

    /// Edge count plus semi-edge count of vertex `name`.
    pub fn degree_of_vertex(&self, name: &VertexName) -> usize {
        PortView::degree(self, name)
    }

    /// Find a border vertex of `self` which is consistent with some vertex of `other` under a
    /// renaming other than the identity.
    ///
    /// Returns the offending `(local, other)` vertex names. The search only runs from `self`
    /// onto `other`: both directions must be tested to declare two subgraphs non-overlapping.
    pub fn borders_overlap_on(&self, other: &Subgraph) -> Option<(VertexName, VertexName)> {
        for local in self.border_vertices() {
            for candidate in other.vertices() {
                let mut renaming = Renaming::new();
                if two_vertices_consistent(self, local, other, candidate, &mut renaming, &NOOP_TRACE)
                    && !renaming.is_trivial()
                {
                    tracing::debug!(
                        local = %local.name,
                        other = %candidate.name,
                        "non-trivial border overlap"
                    );
                    return Some((local.name.clone(), candidate.name.clone()));
                }
            }
        }
        None
    }
}

impl PortView for Subgraph {
    fn vertex(&self, name: &VertexName) -> Option<&Vertex> {
        self.graph.vertex(name)
    }

    fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    fn semi_edges_at<'a>(
        &'a self,
        name: &'a VertexName,
    ) -> Box<dyn Iterator<Item = &'a SemiEdge> + 'a> {
        let low = SemiEdge::new(name.clone(), 0);
        let high = SemiEdge::new(name.clone(), Port::MAX);
        Box::new(self.semi_edges.range(low..=high))
    }

    fn contains_semi_edge(&self, half: &SemiEdge) -> bool {
        self.semi_edges.contains(half)
    }
}
