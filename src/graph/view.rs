use super::{Edge, Graph, SemiEdge, Vertex, VertexName};

/// Read access to a port graph, shared by [`Graph`] and [`super::Subgraph`].
///
/// The matcher is written once against this trait. A closed [`Graph`] exposes no semi-edges,
/// so the semi-edge checks of the matcher are vacuous when the local side is a host graph.
pub trait PortView {
    fn vertex(&self, name: &VertexName) -> Option<&Vertex>;

    fn edges(&self) -> &[Edge];

    /// Semi-edges carried by vertex `name`.
    fn semi_edges_at<'a>(&'a self, name: &'a VertexName)
        -> Box<dyn Iterator<Item = &'a SemiEdge> + 'a>;

    fn contains_semi_edge(&self, half: &SemiEdge) -> bool;

    /// Used ports of `name`: edge ends plus semi-edges.
    fn degree(&self, name: &VertexName) -> usize {
        let edges: usize = self.edges().iter().map(|e| e.ends_at(name).count()).sum();
        edges + self.semi_edges_at(name).count()
    }

    /// The edge having `half` as one of its ends.
    fn edge_for_half(&self, half: &SemiEdge) -> Option<&Edge> {
        self.edges().iter().find(|e| e.has_half(half))
    }
}

impl PortView for Graph {
    fn vertex(&self, name: &VertexName) -> Option<&Vertex> {
        self.vertices.get(name)
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn semi_edges_at<'a>(
        &'a self,
        _name: &'a VertexName,
    ) -> Box<dyn Iterator<Item = &'a SemiEdge> + 'a> {
        Box::new(std::iter::empty())
    }

    fn contains_semi_edge(&self, _half: &SemiEdge) -> bool {
        false
    }
}
