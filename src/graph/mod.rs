//! Port graphs: named, labelled vertices joined by edges that consume one port at each end.
//!
//! A [`Graph`] is a closed host graph. A [`Subgraph`] additionally carries dangling half-edges
//! ([`SemiEdge`]s) which stand for connections to the rest of a host graph; subgraphs are the
//! patterns of rewrite rules.
//!
//! Both containers maintain *port uniqueness*: a `(vertex, port)` pair is consumed by at most one
//! edge (or semi-edge). The matcher relies on this to follow edges deterministically.
pub mod subgraph;
pub mod view;

pub use subgraph::Subgraph;
pub use view::PortView;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Integer label carried by a vertex.
pub type State = i32;

/// Port number on a vertex.
pub type Port = u32;

/// Text prefix used when rendering [`VertexName::Generated`] names.
pub const GENERATED_PREFIX: &str = "newVertex";

/// The name of a vertex.
///
/// Names given by the user are [`VertexName::Bound`]. Vertices created by a rewrite receive a
/// [`VertexName::Generated`] name from the host graph's counter, which can never collide with a
/// user name. [`VertexName::Fresh`] placeholders only appear in rule parts, where they stand for
/// a vertex the rewrite must create.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VertexName {
    Bound(String),
    Generated(u64),
    Fresh(String),
}

impl VertexName {
    pub fn bound(name: impl Into<String>) -> Self {
        VertexName::Bound(name.into())
    }

    pub fn fresh(id: impl Into<String>) -> Self {
        VertexName::Fresh(id.into())
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, VertexName::Fresh(_))
    }
}

impl fmt::Display for VertexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexName::Bound(name) => write!(f, "{name}"),
            VertexName::Generated(n) => write!(f, "{GENERATED_PREFIX}{n}"),
            VertexName::Fresh(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for VertexName {
    fn from(name: &str) -> Self {
        VertexName::Bound(name.to_string())
    }
}

/// A vertex. Identity within a graph is the name; equality also compares the state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub name: VertexName,
    pub state: State,
}

impl Vertex {
    pub fn new(name: impl Into<VertexName>, state: State) -> Self {
        Vertex {
            name: name.into(),
            state,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.state)
    }
}

/// One endpoint `(vertex, port)`.
///
/// Inside a [`Subgraph`] a `SemiEdge` is a half-edge whose other end lies outside the pattern.
/// It is also used as the "half" of an [`Edge`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemiEdge {
    pub name: VertexName,
    pub port: Port,
}

impl SemiEdge {
    pub fn new(name: impl Into<VertexName>, port: Port) -> Self {
        SemiEdge {
            name: name.into(),
            port,
        }
    }
}

impl fmt::Display for SemiEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.name, self.port)
    }
}

/// An unordered pair of endpoints. `{a, b}` and `{b, a}` are the same edge.
#[derive(Debug, Clone, Eq)]
pub struct Edge {
    ends: [SemiEdge; 2],
}

impl Edge {
    pub fn new(name1: impl Into<VertexName>, port1: Port, name2: impl Into<VertexName>, port2: Port) -> Self {
        Self::from_halves(SemiEdge::new(name1, port1), SemiEdge::new(name2, port2))
    }

    pub fn from_halves(a: SemiEdge, b: SemiEdge) -> Self {
        Edge { ends: [a, b] }
    }

    pub fn first(&self) -> &SemiEdge {
        &self.ends[0]
    }

    pub fn second(&self) -> &SemiEdge {
        &self.ends[1]
    }

    pub fn halves(&self) -> impl Iterator<Item = &SemiEdge> {
        self.ends.iter()
    }

    pub fn has_half(&self, half: &SemiEdge) -> bool {
        self.ends.iter().any(|end| end == half)
    }

    pub fn touches(&self, name: &VertexName) -> bool {
        self.ends.iter().any(|end| &end.name == name)
    }

    /// The end opposite to `half`, if `half` is one of this edge's ends.
    pub fn opposite(&self, half: &SemiEdge) -> Option<&SemiEdge> {
        if &self.ends[0] == half {
            Some(&self.ends[1])
        } else if &self.ends[1] == half {
            Some(&self.ends[0])
        } else {
            None
        }
    }

    /// The `(near, far)` halves of this edge seen from vertex `name`, once per end on `name`.
    /// A loop yields both of its orientations.
    pub fn ends_at<'a>(
        &'a self,
        name: &'a VertexName,
    ) -> impl Iterator<Item = (&'a SemiEdge, &'a SemiEdge)> + 'a {
        [(&self.ends[0], &self.ends[1]), (&self.ends[1], &self.ends[0])]
            .into_iter()
            .filter(move |(near, _)| &near.name == name)
    }

    /// Position (0 or 1) of the end equal to `half`.
    pub fn end_index(&self, half: &SemiEdge) -> Option<usize> {
        self.ends.iter().position(|end| end == half)
    }

    /// Replace end `idx` (0 or 1) with `half`.
    pub(crate) fn set_end(&mut self, idx: usize, half: SemiEdge) {
        self.ends[idx & 1] = half;
    }

    fn normalized(&self) -> (&SemiEdge, &SemiEdge) {
        if self.ends[0] <= self.ends[1] {
            (&self.ends[0], &self.ends[1])
        } else {
            (&self.ends[1], &self.ends[0])
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}:{} , {}:{}}}",
            self.ends[0].name, self.ends[0].port, self.ends[1].name, self.ends[1].port
        )
    }
}

/// Construction errors raised by [`Graph`] and [`Subgraph`] mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("trying to add vertex {vertex}: conflicting vertex name `{}`", .vertex.name)]
    NameConflict { vertex: Vertex },

    #[error("trying to add {entity}: vertex `{name}` not in the graph")]
    UnknownVertex { entity: String, name: VertexName },

    #[error("trying to add {entity}: port {} of `{}` already in use in {holder}", .half.port, .half.name)]
    PortInUse {
        entity: String,
        half: SemiEdge,
        holder: String,
    },

    #[error("trying to add edge {edge}: an edge between `{}` and itself is forbidden in a subgraph", .edge.first().name)]
    SelfLoop { edge: Edge },
}

/// A closed port graph: the host graph rewritten by a rule program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub(crate) vertices: BTreeMap<VertexName, Vertex>,
    pub(crate) edges: Vec<Edge>,
    fresh_counter: u64,
}

impl Graph {
    /// The empty graph with no vertices or edges.
    pub fn empty() -> Self {
        Graph::default()
    }

    /// Add a vertex. Fails if a vertex of the same name exists.
    ///
    /// Adding a [`VertexName::Generated`] name advances the fresh counter past it, so later
    /// generated names remain unique.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<(), GraphError> {
        if self.vertices.contains_key(&vertex.name) {
            return Err(GraphError::NameConflict { vertex });
        }
        if let VertexName::Generated(n) = vertex.name {
            self.fresh_counter = self.fresh_counter.max(n);
        }
        self.vertices.insert(vertex.name.clone(), vertex);
        Ok(())
    }

    /// Add an edge. Both endpoints must exist and both `(vertex, port)` pairs must be free.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.check_edge_endpoints(&edge)?;
        check_ports_free(&edge, &self.edges, std::iter::empty())?;
        self.edges.push(edge);
        Ok(())
    }

    fn check_edge_endpoints(&self, edge: &Edge) -> Result<(), GraphError> {
        for end in edge.halves() {
            if !self.vertices.contains_key(&end.name) {
                return Err(GraphError::UnknownVertex {
                    entity: format!("edge {edge}"),
                    name: end.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn vertex(&self, name: &VertexName) -> Option<&Vertex> {
        self.vertices.get(name)
    }

    pub fn contains_vertex(&self, name: &VertexName) -> bool {
        self.vertices.contains_key(name)
    }

    /// Vertices in name order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if `edge` (in either orientation) is present.
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Number of ports of `name` used by edges. A loop uses two.
    pub fn degree_of_vertex(&self, name: &VertexName) -> usize {
        self.edges.iter().map(|e| e.ends_at(name).count()).sum()
    }

    /// The last value handed out by the fresh-name counter.
    pub fn fresh_counter(&self) -> u64 {
        self.fresh_counter
    }

    /// Allocate a new, never reused, vertex name.
    pub fn next_fresh_name(&mut self) -> VertexName {
        self.fresh_counter += 1;
        VertexName::Generated(self.fresh_counter)
    }

    pub(crate) fn set_fresh_counter(&mut self, value: u64) {
        self.fresh_counter = value;
    }

    /// Check the graph invariants: every edge endpoint exists and no `(vertex, port)` pair is
    /// used twice. Rewriting never checks this itself.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (idx, edge) in self.edges.iter().enumerate() {
            self.check_edge_endpoints(edge)?;
            check_ports_free(edge, &self.edges[..idx], std::iter::empty())?;
        }
        Ok(())
    }
}

/// Check that neither end of `edge` is already used by one of `edges` or `semi_edges`, and that
/// the edge does not use the same `(vertex, port)` twice.
pub(crate) fn check_ports_free<'a>(
    edge: &Edge,
    edges: &[Edge],
    semi_edges: impl Iterator<Item = &'a SemiEdge> + Clone,
) -> Result<(), GraphError> {
    if edge.first() == edge.second() {
        return Err(GraphError::PortInUse {
            entity: format!("edge {edge}"),
            half: edge.first().clone(),
            holder: edge.to_string(),
        });
    }
    for end in edge.halves() {
        if let Some(holder) = edges.iter().find(|e| e.has_half(end)) {
            return Err(GraphError::PortInUse {
                entity: format!("edge {edge}"),
                half: end.clone(),
                holder: holder.to_string(),
            });
        }
        if let Some(holder) = semi_edges.clone().find(|s| *s == end) {
            return Err(GraphError::PortInUse {
                entity: format!("edge {edge}"),
                half: end.clone(),
                holder: holder.to_string(),
            });
        }
    }
    Ok(())
}
