//! # PCGD
//!
//! Port graph dynamics: a host [`Graph`](crate::graph::Graph) evolves in discrete steps under a
//! program of *cyclic rewrite rules*.
//!
//! A port graph is a set of named vertices, each carrying an integer state, joined by edges that
//! occupy one numbered port at each end:
//!
//! ```text
//!     ┌──────┐ 0      0 ┌──────┐
//!     │ A(0) │──────────│ B(0) │
//!     └──────┘          └──────┘
//! ```
//!
//! A rule is a [`CyclicPermutation`](crate::rule::CyclicPermutation): a cycle of pattern
//! [`Subgraph`](crate::graph::Subgraph)s `P0 .. P(k-1)` whose dangling half-edges
//! (*semi-edges*) stand for the connections of an occurrence to the rest of the graph. Each step,
//! every occurrence of `Pi` is replaced by `P(i+1) mod k`, and the host edges cut by the pattern
//! are re-attached to the new part through an attachment map.
//!
//! # Example
//!
//! Grow a pendant vertex on every vertex of state 0, turning it to state 1:
//!
//! ```rust
//! use pcgd::prelude::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let mut graph = parse_graph("
//!     graph:
//!       v:A(0)
//!       v:B(0)
//!       e:A:0,B:0
//!     :endgraph
//! ")?;
//!
//! // `fresh` marks a vertex which the rewrite creates.
//! let program = parse_program("
//!     dynamic:
//!       cycle:
//!         parts:
//!           subgraph:
//!             v:X(0)
//!             s:X:0
//!           :endsubgraph
//!           subgraph:
//!             v:X(1)
//!             v:fresh(2)
//!             e:X:1,fresh:0
//!             s:X:0
//!           :endsubgraph
//!         :endparts
//!         attachments:
//!           map:
//!             (X:0)(X:0)
//!           :endmap
//!           map:
//!             (X:0)(X:0)
//!           :endmap
//!         :endattachments
//!       :endcycle
//!     :enddynamic
//! ")?;
//!
//! let stats = apply(&mut graph, &program)?;
//! assert_eq!(stats.vertices_created, 2);
//! assert_eq!(graph.vertex_count(), 4);
//! assert_eq!(graph.edge_count(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Matching
//!
//! Occurrences are found by [`Graph::find_pattern`](crate::graph::Graph::find_pattern), which
//! glues one seed vertex of the pattern onto each host vertex in turn and propagates along edges.
//! Matching is exact on degree: a pattern vertex matches only host vertices with as many used
//! ports as it has edges and semi-edges. Pass a [`MatchTrace`](crate::matching::MatchTrace) to
//! [`Graph::find_pattern_traced`](crate::graph::Graph::find_pattern_traced) to observe the search.
//!
//! The [`driver`] module runs a program for a number of steps and writes JSON
//! [`snapshot`]s; the `pcgd` binary is a thin command line wrapper around it.
pub mod graph;
pub mod matching;
pub mod renaming;

pub mod rewrite;
pub mod rule;

pub mod driver;
pub mod loader;
pub mod snapshot;

pub mod prelude {
    //! The types and functions needed to build, load and rewrite graphs.
    pub use crate::graph::{
        Edge, Graph, GraphError, Port, PortView, SemiEdge, State, Subgraph, Vertex, VertexName,
    };
    pub use crate::loader::{load_graph, load_program, parse_graph, parse_program, parse_subgraph};
    pub use crate::matching::{MatchEvent, MatchTrace};
    pub use crate::renaming::Renaming;
    pub use crate::rewrite::{apply, apply_cycle, replace, RewriteFault, RewriteStats};
    pub use crate::rule::{AttachmentMap, CyclicPermutation, Pcgd, StructuralError};
    pub use crate::snapshot::Snapshot;
}
