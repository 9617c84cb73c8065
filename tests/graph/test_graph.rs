use pcgd::prelude::*;

use proptest::proptest;

use super::strategy::{arb_graph, arb_graph_with_proposals, proposal_edge, GraphShape};

fn assert_ports_unique(graph: &Graph) {
    let mut used = std::collections::BTreeSet::new();
    for edge in graph.edges() {
        for half in edge.halves() {
            assert!(used.insert(half.clone()), "{half} used twice in {graph:?}");
        }
    }
}

proptest! {
    #[test]
    fn test_port_uniqueness(graph in arb_graph(GraphShape::default())) {
        assert_ports_unique(&graph);
        graph.validate().unwrap();
    }

    #[test]
    fn test_rejected_edges_conflict((graph, proposals) in arb_graph_with_proposals(GraphShape::default())) {
        // Every proposal is either in the graph or would reuse a port.
        for proposal in proposals {
            let edge = proposal_edge(proposal);
            if graph.contains_edge(&edge) {
                continue;
            }
            let mut extended = graph.clone();
            let err = extended.add_edge(edge).unwrap_err();
            assert!(matches!(err, GraphError::PortInUse { .. }), "{err}");
            assert_eq!(extended, graph);
        }
    }

    #[test]
    fn test_degree_counts_incident_edges(graph in arb_graph(GraphShape::default())) {
        let total: usize = graph.vertices().map(|v| graph.degree_of_vertex(&v.name)).sum();
        assert_eq!(total, 2 * graph.edge_count());
    }
}

#[test]
fn test_subgraph_semi_edges_and_edges_share_ports() {
    let mut s = Subgraph::empty();
    s.add_vertex(Vertex::new("X", 0)).unwrap();
    s.add_vertex(Vertex::new("Y", 0)).unwrap();
    s.add_semi_edge(SemiEdge::new("X", 0)).unwrap();

    let err = s.add_edge(Edge::new("Y", 0, "X", 0)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "trying to add edge {Y:0 , X:0}: port 0 of `X` already in use in (X:0)"
    );
    assert_eq!(s.edges().len(), 0);
    assert_eq!(s.degree_of_vertex(&"X".into()), 1);
}
