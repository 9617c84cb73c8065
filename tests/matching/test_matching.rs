use pcgd::prelude::*;

use proptest::prelude::*;
use proptest::proptest;

use crate::graph::strategy::{arb_graph, edge_pattern, star_pattern, GraphShape};

/// Check that `renaming` places `pattern` inside `host`: states and degrees agree, pattern edges
/// are host edges, semi-edges land on used host ports, and distinct pattern vertices stay distinct.
fn assert_is_occurrence(host: &Graph, pattern: &Subgraph, renaming: &Renaming) {
    assert_eq!(renaming.len(), pattern.vertex_count());
    assert!(renaming.mirror().is_injective());

    for vertex in pattern.vertices() {
        let image = renaming.apply_vertex(vertex).unwrap();
        let host_vertex = host.vertex(&image.name).expect("image vertex in host");
        assert_eq!(host_vertex.state, vertex.state);
        assert_eq!(
            host.degree_of_vertex(&image.name),
            pattern.degree_of_vertex(&vertex.name)
        );
    }
    for edge in pattern.edges() {
        assert!(host.contains_edge(&renaming.apply_edge(edge).unwrap()));
    }
    for half in pattern.semi_edges() {
        let image = renaming.apply_semi_edge(half).unwrap();
        assert!(host.edge_for_half(&image).is_some(), "{image} unused in host");
    }
}

fn shape() -> GraphShape {
    GraphShape {
        max_vertices: 6,
        max_ports: 3,
        max_states: 2,
        max_edges: 8,
    }
}

fn arb_graph_and_vertex() -> impl Strategy<Value = (Graph, usize)> {
    arb_graph(shape()).prop_flat_map(|g| {
        let n = g.vertex_count();
        (Just(g), 0..n)
    })
}

proptest! {
    #[test]
    fn test_star_pattern_matches_its_vertex((host, idx) in arb_graph_and_vertex()) {
        let name = host.vertices().nth(idx).unwrap().name.clone();
        let pattern = star_pattern(&host, &name);

        let found = host.find_pattern(&pattern);
        for renaming in &found {
            assert_is_occurrence(&host, &pattern, renaming);
        }
        let x = VertexName::from("X");
        assert!(found.iter().any(|r| r.get(&x) == Some(&name)));
    }

    #[test]
    fn test_edge_pattern_matches_its_edge(host in arb_graph(shape())) {
        for edge in host.edges() {
            let pattern = edge_pattern(&host, edge);
            let found = host.find_pattern(&pattern);
            for renaming in &found {
                assert_is_occurrence(&host, &pattern, renaming);
            }
            let (x, y) = (VertexName::from("X"), VertexName::from("Y"));
            assert!(found.iter().any(|r| {
                r.get(&x) == Some(&edge.first().name) && r.get(&y) == Some(&edge.second().name)
            }));
        }
    }

    #[test]
    fn test_degree_is_exact((host, idx) in arb_graph_and_vertex(), extra in 0u32..2) {
        // One semi-edge more (or less) than the vertex has used ports never matches it.
        let name = host.vertices().nth(idx).unwrap().name.clone();
        let mut pattern = star_pattern(&host, &name);
        let degree = pattern.degree_of_vertex(&"X".into());
        if extra == 1 || degree == 0 {
            pattern.add_semi_edge(SemiEdge::new("X", 100)).unwrap();
        } else {
            let mut smaller = Subgraph::empty();
            let vertex = pattern.vertex(&"X".into()).unwrap().clone();
            smaller.add_vertex(vertex).unwrap();
            for half in pattern.semi_edges().skip(1) {
                smaller.add_semi_edge(half.clone()).unwrap();
            }
            pattern = smaller;
        }

        for renaming in host.find_pattern(&pattern) {
            assert_ne!(renaming.get(&"X".into()), Some(&name));
            assert_is_occurrence(&host, &pattern, &renaming);
        }
    }
}

#[test]
fn test_pattern_cycle_needs_distinct_host_vertices() {
    // A two-vertex cycle in the pattern cannot fold onto a single host vertex with a loop.
    let mut host = Graph::empty();
    host.add_vertex(Vertex::new("A", 0)).unwrap();
    host.add_edge(Edge::new("A", 0, "A", 1)).unwrap();

    let mut pattern = Subgraph::empty();
    pattern.add_vertex(Vertex::new("X", 0)).unwrap();
    pattern.add_vertex(Vertex::new("Y", 0)).unwrap();
    pattern.add_edge(Edge::new("X", 0, "Y", 1)).unwrap();
    assert!(host.find_pattern(&pattern).is_empty());
}

#[test]
fn test_square_in_square() {
    // a -1-0- b -1-0- c -1-0- d -1-0- a
    let mut host = Graph::empty();
    let names = ["a", "b", "c", "d"];
    for name in names {
        host.add_vertex(Vertex::new(name, 0)).unwrap();
    }
    for i in 0..4 {
        host.add_edge(Edge::new(names[i], 1, names[(i + 1) % 4], 0))
            .unwrap();
    }

    // an oriented path of two vertices, with its outside connections
    let mut pattern = Subgraph::empty();
    pattern.add_vertex(Vertex::new("X", 0)).unwrap();
    pattern.add_vertex(Vertex::new("Y", 0)).unwrap();
    pattern.add_edge(Edge::new("X", 1, "Y", 0)).unwrap();
    pattern.add_semi_edge(SemiEdge::new("X", 0)).unwrap();
    pattern.add_semi_edge(SemiEdge::new("Y", 1)).unwrap();

    let found = host.find_pattern(&pattern);
    assert_eq!(found.len(), 4);
    for renaming in &found {
        assert_is_occurrence(&host, &pattern, renaming);
    }
}
