use std::collections::BTreeSet;

use pcgd::prelude::*;

use proptest::collection::btree_set;
use proptest::prelude::*;
use proptest::proptest;

use crate::graph::strategy::{arb_graph, star_pattern, GraphShape};

fn used_ports(graph: &Graph, name: &VertexName) -> BTreeSet<Port> {
    graph
        .edges()
        .iter()
        .flat_map(|e| e.halves())
        .filter(|h| &h.name == name)
        .map(|h| h.port)
        .collect()
}

fn star(state: State, ports: &BTreeSet<Port>) -> Subgraph {
    let mut part = Subgraph::empty();
    part.add_vertex(Vertex::new("X", state)).unwrap();
    for port in ports {
        part.add_semi_edge(SemiEdge::new("X", *port)).unwrap();
    }
    part
}

/// Swap states 0 and 1 of every vertex whose used ports are exactly `ports`.
fn recolor(ports: &BTreeSet<Port>) -> Pcgd {
    let (zero, one) = (star(0, ports), star(1, ports));
    let alpha: AttachmentMap = zero.semi_edges().map(|s| (s.clone(), s.clone())).collect();

    let mut cycle = CyclicPermutation::new();
    cycle.add_part(zero).unwrap();
    cycle.add_part(one).unwrap();
    cycle.add_attachment(alpha.clone()).unwrap();
    cycle.add_attachment(alpha).unwrap();

    let mut program = Pcgd::new();
    program.add_permutation(cycle).unwrap();
    program
}

/// Every isolated vertex of state 0 grows a pendant vertex of state 2 and moves to state 1.
fn pendant_growth() -> Pcgd {
    parse_program(
        "
        dynamic:
          cycle:
            parts:
              subgraph:
                v:X(0)
              :endsubgraph
              subgraph:
                v:X(1)
                v:fresh(2)
                e:X:0,fresh:0
              :endsubgraph
            :endparts
            attachments:
              map:
              :endmap
              map:
              :endmap
            :endattachments
          :endcycle
        :enddynamic
        ",
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_recolor_keeps_structure(
        graph in arb_graph(GraphShape::default()),
        ports in btree_set(0u32..3, 0..3),
    ) {
        let mut rewritten = graph.clone();
        let stats = apply(&mut rewritten, &recolor(&ports)).unwrap();

        rewritten.validate().unwrap();
        assert_eq!(rewritten.edges(), graph.edges());
        assert_eq!(rewritten.vertex_count(), graph.vertex_count());
        assert_eq!(stats.splices_skipped, 0);

        let mut flipped = 0;
        for vertex in graph.vertices() {
            let after = rewritten.vertex(&vertex.name).unwrap();
            if used_ports(&graph, &vertex.name) == ports {
                assert_eq!(after.state, 1 - vertex.state);
                flipped += 1;
            } else {
                assert_eq!(after.state, vertex.state);
            }
        }
        assert_eq!(stats.replacements, flipped);
    }

    #[test]
    fn test_pendant_growth_stays_valid(graph in arb_graph(GraphShape::default())) {
        let isolated = graph
            .vertices()
            .filter(|v| v.state == 0 && graph.degree_of_vertex(&v.name) == 0)
            .count();

        let mut rewritten = graph.clone();
        let stats = apply(&mut rewritten, &pendant_growth()).unwrap();

        rewritten.validate().unwrap();
        assert_eq!(stats.vertices_created, isolated);
        assert_eq!(rewritten.vertex_count(), graph.vertex_count() + isolated);
        assert_eq!(rewritten.edge_count(), graph.edge_count() + isolated);
        assert_eq!(rewritten.fresh_counter(), isolated as u64);
    }

    #[test]
    fn test_faulting_replace_is_atomic(
        (graph, idx) in arb_graph(GraphShape::default()).prop_flat_map(|g| {
            let n = g.vertex_count();
            (Just(g), 0..n)
        })
    ) {
        let name = graph.vertices().nth(idx).unwrap().name.clone();
        let pattern = star_pattern(&graph, &name);
        let alpha: AttachmentMap = pattern.semi_edges().map(|s| (s.clone(), s.clone())).collect();

        let mut rewritten = graph.clone();
        let err = replace(&mut rewritten, &pattern, &pattern, &alpha, &Renaming::new()).unwrap_err();
        assert!(matches!(err, RewriteFault::UndefinedRenaming { .. }), "{err}");
        assert_eq!(rewritten, graph);
    }
}

#[test]
fn test_identity_rule_scenario() {
    let mut graph = parse_graph("graph:\n v:A(0)\n:endgraph").unwrap();
    let program = parse_program(
        "
        dynamic:
          cycle:
            parts:
              subgraph:
                v:X(0)
              :endsubgraph
            :endparts
            attachments:
              map:
              :endmap
            :endattachments
          :endcycle
        :enddynamic
        ",
    )
    .unwrap();

    for _ in 0..3 {
        apply(&mut graph, &program).unwrap();
        let vertices: Vec<_> = graph.vertices().cloned().collect();
        assert_eq!(vertices, vec![Vertex::new("A", 0)]);
        assert_eq!(graph.edge_count(), 0);
    }
}

#[test]
fn test_symmetric_part_scenario() {
    let mut graph = parse_graph(
        "
        graph:
          v:A(0)
          v:B(0)
          e:A:0,B:0
        :endgraph
        ",
    )
    .unwrap();
    let program = parse_program(
        "
        dynamic:
          cycle:
            parts:
              subgraph:
                v:X(0)
                s:X:0
              :endsubgraph
              subgraph:
                v:X(0)
                s:X:0
              :endsubgraph
            :endparts
            attachments:
              map:
                (X:0)(X:0)
              :endmap
              map:
                (X:0)(X:0)
              :endmap
            :endattachments
          :endcycle
        :enddynamic
        ",
    )
    .unwrap();

    apply(&mut graph, &program).unwrap();
    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.vertices().all(|v| v.state == 0));
    let edge = &graph.edges()[0];
    assert_ne!(edge.first().name, edge.second().name);
    for half in edge.halves() {
        assert!(graph.contains_vertex(&half.name));
    }
    graph.validate().unwrap();
}
