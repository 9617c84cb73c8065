use std::collections::BTreeSet;

use pcgd::loader::ParseError;
use pcgd::prelude::*;

use proptest::collection::btree_set;
use proptest::prelude::*;
use proptest::proptest;

/// One vertex `name` in `state` with a semi-edge on every port of `ports`.
fn border_part(name: &str, state: State, ports: &BTreeSet<Port>) -> Subgraph {
    let mut part = Subgraph::empty();
    part.add_vertex(Vertex::new(name, state)).unwrap();
    for port in ports {
        part.add_semi_edge(SemiEdge::new(name, *port)).unwrap();
    }
    part
}

fn identity(part: &Subgraph) -> AttachmentMap {
    part.semi_edges().map(|s| (s.clone(), s.clone())).collect()
}

fn arb_ports() -> impl Strategy<Value = BTreeSet<Port>> {
    btree_set(0u32..6, 1..4)
}

proptest! {
    #[test]
    fn test_renamed_part_overlaps(state in 0i32..3, ports in arb_ports()) {
        let mut cycle = CyclicPermutation::new();
        cycle.add_part(border_part("X", state, &ports)).unwrap();

        let err = cycle.add_part(border_part("Y", state, &ports)).unwrap_err();
        assert_eq!(
            err,
            StructuralError::Overlap {
                first: 1,
                second: 0,
                local: "Y".into(),
                other: "X".into(),
            }
        );
        assert_eq!(cycle.part_count(), 1);
    }

    #[test]
    fn test_same_part_twice_accepted(state in 0i32..3, ports in arb_ports()) {
        let part = border_part("X", state, &ports);
        let mut cycle = CyclicPermutation::new();
        cycle.add_part(part.clone()).unwrap();
        cycle.add_part(part.clone()).unwrap();
        cycle.add_attachment(identity(&part)).unwrap();
        cycle.add_attachment(identity(&part)).unwrap();
        assert_eq!(cycle.size(), Some(2));

        let mut program = Pcgd::new();
        program.add_permutation(cycle).unwrap();
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn test_attachment_missing_semi_edge(
        (ports, dropped) in arb_ports().prop_flat_map(|ports| {
            let n = ports.len();
            (Just(ports), 0..n)
        })
    ) {
        let part = border_part("X", 0, &ports);
        let dropped = part.semi_edges().nth(dropped).unwrap().clone();
        let alpha: AttachmentMap = part
            .semi_edges()
            .filter(|s| **s != dropped)
            .map(|s| (s.clone(), s.clone()))
            .collect();

        let mut cycle = CyclicPermutation::new();
        cycle.add_part(part).unwrap();
        let err = cycle.add_attachment(alpha).unwrap_err();
        assert_eq!(err, StructuralError::MissingFromDomain { half: dropped.clone(), part: 0 });
        assert!(err.to_string().contains(&dropped.to_string()));
    }

    #[test]
    fn test_attachment_extra_semi_edge(ports in arb_ports(), extra in 6u32..10) {
        let part = border_part("X", 0, &ports);
        let mut alpha = identity(&part);
        let first = part.semi_edges().next().unwrap().clone();
        alpha.insert(SemiEdge::new("X", extra), first);

        let mut cycle = CyclicPermutation::new();
        cycle.add_part(part).unwrap();
        let err = cycle.add_attachment(alpha).unwrap_err();
        assert_eq!(
            err,
            StructuralError::ExtraInDomain { half: SemiEdge::new("X", extra), attachment: 0 }
        );
    }
}

#[test]
fn test_extra_domain_semi_edge_in_program_text() {
    let text = "
        dynamic:
          cycle:
            parts:
              subgraph:
                v:X(0)
                s:X:0
              :endsubgraph
            :endparts
            attachments:
              map:
                (X:0)(X:0)
                (X:1)(X:0)
              :endmap
            :endattachments
          :endcycle
        :enddynamic
    ";
    let err = parse_program(text).unwrap_err();
    let ParseError::Structural { source, .. } = &err else {
        panic!("expected a structural error, got {err}");
    };
    assert_eq!(
        source.to_string(),
        "semi-edge (X:1) of the domain of attachment 0 does not appear in part 0"
    );
}

#[test]
fn test_cycle_missing_attachments_rejected_by_program() {
    let mut cycle = CyclicPermutation::new();
    cycle.add_part(border_part("X", 0, &BTreeSet::from([0]))).unwrap();
    cycle.add_part(border_part("X", 1, &BTreeSet::from([0]))).unwrap();
    cycle
        .add_attachment(identity(&border_part("X", 0, &BTreeSet::from([0]))))
        .unwrap();

    let mut program = Pcgd::new();
    assert_eq!(
        program.add_permutation(cycle),
        Err(StructuralError::SizeMismatch {
            parts: 2,
            attachments: 1
        })
    );
    assert!(program.is_empty());
}
