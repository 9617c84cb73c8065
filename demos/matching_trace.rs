use pcgd::prelude::*;
use std::cell::{Cell, RefCell};

struct PrintTrace {
    indent: Cell<usize>,
    bindings: RefCell<Vec<(String, String)>>,
}

impl PrintTrace {
    fn new() -> Self {
        Self {
            indent: Cell::new(0),
            bindings: RefCell::new(Vec::new()),
        }
    }

    fn indent(&self) -> usize {
        self.indent.get() * 2
    }

    fn print_solution(&self) {
        let parts: Vec<String> = self
            .bindings
            .borrow()
            .iter()
            .map(|(host, pattern)| format!("{pattern}->{host}"))
            .collect();
        println!("  solution [{}]", parts.join(", "));
    }
}

impl MatchTrace for PrintTrace {
    fn on_event(&self, event: MatchEvent<'_>) {
        match event {
            MatchEvent::Seed { host, seed } => {
                self.bindings.borrow_mut().clear();
                self.indent.set(0);
                println!("seed {seed} on host {host}");
            }
            MatchEvent::EnterFrame {
                local,
                other,
                depth: _,
            } => {
                self.indent.set(self.indent.get() + 1);
                println!("{:indent$}try {local} ~ {other}", "", indent = self.indent());
            }
            MatchEvent::Bind {
                local,
                other,
                depth: _,
            } => {
                self.bindings
                    .borrow_mut()
                    .push((local.to_string(), other.to_string()));
                println!("{:indent$}bind {local} -> {other}", "", indent = self.indent());
            }
            MatchEvent::Prune { reason, depth: _ } => {
                println!("{:indent$}prune: {reason}", "", indent = self.indent());
            }
            MatchEvent::ExitFrame {
                depth: _,
                consistent,
            } => {
                let verdict = if consistent { "ok" } else { "fail" };
                println!("{:indent$}{verdict}", "", indent = self.indent());
                self.indent.set(self.indent.get().saturating_sub(1));
            }
            MatchEvent::Solution => {
                self.print_solution();
            }
        }
    }
}

/// A triangle with one pendant vertex.
fn build_host() -> Result<Graph, GraphError> {
    let mut host = Graph::empty();
    for name in ["a", "b", "c"] {
        host.add_vertex(Vertex::new(name, 0))?;
    }
    host.add_vertex(Vertex::new("d", 1))?;
    host.add_edge(Edge::new("a", 1, "b", 0))?;
    host.add_edge(Edge::new("b", 1, "c", 0))?;
    host.add_edge(Edge::new("c", 1, "a", 0))?;
    host.add_edge(Edge::new("a", 2, "d", 0))?;
    Ok(host)
}

/// Two state-0 vertices joined from port 1 to port 0, each with one more connection.
fn build_pattern() -> Result<Subgraph, GraphError> {
    let mut pattern = Subgraph::empty();
    pattern.add_vertex(Vertex::new("X", 0))?;
    pattern.add_vertex(Vertex::new("Y", 0))?;
    pattern.add_edge(Edge::new("X", 1, "Y", 0))?;
    pattern.add_semi_edge(SemiEdge::new("X", 0))?;
    pattern.add_semi_edge(SemiEdge::new("Y", 1))?;
    Ok(pattern)
}

fn main() -> Result<(), GraphError> {
    let host = build_host()?;
    let pattern = build_pattern()?;
    let trace = PrintTrace::new();

    let found = host.find_pattern_traced(&pattern, Some(&trace));
    println!();
    println!("occurrences: {}", found.len());
    for renaming in &found {
        println!("  {renaming}");
    }
    Ok(())
}
