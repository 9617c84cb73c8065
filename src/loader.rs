//! Reading graphs and rule programs from their line-oriented text format.
//!
//! ```text
//! graph:                 dynamic:
//!   v:A(0)                 cycle:
//!   v:B(0)                   parts:
//!   e:A:0,B:0                  subgraph:
//! :endgraph                      v:X(0)
//!                                s:X:0
//!                              :endsubgraph
//!                            :endparts
//!                            attachments:
//!                              map:
//!                                (X:0)(X:0)
//!                              :endmap
//!                            :endattachments
//!                          :endcycle
//!                        :enddynamic
//! ```
//!
//! Whitespace is insignificant and `//` starts a comment. A vertex name containing `fresh` is a
//! placeholder for a vertex created by a rewrite; `newVertex<n>` names a previously generated
//! vertex.
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::graph::{
    Edge, Graph, GraphError, Port, SemiEdge, State, Subgraph, Vertex, VertexName, GENERATED_PREFIX,
};
use crate::rule::{AttachmentMap, CyclicPermutation, Pcgd, StructuralError};

/// Substring marking a fresh-vertex placeholder in the text format.
pub const FRESH_MARKER: &str = "fresh";

const GRAPH_BEGIN: &str = "graph:";
const GRAPH_END: &str = ":endgraph";
const SUBGRAPH_BEGIN: &str = "subgraph:";
const SUBGRAPH_END: &str = ":endsubgraph";
const DYNAMIC_BEGIN: &str = "dynamic:";
const DYNAMIC_END: &str = ":enddynamic";
const CYCLE_BEGIN: &str = "cycle:";
const CYCLE_END: &str = ":endcycle";
const PARTS_BEGIN: &str = "parts:";
const PARTS_END: &str = ":endparts";
const ATTACHMENTS_BEGIN: &str = "attachments:";
const ATTACHMENTS_END: &str = ":endattachments";
const MAP_BEGIN: &str = "map:";
const MAP_END: &str = ":endmap";
const COMMENT: &str = "//";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input, expected `{expected}`")]
    UnexpectedEof { expected: &'static str },

    #[error("line {line}: expected `{expected}`, found `{found}`")]
    Expected {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: malformed {what} `{text}`")]
    Malformed {
        line: usize,
        what: &'static str,
        text: String,
    },

    #[error("line {line}: unexpected line `{text}` in {block}")]
    Unexpected {
        line: usize,
        block: &'static str,
        text: String,
    },

    #[error("line {line}: fresh vertex `{name}` is not allowed in a host graph")]
    FreshInGraph { line: usize, name: VertexName },

    #[error("line {line}: image of {half} already defined as {previous}")]
    DuplicateAttachment {
        line: usize,
        half: SemiEdge,
        previous: SemiEdge,
    },

    #[error("line {line}: {source}")]
    Graph { line: usize, source: GraphError },

    #[error("line {line}: {source}")]
    Structural {
        line: usize,
        source: StructuralError,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("in {}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },
}

/// Parse a `graph:` block.
pub fn parse_graph(text: &str) -> Result<Graph, ParseError> {
    let mut lines = Lines::new(text);
    lines.expect(GRAPH_BEGIN)?;
    graph_body(&mut lines)
}

/// Parse a `subgraph:` block.
pub fn parse_subgraph(text: &str) -> Result<Subgraph, ParseError> {
    let mut lines = Lines::new(text);
    lines.expect(SUBGRAPH_BEGIN)?;
    subgraph_body(&mut lines)
}

/// Parse a `dynamic:` block into a rule program.
pub fn parse_program(text: &str) -> Result<Pcgd, ParseError> {
    let mut lines = Lines::new(text);
    lines.expect(DYNAMIC_BEGIN)?;
    let mut program = Pcgd::new();
    loop {
        let line = lines.next_line(DYNAMIC_END)?;
        if line == DYNAMIC_END {
            break;
        }
        lines.check(&line, CYCLE_BEGIN)?;
        let start = lines.number;
        let cycle = cycle_body(&mut lines)?;
        program
            .add_permutation(cycle)
            .map_err(|source| ParseError::Structural { line: start, source })?;
    }
    Ok(program)
}

pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph, LoadError> {
    load(path.as_ref(), parse_graph)
}

pub fn load_program(path: impl AsRef<Path>) -> Result<Pcgd, LoadError> {
    load(path.as_ref(), parse_program)
}

fn load<T>(path: &Path, parse: fn(&str) -> Result<T, ParseError>) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded");
    Ok(parsed)
}

/// Cursor over the significant lines of the input.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    number: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            inner: text.lines().enumerate(),
            number: 0,
        }
    }

    /// The next line with whitespace and comments removed, skipping lines left empty.
    fn next_line(&mut self, expected: &'static str) -> Result<String, ParseError> {
        for (idx, raw) in self.inner.by_ref() {
            self.number = idx + 1;
            let mut line: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if let Some(comment) = line.find(COMMENT) {
                line.truncate(comment);
            }
            if !line.is_empty() {
                return Ok(line);
            }
        }
        Err(ParseError::UnexpectedEof { expected })
    }

    fn check(&self, line: &str, expected: &'static str) -> Result<(), ParseError> {
        if line != expected {
            return Err(ParseError::Expected {
                line: self.number,
                expected,
                found: line.to_string(),
            });
        }
        Ok(())
    }

    fn expect(&mut self, expected: &'static str) -> Result<(), ParseError> {
        let line = self.next_line(expected)?;
        self.check(&line, expected)
    }

    fn malformed(&self, what: &'static str, text: &str) -> ParseError {
        ParseError::Malformed {
            line: self.number,
            what,
            text: text.to_string(),
        }
    }

    fn graph_error(&self, source: GraphError) -> ParseError {
        ParseError::Graph {
            line: self.number,
            source,
        }
    }
}

fn graph_body(lines: &mut Lines) -> Result<Graph, ParseError> {
    let mut graph = Graph::empty();
    loop {
        let line = lines.next_line(GRAPH_END)?;
        if line == GRAPH_END {
            return Ok(graph);
        }
        if let Some(text) = line.strip_prefix("v:") {
            let vertex = parse_vertex(lines, text)?;
            if vertex.name.is_fresh() {
                return Err(ParseError::FreshInGraph {
                    line: lines.number,
                    name: vertex.name,
                });
            }
            graph.add_vertex(vertex).map_err(|e| lines.graph_error(e))?;
        } else if let Some(text) = line.strip_prefix("e:") {
            let edge = parse_edge(lines, text)?;
            graph.add_edge(edge).map_err(|e| lines.graph_error(e))?;
        } else {
            return Err(ParseError::Unexpected {
                line: lines.number,
                block: "graph",
                text: line,
            });
        }
    }
}

fn subgraph_body(lines: &mut Lines) -> Result<Subgraph, ParseError> {
    let mut subgraph = Subgraph::empty();
    loop {
        let line = lines.next_line(SUBGRAPH_END)?;
        if line == SUBGRAPH_END {
            return Ok(subgraph);
        }
        let added = if let Some(text) = line.strip_prefix("v:") {
            subgraph.add_vertex(parse_vertex(lines, text)?)
        } else if let Some(text) = line.strip_prefix("e:") {
            subgraph.add_edge(parse_edge(lines, text)?)
        } else if let Some(text) = line.strip_prefix("s:") {
            subgraph.add_semi_edge(parse_half(lines, "semi-edge", text)?)
        } else {
            return Err(ParseError::Unexpected {
                line: lines.number,
                block: "subgraph",
                text: line,
            });
        };
        added.map_err(|e| lines.graph_error(e))?;
    }
}

fn cycle_body(lines: &mut Lines) -> Result<CyclicPermutation, ParseError> {
    let mut cycle = CyclicPermutation::new();

    lines.expect(PARTS_BEGIN)?;
    loop {
        let line = lines.next_line(PARTS_END)?;
        if line == PARTS_END {
            break;
        }
        lines.check(&line, SUBGRAPH_BEGIN)?;
        let start = lines.number;
        let part = subgraph_body(lines)?;
        cycle
            .add_part(part)
            .map_err(|source| ParseError::Structural { line: start, source })?;
    }

    lines.expect(ATTACHMENTS_BEGIN)?;
    loop {
        let line = lines.next_line(ATTACHMENTS_END)?;
        if line == ATTACHMENTS_END {
            break;
        }
        lines.check(&line, MAP_BEGIN)?;
        let start = lines.number;
        let attachment = map_body(lines)?;
        cycle
            .add_attachment(attachment)
            .map_err(|source| ParseError::Structural { line: start, source })?;
    }

    lines.expect(CYCLE_END)?;
    Ok(cycle)
}

fn map_body(lines: &mut Lines) -> Result<AttachmentMap, ParseError> {
    let mut map = AttachmentMap::new();
    loop {
        let line = lines.next_line(MAP_END)?;
        if line == MAP_END {
            return Ok(map);
        }
        let (from, to) = line
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .and_then(|rest| rest.split_once(")("))
            .ok_or_else(|| lines.malformed("attachment", &line))?;
        let from = parse_half(lines, "attachment", from)?;
        let to = parse_half(lines, "attachment", to)?;
        if let Some(previous) = map.insert(from.clone(), to) {
            return Err(ParseError::DuplicateAttachment {
                line: lines.number,
                half: from,
                previous,
            });
        }
    }
}

fn parse_name(lines: &Lines, text: &str) -> Result<VertexName, ParseError> {
    if text.is_empty() || text.contains(&['(', ')', ':', ','][..]) {
        return Err(lines.malformed("vertex name", text));
    }
    if text.contains(FRESH_MARKER) {
        return Ok(VertexName::fresh(text));
    }
    let generated = text
        .strip_prefix(GENERATED_PREFIX)
        .filter(|digits| is_canonical_number(digits))
        .and_then(|digits| digits.parse().ok());
    Ok(match generated {
        Some(n) => VertexName::Generated(n),
        None => VertexName::bound(text),
    })
}

/// Digits as `u64` displays them: no sign, no leading zero.
fn is_canonical_number(digits: &str) -> bool {
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

/// `NAME(STATE)`
fn parse_vertex(lines: &Lines, text: &str) -> Result<Vertex, ParseError> {
    let (name, state) = text
        .split_once('(')
        .and_then(|(name, rest)| Some((name, rest.strip_suffix(')')?.parse::<State>().ok()?)))
        .ok_or_else(|| lines.malformed("vertex", text))?;
    Ok(Vertex::new(parse_name(lines, name)?, state))
}

/// `NAME:PORT`
fn parse_half(lines: &Lines, what: &'static str, text: &str) -> Result<SemiEdge, ParseError> {
    let (name, port) = text
        .split_once(':')
        .and_then(|(name, port)| Some((name, port.parse::<Port>().ok()?)))
        .ok_or_else(|| lines.malformed(what, text))?;
    Ok(SemiEdge::new(parse_name(lines, name)?, port))
}

/// `NAME:PORT,NAME:PORT`
fn parse_edge(lines: &Lines, text: &str) -> Result<Edge, ParseError> {
    let (a, b) = text
        .split_once(',')
        .ok_or_else(|| lines.malformed("edge", text))?;
    Ok(Edge::from_halves(
        parse_half(lines, "edge", a)?,
        parse_half(lines, "edge", b)?,
    ))
}
