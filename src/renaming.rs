//! Bind-once partial maps between vertex names.
use std::collections::BTreeMap;
use std::fmt;

use crate::graph::{Edge, SemiEdge, Vertex, VertexName};
use crate::rewrite::RewriteFault;

/// A finite partial map from vertex names to vertex names.
///
/// A binding, once made, is never overwritten: [`Renaming::bind`] reports failure when the
/// antecedent is already bound, even to the same image. The matcher relies on this to reject
/// contradictory hypotheses without an explicit undo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renaming {
    map: BTreeMap<VertexName, VertexName>,
}

impl Renaming {
    pub fn new() -> Self {
        Renaming::default()
    }

    /// Record `from -> to`. Returns false, leaving the map unchanged, if `from` already has an
    /// image.
    pub fn bind(&mut self, from: VertexName, to: VertexName) -> bool {
        if self.map.contains_key(&from) {
            return false;
        }
        self.map.insert(from, to);
        true
    }

    pub fn get(&self, name: &VertexName) -> Option<&VertexName> {
        self.map.get(name)
    }

    pub fn contains_antecedent(&self, name: &VertexName) -> bool {
        self.map.contains_key(name)
    }

    pub fn contains_image(&self, name: &VertexName) -> bool {
        self.map.values().any(|image| image == name)
    }

    /// True iff every name is mapped to itself.
    pub fn is_trivial(&self) -> bool {
        self.map.iter().all(|(from, to)| from == to)
    }

    /// True iff no two antecedents share an image.
    pub fn is_injective(&self) -> bool {
        let mut seen = std::collections::BTreeSet::new();
        self.map.values().all(|image| seen.insert(image))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VertexName, &VertexName)> {
        self.map.iter()
    }

    /// The inverse map. Only meaningful for an injective renaming: when two antecedents share an
    /// image, the smaller antecedent wins.
    pub fn mirror(&self) -> Renaming {
        let mut inverse = Renaming::new();
        for (from, to) in &self.map {
            inverse.bind(to.clone(), from.clone());
        }
        inverse
    }

    fn image_of(&self, name: &VertexName, entity: impl fmt::Display) -> Result<VertexName, RewriteFault> {
        self.map
            .get(name)
            .cloned()
            .ok_or_else(|| RewriteFault::UndefinedRenaming {
                entity: entity.to_string(),
                name: name.clone(),
            })
    }

    pub fn apply_vertex(&self, vertex: &Vertex) -> Result<Vertex, RewriteFault> {
        let name = self.image_of(&vertex.name, format_args!("vertex {vertex}"))?;
        Ok(Vertex::new(name, vertex.state))
    }

    pub fn apply_semi_edge(&self, half: &SemiEdge) -> Result<SemiEdge, RewriteFault> {
        let name = self.image_of(&half.name, format_args!("semi-edge {half}"))?;
        Ok(SemiEdge::new(name, half.port))
    }

    pub fn apply_edge(&self, edge: &Edge) -> Result<Edge, RewriteFault> {
        let rename = |half: &SemiEdge| {
            self.image_of(&half.name, format_args!("edge {edge}"))
                .map(|name| SemiEdge::new(name, half.port))
        };
        Ok(Edge::from_halves(rename(edge.first())?, rename(edge.second())?))
    }
}

impl fmt::Display for Renaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (from, to)) in self.map.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{from} -> {to}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(VertexName, VertexName)> for Renaming {
    fn from_iter<I: IntoIterator<Item = (VertexName, VertexName)>>(iter: I) -> Self {
        let mut renaming = Renaming::new();
        for (from, to) in iter {
            renaming.bind(from, to);
        }
        renaming
    }
}
