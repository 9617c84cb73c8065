//! Cyclic rewrite rules.
//!
//! A [`CyclicPermutation`] is a cycle of pattern subgraphs `P0 .. P(k-1)` together with
//! attachment maps `αi : semi-edges(Pi) -> semi-edges(P(i+1) mod k)`. Rewriting replaces each
//! occurrence of `Pi` with `P(i+1)`, re-wiring the host edges cut by the pattern through `αi`.
pub mod program;

pub use program::Pcgd;

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::graph::{SemiEdge, Subgraph, VertexName};

/// Reasons a rule or rule program is ill-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("an attachment map has already been added, add all parts first")]
    AttachmentsStarted,

    #[error("self-overlap risk in part {part} between vertices `{local}` and `{other}`")]
    SelfOverlap {
        part: usize,
        local: VertexName,
        other: VertexName,
    },

    #[error("overlap risk between part {first} and part {second} between vertices `{local}` and `{other}`")]
    Overlap {
        first: usize,
        second: usize,
        local: VertexName,
        other: VertexName,
    },

    #[error("number of attachments exceeding number of parts")]
    TooManyAttachments,

    #[error("semi-edge {half} of part {part} does not appear in the domain of attachment {part}")]
    MissingFromDomain { half: SemiEdge, part: usize },

    #[error("semi-edge {half} of the domain of attachment {attachment} does not appear in part {attachment}")]
    ExtraInDomain { half: SemiEdge, attachment: usize },

    #[error("semi-edge {half} of part {part} does not appear in the image of attachment {attachment}")]
    MissingFromImage {
        half: SemiEdge,
        part: usize,
        attachment: usize,
    },

    #[error("semi-edge {half} of the image of attachment {attachment} does not appear in part {part}")]
    ExtraInImage {
        half: SemiEdge,
        attachment: usize,
        part: usize,
    },

    #[error("semi-edge {half} is the image of more than one semi-edge in attachment {attachment}")]
    NotInjective { half: SemiEdge, attachment: usize },

    #[error("cyclic permutation has {parts} parts but {attachments} attachment maps")]
    SizeMismatch { parts: usize, attachments: usize },
}

/// The wiring from one part's semi-edges to the next part's semi-edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentMap {
    map: BTreeMap<SemiEdge, SemiEdge>,
}

impl AttachmentMap {
    pub fn new() -> Self {
        AttachmentMap::default()
    }

    /// Map `from` to `to`, returning the previous image of `from` if there was one.
    pub fn insert(&mut self, from: SemiEdge, to: SemiEdge) -> Option<SemiEdge> {
        self.map.insert(from, to)
    }

    pub fn get(&self, from: &SemiEdge) -> Option<&SemiEdge> {
        self.map.get(from)
    }

    pub fn domain(&self) -> impl Iterator<Item = &SemiEdge> {
        self.map.keys()
    }

    pub fn image(&self) -> impl Iterator<Item = &SemiEdge> {
        self.map.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SemiEdge, &SemiEdge)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(SemiEdge, SemiEdge)> for AttachmentMap {
    fn from_iter<I: IntoIterator<Item = (SemiEdge, SemiEdge)>>(iter: I) -> Self {
        AttachmentMap {
            map: iter.into_iter().collect(),
        }
    }
}

/// A validated cyclic rewrite rule. Parts are added first, then one attachment map per part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CyclicPermutation {
    parts: Vec<Subgraph>,
    attachments: Vec<AttachmentMap>,
}

impl CyclicPermutation {
    pub fn new() -> Self {
        CyclicPermutation::default()
    }

    /// Append a part.
    ///
    /// Fails once attachments have started, or if a border vertex of the part can be glued onto
    /// the part itself or onto an earlier part other than by identity.
    pub fn add_part(&mut self, part: Subgraph) -> Result<(), StructuralError> {
        if !self.attachments.is_empty() {
            return Err(StructuralError::AttachmentsStarted);
        }
        let index = self.parts.len();
        if let Some((local, other)) = part.borders_overlap_on(&part) {
            return Err(StructuralError::SelfOverlap {
                part: index,
                local,
                other,
            });
        }
        for (k, previous) in self.parts.iter().enumerate() {
            if let Some((local, other)) = part.borders_overlap_on(previous) {
                return Err(StructuralError::Overlap {
                    first: index,
                    second: k,
                    local,
                    other,
                });
            }
            if let Some((local, other)) = previous.borders_overlap_on(&part) {
                return Err(StructuralError::Overlap {
                    first: k,
                    second: index,
                    local,
                    other,
                });
            }
        }
        tracing::debug!(part = index, vertices = part.vertex_count(), "part added");
        self.parts.push(part);
        Ok(())
    }

    /// Append the attachment map of the next unattached part `Pi`.
    ///
    /// The map must be a bijection from the semi-edges of `Pi` onto the semi-edges of
    /// `P(i+1) mod k`.
    pub fn add_attachment(&mut self, attachment: AttachmentMap) -> Result<(), StructuralError> {
        if self.attachments.len() >= self.parts.len() {
            return Err(StructuralError::TooManyAttachments);
        }
        self.check_attachment(&attachment)?;
        self.attachments.push(attachment);
        Ok(())
    }

    fn check_attachment(&self, alpha: &AttachmentMap) -> Result<(), StructuralError> {
        let index = self.attachments.len();
        let next = (index + 1) % self.parts.len();

        let source: BTreeSet<&SemiEdge> = self.parts[index].semi_edges().collect();
        let domain: BTreeSet<&SemiEdge> = alpha.domain().collect();
        if let Some(half) = source.difference(&domain).next() {
            return Err(StructuralError::MissingFromDomain {
                half: (*half).clone(),
                part: index,
            });
        }
        if let Some(half) = domain.difference(&source).next() {
            return Err(StructuralError::ExtraInDomain {
                half: (*half).clone(),
                attachment: index,
            });
        }

        let target: BTreeSet<&SemiEdge> = self.parts[next].semi_edges().collect();
        let mut image = BTreeSet::new();
        for half in alpha.image() {
            if !image.insert(half) {
                return Err(StructuralError::NotInjective {
                    half: half.clone(),
                    attachment: index,
                });
            }
        }
        if let Some(half) = target.difference(&image).next() {
            return Err(StructuralError::MissingFromImage {
                half: (*half).clone(),
                part: next,
                attachment: index,
            });
        }
        if let Some(half) = image.difference(&target).next() {
            return Err(StructuralError::ExtraInImage {
                half: (*half).clone(),
                attachment: index,
                part: next,
            });
        }
        Ok(())
    }

    /// True when every part has its attachment map.
    pub fn check_sizes(&self) -> bool {
        self.parts.len() == self.attachments.len()
    }

    /// The number of parts, if it equals the number of attachment maps.
    pub fn size(&self) -> Option<usize> {
        self.check_sizes().then_some(self.parts.len())
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    pub fn part(&self, index: usize) -> Option<&Subgraph> {
        self.parts.get(index)
    }

    pub fn attachment(&self, index: usize) -> Option<&AttachmentMap> {
        self.attachments.get(index)
    }

    pub fn parts(&self) -> &[Subgraph] {
        &self.parts
    }
}
