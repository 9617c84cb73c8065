use super::{CyclicPermutation, StructuralError};

/// A rule program: cyclic permutations applied once each, in order, per step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pcgd {
    cycles: Vec<CyclicPermutation>,
}

impl Pcgd {
    pub fn new() -> Self {
        Pcgd::default()
    }

    /// Append a cycle. Fails if the cycle does not have one attachment map per part.
    pub fn add_permutation(&mut self, cycle: CyclicPermutation) -> Result<(), StructuralError> {
        if !cycle.check_sizes() {
            return Err(StructuralError::SizeMismatch {
                parts: cycle.part_count(),
                attachments: cycle.attachment_count(),
            });
        }
        self.cycles.push(cycle);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CyclicPermutation> {
        self.cycles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CyclicPermutation> {
        self.cycles.iter()
    }
}
