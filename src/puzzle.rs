use rand::{seq::SliceRandom, Rng};
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::PuzzleError;

/// A move: reverse the stack from `index` to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flip(pub usize);

impl Flip {
    /// Applies the flip in place. Flipping at or past the last element is a no-op.
    pub fn apply(&self, stack: &mut [u32]) {
        if self.0 < stack.len() {
            stack[self.0..].reverse();
        }
    }
}

impl fmt::Display for Flip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flip@{}", self.0)
    }
}

/// Index of a state in a search run's node arena, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// SHA-256 of the ordered stack. Two states are equal iff their fingerprints are.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(stack: &[u32]) -> Self {
        let mut hasher = Sha256::new();
        for value in stack {
            hasher.update(value.to_le_bytes());
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first 8 bytes are plenty to tell states apart in logs.
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", hex::encode(self.0))
    }
}

/// A snapshot of the pancake stack plus the bookkeeping a search needs.
///
/// Only `sequence` takes part in equality (through the cached fingerprint).
/// The costs are assigned once, right after creation, before the state
/// enters a frontier.
#[derive(Debug, Clone)]
pub struct State {
    sequence: Vec<u32>,
    fingerprint: Fingerprint,
    parent: Option<NodeId>,
    flip: Option<Flip>,
    depth_cost: usize,
    heuristic_cost: usize,
}

impl State {
    /// Builds a root state, rejecting anything that is not a permutation of 1..=N with N >= 2.
    pub fn new(sequence: Vec<u32>) -> Result<Self, PuzzleError> {
        let size = sequence.len();
        if size < 2 {
            return Err(PuzzleError::TooSmall { size });
        }

        let mut seen = vec![false; size];
        for &value in &sequence {
            if value == 0 || value as usize > size {
                return Err(PuzzleError::OutOfRange { value, size });
            }
            let slot = &mut seen[value as usize - 1];
            if *slot {
                return Err(PuzzleError::Duplicate { value });
            }
            *slot = true;
        }

        Ok(Self::root(sequence))
    }

    /// A uniformly shuffled stack of 1..=size.
    pub fn shuffled<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, PuzzleError> {
        let mut sequence: Vec<u32> = (1..=size as u32).collect();
        sequence.shuffle(rng);
        Self::new(sequence)
    }

    fn root(sequence: Vec<u32>) -> Self {
        let fingerprint = Fingerprint::of(&sequence);
        Self {
            sequence,
            fingerprint,
            parent: None,
            flip: None,
            depth_cost: 0,
            heuristic_cost: 0,
        }
    }

    pub fn sequence(&self) -> &[u32] {
        &self.sequence
    }

    pub fn size(&self) -> usize {
        self.sequence.len()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The move that produced this state from its parent.
    pub fn flip(&self) -> Option<Flip> {
        self.flip
    }

    pub fn depth_cost(&self) -> usize {
        self.depth_cost
    }

    pub fn heuristic_cost(&self) -> usize {
        self.heuristic_cost
    }

    pub fn total_cost(&self) -> usize {
        self.depth_cost + self.heuristic_cost
    }

    pub(crate) fn set_costs(&mut self, depth_cost: usize, heuristic_cost: usize) {
        self.depth_cost = depth_cost;
        self.heuristic_cost = heuristic_cost;
    }

    /// A copy of this state detached from any search: no parent, no costs.
    pub fn detached(&self) -> Self {
        Self::root(self.sequence.clone())
    }

    pub fn is_goal(&self) -> bool {
        self.sequence.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// One successor per flip index 0..N-1, in index order. `id` is this
    /// state's slot in the caller's arena and becomes each successor's parent.
    pub fn successors(&self, id: NodeId) -> Vec<State> {
        (0..self.size() - 1)
            .map(|index| self.try_flip(Flip(index), id))
            .collect()
    }

    fn try_flip(&self, flip: Flip, id: NodeId) -> State {
        let mut sequence = self.sequence.clone();
        flip.apply(&mut sequence);
        let fingerprint = Fingerprint::of(&sequence);
        State {
            sequence,
            fingerprint,
            parent: Some(id),
            flip: Some(flip),
            depth_cost: 0,
            heuristic_cost: 0,
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.sequence.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
