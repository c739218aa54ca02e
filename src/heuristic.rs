use std::fmt;

/// Cost-to-goal estimates over a stack. Both are zero exactly when the stack
/// is sorted; neither is admissible in general.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// H1: for every pancake, the larger ones to its left plus the smaller
    /// ones to its right.
    Inversions,
    /// H2: sum of distances between each value and its 1-based target slot.
    Displacement,
}

impl Heuristic {
    pub fn evaluate(&self, stack: &[u32]) -> usize {
        match self {
            Heuristic::Inversions => inversions(stack),
            Heuristic::Displacement => displacement(stack),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Heuristic::Inversions => "inversions",
            Heuristic::Displacement => "displacement",
        };
        write!(f, "{}", s)
    }
}

fn inversions(stack: &[u32]) -> usize {
    stack
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let left_greater = stack[..i].iter().filter(|&&v| v > value).count();
            let right_smaller = stack[i + 1..].iter().filter(|&&v| v < value).count();
            left_greater + right_smaller
        })
        .sum()
}

fn displacement(stack: &[u32]) -> usize {
    stack
        .iter()
        .enumerate()
        .map(|(i, &value)| (value as isize - (i as isize + 1)).unsigned_abs())
        .sum()
}
