//! Frontier-based search over the pancake state graph.
//!
//! All strategies share one loop: take a node from the frontier, close it,
//! stop if it is sorted, otherwise open every successor not already open or
//! closed. They differ only in how the frontier picks the next node and in
//! how `g` and `h` are assigned to new nodes.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use rand::Rng;
use serde::Deserialize;

use crate::config::{Budget, Limit};
use crate::heuristic::Heuristic;
use crate::puzzle::{Fingerprint, Flip, NodeId, State};

const PROGRESS_EVERY: u64 = 10_000;

/// Above this size the exhaustive strategies get slow without a budget.
const LARGE_STACK: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    Random,
    /// Best-first on H1 with `g` pinned to 0 (greedy).
    #[serde(rename = "heuristic-1")]
    #[value(name = "heuristic-1")]
    Heuristic1,
    /// Best-first on depth + H1.
    #[serde(rename = "heuristic-2")]
    #[value(name = "heuristic-2")]
    Heuristic2,
    /// Best-first on depth + H2.
    #[serde(rename = "heuristic-3")]
    #[value(name = "heuristic-3")]
    Heuristic3,
}

/// How the frontier chooses the next node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Fifo,
    Lifo,
    Random,
    BestFirst,
}

/// How `g` is assigned to a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthRule {
    Zero,
    ParentPlusOne,
}

/// Cost assignment for best-first strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    pub depth: DepthRule,
    pub heuristic: Heuristic,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::Random,
        Strategy::Heuristic1,
        Strategy::Heuristic2,
        Strategy::Heuristic3,
    ];

    pub fn discipline(&self) -> Discipline {
        match self {
            Strategy::BreadthFirst => Discipline::Fifo,
            Strategy::DepthFirst => Discipline::Lifo,
            Strategy::Random => Discipline::Random,
            Strategy::Heuristic1 | Strategy::Heuristic2 | Strategy::Heuristic3 => {
                Discipline::BestFirst
            }
        }
    }

    /// `None` for the blind strategies, which leave every cost at 0.
    pub fn cost_model(&self) -> Option<CostModel> {
        let (depth, heuristic) = match self {
            Strategy::BreadthFirst | Strategy::DepthFirst | Strategy::Random => return None,
            Strategy::Heuristic1 => (DepthRule::Zero, Heuristic::Inversions),
            Strategy::Heuristic2 => (DepthRule::ParentPlusOne, Heuristic::Inversions),
            Strategy::Heuristic3 => (DepthRule::ParentPlusOne, Heuristic::Displacement),
        };
        Some(CostModel { depth, heuristic })
    }

    /// Whether the strategy tends to sweep the whole state space.
    pub fn is_exhaustive(&self) -> bool {
        self.cost_model().is_none()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Strategy::BreadthFirst => "Breadth First",
            Strategy::DepthFirst => "Depth First",
            Strategy::Random => "Random",
            Strategy::Heuristic1 => "Heuristic 1",
            Strategy::Heuristic2 => "Heuristic 2",
            Strategy::Heuristic3 => "Heuristic 3",
        };
        write!(f, "{}", s)
    }
}

/// OPEN list. Node ids grow with creation order, so the best-first heap
/// breaks `f` ties in favour of the earliest inserted node.
enum Frontier {
    Fifo(VecDeque<NodeId>),
    Lifo(Vec<NodeId>),
    Random(Vec<NodeId>),
    BestFirst(BinaryHeap<Reverse<(usize, NodeId)>>),
}

impl Frontier {
    fn new(discipline: Discipline) -> Self {
        match discipline {
            Discipline::Fifo => Frontier::Fifo(VecDeque::new()),
            Discipline::Lifo => Frontier::Lifo(Vec::new()),
            Discipline::Random => Frontier::Random(Vec::new()),
            Discipline::BestFirst => Frontier::BestFirst(BinaryHeap::new()),
        }
    }

    fn push(&mut self, id: NodeId, total_cost: usize) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(id),
            Frontier::Lifo(stack) | Frontier::Random(stack) => stack.push(id),
            Frontier::BestFirst(heap) => heap.push(Reverse((total_cost, id))),
        }
    }

    fn pop<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<NodeId> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Random(pool) => {
                if pool.is_empty() {
                    None
                } else {
                    let pick = rng.gen_range(0..pool.len());
                    Some(pool.swap_remove(pick))
                }
            }
            Frontier::BestFirst(heap) => heap.pop().map(|Reverse((_, id))| id),
        }
    }

    fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Lifo(stack) | Frontier::Random(stack) => stack.len(),
            Frontier::BestFirst(heap) => heap.len(),
        }
    }

    /// Remaining node ids in creation order.
    fn into_ids(self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = match self {
            Frontier::Fifo(queue) => queue.into(),
            Frontier::Lifo(stack) | Frontier::Random(stack) => stack,
            Frontier::BestFirst(heap) => heap.into_iter().map(|Reverse((_, id))| id).collect(),
        };
        ids.sort_unstable();
        ids
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Solved(NodeId),
    /// The frontier emptied without reaching a sorted stack.
    Exhausted,
    /// A budget limit stopped the run first.
    Aborted(Limit),
}

/// Everything a run produced: the goal (if any), the final OPEN and CLOSED
/// lists, and the node arena they index into.
#[derive(Debug)]
pub struct SearchReport {
    pub strategy: Strategy,
    pub outcome: Outcome,
    pub expansions: u64,
    pub elapsed: Duration,
    nodes: Vec<State>,
    frontier: Vec<NodeId>,
    explored: Vec<NodeId>,
}

impl SearchReport {
    pub fn goal(&self) -> Option<&State> {
        match self.outcome {
            Outcome::Solved(id) => Some(self.node(id)),
            _ => None,
        }
    }

    pub fn node(&self, id: NodeId) -> &State {
        &self.nodes[id.0]
    }

    /// States left in OPEN, in creation order.
    pub fn frontier(&self) -> impl Iterator<Item = &State> + '_ {
        self.frontier.iter().map(move |&id| self.node(id))
    }

    /// States in CLOSED, in expansion order.
    pub fn explored(&self) -> impl Iterator<Item = &State> + '_ {
        self.explored.iter().map(move |&id| self.node(id))
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn explored_len(&self) -> usize {
        self.explored.len()
    }

    /// States from the initial one to the goal, both included. Empty when unsolved.
    pub fn path(&self) -> Vec<&State> {
        let mut path = Vec::new();
        let mut cursor = match self.outcome {
            Outcome::Solved(id) => Some(id),
            _ => None,
        };
        while let Some(id) = cursor {
            let state = self.node(id);
            path.push(state);
            cursor = state.parent();
        }
        path.reverse();
        path
    }

    /// Flips that turn the initial stack into the goal.
    pub fn moves(&self) -> Vec<Flip> {
        self.path().iter().filter_map(|state| state.flip()).collect()
    }
}

/// Runs `strategy` from a detached copy of `initial`.
///
/// Each run owns its node arena; nothing is shared with other runs. `rng` is
/// only consulted by [`Strategy::Random`].
pub fn search<R: Rng + ?Sized>(
    initial: &State,
    strategy: Strategy,
    budget: &Budget,
    rng: &mut R,
) -> SearchReport {
    let started = Instant::now();
    let cost_model = strategy.cost_model();

    if strategy.is_exhaustive() && initial.size() > LARGE_STACK && budget.is_unbounded() {
        warn!(
            "{} on {} pancakes without a budget may not finish",
            strategy,
            initial.size()
        );
    }
    info!("{}: searching from {}", strategy, initial);
    if let Some(model) = cost_model {
        debug!(
            "{}: ordering by {:?} depth + {} estimate",
            strategy, model.depth, model.heuristic
        );
    }

    let mut root = initial.detached();
    if let Some(model) = cost_model {
        root.set_costs(0, model.heuristic.evaluate(root.sequence()));
    }

    let mut nodes: Vec<State> = Vec::new();
    let mut seen: HashSet<Fingerprint> = HashSet::new();
    let mut frontier = Frontier::new(strategy.discipline());
    let mut explored: Vec<NodeId> = Vec::new();
    let mut expansions: u64 = 0;

    seen.insert(root.fingerprint());
    frontier.push(NodeId(0), root.total_cost());
    nodes.push(root);

    let outcome = loop {
        let Some(current) = frontier.pop(rng) else {
            break Outcome::Exhausted;
        };
        explored.push(current);

        let state = &nodes[current.0];
        if state.is_goal() {
            break Outcome::Solved(current);
        }
        // Goal tests are free; only expanding past the budget aborts. The
        // node goes back to OPEN so CLOSED holds expanded nodes only.
        if let Some(limit) = budget.exceeded(expansions, started.elapsed()) {
            explored.pop();
            frontier.push(current, state.total_cost());
            break Outcome::Aborted(limit);
        }
        trace!(
            "expand {} {} f={}",
            state.fingerprint(),
            state,
            state.total_cost()
        );

        let parent_depth = state.depth_cost();
        for mut successor in state.successors(current) {
            if !seen.insert(successor.fingerprint()) {
                continue;
            }
            if let Some(model) = cost_model {
                let depth = match model.depth {
                    DepthRule::Zero => 0,
                    DepthRule::ParentPlusOne => parent_depth + 1,
                };
                let estimate = model.heuristic.evaluate(successor.sequence());
                successor.set_costs(depth, estimate);
            }
            let id = NodeId(nodes.len());
            frontier.push(id, successor.total_cost());
            nodes.push(successor);
        }

        expansions += 1;
        if expansions % PROGRESS_EVERY == 0 {
            debug!(
                "{}: {} expansions, open={}, closed={}",
                strategy,
                expansions,
                frontier.len(),
                explored.len()
            );
        }
    };

    let elapsed = started.elapsed();
    match outcome {
        Outcome::Solved(id) => info!(
            "{}: sorted at depth {} after {} expansions in {:?}",
            strategy,
            path_len(&nodes, id),
            expansions,
            elapsed
        ),
        Outcome::Exhausted => info!(
            "{}: frontier exhausted after {} expansions",
            strategy, expansions
        ),
        Outcome::Aborted(limit) => warn!(
            "{}: aborted by {:?} after {} expansions",
            strategy, limit, expansions
        ),
    }

    SearchReport {
        strategy,
        outcome,
        expansions,
        elapsed,
        nodes,
        frontier: frontier.into_ids(),
        explored,
    }
}

fn path_len(nodes: &[State], mut id: NodeId) -> usize {
    let mut hops = 0;
    while let Some(parent) = nodes[id.0].parent() {
        hops += 1;
        id = parent;
    }
    hops
}
