use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use itertools::Itertools;
use log::{debug, trace};
use varisat::{Lit, Var};

use crate::encoder::{Encoding, EncodingLimits};
use crate::grid::Grid;
use crate::solution::Solution;
use crate::strategy::{SearchStats, SolverFailure, Strategy};

/// Best-first search over partial assignments of the encoded formula, closing every node under unit propagation.
///
/// Nodes are ordered by the number of clauses not yet satisfied, then by the number of assigned variables, then by the order they were found.
/// Branching follows a static activity score per literal, in which every clause a literal occurs in contributes `2^-len`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestFirst {
    limits: EncodingLimits,
}

impl BestFirst {
    /// Fails with [`SolverFailure::EncodingOverflow`] on grids whose encoding exceeds `limits`.
    pub fn new(limits: EncodingLimits) -> Self {
        Self { limits }
    }
}

/// Truth values of every variable, `None` while unassigned.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct PartialAssignment(Vec<Option<bool>>);

impl PartialAssignment {
    fn new(var_count: usize) -> Self {
        Self(vec![None; var_count])
    }

    #[inline]
    fn get(&self, var: Var) -> Option<bool> {
        self.0.get(var.index()).copied().flatten()
    }

    #[inline]
    fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.get(lit.var()).map(|value| value == lit.is_positive())
    }

    fn set(&mut self, var: Var, value: bool) {
        self.0[var.index()] = Some(value);
    }

    fn assigned(&self) -> usize {
        self.0.iter().filter(|value| value.is_some()).count()
    }

    fn first_unassigned(&self) -> Option<Var> {
        self.0.iter().position(Option::is_none).map(Var::from_index)
    }
}

struct Node {
    unsatisfied: usize,
    assigned: usize,
    sequence: usize,
    assignment: PartialAssignment,
}

impl Node {
    fn key(&self) -> (usize, usize, usize) {
        (self.unsatisfied, self.assigned, self.sequence)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    // reversed, so the max-heap pops the smallest key
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

struct Search<'a> {
    clauses: &'a [Vec<Lit>],
    activity: Vec<f64>,
    decision_order: Vec<Var>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    fn new(encoding: &'a Encoding) -> Self {
        let clauses = encoding.clauses();
        let mut activity = vec![0f64; 2 * encoding.var_count()];
        for clause in clauses {
            let weight = 2f64.powi(-(clause.len() as i32));
            for lit in clause {
                activity[lit_code(*lit)] += weight;
            }
        }

        // edges most constrained by degree and crossing clauses first; ties by edge, then multiplicity
        let decision_order = encoding.edge_vars()
            .map(|(edge, multiplicity, var)| {
                let score = activity[lit_code(var.positive())] + activity[lit_code(var.negative())];
                (score, edge, multiplicity, var)
            })
            .sorted_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)))
            .map(|(_, _, _, var)| var)
            .collect_vec();

        Self { clauses, activity, decision_order, stats: SearchStats::default() }
    }

    /// Assign every literal forced by a clause with one unassigned literal, to closure.
    /// Returns `false` on a conflict, i.e. a clause with every literal false.
    fn propagate(&self, assignment: &mut PartialAssignment) -> bool {
        loop {
            let mut changed = false;

            for clause in self.clauses {
                let mut unassigned = None;
                let mut unassigned_count = 0;
                let mut satisfied = false;

                for lit in clause {
                    match assignment.lit_value(*lit) {
                        Some(true) => {
                            satisfied = true;
                            break;
                        }
                        Some(false) => {}
                        None => {
                            unassigned_count += 1;
                            unassigned = Some(*lit);
                        }
                    }
                }

                if satisfied {
                    continue;
                }
                match (unassigned_count, unassigned) {
                    (0, _) => return false,
                    (1, Some(lit)) => {
                        assignment.set(lit.var(), lit.is_positive());
                        changed = true;
                    }
                    _ => {}
                }
            }

            if !changed {
                return true;
            }
        }
    }

    /// Clauses without a true literal.
    fn unsatisfied(&self, assignment: &PartialAssignment) -> usize {
        self.clauses.iter()
            .filter(|clause| !clause.iter().any(|lit| assignment.lit_value(*lit) == Some(true)))
            .count()
    }

    fn next_decision(&self, assignment: &PartialAssignment) -> Option<Var> {
        self.decision_order.iter()
            .copied()
            .find(|var| assignment.get(*var).is_none())
            .or_else(|| assignment.first_unassigned())
    }

    fn run(&mut self, var_count: usize) -> Option<PartialAssignment> {
        let mut root = PartialAssignment::new(var_count);
        if !self.propagate(&mut root) {
            return None;
        }

        let mut sequence = 0;
        let mut queue = BinaryHeap::new();
        let mut visited = HashSet::new();
        queue.push(Node { unsatisfied: self.unsatisfied(&root), assigned: root.assigned(), sequence, assignment: root });

        while let Some(node) = queue.pop() {
            if node.unsatisfied == 0 {
                return Some(node.assignment);
            }

            if !visited.insert(node.assignment.clone()) {
                self.stats.duplicates += 1;
                continue;
            }
            self.stats.expanded += 1;
            trace!("expanding node {} with {} unsatisfied clauses, {} assigned", node.sequence, node.unsatisfied, node.assigned);

            let Some(var) = self.next_decision(&node.assignment) else { continue };
            let prefer_true = self.activity[lit_code(var.positive())] >= self.activity[lit_code(var.negative())];

            for value in [prefer_true, !prefer_true] {
                let mut child = node.assignment.clone();
                child.set(var, value);
                if !self.propagate(&mut child) {
                    self.stats.pruned += 1;
                    continue;
                }

                sequence += 1;
                queue.push(Node { unsatisfied: self.unsatisfied(&child), assigned: child.assigned(), sequence, assignment: child });
            }
        }

        None
    }
}

#[inline]
fn lit_code(lit: Lit) -> usize {
    2 * lit.var().index() + usize::from(lit.is_negative())
}

impl Strategy for BestFirst {
    fn attempt(&self, grid: &Grid) -> Result<Solution, SolverFailure> {
        if grid.is_trivial() {
            return Ok(Solution::empty(grid));
        }

        let encoding = Encoding::new(grid, self.limits)?;
        let mut search = Search::new(&encoding);
        let found = search.run(encoding.var_count());
        debug!("best-first search: {}", search.stats);

        match found {
            Some(assignment) => Ok(encoding.decode(|var| assignment.get(var))),
            None => Err(SolverFailure::Unsatisfiable),
        }
    }
}
