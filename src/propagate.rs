//! Constraint propagators.
//!
//! A propagator is called by the search right after it assigns a variable
//! (or once before any assignment, with no variable).  It prunes values
//! that cannot take part in a solution and reports whether a dead end was
//! reached.  Every prune is returned, in the order performed, so that the
//! search can undo them when it backtracks.

use bit_set::BitSet;
use log::{debug, trace};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::constraint::ConstraintId;
use crate::{Csp, Prune, Val, VarId};

/// The propagation strategy used by the search.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Propagator {
    /// Only check constraints whose variables are all assigned.
    Backtracking,

    /// Prune the last unassigned variable of each constraint.
    #[default]
    ForwardChecking,

    /// Enforce generalized arc consistency.
    Gac,
}

/// The outcome of a propagator call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Propagation {
    /// False if a dead end was detected.
    pub consistent: bool,

    /// The values pruned by this call, in the order pruned.  Reported even
    /// when a dead end was detected.
    pub pruned: Vec<Prune>,
}

impl Propagation {
    fn ok(pruned: Vec<Prune>) -> Self {
        Propagation {
            consistent: true,
            pruned,
        }
    }

    fn dead_end(pruned: Vec<Prune>) -> Self {
        Propagation {
            consistent: false,
            pruned,
        }
    }
}

impl Propagator {
    /// Propagate after `new_var` was assigned, or before any assignment if
    /// `new_var` is None.
    pub fn propagate(self, csp: &mut Csp, new_var: Option<VarId>) -> Propagation {
        let result = match self {
            Propagator::Backtracking => prop_bt(csp, new_var),
            Propagator::ForwardChecking => prop_fc(csp, new_var),
            Propagator::Gac => prop_gac(csp, new_var),
        };

        if result.consistent {
            trace!("{}: {} prunes after {:?}", self, result.pruned.len(), new_var);
        } else {
            debug!(
                "{}: dead end after {:?} ({} prunes to undo)",
                self,
                new_var,
                result.pruned.len()
            );
        }

        result
    }
}

impl fmt::Display for Propagator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Propagator::Backtracking => "bt",
            Propagator::ForwardChecking => "fc",
            Propagator::Gac => "gac",
        };
        f.write_str(name)
    }
}

impl FromStr for Propagator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bt" | "backtracking" => Ok(Propagator::Backtracking),
            "fc" | "forward-checking" => Ok(Propagator::ForwardChecking),
            "gac" => Ok(Propagator::Gac),
            _ => Err(format!("unknown propagator `{}`", s)),
        }
    }
}

/*--------------------------------------------------------------*/

/// Plain backtracking: check the fully assigned constraints on the new
/// variable.  Never prunes.
fn prop_bt(csp: &mut Csp, new_var: Option<VarId>) -> Propagation {
    let var = match new_var {
        Some(var) => var,
        None => return Propagation::ok(Vec::new()),
    };

    for &cid in csp.cons_with_var(var) {
        let constraint = csp.constraint(cid);
        if constraint.n_unassigned(csp.vars()) != 0 {
            continue;
        }

        let vals = assigned_tuple(csp, cid, None);
        if !constraint.check(&vals) {
            return Propagation::dead_end(Vec::new());
        }
    }

    Propagation::ok(Vec::new())
}

/// Forward checking: for each constraint with a single unassigned
/// variable, prune the values of that variable which violate it.
fn prop_fc(csp: &mut Csp, new_var: Option<VarId>) -> Propagation {
    let cons: Vec<ConstraintId> = match new_var {
        Some(var) => csp.cons_with_var(var).to_vec(),
        None => csp.constraint_ids().collect(),
    };

    let mut pruned = Vec::new();
    for cid in cons {
        let x = match csp.constraint(cid).unassigned_vars(csp.vars())[..] {
            [x] => x,
            _ => continue,
        };

        if csp.var(x).cur_domain_size() == 0 {
            return Propagation::dead_end(pruned);
        }

        let candidates: Vec<Val> = csp.var(x).cur_domain().collect();
        for val in candidates {
            let vals = assigned_tuple(csp, cid, Some((x, val)));
            if csp.constraint(cid).check(&vals) {
                continue;
            }

            trace!("fc: prune {} = {} ({})", csp.var(x).name(), val, csp.constraint(cid).name());
            csp.prune(x, val);
            pruned.push((x, val));

            if csp.var(x).cur_domain_size() == 0 {
                return Propagation::dead_end(pruned);
            }
        }
    }

    Propagation::ok(pruned)
}

/// Generalized arc consistency: prune unsupported values until every
/// constraint reachable from the seed constraints is arc-consistent.
fn prop_gac(csp: &mut Csp, new_var: Option<VarId>) -> Propagation {
    let mut queue = GacQueue::new(csp.constraints().len());
    match new_var {
        Some(var) => queue.extend(csp.cons_with_var(var)),
        None => queue.extend(&csp.constraint_ids().collect::<Vec<_>>()),
    }

    let mut pruned = Vec::new();
    while let Some(cid) = queue.pop() {
        let scope = csp.constraint(cid).scope().to_vec();

        // A tuple supporting a value keeps supporting it for the rest of
        // this pass, so `cid` itself is never queued again here.
        for var in scope {
            if csp.is_assigned(var) {
                continue;
            }

            let candidates: Vec<Val> = csp.var(var).cur_domain().collect();
            let mut changed = false;
            for val in candidates {
                if csp.constraint(cid).has_support(csp.vars(), var, val) {
                    continue;
                }

                trace!(
                    "gac: prune {} = {} ({})",
                    csp.var(var).name(),
                    val,
                    csp.constraint(cid).name()
                );
                csp.prune(var, val);
                pruned.push((var, val));
                changed = true;
            }

            if csp.var(var).cur_domain_size() == 0 {
                return Propagation::dead_end(pruned);
            }

            if changed {
                for &other in csp.cons_with_var(var) {
                    if other != cid {
                        queue.push(other);
                    }
                }
            }
        }
    }

    Propagation::ok(pruned)
}

/// Build the tuple of the constraint's scope from the assigned values,
/// optionally substituting a hypothetical value for one variable.
///
/// # Panics
///
/// Panics if a scope variable other than the substituted one is
/// unassigned.
fn assigned_tuple(csp: &Csp, cid: ConstraintId, hypothesis: Option<(VarId, Val)>) -> Vec<Val> {
    csp.constraint(cid)
        .scope()
        .iter()
        .map(|&var| match hypothesis {
            Some((x, val)) if x == var => val,
            _ => csp
                .var(var)
                .assigned_value()
                .expect("scope variable assigned"),
        })
        .collect()
}

/// A FIFO queue of constraints, holding each constraint at most once.
struct GacQueue {
    queue: VecDeque<ConstraintId>,
    queued: BitSet,
}

impl GacQueue {
    fn new(num_constraints: usize) -> Self {
        GacQueue {
            queue: VecDeque::new(),
            queued: BitSet::with_capacity(num_constraints),
        }
    }

    fn push(&mut self, cid: ConstraintId) {
        if self.queued.insert(cid.index()) {
            self.queue.push_back(cid);
        }
    }

    fn extend(&mut self, cids: &[ConstraintId]) {
        for &cid in cids {
            self.push(cid);
        }
    }

    fn pop(&mut self) -> Option<ConstraintId> {
        let cid = self.queue.pop_front()?;
        self.queued.remove(cid.index());
        Some(cid)
    }
}
