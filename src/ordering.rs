//! Variable ordering heuristics.

use std::fmt;
use std::str::FromStr;

use crate::{Csp, VarId};

/// Picks the next variable for the search to branch on.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum VarOrder {
    /// Minimum remaining values: the unassigned variable with the smallest
    /// current domain, ties going to the first in insertion order.
    #[default]
    Mrv,

    /// The first unassigned variable in insertion order.
    Input,
}

impl VarOrder {
    /// Select an unassigned variable, or None if every variable is
    /// assigned.
    pub fn select(self, csp: &Csp) -> Option<VarId> {
        match self {
            VarOrder::Mrv => ord_mrv(csp),
            VarOrder::Input => csp.unassigned_vars().next(),
        }
    }
}

fn ord_mrv(csp: &Csp) -> Option<VarId> {
    let mut best: Option<(VarId, usize)> = None;
    for var in csp.unassigned_vars() {
        let size = csp.var(var).cur_domain_size();
        if best.map_or(true, |(_, min)| size < min) {
            best = Some((var, size));
        }
    }

    best.map(|(var, _)| var)
}

impl fmt::Display for VarOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarOrder::Mrv => f.write_str("mrv"),
            VarOrder::Input => f.write_str("input"),
        }
    }
}

impl FromStr for VarOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mrv" => Ok(VarOrder::Mrv),
            "input" => Ok(VarOrder::Input),
            _ => Err(format!("unknown variable ordering `{}`", s)),
        }
    }
}
