//! Depth-first backtracking search driving a propagator.

use log::{debug, info};

use crate::{Csp, Propagator, Solution, Val, VarOrder};

/// A backtracking search: assign a variable, propagate, recurse, and undo
/// the assignment and the prunes on the way back.
///
/// The network is left as it was found (no assignments, no prunes) when a
/// solve method returns.
#[derive(Clone, Debug, Default)]
pub struct BacktrackSearch {
    propagator: Propagator,
    ordering: VarOrder,

    // The number of assignments tried by the last solve.
    num_guesses: u32,
}

impl BacktrackSearch {
    /// Create a search using the given propagator and variable ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use csp_propagators::{BacktrackSearch, Propagator, VarOrder};
    ///
    /// let search = BacktrackSearch::new(Propagator::Gac, VarOrder::Mrv);
    /// ```
    pub fn new(propagator: Propagator, ordering: VarOrder) -> Self {
        BacktrackSearch {
            propagator,
            ordering,
            num_guesses: 0,
        }
    }

    pub fn propagator(&self) -> Propagator {
        self.propagator
    }

    pub fn ordering(&self) -> VarOrder {
        self.ordering
    }

    /// Find any solution.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut model = csp_propagators::Model::new();
    /// model.new_var("x", vec![1, 2]);
    /// model.new_var("y", vec![3, 4]);
    /// let mut csp = model.build().unwrap();
    ///
    /// let mut search = csp_propagators::BacktrackSearch::default();
    /// assert!(search.solve_any(&mut csp).is_some());
    /// ```
    pub fn solve_any(&mut self, csp: &mut Csp) -> Option<Solution> {
        self.run(csp, 1).pop()
    }

    /// Find the solution, verifying that it is unique.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut model = csp_propagators::Model::new();
    /// model.new_var("x", vec![1, 2]);
    /// model.new_var("y", vec![3, 4]);
    /// let mut csp = model.build().unwrap();
    ///
    /// let mut search = csp_propagators::BacktrackSearch::default();
    /// assert!(search.solve_unique(&mut csp).is_none());
    /// ```
    pub fn solve_unique(&mut self, csp: &mut Csp) -> Option<Solution> {
        let mut solutions = self.run(csp, 2);
        if solutions.len() == 1 {
            return solutions.pop();
        }

        None
    }

    /// Find all solutions.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut model = csp_propagators::Model::new();
    /// model.new_var("x", vec![1, 2]);
    /// model.new_var("y", vec![3, 4]);
    /// let mut csp = model.build().unwrap();
    ///
    /// let mut search = csp_propagators::BacktrackSearch::default();
    /// assert_eq!(search.solve_all(&mut csp).len(), 4);
    /// ```
    pub fn solve_all(&mut self, csp: &mut Csp) -> Vec<Solution> {
        self.run(csp, usize::MAX)
    }

    /// Get the number of guesses taken by the last solve.
    pub fn num_guesses(&self) -> u32 {
        self.num_guesses
    }

    fn run(&mut self, csp: &mut Csp, count: usize) -> Vec<Solution> {
        self.num_guesses = 0;
        let mut solutions = Vec::new();

        let root = self.propagator.propagate(csp, None);
        {
            let mut checkpoint = csp.checkpoint(root.pruned);
            if root.consistent {
                self.search(&mut checkpoint, count, &mut solutions);
            } else {
                debug!("Dead end before the first assignment");
            }
        }

        info!(
            "{}/{}: {} solutions, {} guesses",
            self.propagator,
            self.ordering,
            solutions.len(),
            self.num_guesses
        );
        solutions
    }

    /// Extend the current assignment, collecting up to `count` solutions.
    fn search(&mut self, csp: &mut Csp, count: usize, solutions: &mut Vec<Solution>) {
        let var = match self.ordering.select(csp) {
            Some(var) => var,
            None => {
                solutions.extend(csp.solution());
                return;
            }
        };

        let candidates: Vec<Val> = csp.var(var).cur_domain().collect();
        for val in candidates {
            self.num_guesses += 1;
            csp.assign(var, val);

            let result = self.propagator.propagate(csp, Some(var));
            {
                let mut checkpoint = csp.checkpoint(result.pruned);
                if result.consistent {
                    self.search(&mut checkpoint, count, solutions);
                }
            }

            csp.unassign(var);
            if solutions.len() >= count {
                // Reached desired number of solutions.
                return;
            }
        }
    }
}
