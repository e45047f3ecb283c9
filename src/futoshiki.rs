//! Futoshiki.
//!
//! https://en.wikipedia.org/wiki/Futoshiki
//!
//! A board is written one row per line, with whitespace-separated tokens.
//! Even columns are cells (`0` for an empty cell, otherwise the given
//! digit); odd columns relate the two neighbouring cells with `<`, `>`, or
//! `.` for no relation.
//!
//! ```text
//! 0 < 0 . 0
//! 0 . 0 . 2
//! 0 . 0 > 0
//! ```

use std::str::FromStr;

use crate::{Csp, Error, Model, Result, Solution, Val, VarId};

/// An inequality between two horizontally adjacent cells.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Relation {
    Less,
    Greater,
}

/// A parsed Futoshiki board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    // givens[y][x] is the digit given for the cell, if any.
    givens: Vec<Vec<Option<Val>>>,

    // relations[y][x] relates cell (y, x) to cell (y, x + 1).
    relations: Vec<Vec<Option<Relation>>>,
}

impl Board {
    /// The number of rows (and columns).
    pub fn size(&self) -> usize {
        self.givens.len()
    }

    pub fn given(&self, row: usize, col: usize) -> Option<Val> {
        self.givens[row][col]
    }

    pub fn relation(&self, row: usize, col: usize) -> Option<Relation> {
        self.relations[row][col]
    }

    /// Render a solution in the board's own format.
    pub fn render(&self, vars: &[Vec<VarId>], solution: &Solution) -> String {
        let mut out = String::new();
        for (y, row) in vars.iter().enumerate() {
            for (x, &var) in row.iter().enumerate() {
                if x > 0 {
                    let symbol = match self.relations[y][x - 1] {
                        Some(Relation::Less) => '<',
                        Some(Relation::Greater) => '>',
                        None => '.',
                    };
                    out.push_str(&format!(" {} ", symbol));
                }
                out.push_str(&solution[var].to_string());
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<Vec<&str>> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.split_whitespace().collect())
            .collect();

        let size = rows.len();
        if size == 0 {
            return Err(Error::EmptyBoard);
        }

        let mut givens = Vec::with_capacity(size);
        let mut relations = Vec::with_capacity(size);
        for (y, tokens) in rows.iter().enumerate() {
            if tokens.len() != 2 * size - 1 {
                return Err(Error::RaggedBoard {
                    row: y,
                    expected: 2 * size - 1,
                    found: tokens.len(),
                });
            }

            let bad_token = |col: usize| Error::BadToken {
                row: y,
                col,
                token: tokens[col].to_string(),
            };

            let mut row_givens = Vec::with_capacity(size);
            let mut row_relations = Vec::with_capacity(size - 1);
            for (col, &token) in tokens.iter().enumerate() {
                if col % 2 == 0 {
                    let digit: Val = token.parse().map_err(|_| bad_token(col))?;
                    match digit {
                        0 => row_givens.push(None),
                        d if 1 <= d && d as usize <= size => row_givens.push(Some(d)),
                        _ => return Err(bad_token(col)),
                    }
                } else {
                    let relation = match token {
                        "." => None,
                        "<" => Some(Relation::Less),
                        ">" => Some(Relation::Greater),
                        _ => return Err(bad_token(col)),
                    };
                    row_relations.push(relation);
                }
            }

            givens.push(row_givens);
            relations.push(row_relations);
        }

        Ok(Board { givens, relations })
    }
}

/// Model the board with binary not-equal constraints between every pair
/// of cells sharing a row or a column.
pub fn model_binary(board: &Board) -> Result<(Csp, Vec<Vec<VarId>>)> {
    let (mut model, vars) = model_common(board);
    let size = board.size();

    for y in 0..size {
        for i in 0..size {
            for j in (i + 1)..size {
                model.not_equal(vars[y][i], vars[y][j]);
                model.not_equal(vars[i][y], vars[j][y]);
            }
        }
    }

    Ok((model.build()?, vars))
}

/// Model the board with one all-different table per row and per column.
pub fn model_all_diff(board: &Board) -> Result<(Csp, Vec<Vec<VarId>>)> {
    let (mut model, vars) = model_common(board);
    let size = board.size();

    for row in vars.iter() {
        model.all_different(row);
    }
    for x in 0..size {
        let col: Vec<VarId> = vars.iter().map(|row| row[x]).collect();
        model.all_different(&col);
    }

    Ok((model.build()?, vars))
}

/// The cells, the givens (as unary tables) and the inequalities.
fn model_common(board: &Board) -> (Model, Vec<Vec<VarId>>) {
    let size = board.size();
    let mut model = Model::new();
    let vars = model.new_vars_2d(size, size, 1..=size as Val);

    for y in 0..size {
        for x in 0..size {
            if let Some(val) = board.given(y, x) {
                let name = format!("{} = {}", model.var_name(vars[y][x]), val);
                model.table(name, vec![vars[y][x]], vec![vec![val]]);
            }
        }
    }

    for y in 0..size {
        for x in 0..(size - 1) {
            match board.relation(y, x) {
                Some(Relation::Less) => {
                    model.less_than(vars[y][x], vars[y][x + 1]);
                }
                Some(Relation::Greater) => {
                    model.less_than(vars[y][x + 1], vars[y][x]);
                }
                None => (),
            }
        }
    }

    (model, vars)
}

#[cfg(test)]
mod tests {
    use super::{model_all_diff, model_binary, Board, Relation};
    use crate::Error;

    #[test]
    fn test_parse() {
        let board: Board = "0 < 0 . 0\n0 . 0 . 2\n0 . 0 > 0\n".parse().expect("board");
        assert_eq!(board.size(), 3);
        assert_eq!(board.given(1, 2), Some(2));
        assert_eq!(board.given(0, 0), None);
        assert_eq!(board.relation(0, 0), Some(Relation::Less));
        assert_eq!(board.relation(2, 1), Some(Relation::Greater));
        assert_eq!(board.relation(1, 0), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Board>(), Err(Error::EmptyBoard));
        assert_eq!(
            "0 . 0\n0 0".parse::<Board>(),
            Err(Error::RaggedBoard {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            "0 . 3\n0 . 0".parse::<Board>(),
            Err(Error::BadToken {
                row: 0,
                col: 2,
                token: "3".to_string()
            })
        );
        assert!("0 = 0\n0 . 0".parse::<Board>().is_err());
    }

    #[test]
    fn test_model_sizes() {
        let board: Board = "0 . 0 . 0\n0 . 1 . 0\n0 . 0 . 0".parse().expect("board");

        let (csp, vars) = model_binary(&board).expect("model");
        assert_eq!(vars.len(), 3);
        // 1 given + 2 * 3 rows/cols * 3 pairs.
        assert_eq!(csp.constraints().len(), 1 + 18);

        let (csp, _) = model_all_diff(&board).expect("model");
        assert_eq!(csp.constraints().len(), 1 + 6);
        assert_eq!(csp.constraints()[1].num_tuples(), 6);
    }
}
