//! Futoshiki.
//!
//! https://en.wikipedia.org/wiki/Futoshiki

use csp_propagators::futoshiki::{self, Board, Relation};
use csp_propagators::{BacktrackSearch, Csp, Propagator, Solution, Val, VarId, VarOrder};

const PROPAGATORS: [Propagator; 3] = [
    Propagator::Backtracking,
    Propagator::ForwardChecking,
    Propagator::Gac,
];

type ModelFn = fn(&Board) -> csp_propagators::Result<(Csp, Vec<Vec<VarId>>)>;

const MODELS: [ModelFn; 2] = [futoshiki::model_binary, futoshiki::model_all_diff];

fn verify_futoshiki(board: &Board, dict: &Solution, vars: &[Vec<VarId>]) {
    let size = board.size();
    let grid: Vec<Vec<Val>> = vars
        .iter()
        .map(|row| row.iter().map(|&var| dict[var]).collect())
        .collect();

    for y in 0..size {
        let mut row: Vec<Val> = grid[y].clone();
        let mut col: Vec<Val> = grid.iter().map(|r| r[y]).collect();
        row.sort();
        col.sort();
        let expected: Vec<Val> = (1..=size as Val).collect();
        assert_eq!(row, expected);
        assert_eq!(col, expected);

        for x in 0..size {
            if let Some(val) = board.given(y, x) {
                assert_eq!(grid[y][x], val);
            }
            if x + 1 < size {
                match board.relation(y, x) {
                    Some(Relation::Less) => assert!(grid[y][x] < grid[y][x + 1]),
                    Some(Relation::Greater) => assert!(grid[y][x] > grid[y][x + 1]),
                    None => (),
                }
            }
        }
    }
}

#[test]
fn futoshiki_3x3_unique() {
    let board: Board = "0 < 0 < 0\n0 . 0 > 0\n0 . 0 . 0\n".parse().expect("board");

    for model in MODELS {
        for propagator in PROPAGATORS {
            let (mut csp, vars) = model(&board).expect("model");
            let mut search = BacktrackSearch::new(propagator, VarOrder::Mrv);
            let dict = search.solve_unique(&mut csp).expect("unique solution");

            verify_futoshiki(&board, &dict, &vars);
            assert_eq!(
                board.render(&vars, &dict),
                "1 < 2 < 3\n2 . 3 > 1\n3 . 1 . 2\n"
            );
            println!("futoshiki_3x3 ({}): {} guesses", propagator, search.num_guesses());
        }
    }
}

#[test]
fn futoshiki_4x4_all_agree() {
    let board: Board = "
        0 > 0 < 0 . 0
        0 . 0 . 2 . 0
        0 < 0 . 0 > 0
        3 . 0 . 0 . 0
    "
    .parse()
    .expect("board");

    let expected = [[2, 1, 4, 3], [4, 3, 2, 1], [1, 4, 3, 2], [3, 2, 1, 4]];
    let mut counts = Vec::new();

    for model in MODELS {
        for propagator in PROPAGATORS {
            for ordering in [VarOrder::Mrv, VarOrder::Input] {
                let (mut csp, vars) = model(&board).expect("model");
                let mut search = BacktrackSearch::new(propagator, ordering);
                let solutions = search.solve_all(&mut csp);

                for dict in solutions.iter() {
                    verify_futoshiki(&board, dict, &vars);
                }
                assert!(solutions.iter().any(|dict| {
                    (0..4).all(|y| (0..4).all(|x| dict[vars[y][x]] == expected[y][x]))
                }));
                counts.push(solutions.len());
            }
        }
    }

    assert!(counts.iter().all(|&count| count == counts[0]), "{:?}", counts);
}

#[test]
fn futoshiki_gac_root_prunes() {
    // The chain forces the first row without search.
    let board: Board = "0 < 0 < 0\n0 . 0 . 0\n0 . 0 . 0\n".parse().expect("board");
    let (mut csp, vars) = futoshiki::model_all_diff(&board).expect("model");

    let result = Propagator::Gac.propagate(&mut csp, None);
    assert!(result.consistent);
    for (x, &var) in vars[0].iter().enumerate() {
        assert_eq!(csp.var(var).cur_domain().collect::<Vec<_>>(), vec![x as Val + 1]);
    }
}

#[test]
fn futoshiki_contradiction() {
    let board: Board = "1 < 0\n0 . 1\n".parse().expect("board");
    for model in MODELS {
        for propagator in PROPAGATORS {
            let (mut csp, _) = model(&board).expect("model");
            let mut search = BacktrackSearch::new(propagator, VarOrder::Mrv);
            assert!(search.solve_any(&mut csp).is_some());
        }
    }

    let board: Board = "2 < 0\n0 . 0\n".parse().expect("board");
    for model in MODELS {
        for propagator in PROPAGATORS {
            let (mut csp, _) = model(&board).expect("model");
            let mut search = BacktrackSearch::new(propagator, VarOrder::Mrv);
            assert!(search.solve_any(&mut csp).is_none());
        }
    }
}
