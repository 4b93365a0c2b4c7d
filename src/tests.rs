#[cfg(test)]
mod tests {
    use strum::VariantArray;

    use crate::encoder::EncodingLimits;
    use crate::grid::Grid;
    use crate::solution::Solution;
    use crate::strategy::{solve, Method, SolverFailure};

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    /// Solve with every method, checking each solution found; all methods must agree on whether one exists.
    fn solve_all(grid: &Grid) -> Vec<Result<Solution, SolverFailure>> {
        let outcomes = Method::VARIANTS.iter()
            .map(|method| {
                let report = solve(grid, *method, EncodingLimits::default());
                assert_eq!(report.method, *method);
                if let Ok(solution) = &report.outcome {
                    assert_eq!(solution.validate(grid), Ok(()), "{method} returned an invalid solution");
                }
                report.outcome
            })
            .collect::<Vec<_>>();

        for (method, outcome) in Method::VARIANTS.iter().zip(&outcomes) {
            assert_eq!(outcome.is_ok(), outcomes[0].is_ok(), "{method} disagrees with {}", Method::VARIANTS[0]);
        }
        outcomes
    }

    /// For puzzles with one solution: every method finds it, rendered as `expected`.
    fn assert_unique(text: &str, expected: &str) {
        let grid = grid(text);
        for (method, outcome) in Method::VARIANTS.iter().zip(solve_all(&grid)) {
            let solution = outcome.unwrap_or_else(|failure| panic!("{method} failed: {failure}"));
            assert_eq!(format!("{}", solution.render(&grid)), expected, "{method}");
        }
    }

    #[test]
    fn solve_domino() {
        assert_unique("2 0 2\n", "2=2\n");
        assert_unique("1, 0, 1\n", "1-1\n");
        assert_unique("1\n0\n0\n1\n", "1\n|\n|\n1\n");
    }

    #[test]
    fn solve_square() {
        let grid = grid("3 0 3\n0 0 0\n1 0 1\n");
        assert_eq!(format!("{}", grid), "3.3\n...\n1.1\n");
        assert_unique("3 0 3\n0 0 0\n1 0 1\n", "3=3\n|.|\n1.1\n");

        let solution = solve(&grid, Method::Sat, EncodingLimits::default()).outcome.unwrap();
        assert_eq!(solution.render(&grid).to_list_string(), "[ \"3\" , \"=\" , \"3\" ]
[ \"|\" , \"0\" , \"|\" ]
[ \"1\" , \"0\" , \"1\" ]");
        assert_eq!(solution.between(&grid, 0, 1), 2);
        assert_eq!(solution.between(&grid, 0, 3), 0);
    }

    #[test]
    fn solve_around_a_crossing() {
        // the double bridge down from the top 3 blocks the row 2 bridge between the 2s
        assert_unique("0 0 3 0 1
0 0 0 0 0
2 0 0 2 0
0 0 4 3 0
3 0 2 0 0
", "..3-1
..$..
2.$2.
$.43.
3-2..
");
    }

    #[test]
    fn solve_sparse() {
        assert_unique("0 0 0 0 0
0 1 3 0 1
0 0 0 0 0
0 1 0 0 2
0 2 3 0 3
", ".....
.13-1
..|..
.1|.2
.23-3
");
    }

    #[test]
    fn connectivity_decides() {
        // degrees alone also admit a second assignment, which leaves two separate groups
        assert_unique("0 0 1 0
2 0 0 0
3 0 3 0
1 0 2 0
", "..1.
2.|.
3-3.
1-2.
");
    }

    #[test]
    fn crossing_is_unsatisfiable() {
        for outcome in solve_all(&grid("0 1 0\n1 0 1\n0 1 0\n")) {
            assert_eq!(outcome, Err(SolverFailure::Unsatisfiable));
        }
        for outcome in solve_all(&grid("0 2 0\n2 0 2\n0 2 0\n")) {
            assert_eq!(outcome, Err(SolverFailure::Unsatisfiable));
        }
        // connected and degree-exact, but only with the middle bridges crossing
        for outcome in solve_all(&grid("2 2 0\n2 0 1\n0 1 0\n")) {
            assert_eq!(outcome, Err(SolverFailure::Unsatisfiable));
        }
    }

    #[test]
    fn disconnected_degrees_are_unsatisfiable() {
        // every way to satisfy the degrees is two separate dominoes
        for outcome in solve_all(&grid("1 1\n1 1\n")) {
            assert_eq!(outcome, Err(SolverFailure::Unsatisfiable));
        }
    }

    #[test]
    fn overfull_island_is_unsatisfiable() {
        for outcome in solve_all(&grid("4 0 4\n")) {
            assert_eq!(outcome, Err(SolverFailure::Unsatisfiable));
        }
        // no neighbors at all
        for outcome in solve_all(&grid("1 0\n0 1\n")) {
            assert_eq!(outcome, Err(SolverFailure::Unsatisfiable));
        }
    }

    #[test]
    fn single_island_is_trivial() {
        let grid = grid("0 0 0\n0 3 0\n0 0 0\n");
        for outcome in solve_all(&grid) {
            let solution = outcome.unwrap();
            assert_eq!(solution, Solution::empty(&grid));
            assert_eq!(format!("{}", solution.render(&grid)), "...\n.3.\n...\n");
        }
    }

    #[test]
    fn repeated_solves_agree() {
        // two valid solutions; each method must keep returning the same one
        let grid = grid("2 0 3\n0 0 0\n1 0 2\n");
        for method in Method::VARIANTS {
            let first = solve(&grid, *method, EncodingLimits::default()).outcome.unwrap();
            let second = solve(&grid, *method, EncodingLimits::default()).outcome.unwrap();
            assert_eq!(first, second, "{method}");
        }
    }

    #[test]
    fn search_methods_agree_on_first_solution() {
        // both enumerate counts 0, 1, 2 with edge 0 most significant
        let grid = grid("2 0 3\n0 0 0\n1 0 2\n");
        let backtrack = solve(&grid, Method::Backtrack, EncodingLimits::default()).outcome.unwrap();
        let brute_force = solve(&grid, Method::BruteForce, EncodingLimits::default()).outcome.unwrap();
        assert_eq!(backtrack, brute_force);
        assert_eq!(backtrack.counts(), &[0, 2, 1, 1]);
    }

    #[test]
    fn encoding_limits_apply_to_formula_methods() {
        let grid = grid("3 0 3\n0 0 0\n1 0 1\n");
        let limits = EncodingLimits { max_variables: 4, max_clauses: 4 };
        for method in [Method::Sat, Method::BestFirst] {
            assert!(matches!(solve(&grid, method, limits).outcome, Err(SolverFailure::EncodingOverflow { .. })));
        }
        for method in [Method::Backtrack, Method::BruteForce] {
            assert!(solve(&grid, method, limits).outcome.is_ok());
        }
    }

    #[test]
    fn method_names() {
        assert_eq!("astar".parse::<Method>().unwrap(), Method::BestFirst);
        assert_eq!("bruteforce".parse::<Method>().unwrap(), Method::BruteForce);
        assert_eq!("backtrack".parse::<Method>().unwrap(), Method::Backtrack);
        assert_eq!(Method::BestFirst.to_string(), "best-first");
        assert_eq!(Method::default(), Method::Sat);
    }
}
