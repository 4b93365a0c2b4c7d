//! Entry point for JavaScript, behind the `wasm` feature.

use wasm_bindgen::prelude::*;

use crate::encoder::EncodingLimits;
use crate::grid::Grid;
use crate::strategy::{solve, Method, SolverFailure};

fn solve_text(text: &str, method: &str, plain: bool) -> Result<Option<String>, String> {
    let grid: Grid = text.parse().map_err(|e| format!("{e}"))?;
    let method: Method = method.parse().map_err(|_| format!("unknown method {method:?}"))?;

    match solve(&grid, method, EncodingLimits::default()).outcome {
        Ok(solution) => {
            let rendered = solution.render(&grid);
            Ok(Some(if plain { rendered.to_string() } else { rendered.to_list_string() }))
        }
        Err(SolverFailure::Unsatisfiable) => Ok(None),
        Err(failure) => Err(failure.to_string()),
    }
}

/// Parse a puzzle, solve it with the named method and render the result; `undefined` when there is no solution.
#[wasm_bindgen(js_name = solvePuzzle)]
pub fn solve_puzzle(text: &str, method: &str, plain: bool) -> Result<Option<String>, JsValue> {
    solve_text(text, method, plain).map_err(|message| js_sys::Error::new(&message).into())
}

#[cfg(test)]
mod tests {
    use super::solve_text;

    #[test]
    fn solves_from_text() {
        assert_eq!(solve_text("1, 0, 1\n", "astar", true), Ok(Some("1-1\n".to_string())));
        assert_eq!(solve_text("4 0 4\n", "sat", false), Ok(None));
        assert!(solve_text("2 x\n", "sat", false).is_err());
        assert!(solve_text("2 0 2\n", "simulated-annealing", false).is_err());
    }
}
