//! Exact solver for the assignment problem (Kuhn–Munkres).
//!
//! The solver works on a square cost matrix. Rectangular inputs are padded
//! with dummy rows or columns whose cells cost the same as an unreachable
//! pair, so a dummy pairing never displaces a real edge.
//!
//! Non-edges cost 100 (a zero score) rather than an effectively infinite
//! sentinel: the optimum maximizes total score, not the number of real pairs.
//!
//! # Steps
//! 1. Subtract each row minimum, then each column minimum
//! 2. Star independent zeros greedily (seed for the partial matching)
//! 3. Cover every column holding a starred zero; done once all are covered
//! 4. Prime an uncovered zero. If its row has a starred zero, cover the row
//!    and uncover the star's column; otherwise augment along the alternating
//!    prime/star path starting at it and go back to 3
//! 5. With no uncovered zero left, add the smallest uncovered value to every
//!    covered row and subtract it from every uncovered column, then resume 4

use crate::core::error::MatchError;
use crate::core::graph::{BipartiteGraph, Node};
use crate::core::scoring::MAX_SCORE;

/// Cost of a cell without a positive-score edge
///
/// Equal to the cost of a zero-score pairing: choosing it adds nothing to
/// the total score, and such cells are never reported as assignments.
pub const UNREACHABLE: u32 = MAX_SCORE as u32;

/// Square cost matrix, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    size: usize,
    cells: Vec<u32>,
}

impl CostMatrix {
    /// Matrix for `rows` real rows and `cols` real columns, every cell unreachable
    pub fn new(rows: usize, cols: usize) -> Result<Self, MatchError> {
        let size = rows.max(cols);
        let len = size
            .checked_mul(size)
            .ok_or(MatchError::SizeOverflow { rows, cols })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(MatchError::allocation("cost matrix"))?;
        cells.resize(len, UNREACHABLE);

        Ok(Self { rows, cols, size, cells })
    }

    /// Matrix with `cost = 100 - weight` for every graph edge
    pub fn from_graph(graph: &BipartiteGraph) -> Result<Self, MatchError> {
        let mut matrix = Self::new(graph.num_freelancers(), graph.num_projects())?;

        for f in 0..graph.num_freelancers() {
            for (node, weight) in graph.neighbors(Node::Freelancer(f)) {
                if let Node::Project(p) = node {
                    matrix.set(f, p, UNREACHABLE - u32::from(weight));
                }
            }
        }

        Ok(matrix)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Side length after padding
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cost: u32) {
        self.cells[row * self.size + col] = cost;
    }

    /// True when the cell is a real row, a real column and a real edge
    #[inline]
    pub fn is_reachable(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.get(row, col) < UNREACHABLE
    }

    /// Minimum-cost perfect matching on the padded matrix
    ///
    /// Returns `(row, col)` pairs restricted to real rows, real columns and
    /// reachable cells, ordered by row.
    pub fn solve(&self) -> Result<Vec<(usize, usize)>, MatchError> {
        let row_to_col = Munkres::new(self)?.run()?;

        Ok(row_to_col
            .into_iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|col| (row, col)))
            .filter(|&(row, col)| self.is_reachable(row, col))
            .collect())
    }
}

/// Working state of one Kuhn–Munkres run
struct Munkres {
    n: usize,
    cost: Vec<i64>,
    star_in_row: Vec<Option<usize>>,
    star_in_col: Vec<Option<usize>>,
    prime_in_row: Vec<Option<usize>>,
    row_covered: Vec<bool>,
    col_covered: Vec<bool>,
}

impl Munkres {
    fn new(matrix: &CostMatrix) -> Result<Self, MatchError> {
        let n = matrix.size;

        let mut cost = Vec::new();
        cost.try_reserve_exact(matrix.cells.len())
            .map_err(MatchError::allocation("solver working matrix"))?;
        cost.extend(matrix.cells.iter().map(|&c| i64::from(c)));

        Ok(Self {
            n,
            cost,
            star_in_row: vec![None; n],
            star_in_col: vec![None; n],
            prime_in_row: vec![None; n],
            row_covered: vec![false; n],
            col_covered: vec![false; n],
        })
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> i64 {
        self.cost[row * self.n + col]
    }

    fn run(mut self) -> Result<Vec<Option<usize>>, MatchError> {
        if self.n == 0 {
            return Ok(Vec::new());
        }

        self.reduce();
        self.star_initial_zeros();

        loop {
            if self.cover_starred_columns() == self.n {
                break;
            }

            // Step 4 / 5 until an augmenting path is found
            loop {
                match self.find_uncovered_zero() {
                    Some((row, col)) => {
                        self.prime_in_row[row] = Some(col);
                        match self.star_in_row[row] {
                            Some(star_col) => {
                                self.row_covered[row] = true;
                                self.col_covered[star_col] = false;
                            }
                            None => {
                                self.augment(row, col)?;
                                self.clear_covers_and_primes();
                                break;
                            }
                        }
                    }
                    None => {
                        if !self.adjust_by_min_uncovered() {
                            // Fewer than n stars leave at least one row and one column uncovered
                            return Err(MatchError::SolverInvariant("no uncovered cell left to adjust"));
                        }
                    }
                }
            }
        }

        Ok(self.star_in_row)
    }

    fn reduce(&mut self) {
        let n = self.n;

        for row in 0..n {
            let slice = &mut self.cost[row * n..(row + 1) * n];
            let min = slice.iter().copied().min().unwrap_or(0);
            slice.iter_mut().for_each(|c| *c -= min);
        }

        for col in 0..n {
            let min = (0..n).map(|row| self.at(row, col)).min().unwrap_or(0);
            if min != 0 {
                for row in 0..n {
                    self.cost[row * n + col] -= min;
                }
            }
        }
    }

    fn star_initial_zeros(&mut self) {
        for row in 0..self.n {
            for col in 0..self.n {
                if self.at(row, col) == 0 && self.star_in_col[col].is_none() {
                    self.star_in_row[row] = Some(col);
                    self.star_in_col[col] = Some(row);
                    break;
                }
            }
        }
    }

    fn cover_starred_columns(&mut self) -> usize {
        let mut covered = 0;
        for col in 0..self.n {
            let starred = self.star_in_col[col].is_some();
            self.col_covered[col] = starred;
            if starred {
                covered += 1;
            }
        }
        covered
    }

    fn find_uncovered_zero(&self) -> Option<(usize, usize)> {
        (0..self.n)
            .filter(|&row| !self.row_covered[row])
            .find_map(|row| {
                (0..self.n)
                    .find(|&col| !self.col_covered[col] && self.at(row, col) == 0)
                    .map(|col| (row, col))
            })
    }

    /// Flip stars along the alternating path that starts at the primed zero
    /// `(row, col)`: each prime becomes a star, each star on the path is
    /// replaced by the prime in its row.
    fn augment(&mut self, mut row: usize, mut col: usize) -> Result<(), MatchError> {
        loop {
            let displaced_row = self.star_in_col[col];

            self.star_in_row[row] = Some(col);
            self.star_in_col[col] = Some(row);

            let Some(next_row) = displaced_row else {
                return Ok(());
            };

            // A starred row only gets onto the path through its prime
            let next_col = self.prime_in_row[next_row]
                .ok_or(MatchError::SolverInvariant("starred row on augmenting path has no prime"))?;

            row = next_row;
            col = next_col;
        }
    }

    fn clear_covers_and_primes(&mut self) {
        self.row_covered.iter_mut().for_each(|c| *c = false);
        self.col_covered.iter_mut().for_each(|c| *c = false);
        self.prime_in_row.iter_mut().for_each(|p| *p = None);
    }

    fn adjust_by_min_uncovered(&mut self) -> bool {
        let n = self.n;

        let min = (0..n)
            .filter(|&row| !self.row_covered[row])
            .flat_map(|row| {
                (0..n)
                    .filter(|&col| !self.col_covered[col])
                    .map(move |col| (row, col))
            })
            .map(|(row, col)| self.at(row, col))
            .min();

        let Some(min) = min else {
            return false;
        };

        for row in 0..n {
            for col in 0..n {
                let idx = row * n + col;
                if self.row_covered[row] {
                    self.cost[idx] += min;
                }
                if !self.col_covered[col] {
                    self.cost[idx] -= min;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_from_scores(scores: &[&[u8]]) -> CostMatrix {
        let rows = scores.len();
        let cols = scores.first().map(|r| r.len()).unwrap_or(0);
        let mut matrix = CostMatrix::new(rows, cols).unwrap();
        for (i, row) in scores.iter().enumerate() {
            for (j, &score) in row.iter().enumerate() {
                if score > 0 {
                    matrix.set(i, j, UNREACHABLE - u32::from(score));
                }
            }
        }
        matrix
    }

    fn total_score(matrix: &CostMatrix, pairs: &[(usize, usize)]) -> u32 {
        pairs.iter().map(|&(r, c)| UNREACHABLE - matrix.get(r, c)).sum()
    }

    #[test]
    fn test_augment_without_prime_is_invariant_error() {
        let matrix = CostMatrix::new(2, 2).unwrap();
        let mut munkres = Munkres::new(&matrix).unwrap();

        // Star at (0, 0) with no prime recorded in row 0
        munkres.star_in_row[0] = Some(0);
        munkres.star_in_col[0] = Some(0);

        let err = munkres.augment(1, 0).unwrap_err();
        assert!(matches!(err, MatchError::SolverInvariant(_)));
    }

    #[test]
    fn test_adjust_with_everything_covered_reports_failure() {
        let matrix = CostMatrix::new(2, 2).unwrap();
        let mut munkres = Munkres::new(&matrix).unwrap();
        munkres.row_covered = vec![true; 2];

        assert!(!munkres.adjust_by_min_uncovered());
        // Untouched
        assert_eq!(munkres.cost, vec![i64::from(UNREACHABLE); 4]);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = CostMatrix::new(0, 0).unwrap();
        assert!(matrix.solve().unwrap().is_empty());

        let matrix = CostMatrix::new(0, 4).unwrap();
        assert!(matrix.solve().unwrap().is_empty());
    }

    #[test]
    fn test_no_reachable_cells() {
        let matrix = CostMatrix::new(3, 2).unwrap();
        assert!(matrix.solve().unwrap().is_empty());
    }

    #[test]
    fn test_greedy_seed_is_not_enough() {
        // Greedy zero starring puts row 0 on column 0 and leaves row 1 without
        // an independent zero; the optimum needs an augmenting path.
        let matrix = matrix_from_scores(&[&[90, 80], &[90, 10]]);
        let pairs = matrix.solve().unwrap();

        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
        assert_eq!(total_score(&matrix, &pairs), 170);
    }

    #[test]
    fn test_classic_three_by_three() {
        let matrix = matrix_from_scores(&[&[60, 70, 50], &[90, 40, 80], &[70, 90, 60]]);
        let pairs = matrix.solve().unwrap();

        // Two optimal permutations, both 230: 60 + 80 + 90 and 50 + 90 + 90
        assert_eq!(total_score(&matrix, &pairs), 230);
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_weight_beats_cardinality() {
        // Pairing both rows would total 2; a single strong pair totals 100.
        let matrix = matrix_from_scores(&[&[100, 1], &[1, 0]]);
        let pairs = matrix.solve().unwrap();

        assert_eq!(pairs, vec![(0, 0)]);
    }

    #[test]
    fn test_rectangular_padding_dropped() {
        let matrix = matrix_from_scores(&[&[30, 0], &[80, 0], &[50, 0]]);
        assert_eq!(matrix.size(), 3);

        let pairs = matrix.solve().unwrap();
        assert_eq!(pairs, vec![(1, 0)]);
    }

    #[test]
    fn test_wide_matrix() {
        let matrix = matrix_from_scores(&[&[10, 20, 95, 40]]);
        let pairs = matrix.solve().unwrap();
        assert_eq!(pairs, vec![(0, 2)]);
    }

    #[test]
    fn test_from_graph_costs() {
        let mut builder = BipartiteGraph::builder(2, 3);
        builder.add_edge(0, 2, 75).unwrap();
        builder.add_edge(1, 0, 100).unwrap();
        let graph = builder.build().unwrap();

        let matrix = CostMatrix::from_graph(&graph).unwrap();
        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.get(0, 2), 25);
        assert_eq!(matrix.get(1, 0), 0);
        assert_eq!(matrix.get(0, 0), UNREACHABLE);
        assert_eq!(matrix.get(2, 1), UNREACHABLE);
        assert!(!matrix.is_reachable(2, 0));
    }
}
