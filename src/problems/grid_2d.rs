use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

use crate::problem::ObjectiveProblem;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 40;

/// Probability of a cell being blocked on generated grids.
pub const DEFAULT_OBSTACLE_PROBABILITY: f64 = 0.3;

pub type CoordIntrinsic = u32;

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("({row},{col})")]
pub struct Cell {
    pub row: CoordIntrinsic,
    pub col: CoordIntrinsic,
}

impl Cell {
    pub const fn new(row: CoordIntrinsic, col: CoordIntrinsic) -> Cell {
        Cell { row, col }
    }
    pub(crate) fn new_from_small_usize(row: usize, col: usize) -> Cell {
        debug_assert!(row <= CoordIntrinsic::MAX as usize);
        debug_assert!(col <= CoordIntrinsic::MAX as usize);
        Cell {
            row: row as CoordIntrinsic,
            col: col as CoordIntrinsic,
        }
    }
}
impl State for Cell {}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum GridCell {
    #[display("░")]
    Free,
    #[display("█")]
    Blocked,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridCellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for GridCell {
    type Error = GridCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' | '░' => Ok(GridCell::Free),
            '#' | '█' => Ok(GridCell::Blocked),
            ch => Err(GridCellParseError::InvalidCharacter(ch)),
        }
    }
}

/// A rectangular map of free and blocked cells, stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<GridCell>,
}

impl Grid {
    pub fn new_free(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![GridCell::Free; rows * cols],
        }
    }

    /// Blocks every cell independently with probability `obstacle_prob`.
    pub fn random<R: rand::Rng>(r: &mut R, rows: usize, cols: usize, obstacle_prob: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&obstacle_prob));

        let cells = (0..rows * cols)
            .map(|_| {
                if r.random::<f64>() < obstacle_prob {
                    GridCell::Blocked
                } else {
                    GridCell::Free
                }
            })
            .collect();
        Self { rows, cols, cells }
    }

    /// (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline(always)]
    fn index(&self, cell: &Cell) -> usize {
        debug_assert!(self.valid(cell), "{cell} is out of {:?}", self);
        cell.row as usize * self.cols + cell.col as usize
    }

    #[inline(always)]
    pub fn at(&self, cell: &Cell) -> GridCell {
        self.cells[self.index(cell)]
    }

    #[inline(always)]
    pub fn is_free(&self, cell: &Cell) -> bool {
        self.at(cell) == GridCell::Free
    }

    pub fn set(&mut self, cell: &Cell, value: GridCell) {
        let i = self.index(cell);
        self.cells[i] = value;
    }

    pub fn blocked_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == GridCell::Blocked)
            .count()
    }
}

impl Space<Cell> for Grid {
    #[inline(always)]
    fn valid(&self, cell: &Cell) -> bool {
        (cell.row as usize) < self.rows && (cell.col as usize) < self.cols
    }

    /// Free cells one unit step away (right, down, left, up).
    fn neighbours(&self, cell: &Cell) -> SmallVec<[Cell; 4]> {
        let mut v = SmallVec::<[Cell; 4]>::new();

        let prev = CoordIntrinsic::MAX;
        let same = 0 as CoordIntrinsic;
        let next = 1 as CoordIntrinsic;

        for (dr, dc) in [(same, next), (next, same), (same, prev), (prev, same)] {
            let s = Cell {
                row: cell.row.wrapping_add(dr),
                col: cell.col.wrapping_add(dc),
            };
            if self.valid(&s) && self.is_free(&s) {
                v.push(s);
            }
        }
        v
    }

    fn size(&self) -> Option<usize> {
        Some(self.cells.len())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid cell '{ch}' found at ({row},{col})")]
    InvalidCell { ch: char, row: usize, col: usize },
    #[error("Missing start cell 'S'")]
    MissingStart,
    #[error("Missing goal cell 'G'")]
    MissingGoal,
    #[error("Duplicate '{ch}' found at ({row},{col})")]
    Duplicate { ch: char, row: usize, col: usize },
}

/// Splits `s` into rows of equal length, calling `cell` for each character.
fn parse_rows<F>(s: &str, mut cell: F) -> Result<Grid, GridParseError>
where
    F: FnMut(char, usize, usize) -> Result<GridCell, GridParseError>,
{
    let lines: Vec<&str> = s.lines().collect();
    if lines.is_empty() || lines[0].is_empty() {
        return Err(GridParseError::EmptyInput);
    }

    let rows = lines.len();
    let cols = lines[0].chars().count();
    let mut grid = Grid::new_free(rows, cols);

    for (row, line) in lines.iter().enumerate() {
        let found = line.chars().count();
        if found != cols {
            return Err(GridParseError::RaggedRow {
                row,
                expected: cols,
                found,
            });
        }
        for (col, ch) in line.chars().enumerate() {
            let value = cell(ch, row, col)?;
            grid.set(&Cell::new_from_small_usize(row, col), value);
        }
    }

    Ok(grid)
}

impl std::convert::TryFrom<&str> for Grid {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        parse_rows(s, |ch, row, col| {
            GridCell::try_from(ch).map_err(|_| GridParseError::InvalidCell { ch, row, col })
        })
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Grid({}x{}):", self.rows, self.cols)?;
        for row in self.cells.chunks(self.cols.max(1)).take(MAX_ELEMENTS_DISPLAYED) {
            for cell in row.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid{:?}", self.dimensions())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridProblem {
    pub grid: Grid,
    pub start: Cell,
    pub goal: Cell,
}

impl GridProblem {
    /// Generates a `size`x`size` grid with uniformly random start and goal.
    ///
    /// Start and goal are always free, but may be the same cell.
    pub fn random<R: rand::Rng>(r: &mut R, size: usize, obstacle_prob: f64) -> Self {
        debug_assert!(size > 0);
        let mut grid = Grid::random(r, size, size, obstacle_prob);
        let random_cell = |r: &mut R| {
            Cell::new_from_small_usize(r.random_range(0..size), r.random_range(0..size))
        };
        let start = random_cell(r);
        let goal = random_cell(r);
        grid.set(&start, GridCell::Free);
        grid.set(&goal, GridCell::Free);

        Self { grid, start, goal }
    }
}

impl ObjectiveProblem<Grid, Cell> for GridProblem {
    fn space(&self) -> &Grid {
        &self.grid
    }
    fn start(&self) -> Cell {
        self.start
    }
    fn goal(&self) -> Cell {
        self.goal
    }
}

impl std::convert::TryFrom<&str> for GridProblem {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut start: Option<Cell> = None;
        let mut goal: Option<Cell> = None;

        let grid = parse_rows(s, |ch, row, col| {
            let slot = match ch {
                'S' => &mut start,
                'G' => &mut goal,
                ch => {
                    return GridCell::try_from(ch)
                        .map_err(|_| GridParseError::InvalidCell { ch, row, col });
                }
            };
            if slot.is_some() {
                return Err(GridParseError::Duplicate { ch, row, col });
            }
            *slot = Some(Cell::new_from_small_usize(row, col));
            Ok(GridCell::Free)
        })?;

        Ok(GridProblem {
            grid,
            start: start.ok_or(GridParseError::MissingStart)?,
            goal: goal.ok_or(GridParseError::MissingGoal)?,
        })
    }
}

impl std::fmt::Display for GridProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (rows, cols) = self.grid.dimensions();
        writeln!(
            f,
            "GridProblem({}x{}) (s:{}, g:{}):",
            rows, cols, self.start, self.goal
        )?;
        for row in 0..rows.min(MAX_ELEMENTS_DISPLAYED) {
            for col in 0..cols.min(MAX_ELEMENTS_DISPLAYED) {
                let c = Cell::new_from_small_usize(row, col);
                match (c == self.start, c == self.goal) {
                    (true, true) => write!(f, "!")?,
                    (true, false) => write!(f, "S")?,
                    (false, true) => write!(f, "G")?,
                    (false, false) => write!(f, "{}", self.grid.at(&c))?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn parse_problem() {
        let problem = GridProblem::try_from(indoc! {"
            S.#
            ..#
            #.G
        "})
        .unwrap();

        assert_eq!(problem.grid.dimensions(), (3, 3));
        assert_eq!(problem.start, Cell::new(0, 0));
        assert_eq!(problem.goal, Cell::new(2, 2));
        assert_eq!(problem.grid.blocked_cells(), 3);
        assert!(problem.grid.is_free(&problem.goal));
        assert_eq!(problem.grid.at(&Cell::new(0, 2)), GridCell::Blocked);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(GridProblem::try_from(""), Err(GridParseError::EmptyInput));
        assert_eq!(
            GridProblem::try_from("S.\n.G.\n"),
            Err(GridParseError::RaggedRow {
                row: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            GridProblem::try_from("S?\n.G\n"),
            Err(GridParseError::InvalidCell {
                ch: '?',
                row: 0,
                col: 1
            })
        );
        assert_eq!(
            GridProblem::try_from("S.\n..\n"),
            Err(GridParseError::MissingGoal)
        );
        assert_eq!(
            GridProblem::try_from("SS\n.G\n"),
            Err(GridParseError::Duplicate {
                ch: 'S',
                row: 0,
                col: 1
            })
        );
        assert!(Grid::try_from("S.\n..\n").is_err());
    }

    #[test]
    fn neighbours_stay_in_bounds() {
        let grid = Grid::try_from(indoc! {"
            ..#
            .#.
            ...
        "})
        .unwrap();

        let corner = grid.neighbours(&Cell::new(0, 0));
        assert_eq!(corner.as_slice(), &[Cell::new(0, 1), Cell::new(1, 0)]);

        let walled = grid.neighbours(&Cell::new(1, 0));
        assert_eq!(walled.as_slice(), &[Cell::new(2, 0), Cell::new(0, 0)]);

        let bottom_right = grid.neighbours(&Cell::new(2, 2));
        assert_eq!(
            bottom_right.as_slice(),
            &[Cell::new(2, 1), Cell::new(1, 2)]
        );
    }

    #[test]
    fn display_round_trips() {
        let grid = Grid::try_from("..#\n#..\n").unwrap();
        let shown = grid.to_string();
        let body: String = shown.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert_eq!(Grid::try_from(body.as_str()).unwrap(), grid);
    }

    #[test]
    fn random_problem_is_seeded() {
        let a = GridProblem::random(&mut ChaCha8Rng::seed_from_u64(7), 20, 0.3);
        let b = GridProblem::random(&mut ChaCha8Rng::seed_from_u64(7), 20, 0.3);
        assert_eq!(a, b);
    }

    #[test]
    fn random_problem_frees_endpoints() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let p = GridProblem::random(&mut rng, 8, 0.9);
            assert_eq!(p.grid.dimensions(), (8, 8));
            assert!(p.grid.is_free(&p.start));
            assert!(p.grid.is_free(&p.goal));
        }
    }

    #[test]
    fn obstacle_probability_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(Grid::random(&mut rng, 10, 10, 0.0).blocked_cells(), 0);
        assert_eq!(Grid::random(&mut rng, 10, 10, 1.0).blocked_cells(), 100);
    }
}
