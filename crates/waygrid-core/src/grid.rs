//! The [`Grid`] type — a square 2D grid of cells with shared storage.
//!
//! A `Grid` is a view onto a shared backing buffer. Cloning yields another
//! view of the **same** storage, so an editor, a running search and a
//! renderer can observe each other's writes without holding references into
//! the grid.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cell::{Cell, CellKind, VisitMark};
use crate::coord::Coord;

/// Errors from grid construction and addressing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Grid constructed with a non-positive row count.
    InvalidSize { rows: i32 },
    /// Coordinate outside `[0, rows)` on either axis.
    OutOfBounds { coord: Coord, rows: i32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { rows } => write!(f, "invalid grid size: {rows} rows"),
            Self::OutOfBounds { coord, rows } => {
                write!(f, "coordinate {coord} outside {rows}x{rows} grid")
            }
        }
    }
}

impl std::error::Error for GridError {}

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct CellState {
    kind: CellKind,
    mark: VisitMark,
}

#[derive(Debug, Clone)]
struct GridBuffer {
    cells: Vec<CellState>,
    rows: i32,
}

impl GridBuffer {
    #[inline]
    fn index(&self, c: Coord) -> Option<usize> {
        if c.row >= 0 && c.col >= 0 && c.row < self.rows && c.col < self.rows {
            Some((c.row * self.rows + c.col) as usize)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A square `rows × rows` grid of cells backed by shared storage.
///
/// Cloning produces another view into the same buffer. All accessors take
/// `&self`; mutation goes through interior mutability, and no borrow is
/// held across a call boundary.
#[derive(Debug, Clone)]
pub struct Grid {
    buf: Rc<RefCell<GridBuffer>>,
    rows: i32,
}

impl Grid {
    /// Create a new grid with every cell empty and unmarked, positions
    /// assigned in row-major order.
    pub fn new(rows: i32) -> Result<Self, GridError> {
        if rows < 1 {
            return Err(GridError::InvalidSize { rows });
        }
        let cells = vec![CellState::default(); (rows * rows) as usize];
        Ok(Self {
            buf: Rc::new(RefCell::new(GridBuffer { cells, rows })),
            rows,
        })
    }

    /// Side length of the grid.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Total number of cells (`rows²`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.rows * self.rows) as usize
    }

    /// Whether `c` lies inside the grid.
    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.row >= 0 && c.col >= 0 && c.row < self.rows && c.col < self.rows
    }

    fn index(&self, c: Coord) -> Result<usize, GridError> {
        self.buf.borrow().index(c).ok_or(GridError::OutOfBounds {
            coord: c,
            rows: self.rows,
        })
    }

    /// Snapshot of the cell at `c`.
    pub fn cell(&self, c: Coord) -> Result<Cell, GridError> {
        let i = self.index(c)?;
        let state = self.buf.borrow().cells[i];
        Ok(Cell {
            coord: c,
            kind: state.kind,
            mark: state.mark,
        })
    }

    /// Persistent editing state of the cell at `c`.
    pub fn kind(&self, c: Coord) -> Result<CellKind, GridError> {
        let i = self.index(c)?;
        Ok(self.buf.borrow().cells[i].kind)
    }

    /// Overwrite the editing state of the cell at `c`.
    ///
    /// No validation beyond bounds: keeping a single start and a single end
    /// per grid is the caller's invariant.
    pub fn set_kind(&self, c: Coord, kind: CellKind) -> Result<(), GridError> {
        let i = self.index(c)?;
        self.buf.borrow_mut().cells[i].kind = kind;
        Ok(())
    }

    /// Search-visit marker of the cell at `c`.
    pub fn mark(&self, c: Coord) -> Result<VisitMark, GridError> {
        let i = self.index(c)?;
        Ok(self.buf.borrow().cells[i].mark)
    }

    /// Overwrite the search-visit marker of the cell at `c`.
    pub fn set_mark(&self, c: Coord, mark: VisitMark) -> Result<(), GridError> {
        let i = self.index(c)?;
        self.buf.borrow_mut().cells[i].mark = mark;
        Ok(())
    }

    /// Whether `c` is inside the grid and not a barrier.
    pub fn is_passable(&self, c: Coord) -> bool {
        let buf = self.buf.borrow();
        match buf.index(c) {
            Some(i) => buf.cells[i].kind != CellKind::Barrier,
            None => false,
        }
    }

    /// Set every cell back to empty and unmarked.
    pub fn reset(&self) {
        let mut buf = self.buf.borrow_mut();
        for state in buf.cells.iter_mut() {
            *state = CellState::default();
        }
    }

    /// Clear every cell's visit marker, leaving editing state untouched.
    pub fn clear_marks(&self) {
        let mut buf = self.buf.borrow_mut();
        for state in buf.cells.iter_mut() {
            state.mark = VisitMark::None;
        }
    }

    /// Append the in-bounds, non-barrier neighbours of `c` into `buf`, in
    /// down/up/right/left order. The caller clears `buf` before calling.
    ///
    /// Adjacency is computed fresh on every call, so edits made between
    /// runs are always respected.
    pub fn passable_neighbors(&self, c: Coord, buf: &mut Vec<Coord>) {
        let b = self.buf.borrow();
        for n in c.adjacent_4() {
            if let Some(i) = b.index(n) {
                if b.cells[i].kind != CellKind::Barrier {
                    buf.push(n);
                }
            }
        }
    }

    /// Row-major iterator over cell snapshots.
    pub fn iter(&self) -> GridIter {
        let buf = self.buf.borrow();
        // Snapshot so the iterator does not hold the borrow.
        let cells = buf
            .cells
            .iter()
            .enumerate()
            .map(|(i, state)| Cell {
                coord: Coord::new(i as i32 / buf.rows, i as i32 % buf.rows),
                kind: state.kind,
                mark: state.mark,
            })
            .collect();
        GridIter { cells, pos: 0 }
    }
}

/// Iterator over a row-major snapshot of a [`Grid`].
pub struct GridIter {
    cells: Vec<Cell>,
    pos: usize,
}

impl Iterator for GridIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let cell = self.cells.get(self.pos).copied()?;
        self.pos += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIter {}

impl IntoIterator for &Grid {
    type Item = Cell;
    type IntoIter = GridIter;

    fn into_iter(self) -> GridIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct GridRepr {
        rows: i32,
        cells: Vec<CellState>,
    }

    impl Serialize for Grid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let buf = self.buf.borrow();
            GridRepr {
                rows: buf.rows,
                cells: buf.cells.clone(),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Grid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = GridRepr::deserialize(deserializer)?;
            if repr.rows < 1 || repr.cells.len() != (repr.rows * repr.rows) as usize {
                return Err(serde::de::Error::custom("grid size mismatch"));
            }
            Ok(Grid {
                buf: Rc::new(RefCell::new(GridBuffer {
                    cells: repr.cells,
                    rows: repr.rows,
                })),
                rows: repr.rows,
            })
        }
    }
}
