//! Start/end/barrier painting rules for interactive grid editing.

use crate::cell::{CellKind, VisitMark};
use crate::coord::Coord;
use crate::grid::{Grid, GridError};

/// Applies paint and erase edits to a [`Grid`] while maintaining the
/// single-start/single-end invariant.
///
/// Painting follows a fixed precedence: the first painted cell becomes the
/// start, the second becomes the end, and every further paint lays a
/// barrier. A paint aimed at the current start or end is a no-op, so the
/// endpoints are never overwritten by barriers.
pub struct GridEditor {
    grid: Grid,
    start: Option<Coord>,
    end: Option<Coord>,
}

impl GridEditor {
    /// Wrap a grid for editing. Existing start/end cells are picked up, so
    /// an editor can resume a previously edited grid.
    pub fn new(grid: Grid) -> Self {
        let mut start = None;
        let mut end = None;
        for cell in grid.iter() {
            match cell.kind {
                CellKind::Start => start = Some(cell.coord),
                CellKind::End => end = Some(cell.coord),
                _ => {}
            }
        }
        Self { grid, start, end }
    }

    /// The grid being edited. Clones share storage with it.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The start cell, if one has been painted.
    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    /// The end cell, if one has been painted.
    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    /// Both endpoints, once both are placed. A search needs both.
    pub fn endpoints(&self) -> Option<(Coord, Coord)> {
        Some((self.start?, self.end?))
    }

    /// Paint the cell at `c` according to the precedence rules.
    pub fn paint(&mut self, c: Coord) -> Result<(), GridError> {
        if self.start.is_none() && self.end != Some(c) {
            self.grid.set_kind(c, CellKind::Start)?;
            self.start = Some(c);
        } else if self.end.is_none() && self.start != Some(c) {
            self.grid.set_kind(c, CellKind::End)?;
            self.end = Some(c);
        } else if self.start != Some(c) && self.end != Some(c) {
            self.grid.set_kind(c, CellKind::Barrier)?;
        }
        Ok(())
    }

    /// Erase the cell at `c` back to empty, forgetting the start or end if
    /// one of them was erased.
    pub fn erase(&mut self, c: Coord) -> Result<(), GridError> {
        self.grid.set_kind(c, CellKind::Empty)?;
        self.grid.set_mark(c, VisitMark::None)?;
        if self.start == Some(c) {
            self.start = None;
        }
        if self.end == Some(c) {
            self.end = None;
        }
        Ok(())
    }

    /// Reset the whole grid and forget both endpoints.
    pub fn clear(&mut self) {
        self.grid.reset();
        self.start = None;
        self.end = None;
    }
}
