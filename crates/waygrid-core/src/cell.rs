//! Per-cell state: persistent editing kinds, transient search-visit marks,
//! and the combined [`Role`] view.

use crate::coord::Coord;

/// Persistent editing state of a cell.
///
/// At most one cell in a grid carries `Start` and at most one carries `End`;
/// maintaining that invariant is the editor's (or caller's) responsibility.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Empty,
    Start,
    End,
    Barrier,
}

/// Transient search-visit marker, layered over the kind during a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisitMark {
    #[default]
    None,
    Open,
    Closed,
    Path,
}

/// The combined observable role of a cell.
///
/// Kind wins over mark: start, end and barrier cells keep their role while
/// a search runs, even if the search has touched them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Empty,
    Start,
    End,
    Barrier,
    Open,
    Closed,
    Path,
}

/// A snapshot of one grid cell.
///
/// Cells are `Copy` values read from and written through the grid, never
/// references into it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub coord: Coord,
    pub kind: CellKind,
    pub mark: VisitMark,
}

impl Cell {
    /// The combined role derived from kind and mark.
    #[inline]
    pub fn role(self) -> Role {
        match self.kind {
            CellKind::Start => Role::Start,
            CellKind::End => Role::End,
            CellKind::Barrier => Role::Barrier,
            CellKind::Empty => match self.mark {
                VisitMark::None => Role::Empty,
                VisitMark::Open => Role::Open,
                VisitMark::Closed => Role::Closed,
                VisitMark::Path => Role::Path,
            },
        }
    }

    /// True unless the cell is a barrier.
    #[inline]
    pub fn is_passable(self) -> bool {
        self.kind != CellKind::Barrier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellKind, mark: VisitMark) -> Cell {
        Cell {
            coord: Coord::ZERO,
            kind,
            mark,
        }
    }

    #[test]
    fn role_of_empty_cell_follows_mark() {
        assert_eq!(cell(CellKind::Empty, VisitMark::None).role(), Role::Empty);
        assert_eq!(cell(CellKind::Empty, VisitMark::Open).role(), Role::Open);
        assert_eq!(cell(CellKind::Empty, VisitMark::Closed).role(), Role::Closed);
        assert_eq!(cell(CellKind::Empty, VisitMark::Path).role(), Role::Path);
    }

    #[test]
    fn kind_wins_over_mark() {
        // A search may mark the end cell open when it discovers it; the
        // observable role must stay End.
        assert_eq!(cell(CellKind::End, VisitMark::Open).role(), Role::End);
        assert_eq!(cell(CellKind::Start, VisitMark::Closed).role(), Role::Start);
        assert_eq!(cell(CellKind::Barrier, VisitMark::None).role(), Role::Barrier);
    }

    #[test]
    fn only_barriers_are_impassable() {
        assert!(cell(CellKind::Empty, VisitMark::None).is_passable());
        assert!(cell(CellKind::Start, VisitMark::None).is_passable());
        assert!(cell(CellKind::End, VisitMark::None).is_passable());
        assert!(!cell(CellKind::Barrier, VisitMark::None).is_passable());
    }
}
