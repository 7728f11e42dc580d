use waygrid_core::{Coord, Grid, VisitMark};

/// Search-space interface — a square arrangement of passable and blocked
/// cells.
///
/// The engine addresses cells by `(row, col)` within `[0, rows)²` and asks
/// the space for adjacency; everything else (scores, frontier, predecessor
/// chain) is the engine's own bookkeeping.
pub trait SearchSpace {
    /// Side length of the square space.
    fn rows(&self) -> i32;

    /// Whether `c` lies inside the space and is traversable.
    fn is_passable(&self, c: Coord) -> bool;

    /// Append the passable neighbours of `c` into `buf`, in a fixed
    /// deterministic order. The caller clears `buf` before calling.
    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>);

    /// Record a search progress marker for `c`. Spaces with no visual
    /// surface can ignore this; the default does.
    fn mark(&self, c: Coord, mark: VisitMark) {
        let _ = (c, mark);
    }
}

impl SearchSpace for Grid {
    fn rows(&self) -> i32 {
        Grid::rows(self)
    }

    fn is_passable(&self, c: Coord) -> bool {
        Grid::is_passable(self, c)
    }

    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>) {
        self.passable_neighbors(c, buf);
    }

    fn mark(&self, c: Coord, mark: VisitMark) {
        // The engine only marks coordinates it got from this space, so the
        // bounds check cannot fail.
        let _ = self.set_mark(c, mark);
    }
}
