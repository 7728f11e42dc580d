//! The A\* search engine over unit-cost, 4-connected grids.

use std::fmt;

use log::{debug, trace};
use waygrid_core::{Coord, VisitMark};

use crate::distance::manhattan;
use crate::frontier::Frontier;
use crate::reconstruct::backtrack;
use crate::traits::SearchSpace;

/// Implicit +∞ for cells no run has scored yet.
pub const UNREACHABLE: i32 = i32::MAX;

/// Sentinel parent index meaning "no predecessor".
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Per-cell bookkeeping, lazily invalidated by generation stamping: entries
/// whose stamp differs from the current run's are treated as unscored.
#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: i32,
    pub(crate) f: i32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) in_open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0,
            f: 0,
            parent: NO_PARENT,
            generation: 0,
            in_open: false,
        }
    }
}

/// Terminal outcome of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// A shortest path was found. `path` runs from the cell after the
    /// start through the end inclusive, so its length is the path cost.
    Succeeded { path: Vec<Coord> },
    /// The frontier emptied without reaching the end; no path exists under
    /// the current barriers. A normal outcome, not an error.
    Exhausted,
}

/// Why a pair of endpoints was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointIssue {
    /// Start and end name the same cell.
    Identical(Coord),
    /// The cell lies outside the search space.
    OutOfRange(Coord),
    /// The cell is impassable.
    Blocked(Coord),
}

impl fmt::Display for EndpointIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical(c) => write!(f, "start and end are both {c}"),
            Self::OutOfRange(c) => write!(f, "endpoint {c} is outside the grid"),
            Self::Blocked(c) => write!(f, "endpoint {c} is impassable"),
        }
    }
}

/// Errors from [`SearchEngine::run`]. The run never starts and the space
/// is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// `run` was called with degenerate or untraversable endpoints.
    InvalidEndpoints(EndpointIssue),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoints(issue) => write!(f, "invalid endpoints: {issue}"),
        }
    }
}

impl std::error::Error for SearchError {}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// A\* engine owning reusable per-cell arenas.
///
/// Buffers are sized to the space on first use and grown on demand, so a
/// warm engine allocates nothing. Each run bumps a generation stamp instead
/// of clearing the arrays, so scores from a previous invocation can never
/// leak into the next one.
///
/// All run-state is owned by one `run` call; the engine is single-threaded
/// and at most one run per space may be active at a time (the space's cells
/// are mutated in place through its progress markers).
pub struct SearchEngine {
    nodes: Vec<Node>,
    generation: u32,
    frontier: Frontier,
    nbuf: Vec<Coord>,
    side: i32,
}

impl SearchEngine {
    /// Create an engine with empty arenas; they are sized on first run.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generation: 0,
            frontier: Frontier::new(),
            nbuf: Vec::with_capacity(4),
            side: 0,
        }
    }

    /// Size the arenas for a `side × side` space and invalidate all prior
    /// scores by bumping the generation stamp.
    fn prepare(&mut self, side: i32) {
        let len = (side.max(0) as usize) * (side.max(0) as usize);
        if len > self.nodes.len() {
            self.nodes.clear();
            self.nodes.resize(len, Node::default());
            self.generation = 0;
        }
        self.side = side;
        self.generation = self.generation.wrapping_add(1);
        self.frontier.clear();
    }

    /// Convert a coordinate to a flat arena index. `None` if out of range.
    #[inline]
    fn idx(&self, c: Coord) -> Option<usize> {
        if c.row >= 0 && c.col >= 0 && c.row < self.side && c.col < self.side {
            Some((c.row * self.side + c.col) as usize)
        } else {
            None
        }
    }

    /// Convert a flat arena index back to a coordinate.
    #[inline]
    fn coord(&self, idx: usize) -> Coord {
        Coord::new(idx as i32 / self.side, idx as i32 % self.side)
    }

    /// Run A\* from `start` to `end` over `space`.
    ///
    /// `on_step` is invoked exactly once per expansion, after the popped
    /// cell's neighbours have been relaxed and never mid-expansion; it is
    /// the caller's chance to render progress or poll for cancellation.
    /// The hook must not edit the space's cells.
    ///
    /// On success the interior path cells are marked [`VisitMark::Path`];
    /// the end keeps its own role as the path's terminus. Stale markers
    /// from a previous run are not cleared here — that is the calling
    /// renderer's concern (`Grid::clear_marks`) — but scores always start
    /// fresh.
    pub fn run<S, F>(
        &mut self,
        space: &S,
        start: Coord,
        end: Coord,
        mut on_step: F,
    ) -> Result<SearchOutcome, SearchError>
    where
        S: SearchSpace,
        F: FnMut(),
    {
        self.prepare(space.rows());

        let Some(start_idx) = self.idx(start) else {
            return Err(SearchError::InvalidEndpoints(EndpointIssue::OutOfRange(
                start,
            )));
        };
        let Some(goal_idx) = self.idx(end) else {
            return Err(SearchError::InvalidEndpoints(EndpointIssue::OutOfRange(end)));
        };
        if start_idx == goal_idx {
            return Err(SearchError::InvalidEndpoints(EndpointIssue::Identical(
                start,
            )));
        }
        if !space.is_passable(start) {
            return Err(SearchError::InvalidEndpoints(EndpointIssue::Blocked(start)));
        }
        if !space.is_passable(end) {
            return Err(SearchError::InvalidEndpoints(EndpointIssue::Blocked(end)));
        }

        trace!("astar: start={start} end={end} side={}", self.side);
        let cur_gen = self.generation;

        {
            let node = &mut self.nodes[start_idx];
            node.g = 0;
            node.f = manhattan(start, end);
            node.parent = NO_PARENT;
            node.generation = cur_gen;
            node.in_open = true;
        }
        let start_f = self.nodes[start_idx].f;
        self.frontier.push(start_f, start_idx);

        let mut expansions = 0u64;

        let found = 'search: loop {
            let Some(entry) = self.frontier.pop() else {
                break 'search false;
            };
            let ci = entry.idx;
            self.nodes[ci].in_open = false;

            if ci == goal_idx {
                break 'search true;
            }

            let current = self.coord(ci);
            let current_g = self.nodes[ci].g;

            self.nbuf.clear();
            space.neighbors(current, &mut self.nbuf);

            for &nc in self.nbuf.iter() {
                let Some(ni) = self.idx(nc) else {
                    continue;
                };
                let tentative = current_g + 1;

                let node = &mut self.nodes[ni];
                if node.generation != cur_gen {
                    node.generation = cur_gen;
                    node.g = UNREACHABLE;
                    node.in_open = false;
                }
                if tentative >= node.g {
                    continue;
                }

                // Strictly better route: record it, and enqueue the cell
                // unless it is already waiting in the frontier (its f is
                // recomputed here, before any insertion).
                node.g = tentative;
                node.f = tentative + manhattan(nc, end);
                node.parent = ci;
                if !node.in_open {
                    node.in_open = true;
                    let f = node.f;
                    self.frontier.push(f, ni);
                    space.mark(nc, VisitMark::Open);
                }
            }

            expansions += 1;
            on_step();

            if ci != start_idx {
                space.mark(current, VisitMark::Closed);
            }
        };

        if !found {
            debug!("astar: exhausted after {expansions} expansions");
            return Ok(SearchOutcome::Exhausted);
        }

        let path = backtrack(&self.nodes, goal_idx, |i| self.coord(i));
        if let Some((_, interior)) = path.split_last() {
            for &c in interior {
                space.mark(c, VisitMark::Path);
            }
        }
        debug!(
            "astar: succeeded, path length {} after {expansions} expansions",
            path.len()
        );
        Ok(SearchOutcome::Succeeded { path })
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waygrid_core::{CellKind, Grid, Role};

    fn grid_with(rows: i32, start: Coord, end: Coord, barriers: &[Coord]) -> Grid {
        let g = Grid::new(rows).unwrap();
        g.set_kind(start, CellKind::Start).unwrap();
        g.set_kind(end, CellKind::End).unwrap();
        for &b in barriers {
            g.set_kind(b, CellKind::Barrier).unwrap();
        }
        g
    }

    fn run(g: &Grid, start: Coord, end: Coord) -> SearchOutcome {
        SearchEngine::new().run(g, start, end, || {}).unwrap()
    }

    #[test]
    fn open_grid_path_length_is_manhattan_distance() {
        let start = Coord::new(0, 0);
        let end = Coord::new(4, 4);
        let g = grid_with(5, start, end, &[]);
        match run(&g, start, end) {
            SearchOutcome::Succeeded { path } => {
                assert_eq!(path.len(), 8);
                assert_eq!(*path.last().unwrap(), end);
            }
            SearchOutcome::Exhausted => panic!("open grid must have a path"),
        }
    }

    #[test]
    fn path_is_contiguous_and_passable() {
        let start = Coord::new(0, 0);
        let end = Coord::new(4, 4);
        let barriers = [
            Coord::new(1, 0),
            Coord::new(1, 1),
            Coord::new(1, 2),
            Coord::new(3, 4),
            Coord::new(3, 3),
        ];
        let g = grid_with(5, start, end, &barriers);
        let SearchOutcome::Succeeded { path } = run(&g, start, end) else {
            panic!("a path around the barriers exists");
        };
        let mut prev = start;
        for &c in &path {
            assert_eq!(manhattan(prev, c), 1, "gap between {prev} and {c}");
            assert!(g.is_passable(c));
            prev = c;
        }
        assert_eq!(prev, end);
    }

    #[test]
    fn separating_wall_exhausts_without_path_marks() {
        let start = Coord::new(0, 0);
        let end = Coord::new(2, 2);
        let wall = [Coord::new(0, 1), Coord::new(1, 1), Coord::new(2, 1)];
        let g = grid_with(3, start, end, &wall);
        assert_eq!(run(&g, start, end), SearchOutcome::Exhausted);
        for cell in g.iter() {
            assert_ne!(cell.role(), Role::Path);
        }
    }

    #[test]
    fn identical_endpoints_are_rejected() {
        let g = Grid::new(3).unwrap();
        let c = Coord::new(1, 1);
        let err = SearchEngine::new().run(&g, c, c, || {}).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidEndpoints(EndpointIssue::Identical(c))
        );
    }

    #[test]
    fn blocked_endpoints_are_rejected() {
        let g = Grid::new(3).unwrap();
        let start = Coord::new(0, 0);
        let end = Coord::new(2, 2);
        g.set_kind(start, CellKind::Start).unwrap();
        g.set_kind(end, CellKind::Barrier).unwrap();
        let err = SearchEngine::new().run(&g, start, end, || {}).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidEndpoints(EndpointIssue::Blocked(end))
        );
    }

    #[test]
    fn out_of_range_endpoints_are_rejected() {
        let g = Grid::new(3).unwrap();
        let outside = Coord::new(5, 0);
        let err = SearchEngine::new()
            .run(&g, Coord::new(0, 0), outside, || {})
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidEndpoints(EndpointIssue::OutOfRange(outside))
        );
        // A rejected run touches nothing.
        for cell in g.iter() {
            assert_eq!(cell.mark, waygrid_core::VisitMark::None);
        }
    }

    #[test]
    fn hook_fires_once_per_expansion() {
        // 2x2 grid: expansions are start, then the two frontier cells; the
        // goal pop itself does not invoke the hook.
        let start = Coord::new(0, 0);
        let end = Coord::new(1, 1);
        let g = grid_with(2, start, end, &[]);
        let mut steps = 0u32;
        let outcome = SearchEngine::new().run(&g, start, end, || steps += 1).unwrap();
        assert_eq!(steps, 3);
        assert!(matches!(outcome, SearchOutcome::Succeeded { .. }));
    }

    #[test]
    fn runs_are_deterministic() {
        let start = Coord::new(0, 0);
        let end = Coord::new(4, 4);
        let barriers = [Coord::new(2, 1), Coord::new(2, 2), Coord::new(2, 3)];

        let observe = || {
            let g = grid_with(5, start, end, &barriers);
            let view = g.clone();
            let mut trace: Vec<(usize, usize)> = Vec::new();
            let outcome = SearchEngine::new()
                .run(&g, start, end, || {
                    let open = view.iter().filter(|c| c.role() == Role::Open).count();
                    let closed = view.iter().filter(|c| c.role() == Role::Closed).count();
                    trace.push((open, closed));
                })
                .unwrap();
            (trace, outcome)
        };

        let (trace_a, outcome_a) = observe();
        let (trace_b, outcome_b) = observe();
        assert_eq!(trace_a, trace_b);
        assert_eq!(outcome_a, outcome_b);
    }

    #[test]
    fn marks_reflect_the_finished_search() {
        let start = Coord::new(0, 0);
        let end = Coord::new(2, 2);
        let g = grid_with(3, start, end, &[]);
        let SearchOutcome::Succeeded { path } = run(&g, start, end) else {
            panic!("open grid must have a path");
        };

        // Interior path cells show Path; the endpoints keep their roles.
        for &c in &path[..path.len() - 1] {
            assert_eq!(g.cell(c).unwrap().role(), Role::Path);
        }
        assert_eq!(g.cell(start).unwrap().role(), Role::Start);
        assert_eq!(g.cell(end).unwrap().role(), Role::End);
        // The start is never closed.
        assert_eq!(g.mark(start).unwrap(), waygrid_core::VisitMark::None);
    }

    #[test]
    fn engine_reuse_respects_grid_edits() {
        let start = Coord::new(0, 0);
        let end = Coord::new(4, 4);
        let g = grid_with(5, start, end, &[]);
        let mut engine = SearchEngine::new();

        let SearchOutcome::Succeeded { path } = engine.run(&g, start, end, || {}).unwrap()
        else {
            panic!("open grid must have a path");
        };
        assert_eq!(path.len(), 8);

        // Wall off the whole third column and search again on the same
        // engine: the previous run's scores must not leak through.
        for row in 0..5 {
            g.set_kind(Coord::new(row, 2), CellKind::Barrier).unwrap();
        }
        g.clear_marks();
        assert_eq!(
            engine.run(&g, start, end, || {}).unwrap(),
            SearchOutcome::Exhausted
        );
    }

    #[test]
    fn engine_grows_for_larger_grids() {
        let mut engine = SearchEngine::new();

        let g_small = grid_with(3, Coord::new(0, 0), Coord::new(2, 2), &[]);
        let SearchOutcome::Succeeded { path } =
            engine.run(&g_small, Coord::new(0, 0), Coord::new(2, 2), || {}).unwrap()
        else {
            panic!("open grid must have a path");
        };
        assert_eq!(path.len(), 4);

        let g_large = grid_with(7, Coord::new(0, 0), Coord::new(6, 6), &[]);
        let SearchOutcome::Succeeded { path } =
            engine.run(&g_large, Coord::new(0, 0), Coord::new(6, 6), || {}).unwrap()
        else {
            panic!("open grid must have a path");
        };
        assert_eq!(path.len(), 12);
    }

    #[test]
    fn detour_is_minimal_around_a_wall() {
        // A wall with one opening forces a detour of known length.
        let start = Coord::new(2, 0);
        let end = Coord::new(2, 4);
        let wall = [
            Coord::new(0, 2),
            Coord::new(1, 2),
            Coord::new(2, 2),
            Coord::new(3, 2),
        ];
        let g = grid_with(5, start, end, &wall);
        let SearchOutcome::Succeeded { path } = run(&g, start, end) else {
            panic!("the opening at (4, 2) keeps the grid connected");
        };
        // Down to row 4, across, and back up: 4 + 4 = 8 steps.
        assert_eq!(path.len(), 8);
    }
}
