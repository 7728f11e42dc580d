//! **waygrid-core** — editable square-grid model for 4-directional pathfinding.
//!
//! This crate provides the foundational types used across the *waygrid*
//! crates: the `(row, col)` coordinate type, per-cell editing state and
//! search-visit markers, the shared-buffer [`Grid`], and the [`GridEditor`]
//! painting rules.

pub mod cell;
pub mod coord;
pub mod editor;
pub mod grid;

pub use cell::{Cell, CellKind, Role, VisitMark};
pub use coord::Coord;
pub use editor::GridEditor;
pub use grid::{Grid, GridError};
