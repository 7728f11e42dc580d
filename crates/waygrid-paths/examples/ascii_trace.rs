//! Paint a grid, run a search, and print the result as ASCII.
//!
//! The progress hook reads the grid through its own shared view, the same
//! way an interactive renderer would.

use waygrid_core::{Coord, Grid, GridEditor, Role};
use waygrid_paths::{SearchEngine, SearchOutcome};

fn render(grid: &Grid) -> String {
    let mut out = String::new();
    for cell in grid.iter() {
        out.push(match cell.role() {
            Role::Empty => '.',
            Role::Start => 'S',
            Role::End => 'E',
            Role::Barrier => '#',
            Role::Open => 'o',
            Role::Closed => 'x',
            Role::Path => '*',
        });
        if cell.coord.col == grid.rows() - 1 {
            out.push('\n');
        }
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let grid = Grid::new(10)?;
    let mut editor = GridEditor::new(grid.clone());

    editor.paint(Coord::new(0, 0))?;
    editor.paint(Coord::new(9, 9))?;
    for row in 0..8 {
        editor.paint(Coord::new(row, 5))?;
    }

    let (start, end) = editor.endpoints().expect("start and end painted above");

    let view = grid.clone();
    let mut steps = 0u32;
    let mut engine = SearchEngine::new();
    let outcome = engine.run(&grid, start, end, || {
        steps += 1;
        if steps % 20 == 0 {
            let closed = view.iter().filter(|c| c.role() == Role::Closed).count();
            println!("step {steps}: {closed} cells closed");
        }
    })?;

    match outcome {
        SearchOutcome::Succeeded { path } => {
            println!("found a {}-step path in {steps} expansions\n", path.len())
        }
        SearchOutcome::Exhausted => println!("no path exists\n"),
    }
    print!("{}", render(&grid));
    Ok(())
}
