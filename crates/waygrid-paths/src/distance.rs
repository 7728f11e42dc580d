use waygrid_core::Coord;

/// Manhattan (L1) distance between two coordinates.
///
/// On a unit-cost 4-connected grid this is an admissible and consistent
/// heuristic, so searches guided by it find minimum-length paths.
#[inline]
pub fn manhattan(a: Coord, b: Coord) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_basics() {
        assert_eq!(manhattan(Coord::new(0, 0), Coord::new(4, 4)), 8);
        assert_eq!(manhattan(Coord::new(2, 3), Coord::new(2, 3)), 0);
        assert_eq!(manhattan(Coord::new(5, 1), Coord::new(1, 2)), 5);
    }

    #[test]
    fn manhattan_is_symmetric() {
        let a = Coord::new(1, 7);
        let b = Coord::new(6, 2);
        assert_eq!(manhattan(a, b), manhattan(b, a));
    }
}
