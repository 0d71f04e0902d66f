use nalgebra::Point3;

/// An integer coordinate on the lattice, each component bounded by the grid shape
pub type LatticePoint = Point3<usize>;

/// The spatial axes of the lattice, in storage order
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// The absolute coordinate delta between two lattice points
///
/// On a regular lattice this is all that is needed to find the distance between two sites
#[inline]
pub fn abs_delta(a: &LatticePoint, b: &LatticePoint) -> [usize; 3] {
    [a.x.abs_diff(b.x), a.y.abs_diff(b.y), a.z.abs_diff(b.z)]
}

#[cfg(test)]
mod test {
    use super::{abs_delta, LatticePoint};

    #[test]
    fn delta_is_symmetric_and_non_negative() {
        let a = LatticePoint::new(1, 7, 3);
        let b = LatticePoint::new(4, 2, 3);
        assert_eq!(abs_delta(&a, &b), [3, 5, 0]);
        assert_eq!(abs_delta(&b, &a), [3, 5, 0]);
    }
}
