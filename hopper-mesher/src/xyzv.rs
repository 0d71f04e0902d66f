use crate::{Grid, LatticePoint, MeshScalar, MesherError};
use nalgebra::Point3;
use ndarray::{Array1, Array3};
use std::io::Write;

/// The values to attach to a set of sites
#[derive(Clone, Debug, PartialEq)]
pub enum Values<T> {
    /// One at every site
    Ones,
    /// The same value at every site
    Uniform(T),
    /// One value per site, in the same order as the sites
    PerSite(Vec<T>),
}

/// Sparse site values scattered onto a grid
///
/// Holds the decoded lattice coordinates and real-space positions of each site alongside a
/// dense array of the grid's shape which is zero away from the given sites.
#[derive(Clone, Debug)]
pub struct Xyzv<T: MeshScalar> {
    pub sites: Vec<usize>,
    pub lattice: Vec<LatticePoint>,
    pub positions: Vec<Point3<T>>,
    pub values: Array1<T>,
    pub dense: Array3<T>,
}

impl<T: MeshScalar> Xyzv<T> {
    /// Map `sites` and their `values` onto `grid`
    ///
    /// When a site appears more than once the dense array holds the last value given for it.
    pub fn new(grid: &Grid<T>, sites: &[usize], values: Values<T>) -> Result<Self, MesherError> {
        let values = match values {
            Values::Ones => Array1::from_elem(sites.len(), T::one()),
            Values::Uniform(value) => Array1::from_elem(sites.len(), value),
            Values::PerSite(values) => {
                if values.len() != sites.len() {
                    return Err(MesherError::ValueCount {
                        sites: sites.len(),
                        values: values.len(),
                    });
                }
                Array1::from_vec(values)
            }
        };

        let lattice = grid.indexer().decode_all(sites);
        let mgrid = grid.mgrid();
        let positions = lattice
            .iter()
            .map(|point| {
                let index = [point.x, point.y, point.z];
                Point3::new(mgrid.x[index], mgrid.y[index], mgrid.z[index])
            })
            .collect();

        let shape = grid.shape();
        let mut dense = Array3::zeros((shape[0], shape[1], shape[2]));
        for (point, &value) in lattice.iter().zip(values.iter()) {
            dense[[point.x, point.y, point.z]] = value;
        }

        Ok(Self {
            sites: sites.to_vec(),
            lattice,
            positions,
            values,
            dense,
        })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Real-space positions interleaved as `[x0, y0, z0, x1, y1, z1, ..]`
    pub fn flat_xyz(&self) -> Vec<T> {
        self.positions
            .iter()
            .flat_map(|position| [position.x, position.y, position.z])
            .collect()
    }

    /// Write one `x y z value` row per site
    pub fn write_table<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (position, value) in self.positions.iter().zip(self.values.iter()) {
            writeln!(
                writer,
                "{} {} {} {}",
                position.x, position.y, position.z, value
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Values, Xyzv};
    use crate::{Grid, MesherError};
    use nalgebra::{Point3, Vector3};

    fn grid() -> Grid<f64> {
        Grid::from_spacing(Point3::origin(), Vector3::new(2.0, 2.0, 2.0), [3, 3, 2]).unwrap()
    }

    #[test]
    fn missing_values_default_to_one() {
        let grid = grid();
        let xyzv = Xyzv::new(&grid, &[0, 4, 17], Values::Ones).unwrap();
        assert_eq!(xyzv.values.to_vec(), vec![1.0; 3]);
        assert_eq!(xyzv.dense.sum(), 3.0);
        assert_eq!(xyzv.dense[[1, 1, 0]], 1.0);
        assert_eq!(xyzv.dense[[2, 2, 1]], 1.0);
    }

    #[test]
    fn positions_come_from_the_grid() {
        let grid = grid();
        let xyzv = Xyzv::new(&grid, &[5, 9], Values::Uniform(0.5)).unwrap();
        assert_eq!(xyzv.positions[0], Point3::new(4.0, 2.0, 0.0));
        assert_eq!(xyzv.positions[1], Point3::new(0.0, 0.0, 2.0));
        assert_eq!(xyzv.flat_xyz(), vec![4.0, 2.0, 0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn repeated_sites_keep_the_last_value() {
        let grid = grid();
        let xyzv = Xyzv::new(&grid, &[3, 3], Values::PerSite(vec![1.0, 7.0])).unwrap();
        assert_eq!(xyzv.dense[[0, 1, 0]], 7.0);
        assert_eq!(xyzv.dense.sum(), 7.0);
    }

    #[test]
    fn mismatched_values_are_rejected() {
        let grid = grid();
        let result = Xyzv::new(&grid, &[1, 2, 3], Values::PerSite(vec![1.0]));
        assert!(matches!(
            result,
            Err(MesherError::ValueCount {
                sites: 3,
                values: 1
            })
        ));
    }

    #[test]
    fn table_has_a_row_per_site() {
        let grid = grid();
        let xyzv = Xyzv::new(&grid, &[1, 2], Values::Ones).unwrap();
        let mut buffer = Vec::new();
        xyzv.write_table(&mut buffer).unwrap();
        let table = String::from_utf8(buffer).unwrap();
        assert_eq!(table.lines().count(), 2);
        assert_eq!(table.lines().next(), Some("2 0 0 1"));
    }
}
