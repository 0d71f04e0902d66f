use crate::LatticePoint;
use ndarray::{Array1, ArrayView1, Zip};

/// Maps between lattice coordinates and the flat site index used in checkpoints
///
/// Sites are numbered with `x` running fastest: `s = x + nx * y + nx * ny * z`. No bounds
/// checking is done, passing coordinates outside the shape yields a meaningless index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexMapper {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl IndexMapper {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    /// The number of sites on the lattice
    pub fn number_of_sites(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    #[inline]
    pub fn index_s(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.nx * y + self.nx * self.ny * z
    }

    #[inline]
    pub fn index_x(&self, s: usize) -> usize {
        s % self.nx
    }

    #[inline]
    pub fn index_y(&self, s: usize) -> usize {
        (s / self.nx) % self.ny
    }

    #[inline]
    pub fn index_z(&self, s: usize) -> usize {
        s / (self.nx * self.ny)
    }

    pub fn encode(&self, point: &LatticePoint) -> usize {
        self.index_s(point.x, point.y, point.z)
    }

    pub fn decode(&self, s: usize) -> LatticePoint {
        LatticePoint::new(self.index_x(s), self.index_y(s), self.index_z(s))
    }

    pub fn encode_all(&self, points: &[LatticePoint]) -> Vec<usize> {
        points.iter().map(|point| self.encode(point)).collect()
    }

    pub fn decode_all(&self, sites: &[usize]) -> Vec<LatticePoint> {
        sites.iter().map(|&s| self.decode(s)).collect()
    }

    /// Elementwise [`IndexMapper::index_s`] over coordinate arrays
    ///
    /// # Panics
    /// If the three arrays differ in length
    pub fn index_s_array(
        &self,
        x: ArrayView1<usize>,
        y: ArrayView1<usize>,
        z: ArrayView1<usize>,
    ) -> Array1<usize> {
        Zip::from(&x)
            .and(&y)
            .and(&z)
            .map_collect(|&x, &y, &z| self.index_s(x, y, z))
    }

    pub fn index_x_array(&self, s: ArrayView1<usize>) -> Array1<usize> {
        s.mapv(|s| self.index_x(s))
    }

    pub fn index_y_array(&self, s: ArrayView1<usize>) -> Array1<usize> {
        s.mapv(|s| self.index_y(s))
    }

    pub fn index_z_array(&self, s: ArrayView1<usize>) -> Array1<usize> {
        s.mapv(|s| self.index_z(s))
    }
}
