use crate::{abs_delta, cast, LatticePoint, MeshScalar};
use itertools::{iproduct, Itertools};
use nalgebra::Vector3;
use ndarray::{Array1, Array3, Zip};

/// Distance tables for a regular lattice
///
/// The distance between two lattice points depends only on the absolute coordinate delta
/// between them, so a single table the size of the grid is enough to answer every pairwise
/// query. `r1[[dx, dy, dz]]` holds the distance for a delta and `ri` its reciprocal, with
/// zero distances (including the self interaction at the origin) mapped to a zero
/// reciprocal.
///
/// Coordinates passed to the query methods must lie inside the grid the mesh was built
/// for, otherwise the lookup panics.
#[derive(Clone, Debug)]
pub struct InteractionMesh<T> {
    shape: [usize; 3],
    r1: Array3<T>,
    ri: Array3<T>,
}

impl<T: MeshScalar> InteractionMesh<T> {
    #[tracing::instrument(name = "Interaction mesh", level = "debug", skip(spacing))]
    pub fn new(shape: [usize; 3], spacing: &Vector3<T>) -> Self {
        let r1 = Array3::from_shape_fn((shape[0], shape[1], shape[2]), |(i, j, k)| {
            let x = cast::<T>(i) * spacing.x;
            let y = cast::<T>(j) * spacing.y;
            let z = cast::<T>(k) * spacing.z;
            (x * x + y * y + z * z).sqrt()
        });
        let ri = r1.mapv(|r| if r == T::zero() { T::zero() } else { T::one() / r });
        tracing::trace!("Tabulated {} lattice deltas", r1.len());
        Self { shape, r1, ri }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// The distance table, indexed by absolute coordinate delta
    pub fn r1(&self) -> &Array3<T> {
        &self.r1
    }

    /// The reciprocal distance table, zero at the origin
    pub fn ri(&self) -> &Array3<T> {
        &self.ri
    }

    #[inline]
    pub fn distance(&self, a: &LatticePoint, b: &LatticePoint) -> T {
        self.r1[abs_delta(a, b)]
    }

    #[inline]
    pub fn reciprocal_distance(&self, a: &LatticePoint, b: &LatticePoint) -> T {
        self.ri[abs_delta(a, b)]
    }

    /// Pairwise distances
    ///
    /// Without targets every unique unordered pair of `sources` is visited once, in the order
    /// `(0, 1), (0, 2), .., (1, 2), ..`, giving `n (n - 1) / 2` entries. With targets the full
    /// cross product is returned, row major in the sources, and points present in both sets
    /// are not excluded.
    pub fn distances(
        &self,
        sources: &[LatticePoint],
        targets: Option<&[LatticePoint]>,
    ) -> Array1<T> {
        match targets {
            None => sources
                .iter()
                .tuple_combinations()
                .map(|(a, b)| self.distance(a, b))
                .collect(),
            Some(targets) => iproduct!(sources.iter(), targets.iter())
                .map(|(a, b)| self.distance(a, b))
                .collect(),
        }
    }

    /// The potential of unit point charges at `sources`, scaled by `charge`, at each target
    pub fn coulomb(
        &self,
        sources: &[LatticePoint],
        targets: &[LatticePoint],
        charge: T,
    ) -> Array1<T> {
        let mut potential = Array1::zeros(targets.len());
        for source in sources {
            for (value, target) in potential.iter_mut().zip(targets) {
                *value += self.reciprocal_distance(source, target);
            }
        }
        potential.mapv_inplace(|value| value * charge);
        potential
    }

    /// The potential of unit point charges at `sources`, scaled by `charge`, at every point
    /// of the grid
    ///
    /// This visits every grid point once per source.
    #[tracing::instrument(name = "Coulomb field", level = "debug", skip_all, fields(sources = sources.len()))]
    pub fn coulomb_everywhere(&self, sources: &[LatticePoint], charge: T) -> Array3<T> {
        let mut potential = Array3::zeros((self.shape[0], self.shape[1], self.shape[2]));
        for source in sources {
            Zip::indexed(&mut potential).for_each(|(i, j, k), value| {
                *value += self.ri[[
                    i.abs_diff(source.x),
                    j.abs_diff(source.y),
                    k.abs_diff(source.z),
                ]];
            });
        }
        potential.mapv_inplace(|value| value * charge);
        potential
    }

    /// The interaction energy of identical point charges at `sites`
    ///
    /// Each unique pair contributes `charge / r`, coincident sites contribute nothing.
    pub fn pair_energy(&self, sites: &[LatticePoint], charge: T) -> T {
        let sum = sites
            .iter()
            .tuple_combinations()
            .fold(T::zero(), |acc, (a, b)| acc + self.reciprocal_distance(a, b));
        sum * charge
    }
}
