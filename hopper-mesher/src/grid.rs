use crate::{cast, Axis, IndexMapper, InteractionMesh, LatticePoint, MeshScalar, MesherError};
use nalgebra::{Point3, Vector3};
use ndarray::{Array1, Array3};
use std::cell::OnceCell;

/// Dense coordinate arrays, one entry per grid point for each axis
#[derive(Clone, Debug)]
pub struct MGrid<T> {
    pub x: Array3<T>,
    pub y: Array3<T>,
    pub z: Array3<T>,
}

/// Open coordinate arrays, the sampled positions along each axis
#[derive(Clone, Debug)]
pub struct OGrid<T> {
    pub x: Array1<T>,
    pub y: Array1<T>,
    pub z: Array1<T>,
}

/// A regular box of points in real space
///
/// The geometry is fixed once the grid is set up. Coordinate meshes and the
/// [`InteractionMesh`] are built on first access and memoised until
/// [`Grid::invalidate`] is called.
#[derive(Clone, Debug)]
pub struct Grid<T: MeshScalar> {
    origin: Point3<T>,
    corner: Point3<T>,
    shape: [usize; 3],
    spacing: Vector3<T>,
    mgrid: OnceCell<MGrid<T>>,
    ogrid: OnceCell<OGrid<T>>,
    interaction_mesh: OnceCell<InteractionMesh<T>>,
}

impl<T: MeshScalar> Grid<T> {
    /// Describe the box spanning `origin` to `corner` with `shape` points along each axis
    ///
    /// Every other constructor funnels into this one. An axis with a single point has zero
    /// spacing.
    pub fn setup(
        origin: Point3<T>,
        corner: Point3<T>,
        shape: [usize; 3],
    ) -> Result<Self, MesherError> {
        let mut spacing = Vector3::zeros();
        for axis in Axis::ALL {
            let n = axis.index();
            let (start, stop, count) = (origin[n], corner[n], shape[n]);
            if count < 1 {
                return Err(MesherError::EmptyAxis { axis, count });
            }
            if stop < start {
                return Err(MesherError::InvertedAxis {
                    axis,
                    start: start.to_f64().unwrap_or(f64::NAN),
                    stop: stop.to_f64().unwrap_or(f64::NAN),
                });
            }
            if count > 1 {
                spacing[n] = (stop - start) / cast::<T>(count - 1);
            }
        }
        if shape.iter().try_fold(1usize, |acc, &count| acc.checked_mul(count)).is_none() {
            return Err(MesherError::Volume { shape });
        }

        Ok(Self {
            origin,
            corner,
            shape,
            spacing,
            mgrid: OnceCell::new(),
            ogrid: OnceCell::new(),
            interaction_mesh: OnceCell::new(),
        })
    }

    pub fn origin(&self) -> &Point3<T> {
        &self.origin
    }

    pub fn corner(&self) -> &Point3<T> {
        &self.corner
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn spacing(&self) -> &Vector3<T> {
        &self.spacing
    }

    pub fn number_of_points(&self) -> usize {
        self.shape.iter().product()
    }

    /// Edge lengths of the box
    pub fn lengths(&self) -> Vector3<T> {
        self.corner - self.origin
    }

    pub fn volume(&self) -> T {
        let lengths = self.lengths();
        lengths.x * lengths.y * lengths.z
    }

    /// The bounding box as `[x0, x1, y0, y1, z0, z1]`
    pub fn bounds(&self) -> [T; 6] {
        [
            self.origin.x,
            self.corner.x,
            self.origin.y,
            self.corner.y,
            self.origin.z,
            self.corner.z,
        ]
    }

    /// The VTK style index extent `[0, px - 1, 0, py - 1, 0, pz - 1]`
    pub fn extent(&self) -> [usize; 6] {
        [
            0,
            self.shape[0] - 1,
            0,
            self.shape[1] - 1,
            0,
            self.shape[2] - 1,
        ]
    }

    pub fn indexer(&self) -> IndexMapper {
        IndexMapper::new(self.shape[0], self.shape[1], self.shape[2])
    }

    /// The real-space position of a lattice point
    pub fn position(&self, point: &LatticePoint) -> Point3<T> {
        let index = Vector3::new(cast::<T>(point.x), cast::<T>(point.y), cast::<T>(point.z));
        self.origin + index.component_mul(&self.spacing)
    }

    pub fn mgrid(&self) -> &MGrid<T> {
        self.mgrid.get_or_init(|| self.build_mgrid())
    }

    pub fn ogrid(&self) -> &OGrid<T> {
        self.ogrid.get_or_init(|| self.build_ogrid())
    }

    /// The distance table for this grid, built on first use
    pub fn interaction_mesh(&self) -> &InteractionMesh<T> {
        self.interaction_mesh
            .get_or_init(|| InteractionMesh::new(self.shape, &self.spacing))
    }

    /// Drop all memoised meshes so the next access rebuilds them
    pub fn invalidate(&mut self) {
        self.mgrid.take();
        self.ogrid.take();
        self.interaction_mesh.take();
    }

    fn axis_positions(&self, axis: Axis) -> Array1<T> {
        let n = axis.index();
        let (start, step) = (self.origin[n], self.spacing[n]);
        Array1::from_shape_fn(self.shape[n], |i| start + cast::<T>(i) * step)
    }

    fn build_ogrid(&self) -> OGrid<T> {
        OGrid {
            x: self.axis_positions(Axis::X),
            y: self.axis_positions(Axis::Y),
            z: self.axis_positions(Axis::Z),
        }
    }

    fn build_mgrid(&self) -> MGrid<T> {
        let ogrid = self.ogrid();
        let shape = (self.shape[0], self.shape[1], self.shape[2]);
        MGrid {
            x: Array3::from_shape_fn(shape, |(i, _, _)| ogrid.x[i]),
            y: Array3::from_shape_fn(shape, |(_, j, _)| ogrid.y[j]),
            z: Array3::from_shape_fn(shape, |(_, _, k)| ogrid.z[k]),
        }
    }
}
