use crate::{cast, Axis, Grid, MeshScalar, MesherError};
use nalgebra::{Point3, Vector3};

impl<T: MeshScalar> Grid<T> {
    /// Build a grid from its origin, the spacing along each axis and the number of points
    pub fn from_spacing(
        origin: Point3<T>,
        spacing: Vector3<T>,
        shape: [usize; 3],
    ) -> Result<Self, MesherError> {
        let mut corner = origin;
        for axis in Axis::ALL {
            let n = axis.index();
            let count = shape[n];
            if count < 1 {
                return Err(MesherError::EmptyAxis { axis, count });
            }
            corner[n] += cast::<T>(count - 1) * spacing[n];
        }
        Self::setup(origin, corner, shape)
    }

    /// Build a grid with `shape[n]` points evenly spaced over `[start[n], stop[n]]`, inclusive
    pub fn from_linspace(
        start: Point3<T>,
        stop: Point3<T>,
        shape: [usize; 3],
    ) -> Result<Self, MesherError> {
        Self::setup(start, stop, shape)
    }

    /// Build a grid stepping from `start` towards `stop`
    ///
    /// The number of points on each axis is `floor((stop - start) / step)`, so `stop` itself
    /// is excluded whenever the span is a whole number of steps. The far corner is placed on
    /// the last point, keeping the spacing equal to `step`.
    pub fn from_arange(
        start: Point3<T>,
        stop: Point3<T>,
        step: Vector3<T>,
    ) -> Result<Self, MesherError> {
        let mut shape = [0; 3];
        let mut corner = start;
        for axis in Axis::ALL {
            let n = axis.index();
            if step[n] <= T::zero() {
                return Err(MesherError::Step {
                    axis,
                    step: step[n].to_f64().unwrap_or(f64::NAN),
                });
            }
            if stop[n] < start[n] {
                return Err(MesherError::InvertedAxis {
                    axis,
                    start: start[n].to_f64().unwrap_or(f64::NAN),
                    stop: stop[n].to_f64().unwrap_or(f64::NAN),
                });
            }
            let count = ((stop[n] - start[n]) / step[n])
                .floor()
                .to_usize()
                .unwrap_or(0);
            if count < 1 {
                return Err(MesherError::EmptyAxis { axis, count });
            }
            shape[n] = count;
            corner[n] = start[n] + cast::<T>(count - 1) * step[n];
        }
        Self::setup(start, corner, shape)
    }
}
