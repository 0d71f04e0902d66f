use crate::Axis;
use miette::Diagnostic;

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Errors raised while describing a grid or mapping values onto it
pub enum MesherError {
    #[error("axis {axis} needs at least one point, got {count}")]
    #[diagnostic(code(hopper_mesher::empty_axis))]
    EmptyAxis { axis: Axis, count: usize },
    #[error("axis {axis} stops at {stop} before it starts at {start}")]
    #[diagnostic(code(hopper_mesher::inverted_axis))]
    InvertedAxis { axis: Axis, start: f64, stop: f64 },
    #[error("axis {axis} has step {step}, steps must be positive")]
    #[diagnostic(code(hopper_mesher::step))]
    Step { axis: Axis, step: f64 },
    #[error("a grid of {shape:?} points has more sites than can be indexed")]
    #[diagnostic(code(hopper_mesher::volume))]
    Volume { shape: [usize; 3] },
    #[error("{values} values were supplied for {sites} sites")]
    #[diagnostic(code(hopper_mesher::value_count))]
    ValueCount { sites: usize, values: usize },
}
