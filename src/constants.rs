// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Constants
//!
//! Defines physical constants used in post-processing

pub const ELECTRON_CHARGE: f64 = 1.60217662e-19; // Single electron charge in C
pub const EPSILON_0: f64 = 8.85418782e-12; // Permitivitty of free space in F / m
pub const NANOMETER: f64 = 1e-9; // Lattice lengths are measured in nm

/// Added to the trap count before it is divided by the number of sites when
/// recomputing `trap.percentage`, matching checkpoints written by the simulator
pub const TRAP_PERCENTAGE_BIAS: f64 = 0.25;

/// The potential in V of an elementary charge one nanometre away, in a medium of the given
/// relative permittivity
pub fn coulomb_prefactor(relative_permittivity: f64) -> f64 {
    ELECTRON_CHARGE / (4.0 * std::f64::consts::PI * EPSILON_0 * relative_permittivity * NANOMETER)
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    #[test]
    fn prefactor_in_vacuum_is_1_44_volt_nanometres() {
        assert_relative_eq!(super::coulomb_prefactor(1.0), 1.439964, epsilon = 1e-5);
    }
}
