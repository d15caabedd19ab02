// Copyright (C) Oscar Shrimpton 2019

// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
// more details.

// You should have received a copy of the GNU General Public License along
// with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Marker traits for different co-ordinate systems, and functions to swizzle between them

use na::base::Scalar;
use na::Vector3;
use std::ops::Neg;

pub trait CoordSystem {}

/// X points East, Y points North, Z points upwards. Roughly 32 units to a metre.
#[derive(Debug, Clone, Copy)]
pub struct Q1System;
impl CoordSystem for Q1System {}

/// X points East, Y points upwards, Z points South
#[derive(Debug, Clone, Copy)]
pub struct YUpSystem;
impl CoordSystem for YUpSystem {}

pub struct Swizzler;

pub trait SwizzleFromTo<F: CoordSystem, T: CoordSystem> {
    fn swizzle<U: Scalar + Copy + Neg<Output = U>>(vec: &mut Vector3<U>);
}

impl SwizzleFromTo<Q1System, YUpSystem> for Swizzler {
    fn swizzle<U: Scalar + Copy + Neg<Output = U>>(vec: &mut Vector3<U>) {
        let temp = vec.y;
        vec.y = vec.z;
        vec.z = -temp;
    }
}

impl SwizzleFromTo<YUpSystem, Q1System> for Swizzler {
    fn swizzle<U: Scalar + Copy + Neg<Output = U>>(vec: &mut Vector3<U>) {
        let temp = vec.z;
        vec.z = vec.y;
        vec.y = -temp;
    }
}

#[test]
fn swizzle_q1_to_y_up() {
    let mut v = Vector3::new(1.0f32, 2.0, 3.0);
    <Swizzler as SwizzleFromTo<Q1System, YUpSystem>>::swizzle(&mut v);
    assert_eq!(v, Vector3::new(1.0, 3.0, -2.0));

    <Swizzler as SwizzleFromTo<YUpSystem, Q1System>>::swizzle(&mut v);
    assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
}
