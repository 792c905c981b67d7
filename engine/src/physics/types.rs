//! Conversions between the crate's glam math and rapier's nalgebra math.
//!
//! Only `physics::world` should need these.

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::{Isometry, Point, Real, Translation, Vector};

pub fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

pub fn to_point(p: Vec3) -> Point<Real> {
    Point::new(p.x, p.y, p.z)
}

pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn from_rotation(r: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}

pub fn to_isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(Translation::from(to_vector(position)), to_rotation(rotation))
}
