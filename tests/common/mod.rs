#![allow(dead_code)]
use optrace::{
    curve::CurveRef,
    material::{MaterialRef, Solid},
    millimeter,
    nodes::{Element, ElementId, Image, OpticalSurface},
    shape::{Disk, ShapeRef},
    utils::geom_transformation::Transform,
    System,
};
use std::sync::Arc;

pub fn at(z: f64) -> Transform {
    Transform::new_along_z(millimeter!(z)).unwrap()
}

pub fn disk(radius: f64) -> ShapeRef {
    Arc::new(Disk::new(millimeter!(radius)).unwrap())
}

pub fn vacuum() -> MaterialRef {
    Arc::new(Solid::vacuum())
}

pub fn glass(n: f64) -> MaterialRef {
    Arc::new(Solid::with_index(n).unwrap())
}

/// Add a single refracting surface at `z` (in mm) with vacuum in front and glass behind.
pub fn add_surface(system: &mut System, curve: CurveRef, aperture: f64, n: f64, z: f64) -> ElementId {
    system.add(
        Element::new(
            "surface",
            OpticalSurface::new(curve, disk(aperture), vacuum(), glass(n)),
        )
        .with_transform(at(z)),
    )
}

/// Add a flat image plane at `z` (in mm).
pub fn add_image(system: &mut System, radius: f64, z: f64) -> ElementId {
    system.add(
        Element::new(
            "image",
            Image::new(Arc::new(optrace::curve::Flat), disk(radius)),
        )
        .with_transform(at(z)),
    )
}
