mod common;

use approx::assert_abs_diff_eq;
use common::{add_image, at, disk};
use nalgebra::Point3;
use optrace::{
    curve::Flat,
    degree, millimeter,
    nodes::{Element, ElementId, Image},
    system::Sequence,
    utils::geom_transformation::Transform,
    System,
};
use std::sync::Arc;

fn placement(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Transform {
    Transform::new(millimeter!(x, y, z), degree!(rx, ry, rz)).unwrap()
}

fn check_consistency(system: &System, a: ElementId, b: ElementId, c: ElementId) {
    let a_to_c = system.transform(a, c).unwrap();
    let via_b = system
        .transform(a, b)
        .unwrap()
        .then(&system.transform(b, c).unwrap());
    assert_abs_diff_eq!(a_to_c, via_b, epsilon = 1e-12);
    let via_global = system
        .transform_to_global(a)
        .unwrap()
        .then(&system.transform_from_global(c).unwrap());
    assert_abs_diff_eq!(a_to_c, via_global, epsilon = 1e-12);
    let p = Point3::new(0.01, -0.02, 0.03);
    assert_abs_diff_eq!(
        system.transform(c, a).unwrap().apply_point(&a_to_c.apply_point(&p)),
        p,
        epsilon = 1e-12
    );
}

#[test]
fn transform_cache_consistency() {
    let mut system = System::new();
    let outer = system.add(
        Element::group("outer").with_transform(placement(1.0, 2.0, 3.0, 10.0, 0.0, 30.0)),
    );
    let a = system
        .add_to(
            outer,
            Element::group("a").with_transform(placement(0.0, -5.0, 20.0, 0.0, 15.0, 0.0)),
        )
        .unwrap();
    let b = system.add(Element::group("b").with_transform(placement(7.0, 0.0, 50.0, -5.0, 0.0, 0.0)));
    let inner = system
        .add_to(
            b,
            Element::group("inner").with_transform(placement(0.0, 3.0, 10.0, 0.0, 0.0, 45.0)),
        )
        .unwrap();
    let c = system
        .add_to(
            inner,
            Element::group("c").with_transform(placement(-2.0, 0.0, 4.0, 20.0, 10.0, 0.0)),
        )
        .unwrap();
    check_consistency(&system, a, b, c);
    assert!(system.cache().cached_count() > 0);

    let unrelated = system.add(Element::group("unrelated").with_transform(at(5.0)));
    check_consistency(&system, a, b, c);
    check_consistency(&system, a, unrelated, c);
    system.remove(unrelated).unwrap();
    check_consistency(&system, a, b, c);
    assert!(system.element(unrelated).is_err());

    let before = system.transform(a, c).unwrap();
    system
        .set_transform(outer, placement(0.0, 0.0, -10.0, 0.0, 0.0, 90.0))
        .unwrap();
    let after = system.transform(a, c).unwrap();
    assert_ne!(before, after);
    check_consistency(&system, a, b, c);
}

#[test]
fn removed_ids_are_not_reused() {
    let mut system = System::new();
    let group = system.add(Element::group("group"));
    let child = system.add_to(group, Element::group("child")).unwrap();
    system.remove(group).unwrap();
    assert!(system.element(child).is_err());
    let new = system.add(Element::group("new"));
    assert_ne!(new, group);
    assert_ne!(new, child);
    assert_eq!(system.len(), 1);
}

#[test]
fn sequence_follows_global_z() {
    let mut system = System::new();
    let far = add_image(&mut system, 10.0, 100.0);
    let middle = add_image(&mut system, 10.0, 50.0);
    let group = system.add(Element::group("group").with_transform(at(20.0)));
    let inner = system
        .add_to(
            group,
            Element::new("inner image", Image::new(Arc::new(Flat), disk(5.0))),
        )
        .unwrap();
    let sequence = Sequence::from_system(&system).unwrap();
    assert_eq!(sequence.iter().copied().collect::<Vec<_>>(), vec![inner, middle, far]);
    system.set_transform(group, at(70.0)).unwrap();
    let sequence = Sequence::from_system(&system).unwrap();
    assert_eq!(sequence.iter().copied().collect::<Vec<_>>(), vec![middle, inner, far]);
}
