use approx::assert_abs_diff_eq;
use iso_geometry::{
    Boundary, Crs, DefaultAuthority, Geometry, GeometryArena, GeometryElement, GeometryFactory,
    GeometryKind, Precision,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn factory() -> GeometryFactory {
    init();
    GeometryFactory::new(Crs::local_2d())
}

fn xy(geometry: &Geometry) -> Vec<(f64, f64)> {
    geometry
        .positions()
        .map(|p| (p.ordinates()[0], p.ordinates()[1]))
        .collect()
}

#[test]
fn point_centroid_is_itself() {
    let point = factory().parse("POINT(30 50)").unwrap();
    let centroid = point.centroid().unwrap();
    assert_eq!(centroid.position().ordinates(), &[30.0, 50.0]);
}

#[test]
fn curve_centroid() {
    let curve = factory()
        .parse("CURVE(30 20, 10 50, 100 120, 100 70, 10 140)")
        .unwrap();
    let centroid = curve.centroid().unwrap();
    assert_abs_diff_eq!(centroid.position().ordinates()[0], 58.146, epsilon = 1e-3);
    assert_abs_diff_eq!(centroid.position().ordinates()[1], 88.11, epsilon = 1e-2);
}

#[test]
fn surface_centroid() {
    let surface = factory()
        .parse("SURFACE((10 90, 30 50, 70 30, 120 40, 150 70, 150 120, 100 150, 30 140, 10 90))")
        .unwrap();
    let centroid = surface.centroid().unwrap();
    assert_abs_diff_eq!(centroid.position().ordinates()[0], 82.161, epsilon = 1e-3);
    assert_abs_diff_eq!(centroid.position().ordinates()[1], 91.22, epsilon = 1e-2);
}

#[test]
fn curve_relates_to_itself() {
    let curve = factory()
        .parse("CURVE(30 20, 10 50, 100 120, 100 70, 10 140)")
        .unwrap();

    assert!(curve.equals(&curve).unwrap());
    assert!(curve.intersects(&curve).unwrap());
    assert!(!curve.overlaps(&curve).unwrap());
    assert!(!curve.touches(&curve).unwrap());
    assert!(curve.contains(&curve).unwrap());
    assert!(curve.within(&curve).unwrap());
    assert!(!curve.crosses(&curve).unwrap());
    assert!(!curve.disjoint(&curve).unwrap());
}

#[test]
fn convex_hull_order() {
    let points = factory()
        .parse("MULTIPOINT((30 50), (100 120), (70 20), (70 10), (170 10))")
        .unwrap();
    let hull = points.convex_hull().unwrap();

    assert_eq!(hull.kind(), GeometryKind::Surface);
    assert_eq!(
        xy(&hull),
        vec![(70.0, 10.0), (30.0, 50.0), (100.0, 120.0), (170.0, 10.0), (70.0, 10.0)]
    );
}

#[test]
fn hole_touching_shell_is_not_simple() {
    let factory = factory();
    let touching = factory
        .surface(
            [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            [[[0.0, 0.0], [2.0, 4.0], [4.0, 4.0], [4.0, 2.0], [0.0, 0.0]]],
        )
        .unwrap();
    assert!(!touching.is_simple());

    let inside = factory
        .surface(
            [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            [[[2.0, 2.0], [2.0, 4.0], [4.0, 4.0], [4.0, 2.0], [2.0, 2.0]]],
        )
        .unwrap();
    assert!(inside.is_simple());
}

#[test]
fn ring_and_curve_boundaries() {
    let factory = factory();
    let coordinates = [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]];

    let ring = factory.ring(coordinates).unwrap();
    assert!(ring.boundary().is_empty());

    let closed = factory.curve(coordinates).unwrap();
    assert!(closed.is_closed());
    assert!(closed.boundary().is_empty());

    let open = factory.curve(&coordinates[..3]).unwrap();
    assert!(!open.is_closed());
    assert!(matches!(open.boundary(), Boundary::Curve(_)));
}

#[test]
fn closure_is_idempotent() {
    let arena = GeometryArena::new();
    let surface = arena.insert(
        factory()
            .parse("SURFACE((0 0, 4 0, 4 4, 0 4, 0 0))")
            .unwrap(),
    );

    let closure = arena.closure(surface).unwrap();
    assert_eq!(arena.closure(closure).unwrap(), closure);
    assert_eq!(arena.closure(surface).unwrap(), closure);
    assert_eq!(
        arena.get(closure).unwrap().kind(),
        GeometryKind::CompositeSurface
    );
}

#[test]
fn transform_round_trip() {
    init();
    let authority = DefaultAuthority::new();
    let geographic = GeometryFactory::new(Crs::wgs84());
    let curve = geographic.parse("CURVE(37.6 55.75, 2.35 48.85, -74.0 40.7)").unwrap();

    let projected = curve.transform(&Crs::epsg3857(), &authority).unwrap();
    assert_eq!(projected.crs().code(), Crs::epsg3857().code());
    assert_abs_diff_eq!(xy(&projected)[0].0, 4_185_612.85, epsilon = 0.01);

    let back = projected.transform(&Crs::wgs84(), &authority).unwrap();
    assert_eq!(back.kind(), curve.kind());
    for (a, b) in xy(&back).into_iter().zip(xy(&curve)) {
        assert_abs_diff_eq!(a.0, b.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.1, b.1, epsilon = 1e-9);
    }
}

#[test]
fn identity_transform_keeps_value() {
    init();
    let authority = DefaultAuthority::new();
    let curve = GeometryFactory::new(Crs::wgs84())
        .parse("CURVE(1 2, 3 4)")
        .unwrap();
    assert_eq!(curve.transform(&Crs::wgs84(), &authority).unwrap(), curve);
}

#[test]
fn union_is_commutative() {
    let factory = factory();
    let a = factory.parse("SURFACE((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
    let b = factory.parse("SURFACE((2 2, 6 2, 6 6, 2 6, 2 2))").unwrap();

    let ab = a.union(&b).unwrap();
    let ba = b.union(&a).unwrap();
    assert!(ab.equals(&ba).unwrap());
    assert_abs_diff_eq!(area(&ab), 28.0, epsilon = 1e-9);

    assert!(!a.difference(&b).unwrap().equals(&b.difference(&a).unwrap()).unwrap());
}

#[test]
fn union_from_intersection_and_symmetric_difference() {
    let factory = factory();
    let a = factory.parse("SURFACE((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
    let b = factory
        .parse("SURFACE((2 -1, 6 -1, 6 3, 2 3, 2 -1), (3 0.5, 5 0.5, 5 2, 3 2, 3 0.5))")
        .unwrap();

    let intersection = a.intersection(&b).unwrap();
    let symmetric = a.symmetric_difference(&b).unwrap();
    let rebuilt = intersection.union(&symmetric).unwrap();

    assert!(rebuilt.equals(&a.union(&b).unwrap()).unwrap());
}

#[test]
fn vertices_within_tolerance_are_snapped() {
    init();
    let factory = GeometryFactory::new(Crs::local_2d()).with_precision(Precision::new(1e-3));
    let a = factory.parse("SURFACE((0 0, 2 0, 2 2, 0 2, 0 0))").unwrap();
    let b = factory
        .parse("SURFACE((2.0004 0, 4 0, 4 2, 2.0004 2, 2.0004 0))")
        .unwrap();

    let matrix = a.relate_with(&b, factory.precision()).unwrap();
    assert!(matrix.is_touches(a.dimension(), b.dimension()));
    assert!(!a.relate(&b).unwrap().is_intersects());
}

#[test]
fn precision_from_json() {
    let precision: Precision = serde_json::from_str(r#"{"epsilon": 0.5}"#).unwrap();
    assert_eq!(precision, Precision::new(0.5));

    let default: Precision = serde_json::from_str("{}").unwrap();
    assert_eq!(default, Precision::default());
}

fn area(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Surface(surface) => surface.area(),
        Geometry::MultiSurface(surfaces) => surfaces.iter().map(|s| s.area()).sum(),
        other => panic!("{:?} has no area", other.kind()),
    }
}
