use celestial_gwcs::{InvertOptions, NewtonInverter, Wcs};
use celestial_models::{Affine2D, Model, Polynomial2D, TransformChain};
use proptest::prelude::*;

fn analytic_wcs(angle: f64, sx: f64, sy: f64, dx: f64, dy: f64) -> Wcs {
    let chain = TransformChain::new("detector")
        .then(Model::shift([dx, dy]), "offset")
        .unwrap()
        .then(Model::scale([sx, sy]).unwrap(), "scaled")
        .unwrap()
        .then(Model::rotation(angle), "rotated")
        .unwrap()
        .then(
            Affine2D::new([[1.0, 0.2], [-0.1, 1.0]], [3.0, -4.0]).unwrap(),
            "focal",
        )
        .unwrap();
    Wcs::new("focal", "detector", Some(chain), "analytic")
}

proptest! {
    #[test]
    fn prop_analytic_round_trip(
        angle in -180.0f64..180.0,
        sx in 0.1f64..10.0,
        sy in 0.1f64..10.0,
        dx in -100.0f64..100.0,
        dy in -100.0f64..100.0,
        x in 1.0f64..4096.0,
        y in 1.0f64..4096.0,
    ) {
        let wcs = analytic_wcs(angle, sx, sy, dx, dy);
        let world = wcs.evaluate(&[vec![x], vec![y]]).unwrap().into_values();
        let back = wcs.invert(&world, &InvertOptions::default()).unwrap();
        prop_assert!((back[0][0] - x).abs() < 1e-6 * x.abs().max(1.0));
        prop_assert!((back[1][0] - y).abs() < 1e-6 * y.abs().max(1.0));
    }

    #[test]
    fn prop_get_transform_directions_are_inverses(
        angle in -180.0f64..180.0,
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
    ) {
        let wcs = analytic_wcs(angle, 2.0, 0.5, 10.0, -10.0);
        let forward = wcs.get_transform("offset", "focal").unwrap().unwrap();
        let backward = wcs.get_transform("focal", "offset").unwrap().unwrap();
        let out = forward.evaluate_point(&[x, y]).unwrap();
        let back = backward.evaluate_point(&out).unwrap();
        prop_assert!((back[0] - x).abs() < 1e-8);
        prop_assert!((back[1] - y).abs() < 1e-8);
    }

    #[test]
    fn prop_newton_round_trip(
        a20 in -1e-5f64..1e-5,
        b02 in -1e-5f64..1e-5,
        x in 0.0f64..1000.0,
        y in 0.0f64..1000.0,
    ) {
        let mut poly = Polynomial2D::new(2);
        poly.set_a(2, 0, a20);
        poly.set_b(0, 2, b02);
        let chain = TransformChain::new("detector").then(poly, "undistorted").unwrap();
        let wcs = Wcs::new("undistorted", "detector", Some(chain), "").with_inverter(NewtonInverter);

        let world = wcs.evaluate(&[vec![x], vec![y]]).unwrap().into_values();
        let back = wcs.invert(&world, &InvertOptions::default()).unwrap();
        prop_assert!((back[0][0] - x).abs() < 1e-7);
        prop_assert!((back[1][0] - y).abs() < 1e-7);
    }
}
