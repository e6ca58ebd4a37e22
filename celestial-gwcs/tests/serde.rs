#![cfg(feature = "serde")]

use celestial_gwcs::{InvertOptions, Unit, Wcs};
use celestial_models::{Affine2D, Model, Polynomial2D, SkyRotation, TransformChain};

#[test]
fn test_chain_survives_json() {
    let mut poly = Polynomial2D::new(2);
    poly.set_a(2, 0, 1e-6);
    poly.set_inverse_order(2);
    poly.set_ap(2, 0, -1e-6);

    let chain = TransformChain::new("detector")
        .then(poly, "undistorted")
        .unwrap()
        .then(
            Affine2D::from_cd([512.0, 512.0], [[-1e-4, 0.0], [0.0, 1e-4]]).unwrap(),
            "focal",
        )
        .unwrap()
        .then(Model::pix2sky_tan(), "native")
        .unwrap()
        .then(SkyRotation::from_crval(10.0, 20.0).unwrap(), "icrs")
        .unwrap();

    let json = serde_json::to_string_pretty(&chain).unwrap();
    let restored: TransformChain = serde_json::from_str(&json).unwrap();

    let original = Wcs::new("icrs", "detector", Some(chain), "");
    let loaded = Wcs::new("icrs", "detector", Some(restored), "");
    let pixels = [vec![1.0, 300.0], vec![1.0, 700.0]];
    let expected = original.evaluate(&pixels).unwrap().into_values();
    let actual = loaded.evaluate(&pixels).unwrap().into_values();
    for (a_axis, e_axis) in actual.iter().zip(&expected) {
        for (a, e) in a_axis.iter().zip(e_axis) {
            assert!((a - e).abs() < 1e-12, "{} != {}", a, e);
        }
    }
}

#[test]
fn test_invert_options_defaults_fill_missing_fields() {
    let options: InvertOptions = serde_json::from_str(r#"{"max_iter": 7}"#).unwrap();
    assert_eq!(options.max_iter, 7);
    assert_eq!(options.tolerance, InvertOptions::DEFAULT_TOL);
    assert!(options.initial_guess.is_none());
}

#[test]
fn test_unit_json() {
    let json = serde_json::to_string(&Unit::Degree).unwrap();
    assert_eq!(json, r#""Degree""#);
    let unit: Unit = serde_json::from_str(r#"{"Other":"Jy"}"#).unwrap();
    assert_eq!(unit, Unit::Other("Jy".to_string()));
}
