//! End-to-end scenarios: hull build, equilibrium, form parameters and GZ.

#![allow(clippy::unwrap_used)]

use hullform::error::{EquilibriumError, GeometryError};
use hullform::geometry::Parametrization;
use hullform::math::Point3;
use hullform::{
    CenterOfGravity, CurveDefinition, FormParameters, HeelConvention, Hull, HullDefinition,
    HullformError, HydroConfig, MassComponent, StabilityConfig, StabilitySweep,
};

fn box_definition() -> HullDefinition {
    HullDefinition::new(vec![
        CurveDefinition::new("chine", vec![[0.0, 0.3, 0.0], [5.0, 0.3, 0.0]]),
        CurveDefinition::new("gunwale", vec![[0.0, 0.3, 0.3], [5.0, 0.3, 0.3]]),
    ])
    .with_targets(50.0, 50.0)
}

/// V section with 45° deadrise and the gunwale 0.3 m above the keel.
fn wedge_definition() -> HullDefinition {
    HullDefinition::new(vec![
        CurveDefinition::new("keel", vec![[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]]),
        CurveDefinition::new("gunwale", vec![[0.0, 0.3, 0.3], [5.0, 0.3, 0.3]]),
    ])
    .with_targets(20.0, 180.0)
}

/// Keel that runs past the stem and curls back up to it, so x is not
/// monotonic and the keel is fitted by chord length.
fn curled_keel_definition() -> HullDefinition {
    HullDefinition::new(vec![
        CurveDefinition::new(
            "keel",
            vec![
                [0.0, 0.0, 0.25],
                [0.6, 0.0, 0.05],
                [2.6, 0.0, 0.0],
                [4.6, 0.0, 0.05],
                [5.1, 0.0, 0.2],
                [5.0, 0.0, 0.35],
            ],
        ),
        CurveDefinition::new(
            "gunwale",
            vec![
                [0.0, 0.0, 0.4],
                [1.3, 0.25, 0.38],
                [2.6, 0.3, 0.36],
                [3.9, 0.25, 0.38],
                [5.1, 0.0, 0.42],
            ],
        ),
    ])
    .with_targets(20.0, 80.0)
}

#[test]
fn box_floats_at_one_thirtieth() {
    let hull = Hull::build(&box_definition(), HydroConfig::default()).unwrap();
    let eq = hull.equilibrium();
    assert!((eq.volume - 0.1).abs() <= 0.001);
    assert!((eq.waterline - 0.1 / 3.0).abs() <= 1.0 / 3000.0 + 1e-9);
    assert!((eq.displacement - 100.0).abs() <= 1.0);
    assert!(eq.center_of_buoyancy.y.abs() < 1e-9);
}

#[test]
fn mirrored_box_matches_full_box() {
    let half = Hull::build(&box_definition(), HydroConfig::default()).unwrap();

    let flagged = |name: &str, y: f64, z: f64| {
        let mut curve = CurveDefinition::new(name, vec![[0.0, y, z], [5.0, y, z]]);
        curve.mirrored = true;
        curve
    };
    let def = HullDefinition::new(vec![
        flagged("chine", 0.3, 0.0),
        flagged("gunwale", 0.3, 0.3),
        flagged("chine port", -0.3, 0.0),
        flagged("gunwale port", -0.3, 0.3),
    ])
    .with_targets(50.0, 50.0);
    let full = Hull::build(&def, HydroConfig::default()).unwrap();

    assert_eq!(half.curves().len(), 4);
    assert_eq!(full.curves().len(), 4);
    assert!((half.volume() - full.volume()).abs() < 1e-12);
    assert!((half.equilibrium().waterline - full.equilibrium().waterline).abs() < 1e-9);
}

#[test]
fn resolving_at_own_draft_is_immediate() {
    let hull = Hull::build(&wedge_definition(), HydroConfig::default()).unwrap();
    let first = hull.solve(200.0, 15.0).unwrap();
    let again = hull.solve_from(200.0, 15.0, Some(first.draft)).unwrap();
    assert!((again.waterline - first.waterline).abs() < 1e-12);
    assert_eq!(again.iterations, 1);
}

#[test]
fn upright_gz_is_zero() {
    let hull = Hull::build(&wedge_definition(), HydroConfig::default()).unwrap();
    let curve = StabilitySweep::new(&hull).execute().unwrap();
    assert!((curve.points[0].angle).abs() < f64::EPSILON);
    assert!(curve.points[0].gz.abs() < 1e-6);
    assert_eq!(curve.points.len(), 31);
}

#[test]
fn wedge_gz_rises_then_vanishes() {
    let hull = Hull::build(&wedge_definition(), HydroConfig::default()).unwrap();
    let curve = StabilitySweep::new(&hull)
        .with_config(StabilityConfig::default().with_angles(90.0, 5.0))
        .execute()
        .unwrap();
    let points = &curve.points;
    assert!(points[1].gz > 0.0);
    assert!(points.last().unwrap().gz < 0.0);

    let vanishing = curve.vanishing_angle.unwrap();
    let i = points
        .windows(2)
        .position(|w| w[0].gz >= 0.0 && w[1].gz < 0.0)
        .unwrap();
    let (a, b) = (&points[i], &points[i + 1]);
    assert!(vanishing >= a.angle && vanishing <= b.angle);
    let expected = a.angle - a.gz * (b.angle - a.angle) / (b.gz - a.gz);
    assert!((vanishing - expected).abs() < 1e-12);

    let (max_gz, max_gz_angle) = curve.max_gz().unwrap();
    assert!(max_gz > 0.0);
    assert!(max_gz_angle > 0.0 && max_gz_angle < vanishing);
}

#[test]
fn starboard_down_heels_the_other_way() {
    let config = HydroConfig::default().with_heel_convention(HeelConvention::StarboardDown);
    let hull = Hull::build(&wedge_definition(), config).unwrap();
    let sol = hull.solve(200.0, 20.0).unwrap();
    assert!(sol.center_of_buoyancy.y > 0.0);

    let right = Hull::build(&wedge_definition(), HydroConfig::default()).unwrap();
    assert!(right.solve(200.0, 20.0).unwrap().center_of_buoyancy.y < 0.0);
}

#[test]
fn hull_from_json() {
    let json = r#"{
        "name": "JSON BOX",
        "target_weight": 30.0,
        "target_payload": 70.0,
        "curves": [
            {"name": "chine", "points": [[0.0, 0.3, 0.0], [5.0, 0.3, 0.0]]},
            {
                "name": "gunwale",
                "end_condition": "natural",
                "points": [[0.0, 0.3, 0.3], [5.0, 0.3, 0.3]]
            }
        ]
    }"#;
    let def: HullDefinition = serde_json::from_str(json).unwrap();
    assert!((def.total_weight() - 100.0).abs() < f64::EPSILON);
    let hull = Hull::build(&def, HydroConfig::default()).unwrap();
    assert_eq!(hull.name(), "JSON BOX");
    assert!((hull.equilibrium().displacement - 100.0).abs() <= 1.0);

    let summary = serde_json::to_value(hull.summary()).unwrap();
    assert_eq!(summary["name"], "JSON BOX");
    assert!(summary["regular_profiles"].as_array().unwrap().len() == 100);
}

#[test]
fn json_defaults_name_and_targets() {
    let def: HullDefinition = serde_json::from_str(
        r#"{"curves": [{"name": "keel", "points": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]}]}"#,
    )
    .unwrap();
    assert_eq!(def.name, "KAYAK HULL");
    assert!((def.total_weight() - 200.0).abs() < f64::EPSILON);
}

#[test]
fn form_parameters_of_wedge() {
    let hull = Hull::build(&wedge_definition(), HydroConfig::default()).unwrap();
    let form = FormParameters::compute(&hull).unwrap();
    // Triangle sections: full length, half-filled midship rectangle.
    assert!((form.waterline_length - 5.0).abs() < 1e-9);
    assert!((form.waterline_beam - 2.0 * form.draft).abs() < 1e-9);
    assert!((form.midship_coefficient - 0.5).abs() < 1e-9);
    assert!((form.prismatic_coefficient - 1.0).abs() < 1e-9);
    assert!((form.waterplane_coefficient - 1.0).abs() < 1e-9);
    assert!((form.block_coefficient - 0.5).abs() < 1e-9);
}

#[test]
fn centerline_only_hull_has_no_volume() {
    let def = HullDefinition::new(vec![
        CurveDefinition::new("keel", vec![[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]]),
        CurveDefinition::new("deck", vec![[0.0, 0.0, 0.3], [5.0, 0.0, 0.3]]),
    ]);
    let err = Hull::build(&def, HydroConfig::default()).unwrap_err();
    assert!(matches!(err, HullformError::Geometry(GeometryError::ZeroVolume)));
}

#[test]
fn overloaded_hull_reports_capacity() {
    let def = wedge_definition().with_targets(200.0, 400.0);
    let err = Hull::build(&def, HydroConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        HullformError::Equilibrium(EquilibriumError::CapacityExceeded { .. })
    ));
}

#[test]
fn curled_keel_follows_the_lower_branch() {
    let hull = Hull::build(&curled_keel_definition(), HydroConfig::default()).unwrap();
    let keel = &hull.curves()[0];
    assert_eq!(keel.name(), "keel");
    assert_eq!(keel.parametrization(), Parametrization::ChordLength);
    assert_eq!(hull.curves()[1].parametrization(), Parametrization::Longitudinal);

    // Past x = 5.0 the keel crosses every station twice.
    let mut past_curl = 0;
    for profile in hull.regular_profiles().profiles() {
        let x = profile.station();
        if x <= 5.0 {
            continue;
        }
        past_curl += 1;
        let lower = keel.point_at_station(x, None).unwrap().unwrap();
        let upper = keel.point_at_station(x, Some(1.0)).unwrap().unwrap();
        assert!(upper.parameter > lower.parameter);
        assert!(upper.point.z > lower.point.z);
        assert!((profile.min_z().unwrap() - lower.point.z).abs() < 1e-9);
    }
    assert!(past_curl >= 2);
}

#[test]
fn curled_keel_hull_sweeps_through_ninety_degrees() {
    let hull = Hull::build(&curled_keel_definition(), HydroConfig::default()).unwrap();
    assert!((hull.equilibrium().displacement - 100.0).abs() <= 1.0);
    let curve = StabilitySweep::new(&hull)
        .with_config(StabilityConfig::default().with_angles(90.0, 10.0))
        .execute()
        .unwrap();
    assert_eq!(curve.points.len(), 10);
    for point in &curve.points {
        assert!((point.displacement - 100.0).abs() <= 1.0);
    }
    assert!(curve.points[0].gz.abs() < 1e-6);
}

#[test]
fn loaded_sweep_from_mass_components() {
    let hull = Hull::build(&wedge_definition(), HydroConfig::default()).unwrap();
    let x = hull.cg().x;
    let components = vec![
        hull.mass_component(20.0).unwrap(),
        MassComponent::new("Paddler", 160.0, Point3::new(x, 0.0, 0.25)).unwrap(),
        MassComponent::new("Gear", 20.0, Point3::new(x + 1.0, 0.0, 0.1)).unwrap(),
    ];
    let loading = CenterOfGravity::from_components(&components).unwrap();
    assert!((loading.total_mass - 200.0).abs() < 1e-12);

    let curve = StabilitySweep::new(&hull)
        .with_config(StabilityConfig::default().with_angles(30.0, 10.0))
        .with_components(components)
        .execute()
        .unwrap();
    assert!((curve.points[0].displacement - 200.0).abs() <= 1.0);
    assert!((curve.points[0].center_of_gravity.z - loading.position.z).abs() < 1e-12);
}

#[test]
fn displacement_curve_brackets_equilibrium() {
    let hull = Hull::build(&wedge_definition(), HydroConfig::default()).unwrap();
    let eq = hull.equilibrium();
    let waterlines = [eq.waterline - 0.02, eq.waterline, eq.waterline + 0.02];
    let curve = hull.displacement_curve(0.0, &waterlines).unwrap();
    assert!(curve[0].displacement < eq.displacement);
    assert!((curve[1].displacement - eq.displacement).abs() < 1e-9);
    assert!(curve[2].displacement > eq.displacement);

    let heeled = hull.buoyancy_at_heel_angles(&[0.0, 30.0], eq.waterline).unwrap();
    assert!((heeled[0].volume - eq.volume).abs() < 1e-12);
    assert!(heeled[1].center_of_buoyancy.unwrap().y < 0.0);
}
