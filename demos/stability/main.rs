//! Builds a kayak hull and prints its hydrostatics and GZ curve.
//!
//! Usage:
//! ```text
//! cargo run --example stability                         # built-in sea kayak
//! cargo run --example stability -- hull.json            # hull definition from JSON
//! cargo run --example stability --features parallel     # heel angles in parallel
//! ```

use std::error::Error;

use hullform::{
    CurveDefinition, FormParameters, Hull, HullDefinition, HydroConfig, StabilityConfig,
    StabilitySweep,
};

fn sea_kayak() -> HullDefinition {
    HullDefinition::new(vec![
        CurveDefinition::new(
            "keel",
            vec![
                [0.0, 0.0, 0.26],
                [0.6, 0.0, 0.07],
                [1.6, 0.0, 0.01],
                [2.6, 0.0, 0.0],
                [3.6, 0.0, 0.01],
                [4.6, 0.0, 0.08],
                [5.2, 0.0, 0.28],
            ],
        ),
        CurveDefinition::new(
            "chine",
            vec![
                [0.0, 0.0, 0.26],
                [1.0, 0.17, 0.1],
                [2.6, 0.26, 0.06],
                [4.2, 0.17, 0.1],
                [5.2, 0.0, 0.28],
            ],
        ),
        CurveDefinition::new(
            "gunwale",
            vec![
                [0.0, 0.0, 0.32],
                [1.0, 0.21, 0.3],
                [2.6, 0.3, 0.29],
                [4.2, 0.21, 0.3],
                [5.2, 0.0, 0.33],
            ],
        ),
    ])
    .with_name("SEA KAYAK")
    .with_targets(22.0, 85.0)
}

fn main() -> Result<(), Box<dyn Error>> {
    // Default: WARN for everything, INFO for hullform.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("hullform=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let definition = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => sea_kayak(),
    };

    let hull = Hull::build(&definition, HydroConfig::default())?;
    let summary = hull.summary();
    println!("{}", summary.name);
    println!(
        "  length {:.3} m  beam {:.3} m  depth {:.3} m",
        summary.bounds.length(),
        summary.bounds.beam(),
        summary.bounds.depth()
    );
    println!("  volume {:.4} m3", summary.volume);
    println!(
        "  waterline {:.4} m  displacement {:.1} kg",
        summary.waterline, summary.displacement
    );
    println!(
        "  CG ({:.3}, {:.3}, {:.3})  CB ({:.3}, {:.3}, {:.3})",
        summary.cg.x, summary.cg.y, summary.cg.z, summary.cb.x, summary.cb.y, summary.cb.z
    );
    if !summary.gaps.is_empty() {
        println!("  {} end stations without a closed section", summary.gaps.len());
    }

    let form = FormParameters::compute(&hull)?;
    println!();
    println!(
        "  LWL {:.3} m  BWL {:.3} m  T {:.3} m",
        form.waterline_length, form.waterline_beam, form.draft
    );
    println!(
        "  Cb {:.3}  Cp {:.3}  Cm {:.3}  Cwp {:.3}",
        form.block_coefficient,
        form.prismatic_coefficient,
        form.midship_coefficient,
        form.waterplane_coefficient
    );
    println!("  wetted surface {:.3} m2", form.wetted_surface);

    let curve = StabilitySweep::new(&hull)
        .with_config(StabilityConfig::default().with_angles(90.0, 5.0))
        .execute()?;
    println!();
    println!("  heel    GZ (m)   moment (N m)");
    for point in &curve.points {
        println!("  {:>4.0}  {:>8.4}  {:>12.2}", point.angle, point.gz, point.moment);
    }
    println!();
    println!(
        "  max moment {:.2} N m at {:.0} deg",
        curve.max_moment, curve.max_moment_angle
    );
    match curve.vanishing_angle {
        Some(angle) => println!("  vanishing stability at {angle:.1} deg"),
        None => println!("  no vanishing angle within the sweep"),
    }
    Ok(())
}
