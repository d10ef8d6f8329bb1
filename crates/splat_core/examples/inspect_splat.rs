//! Example: Load and inspect a `.splat` file.
//!
//! Run with: cargo run --example inspect_splat -- scene.splat [RDF]

use std::env;
use std::path::Path;

use anyhow::{bail, Result};
use splat_core::{CoordinateSystem, SplatFile, SplatFormat, UnpackOptions};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_splat <path-to-splat-file> [coordinate-system]");
        println!("\nExamples:");
        println!("  cargo run --example inspect_splat -- scene.splat");
        println!("  cargo run --example inspect_splat -- scene.splat RDF");
        return Ok(());
    }

    let path = Path::new(&args[1]);
    let to = args
        .get(2)
        .map(|token| CoordinateSystem::from_token(token))
        .unwrap_or(CoordinateSystem::Rub);

    println!("Loading .splat file: {} (as {})", path.display(), to);
    let cloud = SplatFile.try_load(path, &UnpackOptions::new(to))?;
    if cloud.is_empty() {
        bail!("{} contains no points", path.display());
    }

    println!("\n=== Cloud ===");
    println!("Points: {}", cloud.num_points);
    println!("SH degree: {}", cloud.sh_degree);
    println!("Antialiased: {}", cloud.antialiased);

    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for p in cloud.positions.chunks_exact(3) {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    println!("\n--- Bounds ---");
    println!("  Min: ({:.2}, {:.2}, {:.2})", min[0], min[1], min[2]);
    println!("  Max: ({:.2}, {:.2}, {:.2})", max[0], max[1], max[2]);

    println!("\n--- First points ---");
    for i in 0..cloud.num_points.min(5) {
        if let Some(point) = cloud.point(i) {
            println!(
                "  [{}] pos ({:.2}, {:.2}, {:.2}) alpha {:.3} rot ({:.3}, {:.3}, {:.3}, {:.3})",
                i,
                point.position.x,
                point.position.y,
                point.position.z,
                point.alpha,
                point.rotation.x,
                point.rotation.y,
                point.rotation.z,
                point.rotation.w
            );
        }
    }

    Ok(())
}
