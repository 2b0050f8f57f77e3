//! Trooper Patrol
//!
//! This example runs a trooper enemy against a moving target.
//!
//! Key concepts:
//! - Multi-cycle behavior as a phase enum plus timer (aim, shoot, reload)
//! - Forced change when grabbed, guarded return when released
//! - Any-state Die on lethal damage
//! - Reset for pooled entities
//!
//! Run with: RUST_LOG=debug cargo run --example trooper_patrol

use glam::Vec2;
use std::time::Duration;
use tickstate::entities::{ClipRecorder, ShotRecorder, TrooperController, TrooperTuning};

const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Trooper Patrol Example ===\n");

    let tuning = TrooperTuning {
        aim_time: 0.5,
        reload_time: 0.3,
        ..TrooperTuning::default()
    };
    let mut tc = TrooperController::new(
        Vec2::ZERO,
        ClipRecorder::default(),
        ShotRecorder::default(),
        tuning,
    )?;

    println!("Target strafing past the trooper:");
    for frame in 0..20 {
        let target = Vec2::new(6.0 - frame as f32 * 0.6, 0.5);
        tc.set_target(target);
        tc.tick(TICK)?;
        println!(
            "  frame {:>2}  {:<8} target ({:>5.1}, {:.1})  facing {}  shots {}",
            frame,
            tc.state(),
            target.x,
            target.y,
            if tc.trooper().facing_left { "left " } else { "right" },
            tc.trooper().projectiles.shots.len()
        );
    }

    println!("\nGrabbed by the player's hook:");
    let hold = tc.grabbed()?;
    println!("  held at height {hold}");
    for _ in 0..3 {
        tc.tick(TICK)?;
    }
    println!("  state while held: {}", tc.state());
    tc.release();
    tc.tick(TICK)?;
    println!("  state after release: {}", tc.state());

    println!("\nLethal hit:");
    tc.take_hit(1);
    tc.tick(TICK)?;
    println!("  state: {} (dead: {})", tc.state(), tc.is_dead());
    if tc.take_death() {
        println!("  spawner notified of the death");
    }

    println!("\nReturned to the pool and reused:");
    tc.reset()?;
    println!("  state: {} (hp: {})", tc.state(), tc.trooper().hp);

    for shot in &tc.trooper().projectiles.shots {
        println!(
            "  shot from ({:.1}, {:.1}) toward ({:.2}, {:.2})",
            shot.origin.x, shot.origin.y, shot.direction.x, shot.direction.y
        );
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
