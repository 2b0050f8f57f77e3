//! Player Movement
//!
//! This example drives the built-in player controller through a short
//! scripted input sequence.
//!
//! Key concepts:
//! - Three-phase cycle (update, fixed update, late update)
//! - Dwell time on RunStop before settling to Idle
//! - Any-state interrupts (airborne, damage)
//! - Forced changes from collision events (wall contact)
//!
//! Run with: RUST_LOG=debug cargo run --example player_movement

use std::time::Duration;
use tickstate::entities::{ClipRecorder, KinematicBody, PlayerController, PlayerTuning};

const TICK: Duration = Duration::from_millis(50);

fn step(
    pc: &mut PlayerController<KinematicBody, ClipRecorder>,
    frame: &mut u32,
    note: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    pc.tick(TICK)?;
    if !pc.player().sensors.is_ground {
        pc.player_mut().body.integrate(TICK.as_secs_f32());
    }
    *frame += 1;
    let body = &pc.player().body;
    println!(
        "  frame {:>2}  {:<9} vx {:>6.2} vy {:>6.2}  {}",
        frame,
        pc.state(),
        body.velocity.x,
        body.velocity.y,
        note
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Player Movement Example ===\n");

    let tuning = PlayerTuning::from_json(r#"{ "run_stop_dwell": 0.2, "max_move_speed": 5.0 }"#)?;
    let body = KinematicBody {
        gravity: 20.0,
        ..KinematicBody::default()
    };
    let mut pc = PlayerController::new(body, ClipRecorder::default(), tuning)?;
    pc.on_ground_contact(true);
    let mut frame = 0;

    println!("Running right:");
    pc.set_input(1.0, 0.0);
    for _ in 0..4 {
        step(&mut pc, &mut frame, "input right")?;
    }

    println!("\nReleasing input (RunStop holds for 0.2s):");
    pc.set_input(0.0, 0.0);
    for _ in 0..6 {
        step(&mut pc, &mut frame, "no input")?;
    }

    println!("\nJumping:");
    pc.jump();
    for _ in 0..10 {
        step(&mut pc, &mut frame, "airborne")?;
    }

    println!("\nHitting a wall mid-air:");
    pc.on_wall_contact(true)?;
    step(&mut pc, &mut frame, "sliding")?;
    pc.on_ground_contact(true);
    pc.player_mut().body.velocity.y = 0.0;
    step(&mut pc, &mut frame, "landed")?;

    println!("\nTaking damage:");
    pc.take_damage();
    for _ in 0..11 {
        step(&mut pc, &mut frame, "")?;
    }

    println!("\nClips played: {:?}", pc.player().animator.clips);
    println!("Final status: {}", serde_json::to_string(&pc.machine().status())?);

    println!("\n=== Example Complete ===");
    Ok(())
}
