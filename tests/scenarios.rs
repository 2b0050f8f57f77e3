//! End-to-end scenarios driven through the public API.

use std::time::Duration;
use tickstate::core::{BehaviorState, Context, FsmError, Guard, GuardError};
use tickstate::{MachineBuilder, StateMachine};

const TICK: Duration = Duration::from_millis(50);

#[derive(Default)]
struct Runner {
    hzt: f32,
    damaged: bool,
    sensor_lost: bool,
    calls: Vec<String>,
    requests: Vec<&'static str>,
}

impl Runner {
    fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

/// Logs every hook. During `update` it files whatever change requests the
/// runner has queued.
struct Logged(&'static str);

impl Logged {
    fn log(&self, ctx: &mut Context<'_, Runner>, hook: &str) {
        let call = format!("{hook}:{}", self.0);
        ctx.calls.push(call);
    }
}

impl BehaviorState<Runner> for Logged {
    fn enter(&mut self, ctx: &mut Context<'_, Runner>) {
        self.log(ctx, "enter");
    }

    fn update(&mut self, ctx: &mut Context<'_, Runner>) {
        self.log(ctx, "update");
        let requests = std::mem::take(&mut ctx.requests);
        for name in requests {
            let accepted = ctx.request_change(name).unwrap();
            ctx.calls.push(format!("request:{name}:{accepted}"));
        }
    }

    fn fixed_update(&mut self, ctx: &mut Context<'_, Runner>) {
        self.log(ctx, "fixed");
    }

    fn late_update(&mut self, ctx: &mut Context<'_, Runner>) {
        self.log(ctx, "late");
    }

    fn exit(&mut self, ctx: &mut Context<'_, Runner>) {
        self.log(ctx, "exit");
    }
}

fn locomotion(runner: &mut Runner) -> StateMachine<Runner> {
    MachineBuilder::new()
        .label("runner")
        .initial("Idle")
        .state("Idle", Logged("Idle"))
        .state("Run", Logged("Run"))
        .state("RunStop", Logged("RunStop"))
        .state("Damaged", Logged("Damaged"))
        .any_state("Damaged", |r: &Runner| r.damaged)
        .transition("Damaged", "Idle", |r: &Runner| !r.damaged)
        .transition("Idle", "Run", |r: &Runner| r.hzt.abs() > 0.1)
        .transition("Run", "RunStop", |r: &Runner| r.hzt == 0.0)
        .transition("RunStop", "Run", |r: &Runner| r.hzt.abs() > 0.1)
        .timed_transition(
            "RunStop",
            "Idle",
            Duration::from_millis(200),
            |r: &Runner| r.hzt.abs() <= 0.1,
        )
        .start(runner)
        .unwrap()
}

fn cycle(fsm: &mut StateMachine<Runner>, runner: &mut Runner) {
    fsm.update(runner, TICK).unwrap();
    fsm.fixed_update(runner, TICK).unwrap();
    fsm.late_update(runner, TICK).unwrap();
}

#[test]
fn run_stop_settles_to_idle_after_dwell() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);

    runner.hzt = 0.5;
    cycle(&mut fsm, &mut runner);
    assert!(fsm.is_in("Run"));

    runner.hzt = 0.0;
    cycle(&mut fsm, &mut runner);
    assert!(fsm.is_in("RunStop"));

    // 0.05s already spent entering RunStop; 0.25s in total.
    for _ in 0..3 {
        cycle(&mut fsm, &mut runner);
        assert!(fsm.is_in("RunStop"));
    }
    cycle(&mut fsm, &mut runner);
    assert!(fsm.is_in("Idle"));
    assert_eq!(fsm.previous_state_name(), Some("RunStop"));
}

#[test]
fn damage_interrupts_run_exactly_once() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    runner.hzt = 1.0;
    cycle(&mut fsm, &mut runner);
    runner.calls.clear();

    runner.damaged = true;
    fsm.update(&mut runner, TICK).unwrap();

    assert!(fsm.is_in("Damaged"));
    assert_eq!(runner.calls, vec!["exit:Run", "enter:Damaged", "update:Damaged"]);

    cycle(&mut fsm, &mut runner);
    assert_eq!(runner.count("exit:Run"), 1);
    assert_eq!(runner.count("enter:Damaged"), 1);
}

#[test]
fn phases_run_in_order_each_cycle() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);

    cycle(&mut fsm, &mut runner);

    assert_eq!(
        runner.calls,
        vec!["enter:Idle", "update:Idle", "fixed:Idle", "late:Idle"]
    );
}

#[test]
fn forced_change_skips_guards_and_resets_time() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    cycle(&mut fsm, &mut runner);

    fsm.change_state("RunStop", &mut runner).unwrap();

    assert!(fsm.is_in("RunStop"));
    assert_eq!(fsm.previous_state_name(), Some("Idle"));
    assert_eq!(fsm.time_in_current_state(), Duration::ZERO);
    assert_eq!(runner.calls.last().map(String::as_str), Some("enter:RunStop"));
}

#[test]
fn forced_change_to_current_state_does_nothing() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    cycle(&mut fsm, &mut runner);
    let before = runner.calls.len();

    fsm.change_state("Idle", &mut runner).unwrap();

    assert_eq!(runner.calls.len(), before);
    assert_eq!(fsm.time_in_current_state(), TICK);
}

#[test]
fn forced_change_to_unknown_state_is_an_error() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);

    let err = fsm.change_state("Fly", &mut runner).unwrap_err();

    assert_eq!(
        err,
        FsmError::UnknownState {
            name: "Fly".to_string()
        }
    );
    assert!(fsm.is_in("Idle"));
}

#[test]
fn requested_change_applies_on_next_update() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    runner.requests = vec!["RunStop"];

    cycle(&mut fsm, &mut runner);
    assert!(fsm.is_in("Idle"));
    assert!(fsm.has_pending_change());
    assert_eq!(fsm.status().pending.as_deref(), Some("RunStop"));

    cycle(&mut fsm, &mut runner);
    assert!(fsm.is_in("RunStop"));
    assert!(!fsm.has_pending_change());
}

#[test]
fn requested_change_outranks_any_state() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    runner.requests = vec!["Run"];
    cycle(&mut fsm, &mut runner);

    runner.damaged = true;
    fsm.update(&mut runner, TICK).unwrap();
    assert!(fsm.is_in("Run"));

    fsm.update(&mut runner, TICK).unwrap();
    assert!(fsm.is_in("Damaged"));
}

#[test]
fn second_request_in_a_cycle_is_ignored() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    runner.requests = vec!["Run", "RunStop"];

    cycle(&mut fsm, &mut runner);
    assert!(runner.calls.contains(&"request:Run:true".to_string()));
    assert!(runner.calls.contains(&"request:RunStop:false".to_string()));

    cycle(&mut fsm, &mut runner);
    assert!(fsm.is_in("Run"));
}

#[test]
fn forced_change_discards_pending_request() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    runner.requests = vec!["RunStop"];
    cycle(&mut fsm, &mut runner);

    fsm.change_state("Run", &mut runner).unwrap();
    assert!(!fsm.has_pending_change());

    runner.hzt = 1.0;
    cycle(&mut fsm, &mut runner);
    assert!(fsm.is_in("Run"));
}

#[test]
fn failing_guard_aborts_the_cycle() {
    let mut runner = Runner::default();
    let mut fsm: StateMachine<Runner> = MachineBuilder::new()
        .initial("Idle")
        .state("Idle", Logged("Idle"))
        .state("Run", Logged("Run"))
        .guarded_transition(
            "Idle",
            "Run",
            Duration::ZERO,
            Guard::fallible(|r: &Runner| {
                if r.sensor_lost {
                    Err(GuardError::new("input device gone"))
                } else {
                    Ok(r.hzt.abs() > 0.1)
                }
            }),
        )
        .start(&mut runner)
        .unwrap();
    runner.sensor_lost = true;
    runner.hzt = 1.0;

    let err = fsm.update(&mut runner, TICK).unwrap_err();

    assert!(matches!(err, FsmError::GuardFailed { ref from, ref to, .. } if from == "Idle" && to == "Run"));
    assert!(fsm.is_in("Idle"));
    assert_eq!(runner.count("update:Idle"), 0);
    assert_eq!(fsm.time_in_current_state(), TICK);

    runner.sensor_lost = false;
    fsm.update(&mut runner, TICK).unwrap();
    assert!(fsm.is_in("Run"));
}

#[test]
fn reset_returns_to_initial_state() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    runner.hzt = 1.0;
    cycle(&mut fsm, &mut runner);
    runner.requests = vec!["RunStop"];
    cycle(&mut fsm, &mut runner);

    fsm.reset(&mut runner).unwrap();

    assert!(fsm.is_in("Idle"));
    assert_eq!(fsm.previous_state_name(), None);
    assert_eq!(fsm.time_in_current_state(), Duration::ZERO);
    assert!(!fsm.has_pending_change());
    assert_eq!(runner.count("exit:Run"), 1);
    assert_eq!(runner.count("enter:Idle"), 2);
}

#[test]
fn status_serializes_for_debugging() {
    let mut runner = Runner::default();
    let mut fsm = locomotion(&mut runner);
    runner.hzt = 1.0;
    cycle(&mut fsm, &mut runner);

    let status = fsm.status();
    let json = serde_json::to_string(&status).unwrap();
    let decoded: tickstate::MachineStatus = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, status);
    assert!(decoded.is_in("Run"));
    assert_eq!(decoded.label, "runner");
    assert_eq!(decoded.previous.as_deref(), Some("Idle"));
}
