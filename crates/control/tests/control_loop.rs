mod common;

use common::{Input, ScriptedEnv, ScriptedSurface};
use control::{Action, ControlError, ControlLoop, DiscreteAction, FrameStatus, Key, OVERLAY_SLOTS};

use Input::{Press, Release};

fn d(action: DiscreteAction) -> Action {
    Action::Discrete(action)
}

#[test]
fn two_agent_discrete_walkthrough() {
    // First batch is delivered by the frame presented at construction.
    let surface = ScriptedSurface::new().script(vec![
        vec![Press(Key::Right)],
        vec![Press(Key::Tab), Release(Key::Right)],
        vec![],
    ]);
    let mut control = ControlLoop::new(ScriptedEnv::new(2, false), surface).unwrap();

    let first = control.tick().unwrap();
    assert_eq!(first.selected, 0);
    assert_eq!(first.batch, vec![d(DiscreteAction::Right), d(DiscreteAction::Noop)]);
    assert!((first.reward - 1.0).abs() < f32::EPSILON);
    assert!((first.cumulative - 1.0).abs() < f32::EPSILON);

    let second = control.tick().unwrap();
    assert_eq!(second.selected, 1);
    assert_eq!(second.batch, vec![d(DiscreteAction::Noop), d(DiscreteAction::Noop)]);
    assert!((second.reward - 2.0).abs() < f32::EPSILON);
    assert!((second.cumulative - 4.0).abs() < f32::EPSILON);
    assert_eq!(control.session().returns().as_slice(), &[2.0_f32, 4.0]);
    assert_eq!(control.env().batches.len(), 2);
}

#[test]
fn overlay_lines_follow_selected_agent() {
    let mut control = ControlLoop::new(ScriptedEnv::new(2, false), ScriptedSurface::new()).unwrap();
    control.tick().unwrap();

    let frame = control.surface().last_frame();
    assert_eq!(
        frame,
        &[
            "\t\t[0.50, 0.25]",
            "Obs: [1.00, 0.00]",
            "Rew: 1.000",
            "Total rew: 1.000",
            "Done: false",
            "Selected: agent_0",
        ]
    );
}

#[test]
fn overlay_slots_follow_existing_lines() {
    let surface = ScriptedSurface::with_existing_lines(3);
    let mut control = ControlLoop::new(ScriptedEnv::new(1, false), surface).unwrap();
    assert_eq!(control.overlay().base(), 3);

    control.tick().unwrap();
    let lines = control.surface().lines.as_ref().unwrap();
    assert_eq!(lines.len(), 3 + OVERLAY_SLOTS);
    assert!(lines[..3].iter().all(|line| line.message.is_empty()));
    assert_eq!(lines[3].index, 3);
    assert_eq!(lines[8].message, "Selected: agent_0");
    assert!(lines[3..].iter().all(|line| line.font_size == 15));
}

#[test]
fn overlay_starts_at_zero_without_line_list() {
    let control = ControlLoop::new(ScriptedEnv::new(1, false), ScriptedSurface::new()).unwrap();
    assert_eq!(control.overlay().base(), 0);
    assert_eq!(control.surface().lines.as_ref().map(Vec::len), Some(OVERLAY_SLOTS));
}

#[test]
fn custom_font_size_is_applied() {
    let surface = ScriptedSurface::new();
    let mut control = ControlLoop::with_font_size(ScriptedEnv::new(1, false), surface, 22).unwrap();
    control.tick().unwrap();
    let lines = control.surface().lines.as_ref().unwrap();
    assert!(lines.iter().all(|line| line.font_size == 22));
}

#[test]
fn done_defers_reset_to_next_tick() {
    let env = ScriptedEnv::new(2, false).done_on(&[2]);
    let mut control = ControlLoop::new(env, ScriptedSurface::new()).unwrap();

    control.tick().unwrap();
    let terminal = control.tick().unwrap();
    assert!(terminal.done);
    assert!(!terminal.reset);
    assert_eq!(control.env().resets, 0);
    assert_eq!(control.surface().last_frame()[4], "Done: true");
    assert_eq!(control.surface().last_frame()[1], "Obs: [2.00, 0.00]");
    assert!((terminal.cumulative - 2.0).abs() < f32::EPSILON);
    assert!(control.session().reset_requested());

    let after = control.tick().unwrap();
    assert!(after.reset);
    assert!(!after.done);
    assert_eq!(control.env().resets, 1);
    assert_eq!(control.env().resets_before_step, vec![0, 0, 1]);
    assert!((after.cumulative - 1.0).abs() < f32::EPSILON);
    assert!(!control.session().reset_requested());
}

#[test]
fn r_released_before_tick_cancels_reset() {
    let surface = ScriptedSurface::new().script(vec![vec![], vec![Press(Key::R), Release(Key::R)]]);
    let mut control = ControlLoop::new(ScriptedEnv::new(1, false), surface).unwrap();

    control.tick().unwrap();
    let next = control.tick().unwrap();
    assert!(!next.reset);
    assert_eq!(control.env().resets, 0);
}

#[test]
fn held_r_resets_once() {
    let surface = ScriptedSurface::new().script(vec![vec![], vec![Press(Key::R)]]);
    let mut control = ControlLoop::new(ScriptedEnv::new(1, false), surface).unwrap();

    assert!(!control.tick().unwrap().reset);
    assert!(control.tick().unwrap().reset);
    assert!(!control.tick().unwrap().reset);
    assert_eq!(control.env().resets, 1);
    assert_eq!(control.session().keys().held_count(), 0);
}

#[test]
fn selection_and_keys_survive_reset() {
    let surface = ScriptedSurface::new().script(vec![
        vec![Press(Key::Tab), Press(Key::Up), Press(Key::R)],
        vec![],
    ]);
    let mut control = ControlLoop::new(ScriptedEnv::new(3, false), surface).unwrap();

    let report = control.tick().unwrap();
    assert!(report.reset);
    assert_eq!(report.selected, 1);
    assert_eq!(
        report.batch,
        vec![d(DiscreteAction::Noop), d(DiscreteAction::Up), d(DiscreteAction::Noop)]
    );
    assert!(control.session().keys().is_held(Key::Up));
}

#[test]
fn only_selected_agent_receives_action() {
    let surface = ScriptedSurface::new().script(vec![
        vec![Press(Key::Left)],
        vec![Press(Key::Tab)],
        vec![Press(Key::Down)],
        vec![Press(Key::Tab), Release(Key::Left)],
        vec![Press(Key::Tab)],
        vec![Release(Key::Down)],
    ]);
    let mut control = ControlLoop::new(ScriptedEnv::new(3, false), surface).unwrap();

    for _ in 0..6 {
        let action = control.session().action();
        let report = control.tick().unwrap();
        for (agent, entry) in report.batch.iter().enumerate() {
            if agent == report.selected {
                assert_eq!(*entry, action);
            } else {
                assert_eq!(*entry, d(DiscreteAction::Noop));
            }
        }
    }
}

#[test]
fn continuous_batch_uses_zero_vectors() {
    let surface = ScriptedSurface::new().script(vec![vec![Press(Key::Up), Press(Key::Left)]]);
    let mut control = ControlLoop::new(ScriptedEnv::new(3, true), surface).unwrap();

    let report = control.tick().unwrap();
    assert_eq!(
        report.batch,
        vec![
            Action::Continuous([-1.0, 1.0]),
            Action::Continuous([0.0, 0.0]),
            Action::Continuous([0.0, 0.0]),
        ]
    );
}

#[test]
fn step_failure_is_fatal() {
    let mut env = ScriptedEnv::new(2, false);
    env.fail_step_on = Some(2);
    let mut control = ControlLoop::new(env, ScriptedSurface::new()).unwrap();

    control.tick().unwrap();
    let err = control.tick().unwrap_err();
    assert!(matches!(err, ControlError::Step(_)));
}

#[test]
fn reset_failure_is_fatal() {
    let mut env = ScriptedEnv::new(2, false);
    env.fail_reset = true;
    let surface = ScriptedSurface::new().script(vec![vec![Press(Key::R)]]);
    let mut control = ControlLoop::new(env, surface).unwrap();

    let err = control.tick().unwrap_err();
    assert!(matches!(err, ControlError::Reset(_)));
    assert_eq!(control.env().steps, 0);
}

#[test]
fn render_failure_is_fatal() {
    let mut surface = ScriptedSurface::new();
    surface.fail_present_on = Some(2);
    let mut control = ControlLoop::new(ScriptedEnv::new(2, false), surface).unwrap();

    let err = control.tick().unwrap_err();
    assert!(matches!(err, ControlError::Render(_)));
    assert!(err.to_string().contains("rendering failed"));
}

#[test]
fn first_frame_failure_aborts_construction() {
    let mut surface = ScriptedSurface::new();
    surface.fail_present_on = Some(1);
    let result = ControlLoop::new(ScriptedEnv::new(1, false), surface);
    assert!(matches!(result, Err(ControlError::Render(_))));
}

#[test]
fn environment_without_agents_is_rejected() {
    let result = ControlLoop::new(ScriptedEnv::new(0, false), ScriptedSurface::new());
    assert!(matches!(result, Err(ControlError::NoAgents)));
}

#[test]
fn short_observation_list_is_rejected() {
    let mut env = ScriptedEnv::new(2, false);
    env.observation_count = Some(1);
    let mut control = ControlLoop::new(env, ScriptedSurface::new()).unwrap();

    let err = control.tick().unwrap_err();
    assert!(matches!(
        err,
        ControlError::ObservationShape {
            what: "observations",
            expected: 2,
            got: 1,
        }
    ));
    assert_eq!(err.to_string(), "environment returned 1 observations for 2 agents");
}

#[test]
fn shared_done_flag_arms_reset_for_any_selected_agent() {
    let mut env = ScriptedEnv::new(3, false).done_on(&[2]);
    env.shared_done = true;
    let surface = ScriptedSurface::new().script(vec![vec![Press(Key::Tab), Press(Key::Tab)]]);
    let mut control = ControlLoop::new(env, surface).unwrap();

    assert!(!control.tick().unwrap().done);
    let terminal = control.tick().unwrap();
    assert_eq!(terminal.selected, 2);
    assert!(terminal.done);
    assert_eq!(control.surface().last_frame()[4], "Done: true");
    assert!(control.session().reset_requested());

    let after = control.tick().unwrap();
    assert!(after.reset);
    assert_eq!(control.env().resets, 1);
}

#[test]
fn run_ends_when_surface_closes() {
    let mut surface = ScriptedSurface::new();
    surface.close_after = Some(4);
    let mut control = ControlLoop::new(ScriptedEnv::new(2, false), surface).unwrap();

    control.run().unwrap();
    assert_eq!(control.env().steps, 3);
}

#[test]
fn run_for_counts_ticks() {
    let mut control = ControlLoop::new(ScriptedEnv::new(2, false), ScriptedSurface::new()).unwrap();
    assert_eq!(control.run_for(5).unwrap(), 5);
    assert_eq!(control.env().steps, 5);
    let report = control.tick().unwrap();
    assert_eq!(report.tick, 6);
    assert_eq!(report.status, FrameStatus::Presented);
}
