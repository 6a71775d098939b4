//! Cycle timing against the deterministic queue.
//!
//! `wave-lr` lights columns at 0 / 120 / 240 ms, holds until 440 ms, darkens
//! columns at 440 / 560 / 680 ms, and starts the next cycle at 930 ms.

use std::time::Duration;

use pixelgrid_core::{CELL_COUNT, CellMask, CreateOptions, InstanceId, MemorySurface, Preset};
use pixelgrid_runtime::{Engine, EngineConfig, ManualClock, Phase};
use pretty_assertions::assert_eq;

const LEFT: [usize; 3] = [0, 3, 6];
const MIDDLE: [usize; 3] = [1, 4, 7];
const RIGHT: [usize; 3] = [2, 5, 8];

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn mask(cells: &[usize]) -> CellMask {
    cells
        .iter()
        .fold(CellMask::empty(), |acc, &i| acc | CellMask::cell(i))
}

fn lit(engine: &Engine<MemorySurface>, id: InstanceId) -> CellMask {
    let inst = engine.get_instance(id).unwrap();
    let from_surface = (0..CELL_COUNT)
        .filter(|&i| inst.container().is_lit(i))
        .fold(CellMask::empty(), |acc, i| acc | CellMask::cell(i));
    assert_eq!(from_surface, inst.lit_cells(), "surface and state disagree");
    from_surface
}

fn wave(engine: &mut Engine<MemorySurface>) -> InstanceId {
    engine.create(MemorySurface::new(), CreateOptions::new().animation("wave-lr"))
}

fn engine() -> Engine<MemorySurface> {
    Engine::with_config(EngineConfig::default())
}

#[test]
fn wave_lr_first_cycle() {
    let mut engine = engine();
    let id = wave(&mut engine);

    engine.advance_to(ms(0));
    assert_eq!(lit(&engine, id), mask(&LEFT));
    engine.advance_to(ms(119));
    assert_eq!(lit(&engine, id), mask(&LEFT));
    engine.advance_to(ms(120));
    assert_eq!(lit(&engine, id), mask(&[0, 1, 3, 4, 6, 7]));
    engine.advance_to(ms(240));
    assert_eq!(lit(&engine, id), CellMask::all());
    engine.advance_to(ms(439));
    assert_eq!(lit(&engine, id), CellMask::all());
    assert_eq!(engine.get_instance(id).unwrap().phase(), Phase::FadingIn);

    engine.advance_to(ms(440));
    assert_eq!(engine.get_instance(id).unwrap().phase(), Phase::FadingOut);
    assert_eq!(lit(&engine, id), mask(&[1, 2, 4, 5, 7, 8]));
    engine.advance_to(ms(560));
    assert_eq!(lit(&engine, id), mask(&RIGHT));
    engine.advance_to(ms(680));
    assert_eq!(lit(&engine, id), CellMask::empty());
    engine.advance_to(ms(929));
    assert_eq!(lit(&engine, id), CellMask::empty());
    assert!(engine.get_instance(id).unwrap().is_running());
}

#[test]
fn wave_lr_repeats_indefinitely() {
    let mut engine = engine();
    let id = wave(&mut engine);

    engine.advance_to(ms(930));
    assert_eq!(engine.get_instance(id).unwrap().phase(), Phase::FadingIn);
    assert_eq!(lit(&engine, id), mask(&LEFT));
    engine.advance_to(ms(930 + 120));
    assert_eq!(lit(&engine, id), mask(&[0, 1, 3, 4, 6, 7]));

    let cycle = 930;
    engine.advance_to(ms(cycle * 10 + 240));
    assert_eq!(lit(&engine, id), CellMask::all());
}

#[test]
fn one_large_step_matches_many_small_ones() {
    let mut coarse = engine();
    let mut fine = engine();
    let a = wave(&mut coarse);
    let b = wave(&mut fine);

    coarse.advance(ms(2_000));
    for _ in 0..2_000 {
        fine.advance(ms(1));
    }
    assert_eq!(lit(&coarse, a), lit(&fine, b));
    assert_eq!(coarse.now(), fine.now());
    assert_eq!(
        coarse.get_instance(a).unwrap().phase(),
        fine.get_instance(b).unwrap().phase()
    );
}

#[test]
fn pump_follows_the_clock() {
    let mut engine = engine();
    let id = wave(&mut engine);
    let mut clock = ManualClock::new();

    clock.set(ms(130));
    engine.pump(&clock);
    assert_eq!(lit(&engine, id), mask(&[0, 1, 3, 4, 6, 7]));
    assert_eq!(engine.now(), ms(130));
}

#[test]
fn play_while_running_is_a_no_op() {
    let mut engine = engine();
    let id = wave(&mut engine);
    engine.advance_to(ms(50));
    let before = engine.get_instance(id).unwrap().pending().to_vec();

    assert!(!engine.instance_mut(id).unwrap().play());
    assert_eq!(engine.get_instance(id).unwrap().pending(), before.as_slice());
    assert_eq!(engine.timers().len(), before.len());
}

#[test]
fn running_instance_always_has_a_pending_timer() {
    let mut engine = engine();
    let id = wave(&mut engine);
    for step in 0..200 {
        engine.advance_to(ms(step * 17));
        let inst = engine.get_instance(id).unwrap();
        assert!(inst.pending_timers() > 0, "no timers at {}ms", step * 17);
    }
}

#[test]
fn stop_darkens_and_cancels() {
    let mut engine = engine();
    let id = wave(&mut engine);
    engine.advance_to(ms(300));
    assert_eq!(lit(&engine, id), CellMask::all());

    engine.instance_mut(id).unwrap().stop();
    assert_eq!(lit(&engine, id), CellMask::empty());
    assert!(engine.timers().is_empty());

    engine.advance(ms(10_000));
    assert_eq!(lit(&engine, id), CellMask::empty());
    assert_eq!(engine.get_instance(id).unwrap().phase(), Phase::Idle);
}

#[test]
fn play_after_stop_starts_from_fade_in() {
    let mut engine = engine();
    let id = wave(&mut engine);
    engine.advance_to(ms(500));
    engine.instance_mut(id).unwrap().stop();
    assert!(engine.instance_mut(id).unwrap().play());

    engine.advance(ms(0));
    assert_eq!(lit(&engine, id), mask(&LEFT));
    engine.advance(ms(440));
    assert_eq!(engine.get_instance(id).unwrap().phase(), Phase::FadingOut);
}

#[test]
fn set_animation_while_running_restarts_phase_one() {
    let mut engine = engine();
    let id = wave(&mut engine);
    engine.advance_to(ms(600));

    {
        let mut handle = engine.instance_mut(id).unwrap();
        handle.set_animation("cross");
        handle.set_animation("wave-tb");
    }
    let inst = engine.get_instance(id).unwrap();
    assert_eq!(inst.config().name(), "wave-tb");
    assert!(inst.is_running());
    assert_eq!(inst.phase(), Phase::FadingIn);
    assert_eq!(inst.pending_timers(), CELL_COUNT + 1);
    assert_eq!(engine.timers().len(), CELL_COUNT + 1);

    engine.advance(ms(0));
    assert_eq!(lit(&engine, id), mask(&[0, 1, 2]));
}

#[test]
fn set_animation_twice_with_same_preset_matches_single_call() {
    let mut once = engine();
    let mut twice = engine();
    let a = wave(&mut once);
    let b = wave(&mut twice);
    once.advance_to(ms(600));
    twice.advance_to(ms(600));

    once.instance_mut(a).unwrap().set_animation("aurora");
    {
        let mut handle = twice.instance_mut(b).unwrap();
        handle.set_animation("aurora");
        handle.set_animation("aurora");
    }

    for step in [0, 150, 400] {
        once.advance(ms(step));
        twice.advance(ms(step));
        let (x, y) = (once.get_instance(a).unwrap(), twice.get_instance(b).unwrap());
        assert_eq!(x.container(), y.container(), "surfaces differ after {step} ms");
        assert_eq!(x.lit_cells(), y.lit_cells());
        assert_eq!(x.phase(), y.phase());
        assert_eq!(x.pending_timers(), y.pending_timers());
        assert_eq!(once.timers().len(), twice.timers().len());
        if step == 0 {
            assert_eq!(y.config().name(), "aurora");
            assert!(y.is_running());
            assert_eq!(y.phase(), Phase::FadingIn);
        }
    }
}

#[test]
fn set_animation_same_preset_restarts_fade_in() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().animation("aurora"));
    engine.advance_to(ms(700));
    assert_ne!(engine.get_instance(id).unwrap().phase(), Phase::FadingIn);

    {
        let mut handle = engine.instance_mut(id).unwrap();
        handle.set_animation("aurora");
        handle.set_animation("aurora");
    }
    let inst = engine.get_instance(id).unwrap();
    assert!(inst.is_running());
    assert_eq!(inst.phase(), Phase::FadingIn);
    assert_eq!(inst.pending_timers(), CELL_COUNT + 1);
    assert_eq!(engine.timers().len(), CELL_COUNT + 1);
    assert!(inst.lit_cells().is_empty());
}

#[test]
fn set_animation_while_idle_stays_idle() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().autoplay(false));
    engine.instance_mut(id).unwrap().set_animation("snake");
    let inst = engine.get_instance(id).unwrap();
    assert_eq!(inst.config().name(), "snake");
    assert!(!inst.is_running());
    assert!(engine.timers().is_empty());
}

#[test]
fn zero_duration_preset_still_makes_progress() {
    let mut engine = engine();
    let preset = Preset::new("flash", &[0; CELL_COUNT], 0).unwrap();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().animation(preset));

    engine.advance_to(ms(0));
    assert_eq!(engine.get_instance(id).unwrap().phase(), Phase::FadingOut);
    assert_eq!(lit(&engine, id), CellMask::empty());
    assert_eq!(engine.timers().next_deadline(), Some(ms(50)));

    engine.advance_to(ms(1_000));
    assert_eq!(engine.now(), ms(1_000));
    assert_eq!(engine.timers().next_deadline(), Some(ms(1_050)));
    assert!(engine.get_instance(id).unwrap().is_running());
}

#[test]
fn instances_do_not_interfere() {
    let mut engine = engine();
    let a = wave(&mut engine);
    let b = engine.create(MemorySurface::new(), CreateOptions::new().animation("cross"));

    engine.advance_to(ms(10));
    engine.instance_mut(a).unwrap().stop();
    assert!(engine.get_instance(b).unwrap().is_running());

    engine.advance_to(ms(300));
    assert_eq!(lit(&engine, a), CellMask::empty());
    assert_eq!(lit(&engine, b), CellMask::all());

    engine.destroy(b);
    engine.advance(ms(5_000));
    assert_eq!(lit(&engine, a), CellMask::empty());
    assert!(engine.timers().is_empty());
}
