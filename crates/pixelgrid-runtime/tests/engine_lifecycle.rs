//! Create / configure / destroy behavior of the engine registry.

use std::time::Duration;

use pixelgrid_core::color::PROP_ON;
use pixelgrid_core::glow::filter_reference;
use pixelgrid_core::surface::{CELL_CLASS, CONTAINER_CLASS, FILTER_PROPERTY};
use pixelgrid_core::{
    Bloom, CELL_COUNT, Catalog, CreateOptions, DEFAULT_GLOW_AMOUNT, MemorySurface, Preset,
    Surface,
};
use pixelgrid_runtime::{Engine, EngineConfig, Marker, Phase, BLOOM_ATTRIBUTE};
use pretty_assertions::assert_eq;

fn engine() -> Engine<MemorySurface> {
    Engine::with_config(EngineConfig::default())
}

fn cluttered_container() -> MemorySurface {
    let mut surface = MemorySurface::new();
    surface.append_child("leftover");
    surface.append_child("leftover");
    surface
}

#[test]
fn create_replaces_existing_content_with_nine_cells() {
    let mut engine = engine();
    let id = engine.create(cluttered_container(), CreateOptions::default());
    let inst = engine.get_instance(id).unwrap();
    assert_eq!(inst.container().child_count(), CELL_COUNT);
    assert_eq!(inst.container().cell_count(), CELL_COUNT);
    assert_eq!(inst.config().name(), "wave-lr");
    assert!(inst.is_running());
}

#[test]
fn autoplay_false_leaves_instance_idle() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().autoplay(false));
    let inst = engine.get_instance(id).unwrap();
    assert!(!inst.is_running());
    assert_eq!(inst.phase(), Phase::Idle);
    assert_eq!(inst.pending_timers(), 0);
    assert!(engine.timers().is_empty());
}

#[test]
fn unknown_animation_name_falls_back_to_default() {
    let mut engine = engine();
    let id = engine.create(
        MemorySurface::new(),
        CreateOptions::new().animation("does-not-exist"),
    );
    assert_eq!(engine.get_instance(id).unwrap().config().name(), "wave-lr");
}

#[test]
fn inline_preset_is_used_as_is() {
    let mut engine = engine();
    let preset = Preset::new("custom", &[10; CELL_COUNT], 30).unwrap();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().animation(preset));
    let inst = engine.get_instance(id).unwrap();
    assert_eq!(inst.config().name(), "custom");
    assert_eq!(inst.config().hold_time(), Duration::from_millis(40));
}

#[test]
fn cross_with_bloom_round_trip() {
    let mut engine = engine();
    let id = engine.create(
        MemorySurface::new(),
        CreateOptions::new().animation("cross").bloom(4.0_f32),
    );

    let inst = engine.get_instance(id).unwrap();
    assert_eq!(inst.config().name(), "cross");
    assert!(inst.bloom().is_enabled());
    assert_eq!(inst.bloom().amount(), 4.0);
    let root = inst.container().root();
    assert_eq!(
        inst.container().property(&root, FILTER_PROPERTY),
        Some(filter_reference(id))
    );
    assert_eq!(engine.glow().get(id).map(|f| f.amount()), Some(4.0));

    let container = engine.destroy(id).unwrap();
    assert!(engine.get_instance(id).is_none());
    assert_eq!(container.child_count(), 0);
    assert_eq!(container.property(&container.root(), FILTER_PROPERTY), None);
    assert!(!engine.glow().references(id));
    assert!(engine.timers().is_empty());
}

#[test]
fn set_bloom_replaces_then_removes_the_filter() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::default());
    assert!(!engine.glow().is_initialized());

    {
        let mut handle = engine.instance_mut(id).unwrap();
        handle.set_bloom(true);
        assert_eq!(handle.bloom().amount(), DEFAULT_GLOW_AMOUNT);
        handle.set_bloom(7.0_f32);
        assert_eq!(handle.bloom().amount(), 7.0);
    }
    assert_eq!(engine.glow().len(), 1);
    assert_eq!(engine.glow().get(id).map(|f| f.amount()), Some(7.0));

    engine.instance_mut(id).unwrap().set_bloom(Bloom::Off);
    let inst = engine.get_instance(id).unwrap();
    assert!(!inst.bloom().is_enabled());
    assert_eq!(
        inst.container().property(&inst.container().root(), FILTER_PROPERTY),
        None
    );
    assert!(engine.glow().is_initialized());
    assert!(engine.glow().is_empty());
}

#[test]
fn disabling_bloom_then_destroying_leaves_no_glow() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().bloom(true));
    engine.instance_mut(id).unwrap().set_bloom(false);
    engine.destroy(id);
    assert!(!engine.glow().references(id));
    assert!(engine.is_empty());
}

#[test]
fn zero_bloom_on_create_means_no_glow() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().bloom(0.0_f32));
    assert!(!engine.get_instance(id).unwrap().bloom().is_enabled());
    assert!(!engine.glow().is_initialized());
}

#[test]
fn destroy_clears_container_accent() {
    let mut engine = engine();
    let preset = Preset::builder("hex")
        .delays([0; CELL_COUNT])
        .duration_ms(10)
        .accent("#ff8800")
        .build()
        .unwrap();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().animation(preset));
    let root = engine.get_instance(id).unwrap().container().root();
    assert!(
        engine
            .get_instance(id)
            .unwrap()
            .container()
            .property(&root, PROP_ON)
            .is_some()
    );

    let container = engine.destroy(id).unwrap();
    assert_eq!(container.property(&root, PROP_ON), None);
}

#[test]
fn destroy_leaves_host_marked_container_class_in_place() {
    let mut engine = engine();
    let mut host = cluttered_container();
    let root = host.root();
    host.add_class(&root, CONTAINER_CLASS);
    host.add_class(&root, "sidebar");

    let id = engine.create(host, CreateOptions::new().animation("cross").bloom(true));
    engine.advance(Duration::from_millis(300));
    let container = engine.destroy(id).unwrap();

    assert!(container.has_class(&root, CONTAINER_CLASS));
    assert!(container.has_class(&root, "sidebar"));
    assert_eq!(container.cell_count(), 0);
    assert_eq!(container.property(&root, FILTER_PROPERTY), None);
}

#[test]
fn destroy_removes_container_class_it_added() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::default());
    let root = engine.get_instance(id).unwrap().container().root();
    assert!(engine.get_instance(id).unwrap().container().has_class(&root, CONTAINER_CLASS));

    let container = engine.destroy(id).unwrap();
    assert!(!container.has_class(&root, CONTAINER_CLASS));
}

#[test]
fn destroy_twice_is_harmless() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::default());
    assert!(engine.destroy(id).is_some());
    assert!(engine.destroy(id).is_none());
    assert!(engine.instance_mut(id).is_none());
}

#[test]
fn destroy_all_empties_registry_in_id_order() {
    let mut engine = engine();
    let ids: Vec<_> = (0..3)
        .map(|_| engine.create(MemorySurface::new(), CreateOptions::new().bloom(true)))
        .collect();
    let destroyed: Vec<_> = engine.destroy_all().into_iter().map(|(id, _)| id).collect();
    assert_eq!(destroyed, ids);
    assert!(engine.is_empty());
    assert!(engine.glow().is_empty());
    assert!(engine.timers().is_empty());
}

#[test]
fn set_animation_retints_cells() {
    let mut engine = engine();
    let id = engine.create(MemorySurface::new(), CreateOptions::new().animation("prism"));
    let first = engine.get_instance(id).unwrap().cells()[0];
    assert!(
        engine
            .get_instance(id)
            .unwrap()
            .container()
            .has_class(&first, "pixel-grid__cell--red")
    );

    engine.instance_mut(id).unwrap().set_animation("wave-lr");
    let inst = engine.get_instance(id).unwrap();
    let classes: Vec<&str> = inst.container().classes(&first).collect();
    assert_eq!(classes, vec![CELL_CLASS]);
}

#[test]
fn custom_catalog_supplies_names() {
    let mut catalog = Catalog::empty();
    catalog
        .register(Preset::new("blink", &[0; CELL_COUNT], 100).unwrap())
        .unwrap();
    let mut engine: Engine<MemorySurface> =
        Engine::with_config(EngineConfig::default()).with_catalog(catalog.into());
    assert_eq!(engine.animation_names(), vec!["blink"]);
    assert!(engine.animation("wave-lr").is_none());

    let id = engine.create(MemorySurface::new(), CreateOptions::new().animation("blink"));
    assert_eq!(engine.get_instance(id).unwrap().config().name(), "blink");
}

#[test]
fn builtin_names_are_exposed() {
    let engine = engine();
    let names = engine.animation_names();
    assert_eq!(names.len(), 24);
    assert_eq!(names[0], "wave-lr");
    assert!(names.contains(&"neon-cross"));
    assert_eq!(
        engine.animation("snake").map(|p| p.duration()),
        Some(Duration::from_millis(160))
    );
}

#[test]
fn init_all_creates_one_instance_per_enabled_marker() {
    let mut engine = engine();
    let mut markers = vec![
        Marker::enabled(MemorySurface::new()),
        Marker::new(MemorySurface::new()),
        Marker::enabled(MemorySurface::new())
            .with_attribute("data-pixel-grid-animation", "snake")
            .with_attribute(BLOOM_ATTRIBUTE, "3"),
    ];
    let ids = engine.init_all(&mut markers);
    assert_eq!(ids.len(), 2);
    assert_eq!(markers.len(), 1);

    let second = engine.get_instance(ids[1]).unwrap();
    assert_eq!(second.config().name(), "snake");
    assert_eq!(second.bloom().amount(), 3.0);
    assert!(second.is_running());

    assert!(engine.init_all(&mut markers).is_empty());
}
