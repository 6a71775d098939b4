//! End-to-end use through the public facade.

use std::time::Duration;

use pixelgrid::prelude::*;
use pixelgrid::{CELL_COUNT, CellMask};

#[test]
fn create_play_and_destroy_through_the_prelude() {
    let mut grids: PixelGrid<MemorySurface> =
        PixelGrid::with_config(EngineConfig::default());
    let id = grids.create(
        MemorySurface::new(),
        CreateOptions::new().animation("cross").bloom(4.0_f32),
    );

    grids.advance(Duration::from_millis(300));
    let inst = grids.get_instance(id).unwrap();
    assert_eq!(inst.config().name(), "cross");
    assert_eq!(inst.lit_cells(), CellMask::all());

    let destroyed = grids.destroy_all();
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].1.child_count(), 0);
    assert!(grids.get_instance(id).is_none());
}

#[test]
fn free_functions_expose_the_builtin_catalog() {
    let names = pixelgrid::animation_names();
    assert_eq!(names.len(), 24);
    for name in &names {
        assert!(pixelgrid::animation(name).is_some(), "{name}");
    }
    let prism = pixelgrid::animation("prism").unwrap();
    assert!(prism.is_multicolor());
    assert_eq!(prism.delays().len(), CELL_COUNT);
}

#[cfg(feature = "serde")]
mod catalog_files {
    use std::io::Write;
    use std::sync::Arc;

    use pixelgrid::prelude::*;
    use pixelgrid::{CatalogError, PresetError};

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_custom_catalog() {
        let file = write_temp(
            r##"[
                {"name": "blink", "delays": [0,0,0,0,0,0,0,0,0], "duration": 100},
                {"name": "accent", "delays": [0,10,20,30,40,50,60,70,80], "duration": 50, "color": "#0af"}
            ]"##,
        );
        let catalog = pixelgrid::load_catalog(file.path()).unwrap();
        assert_eq!(catalog.names(), vec!["blink", "accent"]);
        assert!(catalog.get("accent").unwrap().accent().is_some());

        let mut grids: PixelGrid<MemorySurface> =
            PixelGrid::with_config(EngineConfig::default()).with_catalog(Arc::new(catalog));
        let id = grids.create(MemorySurface::new(), CreateOptions::new().animation("blink"));
        assert_eq!(grids.get_instance(id).unwrap().config().name(), "blink");
    }

    #[test]
    fn rejects_a_short_delay_list() {
        let file = write_temp(r#"[{"name": "short", "delays": [0, 1, 2], "duration": 10}]"#);
        match pixelgrid::load_catalog(file.path()) {
            Err(Error::Catalog(CatalogError::Preset { index: 0, error })) => {
                assert_eq!(error, PresetError::DelayCount { found: 3 });
            }
            other => panic!("expected delay-count error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = pixelgrid::load_catalog(dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
