use std::path::PathBuf;

#[test]
fn demo_basins_validate() {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");

    let demos = [
        "demos/basins/01_single_stream.yaml",
        "demos/basins/02_tributary.yaml",
        "demos/basins/03_diversion.yaml",
    ];

    for rel in demos {
        let path = root.join(rel);
        let result = bc_project::load_yaml(&path);
        assert!(
            result.is_ok(),
            "demo failed validation: {} => {:?}",
            path.display(),
            result.err()
        );
    }
}

#[test]
fn diversion_demo_shape() {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let path = crate_dir.join("../../demos/basins/03_diversion.yaml");
    let file = bc_project::load_yaml(&path).unwrap();

    let basin = &file.basins[0];
    assert_eq!(basin.station_unit, bc_core::Unit::Kilometer);
    let ids: Vec<&str> = basin.streams().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["Main Stem", "North Fork", "Feeder Canal"]);

    let canal = basin.streams().nth(2).unwrap();
    assert!(canal.diverting_stream_id.as_ref().unwrap().matches("north fork"));
    assert_eq!(canal.diversion_station, Some(bc_core::Station::new(40.0)));
}
