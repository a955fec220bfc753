use av_params::{ColorbarOrientation, ParamsError, load_params_json, load_params_yaml};

#[test]
fn load_yaml_parameter_file() {
    let path = std::env::temp_dir().join("amrviz_params_load.yaml");
    std::fs::write(
        &path,
        r#"
cmap: inferno
log_scale: false
vmin: 0.0
vmax: 5.0
colorbar:
  label: Speed
  orientation: bottom
width:
  value: 2.0
  unit: kpc
particles:
  types: [CIC_particles]
annotations:
  show_grids: true
  top_left_text: run A
"#,
    )
    .unwrap();

    let params = load_params_yaml(&path).unwrap();
    assert_eq!(params.cmap, "inferno");
    assert!(!params.log_scale);
    assert_eq!(params.colorbar.orientation, ColorbarOrientation::Bottom);
    assert_eq!(params.width.resolved(), Some((2.0, "kpc")));
    assert_eq!(params.particles.types, vec!["CIC_particles"]);
    assert_eq!(params.particles.color, "red");
    assert_eq!(params.annotations.top_left_text.as_deref(), Some("run A"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn load_json_parameter_file() {
    let path = std::env::temp_dir().join("amrviz_params_load.json");
    std::fs::write(&path, r#"{"dpi": 72, "volume": {"preview": true}}"#).unwrap();

    let params = load_params_json(&path).unwrap();
    assert_eq!(params.dpi, 72);
    assert!(params.volume.preview);
    assert!(params.volume.use_perspective);

    std::fs::remove_file(&path).ok();
}

#[test]
fn invalid_values_are_rejected_on_load() {
    let path = std::env::temp_dir().join("amrviz_params_invalid.yaml");
    std::fs::write(&path, "dpi: 0\n").unwrap();
    assert!(matches!(
        load_params_yaml(&path),
        Err(ParamsError::InvalidValue { field: "dpi", .. })
    ));
    std::fs::remove_file(&path).ok();
}
