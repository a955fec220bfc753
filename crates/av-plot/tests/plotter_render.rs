use av_core::{FieldId, FieldSpec};
use av_dataset::{Axis, Dataset, MemorySnapshot, OpenOptions, ParticleInfo, SnapshotMeta};
use av_params::{PlotConfig, PlotParams};
use av_plot::{
    Annotation, PlaneSelection, PlotError, PlotKind, PlotRequest, Plotter, RenderError, RenderPlan,
    Renderer, ResolvedPlot, VolumeScene,
};
use std::sync::{Arc, Mutex};

/// Records every plan it is asked to draw; optionally rejects the first label.
#[derive(Default)]
struct RecordingRenderer {
    plots: Mutex<Vec<ResolvedPlot>>,
    volumes: Mutex<Vec<VolumeScene>>,
    reject_labels: bool,
}

impl Renderer for RecordingRenderer {
    fn render_plot(&self, _dataset: &Dataset, plot: &ResolvedPlot) -> Result<Vec<u8>, RenderError> {
        let mut plots = self.plots.lock().unwrap();
        plots.push(plot.clone());
        let label = plot.colorbar.as_ref().and_then(|c| c.label.clone());
        if self.reject_labels && plots.len() == 1 {
            return Err(RenderError::UnitLabel {
                label: label.unwrap_or_default(),
            });
        }
        Ok(b"\x89PNG".to_vec())
    }

    fn render_volume(&self, _dataset: &Dataset, scene: &VolumeScene) -> Result<Vec<u8>, RenderError> {
        self.volumes.lock().unwrap().push(scene.clone());
        Ok(b"\x89PNG".to_vec())
    }
}

fn snapshot() -> MemorySnapshot {
    let meta = SnapshotMeta {
        domain_dimensions: [2, 2, 2],
        domain_left_edge: [0.0, 0.0, 0.0],
        domain_right_edge: [1.0, 2.0, 1.0],
        current_time: 1.5e13,
        max_level: 2,
        length_unit_cm: 1.0,
        fields: vec![
            FieldId::gas("density"),
            FieldId::gas("total_energy_density"),
            FieldId::gas("velocity_x"),
            FieldId::gas("velocity_y"),
            FieldId::gas("velocity_z"),
        ],
        particles: vec![
            ParticleInfo {
                name: "Sink_particles".into(),
                count: 2,
            },
            ParticleInfo {
                name: "Rad_particles".into(),
                count: 0,
            },
            ParticleInfo {
                name: "CIC_particles".into(),
                count: 4,
            },
        ],
    };
    MemorySnapshot::new("plt00100", meta)
        .with_cells(FieldId::gas("density"), vec![1.0, 2.0, 4.0, 8.0])
        .with_particles("Sink_particles", vec![[0.5, 1.0, 0.5], [0.2, 0.2, 0.2]])
}

fn plotter(reject_labels: bool) -> (Plotter<Arc<RecordingRenderer>>, Arc<RecordingRenderer>) {
    let dataset = Dataset::new(snapshot(), OpenOptions::default()).unwrap();
    let renderer = Arc::new(RecordingRenderer {
        reject_labels,
        ..RecordingRenderer::default()
    });
    let plotter = Plotter::new(Arc::new(dataset), PlotConfig::default(), renderer.clone());
    (plotter, renderer)
}

#[test]
fn slice_defaults_to_domain_centre() {
    let (plotter, renderer) = plotter(false);
    let bytes = plotter.slice("density", Axis::Y, None, None).unwrap();
    assert_eq!(bytes, b"\x89PNG");

    let plots = renderer.plots.lock().unwrap();
    let plot = &plots[0];
    assert_eq!(plot.selection, PlaneSelection::Slice { coord: 1.0 });
    assert_eq!(plot.field, FieldId::gas("density"));
    assert_eq!(plot.center, [0.5, 1.0, 0.5]);
    // Viewing down y: horizontal z, vertical x, both of width 1.
    assert_eq!(plot.figure.aspect, 1.0);
    assert!((plot.figure.size_inches - 5.4).abs() < 1e-9);
}

#[test]
fn annotations_in_drawing_order() {
    let (plotter, renderer) = plotter(false);
    let mut params = PlotParams::default().with_scale_bar(true, Some(0.1), Some("pc"));
    params.particles.types = vec![
        "Sink_particles".into(),
        "Rad_particles".into(),
        "CIC_particles".into(),
        "StochasticStellarPop_particles".into(),
    ];
    params.annotations.show_grids = true;
    params.annotations.show_timestamp = true;
    params.annotations.top_left_text = Some("run A".into());
    params.annotations.top_right_text = Some("t = 1 Myr".into());

    plotter.slice("density", Axis::Z, Some(0.5), Some(params)).unwrap();

    let plots = renderer.plots.lock().unwrap();
    let kinds: Vec<&str> = plots[0]
        .annotations
        .iter()
        .map(|a| match a {
            Annotation::Particles { .. } => "particles",
            Annotation::Grids { .. } => "grids",
            Annotation::Timestamp { .. } => "timestamp",
            Annotation::ScaleBar(_) => "scale_bar",
            Annotation::Text { .. } => "text",
        })
        .collect();
    // Rad has no particles, CIC has no positions, the stellar type is unknown.
    assert_eq!(
        kinds,
        vec!["particles", "grids", "timestamp", "scale_bar", "text", "text"]
    );

    match &plots[0].annotations[0] {
        Annotation::Particles { ptype, depth, .. } => {
            assert_eq!(ptype, "Sink_particles");
            assert!((depth - 0.1).abs() < 1e-12);
        }
        other => panic!("unexpected annotation {other:?}"),
    }
}

#[test]
fn rejected_label_is_retried_once_with_field_name() {
    let (plotter, renderer) = plotter(true);
    let params = PlotParams::default().with_colorbar(
        true,
        Some("$\\rho$ [g cm$^{-3}$"),
        Default::default(),
    );
    plotter.slice("density", Axis::Z, None, Some(params)).unwrap();

    let plots = renderer.plots.lock().unwrap();
    assert_eq!(plots.len(), 2);
    let label = plots[1].colorbar.as_ref().and_then(|c| c.label.as_deref());
    assert_eq!(label, Some("density"));
}

#[test]
fn projection_weight_shortcuts() {
    let (plotter, renderer) = plotter(false);
    plotter
        .project("density", Axis::X, Some(FieldSpec::from("None")), None)
        .unwrap();
    plotter
        .project("density", Axis::X, Some(FieldSpec::from("density")), None)
        .unwrap();

    let plots = renderer.plots.lock().unwrap();
    assert_eq!(plots[0].selection, PlaneSelection::Projection { weight: None });
    assert_eq!(
        plots[1].selection,
        PlaneSelection::Projection {
            weight: Some(FieldId::gas("density"))
        }
    );
}

#[test]
fn volume_uses_data_bounds_and_perspective() {
    let (plotter, renderer) = plotter(false);
    plotter.volume(("gas", "density"), None).unwrap();

    let volumes = renderer.volumes.lock().unwrap();
    let scene = &volumes[0];
    assert_eq!(scene.transfer.bounds.data, [1.0, 8.0]);
    assert_eq!(scene.transfer.layers.len(), 5);
    assert!(scene.camera.position.is_some());
    assert_eq!(scene.camera.resolution, [2160, 2160]);
}

#[test]
fn oversized_layer_count_is_rejected_before_rendering() {
    let (plotter, renderer) = plotter(false);
    let mut params = PlotParams::default();
    params.volume.n_layers = u32::MAX;

    let err = plotter.volume("density", Some(params)).unwrap_err();
    assert!(matches!(err, PlotError::InvalidParams(_)));
    assert!(renderer.volumes.lock().unwrap().is_empty());
}

#[test]
fn derived_fields_are_listed_and_evaluable() {
    let (plotter, _) = plotter(false);
    let fields = plotter.available_fields();
    assert!(fields.contains(&FieldId::gas("number_density")));
    assert!(fields.contains(&FieldId::gas("velocity_magnitude")));
    assert!(fields.contains(&FieldId::gas("temperature")));

    let info = plotter.field_info("density").unwrap();
    assert_eq!((info.min, info.max), (1.0, 8.0));
}

#[test]
fn errors_surface_before_rendering() {
    let (plotter, renderer) = plotter(false);

    let err = plotter.slice("gas:", Axis::Z, None, None).unwrap_err();
    assert!(matches!(err, PlotError::InvalidFieldSpec { .. }));

    let err = plotter.slice("pressure", Axis::Z, None, None).unwrap_err();
    assert!(matches!(err, PlotError::Dataset(_)));

    let params = PlotParams {
        vmin: Some(0.0),
        vmax: Some(10.0),
        ..PlotParams::default()
    };
    let err = plotter.volume("density", Some(params)).unwrap_err();
    assert!(matches!(err, PlotError::InvalidRange { .. }));

    assert!(matches!(
        "histogram".parse::<PlotKind>(),
        Err(PlotError::UnknownPlotKind { .. })
    ));
    assert!(renderer.plots.lock().unwrap().is_empty());
    assert!(renderer.volumes.lock().unwrap().is_empty());
}

#[test]
fn planning_is_repeatable() {
    let (plotter, _) = plotter(false);
    let request = PlotRequest::slice(Axis::Z, "density")
        .with_params(PlotParams::default().with_width(0.5, "code_length"));
    let first = plotter.plan(&request).unwrap();
    let second = plotter.plan(&request).unwrap();
    assert_eq!(first, second);
    match first {
        RenderPlan::Plot(plot) => assert!(plot.figure.is_squared),
        RenderPlan::Volume(_) => panic!("expected a 2D plan"),
    }
}

#[test]
fn missing_snapshot_is_not_found() {
    let path = std::env::temp_dir().join("amrviz_no_such_plt.yaml");
    let err = Plotter::open(&path, PlotConfig::default(), RecordingRenderer::default()).err();
    assert!(matches!(err, Some(PlotError::DatasetNotFound { .. })));
}

#[test]
fn render_to_path_writes_bytes() {
    let (plotter, _) = plotter(false);
    let path = std::env::temp_dir().join("amrviz_render_to_path_test.png");
    let written = plotter
        .render_to_path(&PlotRequest::slice(Axis::Z, "density"), &path)
        .unwrap();
    assert_eq!(written, path);
    assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn plans_serialise_for_inspection() {
    let (plotter, _) = plotter(false);
    let plan = plotter
        .plan(&PlotRequest::volume("density"))
        .unwrap();
    let yaml = serde_yaml::to_string(&plan).unwrap();
    assert!(yaml.contains("density"));
    assert!(yaml.contains("sigma_clip: 3.5"));
}
