use prpd_config::{
    ChartDefinition, DefinitionError, DisplayRange, EngineSettings, MaxFrequencyMode, PhaseAxis,
    SettingsError,
};

fn sample_definition() -> ChartDefinition {
    ChartDefinition {
        name: "bushing".to_string(),
        description: "phase B".to_string(),
        phase_axis: PhaseAxis {
            phase_min: 0.0,
            phase_max: 360.0,
            point_count: 128,
        },
        engine: EngineSettings {
            max_cycles: 50,
            amplitude_bins: 64,
            max_frequency_mode: MaxFrequencyMode::Exact,
            ..EngineSettings::default()
        },
        display_range: DisplayRange::new(-80.0, -20.0),
    }
}

#[test]
fn defaults_match_chart_constants() {
    let definition = ChartDefinition::default();
    assert_eq!(definition.phase_axis.point_count, 200);
    assert_eq!(definition.phase_axis.phase_min, 0.0);
    assert_eq!(definition.phase_axis.phase_max, 360.0);
    assert_eq!(definition.engine.max_cycles, 100);
    assert_eq!(definition.engine.amplitude_bins, 100);
    assert_eq!(definition.engine.reconcile_interval, 10);
    assert_eq!(definition.engine.max_frequency_mode, MaxFrequencyMode::Periodic);
    assert!(definition.validate().is_ok());
}

#[test]
fn save_and_load_json_definition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.json");
    let definition = sample_definition();

    definition.save_to_file(&path).unwrap();
    let loaded = ChartDefinition::load_from_file(&path).unwrap();
    assert_eq!(loaded, definition);
}

#[test]
fn save_and_load_toml_definition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.toml");
    let definition = sample_definition();

    definition.save_to_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[phase_axis]"));

    let loaded = ChartDefinition::load_from_file(&path).unwrap();
    assert_eq!(loaded, definition);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("minimal.json");
    std::fs::write(&path, r#"{"name": "minimal"}"#).unwrap();

    let loaded = ChartDefinition::load_from_file(&path).unwrap();
    assert_eq!(loaded.name, "minimal");
    assert_eq!(loaded.phase_axis, PhaseAxis::default());
    assert_eq!(loaded.engine, EngineSettings::default());
    assert_eq!(loaded.display_range, DisplayRange::default());
}

#[test]
fn invalid_definition_is_rejected_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"name": "broken", "engine": {"max_cycles": 0, "amplitude_bins": 10}}"#,
    )
    .unwrap();

    let err = ChartDefinition::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::Invalid(SettingsError::NoCycles)
    ));
}

#[test]
fn unknown_extension_is_written_as_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.prpd");
    let definition = sample_definition();

    definition.save_to_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
    assert_eq!(ChartDefinition::load_from_file(&path).unwrap(), definition);
}

#[test]
fn toml_with_invalid_utf8_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.toml");
    let mut data = b"name = \"".to_vec();
    data.extend_from_slice(&[0xff, 0xfe]);
    data.extend_from_slice(b"\"\n");
    std::fs::write(&path, data).unwrap();

    let err = ChartDefinition::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DefinitionError::Io(_)), "{err:?}");
}

#[test]
fn nan_bounds_compare_equal_bitwise() {
    let a = DisplayRange::new(f64::NAN, -30.0);
    let b = a;
    assert_ne!(a, b);
    assert!(a.same_bounds(&b));
    assert!(!a.same_bounds(&DisplayRange::default()));
}

#[test]
fn settings_validation_rules() {
    let axis = PhaseAxis {
        point_count: 0,
        ..PhaseAxis::default()
    };
    assert_eq!(axis.validate(), Err(SettingsError::NoPhasePoints));

    let axis = PhaseAxis {
        phase_min: 90.0,
        phase_max: 90.0,
        point_count: 10,
    };
    assert!(matches!(
        axis.validate(),
        Err(SettingsError::EmptyPhaseSpan { .. })
    ));

    let engine = EngineSettings {
        amplitude_bins: 0,
        ..EngineSettings::default()
    };
    assert_eq!(engine.validate(), Err(SettingsError::NoAmplitudeBins));

    let engine = EngineSettings {
        reconcile_interval: 0,
        ..EngineSettings::default()
    };
    assert_eq!(engine.validate(), Err(SettingsError::NoReconcileInterval));

    let engine = EngineSettings {
        plot_width: -1.0,
        ..EngineSettings::default()
    };
    assert_eq!(engine.validate(), Err(SettingsError::InvalidPlotExtent));
}

#[test]
fn degenerate_range_is_allowed_but_nan_is_not() {
    let mut definition = ChartDefinition::default();
    definition.display_range = DisplayRange::new(-40.0, -40.0);
    assert!(definition.validate().is_ok());

    definition.display_range = DisplayRange::new(f64::NAN, -40.0);
    assert!(matches!(
        definition.validate(),
        Err(SettingsError::NonFiniteRange { .. })
    ));
}

#[test]
fn phase_at_spreads_points_over_the_cycle() {
    let axis = PhaseAxis::default();
    assert_eq!(axis.phase_at(0), 0.0);
    assert_eq!(axis.phase_at(100), 180.0);
    assert!((axis.phase_at(199) - 358.2).abs() < 1e-9);
}
