//! End-to-end tests for `lazyqr config` commands.

use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

// Mutex to ensure config tests that modify state don't run in parallel
static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

// ============================================================================
// Show Command Tests
// ============================================================================

#[test]
fn test_config_show_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run(&["config", "show"], temp_dir.path());

    assert_exit(&output, 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LazyQR Configuration"));
    assert!(stdout.contains("Size: 300x300"));
    assert!(stdout.contains("Type: extra-rounded"));
    assert!(stdout.contains("Color modes: dots=gradient"));
}

#[test]
fn test_config_show_json_schema() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let state = show_state(temp_dir.path());

    let config = &state["config"];
    assert_eq!(config["width"], 300);
    assert_eq!(config["height"], 300);
    assert_eq!(config["errorCorrectionLevel"], "H");
    assert_eq!(config["dotsOptions"]["type"], "extra-rounded");
    assert_eq!(config["dotsOptions"]["gradient"]["type"], "linear");
    assert_eq!(config["cornersSquareOptions"]["color"], "#000000");
    assert_eq!(config["backgroundOptions"]["color"], "#ffffff");

    let preferences = &state["preferences"];
    assert_eq!(preferences["downloadFormat"], "png");
    assert_eq!(preferences["gradientType"], "radial");
    assert_eq!(preferences["colorModes"]["dots"], "gradient");
    assert_eq!(preferences["colorModes"]["background"], "single");
    assert_eq!(preferences["activeAccordion"], "");
}

#[test]
fn test_config_show_does_not_write_storage() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join("store");

    assert_exit(&run(&["config", "show"], &config_dir), 0);
    assert!(!config_dir.exists());
}

#[test]
fn test_config_corrupt_storage_falls_back_to_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("qr-style-config.json"), "{ broken").unwrap();
    fs::write(temp_dir.path().join("qr-download-format.json"), "\"gif\"").unwrap();

    let state = show_state(temp_dir.path());
    assert_eq!(state["config"]["width"], 300);
    assert_eq!(state["preferences"]["downloadFormat"], "png");
}

#[test]
fn test_config_legacy_color_mode_string() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("qr-color-type.json"), "\"single\"").unwrap();

    let state = show_state(temp_dir.path());
    assert_eq!(state["preferences"]["colorModes"]["dots"], "single");
    assert_eq!(state["preferences"]["colorModes"]["background"], "single");
}

// ============================================================================
// Set Command Tests
// ============================================================================

#[test]
fn test_config_set_size_and_shapes() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run(
        &[
            "config",
            "set",
            "--size",
            "512",
            "--dot-type",
            "dots",
            "--corner-square-type",
            "square",
            "--corner-dot-type",
            "none",
        ],
        temp_dir.path(),
    );
    assert_exit(&output, 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration updated successfully."));

    let state = show_state(temp_dir.path());
    let config = &state["config"];
    assert_eq!(config["width"], 512);
    assert_eq!(config["height"], 512);
    assert_eq!(config["dotsOptions"]["type"], "dots");
    assert_eq!(config["cornersSquareOptions"]["type"], "square");
    assert_eq!(config["cornersDotOptions"]["type"], "none");
    // Untouched fields survive.
    assert_eq!(config["cornersSquareOptions"]["color"], "#000000");
}

#[test]
fn test_config_set_out_of_range_size_is_rejected() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run(&["config", "set", "--width", "50"], temp_dir.path());
    assert_exit(&output, 1);

    let state = show_state(temp_dir.path());
    assert_eq!(state["config"]["width"], 300);
}

#[test]
fn test_config_set_invalid_color_is_rejected() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run(&["config", "set", "--background", "blue-ish"], temp_dir.path());
    assert_exit(&output, 1);

    let state = show_state(temp_dir.path());
    assert_eq!(state["config"]["backgroundOptions"]["color"], "#ffffff");
}

#[test]
fn test_config_set_invalid_enum_applies_nothing() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run(
        &["config", "set", "--size", "400", "--dot-type", "stars"],
        temp_dir.path(),
    );
    assert_exit(&output, 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid dot type 'stars'"));

    let state = show_state(temp_dir.path());
    assert_eq!(state["config"]["width"], 300);
}

#[test]
fn test_config_set_requires_an_option() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run(&["config", "set"], temp_dir.path());
    assert_exit(&output, 1);
}

#[test]
fn test_config_set_color_mode_round_trip() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    assert_exit(
        &run(
            &["config", "set", "--color-mode", "single", "--dot-color", "#123456"],
            temp_dir.path(),
        ),
        0,
    );
    let state = show_state(temp_dir.path());
    assert!(state["config"]["dotsOptions"].get("gradient").is_none());
    assert_eq!(state["preferences"]["colorModes"]["dots"], "single");

    assert_exit(
        &run(&["config", "set", "--color-mode", "gradient"], temp_dir.path()),
        0,
    );
    let state = show_state(temp_dir.path());
    let gradient = &state["config"]["dotsOptions"]["gradient"];
    assert_eq!(gradient["type"], "radial");
    assert_eq!(gradient["rotation"], 0.0);
    assert_eq!(gradient["colorStops"][0]["color"], "#123456");
    assert_eq!(gradient["colorStops"][1]["color"], "#90EE90");
    assert_eq!(state["preferences"]["colorModes"]["dots"], "gradient");
}

#[test]
fn test_config_set_section_gradient() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run(
        &[
            "config",
            "set",
            "--color-mode",
            "gradient",
            "--section",
            "background",
        ],
        temp_dir.path(),
    );
    assert_exit(&output, 0);

    let state = show_state(temp_dir.path());
    let gradient = &state["config"]["backgroundOptions"]["gradient"];
    assert_eq!(gradient["colorStops"][0]["color"], "#ffffff");
    assert_eq!(state["preferences"]["colorModes"]["background"], "gradient");
}

#[test]
fn test_config_set_gradient_stops_and_rotation() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run(
        &[
            "config",
            "set",
            "--gradient-start",
            "#000000",
            "--gradient-end",
            "#ff0000",
            "--gradient-rotation",
            "45",
            "--gradient-type",
            "radial",
        ],
        temp_dir.path(),
    );
    assert_exit(&output, 0);

    let state = show_state(temp_dir.path());
    let gradient = &state["config"]["dotsOptions"]["gradient"];
    assert_eq!(gradient["type"], "radial");
    assert_eq!(gradient["rotation"], 45.0);
    assert_eq!(gradient["colorStops"][0]["color"], "#000000");
    assert_eq!(gradient["colorStops"][1]["color"], "#ff0000");
}

#[test]
fn test_config_set_error_correction_and_preferences() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run(
        &[
            "config",
            "set",
            "--error-correction",
            "q",
            "--download-format",
            "svg",
            "--accordion",
            "dots",
        ],
        temp_dir.path(),
    );
    assert_exit(&output, 0);

    let state = show_state(temp_dir.path());
    assert_eq!(state["config"]["errorCorrectionLevel"], "Q");
    assert_eq!(state["preferences"]["errorCorrectionLevel"], "Q");
    assert_eq!(state["preferences"]["downloadFormat"], "svg");
    assert_eq!(state["preferences"]["activeAccordion"], "dots");
}

#[test]
fn test_config_set_logo_and_frame() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run(
        &[
            "config",
            "set",
            "--logo",
            "https://example.com/logo.png",
            "--frame",
            "circle",
            "--frame-label",
            "Scan me",
        ],
        temp_dir.path(),
    );
    assert_exit(&output, 0);

    let state = show_state(temp_dir.path());
    assert_eq!(state["config"]["image"], "https://example.com/logo.png");
    assert_eq!(state["config"]["frame"]["style"], "circle");
    assert_eq!(state["config"]["frame"]["label"], "Scan me");
    assert_eq!(state["config"]["frame"]["labelColor"], "#000000");

    assert_exit(&run(&["config", "set", "--clear-logo"], temp_dir.path()), 0);
    let state = show_state(temp_dir.path());
    assert!(state["config"].get("image").is_none());

    let output = run(&["config", "set", "--logo", "file:///etc/passwd"], temp_dir.path());
    assert_exit(&output, 1);
}

// ============================================================================
// Reset, Export and Import
// ============================================================================

#[test]
fn test_config_reset() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    assert_exit(
        &run(
            &["config", "set", "--size", "1024", "--download-format", "webp"],
            temp_dir.path(),
        ),
        0,
    );
    assert_exit(&run(&["config", "reset"], temp_dir.path()), 0);

    let state = show_state(temp_dir.path());
    assert_eq!(state["config"]["width"], 300);
    assert_eq!(state["preferences"]["downloadFormat"], "png");
    assert!(temp_dir.path().join("qr-style-config.json").exists());
}

#[test]
fn test_config_export_then_import() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let source = TempDir::new().expect("Failed to create temp dir");
    let target = TempDir::new().expect("Failed to create temp dir");
    let export_dir = TempDir::new().expect("Failed to create temp dir");

    assert_exit(
        &run(
            &["config", "set", "--size", "640", "--color-mode", "single"],
            source.path(),
        ),
        0,
    );

    let output = run(
        &[
            "config",
            "export",
            "--dir",
            export_dir.path().to_str().unwrap(),
        ],
        source.path(),
    );
    assert_exit(&output, 0);
    let exported = export_dir.path().join("qr-config.json");
    assert_eq!(stdout_line(&output), exported.display().to_string());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&exported).unwrap()).unwrap();
    assert_eq!(json["width"], 640);

    let output = run(
        &["config", "import", exported.to_str().unwrap()],
        target.path(),
    );
    assert_exit(&output, 0);

    let state = show_state(target.path());
    assert_eq!(state["config"], show_state(source.path())["config"]);
    assert_eq!(state["preferences"]["colorModes"]["dots"], "single");
}

#[test]
fn test_config_import_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.json");

    let output = run(&["config", "import", missing.to_str().unwrap()], temp_dir.path());
    assert_exit(&output, 2);
}

#[test]
fn test_config_import_invalid_content_keeps_state() {
    let _lock = CONFIG_TEST_LOCK.lock().unwrap();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file = temp_dir.path().join("bad.json");
    fs::write(&file, r#"{"width": 10}"#).unwrap();

    let store_dir = temp_dir.path().join("store");
    let output = run(&["config", "import", file.to_str().unwrap()], &store_dir);
    assert_exit(&output, 1);

    let state = show_state(&store_dir);
    assert_eq!(state["config"]["width"], 300);
}
