//! End-to-end tests for `lazyqr format`.

use tempfile::TempDir;

mod fixtures;
use fixtures::*;

fn format(args: &[&str]) -> std::process::Output {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut full = vec!["format"];
    full.extend_from_slice(args);
    run(&full, temp_dir.path())
}

// ============================================================================
// Simple kinds
// ============================================================================

#[test]
fn test_format_url() {
    let output = format(&["url", "https://example.com/a?b=c"]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "https://example.com/a?b=c");
}

#[test]
fn test_format_url_rejects_other_schemes() {
    let output = format(&["url", "ftp://example.com"]);
    assert_exit(&output, 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Please enter a valid URL"));
}

#[test]
fn test_format_text_verbatim() {
    let output = format(&["text", "Hello; world: 100%"]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "Hello; world: 100%");
}

#[test]
fn test_format_phone() {
    let output = format(&["phone", "+49 30-1234"]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "tel:+49 30-1234");

    let output = format(&["phone", "call me"]);
    assert_exit(&output, 1);
}

#[test]
fn test_format_location_keeps_numeric_text() {
    let output = format(&["location", "--latitude", "52.5200", "--longitude", "-13.40"]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "geo:52.5200,-13.40");
}

#[test]
fn test_format_location_out_of_range() {
    let output = format(&["location", "--latitude", "91", "--longitude", "0"]);
    assert_exit(&output, 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Latitude must be between"));
}

// ============================================================================
// Email
// ============================================================================

#[test]
fn test_format_email_subject_only() {
    let output = format(&["email", "--address", "a@b.com", "--subject", "Hi"]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "mailto:a@b.com?subject=Hi");
}

#[test]
fn test_format_email_encodes_components() {
    let output = format(&[
        "email",
        "--address",
        "a@b.com",
        "--subject",
        "Hello world",
        "--body",
        "Tom & Jerry",
    ]);
    assert_exit(&output, 0);
    assert_eq!(
        stdout_line(&output),
        "mailto:a@b.com?subject=Hello%20world&body=Tom%20%26%20Jerry"
    );
}

#[test]
fn test_format_email_body_only_uses_ampersand() {
    let output = format(&["email", "--address", "a@b.com", "--body", "x"]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "mailto:a@b.com&body=x");
}

#[test]
fn test_format_email_invalid_address() {
    let output = format(&["email", "--address", "not-an-address"]);
    assert_exit(&output, 1);
}

// ============================================================================
// Wi-Fi
// ============================================================================

#[test]
fn test_format_wifi_open_network_drops_password() {
    let output = format(&[
        "wifi",
        "--ssid",
        "Home",
        "--encryption",
        "nopass",
        "--password",
        "ignored",
    ]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "WIFI:T:nopass;S:Home;P:;;");
}

#[test]
fn test_format_wifi_escapes_special_characters() {
    let output = format(&["wifi", "--ssid", "Cafe; Guest", "--password", "p:w"]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), r"WIFI:T:WPA;S:Cafe\; Guest;P:p\:w;;");
}

#[test]
fn test_format_wifi_unknown_encryption() {
    let output = format(&["wifi", "--ssid", "Home", "--encryption", "WPA3-ENT"]);
    assert_exit(&output, 1);
}

// ============================================================================
// Calendar and contact
// ============================================================================

#[test]
fn test_format_calendar_converts_to_utc() {
    let output = format(&[
        "calendar",
        "--title",
        "Standup",
        "--start",
        "2024-03-15T10:00",
        "--end",
        "2024-03-15T10:15",
        "--location",
        "Room 1",
    ]);
    assert_exit(&output, 0);
    assert_eq!(
        stdout_line(&output),
        "BEGIN:VEVENT\nSUMMARY:Standup\nDTSTART:20240315T100000Z\nDTEND:20240315T101500Z\nLOCATION:Room 1\nEND:VEVENT"
    );
}

#[test]
fn test_format_calendar_timestamps_are_utc_basic() {
    let output = format(&["calendar", "--title", "Launch", "--start", "2025-12-31T23:59"]);
    assert_exit(&output, 0);

    let stdout = stdout_line(&output);
    let pattern = regex::Regex::new(r"(?m)^DTSTART:\d{8}T\d{6}Z$").unwrap();
    assert!(pattern.is_match(&stdout), "unexpected payload: {stdout}");
    assert!(stdout.contains("\nDTEND:\n"));
}

#[test]
fn test_format_calendar_requires_title() {
    let output = format(&["calendar", "--title", " ", "--start", "2024-03-15T10:00"]);
    assert_exit(&output, 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Please enter an event title"));
}

#[test]
fn test_format_vcard() {
    let output = format(&[
        "vcard",
        "--first-name",
        "Ada",
        "--last-name",
        "Lovelace",
        "--phone",
        "+44 20 0000",
        "--organization",
        "Analytical Engines",
    ]);
    assert_exit(&output, 0);
    assert_eq!(
        stdout_line(&output),
        "MECARD:N:Lovelace,Ada;TEL:+44 20 0000;NOTE:ORG:Analytical Engines\n;;"
    );
}

#[test]
fn test_format_vcard_requires_a_field() {
    let output = format(&["vcard"]);
    assert_exit(&output, 1);
}

// ============================================================================
// Raw JSON input
// ============================================================================

#[test]
fn test_format_json_email() {
    let output = format(&[
        "--json",
        "email",
        r#"{"address":"a@b.com","subject":"Hi","body":""}"#,
    ]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "mailto:a@b.com?subject=Hi");
}

#[test]
fn test_format_json_wifi() {
    let output = format(&[
        "--json",
        "wifi",
        r#"{"ssid":"Home","encryption":"nopass","password":""}"#,
    ]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "WIFI:T:nopass;S:Home;P:;;");
}

#[test]
fn test_format_json_unknown_kind_is_text() {
    let output = format(&["--json", "hologram", r#""plain words""#]);
    assert_exit(&output, 0);
    assert_eq!(stdout_line(&output), "plain words");
}

#[test]
fn test_format_json_invalid() {
    let output = format(&["--json", "email", "{not json"]);
    assert_exit(&output, 1);
}

#[test]
fn test_format_without_content() {
    let output = format(&[]);
    assert_exit(&output, 1);
}
