use kiwidash::models::ServerSnapshot;
use kiwidash::utils::{format_bytes, format_timestamp, status_label, usage_percent};

#[test]
fn test_format_bytes_zero() {
    assert_eq!(format_bytes(0), "0 B");
}

#[test]
fn test_format_bytes_sub_kilobyte() {
    assert_eq!(format_bytes(512), "512 B");
}

#[test]
fn test_format_bytes_units() {
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(1536), "1.5 KB");
    assert_eq!(format_bytes(1073741824), "1.0 GB");
    assert_eq!(format_bytes(1024 * 1024 * 1024 * 1024), "1.0 TB");
}

#[test]
fn test_format_bytes_caps_at_terabytes() {
    let huge = 1024u64.pow(4) * 2048;
    assert_eq!(format_bytes(huge), "2048.0 TB");
}

#[test]
fn test_usage_percent_basic() {
    assert_eq!(usage_percent(50, 100), 50);
    assert_eq!(usage_percent(1, 3), 33);
}

#[test]
fn test_usage_percent_zero_total() {
    assert_eq!(usage_percent(10, 0), 0);
}

#[test]
fn test_usage_percent_clamps_overcommit() {
    assert_eq!(usage_percent(150, 100), 100);
}

#[test]
fn test_format_timestamp_epoch_and_invalid() {
    assert_eq!(format_timestamp(0), "—");
    assert_eq!(format_timestamp(-5), "—");
}

#[test]
fn test_format_timestamp_renders_utc() {
    assert_eq!(format_timestamp(1700000000), "2023-11-14 22:13 UTC");
}

#[test]
fn test_status_label_suspended_wins_over_status() {
    let snap = ServerSnapshot {
        ve_status: "running".into(),
        suspended: true,
        ..Default::default()
    };
    assert_eq!(status_label(&snap), "Suspended");
}

#[test]
fn test_status_label_known_states() {
    let mut snap = ServerSnapshot {
        ve_status: "running".into(),
        ..Default::default()
    };
    assert_eq!(status_label(&snap), "Running");
    snap.ve_status = "stopped".into();
    assert_eq!(status_label(&snap), "Stopped");
    snap.ve_status = String::new();
    assert_eq!(status_label(&snap), "Unknown");
}

#[test]
fn test_status_label_capitalizes_unknown_states() {
    let snap = ServerSnapshot {
        ve_status: "rebooting".into(),
        ..Default::default()
    };
    assert_eq!(status_label(&snap), "Rebooting");
}
