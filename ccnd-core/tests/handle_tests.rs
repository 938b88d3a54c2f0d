//! DaemonHandle diagnostics and monitoring-descriptor behaviour.

use std::fs::{self, OpenOptions};

use ccnd_core::{DaemonHandle, LogBuffer, LoggerSink, MonitoringDescriptor};
use tempfile::TempDir;

fn handle_with_buffer() -> (DaemonHandle<()>, LogBuffer) {
    let buffer = LogBuffer::new();
    let handle = DaemonHandle::new("ccnd", LoggerSink::new(buffer.clone()), ());
    (handle, buffer)
}

// ---------------------------------------------------------------------------
// 1. msg
// ---------------------------------------------------------------------------

#[test]
fn msg_renders_timestamp_name_and_pid() {
    let (handle, buffer) = handle_with_buffer();
    handle.msg("exiting.");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    let line = &lines[0];

    let (stamp, rest) = line.split_once(' ').expect("timestamp prefix");
    let (secs, micros) = stamp.split_once('.').expect("secs.micros");
    assert!(secs.parse::<i64>().is_ok(), "got: {line}");
    assert_eq!(micros.len(), 6, "micros must be zero-padded, got: {line}");
    assert_eq!(rest, format!("ccnd[{}]: exiting.", std::process::id()));
}

#[test]
fn msg_accepts_display_values() {
    let (handle, buffer) = handle_with_buffer();
    handle.msg(format_args!("{} faces open", 4));
    assert!(buffer.contents().ends_with("]: 4 faces open\n"));
}

// ---------------------------------------------------------------------------
// 2. monitoring descriptor
// ---------------------------------------------------------------------------

#[test]
fn new_handle_starts_with_monitoring_disabled() {
    let (handle, _) = handle_with_buffer();
    assert!(!handle.monitoring().is_enabled());
}

#[test]
fn trace_is_a_noop_while_disabled() {
    let (mut handle, buffer) = handle_with_buffer();
    let written = handle.trace(format_args!("interest /a/b")).expect("trace");
    assert_eq!(written, 0);
    assert!(buffer.contents().is_empty(), "trace must not touch the logger");
}

#[test]
fn trace_appends_one_line_per_call_when_attached() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("trace.log");
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .expect("open trace file");

    let (mut handle, _) = handle_with_buffer();
    handle.set_monitoring(MonitoringDescriptor::Pipe(file));
    handle.trace(format_args!("interest {}", "/a")).expect("trace 1");
    let written = handle.trace(format_args!("interest {}", "/b")).expect("trace 2");

    assert_eq!(written, "interest /b\n".len());
    assert_eq!(fs::read_to_string(&path).unwrap(), "interest /a\ninterest /b\n");
}

#[test]
fn take_monitoring_leaves_sentinel_behind() {
    let dir = TempDir::new().expect("tempdir");
    let file = fs::File::create(dir.path().join("trace.log")).expect("create");

    let (mut handle, _) = handle_with_buffer();
    handle.set_monitoring(MonitoringDescriptor::Pipe(file));

    let taken = handle.take_monitoring();
    assert!(taken.is_enabled());
    assert!(!handle.monitoring().is_enabled());
}

#[test]
fn handle_returns_core_state() {
    let handle = DaemonHandle::new("ccnd", LoggerSink::new(LogBuffer::new()), 42u32);
    assert_eq!(*handle.state(), 42);
    assert_eq!(handle.name(), "ccnd");
    assert_eq!(handle.into_state(), 42);
}
