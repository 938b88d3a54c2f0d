//! ccnd — CCNx forwarding daemon lifecycle shell.
//!
//! # Usage
//!
//! ```text
//! ccnd
//! FMC_MONITORING=TRUE ccnd
//! FMC_MONITORING=TRUE CCND_MONITOR_PIPE=/run/ccnd/monitor.fifo ccnd
//! ```
//!
//! The daemon takes no arguments; any argument prints usage and exits 1.

use std::ffi::OsString;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    // The raw tail, untouched: a lone `--` is an argument too.
    let arguments: Vec<OsString> = std::env::args_os().skip(1).collect();
    std::process::exit(ccnd_daemon::start_blocking(&arguments));
}
