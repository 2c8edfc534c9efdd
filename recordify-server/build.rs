//! Stamps recordify-server with the commit, build time and cargo profile
//! so `/build_info` and the startup log can identify the running binary.

use std::process::Command;

/// Short commit hash of the checkout, or "unknown" outside a git tree
fn git_short_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    // Local time with offset, e.g. 2025-10-26T14:30:45-05:00
    let built_at = chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    // No rerun-if-changed: the stamp is refreshed on every build
    println!("cargo:rustc-env=GIT_HASH={}", git_short_hash());
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", built_at);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);
}
