use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SYSEX_BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    // CI and packagers may pin the commit; fall back to the local checkout.
    let commit_full = ["SYSEX_BUILD_COMMIT", "GITHUB_SHA"]
        .iter()
        .find_map(|name| env::var(name).ok().filter(|value| !value.is_empty()))
        .or_else(|| git(&["rev-parse", "HEAD"]))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let commit = if commit_full == UNKNOWN {
        commit_full.clone()
    } else {
        commit_full.chars().take(7).collect()
    };
    let date = git(&["log", "-1", "--format=%cs"]).unwrap_or_else(|| UNKNOWN.to_string());

    println!("cargo:rustc-env=SYSEX_BUILD_COMMIT={commit}");
    println!("cargo:rustc-env=SYSEX_BUILD_COMMIT_FULL={commit_full}");
    println!("cargo:rustc-env=SYSEX_BUILD_DATE={date}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}
