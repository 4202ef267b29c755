//! Embeds a human-readable version string as `BUILD_INFO_HUMAN`, shown by
//! `--version`: crate version, `git describe` output (or short commit hash
//! plus commit date when no tag exists), and the rustc version.

use std::process::Command;

fn main() {
    ["src", "build.rs", "Cargo.toml", "Cargo.lock"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    let build_info = [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        git_revision().map(|rev| format!("({rev})")),
        run("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={build_info}");
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git_revision() -> Option<String> {
    let describe = run("git", &["describe", "--tags", "--always", "--dirty"])?;
    if describe.contains("-g") || describe.starts_with('v') {
        return Some(describe);
    }

    // Untagged: the hash alone says little, so add when it was committed.
    let committed = run("git", &["log", "-1", "--format=%ct"])
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y%m%d%H%M%S").to_string());

    Some(match committed {
        Some(ts) => format!("{ts}-{describe}"),
        None => describe,
    })
}
