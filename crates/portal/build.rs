//! Stamps the binary with its build date and git commit

use std::process::Command;

fn main() {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    println!("cargo:rustc-env=PORTAL_BUILD_DATE={}", date);

    if let Some(sha) = git_short_sha() {
        println!("cargo:rustc-env=PORTAL_GIT_SHA={}", sha);
    }

    // Workspace root holds .git
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}

fn git_short_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let sha = String::from_utf8(output.stdout).ok()?;
    let sha = sha.trim();
    (!sha.is_empty()).then(|| sha.to_string())
}
