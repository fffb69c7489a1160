use std::env;
use std::path::PathBuf;
use std::process::Command;

const SHA_VAR: &str = "FOLLOWUP_BUILD_SHA";

fn git_short_sha(workspace: &PathBuf) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let workspace = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .and_then(|dir| dir.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(".."));

    println!("cargo:rerun-if-env-changed={SHA_VAR}");
    println!("cargo:rerun-if-changed={}", workspace.join(".git/HEAD").display());

    // Release tarballs carry no .git; packagers pass the hash through the environment.
    let sha = env::var(SHA_VAR)
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| git_short_sha(&workspace))
        .unwrap_or_else(|| "unknown".to_owned());

    println!("cargo:rustc-env={SHA_VAR}={sha}");
}
