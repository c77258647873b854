use chrono::{SecondsFormat, TimeZone, Utc};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-env-changed=CODESCENT_DEFAULT_API_URL");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));

    let revision = git_revision(&manifest_dir).unwrap_or_else(|| "unknown".to_string());
    let built_at = match env::var("SOURCE_DATE_EPOCH").ok().and_then(|v| v.parse::<i64>().ok()) {
        Some(epoch) => Utc
            .timestamp_opt(epoch, 0)
            .single()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "unknown".to_string()),
        None => Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    // Packagers can bake in the backend their users talk to.
    let default_api = env::var("CODESCENT_DEFAULT_API_URL")
        .unwrap_or_else(|_| "http://localhost:8000/api/v1".to_string());

    println!("cargo:rustc-env=CODESCENT_GIT_SHA={}", revision);
    println!("cargo:rustc-env=CODESCENT_BUILD_TIME={}", built_at);
    println!("cargo:rustc-env=CODESCENT_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=CODESCENT_BAKED_API_URL={}", default_api);

    let head = manifest_dir.join(".git").join("HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }
}

/// Short sha of HEAD, suffixed with `+dirty` when the tree has local edits.
fn git_revision(dir: &Path) -> Option<String> {
    let sha = run_git(dir, &["rev-parse", "--short", "HEAD"])?;
    let dirty = run_git(dir, &["status", "--porcelain"]).is_some();
    Some(if dirty { format!("{}+dirty", sha) } else { sha })
}

fn run_git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).current_dir(dir).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
