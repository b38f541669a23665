//! Stamp `--version` with the commit the binary was built from.

use std::path::Path;
use std::process::Command;

/// Trimmed stdout of `git -C <root> <args>`, if git ran and printed something.
fn git(root: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(root).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let root = Path::new(&manifest).join("..");

    let version = match git(&root, &["rev-parse", "--short", "HEAD"]) {
        Some(sha) if git(&root, &["status", "--porcelain", "--untracked-files=no"]).is_some() => {
            format!("{sha}-dirty")
        }
        Some(sha) => sha,
        None => "unknown".to_string(),
    };

    println!("cargo:rustc-env=TASKRANK_BUILD_SHA={version}");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
}
