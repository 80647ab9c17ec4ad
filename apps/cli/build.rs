use std::process::Command;

/// `<short sha> <commit date>` of HEAD, if this is a git checkout.
fn head_commit() -> Option<String> {
    let out = Command::new("git")
        .args(["log", "-1", "--format=%h %cs"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let line = String::from_utf8(out.stdout).ok()?;
    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}

fn main() {
    let build = head_commit().unwrap_or_else(|| "untracked build".to_string());
    println!("cargo:rustc-env=ARENA_BUILD={build}");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
