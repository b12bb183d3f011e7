use std::path::PathBuf;
use std::process::Command;

fn git(args: &[&str], dir: &PathBuf) -> String {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .ok()
        .and_then(|o| {
            if o.status.success() {
                Some(String::from_utf8_lossy(&o.stdout).trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    // Git commands run from the workspace root (one level above api/)
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    let workspace_root = manifest_dir
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| manifest_dir.clone());

    let hash = git(&["rev-parse", "HEAD"], &workspace_root);
    let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"], &workspace_root);
    let tag = git(&["describe", "--tags", "--abbrev=0"], &workspace_root);

    let build_time = match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
        Ok(dur) => format!("{}", dur.as_secs()),
        Err(_) => "unknown".to_string(),
    };

    println!("cargo:rustc-env=GIT_HASH={}", hash);
    println!("cargo:rustc-env=GIT_BRANCH={}", branch);
    println!("cargo:rustc-env=GIT_TAG={}", tag);
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);
}
