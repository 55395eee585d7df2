#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

/// A bare repository at `<root>/remote/<owner>/<name>.git` with one commit
/// on its default branch, reachable through the returned `file://` base.
pub fn bare_remote(root: &Path, owner: &str, name: &str, files: &[(&str, &str)]) -> (String, PathBuf) {
    let work = root.join(format!("work-{owner}-{name}"));
    fs::create_dir_all(&work).unwrap();
    init_git_repo(&work);
    for (file, content) in files {
        let path = work.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "init"]);

    let remote_root = root.join("remote");
    let bare = remote_root.join(owner).join(format!("{name}.git"));
    fs::create_dir_all(bare.parent().unwrap()).unwrap();
    git(
        root,
        &["clone", "--bare", work.to_str().unwrap(), bare.to_str().unwrap()],
    );

    (format!("file://{}", remote_root.display()), bare)
}

/// File names tracked on `branch` of a bare repository.
pub fn tree_of(bare: &Path, branch: &str) -> Vec<String> {
    let out = git(bare, &["ls-tree", "-r", "--name-only", branch]);
    out.lines().map(str::to_string).collect()
}

pub fn commit_count(bare: &Path, branch: &str) -> u32 {
    git(bare, &["rev-list", "--count", branch]).trim().parse().unwrap()
}

/// The binary with CI-provided variables cleared.
pub fn bin() -> Command {
    let mut cmd = Command::cargo_bin("org-coding-hours").unwrap();
    for var in [
        "REPOS",
        "WINDOW_START",
        "METRICS_BRANCH",
        "PAGES_BRANCH",
        "GITHUB_TOKEN",
        "GITHUB_REPOSITORY",
        "GITHUB_OUTPUT",
        "ORG_HOURS_REMOTE_BASE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}
