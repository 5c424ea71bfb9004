use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::sleep;
use std::time::Duration;
use tempfile::{TempDir, tempdir};

/// 設定ファイルを読まない shot コマンドを生成する。
fn shot_command(temp_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("shot"));
    cmd.env("SHOT_CONFIG_PATH", temp_dir.join("no-config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd.stdin(Stdio::null());
    cmd.arg("--no-color");
    cmd
}

/// screens/ と out/ を作り、古い順に names のファイルを書き込む。
fn setup(names: &[&str]) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = tempdir().expect("create tmp dir");
    let src = temp_dir.path().join("screens");
    let dst = temp_dir.path().join("out");
    fs::create_dir(&src).expect("create screens dir");
    fs::create_dir(&dst).expect("create out dir");

    for name in names {
        fs::write(src.join(name), format!("content of {name}")).expect("write screenshot");
        // 作成時刻に差をつける
        sleep(Duration::from_millis(20));
    }

    (temp_dir, src, dst)
}

#[test]
fn copy_latest_file_into_directory() {
    let (temp_dir, src, dst) = setup(&["old.png", "latest.png"]);

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&dst)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Copied the following files from {} to {} successfully!",
            src.display(),
            dst.display()
        )))
        .stdout(predicate::str::contains("latest.png"));

    assert!(src.join("latest.png").exists(), "source file was removed");
    let content = fs::read_to_string(dst.join("latest.png")).expect("read copied file");
    assert_eq!(content, "content of latest.png");
    assert!(!dst.join("old.png").exists(), "older file should not be copied");
}

#[test]
fn copy_two_files_unchanged() {
    let (temp_dir, src, dst) = setup(&["foo1.txt", "foo2.txt"]);

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&dst)
        .args(["--num", "2"])
        .assert()
        .success();

    for name in ["foo1.txt", "foo2.txt"] {
        let copied = fs::read_to_string(dst.join(name)).expect("read copied file");
        assert_eq!(copied, format!("content of {name}"));
        assert!(src.join(name).exists());
    }
}

#[test]
fn start_selects_older_file() {
    let (temp_dir, src, dst) = setup(&["first.png", "second.png", "third.png"]);

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&dst)
        .args(["--start", "2"])
        .assert()
        .success();

    assert!(dst.join("second.png").exists());
    assert!(!dst.join("third.png").exists());
    assert!(!dst.join("first.png").exists());
}

#[test]
fn copy_to_file_path() {
    let (temp_dir, src, dst) = setup(&["shot.png"]);
    let target = dst.join("renamed.png");

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&target)
        .assert()
        .success();

    assert!(src.join("shot.png").exists());
    let content = fs::read_to_string(&target).expect("read target file");
    assert_eq!(content, "content of shot.png");
}

#[test]
fn quiet_prints_nothing_on_success() {
    let (temp_dir, src, dst) = setup(&["shot.png"]);

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&dst)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(dst.join("shot.png").exists());
}

#[test]
fn dry_run_prints_command_without_copying() {
    let (temp_dir, src, dst) = setup(&["foo1.txt", "foo2.txt"]);

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&dst)
        .args(["--num", "2", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "cp {} {} {}\n",
            src.join("foo2.txt").display(),
            src.join("foo1.txt").display(),
            dst.display()
        )));

    assert!(!dst.join("foo1.txt").exists());
    assert!(!dst.join("foo2.txt").exists());
}

#[test]
fn not_enough_files_declined_copies_nothing() {
    let (temp_dir, src, dst) = setup(&["only.png"]);

    let mut cmd = shot_command(temp_dir.path());
    cmd.arg("--src").arg(&src).arg("--dst").arg(&dst).args(["--num", "3"]);

    assert_cmd::Command::from_std(cmd)
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: there are not enough files to copy with start:1, num:3",
        ))
        .stderr(predicate::str::contains("Do you want to continue? [y/n]"))
        .stdout(predicate::str::is_empty());

    assert!(!dst.join("only.png").exists(), "file copied after declining");
}

#[test]
fn dry_run_stdout_holds_only_the_command_after_prompt() {
    // 質問は標準エラーへ出るので、パイプ先には等価コマンドだけが渡る。
    let (temp_dir, src, dst) = setup(&["only.png"]);

    let mut cmd = shot_command(temp_dir.path());
    cmd.arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&dst)
        .args(["--num", "3", "--dry-run"]);

    assert_cmd::Command::from_std(cmd)
        .write_stdin("y\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Do you want to continue? [y/n]"))
        .stdout(predicate::str::diff(format!(
            "cp {} {}\n",
            src.join("only.png").display(),
            dst.display()
        )));

    assert!(!dst.join("only.png").exists());
}

#[test]
fn not_enough_files_accepted_copies_what_exists() {
    let (temp_dir, src, dst) = setup(&["only.png"]);

    let mut cmd = shot_command(temp_dir.path());
    cmd.arg("--src").arg(&src).arg("--dst").arg(&dst).args(["--num", "3"]);

    assert_cmd::Command::from_std(cmd)
        .write_stdin("y\n")
        .assert()
        .success();

    assert!(dst.join("only.png").exists());
}

#[test]
fn empty_directory_reports_no_files() {
    let (temp_dir, src, dst) = setup(&[]);

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&dst)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "No files found in {}",
            src.display()
        )));
}

#[test]
fn invalid_options_are_reported_together() {
    let (temp_dir, src, _dst) = setup(&["shot.png"]);
    let not_a_dir = src.join("shot.png");

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(temp_dir.path().join("missing"))
        .arg("--dst")
        .arg(&not_a_dir)
        .args(["--start", "0", "--num", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("src must be a directory. got:"))
        .stderr(predicate::str::contains(
            "dst must be a directory when num > 1. got:",
        ))
        .stderr(predicate::str::contains("start must be > 0. got:0"));

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .args(["--num", "-1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("num must be > 0. got:-1"));
}

#[test]
fn extension_change_declined() {
    let (temp_dir, src, dst) = setup(&["shot.png"]);
    let target = dst.join("shot.jpg");

    let mut cmd = shot_command(temp_dir.path());
    cmd.arg("--src").arg(&src).arg("--dst").arg(&target);

    assert_cmd::Command::from_std(cmd)
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: src and dst extensions don't match. src: .png, dst: .jpg",
        ));

    assert!(!target.exists());
}

#[test]
fn overwrite_declined_keeps_existing_file() {
    let (temp_dir, src, dst) = setup(&["shot.png"]);
    fs::write(dst.join("shot.png"), "old").expect("write existing target");

    let mut cmd = shot_command(temp_dir.path());
    cmd.arg("--src").arg(&src).arg("--dst").arg(&dst);

    assert_cmd::Command::from_std(cmd)
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists."));

    let content = fs::read_to_string(dst.join("shot.png")).expect("read target");
    assert_eq!(content, "old");
}

#[test]
fn overwrite_with_yes_replaces_existing_file() {
    let (temp_dir, src, dst) = setup(&["shot.png"]);
    fs::write(dst.join("shot.png"), "old").expect("write existing target");

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&dst)
        .arg("--yes")
        .assert()
        .success();

    let content = fs::read_to_string(dst.join("shot.png")).expect("read target");
    assert_eq!(content, "content of shot.png");
}

#[test]
fn same_file_fails_with_exit_code_1() {
    let (temp_dir, src, _dst) = setup(&["shot.png"]);

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&src)
        .arg("--yes")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed"))
        .stderr(predicate::str::contains("are the same file").not());

    let content = fs::read_to_string(src.join("shot.png")).expect("read source");
    assert_eq!(content, "content of shot.png", "source was modified");
}

#[test]
fn same_file_with_debug_shows_full_error() {
    let (temp_dir, src, _dst) = setup(&["shot.png"]);
    let file = src.join("shot.png");

    shot_command(temp_dir.path())
        .arg("--src")
        .arg(&src)
        .arg("--dst")
        .arg(&src)
        .args(["--yes", "--debug"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(format!(
            "'{}' and '{}' are the same file",
            file.display(),
            file.display()
        )));
}

#[test]
fn version_flag() {
    let temp_dir = tempdir().expect("create tmp dir");

    shot_command(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
