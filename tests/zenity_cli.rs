/*
 * End-to-end tests of the zenity adapter. Each test points the `program`
 * option at a small shell script standing in for zenity, so the full path
 * from options to arguments, process exit and parsed result is exercised
 * without a display.
 */
#![cfg(all(unix, not(target_os = "macos")))]

use simple_dialogs::{
    ContextError, DialogContext, DialogError, FileFilter, FileFilters, Rgb, context, extra_button,
    program, question, select_color, select_directory, select_file, select_file_multiple,
    select_file_save, title,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const SCRIPTS: &[(&str, &str)] = &[
    ("cancel", "exit 1"),
    ("pick", "printf '/home/user/notes.txt\\n'"),
    ("echo_args", "printf '%s ' \"$@\""),
    ("multi", "printf '/a/1.txt\\036/a/2.txt\\n'"),
    ("extra", "printf 'Later\\n'; exit 1"),
    ("broken", "echo 'cannot open display' >&2; exit 255"),
    ("slow", "exec sleep 10"),
    ("wrapper", "sleep 10\necho late"),
    ("color", "printf 'rgb(255,128,0)\\n'"),
];

/*
 * All scripts are written once, before any test spawns a process, so no
 * script is still open for writing while another test forks.
 */
fn scripts_dir() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in SCRIPTS {
            let path = dir.path().join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        dir
    })
    .path()
}

fn fake_zenity(name: &str) -> PathBuf {
    scripts_dir().join(name)
}

#[test]
fn test_cancel_is_not_an_error() {
    let result = select_file([program(fake_zenity("cancel"))]);
    assert!(matches!(result, Ok(None)));

    let result = select_file_multiple([program(fake_zenity("cancel"))]);
    assert!(matches!(result, Ok(None)));
}

#[test]
fn test_single_path_is_returned_without_line_break() {
    // Arrange
    let zenity = fake_zenity("pick");

    // Act
    let path = select_file([program(zenity)]).unwrap();

    // Assert
    assert_eq!(path, Some(PathBuf::from("/home/user/notes.txt")));
}

#[test]
fn test_arguments_reach_the_helper() {
    let filters = FileFilters::from(vec![FileFilter::new("Text", ["*.txt"])]);
    let echoed = select_file_save([
        program(fake_zenity("echo_args")),
        title("Save notes"),
        filters.build(),
    ])
    .unwrap()
    .unwrap();
    let echoed = echoed.to_string_lossy();
    assert!(echoed.starts_with("--file-selection --save "));
    assert!(echoed.contains("--title=Save notes"));
    assert!(echoed.contains("--file-filter=Text | *.txt"));

    let echoed = select_directory([program(fake_zenity("echo_args"))])
        .unwrap()
        .unwrap();
    assert!(echoed.to_string_lossy().contains("--directory"));
}

#[test]
fn test_multiple_paths_are_split() {
    let paths = select_file_multiple([program(fake_zenity("multi"))]).unwrap();
    assert_eq!(
        paths,
        Some(vec![PathBuf::from("/a/1.txt"), PathBuf::from("/a/2.txt")])
    );
}

#[test]
fn test_extra_button_is_reported_as_sentinel() {
    let result = question("Save changes?", [program(fake_zenity("extra")), extra_button("Later")]);
    assert!(matches!(result, Err(DialogError::ExtraButton)));

    // Exit status 1 with other output is a plain "No".
    let result = question("Save changes?", [program(fake_zenity("cancel")), extra_button("Later")]);
    assert!(matches!(result, Ok(false)));
}

#[test]
fn test_helper_failure_carries_status_and_stderr() {
    match select_file([program(fake_zenity("broken"))]) {
        Err(DialogError::Subprocess { status, stderr }) => {
            assert_eq!(status, Some(255));
            assert_eq!(stderr, "cannot open display");
        }
        other => panic!("Expected a subprocess failure, got {other:?}"),
    }
}

#[test]
fn test_missing_helper_is_launch_failure() {
    let result = select_file([program(scripts_dir().join("does-not-exist"))]);
    assert!(matches!(result, Err(DialogError::Launch(_))));
}

#[test]
fn test_context_deadline_dismisses_helper() {
    let started = Instant::now();
    let result = select_file([
        program(fake_zenity("slow")),
        context(DialogContext::with_timeout(Duration::from_millis(200))),
    ]);
    assert!(matches!(
        result,
        Err(DialogError::Dismissed(ContextError::DeadlineExceeded))
    ));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_context_deadline_dismisses_wrapper_script() {
    // Arrange: a wrapper that forks its dialog instead of exec'ing it.
    let started = Instant::now();

    // Act
    let result = select_file([
        program(fake_zenity("wrapper")),
        context(DialogContext::with_timeout(Duration::from_millis(200))),
    ]);

    // Assert
    assert!(matches!(
        result,
        Err(DialogError::Dismissed(ContextError::DeadlineExceeded))
    ));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_color_answer_is_parsed() {
    let color = select_color([program(fake_zenity("color"))]).unwrap();
    assert_eq!(color, Some(Rgb::new(255, 128, 0)));
}
