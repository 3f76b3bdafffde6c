/*
 * Runs a dialog helper program (zenity, osascript) and classifies its exit.
 *
 * The child's stdout and stderr are always drained completely before its
 * exit status is inspected. When the call carries a `DialogContext`, the
 * pipes are drained on scoped threads while this thread polls the child and
 * the context; a finished context kills the child, reaps it and reports
 * `DialogError::Dismissed`. All helper threads are joined before returning.
 *
 * On Unix the child leads its own process group and dismissal kills the
 * whole group. A wrapper script that forked the real dialog would otherwise
 * keep the pipes open and the readers blocked until the dialog closed.
 */
#![cfg_attr(windows, allow(dead_code))]

use crate::core::{DialogContext, DialogError, RawOutcome, Result};
use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub(crate) struct ProcessOutput {
    /// `None` when the child was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub(crate) fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone())
            .map_err(|e| DialogError::Decode(format!("helper output is not UTF-8: {e}")))
    }

    pub(crate) fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /*
     * Exit status 0 confirms with the stdout text, 1 means the user cancelled,
     * anything else is a failure described by the helper's stderr.
     */
    pub(crate) fn into_outcome(self) -> RawOutcome<String> {
        match self.status {
            Some(0) => self.stdout_text().into(),
            Some(1) => RawOutcome::Cancelled,
            status => RawOutcome::Failed(DialogError::Subprocess {
                status,
                stderr: self.stderr_text(),
            }),
        }
    }
}

/// Removes the single line break helpers append to their answer.
pub(crate) fn strip_line_break(text: &str) -> &str {
    text.strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text)
}

pub(crate) fn run<I, S>(program: &Path, args: I, ctx: Option<&DialogContext>) -> Result<ProcessOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args);
    log::debug!("Subprocess: Launching {:?}", command);

    let output = match ctx {
        None => {
            let output = command.output()?;
            ProcessOutput {
                status: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            }
        }
        Some(ctx) => run_with_context(command, ctx)?,
    };
    log::debug!(
        "Subprocess: {:?} exited with status {:?}",
        program,
        output.status
    );
    Ok(output)
}

fn run_with_context(mut command: Command, ctx: &DialogContext) -> Result<ProcessOutput> {
    if let Some(reason) = ctx.err() {
        return Err(DialogError::Dismissed(reason));
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    let mut child = command.spawn()?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    thread::scope(|scope| {
        let stdout_reader = scope.spawn(move || drain(stdout));
        let stderr_reader = scope.spawn(move || drain(stderr));

        let status = wait_or_dismiss(&mut child, ctx);

        let stdout = join_reader(stdout_reader);
        let stderr = join_reader(stderr_reader);
        let status = status?;
        Ok(ProcessOutput {
            status: status.code(),
            stdout: stdout?,
            stderr: stderr?,
        })
    })
}

// Polls the child until it exits or the context ends. The child is always reaped.
fn wait_or_dismiss(child: &mut Child, ctx: &DialogContext) -> Result<ExitStatus> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
                kill_and_reap(child);
                return Err(DialogError::Launch(e));
            }
        }
        if let Some(reason) = ctx.err() {
            log::debug!("Subprocess: Context done ({reason}), killing helper.");
            kill_and_reap(child);
            return Err(DialogError::Dismissed(reason));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill_and_reap(child: &mut Child) {
    #[cfg(unix)]
    kill_process_group(child);
    if let Err(e) = child.kill() {
        log::warn!("Subprocess: Failed to kill helper: {e}");
    }
    if let Err(e) = child.wait() {
        log::warn!("Subprocess: Failed to reap helper: {e}");
    }
}

// The child is not reaped yet, so its pid still names its process group.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
        log::warn!(
            "Subprocess: Failed to kill process group {pgid}: {}",
            io::Error::last_os_error()
        );
    }
}

fn drain<R: Read>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn join_reader(handle: thread::ScopedJoinHandle<'_, io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("pipe reader panicked")))
        .map_err(DialogError::Launch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(status: Option<i32>, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            status,
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_exit_zero_confirms_with_stdout() {
        match output(Some(0), "/tmp/a.txt\n", "").into_outcome() {
            RawOutcome::Confirmed(text) => assert_eq!(text, "/tmp/a.txt\n"),
            other => panic!("Expected confirmation, got {other:?}"),
        }
    }

    #[test]
    fn test_exit_one_is_cancellation() {
        assert!(matches!(
            output(Some(1), "", "").into_outcome(),
            RawOutcome::Cancelled
        ));
    }

    #[test]
    fn test_other_exit_is_failure_with_stderr() {
        match output(Some(255), "", "  cannot open display\n").into_outcome() {
            RawOutcome::Failed(DialogError::Subprocess { status, stderr }) => {
                assert_eq!(status, Some(255));
                assert_eq!(stderr, "cannot open display");
            }
            other => panic!("Expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_signal_termination_is_failure() {
        assert!(matches!(
            output(None, "", "").into_outcome(),
            RawOutcome::Failed(DialogError::Subprocess { status: None, .. })
        ));
    }

    #[test]
    fn test_non_utf8_stdout_is_decode_failure() {
        let out = ProcessOutput {
            status: Some(0),
            stdout: vec![0xff, 0xfe],
            stderr: Vec::new(),
        };
        assert!(matches!(
            out.into_outcome(),
            RawOutcome::Failed(DialogError::Decode(_))
        ));
    }

    #[test]
    fn test_strip_line_break_removes_one_break_only() {
        assert_eq!(strip_line_break("a\n"), "a");
        assert_eq!(strip_line_break("a\r\n"), "a");
        assert_eq!(strip_line_break("a\n\n"), "a\n");
        assert_eq!(strip_line_break("a"), "a");
    }

    #[test]
    fn test_missing_program_is_launch_failure() {
        let program = Path::new("definitely-not-a-dialog-helper-7f3a");
        assert!(matches!(
            run(program, ["--info"], None),
            Err(DialogError::Launch(_))
        ));
        let ctx = DialogContext::new();
        assert!(matches!(
            run(program, ["--info"], Some(&ctx)),
            Err(DialogError::Launch(_))
        ));
    }

    #[test]
    fn test_done_context_never_launches() {
        let ctx = DialogContext::new();
        ctx.cancel();
        assert!(matches!(
            run(Path::new("definitely-not-a-dialog-helper-7f3a"), ["x"], Some(&ctx)),
            Err(DialogError::Dismissed(crate::core::ContextError::Canceled))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_context_run_drains_output_and_reports_status() {
        let ctx = DialogContext::new();
        let out = run(
            Path::new("sh"),
            ["-c", "printf 'picked\\n'; printf 'warn' >&2; exit 3"],
            Some(&ctx),
        )
        .unwrap();
        assert_eq!(out.status, Some(3));
        assert_eq!(out.stdout, b"picked\n");
        assert_eq!(out.stderr_text(), "warn");
    }

    #[cfg(unix)]
    #[test]
    fn test_expiring_context_kills_helper() {
        let ctx = DialogContext::with_timeout(Duration::from_millis(100));
        let started = std::time::Instant::now();
        let result = run(Path::new("sh"), ["-c", "exec sleep 10"], Some(&ctx));
        assert!(matches!(
            result,
            Err(DialogError::Dismissed(crate::core::ContextError::DeadlineExceeded))
        ));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_expiring_context_kills_forked_grandchild() {
        // Arrange: the shell forks `sleep`, which inherits both pipes.
        let ctx = DialogContext::with_timeout(Duration::from_millis(100));
        let started = std::time::Instant::now();

        // Act
        let result = run(Path::new("sh"), ["-c", "sleep 10; echo late"], Some(&ctx));

        // Assert
        assert!(matches!(
            result,
            Err(DialogError::Dismissed(crate::core::ContextError::DeadlineExceeded))
        ));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
