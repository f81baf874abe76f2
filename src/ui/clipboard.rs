//! System clipboard access through the platform's copy command

use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Copy commands to try, in order
fn candidates() -> &'static [(&'static str, &'static [&'static str])] {
    if cfg!(target_os = "macos") {
        &[("pbcopy", &[])]
    } else if cfg!(target_os = "windows") {
        &[("clip", &[])]
    } else {
        &[
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("xsel", &["--clipboard", "--input"]),
        ]
    }
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            // Reap the child before reporting the failed write
            drop(stdin);
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} exited with {}", program, status),
        ))
    }
}

/// Copies `text` using the first clipboard command that works
pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let mut last_error = None;

    for (program, args) in candidates() {
        match pipe_to(program, args, text) {
            Ok(()) => {
                tracing::debug!("Copied {} bytes with {}", text.len(), program);
                return Ok(());
            }
            Err(e) => {
                tracing::debug!("Clipboard command {} failed: {}", program, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no clipboard command available")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_not_empty() {
        assert!(!candidates().is_empty());
    }

    #[test]
    fn test_missing_program_is_error() {
        assert!(pipe_to("promma-no-such-clipboard-tool", &[], "x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_reaps_child() {
        // `true` exits without reading, so a payload larger than the pipe buffer fails to write
        let text = "x".repeat(4 * 1024 * 1024);
        let err = pipe_to("true", &[], &text).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        // A second copy still works once the first child has been reaped
        assert!(pipe_to("cat", &[], "ok").is_ok());
    }
}
