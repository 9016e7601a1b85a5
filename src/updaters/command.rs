use super::VersionUpdater;
use crate::error::{BumpError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Custom updater backed by an external program.
///
/// The program receives the file contents on stdin and is called as
///
/// - `<program> read`: print the stored version
/// - `<program> write <version>`: print the updated contents
///
/// A non-zero exit status fails the file.
#[derive(Debug, Clone)]
pub struct CommandUpdater {
    program: PathBuf,
}

impl CommandUpdater {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandUpdater {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, args: &[&str], contents: &str) -> Result<String> {
        let display = self.program.display();

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                BumpError::custom_updater(format!("Failed to execute {}: {}", display, e))
            })?;

        // stdin is fed from its own thread while stdout and stderr are drained
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(contents.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output.map_err(|e| {
            BumpError::custom_updater(format!("Failed to wait for {}: {}", display, e))
        })?;

        match written {
            // a program may exit without reading all of its input
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Err(e) => {
                return Err(BumpError::custom_updater(format!(
                    "Failed to write to {}: {}",
                    display, e
                )))
            }
            Ok(()) => {}
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BumpError::custom_updater(format!(
                "{} {} failed with exit code {}\nStderr: {}",
                display,
                args.join(" "),
                output.status.code().unwrap_or(-1),
                stderr
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            BumpError::custom_updater(format!("{} produced non UTF-8 output: {}", display, e))
        })
    }
}

impl VersionUpdater for CommandUpdater {
    fn read_version(&self, contents: &str) -> Result<String> {
        let version = self.run(&["read"], contents)?.trim().to_string();
        if version.is_empty() {
            return Err(BumpError::field_not_found(self.program.display().to_string()));
        }
        Ok(version)
    }

    fn write_version(&self, contents: &str, version: &str) -> Result<String> {
        self.run(&["write", version], contents)
    }
}
