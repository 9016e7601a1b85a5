use crate::error::{BumpError, Result};
use crate::hooks::HookContext;
use std::path::Path;
use std::process::Command;

/// Executes lifecycle scripts from `[scripts]`
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a lifecycle script with the given context
    ///
    /// The script is a shell command run through `sh -c` in `cwd`, with
    /// environment variables set from the context. Exit code 0 succeeds; any
    /// other exit code is a failure.
    ///
    /// # Arguments
    /// * `script` - Shell command line
    /// * `context` - Hook context with environment variables
    /// * `cwd` - Project root
    ///
    /// # Returns
    /// * `Ok(String)` - Standard output of the script, trimmed
    /// * `Err` - If the shell cannot be started or the script exits non-zero
    pub fn execute(script: &str, context: &HookContext, cwd: &Path) -> Result<String> {
        let hook = context.hook_type.name();
        tracing::debug!(hook, script, "running lifecycle script");

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script).current_dir(cwd);

        for (key, value) in context.to_env_vars() {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|e| {
            BumpError::hook(format!("Failed to execute {} script: {}", hook, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(BumpError::hook(format!(
                "{} script `{}` failed with exit code {}\nStdout: {}\nStderr: {}",
                hook,
                script,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
