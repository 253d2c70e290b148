//! External hook execution.
//! Hooks are scripts shipped with the template and run as child processes
//! with every resolved parameter projected into the environment as
//! `STENCILER_<NAME>` (name converted to SCREAMING_SNAKE_CASE). Hooks within
//! one list run strictly in declared order; a nonzero exit aborts the
//! enclosing apply immediately.

use crate::error::{Error, Result};
use cruet::Inflector;
use indexmap::IndexMap;
use log::debug;
use std::fs;
use std::path::Path;
use std::process::Command;

use crate::config::TemplateSpec;

const HOOK_SHELL: &str = "/bin/sh";

/// Narrow capability contract for the two hook classes: lifecycle hooks are
/// run for effect only, validation hooks additionally return their captured
/// stdout. The process-executing adapter is the sole production
/// implementation; tests substitute in-memory fakes.
pub trait HookRunner {
    /// Runs a lifecycle hook, blocking until exit. Output streams are
    /// retained only to surface on failure.
    fn run_lifecycle(
        &self,
        script: &Path,
        cwd: &Path,
        values: &IndexMap<String, String>,
    ) -> Result<()>;

    /// Runs a validation hook and returns its captured stdout with trailing
    /// whitespace trimmed.
    fn run_validation(
        &self,
        script: &Path,
        cwd: &Path,
        values: &IndexMap<String, String>,
    ) -> Result<String>;
}

/// Hook runner that executes scripts through `/bin/sh`.
pub struct ProcessHookRunner;

impl ProcessHookRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessHookRunner {
    fn default() -> Self {
        ProcessHookRunner::new()
    }
}

impl HookRunner for ProcessHookRunner {
    fn run_lifecycle(
        &self,
        script: &Path,
        cwd: &Path,
        values: &IndexMap<String, String>,
    ) -> Result<()> {
        debug!("running hook {}", script.display());
        let output = Command::new(HOOK_SHELL)
            .arg(script)
            .current_dir(cwd)
            .envs(projected_env(values))
            .output()
            .map_err(Error::IoError)?;

        if !output.status.success() {
            return Err(Error::HookError {
                hook: script.display().to_string(),
                detail: failure_detail(&output),
            });
        }
        Ok(())
    }

    fn run_validation(
        &self,
        script: &Path,
        cwd: &Path,
        values: &IndexMap<String, String>,
    ) -> Result<String> {
        debug!("running validation hook {}", script.display());
        let output = Command::new(HOOK_SHELL)
            .arg(script)
            .current_dir(cwd)
            .envs(projected_env(values))
            .output()
            .map_err(Error::IoError)?;

        if !output.status.success() {
            return Err(Error::ValidationError {
                hook: script.display().to_string(),
                detail: failure_detail(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

/// Runs the listed hooks in declared order, resolving each path against the
/// template-source root. The first failure stops the run.
pub fn run_hooks(
    runner: &dyn HookRunner,
    template_root: &Path,
    hook_paths: &[String],
    cwd: &Path,
    values: &IndexMap<String, String>,
) -> Result<()> {
    for hook in hook_paths {
        runner.run_lifecycle(&template_root.join(hook), cwd, values)?;
    }
    Ok(())
}

/// Projects the resolved-parameter set as `STENCILER_*` environment
/// variables.
pub fn projected_env(values: &IndexMap<String, String>) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(name, value)| {
            (format!("STENCILER_{}", name.to_screaming_snake_case()), value.clone())
        })
        .collect()
}

/// Checks that every hook referenced by the spec exists under the
/// template-source root, is a regular file, and is executable. Run before any
/// apply so a broken template fails before side effects happen.
pub fn validate_hooks(spec: &TemplateSpec, template_root: &Path) -> Result<()> {
    let mut problems = Vec::new();
    for hook in gather_hook_paths(spec) {
        let path = template_root.join(hook);
        match fs::metadata(&path) {
            Err(_) => problems.push(format!("hook {} does not exist", hook)),
            Ok(metadata) => {
                if !metadata.is_file() || !is_executable(&metadata) {
                    problems.push(format!("hook {} is not executable", hook));
                }
            }
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::ConfigError(problems.join("; ")))
    }
}

fn gather_hook_paths(spec: &TemplateSpec) -> Vec<&String> {
    let mut paths: Vec<&String> =
        spec.params.iter().filter_map(|p| p.validation_hook.as_ref()).collect();
    paths.extend(&spec.pre_init_hooks);
    paths.extend(&spec.post_init_hooks);
    paths.extend(&spec.pre_update_hooks);
    paths.extend(&spec.post_update_hooks);
    paths
}

fn failure_detail(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim_end();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        format!("exited with {}: {}", output.status, stderr)
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}
