#![allow(dead_code)]

use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use stenciler::error::{Error, Result};
use stenciler::hooks::HookRunner;
use stenciler::prompt::Prompter;

/// Scripted prompter: answers are handed out in order, and every prompt text
/// is recorded. Running out of answers is an error, which is exactly what the
/// no-re-prompt tests rely on.
pub struct FakePrompter {
    answers: RefCell<VecDeque<String>>,
    pub prompts: RefCell<Vec<String>>,
}

impl FakePrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|s| s.to_string()).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl Prompter for FakePrompter {
    fn prompt_line(&self, text: &str) -> Result<String> {
        self.prompts.borrow_mut().push(text.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::PromptError(format!("unexpected prompt: {}", text)))
    }

    fn select(&self, text: &str, _items: &[String]) -> Result<usize> {
        self.prompts.borrow_mut().push(text.to_string());
        Ok(0)
    }
}

/// Records every hook invocation. Validation hooks return a canned output,
/// and the runner can be switched to fail either class.
pub struct FakeHookRunner {
    pub validation_output: Option<String>,
    pub fail: bool,
    pub lifecycle_calls: RefCell<Vec<PathBuf>>,
    pub validation_calls: RefCell<Vec<(PathBuf, IndexMap<String, String>)>>,
}

impl FakeHookRunner {
    pub fn new() -> Self {
        Self {
            validation_output: None,
            fail: false,
            lifecycle_calls: RefCell::new(Vec::new()),
            validation_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_validation_output(output: &str) -> Self {
        Self { validation_output: Some(output.to_string()), ..Self::new() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::new() }
    }

    pub fn validation_count(&self) -> usize {
        self.validation_calls.borrow().len()
    }
}

impl HookRunner for FakeHookRunner {
    fn run_lifecycle(
        &self,
        script: &Path,
        _cwd: &Path,
        _values: &IndexMap<String, String>,
    ) -> Result<()> {
        self.lifecycle_calls.borrow_mut().push(script.to_path_buf());
        if self.fail {
            return Err(Error::HookError {
                hook: script.display().to_string(),
                detail: "exited with exit status: 1".to_string(),
            });
        }
        Ok(())
    }

    fn run_validation(
        &self,
        script: &Path,
        _cwd: &Path,
        values: &IndexMap<String, String>,
    ) -> Result<String> {
        self.validation_calls.borrow_mut().push((script.to_path_buf(), values.clone()));
        if self.fail {
            return Err(Error::ValidationError {
                hook: script.display().to_string(),
                detail: "exited with exit status: 1".to_string(),
            });
        }
        Ok(self
            .validation_output
            .clone()
            .unwrap_or_else(|| values.values().last().cloned().unwrap_or_default()))
    }
}

/// Writes an executable shell script at the given path.
pub fn write_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// Writes a file, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
