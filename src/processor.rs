//! Core materialization orchestration.
//! One `apply` call takes a template spec through parameter resolution,
//! pre-hooks, the classified file walk, post-hooks, and finally produces the
//! entry to persist in the output manifest. Execution is strictly
//! sequential; ordering is a correctness requirement because later hooks and
//! files may depend on earlier ones. There is no rollback: a failed apply
//! leaves already-written files in place, and re-running `update` is the
//! recovery path.

use crate::classify::{Classification, Classifier, Mode};
use crate::config::{self, ParamSpec, TemplateSpec};
use crate::error::{Error, Result};
use crate::hooks::{run_hooks, HookRunner};
use crate::prompt::Prompter;
use crate::renderer::{context_from, TemplateRenderer};
use crate::resolver::resolve_params;
use indexmap::IndexMap;
use log::debug;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Materializes one template spec into the output directory.
pub struct Materializer<'a> {
    renderer: &'a dyn TemplateRenderer,
    prompter: &'a dyn Prompter,
    hooks: &'a dyn HookRunner,
    template_root: &'a Path,
    output_root: &'a Path,
    repository: String,
}

impl<'a> Materializer<'a> {
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        prompter: &'a dyn Prompter,
        hooks: &'a dyn HookRunner,
        template_root: &'a Path,
        output_root: &'a Path,
        repository: String,
    ) -> Self {
        Self { renderer, prompter, hooks, template_root, output_root, repository }
    }

    /// Applies the spec in the given mode and returns the output-manifest
    /// entry to persist. In Update mode the prior entry supplies
    /// already-resolved parameter values so they are never re-prompted or
    /// re-validated.
    pub fn apply(
        &self,
        spec: &TemplateSpec,
        mode: Mode,
        prior: Option<&TemplateSpec>,
    ) -> Result<TemplateSpec> {
        let spec = match prior {
            Some(prior) => config::merge(spec, prior),
            None => spec.clone(),
        };

        // Hooks and validation hooks run with the output root as cwd.
        fs::create_dir_all(self.output_root).map_err(Error::IoError)?;

        let params = resolve_params(
            &spec.params,
            self.template_root,
            self.output_root,
            self.prompter,
            self.hooks,
        )?;
        let values = config::param_values(&params);

        let pre_hooks = match mode {
            Mode::Init => &spec.pre_init_hooks,
            Mode::Update => &spec.pre_update_hooks,
        };
        run_hooks(self.hooks, self.template_root, pre_hooks, self.output_root, &values)?;

        self.write_tree(&spec, mode, &values)?;

        let post_hooks = match mode {
            Mode::Init => &spec.post_init_hooks,
            Mode::Update => &spec.post_update_hooks,
        };
        run_hooks(self.hooks, self.template_root, post_hooks, self.output_root, &values)?;

        Ok(self.output_entry(&spec, params))
    }

    fn write_tree(
        &self,
        spec: &TemplateSpec,
        mode: Mode,
        values: &IndexMap<String, String>,
    ) -> Result<()> {
        let source_root = self.template_root.join(&spec.directory);
        let classifier = Classifier::new(&spec.raw_copy, &spec.init_only)?;
        let context = context_from(values);

        for entry in WalkDir::new(&source_root).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::TemplateError(e.to_string()))?;
            let relative_path = entry
                .path()
                .strip_prefix(&source_root)
                .map_err(|e| Error::TemplateError(e.to_string()))?;
            let target = self.output_root.join(relative_path);

            if entry.file_type().is_dir() {
                // The walk root maps onto the output root, which already
                // exists and keeps its own permissions.
                if entry.depth() > 0 {
                    mirror_dir(entry.path(), &target)?;
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            match classifier.classify(relative_path, mode) {
                Classification::Skip => {
                    debug!("skipping init-only path {}", relative_path.display());
                }
                Classification::RawCopy => {
                    debug!("copying {}", relative_path.display());
                    copy_raw(entry.path(), &target)?;
                }
                Classification::Render => {
                    debug!("rendering {}", relative_path.display());
                    let content = fs::read_to_string(entry.path()).map_err(Error::IoError)?;
                    let rendered = self
                        .renderer
                        .render(&content, &context)
                        .map_err(|e| annotate_path(e, relative_path))?;
                    write_rendered(entry.path(), &target, &rendered)?;
                }
            }
        }
        Ok(())
    }

    /// Builds the entry persisted into the output manifest: resolved params
    /// with prompt text retained, the refreshed glob sets, and only the
    /// update hook lists. Init hooks are one-shot and meaningful only against
    /// a pristine target, so they are never carried forward.
    fn output_entry(&self, spec: &TemplateSpec, params: Vec<ParamSpec>) -> TemplateSpec {
        TemplateSpec {
            repository: Some(self.repository.clone()),
            directory: spec.directory.clone(),
            params,
            raw_copy: spec.raw_copy.clone(),
            init_only: spec.init_only.clone(),
            pre_init_hooks: Vec::new(),
            post_init_hooks: Vec::new(),
            pre_update_hooks: spec.pre_update_hooks.clone(),
            post_update_hooks: spec.post_update_hooks.clone(),
        }
    }
}

fn annotate_path(err: Error, relative_path: &Path) -> Error {
    match err {
        Error::UnknownParameterError(detail) => {
            Error::UnknownParameterError(format!("{}: {}", relative_path.display(), detail))
        }
        Error::TemplateError(detail) => {
            Error::TemplateError(format!("{}: {}", relative_path.display(), detail))
        }
        other => other,
    }
}

/// Creates a mirrored output directory carrying the source directory's
/// permission bits.
fn mirror_dir(source: &Path, target: &Path) -> Result<()> {
    fs::create_dir_all(target).map_err(Error::IoError)?;
    let permissions = fs::metadata(source).map_err(Error::IoError)?.permissions();
    fs::set_permissions(target, permissions).map_err(Error::IoError)
}

fn copy_raw(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    fs::copy(source, target).map(|_| ()).map_err(Error::IoError)
}

fn write_rendered(source: &Path, target: &Path, content: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    fs::write(target, content).map_err(Error::IoError)?;
    let permissions = fs::metadata(source).map_err(Error::IoError)?.permissions();
    fs::set_permissions(target, permissions).map_err(Error::IoError)
}
