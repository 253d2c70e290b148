//! Top-level driver for the `update` command.
//! Re-fetches each template recorded in the output manifest and re-applies
//! it against the existing output tree, using the prior manifest entry as
//! resolution context so previously answered parameters are never re-asked.

use crate::cli::RunConfig;
use crate::classify::Mode;
use crate::config::{Manifest, MANIFEST_FILE};
use crate::error::{Error, Result};
use crate::hooks::{self, HookRunner};
use crate::loader::fetch_template;
use crate::processor::Materializer;
use crate::prompt::Prompter;
use crate::renderer::TemplateRenderer;
use log::warn;

/// Reconciles every persisted template entry against its refreshed source.
///
/// The refreshed output manifest is written once, after every entry applied
/// successfully; a failure part-way leaves the previous manifest in place so
/// the run can simply be repeated.
pub fn reconcile(
    config: &RunConfig,
    renderer: &dyn TemplateRenderer,
    prompter: &dyn Prompter,
    hooks: &dyn HookRunner,
) -> Result<()> {
    let manifest_path = config.output_dir.join(MANIFEST_FILE);
    let local = Manifest::load(&manifest_path)?;
    if local.templates.is_empty() {
        return Err(Error::ConfigError(format!(
            "no templates recorded in {}",
            manifest_path.display()
        )));
    }

    let mut refreshed = Vec::with_capacity(local.templates.len());
    for prior in &local.templates {
        let repository = prior.repository.clone().ok_or_else(|| {
            Error::ConfigError(format!(
                "template '{}' has no repository recorded",
                prior.directory
            ))
        })?;

        let source = fetch_template(config, &repository)?;
        let input = Manifest::load(source.path().join(MANIFEST_FILE))?;

        let Some(spec) = input.find_directory(&prior.directory) else {
            // The template dropped this directory. Leave the materialized
            // files untouched and carry the prior entry forward so a later
            // template revision can resume reconciling it.
            warn!(
                "template directory '{}' no longer exists in {}; leaving it untouched",
                prior.directory, repository
            );
            refreshed.push(prior.clone());
            continue;
        };

        hooks::validate_hooks(spec, source.path())?;
        let materializer = Materializer::new(
            renderer,
            prompter,
            hooks,
            source.path(),
            &config.output_dir,
            repository,
        );
        refreshed.push(materializer.apply(spec, Mode::Update, Some(prior))?);
    }

    Manifest { templates: refreshed }.save(&manifest_path)
}
