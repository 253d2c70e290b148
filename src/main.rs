//! Stenciler's main application entry point and orchestration logic.
//! Handles command-line argument parsing and coordinates template fetching,
//! manifest handling, and materialization.

use stenciler::{
    classify::Mode,
    cli::{get_args, Args, Command, RunConfig},
    config::{Manifest, TemplateSpec, MANIFEST_FILE},
    error::{default_error_handler, Error, Result},
    hooks::{validate_hooks, HookRunner, ProcessHookRunner},
    loader::fetch_template,
    processor::Materializer,
    prompt::{DialoguerPrompter, Prompter},
    renderer::{MiniJinjaRenderer, TemplateRenderer},
    update,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
fn run(args: Args) -> Result<()> {
    let renderer = MiniJinjaRenderer::new();
    let prompter = DialoguerPrompter::new();
    let hooks = ProcessHookRunner::new();

    match args.command {
        Command::Init { repository, output_dir } => {
            let config = RunConfig {
                repo_dir: args.template_repo_dir,
                auth_token: args.auth_token,
                output_dir,
            };
            run_init(&config, &repository, &renderer, &prompter, &hooks)
        }
        Command::Update { output_dir } => {
            let config = RunConfig {
                repo_dir: args.template_repo_dir,
                auth_token: args.auth_token,
                output_dir,
            };
            update::reconcile(&config, &renderer, &prompter, &hooks)
        }
    }
}

/// First-time materialization: fetch the template source, pick a spec from
/// its manifest, apply it in Init mode, and persist the output manifest.
fn run_init(
    config: &RunConfig,
    repository: &str,
    renderer: &dyn TemplateRenderer,
    prompter: &dyn Prompter,
    hooks: &dyn HookRunner,
) -> Result<()> {
    let source = fetch_template(config, repository)?;
    let manifest = Manifest::load(source.path().join(MANIFEST_FILE))?;
    let spec = select_template(&manifest, prompter)?;
    validate_hooks(spec, source.path())?;

    let materializer = Materializer::new(
        renderer,
        prompter,
        hooks,
        source.path(),
        &config.output_dir,
        repository.to_string(),
    );
    let entry = materializer.apply(spec, Mode::Init, None)?;

    let output_manifest = Manifest { templates: vec![entry] };
    output_manifest.save(config.output_dir.join(MANIFEST_FILE))?;

    println!("Initialized {} from {}.", config.output_dir.display(), repository);
    Ok(())
}

fn select_template<'a>(
    manifest: &'a Manifest,
    prompter: &dyn Prompter,
) -> Result<&'a TemplateSpec> {
    match manifest.templates.len() {
        0 => Err(Error::ConfigError("no templates found in manifest".to_string())),
        1 => Ok(&manifest.templates[0]),
        _ => {
            let directories: Vec<String> =
                manifest.templates.iter().map(|t| t.directory.clone()).collect();
            let index = prompter.select("Select a template directory", &directories)?;
            Ok(&manifest.templates[index])
        }
    }
}
