//! Parameter resolution.
//! Turns each parameter declaration into a concrete string value. A
//! parameter is resolved exactly once across its lifetime: a value carried
//! forward from a prior manifest entry (or fixed in the spec) is returned
//! unchanged with no prompt and no validation-hook invocation.

use crate::config::ParamSpec;
use crate::error::Result;
use crate::hooks::HookRunner;
use crate::prompt::Prompter;
use indexmap::IndexMap;
use std::path::Path;

/// Resolves every parameter in declaration order and returns the resolved
/// copies with `value` set, `prompt` and `default` retained for the output
/// manifest, and `validation-hook` dropped.
///
/// Later validation hooks see all previously resolved parameters in their
/// environment, plus the candidate value of the parameter under validation.
pub fn resolve_params(
    params: &[ParamSpec],
    template_root: &Path,
    output_root: &Path,
    prompter: &dyn Prompter,
    hooks: &dyn HookRunner,
) -> Result<Vec<ParamSpec>> {
    let mut resolved = Vec::with_capacity(params.len());
    let mut values: IndexMap<String, String> = IndexMap::new();

    for param in params {
        let value = match &param.value {
            Some(value) => value.clone(),
            None => match &param.prompt {
                None => String::new(),
                Some(prompt) => {
                    let raw = prompter.prompt_line(&display_prompt(prompt, param))?;
                    let candidate = if raw.is_empty() {
                        param.default.clone().unwrap_or_default()
                    } else {
                        raw
                    };
                    match &param.validation_hook {
                        None => candidate,
                        Some(hook) => {
                            let mut env = values.clone();
                            env.insert(param.name.clone(), candidate);
                            hooks.run_validation(&template_root.join(hook), output_root, &env)?
                        }
                    }
                }
            },
        };

        values.insert(param.name.clone(), value.clone());
        resolved.push(ParamSpec {
            name: param.name.clone(),
            value: Some(value),
            prompt: param.prompt.clone(),
            default: param.default.clone(),
            validation_hook: None,
        });
    }

    Ok(resolved)
}

fn display_prompt(prompt: &str, param: &ParamSpec) -> String {
    match &param.default {
        Some(default) if !default.is_empty() => format!("{} [{}]", prompt, default),
        _ => prompt.to_string(),
    }
}
