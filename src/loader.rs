//! Template source fetching.
//! Resolves a repository URL or local path to a directory on disk, cloning
//! git sources into a temporary directory that lives for the duration of the
//! apply call.

use crate::cli::RunConfig;
use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;

/// Represents the source location of a template.
#[derive(Debug)]
pub enum TemplateSource {
    /// Local filesystem template path
    FileSystem(PathBuf),
    /// Git repository URL (HTTPS or SSH)
    Git(String),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::FileSystem(path) => {
                write!(f, "local path: '{}'", path.display())
            }
            TemplateSource::Git(repo) => write!(f, "git repository: '{}'", repo),
        }
    }
}

impl TemplateSource {
    /// Creates a TemplateSource from a string path or URL.
    pub fn from_string(s: &str) -> Self {
        if let Ok(url) = Url::parse(s) {
            if matches!(url.scheme(), "https" | "http" | "git") {
                return Self::Git(s.to_string());
            }
        }
        if s.starts_with("git@") {
            return Self::Git(s.to_string());
        }
        Self::FileSystem(PathBuf::from(s))
    }
}

/// A fetched template source. Cloned sources are removed when this value is
/// dropped, so it must outlive the apply call that reads from it.
pub enum FetchedTemplate {
    Local(PathBuf),
    Cloned(TempDir),
}

impl FetchedTemplate {
    pub fn path(&self) -> &Path {
        match self {
            FetchedTemplate::Local(path) => path,
            FetchedTemplate::Cloned(dir) => dir.path(),
        }
    }
}

/// Fetches the template source for the given repository reference. A
/// `--template-repo-dir` override in the run configuration short-circuits any
/// network access and uses the local directory as-is.
pub fn fetch_template(config: &RunConfig, repository: &str) -> Result<FetchedTemplate> {
    if let Some(dir) = &config.repo_dir {
        if !dir.is_dir() {
            return Err(Error::FetchError(format!(
                "template repository directory '{}' does not exist",
                dir.display()
            )));
        }
        debug!("using local template repository {}", dir.display());
        return Ok(FetchedTemplate::Local(dir.clone()));
    }

    match TemplateSource::from_string(repository) {
        TemplateSource::FileSystem(path) => {
            if !path.is_dir() {
                return Err(Error::FetchError(format!(
                    "template source '{}' does not exist",
                    path.display()
                )));
            }
            Ok(FetchedTemplate::Local(path))
        }
        TemplateSource::Git(repo) => clone_repository(&repo, config.auth_token.as_deref()),
    }
}

fn clone_repository(repo_url: &str, auth_token: Option<&str>) -> Result<FetchedTemplate> {
    let clone_dir = TempDir::with_prefix("stenciler-clone-").map_err(Error::IoError)?;
    debug!("cloning '{}' into '{}'", repo_url, clone_dir.path().display());

    let mut builder = git2::build::RepoBuilder::new();
    if let Some(token) = auth_token {
        let token = token.to_string();
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |_url, _username, _allowed| {
            git2::Cred::userpass_plaintext("token", &token)
        });
        let mut fetch_opts = git2::FetchOptions::new();
        fetch_opts.remote_callbacks(callbacks);
        builder.fetch_options(fetch_opts);
    }

    builder.clone(repo_url, clone_dir.path()).map_err(Error::Git2Error)?;
    Ok(FetchedTemplate::Cloned(clone_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_source_from_string() {
        match TemplateSource::from_string("https://github.com/user/repo.git") {
            TemplateSource::Git(url) => assert_eq!(url, "https://github.com/user/repo.git"),
            _ => panic!("Expected Git source"),
        }

        match TemplateSource::from_string("git@github.com:user/repo.git") {
            TemplateSource::Git(url) => assert_eq!(url, "git@github.com:user/repo.git"),
            _ => panic!("Expected Git source"),
        }

        match TemplateSource::from_string("./local/path") {
            TemplateSource::FileSystem(path) => {
                assert_eq!(path, PathBuf::from("./local/path"))
            }
            _ => panic!("Expected FileSystem source"),
        }
    }

    #[test]
    fn test_template_source_display() {
        let fs_source = TemplateSource::FileSystem(PathBuf::from("/path/to/template"));
        assert_eq!(format!("{}", fs_source), "local path: '/path/to/template'");

        let git_source = TemplateSource::Git("git@github.com:user/repo".to_string());
        assert_eq!(
            format!("{}", git_source),
            "git repository: 'git@github.com:user/repo'"
        );
    }
}
