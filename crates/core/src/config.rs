use std::{fmt, path::PathBuf};

use regex::Regex;

use crate::{Error, Result};

pub const INPUT_GITHUB_TOKEN: &str = "github_token";
pub const INPUT_REPO: &str = "repo";
pub const INPUT_REGEX: &str = "regex";
pub const INPUT_PATH: &str = "path";
pub const INPUT_METADATA: &str = "metadata";
/// Set by the runner; points at the REST API of the hosting GitHub instance.
pub const ENV_API_URL: &str = "GITHUB_API_URL";

/// Raw, unvalidated input values as handed to the action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub github_token: Option<String>,
    pub repo: Option<String>,
    pub regex: Option<String>,
    pub path: Option<String>,
    pub metadata: Option<String>,
    pub api_url: Option<String>,
}

impl Inputs {
    /// Read inputs from the process environment using the runner's `INPUT_<NAME>` convention.
    pub fn from_env() -> Self { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| normalize(lookup(&input_env_name(name)));
        Self {
            github_token: get(INPUT_GITHUB_TOKEN),
            repo: get(INPUT_REPO),
            regex: get(INPUT_REGEX),
            path: get(INPUT_PATH),
            metadata: get(INPUT_METADATA),
            api_url: normalize(lookup(ENV_API_URL)),
        }
    }

    /// Values set in `overrides` win over the ones in `self`.
    pub fn with_overrides(self, overrides: Inputs) -> Self {
        Self {
            github_token: normalize(overrides.github_token).or(self.github_token),
            repo: normalize(overrides.repo).or(self.repo),
            regex: normalize(overrides.regex).or(self.regex),
            path: normalize(overrides.path).or(self.path),
            metadata: normalize(overrides.metadata).or(self.metadata),
            api_url: normalize(overrides.api_url).or(self.api_url),
        }
    }
}

/// Environment variable name for an action input.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn normalize(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    normalize(value)
        .ok_or_else(|| Error::configuration(format!("Input required and not supplied: {name}")))
}

/// Resolved run configuration. Built once at startup and never mutated.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub pattern: Regex,
    pub path: PathBuf,
    pub metadata: Option<PathBuf>,
    /// REST API base URL; `None` means api.github.com.
    pub api_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"***")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("pattern", &self.pattern.as_str())
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    pub fn resolve(inputs: Inputs) -> Result<Self> {
        let token = required(inputs.github_token, INPUT_GITHUB_TOKEN)?;
        let repo = required(inputs.repo, INPUT_REPO)?;
        let regex = required(inputs.regex, INPUT_REGEX)?;
        let path = required(inputs.path, INPUT_PATH)?;
        let (owner, repo) = split_repo(&repo)?;
        let pattern = Regex::new(&regex)
            .map_err(|e| Error::configuration(format!("Invalid input regex '{regex}': {e}")))?;
        Ok(Self {
            token,
            owner,
            repo,
            pattern,
            path: PathBuf::from(path),
            metadata: normalize(inputs.metadata).map(PathBuf::from),
            api_url: normalize(inputs.api_url),
        })
    }
}

/// Split an `owner/name` repository reference.
pub fn split_repo(value: &str) -> Result<(String, String)> {
    let mut parts = value.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(Error::configuration(format!(
            "Input repo must be in the form 'owner/name', got '{value}'"
        ))),
    }
}
