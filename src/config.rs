use crate::{
    error::MigrationError,
    http::{self, Auth},
    migration::outcome::Phase,
};
use itertools::Itertools;
use reqwest::Url;
use serde::Deserialize;
use std::{env, io, path::Path};

const DEFAULT_CONFIG_FILE_NAME: &str = "repo-migrator.yaml";
const CONFIG_PATH_VAR: &str = "MIGRATE_CONFIG";

const DEFAULT_BITBUCKET_API_URL: &str = "https://api.bitbucket.org/2.0";
const DEFAULT_GITLAB_API_URL: &str = "https://gitlab.com/api/v4";
const DEFAULT_PAGE_LEN: u32 = 10;
const MAX_PAGE_LEN: u32 = 100;

const BITBUCKET_API_URL: &str = "BITBUCKET_API_URL";
const BITBUCKET_REPO: &str = "BITBUCKET_REPO";
const BITBUCKET_TOKEN: &str = "BITBUCKET_TOKEN";
const BITBUCKET_USERNAME: &str = "BITBUCKET_USERNAME";
const BITBUCKET_APP_PASSWORD: &str = "BITBUCKET_APP_PASSWORD";
const BITBUCKET_PAGELEN: &str = "BITBUCKET_PAGELEN";
const GITLAB_API_URL: &str = "GITLAB_API_URL";
const GITLAB_REPO_ID: &str = "GITLAB_REPO_ID";
const GITLAB_TOKEN: &str = "GITLAB_TOKEN";
const MIGRATE_PHASES: &str = "MIGRATE_PHASES";

/// Settings of a migration run, built once at startup.
#[derive(Debug)]
pub struct Config {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    /// Selected phases, deduplicated and in execution order.
    pub phases: Vec<Phase>,
}

#[derive(Debug)]
pub struct SourceConfig {
    pub api_url: Url,
    /// `workspace/repo`
    pub repo: String,
    pub auth: Auth,
    pub page_len: u32,
}

pub struct DestinationConfig {
    pub api_url: Url,
    /// Numeric id or `group/project` path.
    pub project_id: String,
    pub token: String,
}

impl std::fmt::Debug for DestinationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationConfig")
            .field("api_url", &self.api_url.as_str())
            .field("project_id", &self.project_id)
            .field("token", &"***")
            .finish()
    }
}

/// Non-secret settings that may be kept in a YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub source: FileSourceConfig,
    pub destination: FileDestinationConfig,
    pub phases: Option<Vec<Phase>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSourceConfig {
    pub api_url: Option<String>,
    pub repo: Option<String>,
    pub username: Option<String>,
    pub page_len: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileDestinationConfig {
    pub api_url: Option<String>,
    pub project_id: Option<String>,
}

impl FileConfig {
    pub async fn read(path: &Path) -> Result<FileConfig, MigrationError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| config_file_error(path, err.into()))?;

        serde_yaml::from_str::<FileConfig>(&content)
            .map_err(|err| config_file_error(path, err.into()))
    }

    /// Like [`FileConfig::read`], but a missing file is not an error.
    pub async fn read_optional(path: &Path) -> Result<Option<FileConfig>, MigrationError> {
        match tokio::fs::metadata(path).await {
            Ok(_) => FileConfig::read(path).await.map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(config_file_error(path, err.into())),
        }
    }
}

fn config_file_error(path: &Path, cause: anyhow::Error) -> MigrationError {
    MigrationError::ConfigFile {
        path: path.to_path_buf(),
        cause,
    }
}

impl Config {
    /// Loads the optional config file, then `.env`, then the process
    /// environment, which wins over both.
    pub async fn load() -> Result<Config, MigrationError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }

        let file = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Some(FileConfig::read(Path::new(&path)).await?),
            Err(_) => FileConfig::read_optional(Path::new(DEFAULT_CONFIG_FILE_NAME)).await?,
        };

        Config::resolve(file.unwrap_or_default(), |key| env::var(key).ok())
    }

    /// Merges `file` with the variables returned by `lookup` and validates
    /// the result. Every missing required setting is reported at once.
    pub fn resolve(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, MigrationError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let mut missing = Vec::new();

        let auth = match (
            var(BITBUCKET_TOKEN),
            var(BITBUCKET_USERNAME).or(file.source.username),
            var(BITBUCKET_APP_PASSWORD),
        ) {
            (Some(token), _, _) => Some(Auth::Bearer(token)),
            (None, Some(username), Some(password)) => Some(Auth::Basic { username, password }),
            (None, None, None) => {
                missing.push(format!(
                    "{} (or {} and {})",
                    BITBUCKET_TOKEN, BITBUCKET_USERNAME, BITBUCKET_APP_PASSWORD
                ));
                None
            }
            (None, username, _) => {
                let absent = if username.is_none() {
                    BITBUCKET_USERNAME
                } else {
                    BITBUCKET_APP_PASSWORD
                };
                missing.push(absent.to_owned());
                None
            }
        };

        let token = required(&mut missing, GITLAB_TOKEN, var(GITLAB_TOKEN));
        let repo = required(
            &mut missing,
            BITBUCKET_REPO,
            var(BITBUCKET_REPO).or(file.source.repo),
        );
        let project_id = required(
            &mut missing,
            GITLAB_REPO_ID,
            var(GITLAB_REPO_ID).or(file.destination.project_id),
        );

        let (Some(auth), Some(token), Some(repo), Some(project_id)) =
            (auth, token, repo, project_id)
        else {
            return Err(MigrationError::Configuration { missing });
        };

        let source = SourceConfig {
            api_url: url_setting(
                BITBUCKET_API_URL,
                var(BITBUCKET_API_URL).or(file.source.api_url),
                DEFAULT_BITBUCKET_API_URL,
            )?,
            repo: repo_setting(repo)?,
            auth,
            page_len: page_len_setting(var(BITBUCKET_PAGELEN), file.source.page_len)?,
        };

        let destination = DestinationConfig {
            api_url: url_setting(
                GITLAB_API_URL,
                var(GITLAB_API_URL).or(file.destination.api_url),
                DEFAULT_GITLAB_API_URL,
            )?,
            project_id,
            token,
        };

        let phases = match var(MIGRATE_PHASES) {
            Some(value) => value
                .split(',')
                .filter(|phase| !phase.trim().is_empty())
                .map(str::parse::<Phase>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|reason| invalid(MIGRATE_PHASES, reason))?,
            None => file.phases.unwrap_or_else(|| Phase::ALL.to_vec()),
        };

        Ok(Config {
            source,
            destination,
            phases: phases_setting(phases)?,
        })
    }

    /// Logs the effective settings with secrets redacted.
    pub fn log_settings(&self) {
        let auth = match &self.source.auth {
            Auth::Bearer(_) => "bearer token".to_owned(),
            Auth::Basic { username, .. } => format!("app password of {}", username),
        };

        log::info!(
            "Source: {} repository {} ({}, {} per page)",
            self.source.api_url,
            self.source.repo,
            auth,
            self.source.page_len
        );
        log::info!(
            "Destination: {} project {}",
            self.destination.api_url,
            self.destination.project_id
        );
        log::info!("Phases: {}", self.phases.iter().join(", "));
    }
}

fn required(missing: &mut Vec<String>, name: &str, value: Option<String>) -> Option<String> {
    if value.is_none() {
        missing.push(name.to_owned());
    }

    value
}

fn invalid(name: &str, reason: impl Into<String>) -> MigrationError {
    MigrationError::InvalidSetting {
        name: name.to_owned(),
        reason: reason.into(),
    }
}

fn url_setting(name: &str, value: Option<String>, default: &str) -> Result<Url, MigrationError> {
    let value = value.unwrap_or_else(|| default.to_owned());

    http::parse_url(&value).map_err(|err| invalid(name, err.to_string()))
}

fn repo_setting(repo: String) -> Result<String, MigrationError> {
    let parts: Vec<&str> = repo.trim_matches('/').split('/').collect();

    match parts.as_slice() {
        [workspace, slug] if !workspace.is_empty() && !slug.is_empty() => {
            Ok(format!("{}/{}", workspace, slug))
        }
        _ => Err(invalid(
            BITBUCKET_REPO,
            format!("expected `workspace/repo`, got `{}`", repo),
        )),
    }
}

fn page_len_setting(
    env_value: Option<String>,
    file_value: Option<u32>,
) -> Result<u32, MigrationError> {
    let page_len = match env_value {
        Some(value) => value
            .parse::<u32>()
            .map_err(|err| invalid(BITBUCKET_PAGELEN, format!("`{}`: {}", value, err)))?,
        None => file_value.unwrap_or(DEFAULT_PAGE_LEN),
    };

    if !(1..=MAX_PAGE_LEN).contains(&page_len) {
        return Err(invalid(
            BITBUCKET_PAGELEN,
            format!("must be between 1 and {}, got {}", MAX_PAGE_LEN, page_len),
        ));
    }

    Ok(page_len)
}

fn phases_setting(selected: Vec<Phase>) -> Result<Vec<Phase>, MigrationError> {
    let phases: Vec<Phase> = Phase::ALL
        .into_iter()
        .filter(|phase| selected.contains(phase))
        .collect();

    if phases.is_empty() {
        return Err(invalid(MIGRATE_PHASES, "no phase selected"));
    }

    Ok(phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::{collections::HashMap, fs};
    use tempdir::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        move |key| vars.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (BITBUCKET_USERNAME, "user"),
            (BITBUCKET_APP_PASSWORD, "app-password"),
            (GITLAB_TOKEN, "gl-token"),
            (BITBUCKET_REPO, "ws/repo"),
            (GITLAB_REPO_ID, "group/project"),
        ]
    }

    #[test]
    fn reports_every_missing_setting_at_once() {
        let result = Config::resolve(FileConfig::default(), lookup(&[]));

        match result {
            Err(MigrationError::Configuration { missing }) => assert_eq!(
                missing,
                vec![
                    "BITBUCKET_TOKEN (or BITBUCKET_USERNAME and BITBUCKET_APP_PASSWORD)",
                    "GITLAB_TOKEN",
                    "BITBUCKET_REPO",
                    "GITLAB_REPO_ID",
                ]
            ),
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut vars = complete();
        vars.retain(|(key, _)| *key != BITBUCKET_APP_PASSWORD);
        vars.push((GITLAB_TOKEN, "   "));

        let err = Config::resolve(FileConfig::default(), lookup(&vars)).unwrap_err();

        assert_eq!(
            err.to_string(),
            "missing required settings: BITBUCKET_APP_PASSWORD, GITLAB_TOKEN"
        );
    }

    #[test]
    fn applies_defaults() -> Result<()> {
        let config = Config::resolve(FileConfig::default(), lookup(&complete()))?;

        assert_eq!(config.source.api_url.as_str(), "https://api.bitbucket.org/2.0");
        assert_eq!(config.destination.api_url.as_str(), "https://gitlab.com/api/v4");
        assert_eq!(config.source.page_len, 10);
        assert_eq!(config.phases, Phase::ALL.to_vec());
        assert!(matches!(
            config.source.auth,
            Auth::Basic { ref username, ref password } if username == "user" && password == "app-password"
        ));
        assert_eq!(config.destination.project_id, "group/project");
        Ok(())
    }

    #[test]
    fn bearer_token_wins_over_app_password() -> Result<()> {
        let mut vars = complete();
        vars.push((BITBUCKET_TOKEN, "bb-token"));

        let config = Config::resolve(FileConfig::default(), lookup(&vars))?;

        assert!(matches!(config.source.auth, Auth::Bearer(ref token) if token == "bb-token"));
        Ok(())
    }

    #[test]
    fn phases_are_deduplicated_and_ordered() -> Result<()> {
        let mut vars = complete();
        vars.push((MIGRATE_PHASES, "pull_requests, branches,branches"));

        let config = Config::resolve(FileConfig::default(), lookup(&vars))?;
        assert_eq!(config.phases, vec![Phase::Branches, Phase::PullRequests]);

        let mut vars = complete();
        vars.push((MIGRATE_PHASES, "prs"));

        let config = Config::resolve(FileConfig::default(), lookup(&vars))?;
        assert_eq!(config.phases, vec![Phase::PullRequests]);
        Ok(())
    }

    #[test]
    fn rejects_malformed_values() {
        let cases = [
            (MIGRATE_PHASES, "tags"),
            (MIGRATE_PHASES, " , "),
            (BITBUCKET_PAGELEN, "ten"),
            (BITBUCKET_PAGELEN, "0"),
            (GITLAB_API_URL, "gitlab dot com"),
            (BITBUCKET_REPO, "just-a-repo"),
        ];

        for (name, value) in cases {
            let mut vars = complete();
            vars.retain(|(key, _)| *key != name);
            vars.push((name, value));

            match Config::resolve(FileConfig::default(), lookup(&vars)) {
                Err(MigrationError::InvalidSetting { name: setting, .. }) => {
                    assert_eq!(setting, name, "value `{}`", value)
                }
                other => panic!(
                    "expected {} `{}` to be rejected, got {:?}",
                    name, value, other
                ),
            }
        }
    }

    #[tokio::test]
    async fn file_settings_are_overridden_by_environment() -> Result<()> {
        let dir = TempDir::new("config")?;
        let path = dir.path().join("repo-migrator.yaml");
        fs::write(
            &path,
            r#"
source:
  api_url: https://bitbucket.example.com/2.0
  repo: team/service
  page_len: 50
destination:
  project_id: "1234"
phases:
  - pullrequests
"#,
        )?;

        let file = FileConfig::read(&path).await?;
        let vars = [
            (BITBUCKET_TOKEN, "bb-token"),
            (GITLAB_TOKEN, "gl-token"),
            (GITLAB_REPO_ID, "5678"),
        ];
        let config = Config::resolve(file, lookup(&vars))?;

        assert_eq!(
            config.source.api_url.as_str(),
            "https://bitbucket.example.com/2.0"
        );
        assert_eq!(config.source.repo, "team/service");
        assert_eq!(config.source.page_len, 50);
        assert_eq!(config.destination.project_id, "5678");
        assert_eq!(config.phases, vec![Phase::PullRequests]);

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn missing_optional_file_is_ignored() -> Result<()> {
        let dir = TempDir::new("config")?;
        let path = dir.path().join("absent.yaml");

        assert!(FileConfig::read_optional(&path).await?.is_none());
        assert!(matches!(
            FileConfig::read(&path).await,
            Err(MigrationError::ConfigFile { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_file_keys_are_rejected() -> Result<()> {
        let dir = TempDir::new("config")?;
        let path = dir.path().join("repo-migrator.yaml");
        fs::write(&path, "source:\n  password: oops\n")?;

        assert!(matches!(
            FileConfig::read(&path).await,
            Err(MigrationError::ConfigFile { .. })
        ));
        Ok(())
    }
}
