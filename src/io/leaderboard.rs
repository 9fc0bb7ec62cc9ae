// src/io/leaderboard.rs

//! Score submission to the tournament leaderboard.
//!
//! Runs strictly after a game has been recorded; a failure here is reported to the
//! caller and never touches simulation results.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

pub const URL_VAR: &str = "LEADERBOARD_API_URL";
pub const USERNAME_VAR: &str = "LEADERBOARD_API_USERNAME";
pub const PASSWORD_VAR: &str = "LEADERBOARD_API_PASSWORD";
pub const CA_CERT_VAR: &str = "LEADERBOARD_CA_CERT";
/// `owner/repo` whose commits are looked up to find the player's GitHub login.
pub const GITHUB_REPO_VAR: &str = "LEADERBOARD_GITHUB_REPO";

const GITHUB_API: &str = "https://api.github.com";

const ANONYMOUS: &str = "Anonymous";

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("environment variable {0} is not set")]
    MissingSetting(&'static str),

    #[error("could not read CA certificate: {0}")]
    Certificate(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("leaderboard rejected the score with status {status}")]
    Rejected { status: u16 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSubmission {
    pub user: String,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct LeaderboardSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    /// PEM root certificate; when set it replaces the built-in trust store.
    pub ca_cert: Option<PathBuf>,
}

impl LeaderboardSettings {
    pub fn from_env() -> Result<Self, SubmissionError> {
        let var = |name: &'static str| {
            std::env::var(name).map_err(|_| SubmissionError::MissingSetting(name))
        };
        Ok(Self {
            url: var(URL_VAR)?,
            username: var(USERNAME_VAR)?,
            password: var(PASSWORD_VAR)?,
            ca_cert: std::env::var_os(CA_CERT_VAR).map(PathBuf::from),
        })
    }
}

pub struct LeaderboardClient {
    client: reqwest::blocking::Client,
    settings: LeaderboardSettings,
}

impl LeaderboardClient {
    pub fn new(settings: LeaderboardSettings) -> Result<Self, SubmissionError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(Duration::from_secs(30));
        if let Some(path) = &settings.ca_cert {
            let pem = std::fs::read(path)?;
            let cert = reqwest::Certificate::from_pem(&pem)?;
            builder = builder.tls_built_in_root_certs(false).add_root_certificate(cert);
        }
        Ok(Self {
            client: builder.build()?,
            settings,
        })
    }

    pub fn submit(&self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        info!(
            "Sending score to leaderboard: user {}, score {:.2}",
            submission.user, submission.score
        );
        let response = self
            .client
            .post(&self.settings.url)
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .json(submission)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
            });
        }
        info!("Score submitted");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LastCommit {
    sha: String,
    author: String,
}

/// Name to submit under: the GitHub login of the latest commit's author when
/// `LEADERBOARD_GITHUB_REPO` is set and the lookup succeeds, else the git author name,
/// else "Anonymous".
pub fn resolve_user() -> String {
    let commit = last_commit();
    let login = match (&commit, std::env::var(GITHUB_REPO_VAR)) {
        (Some(commit), Ok(repo)) => github_login(&repo, &commit.sha),
        _ => None,
    };
    choose_user(login, commit.as_ref().map(|c| c.author.as_str()))
}

fn last_commit() -> Option<LastCommit> {
    let output = Command::new("git")
        .args(["log", "-1", "--pretty=format:%H,%an"])
        .output();
    match output {
        Ok(out) if out.status.success() => parse_commit_line(&String::from_utf8_lossy(&out.stdout)),
        Ok(out) => {
            warn!("git log exited with {}", out.status);
            None
        }
        Err(e) => {
            warn!("Could not run git: {e}");
            None
        }
    }
}

fn parse_commit_line(raw: &str) -> Option<LastCommit> {
    let (sha, author) = raw.trim().split_once(',')?;
    Some(LastCommit {
        sha: sha.trim().to_string(),
        author: author.trim().to_string(),
    })
}

/// Asks the GitHub API who authored `sha` in `repo`. Any failure yields `None`.
fn github_login(repo: &str, sha: &str) -> Option<String> {
    let url = format!("{GITHUB_API}/repos/{repo}/commits/{sha}");
    let lookup = reqwest::blocking::Client::builder()
        .user_agent(concat!("beer-game/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .build()
        .and_then(|client| client.get(&url).send())
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json::<serde_json::Value>());
    match lookup {
        Ok(commit) => login_from_commit(&commit),
        Err(e) => {
            warn!("Could not get commit author from GitHub: {e}");
            None
        }
    }
}

fn login_from_commit(commit: &serde_json::Value) -> Option<String> {
    commit
        .get("author")?
        .get("login")?
        .as_str()
        .filter(|login| !login.is_empty())
        .map(str::to_string)
}

fn choose_user(login: Option<String>, author: Option<&str>) -> String {
    login
        .or_else(|| author.filter(|a| !a.is_empty()).map(str::to_string))
        .unwrap_or_else(|| ANONYMOUS.to_string())
}
