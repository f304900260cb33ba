//! Credential resolution with explicit > environment > file precedence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Error;

use super::Credentials;

/// Profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "default";

/// Environment variable holding the access key ID.
const ENV_ACCESS_KEY: &str = "CDP_ACCESS_KEY_ID";
/// Environment variable holding the base64 private key.
const ENV_PRIVATE_KEY: &str = "CDP_PRIVATE_KEY";
/// Environment variable selecting the credentials file profile.
const ENV_PROFILE: &str = "CDP_PROFILE";
/// Environment variable overriding the credentials file location.
const ENV_CREDENTIALS_FILE: &str = "CDP_SHARED_CREDENTIALS_FILE";

/// Credentials file keys, matching the CDP CLI's shared credentials format.
const KEY_ACCESS_KEY: &str = "cdp_access_key_id";
const KEY_PRIVATE_KEY: &str = "cdp_private_key";

/// Declarative credential input, prior to resolution.
///
/// Mirrors the common authentication parameters every CDP operation accepts:
/// an explicit key pair, or a credentials file path plus profile. Exactly one
/// form becomes active after [`resolve`](CredentialSource::resolve), with
/// precedence explicit parameter > environment variable > credentials file.
///
/// ## Example
///
/// ```rust,no_run
/// use cdp_control::CredentialSource;
///
/// // Explicit pair
/// let creds = CredentialSource::new()
///     .with_access_key("my_access_key")
///     .with_private_key("bXktcHJpdmF0ZS1rZXk=")
///     .resolve()?;
///
/// // Profile from ~/.cdp/credentials
/// let creds = CredentialSource::new().with_profile("gov-cloud").resolve()?;
/// # Ok::<(), cdp_control::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CredentialSource {
    access_key: Option<String>,
    private_key: Option<String>,
    credentials_path: Option<PathBuf>,
    profile: Option<String>,
}

impl CredentialSource {
    /// Creates an empty credential source.
    ///
    /// Without further configuration, resolution falls through to the
    /// environment and then to the `default` profile of
    /// `~/.cdp/credentials`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit access key ID.
    #[must_use]
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Sets the explicit base64 private key.
    #[must_use]
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Sets an explicit credentials file path.
    #[must_use]
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Sets the credentials file profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Resolves this source into a single credential pair.
    ///
    /// Fails with a configuration error, before any network call, when the
    /// input is contradictory (an access key without its private key, or an
    /// explicit key pair alongside an explicit credentials path) or when the
    /// selected file or profile does not exist.
    pub fn resolve(&self) -> Result<Credentials, Error> {
        self.resolve_with(&|name| std::env::var(name).ok(), dirs::home_dir())
    }

    /// Resolution with injectable environment and home directory, for tests.
    fn resolve_with(
        &self,
        env: &dyn Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Credentials, Error> {
        // The two forms are mutually exclusive when both given explicitly.
        if (self.access_key.is_some() || self.private_key.is_some())
            && self.credentials_path.is_some()
        {
            return Err(Error::configuration(
                "access_key/private_key and credentials_path are mutually exclusive",
            ));
        }

        let access_key = self.access_key.clone().or_else(|| env(ENV_ACCESS_KEY));
        let private_key = self.private_key.clone().or_else(|| env(ENV_PRIVATE_KEY));

        match (access_key, private_key) {
            (Some(ak), Some(pk)) => Ok(Credentials::new(ak, pk)),
            (Some(_), None) => Err(Error::configuration(
                "access_key supplied without private_key",
            )),
            (None, Some(_)) => Err(Error::configuration(
                "private_key supplied without access_key",
            )),
            (None, None) => {
                let path = self
                    .credentials_path
                    .clone()
                    .or_else(|| env(ENV_CREDENTIALS_FILE).map(PathBuf::from))
                    .or_else(|| home.map(|h| h.join(".cdp").join("credentials")))
                    .ok_or_else(|| {
                        Error::configuration("cannot determine credentials file location")
                    })?;
                let profile = self
                    .profile
                    .clone()
                    .or_else(|| env(ENV_PROFILE))
                    .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
                load_profile(&path, &profile)
            }
        }
    }
}

/// Reads one profile from a shared credentials file.
fn load_profile(path: &Path, profile: &str) -> Result<Credentials, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!(
            "cannot read credentials file {}: {}",
            path.display(),
            e
        ))
    })?;

    let profiles = parse_profiles(&content);
    let section = profiles.get(profile).ok_or_else(|| {
        Error::configuration(format!(
            "profile '{}' not found in {}",
            profile,
            path.display()
        ))
    })?;

    let access_key = section.get(KEY_ACCESS_KEY).ok_or_else(|| {
        Error::configuration(format!("profile '{}' is missing {}", profile, KEY_ACCESS_KEY))
    })?;
    let private_key = section.get(KEY_PRIVATE_KEY).ok_or_else(|| {
        Error::configuration(format!("profile '{}' is missing {}", profile, KEY_PRIVATE_KEY))
    })?;

    Ok(Credentials::new(access_key, private_key))
}

/// Parses the ini-style shared credentials format.
///
/// `[section]` headers, `key = value` entries, `#`/`;` comment lines. Keys
/// are lowercased; unknown keys are kept so future fields don't break
/// parsing.
fn parse_profiles(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut profiles: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            profiles.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        if let (Some(section), Some((key, value))) = (&current, line.split_once('=')) {
            profiles
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_explicit_pair() {
        let creds = CredentialSource::new()
            .with_access_key("ak")
            .with_private_key("cGs=")
            .resolve_with(&no_env, None)
            .unwrap();
        assert_eq!(creds.access_key(), "ak");
    }

    #[test]
    fn test_access_key_without_private_key_fails() {
        let err = CredentialSource::new()
            .with_access_key("ak")
            .resolve_with(&no_env, None)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
        assert!(err.to_string().contains("private_key"));
    }

    #[test]
    fn test_private_key_without_access_key_fails() {
        let err = CredentialSource::new()
            .with_private_key("cGs=")
            .resolve_with(&no_env, None)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_both_forms_conflict() {
        let err = CredentialSource::new()
            .with_access_key("ak")
            .with_private_key("cGs=")
            .with_credentials_path("/tmp/creds")
            .resolve_with(&no_env, None)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_explicit_beats_environment() {
        let env = |name: &str| match name {
            "CDP_ACCESS_KEY_ID" => Some("env_ak".to_string()),
            "CDP_PRIVATE_KEY" => Some("env_pk".to_string()),
            _ => None,
        };
        let creds = CredentialSource::new()
            .with_access_key("param_ak")
            .with_private_key("param_pk")
            .resolve_with(&env, None)
            .unwrap();
        assert_eq!(creds.access_key(), "param_ak");
    }

    #[test]
    fn test_environment_pair() {
        let env = |name: &str| match name {
            "CDP_ACCESS_KEY_ID" => Some("env_ak".to_string()),
            "CDP_PRIVATE_KEY" => Some("env_pk".to_string()),
            _ => None,
        };
        let creds = CredentialSource::new().resolve_with(&env, None).unwrap();
        assert_eq!(creds.access_key(), "env_ak");
    }

    #[test]
    fn test_missing_everything_reports_file() {
        // No explicit pair, no env, no home dir: nothing left to try.
        let err = CredentialSource::new()
            .resolve_with(&no_env, None)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_parse_profiles() {
        let content = r"
# CDP shared credentials
[default]
cdp_access_key_id = abc123
cdp_private_key = c2VjcmV0

[gov-cloud]
CDP_ACCESS_KEY_ID = upper456
cdp_private_key=bm9zcGFjZXM=
; trailing comment
";
        let profiles = parse_profiles(content);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles["default"]["cdp_access_key_id"], "abc123");
        assert_eq!(profiles["default"]["cdp_private_key"], "c2VjcmV0");
        // Keys are case-insensitive, values keep their case
        assert_eq!(profiles["gov-cloud"]["cdp_access_key_id"], "upper456");
        assert_eq!(profiles["gov-cloud"]["cdp_private_key"], "bm9zcGFjZXM=");
    }

    #[test]
    fn test_parse_profiles_ignores_orphan_lines() {
        let profiles = parse_profiles("orphan = value\n[p]\nk = v\n");
        assert!(profiles["p"].contains_key("k"));
        assert_eq!(profiles.len(), 1);
    }

    #[test]
    fn test_load_profile_from_file() {
        let dir = std::env::temp_dir().join(format!(
            "cdp-control-test-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("credentials");
        std::fs::write(&path, "[default]\ncdp_access_key_id = fk\ncdp_private_key = cGs=\n")
            .unwrap();

        let creds = CredentialSource::new()
            .with_credentials_path(&path)
            .resolve_with(&no_env, None)
            .unwrap();
        assert_eq!(creds.access_key(), "fk");

        let err = CredentialSource::new()
            .with_credentials_path(&path)
            .with_profile("missing")
            .resolve_with(&no_env, None)
            .unwrap_err();
        assert!(err.to_string().contains("profile 'missing'"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_profile_env_fallback_is_used_for_file_selection() {
        // Missing file still proves which path/profile was chosen.
        let env = |name: &str| match name {
            "CDP_SHARED_CREDENTIALS_FILE" => Some("/nonexistent/cdp/credentials".to_string()),
            _ => None,
        };
        let err = CredentialSource::new()
            .resolve_with(&env, None)
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cdp/credentials"));
    }
}
