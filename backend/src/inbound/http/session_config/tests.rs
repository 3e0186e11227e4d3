//! Unit tests for session configuration parsing.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::rstest;
use uuid::Uuid;

use super::*;

struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("hbnb-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write temporary key file");
        Self { path }
    }

    fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_env(key_path: &str, overrides: &[(&'static str, &'static str)]) -> MockEnv {
    let mut vars: Vec<(&str, &str)> = vec![
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ];
    for (name, value) in overrides {
        vars.retain(|(existing, _)| existing != name);
        vars.push((name, value));
    }
    mock_env(&vars)
}

#[rstest]
fn release_accepts_complete_configuration() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let env = release_env(&key_file.path_str(), &[]);

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("complete config accepted");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.key_fingerprint().len(), FINGERPRINT_BYTES * 2);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggles(#[case] missing: &'static str) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let path = key_file.path_str();
    let vars: Vec<(&str, &str)> = [
        (KEY_FILE_ENV, path.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]
    .into_iter()
    .filter(|(name, _)| *name != missing)
    .collect();
    let env = mock_env(&vars);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("missing toggle rejected");

    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn release_rejects_malformed_toggles(#[case] name: &'static str, #[case] value: &'static str) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let env = release_env(&key_file.path_str(), &[(name, value)]);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("malformed toggle rejected");

    assert!(matches!(err, SessionConfigError::InvalidEnv { name: n, .. } if n == name));
}

#[rstest]
fn release_rejects_same_site_none_without_secure_cookies() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let env = release_env(
        &key_file.path_str(),
        &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")],
    );

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("insecure SameSite=None rejected");

    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let env = release_env(&key_file.path_str(), &[(ALLOW_EPHEMERAL_ENV, "1")]);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("ephemeral keys rejected");

    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
#[case(BuildMode::Release, SESSION_KEY_MIN_LEN - 1)]
#[case(BuildMode::Debug, SESSION_KEY_DERIVE_MIN_LEN - 1)]
fn short_keys_are_rejected(#[case] mode: BuildMode, #[case] len: usize) {
    let key_file = TempKeyFile::new(len);
    let env = release_env(&key_file.path_str(), &[]);

    let err = session_settings_from_env(&env, mode)
        .err()
        .expect("short key rejected");

    assert!(matches!(err, SessionConfigError::KeyTooShort { length, .. } if length == len));
}

#[rstest]
fn release_requires_readable_key_file() {
    let env = release_env("/nonexistent/hbnb/session_key", &[]);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("unreadable key rejected");

    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_falls_back_to_lenient_defaults() {
    let env = mock_env(&[
        (KEY_FILE_ENV, "/nonexistent/hbnb/session_key"),
        (COOKIE_SECURE_ENV, "perhaps"),
    ]);

    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug tolerates gaps");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn fingerprint_is_stable_for_a_key() {
    let material = vec![b'a'; SESSION_KEY_MIN_LEN];
    let fingerprint = |key: Key| {
        SessionSettings {
            key,
            cookie_secure: true,
            same_site: SameSite::Strict,
        }
        .key_fingerprint()
    };

    assert_eq!(
        fingerprint(Key::derive_from(&material)),
        fingerprint(Key::derive_from(&material))
    );
}
