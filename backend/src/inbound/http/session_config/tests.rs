//! Unit tests for session configuration parsing.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp key file");
    std::fs::write(file.path(), vec![b'k'; len]).expect("write key");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[fixture]
fn release_key() -> NamedTempFile {
    key_file(KEY_MIN_LEN)
}

fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key.path().to_string_lossy().into_owned()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

#[rstest]
fn release_accepts_explicit_settings(release_key: NamedTempFile) {
    let env = mock_env(release_vars(&release_key));
    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggles(release_key: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_vars(&release_key);
    vars.remove(missing);
    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("missing toggle fails");
    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sideways")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn release_rejects_invalid_values(
    release_key: NamedTempFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let mut vars = release_vars(&release_key);
    vars.insert(name, value.to_owned());
    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("invalid toggle fails");
    assert!(matches!(err, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
}

#[rstest]
fn release_rejects_short_key() {
    let short = key_file(KEY_MIN_LEN - 1);
    let err = session_settings_from_env(&mock_env(release_vars(&short)), BuildMode::Release)
        .err()
        .expect("short key fails");
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, .. } if length == KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure(release_key: NamedTempFile) {
    let mut vars = release_vars(&release_key);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("insecure SameSite=None fails");
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_ephemeral_keys(release_key: NamedTempFile) {
    let mut vars = release_vars(&release_key);
    vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());
    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("ephemeral keys fail");
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_missing_key_file() {
    let mut vars = HashMap::from([
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Lax".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);
    vars.insert(
        KEY_FILE_ENV,
        std::env::temp_dir()
            .join("bugtracker-no-such-key")
            .to_string_lossy()
            .into_owned(),
    );
    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("unreadable key fails");
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let settings = session_settings_from_env(&mock_env(HashMap::new()), BuildMode::Debug)
        .expect("debug tolerates missing values");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_allows_same_site_none_without_secure() {
    let vars = HashMap::from([
        (COOKIE_SECURE_ENV, "false".to_owned()),
        (SAMESITE_ENV, "none".to_owned()),
    ]);
    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn same_key_file_gives_same_fingerprint(release_key: NamedTempFile) {
    let first = session_settings_from_env(&mock_env(release_vars(&release_key)), BuildMode::Release)
        .expect("settings");
    let second =
        session_settings_from_env(&mock_env(release_vars(&release_key)), BuildMode::Release)
            .expect("settings");
    let fingerprint = first.key_fingerprint();
    assert_eq!(fingerprint, second.key_fingerprint());
    assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
    assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
}

#[rstest]
#[case("1", Some(true))]
#[case("Yes", Some(true))]
#[case(" n ", Some(false))]
#[case("off", None)]
fn parses_boolean_toggles(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
