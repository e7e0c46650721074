//! Unit tests for session settings loading.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::{fixture, rstest};

use super::test_utils::TempKeyFile;
use super::*;

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[fixture]
fn key_file() -> TempKeyFile {
    TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed")
}

fn release_vars(key_path: String) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn release_error(vars: HashMap<&'static str, String>) -> SessionConfigError {
    match session_settings_from_env(&mock_env(vars), BuildMode::Release) {
        Ok(_) => panic!("release settings should be rejected"),
        Err(error) => error,
    }
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggle(key_file: TempKeyFile, #[case] missing: &'static str) {
    let mut vars = release_vars(key_file.path_str());
    vars.remove(missing);

    let err = release_error(vars);
    assert!(
        matches!(err, SessionConfigError::MissingEnv { name } if name == missing),
        "unexpected error: {err}"
    );
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(COOKIE_SECURE_ENV, "")]
#[case(SAMESITE_ENV, "sideways")]
#[case(ALLOW_EPHEMERAL_ENV, "perhaps")]
fn release_rejects_invalid_toggle(
    key_file: TempKeyFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let mut vars = release_vars(key_file.path_str());
    vars.insert(name, value.to_owned());

    let err = release_error(vars);
    assert!(
        matches!(err, SessionConfigError::InvalidEnv { name: got, .. } if got == name),
        "unexpected error: {err}"
    );
}

#[rstest]
fn release_rejects_ephemeral_keys(key_file: TempKeyFile) {
    let mut vars = release_vars(key_file.path_str());
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());

    assert!(matches!(
        release_error(vars),
        SessionConfigError::EphemeralNotAllowed
    ));
}

#[rstest]
fn release_rejects_unreadable_key_file() {
    let missing = std::env::temp_dir()
        .join(format!("collab-missing-key-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    assert!(matches!(
        release_error(release_vars(missing)),
        SessionConfigError::KeyRead { .. }
    ));
}

#[rstest]
fn release_rejects_short_key() {
    let short = TempKeyFile::new(32).expect("key file creation should succeed");

    assert!(matches!(
        release_error(release_vars(short.path_str())),
        SessionConfigError::KeyTooShort { length: 32, .. }
    ));
}

#[rstest]
fn release_rejects_insecure_same_site_none(key_file: TempKeyFile) {
    let mut vars = release_vars(key_file.path_str());
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    assert!(matches!(
        release_error(vars),
        SessionConfigError::InsecureSameSiteNone
    ));
}

#[rstest]
fn release_accepts_complete_settings(key_file: TempKeyFile) {
    let env = mock_env(release_vars(key_file.path_str()));

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("settings should load");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn release_key_is_derived_from_file_contents(key_file: TempKeyFile) {
    let first = session_settings_from_env(
        &mock_env(release_vars(key_file.path_str())),
        BuildMode::Release,
    )
    .expect("settings should load");
    let second = session_settings_from_env(
        &mock_env(release_vars(key_file.path_str())),
        BuildMode::Release,
    )
    .expect("settings should load");

    assert_eq!(
        fingerprint::key_fingerprint(&first.key),
        fingerprint::key_fingerprint(&second.key)
    );
}

#[rstest]
fn debug_defaults_apply_when_env_is_empty() {
    let settings = session_settings_from_env(&mock_env(HashMap::new()), BuildMode::Debug)
        .expect("debug defaults should load");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_invalid_same_site_falls_back_to_lax(key_file: TempKeyFile) {
    let mut vars = release_vars(key_file.path_str());
    vars.insert(SAMESITE_ENV, "unexpected".to_owned());

    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug should fall back");
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_honours_insecure_cookie_toggle(key_file: TempKeyFile) {
    let mut vars = release_vars(key_file.path_str());
    vars.insert(COOKIE_SECURE_ENV, "no".to_owned());

    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug settings should load");
    assert!(!settings.cookie_secure);
}
