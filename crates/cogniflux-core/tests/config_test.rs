//! CoreConfig layering: defaults and TOML file.

use cogniflux_core::{CoreConfig, LlmMode};
use std::io::Write;

#[test]
fn test_defaults_when_file_missing() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let cfg = CoreConfig::load_from(Some(&dir.path().join("absent"))).expect("load defaults");
    assert_eq!(cfg.app_name, "Cogniflux");
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.chat_model, "gemini-1.5-flash");
    assert_eq!(cfg.environment, "hackathon");
    assert!(cfg.allowed_origins.is_empty());
}

#[test]
fn test_file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("cogniflux.toml");
    let mut f = std::fs::File::create(&path).expect("create config");
    writeln!(
        f,
        r#"
app_name = "Cogniflux Test"
port = 4100
llm_mode = "mock"
environment = "staging"
allowed_origins = ["http://localhost:3000"]
"#
    )
    .expect("write config");

    let cfg = CoreConfig::load_from(Some(&path)).expect("load file");
    assert_eq!(cfg.app_name, "Cogniflux Test");
    assert_eq!(cfg.port, 4100);
    assert_eq!(cfg.llm_mode(), LlmMode::Mock);
    assert_eq!(cfg.environment, "staging");
    assert_eq!(cfg.allowed_origins, vec!["http://localhost:3000".to_string()]);
    // untouched keys keep defaults
    assert_eq!(cfg.report_model, "gemini-1.5-flash");
}
