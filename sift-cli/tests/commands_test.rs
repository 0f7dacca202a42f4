use sift_cli::commands::{patterns, scan};
use sift_cli::{report, ScanArgs};
use sift_core::{AppConfig, MatchScope, RiskLevel};
use sift_patterns::{PatternFile, RuleDefinition, RuleDefinitions};
use sift_scanner::ScanState;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn args(dir: PathBuf) -> ScanArgs {
    ScanArgs {
        dir,
        workers: None,
        patterns: None,
        scope: None,
        json: false,
    }
}

fn email_rules() -> RuleDefinitions {
    let mut rules = RuleDefinitions::new();
    rules.insert(
        "email".to_string(),
        RuleDefinition::new(r"[\w.]+@[\w.]+\.com", "Email address", RiskLevel::Medium),
    );
    rules
}

#[test]
fn test_builtin_rules_without_config() {
    let definitions =
        patterns::resolve_definitions(None, &AppConfig::default()).expect("resolve rules");
    assert_eq!(definitions.len(), 25);
    assert!(definitions.contains_key("email"));
}

#[test]
fn test_explicit_rule_file_must_exist() {
    let tmp = TempDir::new().expect("create temp dir");
    let missing = tmp.path().join("rules.json");

    let err = patterns::resolve_definitions(Some(missing.as_path()), &AppConfig::default())
        .expect_err("missing rule file");
    assert!(err.to_string().contains("rules.json"));
    assert!(!missing.exists());
}

#[test]
fn test_configured_rule_file_is_initialised() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("conf").join("patterns.json");

    let mut config = AppConfig::default();
    config.patterns.file = Some(path.clone());

    let definitions = patterns::resolve_definitions(None, &config).expect("resolve rules");
    assert_eq!(definitions.len(), 25);
    assert!(path.exists());
}

#[test]
fn test_init_target_prefers_explicit_then_configured_path() {
    let mut config = AppConfig::default();
    config.patterns.file = Some(PathBuf::from("/etc/sift/rules.json"));

    let target = patterns::init_target(Some(Path::new("mine.json")), &config).expect("explicit");
    assert_eq!(target, PathBuf::from("mine.json"));

    let target = patterns::init_target(None, &config).expect("configured");
    assert_eq!(target, PathBuf::from("/etc/sift/rules.json"));

    if let Ok(default) = AppConfig::default_patterns_path() {
        let target = patterns::init_target(None, &AppConfig::default()).expect("default");
        assert_eq!(target, default);
        assert!(target.ends_with("patterns.json"));
    }
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("rules.json");
    fs::write(&path, "{}").expect("write file");

    assert!(patterns::init(&path, false).is_err());
    assert_eq!(fs::read_to_string(&path).expect("read file"), "{}");

    patterns::init(&path, true).expect("overwrite rule file");
    let loaded = PatternFile::new(&path).load().expect("load rule file");
    assert_eq!(loaded.len(), 25);
}

#[test]
fn test_flags_override_config() {
    let mut scan_args = args(PathBuf::from("."));
    scan_args.workers = Some(2);
    scan_args.scope = Some(MatchScope::File);

    let config = scan::apply_args(&scan_args, AppConfig::default());
    assert_eq!(config.scanning.pool_size, 2);
    assert_eq!(config.scanning.match_scope, MatchScope::File);

    let untouched = scan::apply_args(&args(PathBuf::from(".")), AppConfig::default());
    assert_eq!(untouched, AppConfig::default());
}

#[tokio::test]
async fn test_scan_and_render() {
    let tmp = TempDir::new().expect("create temp dir");
    fs::write(
        tmp.path().join("a.txt"),
        "hello\ncontact: test@example.com\n",
    )
    .expect("write file");

    let rules_dir = TempDir::new().expect("create rules dir");
    let rule_file = rules_dir.path().join("rules").join("rules.json");
    PatternFile::new(&rule_file).save(&email_rules()).expect("save rules");

    let mut scan_args = args(tmp.path().to_path_buf());
    scan_args.patterns = Some(rule_file);

    let (session, compiled) = scan::execute(&scan_args, &AppConfig::default())
        .await
        .expect("run scan");
    assert_eq!(session.state(), ScanState::Completed);
    assert_eq!(session.stats().sensitive_items, 1);

    let summary = report::render_summary(&session, &compiled);
    assert!(summary.contains("1 total, 1 scanned, 0 skipped, 0 errors"));
    assert!(summary.contains("email - Email address (1 matches)"));
    assert!(summary.contains("a.txt:2  test@example.com"));

    let json: serde_json::Value =
        serde_json::from_str(&report::render_json(&session).expect("render json"))
            .expect("parse json");
    assert_eq!(json["stats"]["sensitive_items"], 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_json_report_with_non_utf8_file_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = TempDir::new().expect("create temp dir");
    let name = OsStr::from_bytes(b"caf\xe9.txt");
    fs::write(tmp.path().join(name), "contact: test@example.com\n").expect("write file");

    let rules_dir = TempDir::new().expect("create rules dir");
    let rule_file = rules_dir.path().join("rules.json");
    PatternFile::new(&rule_file).save(&email_rules()).expect("save rules");

    let mut scan_args = args(tmp.path().to_path_buf());
    scan_args.patterns = Some(rule_file);
    let (session, _) = scan::execute(&scan_args, &AppConfig::default())
        .await
        .expect("run scan");
    assert_eq!(session.stats().sensitive_items, 1);

    let rendered = report::render_json(&session).expect("render json");
    let json: serde_json::Value = serde_json::from_str(&rendered).expect("parse json");
    let results = json["results"].as_object().expect("results object");
    assert_eq!(results.len(), 1);
    let key = results.keys().next().expect("one result");
    assert!(key.ends_with("caf\u{fffd}.txt"), "{key}");
}

#[tokio::test]
async fn test_scan_missing_dir_fails_to_start() {
    let tmp = TempDir::new().expect("create temp dir");
    let err = scan::execute(&args(tmp.path().join("nope")), &AppConfig::default())
        .await
        .expect_err("scan should not start");
    assert!(format!("{err:#}").contains("does not exist"));
}
