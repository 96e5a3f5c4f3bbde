// tests/config_load.rs
use news_dashboard::config::{PipelineConfig, ENV_API_KEY, ENV_CONFIG_PATH};
use news_dashboard::DedupKey;
use std::{env, fs};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("news.toml");
    fs::write(
        &p_toml,
        r#"
publishers = [" Reuters ", "", "CNBC", "Reuters"]
events = ["GDP Release"]
period_days = 3
dedup = "content_hash"
"#,
    )
    .unwrap();
    let c = PipelineConfig::load_from(&p_toml).unwrap();
    assert_eq!(c.publishers, vec!["Reuters".to_string(), "CNBC".to_string()]);
    assert_eq!(c.events, vec!["GDP Release".to_string()]);
    assert_eq!(c.period_days, 3);
    assert_eq!(c.dedup, Some(DedupKey::ContentHash));
    // untouched keys keep their defaults
    assert_eq!(c.max_results, 10);
    assert_eq!(c.categories.len(), 5);

    let p_json = dir.path().join("news.json");
    fs::write(&p_json, r#"{"language": " EN ", "max_concurrency": 8}"#).unwrap();
    let cj = PipelineConfig::load_from(&p_json).unwrap();
    assert_eq!(cj.language, "en");
    assert_eq!(cj.max_concurrency, 8);

    let p_bad = dir.path().join("bad.toml");
    fs::write(&p_bad, "period_days = 0").unwrap();
    assert!(PipelineConfig::load_from(&p_bad).is_err());
}

#[test]
fn api_key_is_never_read_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("news.json");
    fs::write(&p, r#"{"newsdata_api_key": "leaked"}"#).unwrap();
    let c = PipelineConfig::load_from(&p).unwrap();
    assert_eq!(c.newsdata_api_key, None);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_API_KEY);

    // 1) Nothing on disk → built-in defaults, no key
    let c = PipelineConfig::load_default().unwrap();
    assert_eq!(c.publishers.len(), 8);
    assert!(c.api_key().is_err());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("news.toml"), r#"publishers = ["Reuters"]"#).unwrap();
    let ct = PipelineConfig::load_default().unwrap();
    assert_eq!(ct.publishers, vec!["Reuters".to_string()]);

    // 3) Env path wins, key comes from env
    let p_env = tmp.path().join("elsewhere.json");
    fs::write(&p_env, r#"{"publishers": ["BBC News"]}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    env::set_var(ENV_API_KEY, "  abc123 ");
    let ce = PipelineConfig::load_default().unwrap();
    assert_eq!(ce.publishers, vec!["BBC News".to_string()]);
    assert_eq!(ce.api_key().unwrap(), "abc123");

    // 4) Env path to nowhere is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(PipelineConfig::load_default().is_err());

    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_API_KEY);
    env::set_current_dir(&old).unwrap();
}
