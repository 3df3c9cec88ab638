use std::fs;
use std::path::PathBuf;

use taskdeps::config::{Config, CONFIG_FILE};
use taskdeps::{generate_dependency_suggestions_with, Task};

#[test]
fn config_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_from_dir(dir.path());

    assert_eq!(config.snapshot.path, PathBuf::from("tasks.json"));
    assert_eq!(config.suggestions.min_keyword_len, 3);
    assert_eq!(config.suggestions.min_confidence, 0);
    assert!(config.suggestions.limit.is_none());
}

#[test]
fn config_overrides_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let toml = r#"
[snapshot]
path = "boards/q3.json"

[suggestions]
min_keyword_len = 5
stop_words = ["report"]
limit = 2
"#;
    fs::write(dir.path().join(CONFIG_FILE), toml)?;

    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.snapshot.path, PathBuf::from("boards/q3.json"));
    assert_eq!(config.suggestions.min_keyword_len, 5);
    assert_eq!(config.suggestions.stop_words, vec!["report".to_string()]);
    assert_eq!(config.suggestions.limit, Some(2));

    // "report" is a stop word now; "write" still overlaps.
    let tasks = vec![
        Task::new("a", "Write report"),
        Task::new("b", "Write final report"),
    ];
    let suggestions = generate_dependency_suggestions_with(&config.suggestions, &tasks, &[]);
    assert_eq!(suggestions.len(), 2);

    Ok(())
}

#[test]
fn stop_word_override_can_remove_all_overlap() {
    let config: Config = toml::from_str(
        "[suggestions]\nstop_words = [\"write\", \"report\"]\n",
    )
    .expect("parse");
    let tasks = vec![
        Task::new("a", "Write report"),
        Task::new("b", "Write final report"),
    ];
    assert!(generate_dependency_suggestions_with(&config.suggestions, &tasks, &[]).is_empty());
}

#[test]
fn config_load_rejects_invalid_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join(CONFIG_FILE);
    fs::write(&config_path, "this = [not valid").expect("write config");

    let result = Config::load(&config_path);
    assert!(result.is_err());
}
