//! Exercises `Config::load` against an on-disk TOML file, including the
//! environment-override precedence documented in spec.md §6.

use marketarb::app::Config;

#[test]
fn loads_a_minimal_toml_file_and_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        concat!(
            "poll_interval_seconds = 15\n",
            "dashboard_port = 9001\n",
            "\n",
            "[venue_a]\n",
            "base_url = \"https://venue-a.test\"\n",
        ),
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.poll_interval_seconds, 15);
    assert_eq!(config.dashboard_port, 9001);
    assert_eq!(config.venue_a.base_url, "https://venue-a.test");
    // venue_b section was omitted entirely; its defaults still apply.
    assert!(!config.venue_b.base_url.is_empty());
}

#[test]
fn env_var_overrides_the_toml_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "dashboard_port = 9001\n").unwrap();

    std::env::set_var("DASHBOARD_PORT", "9500");
    let config = Config::load(&path).unwrap();
    std::env::remove_var("DASHBOARD_PORT");

    assert_eq!(config.dashboard_port, 9500);
}

#[test]
fn missing_file_falls_back_to_defaults_via_load_or_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.poll_interval_seconds, 10);
    assert_eq!(config.dashboard_port, 8000);
}
