//! Integration tests for TOML and environment configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var and cwd manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use shift_config::{ConfigError, ShiftConfig};

#[test]
fn loads_policy_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[policy]
grace_window_secs = 120
auto_approve_window_secs = 600
max_shift_hours = 12
admin_department = "payroll"
"#,
        )?;

        let config: ShiftConfig = Figment::from(Serialized::defaults(ShiftConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.policy.grace_window_secs, 120);
        assert_eq!(config.policy.auto_approve_window_secs, 600);
        assert_eq!(config.policy.max_shift_hours, 12);
        assert_eq!(config.policy.admin_department, "payroll");
        Ok(())
    });
}

#[test]
fn partial_policy_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[policy]
max_shift_hours = 10
"#,
        )?;

        let config: ShiftConfig = Figment::from(Serialized::defaults(ShiftConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.policy.max_shift_hours, 10);
        assert_eq!(config.policy.grace_window_secs, 300);
        assert_eq!(config.policy.auto_approve_window_secs, 900);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_from_dot_shift() {
    Jail::expect_with(|jail| {
        jail.create_dir(".shift")?;
        jail.create_file(
            ".shift/config.toml",
            r#"
[database]
path = "data/attendance.db"

[general]
default_limit = 25
"#,
        )?;

        let config = ShiftConfig::load().expect("config loads");
        assert_eq!(config.database.path, "data/attendance.db");
        assert_eq!(config.general.default_limit, 25);
        Ok(())
    });
}

#[test]
fn env_beats_project_config() {
    Jail::expect_with(|jail| {
        jail.create_dir(".shift")?;
        jail.create_file(
            ".shift/config.toml",
            r#"
[policy]
grace_window_secs = 120
"#,
        )?;
        jail.set_env("SHIFT_POLICY__GRACE_WINDOW_SECS", "60");
        jail.set_env("SHIFT_DATABASE__PATH", ":memory:");

        let config = ShiftConfig::load().expect("config loads");
        assert_eq!(config.policy.grace_window_secs, 60);
        assert!(config.database.is_in_memory());
        Ok(())
    });
}

#[test]
fn invalid_policy_is_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.set_env("SHIFT_POLICY__AUTO_APPROVE_WINDOW_SECS", "0");

        let err = ShiftConfig::load().expect_err("zero window must fail");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("auto_approve_window_secs"));
        Ok(())
    });
}
