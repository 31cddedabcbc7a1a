use shift_config::{PolicyConfig, ShiftConfig};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &ShiftConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &ShiftConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if config.policy == PolicyConfig::default() && has_misnested_key(&env_keys, "SHIFT_POLICY") {
        warnings.push(
            "Policy config appears default while SHIFT_POLICY* env vars exist. Use double underscores (example: SHIFT_POLICY__GRACE_WINDOW_SECS)."
                .to_string(),
        );
    }

    if has_misnested_key(&env_keys, "SHIFT_DATABASE") {
        warnings.push(
            "SHIFT_DATABASE* env var without a double underscore is ignored. Use SHIFT_DATABASE__PATH."
                .to_string(),
        );
    }

    warnings
}

fn has_misnested_key(keys: &[String], prefix: &str) -> bool {
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&format!("{prefix}__")))
}
