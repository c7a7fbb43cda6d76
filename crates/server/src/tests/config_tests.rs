use super::{apply_file_values, Settings};

use std::collections::HashMap;

fn parsed(raw: &str) -> HashMap<String, toml::Value> {
    toml::from_str(raw).expect("toml")
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file_values(
        &mut settings,
        &parsed("bind_addr = \"0.0.0.0:9000\"\nhistory_limit = 12\n"),
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.history_limit, 12);
    assert_eq!(settings.push_capacity, Settings::default().push_capacity);
}

#[test]
fn mistyped_file_values_are_ignored() {
    let mut settings = Settings::default();
    apply_file_values(
        &mut settings,
        &parsed("bind_addr = 9000\nhistory_limit = -3\npush_capacity = \"many\"\n"),
    );
    let defaults = Settings::default();
    assert_eq!(settings.server_bind, defaults.server_bind);
    assert_eq!(settings.history_limit, defaults.history_limit);
    assert_eq!(settings.push_capacity, defaults.push_capacity);
}
