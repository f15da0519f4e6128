use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use qcars_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};
use toml::Value;

/// One reported setting: dotted key, rendered value and the env variables
/// that can set it, checked in order.
struct Entry {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let file_path = detect_config_path();
    let file_doc = load_config_file_doc(file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for entry in entries(&config) {
        let source = field_source(&entry, file_doc.as_ref(), file_path.as_deref());
        lines.push(format!("- {} = {} (source: {source})", entry.key, entry.value));
    }
    lines.join("\n")
}

fn entries(config: &AppConfig) -> Vec<Entry> {
    let redacted = |present: bool| if present { "<redacted>" } else { "<unset>" }.to_string();

    vec![
        Entry {
            key: "database.url",
            value: config.database.url.clone(),
            env_keys: &["QCARS_DATABASE_URL"],
        },
        Entry {
            key: "database.max_connections",
            value: config.database.max_connections.to_string(),
            env_keys: &["QCARS_DATABASE_MAX_CONNECTIONS"],
        },
        Entry {
            key: "database.timeout_secs",
            value: config.database.timeout_secs.to_string(),
            env_keys: &["QCARS_DATABASE_TIMEOUT_SECS"],
        },
        Entry {
            key: "llm.provider",
            value: config.llm.provider.as_str().to_string(),
            env_keys: &["QCARS_LLM_PROVIDER"],
        },
        Entry {
            key: "llm.model",
            value: config.llm.effective_model().to_string(),
            env_keys: &["QCARS_LLM_MODEL"],
        },
        Entry {
            key: "llm.base_url",
            value: config.llm.effective_base_url().to_string(),
            env_keys: &["QCARS_LLM_BASE_URL"],
        },
        Entry {
            key: "llm.api_key",
            value: redacted(config.llm.api_key.is_some()),
            env_keys: &["QCARS_LLM_API_KEY", "GEMINI_API_KEY"],
        },
        Entry {
            key: "llm.timeout_secs",
            value: config.llm.timeout_secs.to_string(),
            env_keys: &["QCARS_LLM_TIMEOUT_SECS"],
        },
        Entry {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["QCARS_SERVER_BIND_ADDRESS"],
        },
        Entry {
            key: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["QCARS_SERVER_PORT"],
        },
        Entry {
            key: "admin.username",
            value: config.admin.username.clone(),
            env_keys: &["QCARS_ADMIN_USERNAME"],
        },
        Entry {
            key: "admin.password",
            value: redacted(true),
            env_keys: &["QCARS_ADMIN_PASSWORD"],
        },
        Entry {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["QCARS_LOGGING_LEVEL", "QCARS_LOG_LEVEL"],
        },
        Entry {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            env_keys: &["QCARS_LOGGING_FORMAT", "QCARS_LOG_FORMAT"],
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), Path::new("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(entry: &Entry, file_doc: Option<&Value>, file_path: Option<&Path>) -> String {
    if let Some(env_key) = entry.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if file_doc.is_some_and(|doc| contains_path(doc, entry.key)) {
        let file_path = file_path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config file".to_string());
        return format!("file ({file_path})");
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::contains_path;

    #[test]
    fn dotted_paths_walk_nested_tables() {
        let doc: toml::Value = "[llm]\nprovider = \"gemini\"\n".parse().expect("toml");

        assert!(contains_path(&doc, "llm.provider"));
        assert!(!contains_path(&doc, "llm.model"));
        assert!(!contains_path(&doc, "server.port"));
    }
}
