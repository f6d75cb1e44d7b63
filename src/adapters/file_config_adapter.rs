//! INI file configuration adapter.

use crate::domain::error::TrackerError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrackerError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TrackerError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TrackerError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TrackerError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[tracker]
start_date = 2022-03-07
end_date = 2023-03-07
start_cash = 100000
benchmark = SPY
exit_policy = hold
verbose = yes

[data]
price_dir = /data/prices
trades_file = /data/Trades.csv
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("tracker", "start_date"),
            Some("2022-03-07".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "price_dir"),
            Some("/data/prices".to_string())
        );
        assert_eq!(adapter.get_string("tracker", "benchmark"), Some("SPY".into()));
    }

    #[test]
    fn get_string_missing_or_blank_is_none() {
        let adapter =
            FileConfigAdapter::from_string("[tracker]\nbenchmark =\n").unwrap();
        assert_eq!(adapter.get_string("tracker", "benchmark"), None);
        assert_eq!(adapter.get_string("tracker", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn numeric_getters() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_double("tracker", "start_cash", 0.0), 100_000.0);
        assert_eq!(adapter.get_double("tracker", "missing", 1.5), 1.5);
        assert_eq!(adapter.get_double("tracker", "benchmark", 9.9), 9.9);
    }

    #[test]
    fn bool_getter() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert!(adapter.get_bool("tracker", "verbose", false));
        assert!(adapter.get_bool("tracker", "missing", true));
        assert!(!adapter.get_bool("tracker", "benchmark", false));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "trades_file"),
            Some("/data/Trades.csv".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/tracker.ini");
        assert!(matches!(result, Err(TrackerError::ConfigParse { .. })));
    }
}
