//! Configuration validation.
//!
//! Validates every tracker setting before any data is loaded.

use crate::domain::error::TrackerError;
use crate::domain::tracker::{ExitPolicy, MissingPricePolicy};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_START_CASH: f64 = 100_000.0;

pub fn validate_tracker_config(config: &dyn ConfigPort) -> Result<(), TrackerError> {
    validate_start_cash(config)?;
    validate_dates(config)?;
    validate_policies(config)?;
    validate_risk_free_rate(config)?;
    Ok(())
}

/// The `[data]` section is only needed by commands that load files.
pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TrackerError> {
    for key in ["price_dir", "trades_file"] {
        if config.get_string("data", key).is_none() {
            return Err(TrackerError::ConfigMissing {
                section: "data".to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

fn invalid(key: &str, reason: impl Into<String>) -> TrackerError {
    TrackerError::ConfigInvalid {
        section: "tracker".to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Numeric `[tracker]` value. A present value that does not parse is an
/// error rather than a silent fallback to `default`.
pub fn parse_double(config: &dyn ConfigPort, field: &str, default: f64) -> Result<f64, TrackerError> {
    match config.get_string("tracker", field) {
        Some(raw) if raw.parse::<f64>().is_err() => {
            Err(invalid(field, format!("invalid number '{}' for {}", raw, field)))
        }
        _ => Ok(config.get_double("tracker", field, default)),
    }
}

fn validate_start_cash(config: &dyn ConfigPort) -> Result<(), TrackerError> {
    let value = parse_double(config, "start_cash", DEFAULT_START_CASH)?;
    if !(value > 0.0 && value.is_finite()) {
        return Err(invalid("start_cash", "start_cash must be positive"));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TrackerError> {
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if start_date > end_date {
        return Err(invalid("start_date", "start_date must not be after end_date"));
    }
    Ok(())
}

pub fn parse_date(config: &dyn ConfigPort, field: &str) -> Result<NaiveDate, TrackerError> {
    match config.get_string("tracker", field) {
        None => Err(TrackerError::ConfigMissing {
            section: "tracker".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| invalid(field, format!("invalid {} format, expected YYYY-MM-DD", field))),
    }
}

pub fn parse_exit_policy(config: &dyn ConfigPort) -> Result<ExitPolicy, TrackerError> {
    config
        .get_string("tracker", "exit_policy")
        .map(|s| s.parse().map_err(|reason: String| invalid("exit_policy", reason)))
        .unwrap_or(Ok(ExitPolicy::default()))
}

pub fn parse_missing_price_policy(
    config: &dyn ConfigPort,
) -> Result<MissingPricePolicy, TrackerError> {
    config
        .get_string("tracker", "missing_price")
        .map(|s| s.parse().map_err(|reason: String| invalid("missing_price", reason)))
        .unwrap_or(Ok(MissingPricePolicy::default()))
}

fn validate_policies(config: &dyn ConfigPort) -> Result<(), TrackerError> {
    parse_exit_policy(config)?;
    parse_missing_price_policy(config)?;
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), TrackerError> {
    let value = parse_double(config, "risk_free_rate", 0.0)?;
    if !(0.0..1.0).contains(&value) {
        return Err(invalid("risk_free_rate", "risk_free_rate must be between 0 and 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[tracker]
start_date = 2022-03-07
end_date = 2023-03-07
start_cash = 100000
benchmark = SPY
exit_policy = close
missing_price = carry_forward
risk_free_rate = 0.04

[data]
price_dir = prices
trades_file = Trades.csv
"#;

    fn key_of(err: TrackerError) -> String {
        match err {
            TrackerError::ConfigInvalid { key, .. } | TrackerError::ConfigMissing { key, .. } => key,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_config_passes() {
        let config = make_config(VALID);
        assert!(validate_tracker_config(&config).is_ok());
        assert!(validate_data_config(&config).is_ok());
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = make_config("[tracker]\nstart_date = 2024-01-02\nend_date = 2024-01-02\n");
        assert!(validate_tracker_config(&config).is_ok());
        assert_eq!(parse_exit_policy(&config).unwrap(), ExitPolicy::Hold);
        assert_eq!(
            parse_missing_price_policy(&config).unwrap(),
            MissingPricePolicy::Fail
        );
    }

    #[test]
    fn start_cash_must_be_positive() {
        let config = make_config(
            "[tracker]\nstart_cash = 0\nstart_date = 2024-01-02\nend_date = 2024-02-02\n",
        );
        let err = validate_tracker_config(&config).unwrap_err();
        assert_eq!(key_of(err), "start_cash");
    }

    #[test]
    fn unparseable_start_cash_fails() {
        for raw in ["50k", "100_000"] {
            let config = make_config(&format!(
                "[tracker]\nstart_cash = {raw}\nstart_date = 2024-01-02\nend_date = 2024-02-02\n"
            ));
            let err = validate_tracker_config(&config).unwrap_err();
            assert!(
                matches!(err, TrackerError::ConfigInvalid { ref key, ref reason, .. }
                    if key == "start_cash" && reason.contains(raw))
            );
        }
    }

    #[test]
    fn unparseable_risk_free_rate_fails() {
        let config = make_config(
            "[tracker]\nstart_date = 2024-01-02\nend_date = 2024-02-02\nrisk_free_rate = 4%\n",
        );
        let err = validate_tracker_config(&config).unwrap_err();
        assert_eq!(key_of(err), "risk_free_rate");
    }

    #[test]
    fn parse_double_uses_default_only_when_absent() {
        let config = make_config("[tracker]\nstart_cash = 2500.5\n");
        assert_eq!(parse_double(&config, "start_cash", 1.0).unwrap(), 2500.5);
        assert_eq!(parse_double(&config, "risk_free_rate", 0.25).unwrap(), 0.25);
    }

    #[test]
    fn missing_start_date() {
        let config = make_config("[tracker]\nend_date = 2024-02-02\n");
        let err = validate_tracker_config(&config).unwrap_err();
        assert!(matches!(err, TrackerError::ConfigMissing { ref key, .. } if key == "start_date"));
    }

    #[test]
    fn bad_date_format() {
        let config = make_config("[tracker]\nstart_date = 2024/01/02\nend_date = 2024-02-02\n");
        let err = validate_tracker_config(&config).unwrap_err();
        assert!(matches!(err, TrackerError::ConfigInvalid { ref key, .. } if key == "start_date"));
    }

    #[test]
    fn start_after_end_fails() {
        let config = make_config("[tracker]\nstart_date = 2024-03-01\nend_date = 2024-02-02\n");
        let err = validate_tracker_config(&config).unwrap_err();
        assert_eq!(key_of(err), "start_date");
    }

    #[test]
    fn unknown_exit_policy_fails() {
        let config = make_config(
            "[tracker]\nstart_date = 2024-01-02\nend_date = 2024-02-02\nexit_policy = sell\n",
        );
        let err = validate_tracker_config(&config).unwrap_err();
        assert_eq!(key_of(err), "exit_policy");
    }

    #[test]
    fn unknown_missing_price_policy_fails() {
        let config = make_config(
            "[tracker]\nstart_date = 2024-01-02\nend_date = 2024-02-02\nmissing_price = zero\n",
        );
        let err = validate_tracker_config(&config).unwrap_err();
        assert_eq!(key_of(err), "missing_price");
    }

    #[test]
    fn risk_free_rate_out_of_range() {
        let config = make_config(
            "[tracker]\nstart_date = 2024-01-02\nend_date = 2024-02-02\nrisk_free_rate = 1.5\n",
        );
        let err = validate_tracker_config(&config).unwrap_err();
        assert_eq!(key_of(err), "risk_free_rate");
    }

    #[test]
    fn data_section_required_keys() {
        let config = make_config("[data]\nprice_dir = prices\n");
        let err = validate_data_config(&config).unwrap_err();
        assert!(matches!(err, TrackerError::ConfigMissing { ref key, .. } if key == "trades_file"));
    }
}
