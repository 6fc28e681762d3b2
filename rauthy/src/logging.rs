//! Logging setup
//!
//! Plugin stdout is reserved for the host handshake, so logs go to stderr
//! where Terraform collects them. `TF_LOG` picks the level.

use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level_from_env())
        .try_init();
}

fn level_from_env() -> LevelFilter {
    parse_level(std::env::var("TF_LOG").ok().as_deref())
}

fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tf_log_levels_are_recognised() {
        assert_eq!(parse_level(Some("TRACE")), LevelFilter::TRACE);
        assert_eq!(parse_level(Some("debug")), LevelFilter::DEBUG);
        assert_eq!(parse_level(Some("WARN")), LevelFilter::WARN);
        assert_eq!(parse_level(Some("ERROR")), LevelFilter::ERROR);
    }

    #[test]
    fn unknown_or_missing_level_defaults_to_info() {
        assert_eq!(parse_level(None), LevelFilter::INFO);
        assert_eq!(parse_level(Some("JSON")), LevelFilter::INFO);
    }

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
