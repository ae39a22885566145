//! The `utils` module collects what the library and the binary share:
//! application error types and logging setup.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests {
    use super::error::AppError;
    use super::logging;

    #[test]
    fn repeated_logging_init_is_harmless() {
        logging::init("info");
        logging::init("debug");
        logging::init("warn");
        logging::init("nonsense");
    }

    #[test]
    fn level_parsing_falls_back_to_info() {
        assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
        assert_eq!(logging::parse_level("trace"), tracing::Level::TRACE);
        assert_eq!(logging::parse_level("loud"), tracing::Level::INFO);
    }

    #[test]
    fn config_errors_convert_into_app_error() {
        let err: AppError = config::ConfigError::Message("bad value".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.to_string(), "configuration error: bad value");
    }
}
