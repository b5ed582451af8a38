use fern::Dispatch;
use log::LevelFilter;

use crate::modules::config::Config;

/// # parse a LOGGING_LEVEL value
/// unknown values fall back to info
pub fn parse_level(verbosity: &str) -> LevelFilter {
    match verbosity.to_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logging(config: &Config) -> Result<(), fern::InitError> {
    let mut base_config = Dispatch::new()
        .level(config.logging_level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(std::io::stdout());

    if let Some(log_file) = &config.log_file {
        base_config = base_config.chain(fern::log_file(log_file)?);
    }

    base_config.apply()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level("OFF"), LevelFilter::Off);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("TRACE"), LevelFilter::Trace);
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
        assert_eq!(parse_level(""), LevelFilter::Info);
    }
}
