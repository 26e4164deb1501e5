use std::error::Error;

/// Raises the log level of the wrappers, which have no flags of their own.
pub const VERBOSITY_VARIABLE: &str = "BLTOOLS_VERBOSITY";

/// Errors and warnings.
pub const DEFAULT_VERBOSITY: usize = 1;

/// Sends the log of `modules` to stderr.
pub fn init_logging(modules: &[&str], verbosity: usize) -> Result<(), Box<dyn Error>> {
    stderrlog::new()
        .modules(modules.iter().copied())
        .verbosity(verbosity)
        .init()?;
    Ok(())
}

pub fn verbosity_from_environment() -> usize {
    parse_verbosity(std::env::var(VERBOSITY_VARIABLE).ok().as_deref())
}

fn parse_verbosity(value: Option<&str>) -> usize {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_VERBOSITY)
}

#[cfg(test)]
mod tests {
    use super::{parse_verbosity, DEFAULT_VERBOSITY};

    #[test]
    fn verbosity() {
        assert_eq!(DEFAULT_VERBOSITY, parse_verbosity(None));
        assert_eq!(DEFAULT_VERBOSITY, parse_verbosity(Some("loud")));
        assert_eq!(3, parse_verbosity(Some(" 3")));
        assert_eq!(0, parse_verbosity(Some("0")));
    }
}
