use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned while loading or validating configuration.
pub enum ConfigError {
    /// A port value could not be parsed.
    #[error("invalid port value '{value}': {source}")]
    PortParseError {
        /// Raw environment value.
        value: String,
        /// Parse error.
        source: std::num::ParseIntError,
    },

    /// Port 0 is not a usable listen port.
    #[error("invalid port: {value}")]
    InvalidPort {
        /// Raw environment value.
        value: String,
    },

    /// A bind address could not be parsed.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        /// Raw environment value.
        value: String,
        /// Parse error.
        source: std::net::AddrParseError,
    },

    /// A float value was outside its allowed range.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        /// Setting name.
        name: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
        /// Offending value.
        value: f32,
    },

    /// A count setting must be non-zero.
    #[error("{name} must be greater than zero")]
    ZeroCount {
        /// Setting name.
        name: &'static str,
    },
}
