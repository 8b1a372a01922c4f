use thiserror::Error;

/// A single out-of-domain input field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidParameter {
    #[error("TX terminal height must be >= 0 m, got {0}")]
    TxTerminalHeight(f64),
    #[error("RX terminal height must be >= 0 m, got {0}")]
    RxTerminalHeight(f64),
    #[error("frequency must be > 0 MHz, got {0}")]
    Frequency(f64),
    #[error("TX power must be > 0 W, got {0}")]
    TxPower(f64),
    #[error("surface refractivity {0} does not yield a positive effective earth radius")]
    Refractivity(f64),
    #[error("no distances requested")]
    NoDistances,
    #[error("distance #{index} must be > 0 km, got {value}")]
    Distance { index: usize, value: f64 },
    #[error("relative permittivity must be >= 1, got {0}")]
    Epsilon(f64),
    #[error("ground conductivity must be > 0 S/m, got {0}")]
    Sigma(f64),
}

#[derive(Debug, Error)]
pub enum LfmfError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("invalid parameters: {}", join(.0))]
    InvalidParameters(Vec<InvalidParameter>),

    #[error("non-finite field value at {distance_km} km")]
    NumericOverflow { distance_km: f64 },

    #[error("failed to locate root of residue series mode {mode}")]
    ConvergenceFailure { mode: usize },
}

fn join(params: &[InvalidParameter]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
