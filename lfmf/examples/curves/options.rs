use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, ValueEnum};
use lfmf::{Output, Polarization};
use std::str::FromStr;

/// Generate P.368 ground-wave curves for every ground class.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// Signal frequency (MHz).
    #[arg(long, short)]
    pub frequency: f64,

    /// Transmitter height above ground (meters).
    #[arg(long, default_value_t = 0.0)]
    pub tx_height: f64,

    /// Receiver height above ground (meters).
    #[arg(long, default_value_t = 0.0)]
    pub rx_height: f64,

    /// Transmitter power (watts).
    #[arg(long, default_value_t = 1000.0)]
    pub tx_power: f64,

    /// Surface refractivity (N-units).
    #[arg(long, default_value_t = 315.0)]
    pub refractivity: f64,

    #[arg(long, value_enum, default_value_t = Pol::Vertical)]
    pub pol: Pol,

    #[arg(long, value_enum, default_value_t = Quantity::Field)]
    pub output: Quantity,

    /// Distance range "min,max,count" (km), logarithmically spaced.
    #[arg(long, default_value = "1,10000,81")]
    pub range: Range,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Pol {
    Horizontal,
    Vertical,
}

impl From<Pol> for Polarization {
    fn from(pol: Pol) -> Self {
        match pol {
            Pol::Horizontal => Self::Horizontal,
            Pol::Vertical => Self::Vertical,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Quantity {
    /// Field strength, dB(µV/m).
    Field,
    /// Basic transmission loss, dB.
    Loss,
}

impl From<Quantity> for Output {
    fn from(quantity: Quantity) -> Self {
        match quantity {
            Quantity::Field => Self::FieldStrength,
            Quantity::Loss => Self::TransmissionLoss,
        }
    }
}

#[derive(Clone, Debug, Copy)]
pub struct Range {
    pub min_km: f64,
    pub max_km: f64,
    pub count: usize,
}

impl Range {
    pub fn distances_km(&self) -> Vec<f64> {
        let (lo, hi) = (self.min_km.ln(), self.max_km.ln());
        let steps = self.count.saturating_sub(1).max(1) as f64;
        (0..self.count)
            .map(|i| (lo + (hi - lo) * i as f64 / steps).exp())
            .collect()
    }
}

impl FromStr for Range {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let mut parts = s.split(',');
        let mut next = || parts.next().ok_or_else(|| anyhow!("not a valid min,max,count"));
        let min_km = f64::from_str(next()?)?;
        let max_km = f64::from_str(next()?)?;
        let count = usize::from_str(next()?)?;
        if !(min_km > 0.0 && max_km >= min_km && count > 0) {
            return Err(anyhow!("expected 0 < min <= max and count > 0"));
        }
        Ok(Self {
            min_km,
            max_km,
            count,
        })
    }
}
