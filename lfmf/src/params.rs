use crate::{
    error::{InvalidParameter, LfmfError},
    warnings::Warnings,
};

/// Antenna polarization.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarization {
    Horizontal = 0,
    Vertical = 1,
}

/// Quantity reported by [`compute`](crate::compute).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Field strength, dB(µV/m).
    FieldStrength,
    /// Basic transmission loss, dB.
    TransmissionLoss,
}

/// Ground classes for which ITU-R P.368 publishes curves.
///
/// | Ground type             | Conductivity (S/m) | Relative Permittivity |
/// |-------------------------|-------------------:|----------------------:|
/// | Sea water, low salinity |                  1 |                    80 |
/// | Sea water, average      |                  5 |                    70 |
/// | Wet ground              |               0.01 |                    30 |
/// | Fresh water             |              0.003 |                    80 |
/// | Land                    |              0.003 |                    22 |
/// | Medium dry ground       |              0.001 |                    15 |
/// | Very dry ground         |             0.0003 |                     7 |
/// | Fresh water ice, -1 °C  |             0.0001 |                     3 |
/// | Fresh water ice, -10 °C |            0.00003 |                     3 |
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundType {
    SeaWaterLowSalinity,
    SeaWater,
    WetGround,
    FreshWater,
    Land,
    MediumDryGround,
    VeryDryGround,
    FreshWaterIceWarm,
    FreshWaterIceCold,
}

impl GroundType {
    pub const ALL: [Self; 9] = [
        Self::SeaWaterLowSalinity,
        Self::SeaWater,
        Self::WetGround,
        Self::FreshWater,
        Self::Land,
        Self::MediumDryGround,
        Self::VeryDryGround,
        Self::FreshWaterIceWarm,
        Self::FreshWaterIceCold,
    ];

    /// Returns `(epsilon, sigma)` for this ground class.
    pub fn constants(self) -> (f64, f64) {
        match self {
            Self::SeaWaterLowSalinity => (80., 1.),
            Self::SeaWater => (70., 5.),
            Self::WetGround => (30., 0.01),
            Self::FreshWater => (80., 0.003),
            Self::Land => (22., 0.003),
            Self::MediumDryGround => (15., 0.001),
            Self::VeryDryGround => (7., 0.0003),
            Self::FreshWaterIceWarm => (3., 0.0001),
            Self::FreshWaterIceCold => (3., 0.000_03),
        }
    }
}

/// Validated envelope of the model; exceeding these only raises
/// [`Warnings`].
pub(crate) mod limits {
    pub const MAX_HEIGHT_METER: f64 = 50.0;
    pub const MIN_F_MHZ: f64 = 0.01;
    pub const MAX_F_MHZ: f64 = 30.0;
    pub const MIN_N_S: f64 = 250.0;
    pub const MAX_N_S: f64 = 400.0;
    pub const MAX_DISTANCE_KM: f64 = 10_000.0;
}

/// Inputs to a single model run.
///
/// All fields are plain data; nothing is checked until the parameters
/// are handed to [`predict`](crate::predict) or
/// [`compute`](crate::compute).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Transmitter height above ground (meters).
    pub h_tx_meter: f64,
    /// Receiver height above ground (meters).
    pub h_rx_meter: f64,
    /// Frequency (MHz).
    pub f_mhz: f64,
    /// Transmitter power (watts).
    pub tx_power_watt: f64,
    /// Surface refractivity (N-units).
    pub n_s: f64,
    /// Great-circle path distances to evaluate (km).
    pub distances_km: Vec<f64>,
    /// Relative permittivity of the ground.
    pub epsilon: f64,
    /// Ground conductivity (siemens/meter).
    pub sigma: f64,
    pub pol: Polarization,
}

impl Params {
    /// P.368 reference transmitter power.
    pub const REFERENCE_POWER_WATT: f64 = 1000.0;
    /// Surface refractivity used when none is given.
    pub const DEFAULT_N_S: f64 = 315.0;

    pub fn builder() -> ParamsBuilder {
        ParamsBuilder {
            h_tx_meter: 0.0,
            h_rx_meter: 0.0,
            f_mhz: None,
            tx_power_watt: Self::REFERENCE_POWER_WATT,
            n_s: Self::DEFAULT_N_S,
            distances_km: None,
            ground: None,
            pol: None,
        }
    }

    /// Checks every field and returns all violations at once.
    pub fn validate(&self) -> Result<(), LfmfError> {
        let mut errs = Vec::new();

        if !(self.h_tx_meter >= 0.0 && self.h_tx_meter.is_finite()) {
            errs.push(InvalidParameter::TxTerminalHeight(self.h_tx_meter));
        }
        if !(self.h_rx_meter >= 0.0 && self.h_rx_meter.is_finite()) {
            errs.push(InvalidParameter::RxTerminalHeight(self.h_rx_meter));
        }
        if !(self.f_mhz > 0.0 && self.f_mhz.is_finite()) {
            errs.push(InvalidParameter::Frequency(self.f_mhz));
        }
        if !(self.tx_power_watt > 0.0 && self.tx_power_watt.is_finite()) {
            errs.push(InvalidParameter::TxPower(self.tx_power_watt));
        }
        if !(self.n_s >= 0.0 && crate::model::effective_earth_radius_km(self.n_s) > 0.0) {
            errs.push(InvalidParameter::Refractivity(self.n_s));
        }
        if self.distances_km.is_empty() {
            errs.push(InvalidParameter::NoDistances);
        }
        for (index, &value) in self.distances_km.iter().enumerate() {
            if !(value > 0.0 && value.is_finite()) {
                errs.push(InvalidParameter::Distance { index, value });
            }
        }
        if !(self.epsilon >= 1.0 && self.epsilon.is_finite()) {
            errs.push(InvalidParameter::Epsilon(self.epsilon));
        }
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            errs.push(InvalidParameter::Sigma(self.sigma));
        }

        if errs.is_empty() {
            Ok(())
        } else {
            Err(LfmfError::InvalidParameters(errs))
        }
    }

    /// Envelope warnings shared by every distance of this run.
    pub(crate) fn envelope_warnings(&self) -> Warnings {
        use limits::*;
        Warnings::NONE
            .with(Warnings::TX_HEIGHT, self.h_tx_meter > MAX_HEIGHT_METER)
            .with(Warnings::RX_HEIGHT, self.h_rx_meter > MAX_HEIGHT_METER)
            .with(Warnings::FREQUENCY_LOW, self.f_mhz < MIN_F_MHZ)
            .with(Warnings::FREQUENCY_HIGH, self.f_mhz > MAX_F_MHZ)
            .with(
                Warnings::REFRACTIVITY,
                !(MIN_N_S..=MAX_N_S).contains(&self.n_s),
            )
    }
}

pub struct ParamsBuilder {
    /// Transmitter height (meters, defaults to 0).
    h_tx_meter: f64,

    /// Receiver height (meters, defaults to 0).
    h_rx_meter: f64,

    /// Frequency (required).
    f_mhz: Option<f64>,

    /// Transmitter power (watts, defaults to 1 kW).
    tx_power_watt: f64,

    /// Surface refractivity (N-units, defaults to 315).
    n_s: f64,

    /// Distances to evaluate (required).
    distances_km: Option<Vec<f64>>,

    /// `(epsilon, sigma)` of the ground (required).
    ground: Option<(f64, f64)>,

    /// Polarization (required).
    pol: Option<Polarization>,
}

impl ParamsBuilder {
    /// Transmitter height above ground (meters, defaults to 0).
    #[must_use]
    pub fn tx_height(mut self, meters: f64) -> Self {
        self.h_tx_meter = meters;
        self
    }

    /// Receiver height above ground (meters, defaults to 0).
    #[must_use]
    pub fn rx_height(mut self, meters: f64) -> Self {
        self.h_rx_meter = meters;
        self
    }

    /// Frequency of signal (MHz, required).
    #[must_use]
    pub fn freq(mut self, f_mhz: f64) -> Self {
        self.f_mhz = Some(f_mhz);
        self
    }

    /// Transmitter power (watts, defaults to 1 kW).
    #[must_use]
    pub fn tx_power(mut self, watts: f64) -> Self {
        self.tx_power_watt = watts;
        self
    }

    /// Surface refractivity (N-units, defaults to 315).
    #[must_use]
    pub fn refractivity(mut self, n_s: f64) -> Self {
        self.n_s = n_s;
        self
    }

    /// Single path distance (km). Replaces any previous distances.
    #[must_use]
    pub fn distance(self, km: f64) -> Self {
        self.distances(vec![km])
    }

    /// Path distances to evaluate, in output order (km, required).
    #[must_use]
    pub fn distances(mut self, km: impl Into<Vec<f64>>) -> Self {
        self.distances_km = Some(km.into());
        self
    }

    /// Ground electrical constants (required, or use
    /// [`ground_type`](Self::ground_type)).
    #[must_use]
    pub fn ground(mut self, epsilon: f64, sigma: f64) -> Self {
        self.ground = Some((epsilon, sigma));
        self
    }

    /// Ground electrical constants of a P.368 ground class.
    #[must_use]
    pub fn ground_type(self, ground: GroundType) -> Self {
        let (epsilon, sigma) = ground.constants();
        self.ground(epsilon, sigma)
    }

    /// Antenna polarization (required).
    #[must_use]
    pub fn pol(mut self, pol: Polarization) -> Self {
        self.pol = Some(pol);
        self
    }

    /// Assembles and validates the parameters.
    pub fn build(self) -> Result<Params, LfmfError> {
        let f_mhz = self.f_mhz.ok_or(LfmfError::Builder("freq"))?;
        let distances_km = self.distances_km.ok_or(LfmfError::Builder("distances"))?;
        let (epsilon, sigma) = self.ground.ok_or(LfmfError::Builder("ground"))?;
        let pol = self.pol.ok_or(LfmfError::Builder("pol"))?;

        let params = Params {
            h_tx_meter: self.h_tx_meter,
            h_rx_meter: self.h_rx_meter,
            f_mhz,
            tx_power_watt: self.tx_power_watt,
            n_s: self.n_s,
            distances_km,
            epsilon,
            sigma,
            pol,
        };
        params.validate()?;
        Ok(params)
    }
}
