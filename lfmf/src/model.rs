use crate::{
    error::LfmfError,
    faddeeva::Faddeeva,
    flat_earth, ground,
    params::{limits, Params},
    residue::Modes,
    warnings::Warnings,
    Method, Prediction, C, ETA_0,
};
use log::{debug, trace};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Actual earth radius in km.
const EARTH_RADIUS_KM: f64 = 6370.0;

/// Regimes are blended for `d_test / RATIO <= d <= d_test * RATIO`.
const TRANSITION_RATIO: f64 = 1.1;

/// Flat earth vs residue series disagreement that raises a warning.
const TRANSITION_MISMATCH_DB: f64 = 0.5;

/// Gain of a short vertical monopole over a perfectly conducting plane
/// (linear).
const MONOPOLE_GAIN: f64 = 3.0;

/// Antenna gain applied to received power and transmission loss (dBi).
const MONOPOLE_GAIN_DBI: f64 = 4.77;

/// Field strength to received power offset at 1 MHz (dB).
const RECEIVED_POWER_OFFSET_DB: f64 = 77.2;

/// Effective earth radius (km) for surface refractivity `n_s`.
pub fn effective_earth_radius_km(n_s: f64) -> f64 {
    EARTH_RADIUS_KM / (1.0 - 0.04665 * (0.005577 * n_s).exp())
}

/// Distance (km) at which the flat earth method hands over to the
/// residue series.
pub fn transition_distance_km(f_mhz: f64) -> f64 {
    80.0 / f_mhz.cbrt()
}

/// Field strength (dBµV/m) of a short monopole radiating
/// `tx_power_watt` at `distance_km`, given the ground-wave attenuation
/// `attenuation_db` relative to a flat perfect conductor.
pub fn field_strength_dbuvm(tx_power_watt: f64, distance_km: f64, attenuation_db: f64) -> f64 {
    // sqrt(Ω·W) / km == mV/m
    let e_0 = (ETA_0 * tx_power_watt * MONOPOLE_GAIN / (4.0 * PI)).sqrt() / distance_km;
    20.0 * e_0.log10() + attenuation_db + 60.0
}

/// Power (dBm) available from a short monopole in a field of
/// `field_strength_dbuvm`.
pub fn received_power_dbm(field_strength_dbuvm: f64, f_mhz: f64) -> f64 {
    field_strength_dbuvm + MONOPOLE_GAIN_DBI - 20.0 * f_mhz.log10() - RECEIVED_POWER_OFFSET_DB
}

/// Basic transmission loss (dB), i.e. between isotropic antennas.
pub fn basic_transmission_loss_db(tx_power_watt: f64, received_power_dbm: f64) -> f64 {
    10.0 * tx_power_watt.log10() + 30.0 + 2.0 * MONOPOLE_GAIN_DBI - received_power_dbm
}

/// Quantities derived once per call and shared by every distance.
pub(crate) struct Model {
    f_mhz: f64,
    tx_power_watt: f64,
    wavelength_km: f64,
    a_e_km: f64,
    nu: f64,
    q: Complex64,
    y_1: f64,
    y_2: f64,
    d_test_km: f64,
    envelope: Warnings,
    faddeeva: Faddeeva,
    modes: Modes,
}

impl Model {
    /// `params` must already be validated.
    pub fn new(params: &Params) -> Self {
        let f_hz = params.f_mhz * 1e6;
        let wavelength_km = C / f_hz / 1000.0;
        let k = 2.0 * PI / wavelength_km;
        let a_e_km = effective_earth_radius_km(params.n_s);
        let nu = (k * a_e_km / 2.0).cbrt();

        let eta = ground::complex_permittivity(params.epsilon, params.sigma, f_hz);
        let delta = ground::surface_impedance(eta, params.pol);
        let q = Complex64::i() * nu * delta;

        let y_1 = k * params.h_tx_meter / 1000.0 / nu;
        let y_2 = k * params.h_rx_meter / 1000.0 / nu;
        let d_test_km = transition_distance_km(params.f_mhz);

        debug!(
            "lfmf: f = {} MHz, a_e = {a_e_km:.1} km, eta = {eta:.4}, q = {q:.4}, d_test = {d_test_km:.2} km",
            params.f_mhz
        );

        Self {
            f_mhz: params.f_mhz,
            tx_power_watt: params.tx_power_watt,
            wavelength_km,
            a_e_km,
            nu,
            q,
            y_1,
            y_2,
            d_test_km,
            envelope: params.envelope_warnings(),
            faddeeva: Faddeeva::new(),
            modes: Modes::new(q, y_1, y_2),
        }
    }

    pub fn predict(&mut self, distance_km: f64) -> Result<Prediction, LfmfError> {
        let (attenuation_db, method, warnings) = self.attenuation_db(distance_km)?;
        let warnings = warnings
            | self.envelope
            | Warnings::NONE
                .with(Warnings::DISTANCE, distance_km > limits::MAX_DISTANCE_KM)
                .with(Warnings::NEAR_FIELD, distance_km < self.wavelength_km);

        let field_strength_dbuvm =
            field_strength_dbuvm(self.tx_power_watt, distance_km, attenuation_db);
        let received_power_dbm = received_power_dbm(field_strength_dbuvm, self.f_mhz);
        let basic_transmission_loss_db =
            basic_transmission_loss_db(self.tx_power_watt, received_power_dbm);

        Ok(Prediction {
            distance_km,
            field_strength_dbuvm,
            basic_transmission_loss_db,
            received_power_dbm,
            method,
            warnings,
        })
    }

    /// Returns `20 log10 |W|` at `distance_km`.
    fn attenuation_db(&mut self, distance_km: f64) -> Result<(f64, Method, Warnings), LfmfError> {
        let lower_km = self.d_test_km / TRANSITION_RATIO;
        let upper_km = self.d_test_km * TRANSITION_RATIO;

        let result = if distance_km < lower_km {
            (self.flat_earth_db(distance_km), Method::FlatEarthCurveCorrection, Warnings::NONE)
        } else if distance_km > upper_km {
            let (db, warnings) = self.residue_series_db(distance_km)?;
            (db, Method::ResidueSeries, warnings)
        } else {
            let flat_db = self.flat_earth_db(distance_km);
            let (series_db, warnings) = self.residue_series_db(distance_km)?;
            let weight = (distance_km / lower_km).ln() / (upper_km / lower_km).ln();
            let mismatch = (series_db - flat_db).abs() > TRANSITION_MISMATCH_DB;
            (
                flat_db + weight * (series_db - flat_db),
                Method::Transition,
                warnings.with(Warnings::TRANSITION_MISMATCH, mismatch),
            )
        };

        if result.0.is_finite() {
            trace!("{distance_km} km: {:.3} dB via {:?}", result.0, result.1);
            Ok(result)
        } else {
            Err(LfmfError::NumericOverflow { distance_km })
        }
    }

    fn x(&self, distance_km: f64) -> f64 {
        self.nu * distance_km / self.a_e_km
    }

    fn flat_earth_db(&self, distance_km: f64) -> f64 {
        let w = flat_earth::attenuation(
            self.x(distance_km),
            self.q,
            self.y_1,
            self.y_2,
            &self.faddeeva,
        );
        20.0 * w.norm().log10()
    }

    fn residue_series_db(&mut self, distance_km: f64) -> Result<(f64, Warnings), LfmfError> {
        let series = self.modes.sum(self.x(distance_km))?;
        if series.converged {
            trace!(
                "{distance_km} km: {} residue terms, {} modes located",
                series.terms,
                self.modes.located()
            );
        } else {
            debug!("residue series truncated at {} terms for {distance_km} km", series.terms);
        }
        Ok((
            20.0 * series.value.norm().log10(),
            Warnings::NONE.with(Warnings::SERIES_TRUNCATED, !series.converged),
        ))
    }
}
