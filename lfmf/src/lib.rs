//! Native implementation of the ITU-R P.368 LF/MF ground-wave
//! propagation model.
//!
//! Given antenna heights, frequency, surface refractivity and the
//! electrical constants of a smooth homogeneous earth, [`predict`]
//! returns field strength, basic transmission loss and received power
//! for every requested great-circle distance.
//!
//! ```
//! use lfmf::{GroundType, Params, Polarization};
//!
//! let params = Params::builder()
//!     .freq(1.0)
//!     .distances([10.0, 100.0, 1000.0])
//!     .ground_type(GroundType::SeaWater)
//!     .pol(Polarization::Vertical)
//!     .build()?;
//! for prediction in lfmf::predict(&params)? {
//!     println!(
//!         "{:>6} km: {:6.1} dB(µV/m)",
//!         prediction.distance_km, prediction.field_strength_dbuvm
//!     );
//! }
//! # Ok::<(), lfmf::LfmfError>(())
//! ```

mod airy;
mod error;
mod faddeeva;
mod flat_earth;
mod ground;
mod model;
mod params;
mod residue;
mod warnings;

pub use crate::error::{InvalidParameter, LfmfError};
pub use model::{effective_earth_radius_km, transition_distance_km};
pub use params::{GroundType, Output, Params, ParamsBuilder, Polarization};
pub use warnings::Warnings;

use model::Model;

/// Speed of light in vacuum (m/s).
pub const C: f64 = 299_792_458.0;

/// Vacuum permittivity (F/m).
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;

/// Impedance of free space (Ω).
pub const ETA_0: f64 = 376.730_313_668;

/// Calculation method used for a single distance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Sommerfeld-Norton flat earth with a curvature correction.
    FlatEarthCurveCorrection,
    /// Residue series over a spherical earth.
    ResidueSeries,
    /// Blend of both around the transition distance.
    Transition,
}

/// Model outputs at one distance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub distance_km: f64,
    /// Field strength, dB(µV/m).
    pub field_strength_dbuvm: f64,
    /// Loss between isotropic antennas, dB.
    pub basic_transmission_loss_db: f64,
    /// Power available from a short vertical monopole, dBm.
    pub received_power_dbm: f64,
    pub method: Method,
    pub warnings: Warnings,
}

/// A single [`Output`] quantity at one distance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub distance_km: f64,
    pub output: Output,
    /// dB(µV/m) for [`Output::FieldStrength`], dB for
    /// [`Output::TransmissionLoss`].
    pub value_db: f64,
    pub method: Method,
    pub warnings: Warnings,
}

impl Prediction {
    pub fn level(&self, output: Output) -> Level {
        let value_db = match output {
            Output::FieldStrength => self.field_strength_dbuvm,
            Output::TransmissionLoss => self.basic_transmission_loss_db,
        };
        Level {
            distance_km: self.distance_km,
            output,
            value_db,
            method: self.method,
            warnings: self.warnings,
        }
    }
}

/// Returns ground-wave predictions for every distance in
/// `params.distances_km`, in the same order.
///
/// # Parameters
///
/// - `h_tx_meter`, `h_rx_meter`: antenna heights above ground (meters)
/// - `f_mhz`: frequency of signal (MHz)
/// - `tx_power_watt`: transmitter power (watts)
/// - `n_s`: surface refractivity (N-Units, 315 is close to a 4/3 earth)
/// - `distances_km`: great-circle path distances (km)
/// - `epsilon`: relative permittivity
/// - `sigma`: ground conductivity (Siemens/meter)
/// - `pol`: see [`Polarization`]
///
/// # Suggested Surface Parameters
///
/// See [`GroundType`] for the ground classes of ITU-R P.368.
///
/// # Errors
///
/// Every out-of-domain field is reported at once through
/// [`LfmfError::InvalidParameters`]. No partial results are returned.
pub fn predict(params: &Params) -> Result<Vec<Prediction>, LfmfError> {
    params.validate()?;
    let mut model = Model::new(params);
    params
        .distances_km
        .iter()
        .map(|&distance_km| model.predict(distance_km))
        .collect()
}

/// Returns only the requested `output` for every distance in
/// `params.distances_km`, in the same order.
pub fn compute(params: &Params, output: Output) -> Result<Vec<Level>, LfmfError> {
    Ok(predict(params)?
        .iter()
        .map(|prediction| prediction.level(output))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{
        compute, predict, transition_distance_km, GroundType, InvalidParameter, LfmfError, Method,
        Output, Params, Polarization, Prediction, Warnings,
    };
    use approx::assert_abs_diff_eq;

    fn scenario(distances_km: &[f64]) -> Params {
        Params::builder()
            .tx_height(15.)
            .rx_height(3.)
            .freq(0.3)
            .distances(distances_km)
            .ground(15., 0.005)
            .pol(Polarization::Vertical)
            .build()
            .unwrap()
    }

    fn field(params: &Params) -> Vec<f64> {
        compute(params, Output::FieldStrength)
            .unwrap()
            .iter()
            .map(|level| level.value_db)
            .collect()
    }

    /// Norton's plane-earth ground wave (Proc. IRE 29, 1941),
    /// `|A| ≈ (2 + 0.3p) / (2 + p + 0.6p²)`, applied to the 300 mV/m at
    /// 1 km inverse-distance field that ITU-R P.368 uses for 1 kW.
    fn norton_dbuvm(f_mhz: f64, epsilon: f64, sigma: f64, distance_km: f64) -> f64 {
        let lambda_m = 299.792_458 / f_mhz;
        let eta = num_complex::Complex64::new(epsilon, 60. * sigma * lambda_m);
        let p = std::f64::consts::PI * distance_km * 1000. / lambda_m * (eta - 1.).norm()
            / eta.norm_sqr();
        let a = (2. + 0.3 * p) / (2. + p + 0.6 * p * p);
        20. * (300. / distance_km).log10() + 60. + 20. * a.log10()
    }

    #[test]
    fn test_reference_scenario() {
        let predictions = predict(&scenario(&[10., 100., 119.5, 500., 1000.])).unwrap();

        // Inside the radio horizon curvature is negligible at 0.3 MHz.
        assert_abs_diff_eq!(
            predictions[0].field_strength_dbuvm,
            norton_dbuvm(0.3, 15., 0.005, 10.),
            epsilon = 0.5
        );
        // Beyond it there is no closed form to compare against; these
        // guard the residue series against regressions.
        let expected = [88.96, 64.93, 62.52, 34.45, 9.00];
        for (prediction, expected) in predictions.iter().zip(expected) {
            assert_abs_diff_eq!(prediction.field_strength_dbuvm, expected, epsilon = 0.5);
            assert!(prediction.warnings.is_empty(), "{}", prediction.warnings);
        }
        assert!(predictions
            .windows(2)
            .all(|w| w[1].field_strength_dbuvm < w[0].field_strength_dbuvm));

        let methods: Vec<Method> = predictions.iter().map(|p| p.method).collect();
        assert_eq!(
            methods,
            [
                Method::FlatEarthCurveCorrection,
                Method::FlatEarthCurveCorrection,
                Method::Transition,
                Method::ResidueSeries,
                Method::ResidueSeries,
            ]
        );
    }

    #[test]
    fn test_transition_mismatch_is_flagged() {
        // Tall antennas at 30 MHz over low salinity sea: the first-order
        // height gain of the flat earth method drifts from the modes.
        let params = Params::builder()
            .tx_height(50.)
            .rx_height(50.)
            .freq(30.)
            .distances([20., 25.12, 28.2, 40.])
            .ground_type(GroundType::SeaWaterLowSalinity)
            .pol(Polarization::Vertical)
            .build()
            .unwrap();
        let predictions = predict(&params).unwrap();
        assert!(predictions[0].warnings.is_empty());
        for prediction in &predictions[1..3] {
            assert_eq!(prediction.method, Method::Transition);
            assert_eq!(prediction.warnings, Warnings::TRANSITION_MISMATCH);
        }
        assert!(predictions[3].warnings.is_empty());
    }

    #[test]
    fn test_compute_matches_predict() {
        let params = scenario(&[10., 100., 500.]);
        let predictions = predict(&params).unwrap();
        let losses = compute(&params, Output::TransmissionLoss).unwrap();
        assert_eq!(losses.len(), predictions.len());
        for (loss, prediction) in losses.iter().zip(&predictions) {
            assert_eq!(loss.output, Output::TransmissionLoss);
            assert_eq!(loss.distance_km, prediction.distance_km);
            assert_eq!(loss.value_db, prediction.basic_transmission_loss_db);
            // 1 kW: L_b = 141.97 + 20 log f - E
            assert_abs_diff_eq!(
                loss.value_db,
                141.97 + 20. * 0.3f64.log10() - prediction.field_strength_dbuvm,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let sorted = field(&scenario(&[10., 100., 500., 1000.]));
        let shuffled = field(&scenario(&[500., 10., 1000., 100.]));
        assert_eq!(shuffled, vec![sorted[2], sorted[0], sorted[3], sorted[1]]);
    }

    #[test]
    fn test_deterministic() {
        let params = scenario(&[1., 10., 119.5, 800., 5000.]);
        let first = predict(&params).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let params = params.clone();
                std::thread::spawn(move || predict(&params).unwrap())
            })
            .collect();
        for handle in handles {
            let other = handle.join().unwrap();
            for (a, b) in first.iter().zip(&other) {
                assert_eq!(
                    a.field_strength_dbuvm.to_bits(),
                    b.field_strength_dbuvm.to_bits()
                );
            }
        }
    }

    #[test]
    fn test_continuous_at_transition_distance() {
        let d_test = transition_distance_km(0.3);
        let e = field(&scenario(&[d_test * (1. - 1e-9), d_test * (1. + 1e-9)]));
        assert!((e[0] - e[1]).abs() < 0.1);
        // And across both edges of the blend window.
        for edge in [d_test / 1.1, d_test * 1.1] {
            let e = field(&scenario(&[edge * (1. - 1e-9), edge * (1. + 1e-9)]));
            assert!((e[0] - e[1]).abs() < 0.1);
        }
    }

    #[test]
    fn test_zero_distance_rejected() {
        let params = Params {
            distances_km: vec![10., 0.],
            ..scenario(&[10.])
        };
        let err = predict(&params).unwrap_err();
        let LfmfError::InvalidParameters(errs) = err else {
            panic!("expected invalid parameters");
        };
        assert_eq!(
            errs,
            vec![InvalidParameter::Distance {
                index: 1,
                value: 0.
            }]
        );
    }

    #[test]
    fn test_every_violation_reported() {
        let params = Params {
            h_rx_meter: f64::NAN,
            tx_power_watt: -1.,
            epsilon: 0.,
            ..scenario(&[10.])
        };
        let Err(LfmfError::InvalidParameters(errs)) = compute(&params, Output::FieldStrength)
        else {
            panic!("expected invalid parameters");
        };
        assert_eq!(errs.len(), 3);
    }

    #[test]
    fn test_distance_warnings() {
        // λ = 1 km at 0.3 MHz.
        let predictions = predict(&scenario(&[0.5, 12_000.])).unwrap();
        assert_eq!(predictions[0].warnings, Warnings::NEAR_FIELD);
        assert_eq!(predictions[1].warnings, Warnings::DISTANCE);
        assert!(predictions[1].field_strength_dbuvm.is_finite());
    }

    #[test]
    fn test_envelope_warnings_apply_to_every_distance() {
        let params = Params::builder()
            .tx_height(60.)
            .freq(0.3)
            .distances([10., 1000.])
            .ground(15., 0.005)
            .pol(Polarization::Vertical)
            .build()
            .unwrap();
        for prediction in predict(&params).unwrap() {
            assert!(prediction.warnings.contains(Warnings::TX_HEIGHT));
        }
    }

    #[test]
    fn test_horizontal_polarization_is_weaker() {
        let build = |pol| {
            Params::builder()
                .tx_height(10.)
                .rx_height(2.)
                .freq(1.)
                .distances([1., 50., 200.])
                .ground_type(GroundType::Land)
                .pol(pol)
                .build()
                .unwrap()
        };
        let vertical = field(&build(Polarization::Vertical));
        let horizontal = field(&build(Polarization::Horizontal));
        for (v, h) in vertical.iter().zip(&horizontal) {
            assert!(h + 40. < *v);
        }
    }

    #[test]
    fn test_field_decreases_with_distance() {
        let distances: Vec<f64> = (0..=160).map(|i| 10f64.powf(f64::from(i) / 40.)).collect();
        for (f_mhz, ground) in [(0.3, GroundType::MediumDryGround), (1., GroundType::SeaWater)] {
            let params = Params::builder()
                .freq(f_mhz)
                .distances(distances.clone())
                .ground_type(ground)
                .pol(Polarization::Vertical)
                .build()
                .unwrap();
            let e = field(&params);
            assert!(e.windows(2).all(|w| w[1] <= w[0]));
        }
    }

    #[test]
    fn test_results_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Params>();
        assert_send_sync::<Prediction>();
        assert_send_sync::<LfmfError>();
    }
}
