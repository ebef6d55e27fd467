//! User Range Accuracy
/// Nominal upper bound (meters) of each URA index.
/// Index 15 means no accuracy prediction is available.
const URA_NOMINAL_M: [f64; 16] = [
    2.4, 3.4, 4.85, 6.85, 9.65, 13.65, 24.0, 48.0, 96.0, 192.0, 384.0, 768.0, 1536.0, 3072.0,
    6144.0, 9.999999999999E99,
];

/// Converts URA index to nominal accuracy in meters.
/// Indexes beyond the table saturate to "no prediction".
pub fn ura_to_accuracy(ura: u8) -> f64 {
    URA_NOMINAL_M[(ura as usize).min(URA_NOMINAL_M.len() - 1)]
}

/// Converts an accuracy in meters to the smallest URA index
/// whose nominal bound covers it.
pub fn accuracy_to_ura(accuracy_m: f64) -> u8 {
    URA_NOMINAL_M
        .iter()
        .position(|bound| accuracy_m <= *bound)
        .unwrap_or(URA_NOMINAL_M.len() - 1) as u8
}
