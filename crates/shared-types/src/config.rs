//! Platform business policy knobs.
//!
//! Conversion rates are operator policy, not structural invariants, so they
//! live here rather than inside the ledger engine.

/// Business configuration shared by the workflows.
#[derive(Clone, Debug)]
pub struct PlatformConfig {
    /// Points awarded per liter of confirmed deposit.
    pub points_per_liter: u64,
    /// Smallest accepted deposit volume in liters.
    pub minimum_deposit_liters: f64,
    /// Estimated CO2 savings per liter, in kg. Applied rounded per deposit.
    pub co2_kg_per_liter: f64,
    /// Prefix of generated voucher codes.
    pub code_prefix: &'static str,
    /// Number of digits in the random part of a voucher code.
    pub code_digits: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            points_per_liter: 100,
            minimum_deposit_liters: 0.5,
            co2_kg_per_liter: 2.5,
            code_prefix: "JB",
            code_digits: 6,
        }
    }
}

impl PlatformConfig {
    /// Points for a deposit volume: `floor(liters * points_per_liter)`.
    #[must_use]
    pub fn points_for(&self, liters: f64) -> u64 {
        (liters * self.points_per_liter as f64).floor() as u64
    }

    /// Rounded CO2 savings in kg for a deposit volume.
    #[must_use]
    pub fn co2_for(&self, liters: f64) -> u64 {
        (liters * self.co2_kg_per_liter).round() as u64
    }
}
