//! Deterministic fingerprints of run inputs.
//!
//! - `dataset_hash`: BLAKE3 over every bar's date and OHLCV values.
//! - `config_hash`: BLAKE3 over the canonical JSON of a configuration.
//!
//! Two predictions with the same pair of hashes used the same bars and the
//! same settings, so their reports are directly comparable.

use serde::Serialize;

use crate::domain::Bar;

/// Hex-encoded BLAKE3 hash of the bar sequence, in order.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        match bar.volume {
            Some(v) => {
                hasher.update(&[1]);
                hasher.update(&v.to_le_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Hex-encoded BLAKE3 hash of a configuration's JSON form.
///
/// Field order follows struct declaration order, which serde_json keeps
/// stable, so equal configurations always hash equally.
pub fn config_hash<T: Serialize>(config: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(config)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}
