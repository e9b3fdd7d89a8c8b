//! Weight serialization/deserialization (feature: `serde`).
//!
//! The weight vector is the only persisted state. Shape parameters are NOT stored: they
//! are part of the network type, so a file can only be loaded into a network of the same
//! shape, which is checked through the weight count.
//!
//! The persisted form is the bare weight sequence, with no header of its own:
//! - JSON via `serde_json`: a plain array of numbers
//! - binary via `bincode`: its length prefix followed by the little-endian `f32`s
//!
//! All deserialization validates the weight count and that every weight is finite.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CascadeConfig, CascadeNetwork, Error, Result};

/// Weight vector as persisted; serializes exactly like the inner `Vec<f32>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedWeights {
    /// Packed neuron by neuron, in evaluation order.
    pub weights: Vec<f32>,
}

impl SerializedWeights {
    pub fn validate(&self) -> Result<()> {
        if self.weights.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "weights must contain only finite values".to_owned(),
            ));
        }
        Ok(())
    }
}

impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    From<&CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>> for SerializedWeights
{
    fn from(net: &CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>) -> Self {
        Self {
            weights: net.weights().to_vec(),
        }
    }
}

impl<const NUM_INPUT: usize, const NUM_ONES: usize, const NUM_OUTPUT: usize, const NUM_NEURONS: usize>
    CascadeNetwork<NUM_INPUT, NUM_ONES, NUM_OUTPUT, NUM_NEURONS>
{
    /// Restore a network from serialized weights, keeping `config` for the runtime policy.
    pub fn from_serialized(config: CascadeConfig, value: SerializedWeights) -> Result<Self> {
        if let Err(e) = value.validate() {
            log::warn!("rejected serialized weights: {e}");
            return Err(e);
        }
        Self::from_weights(config, value.weights)
    }

    /// Replace the weights in place, keeping the current config.
    pub fn restore(&mut self, value: SerializedWeights) -> Result<()> {
        *self = Self::from_serialized(*self.config(), value)?;
        Ok(())
    }

    /// Serialize the weights to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        let ser = SerializedWeights::from(self);
        serde_json::to_string_pretty(&ser)
            .map_err(|e| Error::InvalidData(format!("failed to serialize weights: {e}")))
    }

    /// Serialize the weights to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        let ser = SerializedWeights::from(self);
        serde_json::to_string(&ser)
            .map_err(|e| Error::InvalidData(format!("failed to serialize weights: {e}")))
    }

    /// Parse weights from a JSON string.
    pub fn from_json_str(config: CascadeConfig, s: &str) -> Result<Self> {
        let ser: SerializedWeights = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse weights json: {e}")))?;
        Self::from_serialized(config, ser)
    }

    /// Save the weights to a JSON file (pretty-printed).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        let p = path.as_ref();
        std::fs::write(p, s)
            .map_err(|e| Error::InvalidData(format!("failed to write {}: {e}", p.display())))?;
        log::info!("saved {} weights to {}", self.weights().len(), p.display());
        Ok(())
    }

    /// Load weights from a JSON file.
    pub fn load_json<P: AsRef<Path>>(config: CascadeConfig, path: P) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::InvalidData(format!("failed to read {}: {e}", p.display())))?;
        let net = Self::from_json_str(config, &s)?;
        log::info!("loaded {} weights from {}", net.weights().len(), p.display());
        Ok(net)
    }

    /// Serialize the weights with `bincode`.
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        let ser = SerializedWeights::from(self);
        bincode::serialize(&ser)
            .map_err(|e| Error::InvalidData(format!("failed to serialize weights: {e}")))
    }

    /// Parse weights from `bincode` bytes.
    pub fn from_bincode(config: CascadeConfig, bytes: &[u8]) -> Result<Self> {
        let ser: SerializedWeights = bincode::deserialize(bytes)
            .map_err(|e| Error::InvalidData(format!("failed to decode weights: {e}")))?;
        Self::from_serialized(config, ser)
    }

    /// Save the weights to a binary file.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let p = path.as_ref();
        let file = File::create(p)
            .map_err(|e| Error::InvalidData(format!("failed to create {}: {e}", p.display())))?;
        let ser = SerializedWeights::from(self);
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, &ser)
            .map_err(|e| Error::InvalidData(format!("failed to write {}: {e}", p.display())))?;
        writer
            .flush()
            .map_err(|e| Error::InvalidData(format!("failed to flush {}: {e}", p.display())))?;
        log::info!("saved {} weights to {}", self.weights().len(), p.display());
        Ok(())
    }

    /// Load weights from a binary file.
    pub fn load_bincode<P: AsRef<Path>>(config: CascadeConfig, path: P) -> Result<Self> {
        let p = path.as_ref();
        let file = File::open(p)
            .map_err(|e| Error::InvalidData(format!("failed to open {}: {e}", p.display())))?;
        let ser: SerializedWeights = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| Error::InvalidData(format!("failed to decode {}: {e}", p.display())))?;
        let net = Self::from_serialized(config, ser)?;
        log::info!("loaded {} weights from {}", net.weights().len(), p.display());
        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Activation, Normalization};

    type Net = CascadeNetwork<2, 1, 3, 5>;

    #[test]
    fn golden_json_is_stable() {
        let net = CascadeNetwork::<1, 1, 1, 1>::from_weights(CascadeConfig::default(), vec![0.5, -1.0])
            .unwrap();
        assert_eq!(
            net.to_json_string().unwrap(),
            "[0.5,-1.0]"
        );
    }

    #[test]
    fn bincode_is_length_prefix_then_raw_weights() {
        let net = CascadeNetwork::<1, 1, 1, 1>::from_weights(CascadeConfig::default(), vec![0.5, -1.0])
            .unwrap();
        let bytes = net.to_bincode().unwrap();

        let mut expected = 2_u64.to_le_bytes().to_vec();
        expected.extend_from_slice(&0.5_f32.to_le_bytes());
        expected.extend_from_slice(&(-1.0_f32).to_le_bytes());
        assert_eq!(bytes, expected);

        let net = Net::new_with_seed(4);
        assert_eq!(net.to_bincode().unwrap(), bincode::serialize(net.weights()).unwrap());
        assert_eq!(net.to_bincode().unwrap().len(), 8 + 4 * Net::WEIGHT_COUNT);
    }

    #[test]
    fn json_roundtrip_preserves_weights_exactly() {
        let net = Net::new_with_seed(17);
        let json = net.to_json_string_pretty().unwrap();
        let loaded = Net::from_json_str(CascadeConfig::default(), &json).unwrap();
        assert_eq!(loaded.weights(), net.weights());
    }

    #[test]
    fn bincode_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cascade.bin");

        let cfg = CascadeConfig {
            activation: Activation::LeakyRectifier { alpha: 0.01 },
            normalization: Normalization::Stable,
            ..CascadeConfig::default()
        };
        let net = Net::new_with_seed(2);
        net.save_bincode(&path).unwrap();

        let loaded = Net::load_bincode(cfg, &path).unwrap();
        assert_eq!(loaded.weights(), net.weights());
        assert_eq!(loaded.config(), &cfg);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn save_bincode_reports_errors_from_the_final_flush() {
        // Writes to /dev/full fail with ENOSPC; the payload fits in the write buffer.
        let net = Net::new_with_seed(1);
        let err = net.save_bincode("/dev/full").unwrap_err();
        assert!(format!("{err}").contains("/dev/full"));
    }

    #[test]
    fn json_file_roundtrip_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cascade.json");

        let saved = Net::new_with_seed(8);
        saved.save_json(&path).unwrap();

        let mut other = Net::new_with_seed(9);
        assert_ne!(other.weights(), saved.weights());
        let loaded = Net::load_json(CascadeConfig::default(), &path).unwrap();
        other.restore(SerializedWeights::from(&loaded)).unwrap();
        assert_eq!(other.weights(), saved.weights());
    }

    #[test]
    fn rejects_wrong_length_and_non_finite_weights() {
        let err = Net::from_json_str(CascadeConfig::default(), "[0.5,-1.0]").unwrap_err();
        assert!(format!("{err}").contains("weight count"));

        let mut weights = vec![0.0_f32; Net::WEIGHT_COUNT];
        weights[3] = f32::INFINITY;
        let bytes = bincode::serialize(&weights).unwrap();
        assert!(Net::from_bincode(CascadeConfig::default(), &bytes).is_err());
    }

    #[test]
    fn rejects_weights_of_another_shape() {
        let small = CascadeNetwork::<1, 1, 1, 2>::new_with_seed(0);
        let bytes = small.to_bincode().unwrap();
        assert!(Net::from_bincode(CascadeConfig::default(), &bytes).is_err());
    }

    #[test]
    fn config_serializes_with_tagged_activation() {
        let cfg = CascadeConfig {
            activation: Activation::LeakyRectifier { alpha: 0.5 },
            ..CascadeConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(
            json,
            r#"{"activation":{"kind":"leaky_rectifier","alpha":0.5},"normalization":"add_back_max","gradient":"accumulate"}"#
        );
        let back: CascadeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
