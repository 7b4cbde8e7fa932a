use serde::{Deserialize, Serialize};

use crate::error::{BuildpackError, Result};

/// Wallet imported for publishing, as reported by `sui keytool import --json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployWallet {
    #[serde(rename = "suiAddress")]
    pub address: String,

    #[serde(rename = "keyScheme")]
    pub key_scheme: String,
}

impl DeployWallet {
    /// Decode the JSON object printed by `keytool import --json`.
    ///
    /// The CLI may print warnings around the JSON document, so decoding
    /// starts at the first `{` and ends at the last `}`.
    pub fn from_import_output(output: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(output);
        let json = match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => &text[start..=end],
            _ => text.trim(),
        };

        serde_json::from_str(json).map_err(|e| BuildpackError::parse("sui deploy key", e))
    }

    /// Fail unless the imported key uses the expected scheme
    pub fn verify_scheme(&self, expected: &str) -> Result<()> {
        if self.key_scheme != expected {
            return Err(BuildpackError::Verification {
                what: "sui deploy key scheme".to_string(),
                expected: expected.to_string(),
                actual: self.key_scheme.clone(),
            });
        }
        Ok(())
    }
}
