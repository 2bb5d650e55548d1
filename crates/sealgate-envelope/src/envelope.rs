//! The portable access envelope and its codec.
//!
//! The envelope is the only artifact that crosses the storage boundary:
//! ciphertext, the content hash binding it to the plaintext, the
//! condition set gating decryption, and format metadata. Two condition
//! fields exist on the wire for backward compatibility; normalization
//! centralizes the invariant that both are identical views of one set.

use sealgate_core::ContentHash;
use serde::{Deserialize, Serialize};

use crate::conditions::ConditionSet;
use crate::error::{EnvelopeError, Result};

/// Chain assumed when an envelope omits one.
pub const DEFAULT_CHAIN: &str = "ethereum";

/// Data-type tag assumed when an envelope omits one.
pub const DEFAULT_DATA_TYPE: &str = "string";

/// Scheme version assumed when an envelope omits one.
pub const DEFAULT_VERSION: &str = "symmetricKey";

/// Defaults applied identically on the encode and decode paths.
///
/// Keeping both paths on one record is what guarantees that an envelope
/// encoded with fields omitted decodes back to the same normal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeDefaults {
    pub chain: String,
    pub data_type: String,
    pub version: String,
}

impl Default for EnvelopeDefaults {
    fn default() -> Self {
        Self {
            chain: DEFAULT_CHAIN.to_string(),
            data_type: DEFAULT_DATA_TYPE.to_string(),
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

/// The envelope as persisted and transmitted (JSON, camelCase).
///
/// Optional fields reflect what older producers omit; [`validate`]
/// turns this into a fully populated [`AccessEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnvelope {
    /// Hex-encoded ciphertext from the network's encryption primitive.
    pub ciphertext: String,

    /// Hex-encoded content hash of the plaintext.
    pub data_to_encrypt_hash: String,

    /// Canonical condition field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control_conditions: Option<ConditionSet>,

    /// Legacy condition field kept for older consumers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified_access_control_conditions: Option<ConditionSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl RawEnvelope {
    /// Parse a raw envelope from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EnvelopeError::Serialization(e.to_string()))
    }

    /// Serialize to JSON text.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| EnvelopeError::Serialization(e.to_string()))
    }
}

/// A validated, normalized envelope.
///
/// Every field the network requires is present; the condition set is
/// non-empty. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEnvelope {
    pub ciphertext: String,
    pub data_to_encrypt_hash: ContentHash,
    pub conditions: ConditionSet,
    pub chain: String,
    pub data_type: String,
    pub version: String,
}

impl AccessEnvelope {
    /// Assemble a fresh envelope on the encrypt path.
    ///
    /// Applies the same defaults the decode path applies, so a
    /// round-trip through the wire form is lossless.
    pub fn assemble(
        ciphertext: String,
        data_to_encrypt_hash: ContentHash,
        conditions: ConditionSet,
        chain: Option<String>,
        defaults: &EnvelopeDefaults,
    ) -> Result<Self> {
        if conditions.is_empty() {
            return Err(EnvelopeError::MissingConditions);
        }
        if ciphertext.is_empty() {
            return Err(EnvelopeError::Malformed("empty ciphertext".to_string()));
        }
        Ok(Self {
            ciphertext,
            data_to_encrypt_hash,
            conditions,
            chain: chain.unwrap_or_else(|| defaults.chain.clone()),
            data_type: defaults.data_type.clone(),
            version: defaults.version.clone(),
        })
    }

    /// Render the wire form, with the condition set duplicated under
    /// both accepted field names.
    pub fn to_raw(&self) -> RawEnvelope {
        RawEnvelope {
            ciphertext: self.ciphertext.clone(),
            data_to_encrypt_hash: self.data_to_encrypt_hash.to_hex(),
            access_control_conditions: Some(self.conditions.clone()),
            unified_access_control_conditions: Some(self.conditions.clone()),
            chain: Some(self.chain.clone()),
            data_type: Some(self.data_type.clone()),
            version: Some(self.version.clone()),
        }
    }

    /// Serialize the wire form to JSON text.
    pub fn to_json(&self) -> Result<String> {
        self.to_raw().to_json()
    }
}

/// Validate and normalize a raw envelope.
///
/// Rules, applied before any network interaction:
/// - both condition fields present and unequal fails with
///   [`EnvelopeError::ConditionSetMismatch`];
/// - exactly one present populates the other by copy;
/// - neither present, or an empty set, fails with
///   [`EnvelopeError::MissingConditions`];
/// - missing chain / data-type / version take the configured defaults.
pub fn validate(raw: &RawEnvelope, defaults: &EnvelopeDefaults) -> Result<AccessEnvelope> {
    let conditions = match (
        &raw.access_control_conditions,
        &raw.unified_access_control_conditions,
    ) {
        (Some(canonical), Some(legacy)) => {
            if canonical != legacy {
                return Err(EnvelopeError::ConditionSetMismatch);
            }
            canonical.clone()
        }
        (Some(set), None) | (None, Some(set)) => set.clone(),
        (None, None) => return Err(EnvelopeError::MissingConditions),
    };

    if conditions.is_empty() {
        return Err(EnvelopeError::MissingConditions);
    }

    if raw.ciphertext.is_empty() {
        return Err(EnvelopeError::Malformed("empty ciphertext".to_string()));
    }

    let data_to_encrypt_hash = ContentHash::from_hex(&raw.data_to_encrypt_hash)
        .map_err(|_| EnvelopeError::Malformed(format!(
            "bad content hash: {}",
            raw.data_to_encrypt_hash
        )))?;

    Ok(AccessEnvelope {
        ciphertext: raw.ciphertext.clone(),
        data_to_encrypt_hash,
        conditions,
        chain: raw.chain.clone().unwrap_or_else(|| defaults.chain.clone()),
        data_type: raw
            .data_type
            .clone()
            .unwrap_or_else(|| defaults.data_type.clone()),
        version: raw
            .version
            .clone()
            .unwrap_or_else(|| defaults.version.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::AccessCondition;

    fn conditions() -> ConditionSet {
        ConditionSet::single(AccessCondition::balance_at_least("ethereum", 0))
    }

    fn raw(canonical: Option<ConditionSet>, legacy: Option<ConditionSet>) -> RawEnvelope {
        RawEnvelope {
            ciphertext: "aabb".to_string(),
            data_to_encrypt_hash: ContentHash::digest(b"plaintext").to_hex(),
            access_control_conditions: canonical,
            unified_access_control_conditions: legacy,
            chain: None,
            data_type: None,
            version: None,
        }
    }

    #[test]
    fn test_single_field_is_copied_to_both() {
        let defaults = EnvelopeDefaults::default();

        let from_canonical = validate(&raw(Some(conditions()), None), &defaults).unwrap();
        let from_legacy = validate(&raw(None, Some(conditions())), &defaults).unwrap();
        assert_eq!(from_canonical, from_legacy);

        let wire = from_canonical.to_raw();
        assert_eq!(
            wire.access_control_conditions,
            wire.unified_access_control_conditions
        );
    }

    #[test]
    fn test_diverging_fields_rejected() {
        let other = ConditionSet::single(AccessCondition::balance_at_least("ethereum", 999));
        let err = validate(&raw(Some(conditions()), Some(other)), &EnvelopeDefaults::default())
            .unwrap_err();
        assert!(matches!(err, EnvelopeError::ConditionSetMismatch));
    }

    #[test]
    fn test_missing_conditions_rejected() {
        let err = validate(&raw(None, None), &EnvelopeDefaults::default()).unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingConditions));

        let err = validate(
            &raw(Some(ConditionSet::new()), None),
            &EnvelopeDefaults::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingConditions));
    }

    #[test]
    fn test_defaults_applied_on_decode() {
        let envelope = validate(&raw(Some(conditions()), None), &EnvelopeDefaults::default())
            .unwrap();
        assert_eq!(envelope.chain, DEFAULT_CHAIN);
        assert_eq!(envelope.data_type, DEFAULT_DATA_TYPE);
        assert_eq!(envelope.version, DEFAULT_VERSION);
    }

    #[test]
    fn test_explicit_fields_win_over_defaults() {
        let mut r = raw(Some(conditions()), None);
        r.chain = Some("polygon".to_string());
        r.version = Some("v2".to_string());

        let envelope = validate(&r, &EnvelopeDefaults::default()).unwrap();
        assert_eq!(envelope.chain, "polygon");
        assert_eq!(envelope.version, "v2");
        assert_eq!(envelope.data_type, DEFAULT_DATA_TYPE);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let defaults = EnvelopeDefaults::default();
        let once = validate(&raw(None, Some(conditions())), &defaults).unwrap();
        let twice = validate(&once.to_raw(), &defaults).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_assemble_matches_decode_path() {
        let defaults = EnvelopeDefaults::default();
        let hash = ContentHash::digest(b"plaintext");

        let assembled = AccessEnvelope::assemble(
            "aabb".to_string(),
            hash,
            conditions(),
            None,
            &defaults,
        )
        .unwrap();

        let decoded = validate(&assembled.to_raw(), &defaults).unwrap();
        assert_eq!(assembled, decoded);
    }

    #[test]
    fn test_assemble_rejects_empty_inputs() {
        let defaults = EnvelopeDefaults::default();
        let hash = ContentHash::digest(b"p");

        assert!(matches!(
            AccessEnvelope::assemble("ct".into(), hash, ConditionSet::new(), None, &defaults),
            Err(EnvelopeError::MissingConditions)
        ));
        assert!(matches!(
            AccessEnvelope::assemble(String::new(), hash, conditions(), None, &defaults),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let mut r = raw(Some(conditions()), None);
        r.data_to_encrypt_hash = "zz".to_string();
        assert!(matches!(
            validate(&r, &EnvelopeDefaults::default()),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_preserves_omitted_fields() {
        let r = raw(Some(conditions()), None);
        let json = r.to_json().unwrap();

        // Omitted fields stay off the wire entirely
        assert!(!json.contains("unifiedAccessControlConditions"));
        assert!(!json.contains("dataType"));

        let parsed = RawEnvelope::from_json(&json).unwrap();
        assert_eq!(r, parsed);
    }
}
