//! Proptest generators for property-based testing.

use proptest::prelude::*;

use sealgate_core::ContentHash;
use sealgate_envelope::{
    AccessCondition, Comparator, ConditionSet, RawEnvelope, ReturnValueTest,
    CONDITION_TYPE_EVM_BASIC, PARAM_USER_ADDRESS,
};

/// Generate a comparator.
pub fn comparator() -> impl Strategy<Value = Comparator> {
    prop_oneof![
        Just(Comparator::GreaterOrEqual),
        Just(Comparator::Greater),
        Just(Comparator::Equal),
        Just(Comparator::NotEqual),
        Just(Comparator::Less),
        Just(Comparator::LessOrEqual),
    ]
}

/// Generate a numeric return-value test.
pub fn return_value_test() -> impl Strategy<Value = ReturnValueTest> {
    (comparator(), 0u128..=u128::MAX / 2).prop_map(|(comparator, value)| ReturnValueTest {
        comparator,
        value: value.to_string(),
    })
}

/// Generate a chain name.
pub fn chain_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{2,15}".prop_map(String::from)
}

/// Generate a balance-query access condition.
pub fn access_condition() -> impl Strategy<Value = AccessCondition> {
    (chain_name(), return_value_test()).prop_map(|(chain, return_value_test)| AccessCondition {
        condition_type: CONDITION_TYPE_EVM_BASIC.to_string(),
        contract_address: String::new(),
        standard_contract_type: String::new(),
        chain,
        method: "eth_getBalance".to_string(),
        parameters: vec![PARAM_USER_ADDRESS.to_string(), "latest".to_string()],
        return_value_test,
    })
}

/// Generate a non-empty condition set.
pub fn condition_set(max_len: usize) -> impl Strategy<Value = ConditionSet> {
    prop::collection::vec(access_condition(), 1..=max_len).prop_map(ConditionSet::from)
}

/// Generate hex ciphertext bytes of plausible length.
pub fn ciphertext() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 28..256).prop_map(hex::encode)
}

/// Which condition fields a generated raw envelope populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    CanonicalOnly,
    LegacyOnly,
    Both,
}

/// Generate a field layout.
pub fn field_layout() -> impl Strategy<Value = FieldLayout> {
    prop_oneof![
        Just(FieldLayout::CanonicalOnly),
        Just(FieldLayout::LegacyOnly),
        Just(FieldLayout::Both),
    ]
}

/// Generate a well-formed raw envelope with varying field presence.
pub fn raw_envelope() -> impl Strategy<Value = RawEnvelope> {
    (
        ciphertext(),
        any::<[u8; 32]>(),
        condition_set(3),
        field_layout(),
        prop::option::of(chain_name()),
        prop::option::of(Just("string".to_string())),
        prop::option::of(Just("symmetricKey".to_string())),
    )
        .prop_map(
            |(ciphertext, hash, conditions, layout, chain, data_type, version)| {
                let (canonical, legacy) = match layout {
                    FieldLayout::CanonicalOnly => (Some(conditions), None),
                    FieldLayout::LegacyOnly => (None, Some(conditions)),
                    FieldLayout::Both => (Some(conditions.clone()), Some(conditions)),
                };
                RawEnvelope {
                    ciphertext,
                    data_to_encrypt_hash: ContentHash::from_bytes(hash).to_hex(),
                    access_control_conditions: canonical,
                    unified_access_control_conditions: legacy,
                    chain,
                    data_type,
                    version,
                }
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealgate_envelope::{validate, EnvelopeDefaults, EnvelopeError};

    proptest! {
        #[test]
        fn test_validate_is_idempotent(raw in raw_envelope()) {
            let defaults = EnvelopeDefaults::default();
            let once = validate(&raw, &defaults).unwrap();
            let twice = validate(&once.to_raw(), &defaults).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_normalized_fields_agree(raw in raw_envelope()) {
            let wire = validate(&raw, &EnvelopeDefaults::default())
                .unwrap()
                .to_raw();
            prop_assert!(wire.access_control_conditions.is_some());
            prop_assert_eq!(
                wire.access_control_conditions,
                wire.unified_access_control_conditions
            );
            prop_assert!(wire.chain.is_some());
            prop_assert!(wire.data_type.is_some());
            prop_assert!(wire.version.is_some());
        }

        #[test]
        fn test_diverging_sets_always_rejected(
            mut raw in raw_envelope(),
            extra in access_condition(),
        ) {
            let base = raw
                .access_control_conditions
                .clone()
                .or_else(|| raw.unified_access_control_conditions.clone())
                .unwrap();
            let mut diverged = base.clone();
            diverged.push(extra);

            raw.access_control_conditions = Some(base);
            raw.unified_access_control_conditions = Some(diverged);

            let err = validate(&raw, &EnvelopeDefaults::default()).unwrap_err();
            prop_assert!(matches!(err, EnvelopeError::ConditionSetMismatch));
        }

        #[test]
        fn test_json_wire_roundtrip(raw in raw_envelope()) {
            let json = raw.to_json().unwrap();
            let parsed = RawEnvelope::from_json(&json).unwrap();
            prop_assert_eq!(raw, parsed);
        }

        #[test]
        fn test_comparator_evaluation_total_on_numeric(
            test in return_value_test(),
            observed in any::<u128>(),
        ) {
            // Never errors for decimal thresholds
            prop_assert!(test.check_numeric(observed).is_ok());
        }
    }
}
