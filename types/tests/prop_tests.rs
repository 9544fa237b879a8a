use proptest::prelude::*;

use accrue_types::{AccountId, LedgerParams, PoolId, Timestamp};

proptest! {
    /// Any string carrying the prefix parses, and only the bare prefix is null.
    #[test]
    fn account_parse_accepts_prefixed(suffix in "[a-z0-9]{0,24}") {
        let raw = format!("{}{}", AccountId::PREFIX, suffix);
        let id = AccountId::parse(raw.clone()).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
        prop_assert_eq!(id.is_null(), suffix.is_empty());
    }

    /// Strings without the prefix never parse.
    #[test]
    fn account_parse_rejects_unprefixed(raw in "[b-z][a-z0-9]{0,24}") {
        prop_assert!(AccountId::parse(raw).is_err());
    }

    /// AccountId bincode serialization roundtrip.
    #[test]
    fn account_bincode_roundtrip(suffix in "[a-z]{1,16}") {
        let id = AccountId::new(format!("acct_{suffix}"));
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: AccountId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// PoolId serializes as its bare index.
    #[test]
    fn pool_id_is_transparent(n in 0u32..10_000) {
        let json = serde_json::to_string(&PoolId::new(n)).unwrap();
        prop_assert_eq!(json, n.to_string());
    }

    /// elapsed_since never underflows.
    #[test]
    fn timestamp_elapsed_never_underflows(a in any::<u64>(), b in any::<u64>()) {
        let elapsed = Timestamp::new(a).elapsed_since(Timestamp::new(b));
        prop_assert_eq!(elapsed, b.saturating_sub(a));
    }

    /// Rate bounds check agrees with an explicit range test.
    #[test]
    fn rate_bounds_match_range(min in 0u32..5_000, span in 0u32..5_000, rate in 0u32..12_000) {
        let params = LedgerParams {
            min_yearly_rate_bps: min,
            max_yearly_rate_bps: min + span,
            ..LedgerParams::default()
        };
        prop_assert_eq!(params.rate_in_bounds(rate), (min..=min + span).contains(&rate));
    }
}
