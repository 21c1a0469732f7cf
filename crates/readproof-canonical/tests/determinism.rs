use chrono::{FixedOffset, TimeZone, Utc};
use proptest::prelude::*;
use readproof_canonical::{encode, payload_hash, AttestationFact, Digest, DigestAlg, Nonce};

fn base_fact(email: &str, offset_secs: i32, nanos: u32) -> AttestationFact {
    let instant = Utc
        .with_ymd_and_hms(2025, 12, 20, 8, 30, 15)
        .unwrap()
        .checked_add_signed(chrono::Duration::nanoseconds(i64::from(nanos)))
        .unwrap();
    let zone = FixedOffset::east_opt(offset_secs).unwrap();
    AttestationFact::new(
        "policy-handbook-v7",
        "user-42",
        email,
        instant.with_timezone(&zone),
        Nonce::new("q1w2e3r4t5y6u7i8o9p0aa"),
    )
}

#[test]
fn digest_serializes_to_golden_json() {
    let digest = Digest::sha256(b"subject_id=doc-1");
    let json = serde_json::to_value(&digest).unwrap();
    assert_eq!(json["alg"], "sha-256");
    assert_eq!(json["b64"].as_str().unwrap().len(), 43);
    assert_eq!(
        Digest::new(DigestAlg::Sha256, json["b64"].as_str().unwrap()).unwrap(),
        digest
    );
}

#[test]
fn fact_json_round_trips_with_offset_preserved() {
    let fact = base_fact("User@Corp.Example", 5 * 3600, 7);
    let json = serde_json::to_string(&fact).unwrap();
    assert!(json.contains("+05:00"));
    let restored: AttestationFact = serde_json::from_str(&json).unwrap();
    assert_eq!(encode(&restored).unwrap(), encode(&fact).unwrap());
}

#[test]
fn nanosecond_precision_changes_the_hash() {
    let a = payload_hash(&base_fact("a@b.example", 0, 1)).unwrap();
    let b = payload_hash(&base_fact("a@b.example", 0, 2)).unwrap();
    assert_ne!(a, b);
}

proptest! {
    #[test]
    fn same_instant_in_any_zone_encodes_identically(
        offset_hours in -12i32..=14,
        nanos in 0u32..1_000_000_000,
    ) {
        let utc = base_fact("signer@example.com", 0, nanos);
        let zoned = base_fact("signer@example.com", offset_hours * 3600, nanos);
        prop_assert_eq!(encode(&utc).unwrap(), encode(&zoned).unwrap());
    }

    #[test]
    fn email_casing_does_not_change_the_hash(flags in proptest::collection::vec(any::<bool>(), 18)) {
        let email = "signer@example.com";
        let mixed: String = email
            .chars()
            .zip(flags.iter())
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
            .collect();
        prop_assert_eq!(
            payload_hash(&base_fact(email, 0, 0)).unwrap(),
            payload_hash(&base_fact(&mixed, 0, 0)).unwrap()
        );
    }
}
