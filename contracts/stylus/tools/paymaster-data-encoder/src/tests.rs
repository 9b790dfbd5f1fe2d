use alloy_primitives::{keccak256, Address, U256};
use k256::ecdsa::SigningKey;
use verifying_paymaster_types::{
    eth_signed_message_hash,
    layout::{MAX_U48, PAYMASTER_AND_DATA_LEN, SPONSOR_DATA_LEN},
    paymaster_hash, CommitmentDomain, EcRecover, TokenLedger, TransferError, UserOperation,
};

use crate::{
    encode_paymaster_and_data, personal_sign, sign_paymaster_data, signer_address, sponsor,
    LocalRecovery, MockTokenLedger, SignError, SponsorTerms,
};

fn key_one() -> SigningKey {
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    SigningKey::from_slice(&bytes).unwrap()
}

fn domain() -> CommitmentDomain {
    CommitmentDomain {
        paymaster: Address::repeat_byte(0xa0),
        chain_id: 421614,
        entry_point: Address::repeat_byte(0xe0),
    }
}

fn terms() -> SponsorTerms {
    SponsorTerms {
        valid_until: 0xdeadbeef,
        valid_after: 0x1234,
        token: Address::repeat_byte(0x70),
        exchange_rate: U256::from(1_500_000_000_000_000_000u64),
    }
}

#[test]
fn test_signer_address_of_key_one() {
    let expected: [u8; 20] = hex::decode("7e5f4552091a69125d5dfcb7b8c2659029395bdf")
        .unwrap()
        .try_into()
        .unwrap();
    assert_eq!(signer_address(&key_one()), Address::from(expected));
}

#[test]
fn test_personal_sign_recovers_locally() {
    let hash = keccak256(b"sponsor me");
    let sig = personal_sign(&key_one(), hash).unwrap();
    assert_eq!(sig.len(), 65);

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig[0..32]);
    s.copy_from_slice(&sig[32..64]);
    let recovered = LocalRecovery.ecrecover(eth_signed_message_hash(hash), sig[64], &r, &s);
    assert_eq!(recovered, Some(signer_address(&key_one())));

    // Flipping the parity recovers a different key.
    let flipped = if sig[64] == 27 { 28 } else { 27 };
    let other = LocalRecovery.ecrecover(eth_signed_message_hash(hash), flipped, &r, &s);
    assert_ne!(other, Some(signer_address(&key_one())));
}

#[test]
fn test_personal_sign_is_low_s() {
    // secp256k1n / 2, big endian.
    let half_order =
        hex::decode("7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0").unwrap();
    for i in 0u8..16 {
        let sig = personal_sign(&key_one(), keccak256([i])).unwrap();
        assert!(sig[32..64] <= half_order[..], "message {i}");
    }
}

#[test]
fn test_local_recovery_rejects_bad_v() {
    let digest = keccak256(b"digest");
    assert_eq!(LocalRecovery.ecrecover(digest, 0, &[1; 32], &[1; 32]), None);
    assert_eq!(LocalRecovery.ecrecover(digest, 31, &[1; 32], &[1; 32]), None);
}

#[test]
fn test_sign_paymaster_data_commits_to_terms() {
    let op = UserOperation {
        sender: Address::repeat_byte(0x5e),
        nonce: U256::from(9u64),
        ..Default::default()
    };
    let data = sign_paymaster_data(&op, &domain(), &terms(), &key_one()).unwrap();
    assert_eq!(data.valid_until, terms().valid_until);
    assert_eq!(data.valid_after, terms().valid_after);
    assert_eq!(data.token, terms().token);
    assert_eq!(data.exchange_rate, terms().exchange_rate);

    let hash = paymaster_hash(
        &op,
        &domain(),
        data.valid_until,
        data.valid_after,
        data.token,
        data.exchange_rate,
    );
    assert_eq!(data.signature, personal_sign(&key_one(), hash).unwrap());
}

#[test]
fn test_sponsor_writes_full_field() {
    let mut op = UserOperation::default();
    sponsor(&mut op, &domain(), &terms(), &key_one()).unwrap();

    assert_eq!(op.paymaster_and_data.len(), PAYMASTER_AND_DATA_LEN);
    assert_eq!(&op.paymaster_and_data[..20], domain().paymaster.as_slice());

    // Re-sponsoring an already sponsored op yields the same bytes.
    let first = op.paymaster_and_data.clone();
    sponsor(&mut op, &domain(), &terms(), &key_one()).unwrap();
    assert_eq!(op.paymaster_and_data, first);
}

#[test]
fn test_encode_paymaster_and_data_prefixes_address() {
    let data = sign_paymaster_data(&UserOperation::default(), &domain(), &terms(), &key_one())
        .unwrap();
    let encoded = encode_paymaster_and_data(Address::repeat_byte(0x42), &data);
    assert_eq!(encoded.len(), 20 + SPONSOR_DATA_LEN);
    assert_eq!(&encoded[..20], &[0x42; 20]);
    assert_eq!(&encoded[20..26], &[0, 0, 0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn test_mock_ledger_is_all_or_nothing() {
    let token = Address::repeat_byte(0x70);
    let owner = Address::repeat_byte(0x01);
    let vault = Address::repeat_byte(0x02);
    let paymaster = Address::repeat_byte(0xa0);
    let mut ledger = MockTokenLedger::new(paymaster);
    ledger.mint(token, owner, U256::from(100u64));
    ledger.approve(token, owner, paymaster, U256::from(50u64));

    assert_eq!(
        ledger.transfer_from(token, owner, vault, U256::from(60u64)),
        Err(TransferError::InsufficientAllowance)
    );
    assert_eq!(ledger.balance_of(token, owner), U256::from(100u64));
    assert_eq!(ledger.allowance(token, owner, paymaster), U256::from(50u64));

    ledger
        .transfer_from(token, owner, vault, U256::from(50u64))
        .unwrap();
    assert_eq!(ledger.balance_of(token, owner), U256::from(50u64));
    assert_eq!(ledger.balance_of(token, vault), U256::from(50u64));
    assert_eq!(ledger.allowance(token, owner, paymaster), U256::ZERO);

    ledger.approve(token, owner, paymaster, U256::from(1_000u64));
    assert_eq!(
        ledger.transfer_from(token, owner, vault, U256::from(51u64)),
        Err(TransferError::InsufficientBalance)
    );

    ledger.break_token(token);
    assert_eq!(
        ledger.transfer_from(token, owner, vault, U256::from(1u64)),
        Err(TransferError::CallFailed)
    );
    assert_eq!(ledger.transfer_count(), 4);
}

#[test]
fn test_mock_ledger_spends_only_its_own_allowance() {
    let token = Address::repeat_byte(0x70);
    let owner = Address::repeat_byte(0x01);
    let vault = Address::repeat_byte(0x02);
    let paymaster = Address::repeat_byte(0xa0);
    let mut ledger = MockTokenLedger::new(paymaster);
    assert_eq!(ledger.spender(), paymaster);
    ledger.mint(token, owner, U256::from(100u64));
    ledger.approve(token, owner, Address::repeat_byte(0xbb), U256::MAX);

    assert_eq!(
        ledger.transfer_from(token, owner, vault, U256::from(1u64)),
        Err(TransferError::InsufficientAllowance)
    );

    ledger.approve(token, owner, paymaster, U256::from(10u64));
    ledger
        .transfer_from(token, owner, vault, U256::from(10u64))
        .unwrap();
    assert_eq!(ledger.allowance(token, owner, paymaster), U256::ZERO);
    assert_eq!(
        ledger.allowance(token, owner, Address::repeat_byte(0xbb)),
        U256::MAX
    );
}

#[test]
fn test_sign_rejects_timestamps_wider_than_u48() {
    let op = UserOperation::default();
    let too_wide = MAX_U48 + 6;

    let err = sign_paymaster_data(
        &op,
        &domain(),
        &SponsorTerms {
            valid_until: too_wide,
            ..terms()
        },
        &key_one(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SignError::TimestampOutOfRange {
            field: "validUntil",
            value
        } if value == too_wide
    ));

    let err = sign_paymaster_data(
        &op,
        &domain(),
        &SponsorTerms {
            valid_after: u64::MAX,
            ..terms()
        },
        &key_one(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SignError::TimestampOutOfRange {
            field: "validAfter",
            ..
        }
    ));

    let mut untouched = UserOperation::default();
    assert!(sponsor(
        &mut untouched,
        &domain(),
        &SponsorTerms {
            valid_until: too_wide,
            ..terms()
        },
        &key_one(),
    )
    .is_err());
    assert!(untouched.paymaster_and_data.is_empty());
}

#[test]
fn test_max_u48_window_round_trips_through_recovery() {
    let op = UserOperation::default();
    let terms = SponsorTerms {
        valid_until: MAX_U48,
        valid_after: MAX_U48,
        ..terms()
    };
    let data = sign_paymaster_data(&op, &domain(), &terms, &key_one()).unwrap();
    let encoded = encode_paymaster_and_data(domain().paymaster, &data);
    assert_eq!(&encoded[20..32], &[0xff; 12]);

    // Read the window back from the bytes, the way the contract does.
    let mut until = [0u8; 8];
    until[2..].copy_from_slice(&encoded[20..26]);
    let decoded_until = u64::from_be_bytes(until);
    assert_eq!(decoded_until, MAX_U48);

    let hash = paymaster_hash(
        &op,
        &domain(),
        decoded_until,
        MAX_U48,
        terms.token,
        terms.exchange_rate,
    );
    let sig = &encoded[84..];
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig[0..32]);
    s.copy_from_slice(&sig[32..64]);
    let recovered = LocalRecovery.ecrecover(eth_signed_message_hash(hash), sig[64], &r, &s);
    assert_eq!(recovered, Some(signer_address(&key_one())));
}
