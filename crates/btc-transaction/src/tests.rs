//! Tests for the btc-transaction crate.
//!
//! Covers parsing and serialization against mainnet fixtures, the BIP-143
//! p2wpkh signing example, building and signing each supported input
//! kind, multisig, identifiers, and the structured snapshot.

use btc_primitives::ec::{PrivateKey, Signature};
use btc_script::{Address, AddressType, Network, Script, ScriptChunk, ScriptError};

use crate::multisig::{MultisigConfig, MultisigTransaction};
use crate::output::TransactionOutput;
use crate::sighash;
use crate::snapshot::TransactionSnapshot;
use crate::template::p2pkh;
use crate::transaction::Transaction;
use crate::{TransactionError, TxConfig};

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

/// One-input, one-output legacy transaction.
const LEGACY_TX: &str = "0100000001a15d57094aa7a21a28cb20b59aab8fc7d1149a3bdbcddba9c622e4f5f6a99ece010000006c493046022100f93bb0e7d8db7bd46e40132d1f8242026e045f03a0efe71bbb8e3f475e970d790221009337cd7f1f929f00cc6ff01f03729b069a7c21b59b1736ddfee5db5946c5da8c0121033b9b137ee87d5a812d6f506efdd37f0affa7ffc310711c06c7f3e097c9447c52ffffffff0100e1f505000000001976a9140389035a9225b3839e2bbf32d826a1e222031fd888ac00000000";

/// One-input segwit transaction spending a p2wpkh output to a p2sh address.
const SEGWIT_TX: &str = "02000000000101595895ea20179de87052b4046dfe6fd515860505d6511a9004cf12a1f93cac7c0100000000ffffffff01deb807000000000017a9140f3444e271620c736808aa7b33e370bd87cb5a078702483045022100fb60dad8df4af2841adc0346638c16d0b8035f5e3f3753b88db122e70c79f9370220756e6633b17fd2710e626347d28d60b0a2d6cbb41de51740644b9fb3ba7751040121028fa937ca8cba2197a37c007176ed8941055d3bcb8627d085e94553e62f057dcc00000000";

/// BIP-143 native p2wpkh example, unsigned.
const BIP143_UNSIGNED: &str = "0100000002fff7f7881a8099afa6940d42d1e7f6362bec38171ea3edf433541db4e4ad969f0000000000eeffffffef51e1b804cc89d182d279655c3aa89e815b1b309fe287d9b2b55d57b90ec68a0100000000ffffffff02202cb206000000001976a9148280b37df378db99f66f85c95a783a76ac7a6d5988ac9093510d000000001976a9143bde42dbee7e4dbe6a21b2d50ce2f0167faa815988ac11000000";

/// BIP-143 native p2wpkh example, both inputs signed.
const BIP143_SIGNED: &str = "01000000000102fff7f7881a8099afa6940d42d1e7f6362bec38171ea3edf433541db4e4ad969f00000000494830450221008b9d1dc26ba6a9cb62127b02742fa9d754cd3bebf337f7a55d114c8e5cdd30be022040529b194ba3f9281a99f2b1c0a19c0489bc22ede944ccf4ecbab4cc618ef3ed01eeffffffef51e1b804cc89d182d279655c3aa89e815b1b309fe287d9b2b55d57b90ec68a0100000000ffffffff02202cb206000000001976a9148280b37df378db99f66f85c95a783a76ac7a6d5988ac9093510d000000001976a9143bde42dbee7e4dbe6a21b2d50ce2f0167faa815988ac000247304402203609e17b84f6a7d30c80bfa610b5b4542f32a8a0d5447a12fb1366d7f01cc44a0220573a954c4518331561406f90300e8f3358f51928d43c212a8caed02de67eebee0121025476c2e83188368da1ff3e292e7acafcdb3566bb0ad253f62fc70f07aeee635711000000";

const FUNDING_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
const DEST_ADDRESS: &str = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";
const P2WSH_ADDRESS: &str = "bc1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3qccfmv3";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A p2pkh address for `key`. p2pkh inputs sign with the uncompressed key.
fn p2pkh_address(key: &PrivateKey) -> String {
    Address::from_public_key_hash(&key.pub_key().hash160_uncompressed(), Network::Mainnet)
        .address_string
}

fn p2wpkh_address(key: &PrivateKey) -> String {
    Address::from_witness_program(&key.pub_key().hash160(), Network::Mainnet)
        .unwrap()
        .address_string
}

/// Split `<der||hashtype>` and check the hash type byte.
fn strip_hash_type(sig: &[u8]) -> Signature {
    assert_eq!(*sig.last().unwrap(), 0x01, "sighash byte should be SIGHASH_ALL");
    Signature::from_der(&sig[..sig.len() - 1]).expect("DER signature")
}

// -----------------------------------------------------------------------
// Parsing and serialization
// -----------------------------------------------------------------------

#[test]
fn test_legacy_parse_roundtrip() {
    let tx = Transaction::from_hex(LEGACY_TX).expect("should parse legacy tx");

    assert_eq!(tx.version, 1);
    assert!(!tx.segwit);
    assert_eq!(tx.input_count(), 1);
    assert_eq!(tx.output_count(), 1);
    assert_eq!(tx.lock_time, 0);
    assert_eq!(
        tx.inputs[0].txid.to_string(),
        "ce9ea9f6f5e422c6a9dbcddb3b9a14d1c78fab9ab520cb281aa2a74a09575da1"
    );
    assert_eq!(tx.inputs[0].vout, 1);
    assert_eq!(tx.outputs[0].value, 100_000_000);
    assert_eq!(tx.outputs[0].address_type, Some(AddressType::P2pkh));

    assert_eq!(tx.to_hex(), LEGACY_TX);
}

#[test]
fn test_legacy_tx_id() {
    let tx = Transaction::from_hex(LEGACY_TX).unwrap();
    assert_eq!(
        tx.tx_id_hex(),
        "a6eab3c14ab5272a58a5ba91505ba1a4b6d7a3a9fcbd187b6cd99a7b6d548cb7"
    );
}

#[test]
fn test_segwit_parse_roundtrip() {
    let tx = Transaction::from_hex(SEGWIT_TX).expect("should parse segwit tx");

    assert_eq!(tx.version, 2);
    assert!(tx.segwit);
    assert_eq!(tx.input_count(), 1);
    assert!(tx.inputs[0].unlocking_script.is_empty());
    assert_eq!(tx.inputs[0].witness.len(), 2);
    assert_eq!(tx.inputs[0].witness[1].len(), 33);
    assert_eq!(tx.outputs[0].address_type, Some(AddressType::P2sh));

    assert_eq!(tx.to_hex(), SEGWIT_TX);
}

#[test]
fn test_segwit_tx_id_ignores_witness() {
    let tx = Transaction::from_hex(SEGWIT_TX).unwrap();
    assert_eq!(
        tx.tx_id_hex(),
        "f5864806e3565c34d1b41e716f72609d00b55ea5eac5b924c9719a842ef42206"
    );
    let mut stripped = tx.clone();
    stripped.inputs[0].witness.clear();
    assert_eq!(stripped.tx_id(), tx.tx_id());
}

#[test]
fn test_legacy_bytes_drop_witness() {
    let tx = Transaction::from_hex(SEGWIT_TX).unwrap();
    let legacy = Transaction::from_bytes(&tx.to_bytes_legacy()).unwrap();
    assert!(!legacy.segwit);
    assert!(legacy.inputs[0].witness.is_empty());
    assert_eq!(legacy.outputs, tx.outputs);
}

#[test]
fn test_trailing_bytes_error() {
    let err = Transaction::from_hex(&format!("{}00", LEGACY_TX)).unwrap_err();
    assert!(matches!(err, TransactionError::MalformedTransaction(_)));
}

#[test]
fn test_invalid_hex_error() {
    let err = Transaction::from_hex("not_valid_hex").unwrap_err();
    assert!(matches!(err, TransactionError::MalformedTransaction(_)));
}

#[test]
fn test_every_truncation_rejected() {
    for fixture in [LEGACY_TX, SEGWIT_TX] {
        let bytes = hex::decode(fixture).unwrap();
        for len in 0..bytes.len() {
            let err = Transaction::from_bytes(&bytes[..len]).unwrap_err();
            assert!(
                matches!(err, TransactionError::MalformedTransaction(_)),
                "prefix of {} bytes should be malformed",
                len
            );
        }
    }
}

#[test]
fn test_huge_input_count_rejected() {
    // version, then a varint claiming 2^32 - 1 inputs.
    let err = Transaction::from_hex("01000000feffffffff").unwrap_err();
    assert!(matches!(err, TransactionError::MalformedTransaction(_)));
}

#[test]
fn test_varint_output_count_boundary() {
    let mut tx = Transaction::new(false);
    for _ in 0..253 {
        tx.outputs.push(TransactionOutput::from_script(Script::new(), 0));
    }
    let bytes = tx.to_bytes();
    assert_eq!(bytes[4], 0x00, "zero inputs");
    assert_eq!(&bytes[5..8], &[0xfd, 0xfd, 0x00]);

    let parsed = Transaction::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.output_count(), 253);
    assert!(!parsed.segwit);
}

#[test]
fn test_full_width_locktime() {
    let mut tx = Transaction::new(false);
    tx.lock_time = 0xfeff_ffff;
    tx.add_output(DEST_ADDRESS, "1").unwrap();
    let hex_tx = tx.to_hex();
    assert!(hex_tx.ends_with("fffffffe"));
    assert_eq!(Transaction::from_hex(&hex_tx).unwrap().lock_time, 0xfeff_ffff);
}

#[test]
fn test_config_applies() {
    let config = TxConfig {
        version: 1,
        lock_time: 500,
        segwit: false,
        ..TxConfig::default()
    };
    let tx = Transaction::with_config(&config);
    let hex_tx = tx.to_hex();
    assert!(hex_tx.starts_with("01000000"));
    assert!(hex_tx.ends_with("f4010000"));

    let default_tx = Transaction::default();
    assert_eq!(default_tx.version, 2);
    assert!(default_tx.segwit);
    assert!(default_tx.to_hex().starts_with("020000000001"));
}

// -----------------------------------------------------------------------
// Building
// -----------------------------------------------------------------------

#[test]
fn test_add_input_derives_locking_script() {
    let key = PrivateKey::new();
    let mut tx = Transaction::new(true);
    tx.add_input(&p2wpkh_address(&key), FUNDING_TXID, 3, Some("2500"))
        .unwrap();

    let input = &tx.inputs[0];
    assert_eq!(input.address_type, Some(AddressType::P2wpkh));
    assert_eq!(input.value, Some(2500));
    assert_eq!(input.vout, 3);
    assert_eq!(input.txid.to_string(), FUNDING_TXID);
    assert_eq!(
        input.locking_script.witness_program(),
        Some(&key.pub_key().hash160()[..])
    );
    assert!(!input.is_signed());
}

#[test]
fn test_add_output_amounts() {
    let mut tx = Transaction::new(false);
    tx.add_output(DEST_ADDRESS, "18446744073709551615").unwrap();
    assert_eq!(tx.outputs[0].value, u64::MAX);

    for bad in ["", "-5", "1.5", "18446744073709551616", "ten"] {
        let err = tx.add_output(DEST_ADDRESS, bad).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidAmount(_)), "{:?}", bad);
    }
    assert_eq!(tx.output_count(), 1);
}

#[test]
fn test_add_input_rejects_bad_address_and_txid() {
    let mut tx = Transaction::new(false);
    let err = tx.add_input("xyz", FUNDING_TXID, 0, None).unwrap_err();
    assert!(matches!(
        err,
        TransactionError::Script(ScriptError::UnsupportedAddress(_))
    ));
    assert!(tx.add_input(DEST_ADDRESS, "abcd", 0, None).is_err());
    assert!(tx.add_input(DEST_ADDRESS, FUNDING_TXID, 0, Some("x")).is_err());
    assert_eq!(tx.input_count(), 0);
}

// -----------------------------------------------------------------------
// Signing
// -----------------------------------------------------------------------

#[test]
fn test_sign_bip143_p2wpkh_matches_reference() {
    init_logger();
    let mut tx = Transaction::from_hex(BIP143_UNSIGNED).unwrap();
    tx.segwit = true;
    tx.inputs[0].unlocking_script = Script::from_hex(
        "4830450221008b9d1dc26ba6a9cb62127b02742fa9d754cd3bebf337f7a55d114c8e5cdd30be022040529b194ba3f9281a99f2b1c0a19c0489bc22ede944ccf4ecbab4cc618ef3ed01",
    )
    .unwrap();
    tx.inputs[1].locking_script =
        Script::from_hex("00141d0f172a0ecb48aee1be1f2687d2963ae33f71a1").unwrap();
    tx.inputs[1].value = Some(600_000_000);

    let sigs = tx
        .sign(
            "619c335025c7f4012e556c2a58b2506e30b8511b53ade95ea316fd8c3286feb9",
            &[1],
        )
        .unwrap();

    assert_eq!(
        sigs,
        vec!["304402203609e17b84f6a7d30c80bfa610b5b4542f32a8a0d5447a12fb1366d7f01cc44a0220573a954c4518331561406f90300e8f3358f51928d43c212a8caed02de67eebee01".to_string()]
    );
    assert_eq!(tx.to_hex(), BIP143_SIGNED);
    assert!(tx.is_complete());
}

#[test]
fn test_sign_p2pkh_legacy() {
    init_logger();
    let key = PrivateKey::new();
    let mut tx = Transaction::new(false);
    tx.add_input(&p2pkh_address(&key), FUNDING_TXID, 0, None).unwrap();
    tx.add_output(DEST_ADDRESS, "50000").unwrap();

    let sigs = tx.sign(&key.to_hex(), &[0]).unwrap();
    assert_eq!(sigs.len(), 1);

    let chunks = tx.inputs[0].unlocking_script.chunks().unwrap();
    assert_eq!(chunks.len(), 2);
    let (sig, pubkey) = match (&chunks[0], &chunks[1]) {
        (ScriptChunk::Data(s), ScriptChunk::Data(p)) => (s.clone(), p.clone()),
        other => panic!("unexpected scriptSig chunks {:?}", other),
    };
    assert_eq!(hex::encode(&sig), sigs[0]);
    assert_eq!(pubkey, key.pub_key().to_uncompressed().to_vec());
    assert!(tx.inputs[0].witness.is_empty());

    let digest = tx.signature_hash(0).unwrap();
    assert!(key.pub_key().verify(&digest, &strip_hash_type(&sig)));
    assert!(tx.is_complete());
}

#[test]
fn test_sign_p2wpkh_witness() {
    let key = PrivateKey::new();
    let mut tx = Transaction::new(true);
    tx.add_input(&p2wpkh_address(&key), FUNDING_TXID, 1, Some("100000"))
        .unwrap();
    tx.add_output(DEST_ADDRESS, "90000").unwrap();

    tx.sign(&key.to_hex(), &[0]).unwrap();

    let input = &tx.inputs[0];
    assert!(input.unlocking_script.is_empty());
    assert_eq!(input.witness.len(), 2);
    assert_eq!(input.witness[1], key.pub_key().to_compressed().to_vec());

    let digest = tx.signature_hash(0).unwrap();
    assert!(key.pub_key().verify(&digest, &strip_hash_type(&input.witness[0])));

    // scriptCode sits after version, hashPrevouts, hashSequence, outpoint.
    let preimage = sighash::witness_v0_preimage(&tx, 0).unwrap();
    let script_code = p2pkh::lock(&key.pub_key().hash160()).unwrap();
    assert_eq!(preimage[104], 0x19);
    assert_eq!(&preimage[105..130], script_code.to_bytes());

    let parsed = Transaction::from_hex(&tx.to_hex()).unwrap();
    assert_eq!(parsed.inputs[0].witness, tx.inputs[0].witness);
    assert_eq!(parsed.to_hex(), tx.to_hex());
}

#[test]
fn test_sign_mixed_inputs() {
    let legacy_key = PrivateKey::new();
    let witness_key = PrivateKey::new();
    let mut tx = Transaction::new(true);
    tx.add_input(&p2pkh_address(&legacy_key), FUNDING_TXID, 0, None)
        .unwrap();
    tx.add_input(&p2wpkh_address(&witness_key), FUNDING_TXID, 1, Some("7000"))
        .unwrap();
    tx.add_output(DEST_ADDRESS, "6000").unwrap();

    tx.sign(&legacy_key.to_hex(), &[0]).unwrap();
    assert!(!tx.is_complete());
    tx.sign(&witness_key.to_hex(), &[1]).unwrap();
    assert!(tx.is_complete());

    // The legacy digest ignores witness data, so signing input 1 does not
    // invalidate input 0.
    let chunks = tx.inputs[0].unlocking_script.chunks().unwrap();
    let sig = match &chunks[0] {
        ScriptChunk::Data(s) => strip_hash_type(s),
        other => panic!("unexpected chunk {:?}", other),
    };
    assert!(legacy_key
        .pub_key()
        .verify(&tx.signature_hash(0).unwrap(), &sig));
}

#[test]
fn test_failed_sign_leaves_tx_unchanged() {
    let key = PrivateKey::new();
    let mut tx = Transaction::new(true);
    tx.add_input(&p2pkh_address(&key), FUNDING_TXID, 0, None).unwrap();
    // Witness input without a value cannot be signed.
    tx.add_input(&p2wpkh_address(&key), FUNDING_TXID, 1, None).unwrap();
    tx.add_output(DEST_ADDRESS, "1000").unwrap();
    let before = tx.clone();

    let err = tx.sign(&key.to_hex(), &[0, 1]).unwrap_err();
    assert!(matches!(err, TransactionError::MissingInputValue(1)));
    assert_eq!(tx, before);
    assert!(!tx.inputs[0].is_signed());
}

#[test]
fn test_sign_errors() {
    let key = PrivateKey::new();
    let mut tx = Transaction::new(false);
    tx.add_input(&p2wpkh_address(&key), FUNDING_TXID, 0, Some("1000"))
        .unwrap();
    tx.add_input(P2WSH_ADDRESS, FUNDING_TXID, 1, Some("1000")).unwrap();
    tx.add_output(DEST_ADDRESS, "500").unwrap();

    // p2wpkh requires the segwit serialization.
    let err = tx.sign(&key.to_hex(), &[0]).unwrap_err();
    assert!(matches!(err, TransactionError::SigningError(_)));

    let err = tx.sign(&key.to_hex(), &[1]).unwrap_err();
    assert!(matches!(
        err,
        TransactionError::Script(ScriptError::UnsupportedScriptType(_))
    ));

    let err = tx.sign(&key.to_hex(), &[2]).unwrap_err();
    assert!(matches!(err, TransactionError::InvalidTransaction(_)));

    let err = tx.sign("not a key", &[0]).unwrap_err();
    assert!(matches!(err, TransactionError::Primitives(_)));

    tx.sighash_type = 0x02;
    let err = tx.sign(&key.to_hex(), &[0]).unwrap_err();
    assert!(matches!(err, TransactionError::UnsupportedHashType(0x02)));
}

#[test]
fn test_two_phase_signing() {
    let key = PrivateKey::new();
    let mut tx = Transaction::new(false);
    tx.add_input(&p2pkh_address(&key), FUNDING_TXID, 0, None).unwrap();
    tx.add_output(DEST_ADDRESS, "1").unwrap();

    let mut external = tx.clone();
    tx.sign(&key.to_hex(), &[0]).unwrap();

    let digest = external.signature_hash(0).unwrap();
    let signature = key.sign(&digest).unwrap();
    external
        .apply_signature(0, &signature, &key.pub_key())
        .unwrap();

    // RFC6979 nonces make both paths produce the same bytes.
    assert_eq!(external.to_hex(), tx.to_hex());
}

// -----------------------------------------------------------------------
// Multisig
// -----------------------------------------------------------------------

#[test]
fn test_multisig_2_of_2_end_to_end() {
    init_logger();
    let k1 = PrivateKey::new();
    let k2 = PrivateKey::new();
    let pub1 = hex::encode(k1.pub_key().to_compressed());
    let pub2 = hex::encode(k2.pub_key().to_compressed());

    let config = MultisigConfig::new(2, 2, &[&pub1, &pub2]).unwrap();
    let address = config.p2sh_address(Network::Mainnet).unwrap();

    // Sign in redeem-script key order.
    let (first, second) = if config.pub_keys()[0] == k1.pub_key().to_compressed().to_vec() {
        (&k1, &k2)
    } else {
        (&k2, &k1)
    };

    let mut mtx = MultisigTransaction::new(config, false).unwrap();
    mtx.add_input(&address.address_string, FUNDING_TXID, 0, None)
        .unwrap();
    mtx.add_output(DEST_ADDRESS, "10000").unwrap();
    assert_eq!(
        mtx.transaction().inputs[0].redeem_script.as_ref(),
        Some(mtx.redeem_script())
    );

    mtx.sign(&first.to_hex(), &[0]).unwrap();
    assert!(!mtx.is_fully_signed());
    assert!(!mtx.transaction().is_complete());
    mtx.sign(&second.to_hex(), &[0]).unwrap();
    assert!(mtx.is_fully_signed());
    assert!(mtx.transaction().is_complete());

    let tx = mtx.transaction();
    let chunks = tx.inputs[0].unlocking_script.chunks().unwrap();
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks[0], ScriptChunk::Opcode(0x00));
    assert_eq!(
        chunks[3],
        ScriptChunk::Data(mtx.redeem_script().to_bytes().to_vec())
    );

    let digest = tx.signature_hash(0).unwrap();
    for (chunk, key) in chunks[1..3].iter().zip([first, second]) {
        match chunk {
            ScriptChunk::Data(sig) => {
                assert!(key.pub_key().verify(&digest, &strip_hash_type(sig)));
            }
            other => panic!("expected signature push, got {:?}", other),
        }
    }
    assert_eq!(tx.inputs[0].signatures.len(), 2);
}

#[test]
fn test_multisig_cosigner_continues_from_collected_signatures() {
    init_logger();
    let k1 = PrivateKey::new();
    let k2 = PrivateKey::new();
    let pub1 = hex::encode(k1.pub_key().to_compressed());
    let pub2 = hex::encode(k2.pub_key().to_compressed());
    let config = MultisigConfig::new(2, 2, &[&pub1, &pub2]).unwrap();
    let address = config.p2sh_address(Network::Mainnet).unwrap();
    let (first, second) = if config.pub_keys()[0] == k1.pub_key().to_compressed().to_vec() {
        (&k1, &k2)
    } else {
        (&k2, &k1)
    };

    // The first co-signer signs alone and hands over only the signature.
    let mut a = MultisigTransaction::new(config.clone(), false).unwrap();
    a.add_input(&address.address_string, FUNDING_TXID, 0, None)
        .unwrap();
    a.add_output(DEST_ADDRESS, "10000").unwrap();
    let sigs_a = a.sign(&first.to_hex(), &[0]).unwrap();

    // The second rebuilds the same transaction from that signature.
    let mut b = MultisigTransaction::new(config, false).unwrap();
    b.add_input_with_signatures(
        &address.address_string,
        FUNDING_TXID,
        0,
        &[sigs_a[0].as_str()],
        None,
    )
    .unwrap();
    b.add_output(DEST_ADDRESS, "10000").unwrap();
    assert_eq!(
        b.transaction().inputs[0].unlocking_script,
        a.transaction().inputs[0].unlocking_script
    );
    assert!(!b.is_fully_signed());

    b.sign(&second.to_hex(), &[0]).unwrap();
    assert!(b.is_fully_signed());

    let tx = b.transaction();
    let digest = tx.signature_hash(0).unwrap();
    let signatures = &tx.inputs[0].signatures;
    assert_eq!(signatures.len(), 2);
    assert_eq!(hex::encode(&signatures[0]), sigs_a[0]);
    for (sig, key) in signatures.iter().zip([first, second]) {
        assert!(key.pub_key().verify(&digest, &strip_hash_type(sig)));
    }

    let chunks = tx.inputs[0].unlocking_script.chunks().unwrap();
    assert_eq!(chunks[1], ScriptChunk::Data(signatures[0].clone()));
    assert_eq!(chunks[2], ScriptChunk::Data(signatures[1].clone()));
}

#[test]
fn test_multisig_seeded_signatures_rejected() {
    let config = MultisigConfig::new(
        1,
        2,
        &[
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
            "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5",
        ],
    )
    .unwrap();
    let address = config.p2sh_address(Network::Mainnet).unwrap();
    let mut mtx = MultisigTransaction::new(config, false).unwrap();

    let err = mtx
        .add_input_with_signatures(&address.address_string, FUNDING_TXID, 0, &["zz"], None)
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidMultisigConfig(_)));

    let err = mtx
        .add_input_with_signatures(
            &address.address_string,
            FUNDING_TXID,
            0,
            &["3001", "3002", "3003"],
            None,
        )
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidMultisigConfig(_)));
    assert_eq!(mtx.transaction().input_count(), 0);
}

#[test]
fn test_p2sh_without_redeem_script() {
    let config = MultisigConfig::new(
        1,
        2,
        &[
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
            "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5",
        ],
    )
    .unwrap();
    let address = config.p2sh_address(Network::Mainnet).unwrap();

    let mut tx = Transaction::new(false);
    tx.add_input(&address.address_string, FUNDING_TXID, 0, None)
        .unwrap();
    let err = tx.sign(&PrivateKey::new().to_hex(), &[0]).unwrap_err();
    assert!(matches!(err, TransactionError::SigningError(_)));
}

// -----------------------------------------------------------------------
// Identity and snapshot
// -----------------------------------------------------------------------

#[test]
fn test_gen_hash_id_stable_across_signing() {
    let key = PrivateKey::new();
    let mut tx = Transaction::new(true);
    tx.add_input(&p2wpkh_address(&key), FUNDING_TXID, 0, Some("5000"))
        .unwrap();
    tx.add_output(DEST_ADDRESS, "4000").unwrap();

    let before = tx.gen_hash_id();
    assert_eq!(before.len(), 40);
    assert!(before.chars().all(|c| c.is_ascii_hexdigit()));

    tx.sign(&key.to_hex(), &[0]).unwrap();
    assert_eq!(tx.gen_hash_id(), before);

    tx.outputs[0].value += 1;
    assert_ne!(tx.gen_hash_id(), before);
}

#[test]
fn test_structured_snapshot() {
    let key = PrivateKey::new();
    let mut tx = Transaction::new(true);
    tx.add_input(&p2wpkh_address(&key), FUNDING_TXID, 2, Some("18446744073709551615"))
        .unwrap();
    tx.add_output(DEST_ADDRESS, "12345").unwrap();
    tx.sign(&key.to_hex(), &[0]).unwrap();

    let snapshot = tx.to_structured();
    assert_eq!(snapshot.txid, tx.tx_id_hex());
    assert_eq!(snapshot.hash_id, tx.gen_hash_id());
    assert_eq!(snapshot.inputs[0].txid, FUNDING_TXID);
    assert_eq!(snapshot.inputs[0].value.as_deref(), Some("18446744073709551615"));
    assert_eq!(snapshot.inputs[0].witness.len(), 2);
    assert_eq!(snapshot.outputs[0].value, "12345");
    assert_eq!(snapshot.outputs[0].address.as_deref(), Some(DEST_ADDRESS));

    let json = snapshot.to_json().unwrap();
    assert!(json.contains("\"address_type\": \"p2wpkh\""));
    let back: TransactionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_display_is_hex() {
    let tx = Transaction::from_hex(LEGACY_TX).unwrap();
    assert_eq!(tx.to_string(), LEGACY_TX);
}
