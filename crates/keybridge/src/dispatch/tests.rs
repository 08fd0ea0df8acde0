//! Unit tests for request dispatch.

use mockall::predicate::{always, eq};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::engine::{KeyListing, SignOutcome, VerifyOutcome, Version};
use crate::test_support::MockEngine;
use crate::whitelist::Whitelist;

fn validated(value: Value) -> ValidatedRequest {
    let request = serde_json::from_value(value).expect("request shape");
    Whitelist::standard()
        .validate(&request)
        .expect("request must be whitelisted")
}

#[rstest]
fn get_version_returns_components() {
    let mut engine = MockEngine::new();
    engine
        .expect_version()
        .times(1)
        .returning(|| Ok(Version::new(vec![2, 2, 19])));

    let result = Dispatcher::new(&engine, None)
        .dispatch(&validated(json!({"action": "getVersion"})))
        .expect("dispatch");

    assert_eq!(result, OperationResult::Version(Version::new(vec![2, 2, 19])));
}

#[rstest]
fn list_keys_passes_secret_flag_and_keywords() {
    let mut engine = MockEngine::new();
    engine
        .expect_list_keys()
        .with(
            eq(true),
            eq(ListKeysOptions {
                sigs: true,
                keys: vec!["alice".to_owned()],
            }),
        )
        .times(1)
        .returning(|_, _| Ok(KeyListing::default()));

    let result = Dispatcher::new(&engine, None).dispatch(&validated(json!({
        "action": "listKeys",
        "args": [true],
        "kwargs": {"sigs": true, "keys": ["alice"]}
    })));

    assert_eq!(result.ok(), Some(OperationResult::KeyListing(KeyListing::default())));
}

#[rstest]
fn sign_applies_pinned_options() {
    let mut engine = MockEngine::new();
    engine
        .expect_sign()
        .withf(|message, options| {
            message == b"hello"
                && *options
                    == SignOptions {
                        keyid: Some("ABCD".to_owned()),
                        clearsign: false,
                        detach: true,
                        binary: false,
                    }
        })
        .times(1)
        .returning(|_, _| {
            Ok(SignOutcome {
                ok: true,
                data: b"sig".to_vec(),
            })
        });

    let result = Dispatcher::new(&engine, None).dispatch(&validated(json!({
        "action": "sign",
        "args": ["hello"],
        "kwargs": {"keyid": "ABCD"}
    })));

    assert!(matches!(result, Ok(OperationResult::Sign(SignOutcome { ok: true, .. }))));
}

#[rstest]
#[case::sign(json!({"action": "sign", "args": ["caf\u{e9} \u{263a}"]}))]
#[case::encrypt(json!({"action": "encrypt", "args": ["caf\u{e9} \u{263a}", "alice"]}))]
fn message_text_uses_the_verification_encoding(#[case] request: Value) {
    let expected = Payload::from("caf\u{e9} \u{263a}").into_data_bytes();
    assert_eq!(expected, b"caf\xe9 \\u263a".to_vec());
    let mut engine = MockEngine::new();
    let signed = expected.clone();
    engine
        .expect_sign()
        .withf(move |message, _| message == signed.as_slice())
        .returning(|_, _| Ok(SignOutcome::default()));
    engine
        .expect_encrypt()
        .withf(move |data, _, _| data == expected.as_slice())
        .returning(|_, _, _| Ok(crate::engine::CryptOutcome::default()));

    let result = Dispatcher::new(&engine, None).dispatch(&validated(request));

    assert!(result.is_ok());
}

#[rstest]
fn verify_goes_through_a_temporary_signature_file() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let mut engine = MockEngine::new();
    let expected_dir = dir.path().to_path_buf();
    engine
        .expect_verify_detached_file()
        .withf(move |path, data| path.starts_with(&expected_dir) && data == b"data")
        .times(1)
        .returning(|_, _| {
            Ok(VerifyOutcome {
                valid: true,
                ..VerifyOutcome::default()
            })
        });

    let result = Dispatcher::new(&engine, Some(dir.path())).dispatch(&validated(json!({
        "action": "verifySignatureAgainstData",
        "args": ["sig", "data"]
    })));

    assert!(matches!(result, Ok(OperationResult::Verify(VerifyOutcome { valid: true, .. }))));
}

#[rstest]
fn encrypt_and_export_keep_armor() {
    let mut engine = MockEngine::new();
    engine
        .expect_encrypt()
        .with(always(), eq(vec!["alice".to_owned()]), eq(EncryptOptions { armor: true }))
        .times(1)
        .returning(|_, _, _| Ok(crate::engine::CryptOutcome::default()));
    engine
        .expect_export_keys()
        .with(
            eq(vec!["ABCD".to_owned()]),
            eq(ExportOptions {
                minimal: false,
                armor: true,
            }),
        )
        .times(1)
        .returning(|_, _| Ok(String::new()));
    let dispatcher = Dispatcher::new(&engine, None);

    assert!(
        dispatcher
            .dispatch(&validated(json!({"action": "encrypt", "args": ["d", "alice"]})))
            .is_ok()
    );
    assert_eq!(
        dispatcher
            .dispatch(&validated(json!({"action": "exportKeys", "args": ["ABCD"]})))
            .ok(),
        Some(OperationResult::PlainText(String::new()))
    );
}

#[rstest]
fn engine_failures_name_the_action() {
    let mut engine = MockEngine::new();
    engine
        .expect_decrypt()
        .times(1)
        .returning(|_| Err(EngineError::failed("decrypt", "bad passphrase")));

    let error = Dispatcher::new(&engine, None)
        .dispatch(&validated(json!({"action": "decrypt", "args": ["msg"]})))
        .expect_err("engine failure");

    assert!(matches!(error, DispatchError::Engine { action: Action::Decrypt, .. }));
    assert_eq!(error.to_string(), "decrypt: decrypt failed: bad passphrase");
}

#[rstest]
fn non_string_key_filters_are_invalid_arguments() {
    let mut engine = MockEngine::new();
    engine.expect_list_keys().never();

    let error = Dispatcher::new(&engine, None)
        .dispatch(&validated(json!({
            "action": "listKeys",
            "args": [false],
            "kwargs": {"keys": ["alice", 2]}
        })))
        .expect_err("invalid keys");

    assert!(matches!(error, DispatchError::InvalidArgument { action: Action::ListKeys, .. }));
    assert_eq!(
        error.to_string(),
        "invalid argument for listKeys: /kwargs/keys/1 must be a string, found 2"
    );
}
