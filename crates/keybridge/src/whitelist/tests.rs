//! Unit tests for the action registry.

use keybridge_schema::MismatchReason;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;

#[fixture]
fn whitelist() -> Whitelist {
    Whitelist::standard()
}

fn request(value: Value) -> Request {
    serde_json::from_value(value).expect("request shape")
}

#[rstest]
fn every_action_is_registered(whitelist: Whitelist) {
    for action in Action::ALL {
        assert!(whitelist.entry(action).is_some(), "{action} missing");
    }
}

#[rstest]
#[case::get_version(Action::GetVersion, "getVersion")]
#[case::list_keys(Action::ListKeys, "listKeys")]
#[case::verify(Action::VerifySignatureAgainstData, "verifySignatureAgainstData")]
#[case::export(Action::ExportKeys, "exportKeys")]
fn action_names_round_trip(#[case] action: Action, #[case] name: &str) {
    assert_eq!(action.as_str(), name);
    assert_eq!(name.parse::<Action>().ok(), Some(action));
}

#[rstest]
#[case::get_version(json!({"action": "getVersion", "args": [], "kwargs": {}}))]
#[case::list_keys(json!({"action": "listKeys", "args": [true], "kwargs": {}}))]
#[case::list_keys_kwargs(json!({"action": "listKeys", "args": [false], "kwargs": {"sigs": true, "keys": ["a"]}}))]
#[case::sign(json!({"action": "sign", "args": ["msg"], "kwargs": {"keyid": "ABCD", "detach": true}}))]
#[case::verify(json!({"action": "verifySignatureAgainstData", "args": ["sig", "data"]}))]
#[case::encrypt(json!({"action": "encrypt", "args": ["data", "alice"], "kwargs": {"armor": true}}))]
#[case::decrypt(json!({"action": "decrypt", "args": ["msg"]}))]
#[case::export(json!({"action": "exportKeys", "args": ["ABCD"], "kwargs": {"minimal": true}}))]
fn accepts_whitelisted_requests(whitelist: Whitelist, #[case] value: Value) {
    let result = whitelist.validate(&request(value));
    assert!(result.is_ok(), "unexpected rejection: {result:?}");
}

#[rstest]
#[case::unknown("deleteKeys")]
#[case::wrong_case("GetVersion")]
#[case::empty("")]
fn unknown_actions_fail_closed(whitelist: Whitelist, #[case] action: &str) {
    let rejection = whitelist
        .validate(&Request::new(action, Vec::new(), Map::new()))
        .expect_err("must reject");
    assert_eq!(
        rejection,
        Rejection::UnknownAction {
            action: action.to_owned()
        }
    );
}

#[rstest]
#[case::wrong_type(json!({"action": "listKeys", "args": ["true"]}), "/args/0")]
#[case::missing_arg(json!({"action": "decrypt", "args": []}), "/args")]
#[case::extra_arg(json!({"action": "decrypt", "args": ["a", "b"]}), "/args")]
#[case::extra_keyword(json!({"action": "getVersion", "args": [], "kwargs": {"verbose": true}}), "/kwargs")]
#[case::secret_export(json!({"action": "exportKeys", "args": ["ABCD"], "kwargs": {"secret": true}}), "/kwargs")]
#[case::unpinned_armor(json!({"action": "encrypt", "args": ["d", "r"], "kwargs": {"armor": false}}), "/kwargs/armor")]
#[case::clearsign(json!({"action": "sign", "args": ["m"], "kwargs": {"clearsign": true}}), "/kwargs/clearsign")]
#[case::keyword_type(json!({"action": "listKeys", "args": [true], "kwargs": {"keys": "a"}}), "/kwargs/keys")]
fn rejects_argument_mismatches(
    whitelist: Whitelist,
    #[case] value: Value,
    #[case] pointer: &str,
) {
    let rejection = whitelist.validate(&request(value)).expect_err("must reject");
    match rejection {
        Rejection::Arguments { mismatch, .. } => assert_eq!(mismatch.pointer(), pointer),
        other => panic!("unexpected rejection {other:?}"),
    }
}

#[rstest]
fn secret_export_names_the_unexpected_keyword(whitelist: Whitelist) {
    let rejection = whitelist
        .validate(&request(json!({
            "action": "exportKeys",
            "args": ["ABCD"],
            "kwargs": {"secret": true}
        })))
        .expect_err("must reject");
    let Rejection::Arguments { action, mismatch } = &rejection else {
        panic!("unexpected rejection {rejection:?}");
    };
    assert_eq!(*action, Action::ExportKeys);
    assert_eq!(
        mismatch.reason(),
        &MismatchReason::UnexpectedKey {
            key: "secret".to_owned()
        }
    );
    assert!(rejection.to_string().starts_with("forbidden action exportKeys: "));
}

#[rstest]
fn pinned_literals_fill_omitted_keywords(whitelist: Whitelist) {
    let validated = whitelist
        .validate(&request(json!({"action": "sign", "args": ["msg"], "kwargs": {"keyid": "ABCD"}})))
        .expect("valid sign request");

    assert_eq!(validated.action(), Action::Sign);
    assert_eq!(validated.args(), [json!("msg")]);
    assert_eq!(
        Value::Object(validated.kwargs().clone()),
        json!({"keyid": "ABCD", "clearsign": false, "binary": false, "detach": true})
    );
}

#[rstest]
fn type_marker_keywords_are_not_filled(whitelist: Whitelist) {
    let validated = whitelist
        .validate(&request(json!({"action": "listKeys", "args": [true]})))
        .expect("valid listing");
    assert!(validated.kwargs().is_empty());
}
