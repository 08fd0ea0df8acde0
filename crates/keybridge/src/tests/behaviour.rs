//! Behaviour-driven tests for one host run.

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use keybridge_protocol::{Request, Response, ResponseStatus};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;

use crate::audit::{AuditError, AuditSink};
use crate::engine::{SignatureInfo, VerifyOutcome, Version};
use crate::host::{Host, exit_code};
use crate::test_support::{MockEngine, request_frame, response_from};

#[derive(Default, Clone)]
struct MemoryAudit {
    records: Rc<RefCell<Vec<String>>>,
}

impl AuditSink for MemoryAudit {
    fn record(&mut self, request: &Request) -> Result<(), AuditError> {
        self.records.borrow_mut().push(request.action().to_owned());
        Ok(())
    }
}

#[derive(Default, Clone)]
enum EngineMode {
    #[default]
    Untouched,
    Version(Vec<u32>),
    GoodSignature(String),
    BadSignature,
}

#[derive(Default)]
struct World {
    input: Vec<u8>,
    engine_mode: EngineMode,
    audit: MemoryAudit,
    output: Vec<u8>,
    exit_code: Option<u8>,
}

#[fixture]
fn world() -> World {
    World::default()
}

fn unquote(text: &str) -> &str {
    text.trim().trim_matches('\'').trim_matches('"')
}

fn build_engine(mode: &EngineMode) -> MockEngine {
    let mut engine = MockEngine::new();
    match mode.clone() {
        EngineMode::Untouched => {}
        EngineMode::Version(components) => {
            engine
                .expect_version()
                .once()
                .returning(move || Ok(Version::new(components.clone())));
        }
        EngineMode::GoodSignature(keyid) => {
            engine
                .expect_verify_detached_file()
                .once()
                .returning(move |_, _| {
                    Ok(VerifyOutcome {
                        valid: true,
                        status: Some("signature good".to_owned()),
                        signature: SignatureInfo {
                            keyid: Some(keyid.clone()),
                            ..SignatureInfo::default()
                        },
                    })
                });
        }
        EngineMode::BadSignature => {
            engine
                .expect_verify_detached_file()
                .once()
                .returning(|_, _| Ok(VerifyOutcome::default()));
        }
    }
    engine
}

fn response(world: &World) -> Response {
    response_from(&world.output)
}

#[given("an engine reporting version {version}")]
fn given_version(world: &mut World, version: String) {
    let components = unquote(&version)
        .split('.')
        .map(|part| part.parse().expect("numeric component"))
        .collect();
    world.engine_mode = EngineMode::Version(components);
}

#[given("an engine accepting signatures from {keyid}")]
fn given_good_signature(world: &mut World, keyid: String) {
    world.engine_mode = EngineMode::GoodSignature(unquote(&keyid).to_owned());
}

#[given("an engine rejecting every signature")]
fn given_bad_signature(world: &mut World) {
    world.engine_mode = EngineMode::BadSignature;
}

#[given("an engine that must not be called")]
fn given_untouched_engine(world: &mut World) {
    world.engine_mode = EngineMode::Untouched;
}

#[given("the request {request}")]
fn given_request(world: &mut World, request: String) {
    let value: Value = serde_json::from_str(unquote(&request)).expect("request JSON");
    world.input = request_frame(&value);
}

#[given("no input")]
fn given_no_input(world: &mut World) {
    world.input.clear();
}

#[when("the host handles the input")]
fn when_handle(world: &mut World) {
    let engine = build_engine(&world.engine_mode);
    let mut host = Host::new(&engine, world.audit.clone(), 1024 * 1024);
    let mut output = Vec::new();
    let result = host.handle(&mut Cursor::new(world.input.clone()), &mut output);
    world.exit_code = Some(exit_code(&result));
    world.output = output;
}

#[then("no response is written")]
fn then_no_response(world: &mut World) {
    assert!(world.output.is_empty());
}

#[then("the exit code is {code}")]
fn then_exit_code(world: &mut World, code: u8) {
    assert_eq!(world.exit_code, Some(code));
}

#[then("the response is a success carrying {data}")]
fn then_success(world: &mut World, data: String) {
    let expected: Value = serde_json::from_str(unquote(&data)).expect("expected JSON");
    assert_eq!(response(world), Response::success(expected));
}

#[then("the response is an error reading {message}")]
fn then_error_message(world: &mut World, message: String) {
    assert_eq!(response(world), Response::error(unquote(&message)));
}

#[then("the response is an error starting with {prefix}")]
fn then_error_prefix(world: &mut World, prefix: String) {
    let received = response(world);
    assert_eq!(received.status(), ResponseStatus::Error);
    let text = received.data().as_str().expect("error message");
    assert!(text.starts_with(unquote(&prefix)), "unexpected message: {text}");
}

#[then("the audit log holds {count} records")]
fn then_audit_count(world: &mut World, count: usize) {
    assert_eq!(world.audit.records.borrow().len(), count);
}

#[scenario(path = "tests/features/request_pipeline.feature")]
fn request_pipeline_behaviour(world: World) {
    let _ = world;
}
