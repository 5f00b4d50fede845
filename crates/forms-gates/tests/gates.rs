//! Behavior tests for the built-in gates.

use chrono::{Duration, Utc};
use serde_json::json;

use forms_gates::gates::participation_cookie_name;
use forms_gates::{GateContext, default_registry};
use forms_model::{
    Form, FormId, GateOutcome, InterruptPayload, RequestContext, Submission, SubmissionId,
};
use forms_store::{MemoryStore, SubmissionStore};

fn form(id: u64) -> Form {
    Form::new(FormId::new(id), "Survey")
}

fn submission(id: u64, form_id: u64) -> Submission {
    Submission::new(SubmissionId::new(id), FormId::new(form_id), Utc::now())
}

fn evaluate(
    slug: &str,
    form: &Form,
    submission: &Submission,
    request: &RequestContext,
    store: &MemoryStore,
) -> GateOutcome {
    let gate = default_registry().get(slug).expect("gate registered");
    let ctx = GateContext { request, store };
    gate.evaluate(form, submission, &ctx).expect("store is infallible")
}

#[test]
fn cookie_gate_rejects_when_participation_cookie_present() {
    let store = MemoryStore::new();
    let form = form(42);
    let request = RequestContext::new(Utc::now())
        .with_cookie(participation_cookie_name(FormId::new(42)), "yes");
    let outcome = evaluate("cookie_dedup", &form, &submission(1, 42), &request, &store);
    assert!(matches!(outcome, GateOutcome::Reject { .. }));
}

#[test]
fn cookie_gate_passes_without_cookie_and_sets_it_on_completion() {
    let store = MemoryStore::new();
    let form = form(42);
    let request = RequestContext::new(Utc::now());
    let outcome = evaluate("cookie_dedup", &form, &submission(1, 42), &request, &store);
    assert_eq!(outcome, GateOutcome::Pass);

    let gate = default_registry().get("cookie_dedup").unwrap();
    let ctx = GateContext {
        request: &request,
        store: &store,
    };
    let cookies = gate.completion_directives(&form, &submission(1, 42), &ctx);
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name, "has_participated_form_42");
    assert_eq!(cookies[0].value, "yes");
    assert_eq!(cookies[0].max_age, 365 * 24 * 60 * 60);
}

#[test]
fn time_window_rejects_before_start_and_after_end() {
    let store = MemoryStore::new();
    let form = form(7);
    let now = Utc::now();

    store.set_form_option(
        FormId::new(7),
        "window_start",
        json!((now + Duration::hours(1)).timestamp()),
    );
    let request = RequestContext::new(now);
    let outcome = evaluate("time_window", &form, &submission(1, 7), &request, &store);
    assert!(matches!(outcome, GateOutcome::Reject { .. }));

    store.set_form_option(
        FormId::new(7),
        "window_start",
        json!((now - Duration::hours(2)).timestamp()),
    );
    store.set_form_option(
        FormId::new(7),
        "window_end",
        json!((now - Duration::hours(1)).timestamp()),
    );
    let outcome = evaluate("time_window", &form, &submission(1, 7), &request, &store);
    assert!(matches!(outcome, GateOutcome::Reject { .. }));
}

#[test]
fn time_window_open_when_bounds_absent_or_malformed() {
    let store = MemoryStore::new();
    let form = form(7);
    let request = RequestContext::new(Utc::now());
    let outcome = evaluate("time_window", &form, &submission(1, 7), &request, &store);
    assert_eq!(outcome, GateOutcome::Pass);

    // Non-numeric bounds are treated as unconstrained.
    store.set_form_option(FormId::new(7), "window_start", json!("soon"));
    store.set_form_option(FormId::new(7), "window_end", json!({"ts": 1}));
    let outcome = evaluate("time_window", &form, &submission(1, 7), &request, &store);
    assert_eq!(outcome, GateOutcome::Pass);
}

#[test]
fn members_gate_requires_identity_and_optionally_once() {
    let store = MemoryStore::new();
    let form = form(3);

    let anonymous = RequestContext::new(Utc::now());
    let outcome = evaluate("members", &form, &submission(1, 3), &anonymous, &store);
    assert!(matches!(outcome, GateOutcome::Reject { .. }));

    let authed = RequestContext::new(Utc::now()).with_identity("ada");
    let outcome = evaluate("members", &form, &submission(1, 3), &authed, &store);
    assert_eq!(outcome, GateOutcome::Pass);

    // With members_once set, a prior completed submission rejects.
    store.set_form_option(FormId::new(3), "members_once", json!(true));
    let mut prior = submission(9, 3).with_identity("ada");
    prior.mark_completed(Utc::now()).unwrap();
    store.save(&prior).unwrap();
    let outcome = evaluate("members", &form, &submission(1, 3), &authed, &store);
    assert!(matches!(outcome, GateOutcome::Reject { .. }));
}

#[test]
fn selected_members_matches_exactly() {
    let store = MemoryStore::new();
    let form = form(5);
    store.set_form_option(FormId::new(5), "allowed_members", json!(["ada", "grace"]));

    let listed = RequestContext::new(Utc::now()).with_identity("grace");
    assert_eq!(
        evaluate("selected_members", &form, &submission(1, 5), &listed, &store),
        GateOutcome::Pass
    );

    let unlisted = RequestContext::new(Utc::now()).with_identity("Grace");
    assert!(matches!(
        evaluate("selected_members", &form, &submission(1, 5), &unlisted, &store),
        GateOutcome::Reject { .. }
    ));
}

#[test]
fn ip_gate_rejects_prior_completed_submission_from_same_address() {
    let store = MemoryStore::new();
    let form = form(8);
    let mut prior = submission(20, 8).with_remote_addr("198.51.100.7");
    prior.mark_completed(Utc::now()).unwrap();
    store.save(&prior).unwrap();

    let request = RequestContext::new(Utc::now());
    let current = submission(21, 8).with_remote_addr("198.51.100.7");
    assert!(matches!(
        evaluate("ip_dedup", &form, &current, &request, &store),
        GateOutcome::Reject { .. }
    ));

    let fresh = submission(22, 8).with_remote_addr("203.0.113.1");
    assert_eq!(
        evaluate("ip_dedup", &form, &fresh, &request, &store),
        GateOutcome::Pass
    );
}

#[test]
fn fingerprint_gate_interrupts_then_deduplicates() {
    let store = MemoryStore::new();
    let form = form(11);

    // Phase 1: no fingerprint anywhere, gate interrupts with a resume token.
    let request = RequestContext::new(Utc::now());
    let outcome = evaluate("fingerprint_dedup", &form, &submission(1, 11), &request, &store);
    let GateOutcome::Interrupt(InterruptPayload::Fingerprint { resume_token, script }) = outcome
    else {
        panic!("expected fingerprint interrupt");
    };
    assert!(!resume_token.is_empty());
    assert!(!script.is_empty());

    // Phase 2: fingerprint attached, no duplicate -> pass.
    let resumed = RequestContext::new(Utc::now()).with_fingerprint("device-1");
    assert_eq!(
        evaluate("fingerprint_dedup", &form, &submission(1, 11), &resumed, &store),
        GateOutcome::Pass
    );

    // Phase 2 with a prior completed submission from the same device -> reject.
    let mut prior = submission(30, 11);
    prior.fingerprint = Some("device-1".to_string());
    prior.mark_completed(Utc::now()).unwrap();
    store.save(&prior).unwrap();
    assert!(matches!(
        evaluate("fingerprint_dedup", &form, &submission(1, 11), &resumed, &store),
        GateOutcome::Reject { .. }
    ));
}

#[test]
fn challenge_gate_enabled_only_with_both_keys_and_always_passes() {
    let store = MemoryStore::new();
    let form = form(13);
    let gate = default_registry().get("challenge").unwrap();

    assert!(!gate.is_enabled(&form, &store).unwrap());
    store.set_form_option(FormId::new(13), "challenge_site_key", json!("site"));
    assert!(!gate.is_enabled(&form, &store).unwrap());
    store.set_form_option(FormId::new(13), "challenge_secret_key", json!("secret"));
    assert!(gate.is_enabled(&form, &store).unwrap());

    let request = RequestContext::new(Utc::now());
    assert_eq!(
        evaluate("challenge", &form, &submission(1, 13), &request, &store),
        GateOutcome::Pass
    );
}

#[test]
fn gates_can_be_disabled_per_form() {
    let store = MemoryStore::new();
    let form = form(15);
    let gate = default_registry().get("ip_dedup").unwrap();
    assert!(gate.is_enabled(&form, &store).unwrap());
    store.set_form_option(FormId::new(15), "gate_ip_dedup", json!(false));
    assert!(!gate.is_enabled(&form, &store).unwrap());
}
