//! End-to-end submission lifecycle tests: container validation, gate
//! sequencing, interrupts and resumption, and post-completion actions.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;

use forms_actions::{ActionDispatcher, MailHeader, Mailer, RedirectAction};
use forms_core::{AdvanceOutcome, CompleteError, CompletionOutcome, Orchestrator};
use forms_elements::default_registry;
use forms_gates::gates::{PARTICIPATED, participation_cookie_name};
use forms_gates::{AccessGate, GateContext, GateError, GateRegistry};
use forms_model::{
    Container, Element, ElementId, ElementSettings, FieldValue, Form, FormId, GateOutcome,
    InterruptPayload, RawValue, RequestContext, SettingValue, Submission, SubmissionId,
    SubmissionStatus, ValidationErrorKind,
};
use forms_store::{MemoryStore, SubmissionStore};

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Mailer for RecordingMailer {
    fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        _headers: &[MailHeader],
    ) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), html_body.to_string()));
        Ok(())
    }
}

/// Pass-through gate that counts its evaluations.
struct CountingGate {
    count: Arc<AtomicUsize>,
}

impl AccessGate for CountingGate {
    fn slug(&self) -> &'static str {
        "counting"
    }

    fn evaluate(
        &self,
        _form: &Form,
        _submission: &Submission,
        _ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(GateOutcome::Pass)
    }
}

fn id(name: &str) -> ElementId {
    ElementId::new(name).unwrap()
}

fn input(pairs: &[(&str, &str)]) -> BTreeMap<ElementId, RawValue> {
    pairs
        .iter()
        .map(|(name, value)| (id(name), RawValue::text(*value)))
        .collect()
}

/// One-page form with a required email field.
fn contact_form() -> Form {
    let email = Element::new(id("email"), "textfield", "Email")
        .required(true)
        .with_settings(
            ElementSettings::new().with("input_type", SettingValue::Text("email".into())),
        );
    Form::new(FormId::new(1), "Contact Us")
        .with_containers(vec![Container::new("Page 1").with_elements(vec![email])])
}

fn submission(form: &Form) -> Submission {
    Submission::new(SubmissionId::new(100), form.id, Utc::now())
}

fn orchestrator<'a>(
    store: &'a MemoryStore,
    mailer: &'a RecordingMailer,
    gates: &'a GateRegistry,
    actions: &'a ActionDispatcher,
) -> Orchestrator<'a> {
    Orchestrator::new(
        default_registry(),
        gates,
        actions,
        store,
        mailer,
        "https://example.org",
    )
}

fn fill(
    engine: &Orchestrator<'_>,
    form: &Form,
    submission: &mut Submission,
    ctx: &RequestContext,
) {
    let outcome = engine
        .advance(form, submission, 0, &input(&[("email", "ada@example.org")]), ctx)
        .unwrap();
    assert!(matches!(outcome, AdvanceOutcome::Advanced { .. }));
}

#[test]
fn happy_path_completes_with_directives() {
    let form = contact_form()
        .with_gate_order(vec!["cookie_dedup".into()])
        .with_action_order(vec!["redirect".into()]);
    let store = MemoryStore::new();
    store.set_form_option(form.id, "redirect_url", serde_json::json!("/thanks"));
    let mailer = RecordingMailer::default();
    let gates = GateRegistry::default();
    let mut actions = ActionDispatcher::new();
    actions.register(Box::new(RedirectAction));
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now());
    let mut sub = submission(&form);
    fill(&engine, &form, &mut sub, &ctx);

    let outcome = engine.complete(&form, &mut sub, &ctx).unwrap();
    let CompletionOutcome::Completed {
        directives,
        action_failures,
    } = outcome
    else {
        panic!("expected completion, got {outcome:?}");
    };

    assert!(action_failures.is_empty());
    assert_eq!(directives.redirect.as_deref(), Some("/thanks"));
    assert_eq!(directives.cookies.len(), 1);
    assert_eq!(directives.cookies[0].name, participation_cookie_name(form.id));
    assert_eq!(directives.cookies[0].value, PARTICIPATED);

    assert_eq!(sub.status, SubmissionStatus::Completed);
    let stored = store.find(sub.id).unwrap().unwrap();
    assert!(stored.is_completed());
}

#[test]
fn invalid_container_aggregates_every_error_and_stores_nothing() {
    let name = Element::new(id("name"), "textfield", "Name").required(true);
    let email = Element::new(id("email"), "textfield", "Email").required(true);
    let form = Form::new(FormId::new(2), "Two required").with_containers(vec![
        Container::new("Page 1").with_elements(vec![name, email]),
    ]);

    let store = MemoryStore::new();
    let mailer = RecordingMailer::default();
    let gates = GateRegistry::default();
    let actions = ActionDispatcher::new();
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now());
    let mut sub = submission(&form);
    let outcome = engine
        .advance(&form, &mut sub, 0, &BTreeMap::new(), &ctx)
        .unwrap();

    let AdvanceOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::Required));
    assert!(sub.values.is_empty());
    assert!(sub.containers_done.is_empty());
}

#[test]
fn completion_requires_all_containers_validated() {
    let form = contact_form();
    let store = MemoryStore::new();
    let mailer = RecordingMailer::default();
    let gates = GateRegistry::default();
    let actions = ActionDispatcher::new();
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now());
    let mut sub = submission(&form);
    assert!(matches!(
        engine.complete(&form, &mut sub, &ctx),
        Err(CompleteError::NotValidated)
    ));
}

#[test]
fn completed_submission_rejects_reentry_without_side_effects() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut gates = GateRegistry::default();
    gates.register(Box::new(CountingGate {
        count: Arc::clone(&count),
    }));
    let form = contact_form().with_gate_order(vec!["counting".into()]);
    let store = MemoryStore::new();
    let mailer = RecordingMailer::default();
    let actions = ActionDispatcher::new();
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now());
    let mut sub = submission(&form);
    fill(&engine, &form, &mut sub, &ctx);
    engine.complete(&form, &mut sub, &ctx).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    assert!(matches!(
        engine.complete(&form, &mut sub, &ctx),
        Err(CompleteError::AlreadyCompleted)
    ));
    // No gate re-ran, no mail went out.
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(mailer.count(), 0);

    // Collected values are immutable through the visitor path too.
    assert!(matches!(
        engine.advance(&form, &mut sub, 0, &input(&[("email", "x@y.z")]), &ctx),
        Err(CompleteError::AlreadyCompleted)
    ));
}

#[test]
fn gate_rejection_short_circuits_later_gates() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut gates = GateRegistry::default();
    gates.register(Box::new(CountingGate {
        count: Arc::clone(&count),
    }));
    let form =
        contact_form().with_gate_order(vec!["cookie_dedup".into(), "counting".into()]);
    let store = MemoryStore::new();
    let mailer = RecordingMailer::default();
    let actions = ActionDispatcher::new();
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now())
        .with_cookie(participation_cookie_name(form.id), PARTICIPATED);
    let mut sub = submission(&form);
    fill(&engine, &form, &mut sub, &ctx);

    let outcome = engine.complete(&form, &mut sub, &ctx).unwrap();
    let CompletionOutcome::Rejected { gate, .. } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(gate, "cookie_dedup");
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert!(!sub.is_completed());
}

#[test]
fn fingerprint_resumption_does_not_rerun_passed_gates() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut gates = GateRegistry::default();
    gates.register(Box::new(CountingGate {
        count: Arc::clone(&count),
    }));
    let form = contact_form()
        .with_gate_order(vec!["counting".into(), "fingerprint_dedup".into()]);
    let store = MemoryStore::new();
    let mailer = RecordingMailer::default();
    let actions = ActionDispatcher::new();
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now());
    let mut sub = submission(&form);
    fill(&engine, &form, &mut sub, &ctx);

    let outcome = engine.complete(&form, &mut sub, &ctx).unwrap();
    let CompletionOutcome::Interrupted(InterruptPayload::Fingerprint {
        resume_token,
        script,
    }) = outcome
    else {
        panic!("expected fingerprint interrupt, got {outcome:?}");
    };
    assert!(!resume_token.is_empty());
    assert!(!script.is_empty());
    assert_eq!(sub.status, SubmissionStatus::Interrupted);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    let outcome = engine
        .resume_fingerprint(&form, &mut sub, "device-1", &ctx)
        .unwrap();
    assert!(matches!(outcome, CompletionOutcome::Completed { .. }));
    assert_eq!(sub.fingerprint.as_deref(), Some("device-1"));
    // The counting gate sits before the fingerprint gate and passed already.
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // A second submission from the same device is now a duplicate.
    let mut dup = Submission::new(SubmissionId::new(101), form.id, Utc::now());
    fill(&engine, &form, &mut dup, &ctx);
    let outcome = engine
        .complete(&form, &mut dup, &ctx.clone().with_fingerprint("device-1"))
        .unwrap();
    assert!(matches!(outcome, CompletionOutcome::Rejected { .. }));
}

#[test]
fn double_opt_in_confirms_exactly_once() {
    let form = contact_form();
    let store = MemoryStore::new();
    store.set_form_option(form.id, "double_opt_in", serde_json::json!(true));
    store.set_form_option(form.id, "opt_in_recipient", serde_json::json!("email"));
    let mailer = RecordingMailer::default();
    let gates = GateRegistry::default();
    let actions = ActionDispatcher::new();
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now());
    let mut sub = submission(&form);
    fill(&engine, &form, &mut sub, &ctx);

    let outcome = engine.complete(&form, &mut sub, &ctx).unwrap();
    let CompletionOutcome::Interrupted(InterruptPayload::OptIn { confirm_key }) = outcome
    else {
        panic!("expected opt-in interrupt, got {outcome:?}");
    };
    assert_eq!(sub.status, SubmissionStatus::Interrupted);

    // The confirmation mail went to the submitted address and carries the link.
    assert_eq!(mailer.count(), 1);
    {
        let sent = mailer.sent.lock().unwrap();
        let (to, _, body) = &sent[0];
        assert_eq!(to, "ada@example.org");
        assert!(body.contains(&format!("https://example.org/?confirm_key={confirm_key}")));
        assert!(body.contains("Contact Us"));
    }

    // Re-attempting completion re-reports the pending interrupt, no new mail.
    let outcome = engine.complete(&form, &mut sub, &ctx).unwrap();
    assert!(matches!(
        outcome,
        CompletionOutcome::Interrupted(InterruptPayload::OptIn { .. })
    ));
    assert_eq!(mailer.count(), 1);

    // The bare link resolves to this submission.
    let found = engine.find_confirmation(&confirm_key).unwrap().unwrap();
    assert_eq!(found.id, sub.id);
    assert!(engine.find_confirmation("bogus").unwrap().is_none());

    // Wrong key never completes.
    assert!(matches!(
        engine.resume_confirmation(&form, &mut sub, "wrong", &ctx),
        Err(CompleteError::KeyMismatch)
    ));
    assert!(!sub.is_completed());

    // Exact key completes, once.
    let outcome = engine
        .resume_confirmation(&form, &mut sub, &confirm_key, &ctx)
        .unwrap();
    assert!(matches!(outcome, CompletionOutcome::Completed { .. }));
    assert!(matches!(
        engine.resume_confirmation(&form, &mut sub, &confirm_key, &ctx),
        Err(CompleteError::AlreadyCompleted)
    ));
    // Still just the one opt-in mail.
    assert_eq!(mailer.count(), 1);
}

#[test]
fn unknown_gate_slugs_are_skipped() {
    let form = contact_form().with_gate_order(vec!["nonexistent".into()]);
    let store = MemoryStore::new();
    let mailer = RecordingMailer::default();
    let gates = GateRegistry::default();
    let actions = ActionDispatcher::new();
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now());
    let mut sub = submission(&form);
    fill(&engine, &form, &mut sub, &ctx);
    let outcome = engine.complete(&form, &mut sub, &ctx).unwrap();
    assert!(matches!(outcome, CompletionOutcome::Completed { .. }));
}

#[test]
fn action_failure_is_nonfatal() {
    // Redirect action listed but no target configured: the failure is
    // reported, the submission still completes.
    let form = contact_form().with_action_order(vec!["redirect".into()]);
    let store = MemoryStore::new();
    let mailer = RecordingMailer::default();
    let gates = GateRegistry::default();
    let mut actions = ActionDispatcher::new();
    actions.register(Box::new(RedirectAction));
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let ctx = RequestContext::new(Utc::now());
    let mut sub = submission(&form);
    fill(&engine, &form, &mut sub, &ctx);
    let outcome = engine.complete(&form, &mut sub, &ctx).unwrap();

    let CompletionOutcome::Completed {
        directives,
        action_failures,
    } = outcome
    else {
        panic!("expected completion, got {outcome:?}");
    };
    assert!(sub.is_completed());
    assert!(directives.redirect.is_none());
    assert_eq!(action_failures.len(), 1);
    assert!(action_failures[0].starts_with("redirect:"));
}

#[test]
fn update_value_applies_the_same_validation() {
    let name = Element::new(id("name"), "textfield", "Name")
        .required(true)
        .with_settings(ElementSettings::new().with("max_length", SettingValue::Integer(5)));
    let form = Form::new(FormId::new(3), "Edit")
        .with_containers(vec![Container::new("Page 1").with_elements(vec![name])]);
    let store = MemoryStore::new();
    let mailer = RecordingMailer::default();
    let gates = GateRegistry::default();
    let actions = ActionDispatcher::new();
    let engine = orchestrator(&store, &mailer, &gates, &actions);

    let mut sub = submission(&form);
    sub.values.insert(id("name"), FieldValue::Text("Ada".into()));

    let err = engine
        .update_value(&form, &mut sub, &id("name"), &RawValue::text("too long value"))
        .unwrap_err();
    assert!(matches!(err, CompleteError::Validation(_)));
    assert_eq!(sub.values[&id("name")], FieldValue::Text("Ada".into()));

    engine
        .update_value(&form, &mut sub, &id("name"), &RawValue::text("Grace"))
        .unwrap();
    assert_eq!(sub.values[&id("name")], FieldValue::Text("Grace".into()));

    assert!(matches!(
        engine.update_value(&form, &mut sub, &id("ghost"), &RawValue::text("x")),
        Err(CompleteError::UnknownElement(_))
    ));
}
