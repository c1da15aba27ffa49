//! Resolver, reconciler and output extraction against a scripted remote.

mod support;

use ghrole_core::{
    Capability, DeployError, OperationKind, Parameters, Presence, ReconcileOutcome, RemoteError,
    RepoName, StackName, Template, REPO_PARAMETER,
};
use ghrole_stack::{outputs, reconciler, resolver};
use rstest::rstest;

use support::{described, missing, no_updates, CountingWaiter, FakeStackApi, ROLE_ARN};

fn stack() -> StackName {
    StackName::from("github-deploy-acme-widgets")
}

fn params() -> Parameters {
    Parameters::for_repository(&RepoName::parse("acme/widgets").expect("valid repo"))
}

// ---------------------------------------------------------------------------
// 1. Resolver
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_missing_stack_is_absent() {
    let api = FakeStackApi::new(vec![Err(missing())]);
    let presence = resolver::resolve(&api, &stack()).await.expect("resolve");
    assert_eq!(presence, Presence::Absent);
}

#[tokio::test]
async fn resolve_existing_stack_is_exists() {
    let api = FakeStackApi::new(vec![Ok(described("UPDATE_COMPLETE", None))]);
    let presence = resolver::resolve(&api, &stack()).await.expect("resolve");
    assert_eq!(presence, Presence::Exists);
}

#[rstest]
#[case::access_denied("AccessDenied", "User is not authorized to perform: cloudformation:DescribeStacks")]
#[case::throttled("Throttling", "Rate exceeded")]
#[case::bad_name("ValidationError", "1 validation error detected: Value 'a b' at 'stackName' failed to satisfy constraint")]
#[tokio::test]
async fn resolve_reraises_anything_else(#[case] category: &str, #[case] message: &str) {
    let api = FakeStackApi::new(vec![Err(RemoteError::new(category, message))]);
    let err = resolver::resolve(&api, &stack()).await.unwrap_err();
    assert!(err.is_unexpected_remote());
    assert_eq!(err.remote_source(), Some(&RemoteError::new(category, message)));
    assert_eq!(api.describe_calls(), 1, "no retry");
}

// ---------------------------------------------------------------------------
// 2. Operation selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn absent_stack_is_created_and_create_waited() {
    let api = FakeStackApi::new(vec![Err(missing())]);
    let waiter = CountingWaiter::default();

    let outcome = reconciler::reconcile(&api, &waiter, &stack(), &Template::builtin(), &params())
        .await
        .expect("reconcile");

    assert_eq!(outcome, ReconcileOutcome::Applied(OperationKind::Create));
    let submissions = api.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0, OperationKind::Create);
    assert_eq!(waiter.waits(), vec![(stack(), OperationKind::Create)]);
}

#[tokio::test]
async fn existing_stack_is_updated_and_update_waited() {
    let api = FakeStackApi::new(vec![Ok(described("CREATE_COMPLETE", None))]);
    let waiter = CountingWaiter::default();

    let outcome = reconciler::reconcile(&api, &waiter, &stack(), &Template::builtin(), &params())
        .await
        .expect("reconcile");

    assert_eq!(outcome, ReconcileOutcome::Applied(OperationKind::Update));
    assert_eq!(api.submissions()[0].0, OperationKind::Update);
    assert_eq!(waiter.waits(), vec![(stack(), OperationKind::Update)]);
}

#[tokio::test]
async fn submission_carries_full_template_parameters_and_capability() {
    let api = FakeStackApi::new(vec![Ok(described("UPDATE_COMPLETE", None))]);
    let waiter = CountingWaiter::default();
    let template = Template::builtin();

    reconciler::reconcile(&api, &waiter, &stack(), &template, &params())
        .await
        .expect("reconcile");

    let (_, request) = api.submissions().remove(0);
    assert_eq!(request.name, stack());
    assert_eq!(request.template_body, template.body());
    assert_eq!(request.parameters.get(REPO_PARAMETER), Some("acme/widgets"));
    assert_eq!(request.capabilities, vec![Capability::NamedIam]);
}

// ---------------------------------------------------------------------------
// 3. / 4. Submission failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_updates_is_success_without_waiting() {
    let api = FakeStackApi::new(vec![Ok(described("UPDATE_COMPLETE", None))])
        .failing_submit(no_updates());
    let waiter = CountingWaiter::default();

    let outcome = reconciler::reconcile(&api, &waiter, &stack(), &Template::builtin(), &params())
        .await
        .expect("no-op update is not an error");

    assert_eq!(outcome, ReconcileOutcome::NoChanges);
    assert!(waiter.waits().is_empty(), "waiter must not be invoked");
}

#[rstest]
#[case::template("ValidationError", "Template format error: Unresolved resource dependencies [Foo]")]
#[case::capability("InsufficientCapabilitiesException", "Requires capabilities : [CAPABILITY_NAMED_IAM]")]
#[case::exists("AlreadyExistsException", "Stack [github-deploy-acme-widgets] already exists")]
#[tokio::test]
async fn other_submission_failures_propagate_unchanged(
    #[case] category: &str,
    #[case] message: &str,
) {
    let api = FakeStackApi::new(vec![Err(missing())])
        .failing_submit(RemoteError::new(category, message));
    let waiter = CountingWaiter::default();

    let err = reconciler::reconcile(&api, &waiter, &stack(), &Template::builtin(), &params())
        .await
        .unwrap_err();

    match &err {
        DeployError::Remote { operation, source, .. } => {
            assert_eq!(*operation, "CreateStack");
            assert_eq!(source, &RemoteError::new(category, message));
        }
        other => panic!("expected Remote, got {other:?}"),
    }
    assert!(waiter.waits().is_empty(), "waiter must not be invoked");
}

#[tokio::test]
async fn wait_failure_surfaces_as_unexpected_remote() {
    let api = FakeStackApi::new(vec![Ok(described("UPDATE_COMPLETE", None))]);
    let waiter = CountingWaiter::failing("UPDATE_ROLLBACK_COMPLETE");

    let err = reconciler::reconcile(&api, &waiter, &stack(), &Template::builtin(), &params())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::WaitFailed { .. }), "got {err:?}");
    assert!(err.is_unexpected_remote());
    assert!(err.to_string().contains("UPDATE_ROLLBACK_COMPLETE"));
}

// ---------------------------------------------------------------------------
// 5. Output extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn extract_finds_role_among_unrelated_outputs() {
    let api = FakeStackApi::new(vec![Ok(described(
        "CREATE_COMPLETE",
        Some(&[
            ("OidcProvider", "arn:aws:iam::123456789012:oidc-provider/x"),
            ("Role", ROLE_ARN),
            ("role", "wrong-case"),
        ][..]),
    ))]);

    let value = outputs::extract_output(&api, &stack(), "Role")
        .await
        .expect("extract");
    assert_eq!(value, ROLE_ARN);
}

#[rstest]
#[case::no_such_key(Some(&[("OidcProvider", "x"), ("ROLE", "y")][..]))]
#[case::empty(Some(&[][..]))]
#[case::absent(None)]
#[tokio::test]
async fn extract_missing_key_is_output_not_found(#[case] scripted: Option<&[(&str, &str)]>) {
    let api = FakeStackApi::new(vec![Ok(described("CREATE_COMPLETE", scripted))]);

    let err = outputs::extract_output(&api, &stack(), "Role")
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::OutputNotFound { .. }), "got {err:?}");
    assert!(!err.is_unexpected_remote());
    assert!(err.to_string().contains("fail silently"));
}

#[tokio::test]
async fn extract_propagates_read_failure() {
    let api = FakeStackApi::new(vec![Err(RemoteError::new("Throttling", "Rate exceeded"))]);
    let err = outputs::extract_output(&api, &stack(), "Role")
        .await
        .unwrap_err();
    assert!(err.is_unexpected_remote());
}
