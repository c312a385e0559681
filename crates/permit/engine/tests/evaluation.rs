//! End-to-end evaluation scenarios through the service and gate.

use std::sync::Arc;

use permit_engine::{
    CheckerRegistry, CountingChecker, DecisionEngine, DenialReason, FnChecker, GuardedOperation,
    MockPrincipalResolver, PermissionDeclaration, PermissionGate, PermissionService,
    PermitConfig, StaticChecker, SubjectBag,
};
use permit_types::{Principal, RequiredPermissions, Role, Subject, ValidationError};

#[derive(Debug)]
struct Article {
    id: u64,
}

fn service(principal: Option<Principal>, checkers: CheckerRegistry) -> PermissionService {
    let resolver = match principal {
        Some(p) => MockPrincipalResolver::with_principal(p),
        None => MockPrincipalResolver::anonymous(),
    };
    PermissionService::new(Arc::new(DecisionEngine::new(checkers)), Arc::new(resolver))
}

fn holding(codes: &[&str]) -> Principal {
    Principal::new("user-1").with_role(Role::new("role").with_permissions(codes.iter().copied()))
}

#[test]
fn single_held_code_with_default_mode() {
    let service = service(Some(holding(&["user_view"])), CheckerRegistry::new());
    assert!(service.can_codes(&["user_view"], None, None).unwrap());
}

#[test]
fn all_mode_with_missing_code() {
    let service = service(Some(holding(&["user_view"])), CheckerRegistry::new());
    assert!(!service
        .can_codes(&["user_view", "user_edit"], Some("ALL"), None)
        .unwrap());
}

#[test]
fn all_mode_with_every_code_held() {
    let service = service(Some(holding(&["user_view", "user_edit"])), CheckerRegistry::new());
    assert!(service
        .can_codes(&["user_view", "user_edit"], Some("ALL"), None)
        .unwrap());
}

#[test]
fn contextual_denial_overrides_base_possession() {
    let checkers = CheckerRegistry::new().register(Arc::new(FnChecker::for_type::<Article, _>(
        "article-7-locked",
        "article_edit",
        |_, article| article.id != 7,
    )));
    let service = service(Some(holding(&["article_edit"])), checkers);
    let article_7 = Subject::new(Article { id: 7 });
    let article_8 = Subject::new(Article { id: 8 });

    assert!(!service
        .can_codes(&["article_edit"], None, Some(&article_7))
        .unwrap());
    assert!(service
        .can_codes(&["article_edit"], None, Some(&article_8))
        .unwrap());
}

#[test]
fn no_role_denies_everything() {
    let service = service(Some(Principal::new("roleless")), CheckerRegistry::new());
    assert!(!service.can_codes(&["user_view"], None, None).unwrap());
    assert!(!service.can_codes(&["a", "b"], Some("all"), None).unwrap());
    assert!(!service
        .can_codes(&["a"], None, Some(&Subject::new(Article { id: 1 })))
        .unwrap());
}

#[test]
fn empty_requirement_is_rejected_before_evaluation() {
    let codes: [&str; 0] = [];
    assert_eq!(
        RequiredPermissions::any_of(codes),
        Err(ValidationError::EmptyCodeList)
    );
    assert_eq!(
        PermissionDeclaration::parse(codes, "any", None),
        Err(ValidationError::EmptyCodeList)
    );
}

#[test]
fn second_supporting_checker_is_never_consulted() {
    let subject = Subject::new(Article { id: 1 });
    let required = RequiredPermissions::one("article_edit").unwrap();

    for second_verdict in [true, false] {
        let second = Arc::new(CountingChecker::new(if second_verdict {
            StaticChecker::allow("second")
        } else {
            StaticChecker::deny("second")
        }));
        let checkers = CheckerRegistry::new()
            .register(Arc::new(StaticChecker::allow("first")))
            .register(second.clone());
        let service = service(Some(holding(&["article_edit"])), checkers);

        assert!(service.can(&required, Some(&subject)));
        assert_eq!(second.supports_calls(), 0);
        assert_eq!(second.can_calls(), 0);
    }
}

#[test]
fn gate_driven_by_configuration() {
    let config = PermitConfig::from_toml_str(
        r#"
        denial_message = "You shall not pass"

        [[guards.edit_article]]
        permission = ["article_edit", "article_admin"]
        subject = "article"
        "#,
    )
    .unwrap();

    let checkers = CheckerRegistry::new().register(Arc::new(FnChecker::for_type::<Article, _>(
        "even-articles",
        "article_edit",
        |_, article| article.id % 2 == 0,
    )));
    let engine = Arc::new(DecisionEngine::from_config(&config, checkers));
    let service = PermissionService::new(
        engine,
        Arc::new(MockPrincipalResolver::with_principal(holding(&["article_edit"]))),
    );
    let gate = PermissionGate::from_config(service, &config);
    let operation: GuardedOperation = config.guarded_operation("edit_article").unwrap().unwrap();

    let even = SubjectBag::new().with("article", Article { id: 2 });
    assert!(gate.enforce(&operation, &even).is_ok());

    let odd = SubjectBag::new().with("article", Article { id: 3 });
    let err = gate.enforce(&operation, &odd).unwrap_err();
    assert_eq!(err.to_string(), "You shall not pass");
    assert_eq!(
        err.reason(),
        &DenialReason::ContextualDenial {
            code: "article_edit".into(),
            checker: "even-articles".into(),
        }
    );
}
