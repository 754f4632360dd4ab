use super::*;

#[test]
fn guard_decision_table_is_exhaustive() {
    assert_eq!(
        decide(Visibility::Protected, false),
        GuardDecision::RedirectToLogin
    );
    assert_eq!(decide(Visibility::Protected, true), GuardDecision::Allow);
    assert_eq!(
        decide(Visibility::Public, true),
        GuardDecision::RedirectToHome
    );
    assert_eq!(decide(Visibility::Public, false), GuardDecision::Allow);
}

#[test]
fn declared_paths_round_trip() {
    for route in [
        AppRoute::Login,
        AppRoute::Dashboard,
        AppRoute::Users,
        AppRoute::Settings,
    ] {
        assert_eq!(AppRoute::from_path(route.to_path()), route);
    }
    // The bare root is an alias for the dashboard
    assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
}

#[test]
fn unknown_paths_parse_to_not_found() {
    for path in ["/nope", "/users/42", "/login/extra", "", "dashboard"] {
        assert_eq!(AppRoute::from_path(path), AppRoute::NotFound, "{}", path);
    }
}

#[test]
fn redirect_targets_are_fixed_constants() {
    assert_eq!(AppRoute::auth_failure_redirect(), AppRoute::Login);
    assert_eq!(AppRoute::auth_success_redirect(), AppRoute::Dashboard);
}

#[test]
fn display_matches_path() {
    assert_eq!(AppRoute::Users.to_string(), "/users");
}
