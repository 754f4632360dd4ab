use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Builds a three-screen table whose protected loader counts its invocations.
fn counting_set(calls: &Arc<AtomicU32>) -> ScreenSet<&'static str> {
    let calls = Arc::clone(calls);
    ScreenSet::new(vec![
        ScreenDescriptor::new(AppRoute::Login, Visibility::Public, || Ok("login")),
        ScreenDescriptor::new(AppRoute::Dashboard, Visibility::Protected, move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("dashboard")
        }),
        ScreenDescriptor::new(AppRoute::NotFound, Visibility::Public, || Ok("not_found")),
    ])
}

#[test]
fn loader_runs_at_most_once_across_repeated_navigations() {
    let calls = Arc::new(AtomicU32::new(0));
    let set = counting_set(&calls);

    for _ in 0..3 {
        assert_eq!(set.screen_for(AppRoute::Dashboard), Ok("dashboard"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn undeclared_route_falls_back_to_not_found_regardless_of_session() {
    let calls = Arc::new(AtomicU32::new(0));
    let set = counting_set(&calls);

    // Users is not declared in this table
    assert_eq!(set.guard(AppRoute::Users, false), GuardDecision::Allow);
    assert_eq!(set.guard(AppRoute::Users, true), GuardDecision::Allow);
    assert_eq!(set.screen_for(AppRoute::Users), Ok("not_found"));
}

#[test]
fn not_found_is_allowed_regardless_of_session() {
    let calls = Arc::new(AtomicU32::new(0));
    let set = counting_set(&calls);

    assert_eq!(set.guard(AppRoute::NotFound, false), GuardDecision::Allow);
    assert_eq!(set.guard(AppRoute::NotFound, true), GuardDecision::Allow);
}

#[test]
fn redirect_never_touches_the_protected_loader() {
    let calls = Arc::new(AtomicU32::new(0));
    let set = counting_set(&calls);

    assert_eq!(
        set.guard(AppRoute::Dashboard, false),
        GuardDecision::RedirectToLogin
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn guard_matches_decision_table_for_declared_screens() {
    let calls = Arc::new(AtomicU32::new(0));
    let set = counting_set(&calls);

    assert_eq!(set.guard(AppRoute::Dashboard, true), GuardDecision::Allow);
    assert_eq!(set.guard(AppRoute::Login, false), GuardDecision::Allow);
    assert_eq!(
        set.guard(AppRoute::Login, true),
        GuardDecision::RedirectToHome
    );
}

#[test]
fn boot_without_session_redirects_and_never_loads_protected_screen() {
    let calls = Arc::new(AtomicU32::new(0));
    let set = counting_set(&calls);

    // Boot: browser URL points at a protected path, no session
    let target = AppRoute::from_path("/dashboard");
    let resolved = match set.guard(target, false) {
        GuardDecision::Allow => target,
        GuardDecision::RedirectToLogin => AppRoute::auth_failure_redirect(),
        GuardDecision::RedirectToHome => AppRoute::auth_success_redirect(),
    };
    assert_eq!(resolved, AppRoute::Login);
    assert_eq!(set.screen_for(resolved), Ok("login"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_loader_is_cached_until_reset() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let set = ScreenSet::new(vec![ScreenDescriptor::new(
        AppRoute::Settings,
        Visibility::Protected,
        move || {
            // 第一次执行失败，重试后成功
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(LoadError::Failed("chunk fetch failed".to_string()))
            } else {
                Ok("settings")
            }
        },
    )]);

    let first = set.screen_for(AppRoute::Settings);
    assert_eq!(
        first,
        Err(LoadError::Failed("chunk fetch failed".to_string()))
    );

    // Failure is cached: the loader is not re-invoked on repeated navigation
    let second = set.screen_for(AppRoute::Settings);
    assert_eq!(second, first);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Retry path: reset clears the failure and re-runs the loader
    set.reset(AppRoute::Settings);
    assert_eq!(set.screen_for(AppRoute::Settings), Ok("settings"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
