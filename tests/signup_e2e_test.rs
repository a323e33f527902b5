//! The signup archetype registers one account per round and uses its token

mod common;

use anyhow::Result;
use axum::http::Method;
use common::{fast_plan, StubServer, STUB_TOKEN};
use dracin_config::DracinConfig;
use dracin_scenarios::catalog::{SIGNUP_REFERRAL_CODE, STRESS_EMAIL_DOMAIN};
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_signup_registers_and_uses_token() -> Result<()> {
    let server = StubServer::spawn(&[]).await?;

    let mut config = DracinConfig::default();
    config.scenarios.archetypes = vec!["signup".to_string()];
    config.load.users = 1;
    config.load.hatch_rate = "1".to_string();
    config.load.run_time = Duration::from_secs(3);
    let plan = fast_plan(&mut config, &server)?;

    let report = dracin_runner::run(&plan).await?;
    assert_eq!(report.summary.total_failures(), 0);

    for name in [
        "/register",
        "/api/referral/lookup",
        "/api/auth/check-username",
        "/api/auth/register",
        "/api/auth/login",
        "/api/auth/me",
        "/api/referral/me",
    ] {
        assert!(
            report.summary.endpoint(name).is_some(),
            "signup never reached {}",
            name
        );
    }

    for hit in server.hits_to("/register") {
        assert_eq!(hit.query["ref"], SIGNUP_REFERRAL_CODE);
    }
    assert!(!server
        .hits_to(&format!("/api/referral/lookup/{}", SIGNUP_REFERRAL_CODE))
        .is_empty());

    let registered = server.hits_to("/api/auth/register");
    assert!(!registered.is_empty());
    for hit in &registered {
        assert_eq!(hit.method, Method::POST);
        let body = hit.body.as_ref().expect("register carries a JSON body");
        assert!(body["email"]
            .as_str()
            .unwrap()
            .ends_with(&format!("@{}", STRESS_EMAIL_DOMAIN)));
        assert_eq!(body["referralCode"], SIGNUP_REFERRAL_CODE);
    }

    // login reuses the account registered in the same round
    let logins = server.hits_to("/api/auth/login");
    for (register, login) in registered.iter().zip(&logins) {
        let register = register.body.as_ref().unwrap();
        let login = login.body.as_ref().unwrap();
        assert_eq!(register["username"], login["username"]);
        assert_eq!(register["password"], login["password"]);
    }

    let bearer = format!("Bearer {}", STUB_TOKEN);
    for path in ["/api/auth/me", "/api/referral/me"] {
        let hits = server.hits_to(path);
        assert!(!hits.is_empty());
        for hit in hits {
            assert_eq!(hit.authorization.as_deref(), Some(bearer.as_str()));
        }
    }

    // the anonymous steps carry no token
    for hit in server.hits_to("/register") {
        assert_eq!(hit.authorization, None);
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_signup_without_token_skips_profile_steps() -> Result<()> {
    let server = StubServer::spawn(&["/api/auth/register", "/api/auth/login"]).await?;

    let mut config = DracinConfig::default();
    config.scenarios.archetypes = vec!["signup".to_string()];
    config.load.users = 1;
    config.load.hatch_rate = "1".to_string();
    config.load.run_time = Duration::from_secs(2);
    let plan = fast_plan(&mut config, &server)?;

    dracin_runner::run(&plan).await?;

    assert!(!server.hits_to("/api/auth/register").is_empty());
    assert!(server.hits_to("/api/auth/me").is_empty());
    assert!(server.hits_to("/api/referral/me").is_empty());

    Ok(())
}
