//! Argument construction of every `cf` call made by `CfCli`.

#![allow(clippy::expect_used)]

use std::path::Path;
use std::time::Duration;

use mits::application::ports::{
    AppOperations, SecurityGroupOperations, ServiceOperations, ServiceRequest, SessionOperations,
};
use mits::domain::Lifecycle;
use mits::infra::{CfCli, Identity};
use mits::infra::cf::CF_BINARY;

use crate::mocks::ScriptedRunner;

const T: Duration = Duration::from_secs(5);

fn last_args(runner: &ScriptedRunner) -> Vec<String> {
    runner.calls().last().expect("a call").args.clone()
}

#[tokio::test]
async fn test_app_operations() {
    let runner = ScriptedRunner::default();
    let cf = CfCli::new(&runner);

    cf.push_without_start("app-1", "apps/redis", T).await.expect("push");
    assert_eq!(last_args(&runner), ["push", "app-1", "--no-start", "-p", "apps/redis"]);

    cf.set_env("app-1", "SERVICE_NAME", "svc-1", T).await.expect("set-env");
    assert_eq!(last_args(&runner), ["set-env", "app-1", "SERVICE_NAME", "svc-1"]);

    cf.start("app-1", T).await.expect("start");
    assert_eq!(last_args(&runner), ["start", "app-1"]);

    cf.delete_app("app-1", T).await.expect("delete");
    assert_eq!(last_args(&runner), ["delete", "app-1", "-r", "-f"]);

    cf.recent_logs("app-1", T).await.expect("logs");
    assert_eq!(last_args(&runner), ["logs", "app-1", "--recent"]);
}

#[tokio::test]
async fn test_service_operations() {
    let runner = ScriptedRunner::default();
    let cf = CfCli::new(&runner);

    let request = ServiceRequest {
        class: "redis",
        plan: "small",
        name: "svc-1",
        broker: "minibroker",
        params_json: r#"{"auth":{"enabled":false}}"#,
    };
    cf.create_service(&request, T).await.expect("create");
    assert_eq!(
        last_args(&runner),
        [
            "create-service",
            "redis",
            "small",
            "svc-1",
            "-b",
            "minibroker",
            "-c",
            r#"{"auth":{"enabled":false}}"#,
        ]
    );

    cf.service("svc-1", T).await.expect("service");
    assert_eq!(last_args(&runner), ["service", "svc-1"]);

    cf.bind_service("app-1", "svc-1", T).await.expect("bind");
    assert_eq!(last_args(&runner), ["bind-service", "app-1", "svc-1"]);

    cf.unbind_service("app-1", "svc-1", T).await.expect("unbind");
    assert_eq!(last_args(&runner), ["unbind-service", "app-1", "svc-1", "-f"]);

    cf.create_service_key("svc-1", "svc-1-key", T).await.expect("key");
    assert_eq!(last_args(&runner), ["create-service-key", "svc-1", "svc-1-key"]);

    cf.service_key("svc-1", "svc-1-key", T).await.expect("key");
    assert_eq!(last_args(&runner), ["service-key", "svc-1", "svc-1-key"]);

    cf.delete_service_key("svc-1", "svc-1-key", T).await.expect("key");
    assert_eq!(last_args(&runner), ["delete-service-key", "svc-1", "svc-1-key", "-f"]);

    cf.delete_service("svc-1", T).await.expect("delete");
    assert_eq!(last_args(&runner), ["delete-service", "svc-1", "-f"]);
}

#[tokio::test]
async fn test_security_group_operations() {
    let runner = ScriptedRunner::default();
    let cf = CfCli::new(&runner);

    cf.create_security_group("sg-1", Path::new("/tmp/sg-1.json"), T)
        .await
        .expect("create");
    assert_eq!(last_args(&runner), ["create-security-group", "sg-1", "/tmp/sg-1.json"]);

    cf.bind_security_group("sg-1", "org", "space", Lifecycle::Running, T)
        .await
        .expect("bind");
    assert_eq!(
        last_args(&runner),
        ["bind-security-group", "sg-1", "org", "space", "--lifecycle", "running"]
    );

    cf.unbind_security_group("sg-1", "org", "space", Lifecycle::Running, T)
        .await
        .expect("unbind");
    assert_eq!(
        last_args(&runner),
        ["unbind-security-group", "sg-1", "org", "space", "--lifecycle", "running"]
    );

    cf.delete_security_group("sg-1", T).await.expect("delete");
    assert_eq!(last_args(&runner), ["delete-security-group", "sg-1", "-f"]);
}

#[tokio::test]
async fn test_session_operations() {
    let runner = ScriptedRunner::default();
    let cf = CfCli::new(&runner);

    cf.api("https://api.example.com", false, T).await.expect("api");
    assert_eq!(last_args(&runner), ["api", "https://api.example.com"]);

    cf.api("https://api.example.com", true, T).await.expect("api");
    assert_eq!(
        last_args(&runner),
        ["api", "https://api.example.com", "--skip-ssl-validation"]
    );

    cf.target("org", "space", T).await.expect("target");
    assert_eq!(last_args(&runner), ["target", "-o", "org", "-s", "space"]);

    cf.create_org("org", T).await.expect("org");
    assert_eq!(last_args(&runner), ["create-org", "org"]);

    cf.create_space("org", "space", T).await.expect("space");
    assert_eq!(last_args(&runner), ["create-space", "space", "-o", "org"]);

    cf.create_user("user", "pw", T).await.expect("user");
    assert_eq!(last_args(&runner), ["create-user", "user", "pw"]);

    cf.set_space_role("user", "org", "space", "SpaceDeveloper", T)
        .await
        .expect("role");
    assert_eq!(
        last_args(&runner),
        ["set-space-role", "user", "org", "space", "SpaceDeveloper"]
    );

    cf.enable_service_access("redis", "minibroker", "org", T)
        .await
        .expect("access");
    assert_eq!(
        last_args(&runner),
        ["enable-service-access", "redis", "-b", "minibroker", "-o", "org"]
    );

    cf.delete_user("user", T).await.expect("user");
    assert_eq!(last_args(&runner), ["delete-user", "user", "-f"]);

    cf.delete_org("org", T).await.expect("org");
    assert_eq!(last_args(&runner), ["delete-org", "org", "-f"]);
}

#[tokio::test]
async fn test_auth_passes_credentials_through_env() {
    let runner = ScriptedRunner::default();
    let cf = CfCli::new(&runner);

    cf.auth("admin", "s3cret", T).await.expect("auth");
    let call = runner.calls().pop().expect("call");
    assert_eq!(call.args, ["auth"]);
    assert_eq!(call.env("CF_USERNAME"), Some("admin"));
    assert_eq!(call.env("CF_PASSWORD"), Some("s3cret"));
}

#[tokio::test]
async fn test_every_call_disables_color_and_uses_cf() {
    let runner = ScriptedRunner::default();
    let cf = CfCli::new(&runner);

    cf.start("app", T).await.expect("start");
    let call = runner.calls().pop().expect("call");
    assert_eq!(call.program, CF_BINARY);
    assert_eq!(call.env("CF_COLOR"), Some("false"));
    assert_eq!(call.env("CF_HOME"), None);
}

#[tokio::test]
async fn test_identity_switch_sets_cf_home() {
    let runner = ScriptedRunner::default();
    let admin = CfCli::for_identity(&runner, &Identity::new("admin", "/tmp/admin-home"));
    let user = admin.as_identity(&Identity::new("user", "/tmp/user-home"));

    admin.create_org("org", T).await.expect("org");
    user.target("org", "space", T).await.expect("target");
    admin.delete_org("org", T).await.expect("org");

    let homes: Vec<_> = runner
        .calls()
        .iter()
        .map(|c| c.env("CF_HOME").map(str::to_string))
        .collect();
    assert_eq!(
        homes,
        [
            Some("/tmp/admin-home".to_string()),
            Some("/tmp/user-home".to_string()),
            Some("/tmp/admin-home".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_runner_errors_carry_the_subcommand() {
    let runner = ScriptedRunner::default();
    runner.fail("push", "spawn failed");
    let cf = CfCli::new(&runner);

    let err = cf
        .push_without_start("app", "path", T)
        .await
        .expect_err("push must fail");
    assert!(format!("{err:#}").starts_with("cf push"), "{err:#}");
}
