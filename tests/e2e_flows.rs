use assert_cmd::Command;
use httpmock::prelude::*;
use httpmock::Mock;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

const TOKEN_BODY: &str = r#"{"access_token": "T"}"#;

const CHANGE_BODY: &str = r#"{
    "result": [
        {
            "number": "CHG0000001",
            "short_description": "Patch app servers",
            "description": "Apply the January patch set",
            "type": "normal",
            "state": "15",
            "phase": "requested",
            "risk": "moderate",
            "priority": "3",
            "start_date": "2024-01-05 10:00:00",
            "end_date": "2024-01-05 14:00:00",
            "requested_by": {"link": "https://example/api/now/table/sys_user/u1", "value": "u1"},
            "assignment_group": {"link": "https://example/api/now/table/sys_user_group/g1", "value": "abcdegeghfkkd"}
        },
        {
            "number": "CHG0000002",
            "short_description": "Rotate TLS certificates",
            "state": "15",
            "approval": "approved"
        }
    ]
}"#;

struct TestEnv {
    server: MockServer,
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            server: MockServer::start(),
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("snow").unwrap();
        cmd.env_clear()
            .current_dir(self.dir.path())
            .env("RD_OPTION_SNOW_INSTANCE", "dev00001")
            .env("RD_OPTION_SNOW_USERNAME", "rundeck")
            .env("RD_OPTION_SNOW_PASSWORD", "hunter2")
            .env("RD_OPTION_SNOW_CLIENT_ID", "client")
            .env("RD_OPTION_SNOW_CLIENT_SECRET", "secret")
            .env("RD_OPTION_SNOW_API_URL", self.server.base_url());
        cmd
    }

    fn mock_token(&self) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST).path("/oauth_token.do");
            then.status(200)
                .header("content-type", "application/json")
                .body(TOKEN_BODY);
        })
    }

    fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("read output file")
    }
}

#[test]
fn change_list_sends_bearer_token_and_writes_artifacts() {
    let env = TestEnv::new();
    let token = env.mock_token();
    let table = env.server.mock(|when, then| {
        when.method(GET)
            .path("/api/now/table/change_request")
            .header("authorization", "Bearer T")
            .query_param(
                "sysparm_query",
                "active=true^state=15^assignment_group=abcdegeghfkkd",
            )
            .query_param("sysparm_limit", "1000");
        then.status(200)
            .header("content-type", "application/json")
            .body(CHANGE_BODY);
    });

    env.cmd()
        .args(["change", "list"])
        .assert()
        .success()
        .stdout(
            contains("Found 2 change requests:")
                .and(contains("Change Number: CHG0000001"))
                .and(contains("Start Date: 2024-01-05"))
                .and(contains("End Date: 2024-01-05"))
                .and(contains("Approval: N/A"))
                .and(contains("Approval: approved"))
                .and(contains("Start Date: Not set")),
        );

    token.assert();
    table.assert();

    assert_eq!(env.read_file("change_count.txt"), "2");
    assert_eq!(
        env.read_file("change_request_summary.txt"),
        "Total Change Requests: 2\n\
         CHG0000001: Patch app servers\n\
         CHG0000002: Rotate TLS certificates\n"
    );
}

#[test]
fn token_failure_stops_before_the_table_query() {
    let env = TestEnv::new();
    let token = env.server.mock(|when, then| {
        when.method(POST).path("/oauth_token.do");
        then.status(401)
            .header("content-type", "application/json")
            .body(r#"{"error": "access_denied"}"#);
    });
    let table = env.server.mock(|when, then| {
        when.method(GET).path("/api/now/table/change_request");
        then.status(200).body(r#"{"result": []}"#);
    });

    env.cmd()
        .args(["change", "list"])
        .assert()
        .failure()
        .stderr(contains("Error getting token").and(contains("401")));

    token.assert();
    table.assert_calls(0);
    assert!(!env.dir.path().join("change_count.txt").exists());
    assert!(!env.dir.path().join("change_request_summary.txt").exists());
}

#[test]
fn empty_change_result_writes_the_total_line_only() {
    let env = TestEnv::new();
    env.mock_token();
    env.server.mock(|when, then| {
        when.method(GET).path("/api/now/table/change_request");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"result": []}"#);
    });

    env.cmd()
        .args(["change", "list"])
        .assert()
        .success()
        .stdout(contains("Found 0 change requests:"));

    assert_eq!(
        env.read_file("change_request_summary.txt"),
        "Total Change Requests: 0\n"
    );
    assert_eq!(env.read_file("change_count.txt"), "0");
}

#[test]
fn incident_list_writes_the_count_file() {
    let env = TestEnv::new();
    let token = env.mock_token();
    let table = env.server.mock(|when, then| {
        when.method(GET)
            .path("/api/now/table/incident")
            .header("authorization", "Bearer T")
            .query_param("sysparm_fields", "number,short_description");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{
                    "result": [
                        {"number": "INC0000001", "short_description": "Mail queue backed up"},
                        {"number": "INC0000002", "short_description": "VPN flapping"},
                        {"number": "INC0000003"}
                    ]
                }"#,
            );
    });

    env.cmd()
        .args(["incident", "list"])
        .assert()
        .success()
        .stdout(
            contains("Found 3 incidents:")
                .and(contains("Incident Number: INC0000001"))
                .and(contains("Description: Mail queue backed up"))
                .and(contains("Description: N/A"))
                .and(contains("---")),
        );

    token.assert();
    table.assert();

    assert_eq!(env.read_file("incident_count.txt"), "3");
}

#[test]
fn query_flags_override_the_default_filter() {
    let env = TestEnv::new();
    env.mock_token();
    let table = env.server.mock(|when, then| {
        when.method(GET)
            .path("/api/now/table/change_request")
            .query_param("sysparm_query", "active=true^state=3^assignment_group=netops")
            .query_param("sysparm_limit", "25");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"result": []}"#);
    });

    env.cmd()
        .args([
            "change",
            "list",
            "--assignment-group",
            "netops",
            "--state",
            "3",
            "--limit",
            "25",
        ])
        .assert()
        .success();

    table.assert();
}

#[test]
fn query_env_variables_override_the_default_filter() {
    let env = TestEnv::new();
    env.mock_token();
    let table = env.server.mock(|when, then| {
        when.method(GET)
            .path("/api/now/table/incident")
            .query_param("sysparm_query", "active=true^state=7^assignment_group=dba");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"result": []}"#);
    });

    env.cmd()
        .args(["incident", "list"])
        .env("RD_OPTION_SNOW_ASSIGNMENT_GROUP", "dba")
        .env("RD_OPTION_SNOW_STATE", "7")
        .assert()
        .success();

    table.assert();
}

#[test]
fn json_output_prints_the_raw_records() {
    let env = TestEnv::new();
    env.mock_token();
    env.server.mock(|when, then| {
        when.method(GET).path("/api/now/table/change_request");
        then.status(200)
            .header("content-type", "application/json")
            .body(CHANGE_BODY);
    });

    env.cmd()
        .args(["change", "list", "--output", "json"])
        .assert()
        .success()
        .stdout(
            contains(r#""number": "CHG0000001""#)
                .and(contains(r#""assignment_group": "abcdegeghfkkd""#))
                .and(contains("Found 2 change requests:").not()),
        );
}
