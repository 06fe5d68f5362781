//! Table-driven tests for configuration loading and validation.

use draftsweep::config::{load_config_from_str, MissingIdentityPolicy, PersistPolicy};

/// Represents a single config loading test case.
struct ConfigTestCase {
    /// Test case name for identification.
    name: &'static str,
    /// The config JSON content to test.
    config_json: &'static str,
    /// Whether loading should succeed.
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const JSON_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "empty_document",
        config_json: "{}",
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "full_scan_section",
        config_json: r#"{
            "scan": {
                "mailbox": "Shared",
                "folder": "Quality",
                "lookbackDays": 7,
                "unreadOnly": false,
                "patterns": ["scrap the lot"],
                "replyVerbs": [102],
                "replyMarker": "AW:",
                "missingIdentity": "synthesize"
            },
            "ledger": { "stateFile": "/tmp/draftsweep.json", "persist": "end-of-run" }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "null_lookback_is_unbounded",
        config_json: r#"{ "scan": { "lookbackDays": null } }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "imap_account",
        config_json: r#"{
            "imap": {
                "host": "imap.example.com",
                "username": "qa@example.com",
                "auth": { "passwordEnvVar": "DRAFTSWEEP_PASSWORD" }
            }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "malformed_json",
        config_json: r#"{ "scan": "#,
        should_succeed: false,
        expected_error: Some("parse"),
    },
    ConfigTestCase {
        name: "empty_patterns",
        config_json: r#"{ "scan": { "patterns": [] } }"#,
        should_succeed: false,
        expected_error: Some("pattern"),
    },
    ConfigTestCase {
        name: "invalid_regex",
        config_json: r#"{ "scan": { "patterns": ["rework (is"] } }"#,
        should_succeed: false,
        expected_error: Some("Invalid pattern"),
    },
    ConfigTestCase {
        name: "empty_folder",
        config_json: r#"{ "scan": { "folder": "  " } }"#,
        should_succeed: false,
        expected_error: Some("folder"),
    },
    ConfigTestCase {
        name: "empty_reply_marker",
        config_json: r#"{ "scan": { "replyMarker": "" } }"#,
        should_succeed: false,
        expected_error: Some("replyMarker"),
    },
    ConfigTestCase {
        name: "unknown_persist_policy",
        config_json: r#"{ "ledger": { "persist": "sometimes" } }"#,
        should_succeed: false,
        expected_error: Some("parse"),
    },
    ConfigTestCase {
        name: "imap_empty_host",
        config_json: r#"{ "imap": { "host": "", "username": "qa@example.com" } }"#,
        should_succeed: false,
        expected_error: Some("imap.host"),
    },
    ConfigTestCase {
        name: "imap_zero_port",
        config_json: r#"{ "imap": { "host": "imap.example.com", "port": 0, "username": "qa" } }"#,
        should_succeed: false,
        expected_error: Some("imap.port"),
    },
];

#[test]
fn test_json_config_loading() {
    for case in JSON_CONFIG_TESTS {
        let result = load_config_from_str(case.config_json);

        if case.should_succeed {
            assert!(
                result.is_ok(),
                "Test '{}' should succeed but failed: {:?}",
                case.name,
                result.err()
            );
        } else {
            let err = match result {
                Ok(_) => panic!("Test '{}' should fail but succeeded", case.name),
                Err(e) => e.to_string(),
            };
            if let Some(expected) = case.expected_error {
                assert!(
                    err.contains(expected),
                    "Test '{}': error '{}' should contain '{}'",
                    case.name,
                    err,
                    expected
                );
            }
        }
    }
}

#[test]
fn test_full_scan_section_values() {
    let config = load_config_from_str(JSON_CONFIG_TESTS[1].config_json).unwrap();

    assert_eq!(config.scan.mailbox.as_deref(), Some("Shared"));
    assert_eq!(config.scan.folder, "Quality");
    assert_eq!(config.scan.lookback_days, Some(7));
    assert!(!config.scan.unread_only);
    assert_eq!(config.scan.reply_verbs, vec![102]);
    assert_eq!(config.scan.missing_identity, MissingIdentityPolicy::Synthesize);
    assert_eq!(config.ledger.persist, PersistPolicy::EndOfRun);
    assert_eq!(
        config.ledger.state_file,
        std::path::PathBuf::from("/tmp/draftsweep.json")
    );
}

#[test]
fn test_null_lookback_is_none() {
    let config = load_config_from_str(JSON_CONFIG_TESTS[2].config_json).unwrap();
    assert_eq!(config.scan.lookback_days, None);
}

#[test]
fn test_imap_defaults() {
    let config = load_config_from_str(JSON_CONFIG_TESTS[3].config_json).unwrap();
    let imap = config.imap.unwrap();

    assert_eq!(imap.port, 993);
    assert!(imap.use_tls);
    assert_eq!(imap.drafts_folder, "Drafts");
    assert_eq!(imap.from_address(), "qa@example.com");
    assert_eq!(imap.account_id(), "qa@example.com@imap.example.com");
}
