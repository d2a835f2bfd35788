//! Domain-focused tests for agent names, profiles, and generation settings.

use crate::agent::domain::{
    AgentConfig, AgentDomainError, AgentLevel, AgentName, AgentRole, AgentStatus,
    ParseAgentProfileError,
};
use rstest::rstest;

#[rstest]
fn agent_name_is_trimmed() {
    let name = AgentName::new("  reviewer-bot  ").expect("valid name");
    assert_eq!(name.as_str(), "reviewer-bot");
}

#[rstest]
#[case("ab")]
#[case("    ")]
fn agent_name_rejects_short_values(#[case] raw: &str) {
    assert_eq!(
        AgentName::new(raw),
        Err(AgentDomainError::InvalidAgentName(raw.to_owned()))
    );
}

#[rstest]
#[case("backend_developer", AgentRole::BackendDeveloper)]
#[case(" Tester ", AgentRole::Tester)]
#[case("PROJECT_MANAGER", AgentRole::ProjectManager)]
fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: AgentRole) {
    assert_eq!(AgentRole::try_from(raw), Ok(expected));
}

#[rstest]
fn unknown_level_names_field() {
    let err = AgentLevel::try_from("principal").expect_err("unknown level");
    assert_eq!(
        err,
        ParseAgentProfileError {
            field: "level",
            value: "principal".to_owned(),
        }
    );
}

#[rstest]
fn status_defaults_to_idle() {
    assert_eq!(AgentStatus::default(), AgentStatus::Idle);
    assert_eq!(AgentStatus::Initializing.as_str(), "initializing");
}

#[rstest]
fn default_config_is_valid() {
    let config = AgentConfig::default();
    assert_eq!(config.max_tokens, 2000);
    assert_eq!(config.validate(), Ok(()));
}

#[rstest]
fn partial_config_document_fills_defaults() {
    let config: AgentConfig =
        serde_json::from_str(r#"{"max_tokens": 512}"#).expect("valid config document");
    assert_eq!(
        config,
        AgentConfig {
            max_tokens: 512,
            ..AgentConfig::default()
        }
    );
}

#[rstest]
#[case(AgentConfig { temperature: 2.5, ..AgentConfig::default() }, "temperature")]
#[case(AgentConfig { top_p: 1.5, ..AgentConfig::default() }, "top_p")]
#[case(AgentConfig { presence_penalty: -3.0, ..AgentConfig::default() }, "presence_penalty")]
#[case(AgentConfig { max_tokens: 0, ..AgentConfig::default() }, "max_tokens")]
fn out_of_range_config_names_setting(#[case] config: AgentConfig, #[case] field: &str) {
    assert_eq!(
        config.validate(),
        Err(AgentDomainError::InvalidConfig(format!(
            "{field} is out of range"
        )))
    );
}
