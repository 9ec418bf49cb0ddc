//! Unit tests for provider validation
//!
//! Required providers with problems abort startup; optional ones are dropped.

use std::io::Write;

use relay_domain::value_objects::BackendKind;
use relay_infrastructure::config::{CredentialResolver, ProviderDefinition, validate_providers};

fn resolver() -> CredentialResolver {
    CredentialResolver::with_vars([("ANTHROPIC_API_KEY", "sk-ant-test")])
}

fn claude() -> ProviderDefinition {
    ProviderDefinition::new("claude")
        .with_backend_kind("anthropic")
        .with_model_id("claude-sonnet-4-5")
        .with_credential_ref("env:ANTHROPIC_API_KEY")
        .with_priority(1)
}

fn local() -> ProviderDefinition {
    ProviderDefinition::new("local")
        .with_backend_kind("ollama")
        .with_model_id("llama3.1")
        .with_priority(2)
}

#[test]
fn test_valid_providers_keep_declaration_order() {
    let set = validate_providers(&[claude(), local()], &resolver()).unwrap();

    let names: Vec<_> = set.configs.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["claude", "local"]);
    assert_eq!(set.configs[0].backend_kind(), BackendKind::Anthropic);
    assert_eq!(set.configs[0].credential.as_ref().unwrap().expose(), "sk-ant-test");
    assert!(set.dropped.is_empty());
}

#[test]
fn test_optional_provider_with_missing_credential_is_dropped() {
    let gpt = ProviderDefinition::new("gpt")
        .with_backend_kind("openai")
        .with_model_id("gpt-4o-mini")
        .with_credential_ref("env:OPENAI_API_KEY")
        .optional();

    let set = validate_providers(&[claude(), gpt], &resolver()).unwrap();

    assert_eq!(set.configs.len(), 1);
    assert_eq!(set.dropped.len(), 1);
    assert_eq!(set.dropped[0].name, "gpt");
    assert!(set.dropped[0].reason.contains("OPENAI_API_KEY"));
}

#[test]
fn test_required_provider_with_missing_credential_is_fatal() {
    let gpt = ProviderDefinition::new("gpt")
        .with_backend_kind("openai")
        .with_model_id("gpt-4o-mini")
        .with_credential_ref("env:OPENAI_API_KEY");

    let error = validate_providers(&[claude(), gpt], &resolver()).unwrap_err();

    assert!(error.is_configuration());
    assert!(error.to_string().contains("gpt"));
}

#[test]
fn test_cloud_provider_without_credential_ref_is_rejected() {
    let bare = ProviderDefinition::new("claude")
        .with_backend_kind("anthropic")
        .with_model_id("claude-sonnet-4-5");

    let error = validate_providers(&[bare], &resolver()).unwrap_err();
    assert!(error.to_string().contains("credential_ref"));
}

#[test]
fn test_incomplete_blocks_are_rejected() {
    let cases = [
        ProviderDefinition::new("no-kind").with_model_id("m"),
        ProviderDefinition::new("no-model").with_backend_kind("ollama"),
        ProviderDefinition::new("bad-kind")
            .with_backend_kind("bard")
            .with_model_id("m"),
        ProviderDefinition::new("zero-timeout")
            .with_backend_kind("ollama")
            .with_model_id("m")
            .with_timeout_secs(0),
        ProviderDefinition::new("endless-timeout")
            .with_backend_kind("ollama")
            .with_model_id("m")
            .with_timeout_secs(u64::MAX),
        ProviderDefinition::new("  ")
            .with_backend_kind("ollama")
            .with_model_id("m"),
    ];

    for definition in cases {
        let name = definition.name.clone();
        let error = validate_providers(&[local(), definition], &resolver()).unwrap_err();
        assert!(error.is_configuration(), "'{name}' should be rejected");
    }
}

#[test]
fn test_duplicate_names_are_rejected() {
    let error = validate_providers(&[local(), local()], &resolver()).unwrap_err();
    assert!(error.to_string().contains("duplicate"));
}

#[test]
fn test_no_surviving_provider_is_fatal() {
    let error = validate_providers(&[], &resolver()).unwrap_err();
    assert!(error.is_configuration());

    let only_optional = ProviderDefinition::new("gpt")
        .with_backend_kind("openai")
        .with_model_id("gpt-4o-mini")
        .optional();
    let error = validate_providers(&[only_optional], &resolver()).unwrap_err();
    assert!(error.is_configuration());
}

#[test]
fn test_file_credential_reference() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "sk-from-file").unwrap();
    let definition = claude().with_credential_ref(format!("file:{}", file.path().display()));

    let set = validate_providers(&[definition], &CredentialResolver::with_vars(Vec::<(String, String)>::new()))
        .unwrap();

    assert_eq!(set.configs[0].credential.as_ref().unwrap().expose(), "sk-from-file");
}
