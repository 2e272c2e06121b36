//! Tests for `src/agents.rs` — roster wiring and inter-agent request text.

use laptop_advisor::agents::{
    agent_roster, comparison_request, handoff_for, search_handoff, AgentError, AgentRole,
    GOOGLE_SEARCH_TOOL,
};
use laptop_advisor::config::Config;
use laptop_advisor::preferences::{PreferenceField, PreferencePatch};
use laptop_advisor::session::{PreferenceStore, SessionId};
use laptop_advisor::tools::UPDATE_PREFERENCES_TOOL;

#[test]
fn handoff_embeds_text_and_json_verbatim() {
    let json = "{\n  \"ram\": \"16GB\"\n}";
    let handoff = search_handoff("16GB RAM best laptop recommendations", json);
    assert_eq!(
        handoff,
        "Laptop search text: 16GB RAM best laptop recommendations.\n\
         User laptop preferences JSON:\n{\n  \"ram\": \"16GB\"\n}"
    );
}

#[test]
fn handoff_is_available_once_interview_completes() {
    let store = PreferenceStore::new();
    let id = SessionId::from("chat");

    let mut patch = PreferencePatch::new().with_purpose(["coding"]);
    for field in PreferenceField::SCALARS {
        patch = patch.with(field, "unspecified");
    }
    let partial = store
        .update(&id, &PreferencePatch::new().with_purpose(["coding"]))
        .expect("update should succeed");
    assert!(handoff_for(&partial).is_none());

    let complete = store.update(&id, &patch).expect("update should succeed");
    let handoff = handoff_for(&complete).expect("handoff should be ready");
    assert!(handoff.starts_with("Laptop search text: coding laptop best laptop recommendations."));
    assert!(handoff.ends_with(&complete.preferences_json));
}

#[test]
fn roster_wires_agents_together() {
    let roster = agent_roster(&Config::default().models);
    let find = |role: AgentRole| {
        roster
            .iter()
            .find(|spec| spec.role == role)
            .unwrap_or_else(|| panic!("{role:?} should be in the roster"))
    };

    let root = find(AgentRole::Root);
    assert_eq!(root.name, "root_agent");
    assert!(root.tools.contains(&UPDATE_PREFERENCES_TOOL));
    assert!(root.tools.contains(&"laptop_search_agent"));

    let recommender = find(AgentRole::Recommender);
    assert_eq!(recommender.tools, vec!["laptop_web_search_agent"]);

    for role in [AgentRole::WebSearch, AgentRole::Comparison] {
        assert_eq!(find(role).tools, vec![GOOGLE_SEARCH_TOOL]);
    }
}

#[test]
fn roster_honours_role_overrides() {
    let mut config = Config::default();
    config
        .models
        .roles
        .insert("comparison".to_owned(), "gemini-2.5-pro".to_owned());

    for spec in agent_roster(&config.models) {
        let expected = if spec.role == AgentRole::Comparison {
            "gemini-2.5-pro"
        } else {
            "gemini-2.5-flash"
        };
        assert_eq!(spec.model, expected);
    }
}

#[test]
fn comparison_request_lists_models_and_priorities() {
    let request = comparison_request(
        &["Dell XPS 15", " MacBook Pro 14 "],
        Some("battery life and portability"),
    )
    .expect("two models should be enough");
    assert_eq!(
        request,
        "Compare these laptop models: Dell XPS 15 vs MacBook Pro 14.\n\
         User priorities: battery life and portability"
    );
}

#[test]
fn comparison_request_needs_two_models() {
    assert_eq!(
        comparison_request(&["Dell XPS 15"], None),
        Err(AgentError::TooFewModels { found: 1 })
    );
    assert_eq!(
        comparison_request(&[], Some("gaming")),
        Err(AgentError::TooFewModels { found: 0 })
    );
}
