//! Agent roster for the laptop assistant.
//!
//! Static descriptors only: the agent runtime owns the conversation loop,
//! model calls and web search. This module supplies the instructions, the
//! tool wiring between agents, and the text one agent hands to another.

use serde::{Deserialize, Serialize};

use crate::config::ModelsConfig;
use crate::session::UpdateOutcome;
use crate::tools::UPDATE_PREFERENCES_TOOL;

/// Search tool provided by the agent runtime.
pub const GOOGLE_SEARCH_TOOL: &str = "google_search";

/// Role an agent plays in the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Talks to the user and collects preferences.
    Root,
    /// Turns preferences into grounded recommendations.
    Recommender,
    /// Runs web searches on behalf of the recommender.
    WebSearch,
    /// Compares named laptop models.
    Comparison,
}

impl AgentRole {
    /// Every role, root first.
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Root,
        AgentRole::Recommender,
        AgentRole::WebSearch,
        AgentRole::Comparison,
    ];

    /// Config key of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Recommender => "recommender",
            Self::WebSearch => "web_search",
            Self::Comparison => "comparison",
        }
    }

    /// Name the agent is registered under in the runtime.
    pub fn agent_name(self) -> &'static str {
        match self {
            Self::Root => "root_agent",
            Self::Recommender => "laptop_search_agent",
            Self::WebSearch => "laptop_web_search_agent",
            Self::Comparison => "comparison_agent",
        }
    }
}

/// Everything the runtime needs to instantiate one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSpec {
    /// Role of the agent.
    pub role: AgentRole,
    /// Registered name.
    pub name: &'static str,
    /// Model identifier.
    pub model: String,
    /// One-line description shown to other agents.
    pub description: &'static str,
    /// System instruction.
    pub instruction: &'static str,
    /// Tools and sub-agents the agent may call.
    pub tools: Vec<&'static str>,
}

/// Errors building inter-agent requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// A comparison needs at least two named models.
    #[error("comparison needs at least two laptop models, got {found}")]
    TooFewModels {
        /// Number of non-blank model names supplied.
        found: usize,
    },
}

const ROOT_DESCRIPTION: &str = "Laptop shopping assistant that interviews the user, stores their \
                                preferences and delegates to a search-grounded recommender.";

const ROOT_INSTRUCTION: &str = r#"You are the root agent of a laptop shopping assistant.

Greet the user, then collect these preferences one short question at a time:
purpose (one or more, e.g. ["coding", "gaming"]), processor, ram, storage,
graphics, display and price_range (with currency).

If an answer is vague, ask once more and offer 3-5 concrete options, making it
clear the user may say they are not sure. If the second answer is still not
usable, record the field as "unspecified" (["unspecified"] for purpose) and move
on. Never ask about an unspecified field again.

After every answer call `update_laptop_preferences_and_build_search` with the
fields you learned. Send purpose as the full list collected so far. Read
`missing_fields` from the result and keep asking about those fields only.

When `missing_fields` is empty, confirm the collected preferences (including
the unspecified ones) and call `laptop_search_agent` exactly once with:

Laptop search text: <search_text>.
User laptop preferences JSON:
<preferences_json>

Relay its answer to the user unchanged. If the user later changes a
preference, update it with the tool and search again."#;

const RECOMMENDER_DESCRIPTION: &str = "Laptop recommendation specialist that grounds its \
                                       suggestions in current web search results.";

const RECOMMENDER_INSTRUCTION: &str = r#"You recommend laptops. Your input is a search text
followed by the user's preferences JSON.

Use `laptop_web_search_agent` to find current models that fit. Then answer in a
single message: 3-5 laptops (brand and model), each with processor, RAM,
storage, graphics, display and an approximate price, an optional product or
review link, and one or two sentences on why it fits.

Finish by asking whether the user wants to refine the list (cheaper, lighter,
stronger GPU, longer battery). Do not ask for more details before answering and
never mention your tools or helper agents."#;

const WEB_SEARCH_DESCRIPTION: &str = "Web search helper that fetches grounded, current laptop \
                                      product information.";

const WEB_SEARCH_INSTRUCTION: &str = r#"You are a search helper. Another agent calls you; you
never talk to the end user.

Treat your input as a laptop search query and call `google_search` at least
once. Summarise the most relevant results: model names, key specifications,
prices and useful product or review URLs. Do not ask questions."#;

const COMPARISON_DESCRIPTION: &str = "Helper that compares two or more laptop models using web \
                                      search.";

const COMPARISON_INSTRUCTION: &str = r#"You compare laptop models. Your input names at least two
models and may list the user's priorities.

Call `google_search` at least once per model. Compare CPU, RAM, storage,
graphics, display, typical price and notable pros and cons. Write for the end
user: a short introduction, a side-by-side comparison and a brief "which one
to choose" recommendation based on the stated priorities. Do not ask
questions."#;

/// Build the full roster with models taken from `models`.
pub fn agent_roster(models: &ModelsConfig) -> Vec<AgentSpec> {
    AgentRole::ALL
        .into_iter()
        .map(|role| agent_spec(role, models))
        .collect()
}

/// Build the descriptor for one role.
pub fn agent_spec(role: AgentRole, models: &ModelsConfig) -> AgentSpec {
    let (description, instruction, tools) = match role {
        AgentRole::Root => (
            ROOT_DESCRIPTION,
            ROOT_INSTRUCTION,
            vec![UPDATE_PREFERENCES_TOOL, AgentRole::Recommender.agent_name()],
        ),
        AgentRole::Recommender => (
            RECOMMENDER_DESCRIPTION,
            RECOMMENDER_INSTRUCTION,
            vec![AgentRole::WebSearch.agent_name()],
        ),
        AgentRole::WebSearch => (
            WEB_SEARCH_DESCRIPTION,
            WEB_SEARCH_INSTRUCTION,
            vec![GOOGLE_SEARCH_TOOL],
        ),
        AgentRole::Comparison => (
            COMPARISON_DESCRIPTION,
            COMPARISON_INSTRUCTION,
            vec![GOOGLE_SEARCH_TOOL],
        ),
    };

    AgentSpec {
        role,
        name: role.agent_name(),
        model: models.model_for(role).to_owned(),
        description,
        instruction,
        tools,
    }
}

/// Text the root agent passes to the recommender.
pub fn search_handoff(search_text: &str, preferences_json: &str) -> String {
    format!("Laptop search text: {search_text}.\nUser laptop preferences JSON:\n{preferences_json}")
}

/// Handoff text for `outcome`, or `None` while fields are still missing.
pub fn handoff_for(outcome: &UpdateOutcome) -> Option<String> {
    outcome
        .is_ready()
        .then(|| search_handoff(&outcome.search_text, &outcome.preferences_json))
}

/// Request text for the comparison agent.
///
/// # Errors
///
/// Returns [`AgentError::TooFewModels`] unless at least two non-blank model
/// names are given.
pub fn comparison_request(models: &[&str], priorities: Option<&str>) -> Result<String, AgentError> {
    let names: Vec<&str> = models
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    if names.len() < 2 {
        return Err(AgentError::TooFewModels { found: names.len() });
    }

    let mut request = format!("Compare these laptop models: {}.", names.join(" vs "));
    if let Some(priorities) = priorities.map(str::trim).filter(|p| !p.is_empty()) {
        request.push_str("\nUser priorities: ");
        request.push_str(priorities);
    }
    Ok(request)
}
