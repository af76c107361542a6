//! Prompts for the coaching assistant. The user turn is rendered
//! with Handlebars in strict mode so a missing field is an error
//! rather than a silently empty section.

use std::fmt;
use std::sync::LazyLock;

use anyhow::Result;
use handlebars::Handlebars;
use serde_json::json;

use crate::api::public::help::HelpRequest;
use crate::core::AppConfig;
use crate::openai::{InputContent, InputMessage, ResponseRequest, Role, TextOptions};

#[derive(Debug)]
pub enum Prompt {
    HelpRequest,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

/// Developer instructions sent with every request. Never shown to the
/// student.
pub const COACHING_POLICY: &str = "Help students understand and fix their code or lab assignments by guiding them through the process of debugging and problem-solving, without directly providing the full answer or solution code. Your responses should primarily focus on prompting the student to reason about their problem, analyze likely causes, and consider relevant concepts or debugging steps before they reach a solution. Only offer hints, explanations, or ask clarifying questions as needed. Do not write or output full solutions. Engage the student in a pedagogical manner to encourage learning and independent thought.

**Guidelines:**
- First, ask the student to describe the problem or share the specific error, output, or code snippet they are working on.
- Guide them with targeted hints or questions, focusing on underlying concepts, logic, or debugging techniques.
- Encourage the student to analyze their own code, reason step-by-step, and reflect on how each part functions.
- Avoid providing complete answers or explicit code solutions.
- Support student learning by modeling a problem-solving mindset and helping them recognize what to try next.
- Repeat this process interactively until the student is on track or indicates understanding.

**Output Format:**
Respond in a short paragraph tailored to the student’s input, using direct questions or hints to encourage reasoning. Do not include full code or direct answers.

**Important considerations:**
- Never give explicit final solutions.
- Always lead with reasoning, then guide the student step-by-step.
- Adjust guidance based on student input and progress.

**Reminder:**
Your role is to help students troubleshoot and learn problem-solving steps by guiding, questioning, and prompting reasoning, never by providing direct code answers.";

pub const NO_ASK_PLACEHOLDER: &str = "(no extra description provided)";
pub const NO_CODE_PLACEHOLDER: &str = "(none provided)";

const HELP_REQUEST_PROMPT: &str = "Student request/context:
• {{ask}}

Code snippet (may be partial):
{{code}}

Task: Give coaching-only hints and questions. Do NOT provide solutions or final code.";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Student code goes through verbatim, `<` and `&` included
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::HelpRequest.to_string(), HELP_REQUEST_PROMPT)
        .expect("Failed to register template");
    registry
}

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(templates);

/// Returns at most the first `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Renders the text block of the user turn.
pub fn help_request_text(payload: &HelpRequest, max_code_chars: usize) -> Result<String> {
    let ask = payload
        .ask
        .as_deref()
        .map(str::trim)
        .filter(|ask| !ask.is_empty())
        .unwrap_or(NO_ASK_PLACEHOLDER);

    let code = payload.code.as_deref().unwrap_or_default();
    let code = if code.trim().is_empty() {
        NO_CODE_PLACEHOLDER
    } else {
        let truncated = truncate_chars(code, max_code_chars);
        if truncated.len() < code.len() {
            tracing::debug!(
                "Truncated code snippet to {} characters ({} bytes dropped)",
                max_code_chars,
                code.len() - truncated.len()
            );
        }
        truncated
    };

    let text = TEMPLATES.render(
        &Prompt::HelpRequest.to_string(),
        &json!({"ask": ask, "code": code}),
    )?;
    Ok(text)
}

/// Builds the full request for the model from what the student
/// submitted: the coaching policy as the developer turn followed by a
/// single user turn with the rendered text and one image block per
/// attachment, in the order they were given.
pub fn help_request(payload: &HelpRequest, config: &AppConfig) -> Result<ResponseRequest> {
    let mut content = vec![InputContent::text(&help_request_text(
        payload,
        config.max_code_chars,
    )?)];

    for image in payload.images.iter() {
        if image.src.is_empty() {
            tracing::debug!("Skipping attachment {:?} without a source", image.name);
            continue;
        }
        content.push(InputContent::image(&image.src));
    }

    Ok(ResponseRequest {
        model: config.openai_model.clone(),
        store: config.store_responses,
        text: TextOptions::plain(),
        input: vec![
            InputMessage::new(Role::Developer, vec![InputContent::text(COACHING_POLICY)]),
            InputMessage::new(Role::User, content),
        ],
    })
}
