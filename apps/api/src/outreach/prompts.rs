// LLM prompt constants for the outreach pipeline.

use serde_json::{json, Value};

/// System prompt for the screening stage. Scoring only, no drafting.
pub const SCREENING_SYSTEM: &str = "You are an experienced founder doing qualitative market research, \
    not selling a product. Evaluate a LinkedIn profile against an Ideal Customer Profile (ICP). \
    Evaluate fit only. Do NOT draft a message. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Screening prompt template.
/// Replace: {icp_description}, {thesis}, {profile_json}
pub const SCREENING_PROMPT_TEMPLATE: &str = r#"ICP Description:
{icp_description}

Research Thesis:
{thesis}

Target Profile JSON:
{profile_json}

Score the profile from 0 to 10 against the ICP:
- 9-10: Perfect fit. Strongly matches the ICP and is highly valuable to contact.
- 8: Very strong fit. High priority contact.
- 6-7: Good fit. Worth reaching out for research.
- 3-5: Weak or unclear fit. Not worth contacting right now.
- 0-2: Not a fit at all.

Return a JSON object with this EXACT schema (no extra fields):
{
  "icpScore": 7,
  "icpReason": "One concise sentence explaining the score.",
  "icpLearning": ["up to 3 short things the user could learn from this person about coordination, operations, or workflow"]
}"#;

/// Task directive for the drafting stage. The editable instruction text is the system prompt.
/// Replace: {profile_json}
pub const DRAFTING_PROMPT_TEMPLATE: &str = r#"Write the LinkedIn connection request for the person below.

Return ONLY the message body as plain text.
Do NOT wrap it in JSON, quotes, or markdown.
Do NOT restate a score, a reason, or any analysis.

Target Profile JSON:
{profile_json}"#;

/// Drafting instruction used until an operator stores their own.
pub const DEFAULT_DRAFTING_INSTRUCTION: &str = "You are an experienced founder doing qualitative market research, not selling a product.

Draft a thoughtful, low-pressure LinkedIn connection request optimised for a reply.

This is strictly for research and learning, not selling. Do NOT say the user is building or selling a product. Do NOT imply a solution, pitch, or upgrade. Keep the tone curious, respectful, and grounded in their experience.

Message constraints:
- Maximum 280 characters
- No more than 2 sentences
- Natural, human, thoughtful founder voice
- No generic filler, corporate language, or emojis
- Start with their first name
- Reference something specific and relevant from their background; if that is unclear, reference their broader role or industry
- Mention that the user is researching coordination workflows
- End with a simple, low-pressure expression of interest in their perspective";

/// JSON Schema for the screening output.
pub fn screening_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "icpScore": {
                "type": "number",
                "description": "Fit score from 0 to 10"
            },
            "icpReason": {
                "type": "string",
                "description": "One sentence explaining the score"
            },
            "icpLearning": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Up to 3 short learning bullets"
            }
        },
        "required": ["icpScore", "icpReason", "icpLearning"],
        "additionalProperties": false
    })
}

pub fn build_screening_prompt(icp_description: &str, thesis: &str, profile_json: &str) -> String {
    SCREENING_PROMPT_TEMPLATE
        .replace("{icp_description}", icp_description)
        .replace("{thesis}", thesis)
        .replace("{profile_json}", profile_json)
}

pub fn build_drafting_prompt(profile_json: &str) -> String {
    DRAFTING_PROMPT_TEMPLATE.replace("{profile_json}", profile_json)
}
