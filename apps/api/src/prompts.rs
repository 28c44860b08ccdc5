// All LLM prompt constants and builders for style analysis and draft
// generation. Both builders are pure string functions: identical inputs
// always yield identical prompts, which keeps prompt-regression tests cheap.

use serde_json::Value;

use crate::search_client::SearchResult;

/// System prompt for style analysis — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str =
    "You are an expert writing-style analyst. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for draft generation — enforces draft-body-only output.
pub const GENERATION_SYSTEM: &str =
    "You are an AI assistant helping a user write social media post drafts \
    that match their established writing style. \
    Respond with the text of the post draft only. \
    Do NOT include commentary, preamble, or markdown fences.";

/// Style analysis prompt template. Replace `{posts_text}` before sending.
const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following social media posts provided below to determine the author's writing style. Extract the key stylistic elements and provide the analysis as a JSON object.

The JSON object should include keys for:
- overall_tone (e.g., Formal, Informal, Enthusiastic, Analytical, Inspirational, Humorous)
- key_themes (list of strings, e.g., ["Technology", "Leadership", "Marketing"])
- common_keywords (list of strings)
- sentence_structure (e.g., "short and punchy", "complex sentences", "mix of short and long")
- emoji_usage (e.g., "frequent", "occasional", "rare", "none", specific common emojis)
- common_cta (common call-to-actions used, e.g., "Link in comments", "DM me", "Visit website", or null if none consistent)
- perspective (e.g., "First-person", "Third-person")
- style_name (Suggest a short, descriptive name for this style based on the analysis, e.g., "Professional Tech Insights", "Casual Startup Banter", "Inspirational Leadership Voice")

Please ensure the output is ONLY the JSON object, without any introductory text or explanation.

Here are the posts:
--- START POSTS ---
{posts_text}
--- END POSTS ---"#;

/// Draft generation prompt template.
/// Replace: {style_analysis_json}, {topic}, {key_points}, {cta_line},
///          {angle}, {search_summary}
const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an AI assistant helping a user write a social media post draft based on their established writing style, the provided requirements, and relevant web search results.

User's Writing Style Analysis:
<style_analysis>
{style_analysis_json}
</style_analysis>

Post Requirements:
- **Main Topic:** {topic}
- **Key Points User Wants to Include:**
{key_points}
- **Specific Angle/Focus for this draft:** {angle}
{cta_line}
{search_summary}

**Final Instruction:**
- Write a post draft that adheres to the User's Writing Style Analysis provided above.
- Focus the content on the angle: '{angle}'.
- Integrate relevant information or viewpoints found in the 'Relevant Web Search Snippets' provided above into the discussion for this angle.
- Generate only the text of the post draft itself, without any extra commentary or preamble."#;

/// Builds the style analysis prompt for a raw posts corpus.
pub fn build_analysis_prompt(posts_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{posts_text}", posts_text)
}

/// Builds the generation prompt for one angle.
///
/// The style analysis is embedded verbatim as pretty-printed JSON so the
/// model infers tone and voice from it rather than from prescriptive rules.
pub fn build_generation_prompt(
    style_analysis: &Value,
    topic: &str,
    key_points: &str,
    cta: Option<&str>,
    angle: &str,
    search_results: &[SearchResult],
) -> String {
    let style_analysis_json =
        serde_json::to_string_pretty(style_analysis).unwrap_or_else(|_| style_analysis.to_string());

    let cta_line = match cta {
        Some(cta) => format!("- **Desired Call-to-Action:** {cta}\n"),
        None => String::new(),
    };

    GENERATION_PROMPT_TEMPLATE
        .replace("{style_analysis_json}", &style_analysis_json)
        .replace("{topic}", topic)
        .replace("{key_points}", key_points)
        .replace("{cta_line}", &cta_line)
        .replace("{angle}", angle)
        .replace("{search_summary}", &render_search_summary(search_results))
}

/// Renders search snippets for prompt embedding. An empty result list gets
/// an explicit sentence so the model knows context is absent rather than
/// omitted by mistake.
fn render_search_summary(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No specific web search results available for this angle.".to_string();
    }
    let mut summary = String::from("Relevant Web Search Snippets:\n");
    for result in results {
        summary.push_str(&format!(
            "- Title: {}\n  Snippet: {}\n",
            result.title, result.description
        ));
    }
    summary
}
