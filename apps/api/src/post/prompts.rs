// All LLM prompt constants for the post pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.
// Templates use `{name}` placeholders. Anything carrying user or LLM text is
// filled with `fill_template`.

use crate::llm_client::prompts::{fill_template, prohibited_expressions};

/// Mandatory opening sentence of every post. Replace `{restaurant}`.
pub const GREETING_TEMPLATE: &str = "안녕하세요, 오늘 소개해드릴 곳은 {restaurant}입니다!";

pub fn greeting(restaurant: &str) -> String {
    fill_template(GREETING_TEMPLATE, &[("restaurant", restaurant)])
}

// ────────────────────────────────────────────────────────────────────────────
// Restaurant resolution
// ────────────────────────────────────────────────────────────────────────────

pub const RESTAURANT_SYSTEM: &str = "\
Please find the restaurant's name in the given blog post title.\n\
Return only the name itself, without quotes, location, or decoration.\n\
---\n\
Respond as a JSON object with this EXACT schema:\n\
{\"restaurant\": \"name of the restaurant\"}";

/// Replace `{title}`.
pub const RESTAURANT_PROMPT_TEMPLATE: &str = "Title is here.\n{title}";

// ────────────────────────────────────────────────────────────────────────────
// Shared writing guidelines
// ────────────────────────────────────────────────────────────────────────────

/// Guidelines shared by planner, writers, reviewer and revisor.
/// Replace `{prohibited}`, `{greeting}`, `{restaurant}`.
pub const POST_GUIDELINES_TEMPLATE: &str = "\
Please follow these guidelines ordered by **their priorities**.\n\
1. The post should be attractive IN A CALM TONE and MUST NOT use exaggerated or recommending \
expressions, even if the given information contains them.\n\
    - Prohibited expressions include {prohibited}, and similar ones.\n\
2. The post should be written IN KOREAN and in the PAST TENSE.\n\
3. The post should use one of the given keywords, in context, in every 300 characters.\n\
4. The post MUST start with \"{greeting}\" and end with sentences about visiting {restaurant}.";

/// Renders `POST_GUIDELINES_TEMPLATE` for a resolved restaurant.
pub fn guidelines(restaurant: &str) -> String {
    fill_template(
        POST_GUIDELINES_TEMPLATE,
        &[
            ("prohibited", &prohibited_expressions()),
            ("greeting", &greeting(restaurant)),
            ("restaurant", restaurant),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Writing plan
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{guidelines}`, `{min_length}`, `{max_length}`, `{closing}`, `{json_only}`.
pub const PLAN_SYSTEM_TEMPLATE: &str = "\
As a food columnist, your task is to plan how to write a blog post from a reader's request.\n\
---\n\
{guidelines}\n\
5. The sum of every section's target_length MUST be between {min_length} and {max_length} characters.\n\
---\n\
Return a JSON object with this EXACT schema (no extra fields):\n\
{\n\
  \"introduction\": {\"subject\": \"...\", \"target_length\": 300},\n\
  \"bodies\": [{\"subject\": \"...\", \"target_length\": 400}],\n\
  \"conclusion\": {\"subject\": \"...\", \"target_length\": 200}\n\
}\n\
{json_only}\n\
---\n\
{closing}";

/// Replace `{post_guide}` (JSON).
pub const PLAN_PROMPT_TEMPLATE: &str = "Please plan a post for the request below.\n{post_guide}";

/// Replace `{total}`, `{min_length}`, `{max_length}`.
pub const PLAN_OUT_OF_BAND_TEMPLATE: &str = "\
The plan above violates the length guideline: the sum of target_length is {total}, \
but it MUST be between {min_length} and {max_length}. \
Please return a corrected plan as JSON with the same schema.";

pub const PLAN_NO_BODIES: &str = "\
The plan above has no body sections. Please return a corrected plan as JSON \
with at least one entry in \"bodies\".";

// ────────────────────────────────────────────────────────────────────────────
// Section writers
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{guidelines}`, `{greeting}`, `{closing}`.
pub const INTRODUCTION_SYSTEM_TEMPLATE: &str = "\
As a food blog writer, your task is to write the INTRODUCTION of a blog post.\n\
---\n\
{guidelines}\n\
5. The introduction MUST start with exactly \"{greeting}\".\n\
6. Write plain paragraphs only. Do NOT add a heading.\n\
---\n\
{closing}";

/// Replace `{guidelines}`, `{closing}`.
pub const BODY_SYSTEM_TEMPLATE: &str = "\
As a food blog writer, your task is to write ONE BODY SECTION of a blog post.\n\
The part of the post written so far is given; continue it naturally without repeating it.\n\
---\n\
{guidelines}\n\
5. Do NOT greet the reader again and do NOT conclude the post.\n\
6. Write plain paragraphs only. Do NOT add a heading.\n\
---\n\
{closing}";

/// Replace `{guidelines}`, `{restaurant}`, `{closing}`.
pub const CONCLUSION_SYSTEM_TEMPLATE: &str = "\
As a food blog writer, your task is to write the CONCLUSION of a blog post.\n\
The part of the post written so far is given; close it naturally without repeating it.\n\
---\n\
{guidelines}\n\
5. The conclusion MUST end with sentences about visiting {restaurant}.\n\
6. Write plain paragraphs only. Do NOT add a heading.\n\
---\n\
{closing}";

/// Replace `{title}`, `{restaurant}`, `{review}`, `{keywords}`, `{foods}`,
/// `{subject}`, `{target_length}`.
pub const SECTION_PROMPT_TEMPLATE: &str = "\
Please write the section based on the contexts below.\n\
---\n\
Post's title is here.\n\
{title}\n\
---\n\
Restaurant's name is here.\n\
{restaurant}\n\
---\n\
Food's review is here.\n\
{review}\n\
---\n\
Keywords are here.\n\
{keywords}\n\
---\n\
Eaten foods are here.\n\
{foods}\n\
---\n\
Section's subject is here.\n\
{subject}\n\
---\n\
Section's minimum length is here, in characters.\n\
{target_length}";

/// Replace `{post_so_far}`.
pub const PRIOR_TEXT_TEMPLATE: &str = "The post written so far is here.\n---\n{post_so_far}";

/// Replace `{actual}`, `{target}`.
pub const SECTION_TOO_SHORT_TEMPLATE: &str = "\
The section above is too short: it has {actual} characters, but it needs at least {target}. \
Please revise it to be longer while following every guideline. Return only the revised section.";

/// Replace `{greeting}`.
pub const GREETING_MISSING_TEMPLATE: &str = "\
The text above does not start with \"{greeting}\". \
Please revise it so that it starts with exactly that sentence. Return only the revised text.";

/// Replace `{restaurant}`.
pub const RESTAURANT_MISSING_TEMPLATE: &str = "\
The conclusion above never mentions {restaurant}. \
Please revise it to end with sentences about visiting {restaurant}. Return only the revised conclusion.";

// ────────────────────────────────────────────────────────────────────────────
// Draft review
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{guidelines}`, `{closing}`, `{json_only}`.
pub const REVIEW_SYSTEM_TEMPLATE: &str = "\
As a food blog editor, your task is to review a draft post section by section.\n\
Each draft section carries its plan (subject and target_length) and its paragraph.\n\
---\n\
Score every section between 0 (worst) and 10 (best) on how well it follows:\n\
- its subject,\n\
- its target_length (in characters),\n\
- the guidelines below, especially the prohibited expressions.\n\
Then give concrete advice on how to improve it. List every prohibited expression you find.\n\
---\n\
{guidelines}\n\
---\n\
Return a JSON object with this EXACT schema (no extra fields):\n\
{\n\
  \"introduction\": {\"score\": 7, \"advice\": \"...\"},\n\
  \"bodies\": [{\"score\": 8, \"advice\": \"...\"}],\n\
  \"conclusion\": {\"score\": 6, \"advice\": \"...\"},\n\
  \"overall\": {\"score\": 7, \"advice\": \"...\"}\n\
}\n\
\"bodies\" MUST have one entry per draft body, in order.\n\
{json_only}\n\
---\n\
{closing}";

/// Replace `{draft}` (JSON).
pub const REVIEW_PROMPT_TEMPLATE: &str = "The draft is here.\n{draft}";

// ────────────────────────────────────────────────────────────────────────────
// Revision
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{guidelines}`, `{max_length}`, `{closing}`.
pub const REVISE_SYSTEM_TEMPLATE: &str = "\
As a food blog writer, your task is to merge a draft into one finished post, \
applying the editor's feedback.\n\
---\n\
{guidelines}\n\
5. The finished post MUST have at least {max_length} characters.\n\
6. Keep every section's content unless the feedback asks to change it.\n\
7. Return only the finished post as plain text.\n\
---\n\
{closing}";

/// Replace `{post_guide}`, `{draft}`, `{feedback}` (all JSON).
pub const REVISE_PROMPT_TEMPLATE: &str = "\
The request is here.\n\
{post_guide}\n\
---\n\
The draft is here.\n\
{draft}\n\
---\n\
The editor's feedback is here.\n\
{feedback}";

/// Replace `{actual}`, `{max_length}`.
pub const POST_TOO_SHORT_TEMPLATE: &str = "\
The post above is too short: it has {actual} characters, but it needs at least {max_length}. \
Please revise it to be longer while following every guideline. Return only the revised post.";

// ────────────────────────────────────────────────────────────────────────────
// Hashtags
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{number}`, `{closing}`, `{json_only}`.
pub const HASHTAG_SYSTEM_TEMPLATE: &str = "\
As a blog writer, your task is to write hashtags for the user's post.\n\
---\n\
Please follow these guidelines.\n\
- The number of hashtags MUST be exactly {number}.\n\
- Hashtags should align with the post.\n\
- Hashtags should be written in Korean and start with \"#\".\n\
---\n\
Return a JSON object with this EXACT schema:\n\
{\"hashtags\": [\"#...\"]}\n\
{json_only}\n\
---\n\
{closing}";

/// Replace `{post}`.
pub const HASHTAG_PROMPT_TEMPLATE: &str = "Post is here.\n\n{post}";
