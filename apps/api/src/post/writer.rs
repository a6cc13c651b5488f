//! Section Writers — write the introduction, each body, and the conclusion
//! in order, each seeing the text written before it.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, json_list, CLOSING_INSTRUCTION};
use crate::llm_client::{CompletionRequest, CompletionService, ModelProfile, Turn};
use crate::post::guide::PostGuide;
use crate::post::planner::{WritingPlan, WritingPlanDetail};
use crate::post::prompts::{
    greeting, guidelines, BODY_SYSTEM_TEMPLATE, CONCLUSION_SYSTEM_TEMPLATE,
    GREETING_MISSING_TEMPLATE, INTRODUCTION_SYSTEM_TEMPLATE, PRIOR_TEXT_TEMPLATE,
    RESTAURANT_MISSING_TEMPLATE, SECTION_PROMPT_TEMPLATE, SECTION_TOO_SHORT_TEMPLATE,
};
use crate::revision::{char_count, revise_text, RevisionPolicy, Verdict};

const PROFILE: ModelProfile = ModelProfile::standard(2000);

/// A planned section and the paragraph written for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSection {
    pub plan: WritingPlanDetail,
    pub paragraph: String,
}

/// The assembled, not yet revised post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub introduction: DraftSection,
    pub bodies: Vec<DraftSection>,
    pub conclusion: DraftSection,
}

impl Draft {
    pub fn sections(&self) -> impl Iterator<Item = &DraftSection> {
        std::iter::once(&self.introduction)
            .chain(self.bodies.iter())
            .chain(std::iter::once(&self.conclusion))
    }

    /// Paragraphs joined by blank lines.
    pub fn text(&self) -> String {
        self.sections()
            .map(|s| s.paragraph.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Introduction,
    Body,
    Conclusion,
}

impl SectionKind {
    fn stage(self) -> &'static str {
        match self {
            SectionKind::Introduction => "introduction",
            SectionKind::Body => "body section",
            SectionKind::Conclusion => "conclusion",
        }
    }

    fn system(self, restaurant: &str) -> String {
        let template = match self {
            SectionKind::Introduction => INTRODUCTION_SYSTEM_TEMPLATE,
            SectionKind::Body => BODY_SYSTEM_TEMPLATE,
            SectionKind::Conclusion => CONCLUSION_SYSTEM_TEMPLATE,
        };
        fill_template(
            template,
            &[
                ("guidelines", &guidelines(restaurant)),
                ("greeting", &greeting(restaurant)),
                ("restaurant", restaurant),
                ("closing", CLOSING_INSTRUCTION),
            ],
        )
    }

    /// Checks a reply: minimum length for every section, plus the greeting
    /// for the introduction and the restaurant for the conclusion.
    fn check(self, reply: &str, detail: &WritingPlanDetail, restaurant: &str) -> Verdict {
        let actual = char_count(reply.trim());
        if actual < detail.target_length as usize {
            return Err(SECTION_TOO_SHORT_TEMPLATE
                .replace("{actual}", &actual.to_string())
                .replace("{target}", &detail.target_length.to_string()));
        }
        match self {
            SectionKind::Introduction if !reply.trim_start().starts_with(&greeting(restaurant)) => {
                Err(fill_template(GREETING_MISSING_TEMPLATE, &[("greeting", &greeting(restaurant))]))
            }
            SectionKind::Conclusion if !reply.contains(restaurant) => {
                Err(fill_template(RESTAURANT_MISSING_TEMPLATE, &[("restaurant", restaurant)]))
            }
            _ => Ok(()),
        }
    }
}

pub async fn write_introduction(
    guide: &PostGuide,
    detail: &WritingPlanDetail,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<DraftSection, AppError> {
    write_section(SectionKind::Introduction, guide, detail, None, llm, policy).await
}

pub async fn write_body(
    guide: &PostGuide,
    detail: &WritingPlanDetail,
    post_so_far: &str,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<DraftSection, AppError> {
    write_section(SectionKind::Body, guide, detail, Some(post_so_far), llm, policy).await
}

pub async fn write_conclusion(
    guide: &PostGuide,
    detail: &WritingPlanDetail,
    post_so_far: &str,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<DraftSection, AppError> {
    write_section(SectionKind::Conclusion, guide, detail, Some(post_so_far), llm, policy).await
}

/// Writes every planned section in order and assembles the draft.
pub async fn write_draft(
    guide: &PostGuide,
    plan: &WritingPlan,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<Draft, AppError> {
    let introduction = write_introduction(guide, &plan.introduction, llm, policy).await?;
    let mut post_so_far = introduction.paragraph.clone();

    let mut bodies = Vec::with_capacity(plan.bodies.len());
    for detail in &plan.bodies {
        let body = write_body(guide, detail, &post_so_far, llm, policy).await?;
        post_so_far.push_str("\n\n");
        post_so_far.push_str(&body.paragraph);
        bodies.push(body);
    }

    let conclusion = write_conclusion(guide, &plan.conclusion, &post_so_far, llm, policy).await?;

    let draft = Draft {
        introduction,
        bodies,
        conclusion,
    };
    info!("Draft written: {} characters", char_count(&draft.text()));
    Ok(draft)
}

async fn write_section(
    kind: SectionKind,
    guide: &PostGuide,
    detail: &WritingPlanDetail,
    post_so_far: Option<&str>,
    llm: &dyn CompletionService,
    policy: RevisionPolicy,
) -> Result<DraftSection, AppError> {
    let restaurant = guide.restaurant()?;

    let prompt = fill_template(
        SECTION_PROMPT_TEMPLATE,
        &[
            ("title", &guide.title),
            ("restaurant", restaurant),
            ("review", &guide.review),
            ("keywords", &json_list(&guide.keywords)),
            ("foods", &json_list(&guide.foods)),
            ("subject", &detail.subject),
            ("target_length", &detail.target_length.to_string()),
        ],
    );

    let mut request = CompletionRequest::new(PROFILE, kind.system(restaurant), prompt);
    if let Some(text) = post_so_far {
        request = request.with_turn(Turn::user(fill_template(PRIOR_TEXT_TEMPLATE, &[("post_so_far", text)])));
    }

    let paragraph = revise_text(llm, request, policy, kind.stage(), |reply| {
        kind.check(reply, detail, restaurant)
    })
    .await?;

    Ok(DraftSection {
        plan: detail.clone(),
        paragraph: paragraph.trim().to_string(),
    })
}

#[cfg(test)]
pub(crate) fn sample_draft() -> Draft {
    let section = |subject: &str, target_length: u32, paragraph: &str| DraftSection {
        plan: WritingPlanDetail {
            subject: subject.to_string(),
            target_length,
        },
        paragraph: paragraph.to_string(),
    };
    Draft {
        introduction: section("가게 소개", 10, "안녕하세요, 오늘 소개해드릴 곳은 소고기 천국입니다! 숯불 향이 좋았습니다."),
        bodies: vec![section("고기", 10, "직화로 구운 소고기가 나왔습니다.")],
        conclusion: section("마무리", 10, "소고기 천국 맛집에 다시 방문하고 싶었습니다."),
    }
}
