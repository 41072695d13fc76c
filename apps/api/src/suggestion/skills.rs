//! Skill suggestions: what the user should learn next.

use crate::llm_client::prompts::{fill_template, join_or_none, JSON_ARRAY_ONLY};
use crate::models::profile::Profile;
use crate::models::suggestion::{SkillSuggestion, DIFFICULTY_VALUES, REASON_VALUES};
use crate::suggestion::prompts::SKILL_PROMPT_TEMPLATE;
use crate::suggestion::schema::{parse_list, FieldKind, FieldSpec};

const COURSE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::Text { default: "" }),
    FieldSpec::optional("platform", FieldKind::Text { default: "" }),
    FieldSpec::optional("url", FieldKind::Text { default: "" }),
    FieldSpec::optional("rating", FieldKind::Rating { max: 5.0 }),
];

pub const SKILL_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("skill", FieldKind::Text { default: "" }),
    FieldSpec::optional(
        "reason",
        FieldKind::Enum {
            allowed: REASON_VALUES,
            default: "ai_recommended",
        },
    ),
    FieldSpec::optional("marketDemand", FieldKind::Score { max: 100 }),
    FieldSpec::optional(
        "difficultyLevel",
        FieldKind::Enum {
            allowed: DIFFICULTY_VALUES,
            default: "intermediate",
        },
    ),
    FieldSpec::optional(
        "estimatedTimeToLearn",
        FieldKind::Count {
            max: u32::MAX as u64,
        },
    ),
    FieldSpec::optional("relatedCourses", FieldKind::ObjectList(COURSE_FIELDS)),
];

pub fn build_skill_prompt(profile: &Profile) -> String {
    let experience: Vec<String> = profile
        .experience
        .iter()
        .map(|exp| format!("{} at {} ({})", exp.role, exp.company, exp.year_range()))
        .collect();

    let current_skills = join_or_none(&profile.current_skills, ", ");
    let target_skills = join_or_none(&profile.target_skills, ", ");
    let experience = join_or_none(&experience, "\n");

    fill_template(
        SKILL_PROMPT_TEMPLATE,
        &[
            ("profile_type", profile.profile_type.as_str()),
            ("current_skills", current_skills.as_str()),
            ("target_skills", target_skills.as_str()),
            ("experience", experience.as_str()),
            ("json_only", JSON_ARRAY_ONLY),
        ],
    )
}

pub fn parse_skill_response(raw: &str) -> Vec<SkillSuggestion> {
    parse_list(raw, SKILL_FIELDS, "skill")
}
