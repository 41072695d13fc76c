//! Job-role suggestions: roles the user could target with their current profile.

use crate::llm_client::prompts::{fill_template, join_or_none, JSON_ARRAY_ONLY};
use crate::models::profile::Profile;
use crate::models::suggestion::{JobRoleSuggestion, SKILL_STATUS_VALUES};
use crate::suggestion::prompts::JOB_ROLE_PROMPT_TEMPLATE;
use crate::suggestion::schema::{parse_list, FieldKind, FieldSpec};

const SKILL_MATCH_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("skill", FieldKind::Text { default: "" }),
    FieldSpec::optional(
        "status",
        FieldKind::Enum {
            allowed: SKILL_STATUS_VALUES,
            default: "have",
        },
    ),
];

const SALARY_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("amount", FieldKind::Count { max: u64::MAX }),
    FieldSpec::optional("currency", FieldKind::Text { default: "USD" }),
];

const COMPANY_REF_FIELDS: &[FieldSpec] =
    &[FieldSpec::required("name", FieldKind::Text { default: "" })];

pub const JOB_ROLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::Text { default: "" }),
    FieldSpec::optional("matchScore", FieldKind::Score { max: 100 }),
    FieldSpec::optional("skillsMatch", FieldKind::ObjectList(SKILL_MATCH_FIELDS)),
    FieldSpec::optional("avgSalary", FieldKind::Object(SALARY_FIELDS)),
    FieldSpec::optional("growthPotential", FieldKind::Score { max: 100 }),
    FieldSpec::optional("popularCompanies", FieldKind::ObjectList(COMPANY_REF_FIELDS)),
];

pub fn build_job_role_prompt(profile: &Profile) -> String {
    let experience: Vec<String> = profile
        .experience
        .iter()
        .map(|exp| {
            let mut line = format!("{} at {} ({})", exp.role, exp.company, exp.year_range());
            if let Some(description) = exp.description.as_deref().map(str::trim) {
                if !description.is_empty() {
                    line.push_str(": ");
                    line.push_str(description);
                }
            }
            line
        })
        .collect();

    let current_skills = join_or_none(&profile.current_skills, ", ");
    let target_skills = join_or_none(&profile.target_skills, ", ");
    let experience = join_or_none(&experience, "\n");

    fill_template(
        JOB_ROLE_PROMPT_TEMPLATE,
        &[
            ("profile_type", profile.profile_type.as_str()),
            ("current_skills", current_skills.as_str()),
            ("target_skills", target_skills.as_str()),
            ("experience", experience.as_str()),
            ("json_only", JSON_ARRAY_ONLY),
        ],
    )
}

pub fn parse_job_role_response(raw: &str) -> Vec<JobRoleSuggestion> {
    parse_list(raw, JOB_ROLE_FIELDS, "job role")
}
