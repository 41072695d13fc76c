//! Company suggestions: employers matching the freshly generated job roles.

use crate::llm_client::prompts::{fill_template, join_or_none, JSON_ARRAY_ONLY};
use crate::models::profile::{normalize_names, Profile};
use crate::models::suggestion::{CompanySuggestion, JobRoleSuggestion, COMPANY_SIZE_VALUES};
use crate::suggestion::prompts::COMPANY_PROMPT_TEMPLATE;
use crate::suggestion::schema::{parse_list, FieldKind, FieldSpec};

pub const COMPANY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text { default: "" }),
    FieldSpec::optional("reason", FieldKind::Text { default: "" }),
    FieldSpec::optional("matchScore", FieldKind::Score { max: 100 }),
    FieldSpec::optional("workCulture", FieldKind::Text { default: "" }),
    FieldSpec::optional(
        "companySize",
        FieldKind::Enum {
            allowed: COMPANY_SIZE_VALUES,
            default: "medium",
        },
    ),
    FieldSpec::optional("locations", FieldKind::TextList),
];

pub fn build_company_prompt(profile: &Profile, job_roles: &[JobRoleSuggestion]) -> String {
    let roles: Vec<String> = job_roles
        .iter()
        .map(|role| format!("- {} (match score: {}/100)", role.title, role.match_score))
        .collect();

    let role_skills: Vec<String> = normalize_names(
        job_roles
            .iter()
            .flat_map(|role| role.skills_match.iter().map(|m| m.skill.clone()))
            .collect(),
    )
    .into_iter()
    .map(|skill| format!("- {skill}"))
    .collect();

    let roles = join_or_none(&roles, "\n");
    let role_skills = join_or_none(&role_skills, "\n");
    let target_companies = join_or_none(&profile.target_companies, ", ");

    fill_template(
        COMPANY_PROMPT_TEMPLATE,
        &[
            ("job_roles", roles.as_str()),
            ("role_skills", role_skills.as_str()),
            ("target_companies", target_companies.as_str()),
            ("json_only", JSON_ARRAY_ONLY),
        ],
    )
}

pub fn parse_company_response(raw: &str) -> Vec<CompanySuggestion> {
    parse_list(raw, COMPANY_FIELDS, "company")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::prompts::NONE_SPECIFIED;
    use crate::models::suggestion::{CompanySize, Salary, SkillMatch, SkillStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn role(title: &str, score: u32, skills: &[&str]) -> JobRoleSuggestion {
        JobRoleSuggestion {
            title: title.to_string(),
            match_score: score,
            skills_match: skills
                .iter()
                .map(|s| SkillMatch {
                    skill: s.to_string(),
                    status: SkillStatus::Missing,
                })
                .collect(),
            avg_salary: Salary {
                amount: 0,
                currency: "USD".to_string(),
            },
            growth_potential: 0,
            popular_companies: vec![],
        }
    }

    #[test]
    fn test_prompt_lists_roles_and_deduplicated_skills() {
        let mut profile = Profile::empty(Uuid::new_v4(), Utc::now());
        profile.target_companies = vec!["Mozilla".to_string()];
        let roles = vec![
            role("Backend Engineer", 80, &["Rust", "SQL"]),
            role("Platform Engineer", 65, &["rust", "Kubernetes"]),
        ];
        let prompt = build_company_prompt(&profile, &roles);
        assert!(prompt.contains("- Backend Engineer (match score: 80/100)"));
        assert!(prompt.contains("- Platform Engineer (match score: 65/100)"));
        assert_eq!(prompt.matches("- Rust\n").count(), 1);
        assert!(!prompt.contains("- rust\n"));
        assert!(prompt.contains("- Kubernetes"));
        assert!(prompt.contains("Mozilla"));
    }

    #[test]
    fn test_prompt_without_skills_or_targets() {
        let profile = Profile::empty(Uuid::new_v4(), Utc::now());
        let prompt = build_company_prompt(&profile, &[role("Analyst", 50, &[])]);
        assert!(prompt.contains(&format!("include:\n{NONE_SPECIFIED}")));
        assert!(prompt.contains(&format!("interested in:\n{NONE_SPECIFIED}")));
    }

    #[test]
    fn test_parse_defaults_size_and_locations() {
        let raw = r#"[
            {"name": "Stripe", "reason": "Payments infra", "matchScore": 88, "workCulture": "Writing-heavy",
             "companySize": "Large", "locations": ["Dublin", "Remote"]},
            {"name": "Tiny Co", "companySize": "'startup', 'small'", "locations": "Berlin"}
        ]"#;
        let parsed = parse_company_response(raw);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].company_size, CompanySize::Large);
        assert_eq!(parsed[0].locations, vec!["Dublin", "Remote"]);
        assert_eq!(parsed[1].company_size, CompanySize::Medium);
        assert_eq!(parsed[1].locations, vec!["Berlin"]);
        assert_eq!(parsed[1].reason, "");
        assert_eq!(parsed[1].match_score, 0);
    }
}
