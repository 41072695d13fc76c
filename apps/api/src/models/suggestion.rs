use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Closed enums. The `*_VALUES` tables feed the provider-response normalizer and
// must list exactly the serde names of each variant.
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionReason {
    MarketTrend,
    CareerProgression,
    ProfileCompletion,
    JobRequirement,
    #[default]
    AiRecommended,
}

pub const REASON_VALUES: &[&str] = &[
    "market_trend",
    "career_progression",
    "profile_completion",
    "job_requirement",
    "ai_recommended",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

pub const DIFFICULTY_VALUES: &[&str] = &["beginner", "intermediate", "advanced"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    #[default]
    Have,
    Missing,
    Partial,
}

pub const SKILL_STATUS_VALUES: &[&str] = &["have", "missing", "partial"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySize {
    Startup,
    Small,
    #[default]
    Medium,
    Large,
    Enterprise,
}

pub const COMPANY_SIZE_VALUES: &[&str] = &["startup", "small", "medium", "large", "enterprise"];

// ────────────────────────────────────────────────────────────────────────────
// Suggestion items
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    pub platform: String,
    pub url: String,
    /// 0.0 – 5.0
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSuggestion {
    pub skill: String,
    pub reason: SuggestionReason,
    /// 0 – 100
    pub market_demand: u32,
    pub difficulty_level: Difficulty,
    /// Hours.
    pub estimated_time_to_learn: u32,
    pub related_courses: Vec<Course>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    pub skill: String,
    pub status: SkillStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub amount: u64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRoleSuggestion {
    pub title: String,
    /// 0 – 100
    pub match_score: u32,
    pub skills_match: Vec<SkillMatch>,
    pub avg_salary: Salary,
    /// 0 – 100
    pub growth_potential: u32,
    pub popular_companies: Vec<CompanyRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySuggestion {
    pub name: String,
    pub reason: String,
    /// 0 – 100
    pub match_score: u32,
    pub work_culture: String,
    pub company_size: CompanySize,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorMatch {
    pub user_id: Uuid,
    /// 0 – 100
    pub match_score: u32,
}

/// Up to three mentors for one suggested skill, best match first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorSuggestion {
    pub skill: String,
    pub mentors: Vec<MentorMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFeedback {
    /// 1 – 5
    pub rating: u8,
    pub comments: Option<String>,
    pub helpful: Option<bool>,
    pub submitted_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Suggestion record
// ────────────────────────────────────────────────────────────────────────────

/// The aggregate output of one generation cycle for one user.
///
/// At most one record per user has `is_active = true`; the store enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub suggested_skills: Vec<SkillSuggestion>,
    pub suggested_job_roles: Vec<JobRoleSuggestion>,
    pub suggested_companies: Vec<CompanySuggestion>,
    pub mentor_suggestions: Vec<MentorSuggestion>,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub user_feedback: Option<UserFeedback>,
}

impl SuggestionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_tables_match_serde_names() {
        for raw in REASON_VALUES {
            serde_json::from_value::<SuggestionReason>(serde_json::json!(raw)).unwrap();
        }
        for raw in DIFFICULTY_VALUES {
            serde_json::from_value::<Difficulty>(serde_json::json!(raw)).unwrap();
        }
        for raw in SKILL_STATUS_VALUES {
            serde_json::from_value::<SkillStatus>(serde_json::json!(raw)).unwrap();
        }
        for raw in COMPANY_SIZE_VALUES {
            serde_json::from_value::<CompanySize>(serde_json::json!(raw)).unwrap();
        }
    }

    #[test]
    fn test_defaults_match_stored_schema() {
        assert_eq!(SuggestionReason::default(), SuggestionReason::AiRecommended);
        assert_eq!(Difficulty::default(), Difficulty::Intermediate);
        assert_eq!(SkillStatus::default(), SkillStatus::Have);
        assert_eq!(CompanySize::default(), CompanySize::Medium);
    }

    #[test]
    fn test_record_expiry_boundary() {
        let now = Utc::now();
        let record = SuggestionRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            suggested_skills: vec![],
            suggested_job_roles: vec![],
            suggested_companies: vec![],
            mentor_suggestions: vec![],
            generated_at: now - chrono::Duration::days(30),
            expires_at: now,
            is_active: true,
            user_feedback: None,
        };
        assert!(record.is_expired(now));
        assert!(!record.is_expired(now - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = SuggestionRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            suggested_skills: vec![],
            suggested_job_roles: vec![],
            suggested_companies: vec![],
            mentor_suggestions: vec![MentorSuggestion {
                skill: "Rust".to_string(),
                mentors: vec![MentorMatch {
                    user_id: Uuid::nil(),
                    match_score: 70,
                }],
            }],
            generated_at: Utc::now(),
            expires_at: Utc::now(),
            is_active: true,
            user_feedback: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("suggestedJobRoles").is_some());
        assert_eq!(json["isActive"], true);
        assert_eq!(json["mentorSuggestions"][0]["mentors"][0]["matchScore"], 70);
    }
}
