use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    Student,
    #[serde(alias = "working professional")]
    WorkingProfessional,
    #[default]
    Other,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Student => "student",
            ProfileType::WorkingProfessional => "working_professional",
            ProfileType::Other => "other",
        }
    }

    /// Accepts both `working_professional` and the legacy `working professional`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace(' ', "_").as_str() {
            "student" => Some(ProfileType::Student),
            "working_professional" => Some(ProfileType::WorkingProfessional),
            "other" => Some(ProfileType::Other),
            _ => None,
        }
    }
}

/// One work-history entry. `to` is ignored while `current` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: Uuid,
    pub role: String,
    pub company: String,
    pub from: NaiveDate,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl Experience {
    /// `2019 - 2022` or `2021 - Present`.
    pub fn year_range(&self) -> String {
        match (self.current, self.to) {
            (false, Some(to)) => format!("{} - {}", self.from.year(), to.year()),
            _ => format!("{} - Present", self.from.year()),
        }
    }

    /// Whole months between `from` and `to` (or `today` for ongoing roles). Never negative.
    pub fn duration_months(&self, today: NaiveDate) -> u32 {
        let end = match (self.current, self.to) {
            (false, Some(to)) => to,
            _ => today,
        };
        let months = (end.year() - self.from.year()) * 12 + end.month() as i32
            - self.from.month() as i32;
        months.max(0) as u32
    }

    pub fn mentions(&self, skill: &str) -> bool {
        let needle = skill.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.role.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub current_skills: Vec<String>,
    pub target_skills: Vec<String>,
    pub profile_type: ProfileType,
    pub bio: String,
    /// Newest first.
    pub experience: Vec<Experience>,
    pub target_companies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The blank profile created alongside every new account.
    pub fn empty(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            current_skills: vec![],
            target_skills: vec![],
            profile_type: ProfileType::Other,
            bio: String::new(),
            experience: vec![],
            target_companies: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        let needle = skill.trim().to_lowercase();
        self.current_skills
            .iter()
            .any(|s| s.trim().to_lowercase() == needle)
    }

    pub fn apply(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(skills) = update.current_skills {
            self.current_skills = skills;
        }
        if let Some(skills) = update.target_skills {
            self.target_skills = skills;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(profile_type) = update.profile_type {
            self.profile_type = profile_type;
        }
        if let Some(companies) = update.target_companies {
            self.target_companies = companies;
        }
        self.updated_at = now;
    }
}

/// A validated partial profile update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub current_skills: Option<Vec<String>>,
    pub target_skills: Option<Vec<String>>,
    pub bio: Option<String>,
    pub profile_type: Option<ProfileType>,
    pub target_companies: Option<Vec<String>>,
}

/// Trims entries, drops blanks and removes case-insensitive duplicates, keeping first occurrence.
pub fn normalize_names(items: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(trimmed.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn experience(from: NaiveDate, to: Option<NaiveDate>, current: bool) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            role: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            from,
            to,
            current,
            description: Some("Built Rust services".to_string()),
        }
    }

    #[test]
    fn test_profile_type_accepts_legacy_spelling() {
        let parsed: ProfileType = serde_json::from_str(r#""working professional""#).unwrap();
        assert_eq!(parsed, ProfileType::WorkingProfessional);
        assert_eq!(
            ProfileType::parse("Working Professional"),
            Some(ProfileType::WorkingProfessional)
        );
        assert_eq!(ProfileType::parse("retired"), None);
        assert_eq!(
            serde_json::to_string(&ProfileType::WorkingProfessional).unwrap(),
            r#""working_professional""#
        );
    }

    #[test]
    fn test_year_range_for_finished_and_current_roles() {
        let finished = experience(date(2019, 3, 1), Some(date(2022, 6, 1)), false);
        assert_eq!(finished.year_range(), "2019 - 2022");

        let ongoing = experience(date(2021, 1, 1), Some(date(2022, 1, 1)), true);
        assert_eq!(ongoing.year_range(), "2021 - Present");
    }

    #[test]
    fn test_duration_months() {
        let finished = experience(date(2020, 1, 1), Some(date(2021, 7, 1)), false);
        assert_eq!(finished.duration_months(date(2030, 1, 1)), 18);

        let ongoing = experience(date(2020, 1, 1), None, true);
        assert_eq!(ongoing.duration_months(date(2022, 1, 15)), 24);

        let inverted = experience(date(2022, 1, 1), Some(date(2020, 1, 1)), false);
        assert_eq!(inverted.duration_months(date(2030, 1, 1)), 0);
    }

    #[test]
    fn test_mentions_is_case_insensitive() {
        let exp = experience(date(2020, 1, 1), None, true);
        assert!(exp.mentions("rust"));
        assert!(exp.mentions("BACKEND"));
        assert!(!exp.mentions("Haskell"));
        assert!(!exp.mentions("  "));
    }

    #[test]
    fn test_has_skill_ignores_case_and_whitespace() {
        let mut profile = Profile::empty(Uuid::new_v4(), Utc::now());
        profile.current_skills = vec!["Python".to_string()];
        assert!(profile.has_skill(" python "));
        assert!(!profile.has_skill("Rust"));
    }

    #[test]
    fn test_has_skill_folds_non_ascii_case() {
        let mut profile = Profile::empty(Uuid::new_v4(), Utc::now());
        profile.current_skills = vec!["ÜBERSETZUNG".to_string()];
        assert!(profile.has_skill("übersetzung"));
        assert!(!profile.has_skill("ubersetzung"));
    }

    #[test]
    fn test_apply_leaves_unset_fields_untouched() {
        let mut profile = Profile::empty(Uuid::new_v4(), Utc::now());
        profile.bio = "original".to_string();
        profile.apply(
            ProfileUpdate {
                current_skills: Some(vec!["Rust".to_string()]),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(profile.current_skills, vec!["Rust"]);
        assert_eq!(profile.bio, "original");
        assert_eq!(profile.profile_type, ProfileType::Other);
    }

    #[test]
    fn test_normalize_names_dedups_case_insensitively() {
        let items = vec![
            " Rust ".to_string(),
            "".to_string(),
            "rust".to_string(),
            "Go".to_string(),
        ];
        assert_eq!(normalize_names(items), vec!["Rust", "Go"]);
    }
}
