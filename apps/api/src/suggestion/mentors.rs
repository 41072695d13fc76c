//! Mentor matching: for each suggested skill, find other users who already list it
//! and rank them with a pluggable `MentorScorer`.
//!
//! `AppState` holds an `Arc<dyn MentorScorer>`; the default is `ExperienceMentorScorer`.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Profile, ProfileType};
use crate::models::suggestion::{Difficulty, MentorMatch, MentorSuggestion, SkillSuggestion};
use crate::store::ProfileStore;

pub const MAX_MENTORS_PER_SKILL: usize = 3;

const BASE_SCORE: f64 = 50.0;
const POINTS_PER_YEAR: f64 = 3.0;
const MAX_COUNTED_YEARS: f64 = 10.0;
const MENTIONS_SKILL_BONUS: f64 = 15.0;
const PROFESSIONAL_BONUS: f64 = 5.0;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores how well `candidate` could mentor someone learning `skill`. Result is 0 – 100.
pub trait MentorScorer: Send + Sync {
    fn score(&self, candidate: &Profile, skill: &str, difficulty: Difficulty) -> u8;
}

// ────────────────────────────────────────────────────────────────────────────
// ExperienceMentorScorer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic scorer built from the candidate's work history.
///
/// 1. Base 50.
/// 2. +3 per year of total experience (capped at 10 years), weighted by how hard the
///    skill is: beginner 0.5, intermediate 0.75, advanced 1.0.
/// 3. +15 when an experience entry mentions the skill in its role or description.
/// 4. +5 for working professionals.
pub struct ExperienceMentorScorer;

impl ExperienceMentorScorer {
    fn score_on(&self, candidate: &Profile, skill: &str, difficulty: Difficulty, today: NaiveDate) -> u8 {
        let months: u32 = candidate
            .experience
            .iter()
            .map(|e| e.duration_months(today))
            .sum();
        let years = (months as f64 / 12.0).min(MAX_COUNTED_YEARS);
        let weight = match difficulty {
            Difficulty::Beginner => 0.5,
            Difficulty::Intermediate => 0.75,
            Difficulty::Advanced => 1.0,
        };

        let mut score = BASE_SCORE + (years * POINTS_PER_YEAR * weight).round();
        if candidate.experience.iter().any(|e| e.mentions(skill)) {
            score += MENTIONS_SKILL_BONUS;
        }
        if candidate.profile_type == ProfileType::WorkingProfessional {
            score += PROFESSIONAL_BONUS;
        }
        score.clamp(0.0, 100.0) as u8
    }
}

impl MentorScorer for ExperienceMentorScorer {
    fn score(&self, candidate: &Profile, skill: &str, difficulty: Difficulty) -> u8 {
        self.score_on(candidate, skill, difficulty, Utc::now().date_naive())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

/// Up to three mentors for one skill, best first. Ties keep the store's creation order.
pub async fn find_mentors(
    profiles: &dyn ProfileStore,
    scorer: &dyn MentorScorer,
    requester: Uuid,
    skill: &str,
    difficulty: Difficulty,
) -> Result<Vec<MentorMatch>, AppError> {
    let candidates = profiles.find_profiles_with_skill(skill, requester).await?;

    let mut matches: Vec<MentorMatch> = candidates
        .iter()
        .filter(|p| p.user_id != requester)
        .map(|p| MentorMatch {
            user_id: p.user_id,
            match_score: u32::from(scorer.score(p, skill, difficulty).min(100)),
        })
        .collect();

    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    matches.truncate(MAX_MENTORS_PER_SKILL);
    Ok(matches)
}

/// One `MentorSuggestion` per suggested skill that has at least one mentor.
pub async fn suggest_mentors(
    profiles: &dyn ProfileStore,
    scorer: &dyn MentorScorer,
    requester: Uuid,
    skills: &[SkillSuggestion],
) -> Result<Vec<MentorSuggestion>, AppError> {
    let mut suggestions = Vec::new();
    for suggestion in skills {
        let mentors = find_mentors(
            profiles,
            scorer,
            requester,
            &suggestion.skill,
            suggestion.difficulty_level,
        )
        .await?;
        if mentors.is_empty() {
            continue;
        }
        suggestions.push(MentorSuggestion {
            skill: suggestion.skill.clone(),
            mentors,
        });
    }
    Ok(suggestions)
}
