// All provider prompt templates for the suggestion pipeline.
// Placeholders are `{name}` and are filled by `llm_client::prompts::fill_template`.

/// Skill prompt. Replace: {profile_type}, {current_skills}, {target_skills},
/// {experience}, {json_only}
pub const SKILL_PROMPT_TEMPLATE: &str = r#"You are a career and skill development AI assistant. Based on the following profile information,
suggest 5 skills the user should learn next to advance their career.

For each skill provide:
1. The name of the skill
2. A reason for recommending it (choose from: market_trend, career_progression, profile_completion, job_requirement)
3. Market demand score (0-100)
4. Difficulty level (beginner, intermediate, or advanced)
5. Estimated time to learn in hours
6. 2-3 related courses with title, platform, URL (can be hypothetical), and rating (1-5)

Current profile information:
- Profile type: {profile_type}
- Current skills: {current_skills}
- Target skills: {target_skills}
- Professional experience:
{experience}

Format your response as a valid JSON array of skill objects with the following structure:
[
  {
    "skill": "Skill name",
    "reason": "market_trend",
    "marketDemand": 85,
    "difficultyLevel": "intermediate",
    "estimatedTimeToLearn": 40,
    "relatedCourses": [
      {
        "title": "Course title",
        "platform": "Platform name",
        "url": "course-url",
        "rating": 4.5
      }
    ]
  }
]

{json_only}"#;

/// Job-role prompt. Replace: {profile_type}, {current_skills}, {target_skills},
/// {experience}, {json_only}
pub const JOB_ROLE_PROMPT_TEMPLATE: &str = r#"You are a career advisor AI assistant. Based on the following profile information,
suggest 5 job roles that would be a good match for this user.

For each job role provide:
1. The exact title of the role
2. A match score (0-100) indicating how well the user's current skills match this role
3. A list of skills they already have for this role with status "have"
4. A list of skills they are missing with status "missing"
5. A list of skills they partially have with status "partial"
6. Average salary information (amount and currency)
7. Growth potential score (0-100)
8. 3-5 popular companies that hire for this role, with company names

Current profile information:
- Profile type: {profile_type}
- Current skills: {current_skills}
- Target skills: {target_skills}
- Professional experience:
{experience}

Format your response as a valid JSON array of job role objects with the following structure:
[
  {
    "title": "Job Title",
    "matchScore": 75,
    "skillsMatch": [
      {"skill": "Skill Name", "status": "have"},
      {"skill": "Another Skill", "status": "missing"},
      {"skill": "Partial Skill", "status": "partial"}
    ],
    "avgSalary": {
      "amount": 85000,
      "currency": "USD"
    },
    "growthPotential": 80,
    "popularCompanies": [
      {"name": "Company Name"}
    ]
  }
]

{json_only}"#;

/// Company prompt. Replace: {job_roles}, {role_skills}, {target_companies}, {json_only}
pub const COMPANY_PROMPT_TEMPLATE: &str = r#"I need company suggestions for someone interested in the following job roles:
{job_roles}

Required skills for these roles include:
{role_skills}

Companies the user is already interested in:
{target_companies}

For each job role, suggest 2-3 companies that would be a good match.
For each company suggestion, provide:
1. Company name
2. A reason why this company is a good match for the role
3. A match score (0-100) based on how well the company matches the role
4. Work culture description (brief)
5. Company size (one of: startup, small, medium, large, enterprise)
6. Key office locations (2-3 major locations)

Format your response as a valid JSON array with the following structure:
[
  {
    "name": "Company Name",
    "reason": "Reason this company is a good match for the role",
    "matchScore": 85,
    "workCulture": "Brief description of work culture",
    "companySize": "large",
    "locations": ["Location 1", "Location 2"]
  }
]

Focus on real, well-known companies that match these job roles. {json_only}"#;
