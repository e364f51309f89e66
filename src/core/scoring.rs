use crate::models::{Freelancer, Project, ScoringWeights};

/// Highest compatibility score a pair can reach
pub const MAX_SCORE: u8 = 100;

/// Intermediate values behind a compatibility score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub matched_skills: usize,
    pub skill_percentage: u32,
    pub experience_percentage: u32,
    pub score: u8,
}

/// Calculate a compatibility score (0-100) for a freelancer / project pair
///
/// Scoring formula:
/// score = floor(
///     (skill_match * 70 +          # share of required skills the freelancer has
///      experience_match * 30)      # experience relative to the project minimum
///     / 100
/// )
///
/// A pair without a single shared skill always scores 0, whatever the
/// experience component would contribute.
pub fn calculate_compatibility(
    freelancer: &Freelancer,
    project: &Project,
    weights: &ScoringWeights,
) -> u8 {
    score_breakdown(freelancer, project, weights).score
}

/// Same as [`calculate_compatibility`] but keeps the component percentages
pub fn score_breakdown(
    freelancer: &Freelancer,
    project: &Project,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let matched_skills = count_matched_skills(freelancer, project);
    let skill_percentage = calculate_skill_percentage(matched_skills, project.required_skills.len());
    let experience_percentage =
        calculate_experience_percentage(freelancer.experience, project.min_experience);

    let score = if matched_skills == 0 {
        0
    } else {
        weighted_score(skill_percentage, experience_percentage, weights)
    };

    ScoreBreakdown {
        matched_skills,
        skill_percentage,
        experience_percentage,
        score,
    }
}

/// Count required skills present in the freelancer's skill set
///
/// Each required skill counts at most once, matching is exact and
/// case-sensitive.
#[inline]
fn count_matched_skills(freelancer: &Freelancer, project: &Project) -> usize {
    project
        .required_skills
        .iter()
        .filter(|required| freelancer.has_skill(required))
        .count()
}

/// Calculate skill match percentage (0-100)
#[inline]
fn calculate_skill_percentage(matched: usize, required: usize) -> u32 {
    if required == 0 {
        return 0;
    }
    (matched * 100 / required) as u32
}

/// Calculate experience match percentage (0-100)
#[inline]
fn calculate_experience_percentage(experience: u32, min_experience: u32) -> u32 {
    if experience >= min_experience {
        return 100;
    }
    // min_experience > experience >= 0 here, so the division is safe
    let ratio = u64::from(experience) * 100 / u64::from(min_experience);
    ratio.min(100) as u32
}

#[inline]
fn weighted_score(skill_percentage: u32, experience_percentage: u32, weights: &ScoringWeights) -> u8 {
    let total_weight = u64::from(weights.skills) + u64::from(weights.experience);
    if total_weight == 0 {
        return 0;
    }

    let weighted = u64::from(skill_percentage) * u64::from(weights.skills)
        + u64::from(experience_percentage) * u64::from(weights.experience);

    (weighted / total_weight).min(u64::from(MAX_SCORE)) as u8
}
