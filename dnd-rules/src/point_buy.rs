//! D&D 5e point-buy rules.
//!
//! Every score starts at 8 and may be raised to 15 by spending from a pool of
//! 27 points. Scores 9-13 cost one point per step; 14 and 15 cost two.
//!
//! While a player is editing, any spend up to the budget is legal
//! ([`validate`]). Whether a finished character may leave points unspent is a
//! product decision expressed by [`SubmissionPolicy`] and checked by
//! [`validate_submission`].

use crate::ability::{Ability, AbilityScores};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest score point buy allows.
pub const POINT_BUY_MIN: i32 = 8;
/// Highest score point buy allows (before racial bonuses).
pub const POINT_BUY_MAX: i32 = 15;
/// Total points available for point buy.
pub const POINT_BUY_TOTAL: i32 = 27;

/// Standard array values; an alternative to point buy that costs exactly 27.
pub const STANDARD_ARRAY: [i32; 6] = [15, 14, 13, 12, 10, 8];

/// Cumulative cost of raising a single score from 8 to `score`.
///
/// Scores below 8 cost nothing. Scores above 15 are never legal; they keep
/// climbing at two points per step so an out-of-range score is never
/// cheaper than a legal one, and [`validate`] reports them as invalid.
pub fn cost_of_score(score: i32) -> i32 {
    match score {
        i32::MIN..=8 => 0,
        9..=13 => score - POINT_BUY_MIN,
        14 => 7,
        15 => 9,
        _ => (score - POINT_BUY_MAX).saturating_mul(2).saturating_add(9),
    }
}

/// Sum of [`cost_of_score`] over all six abilities.
pub fn total_cost(scores: &AbilityScores) -> i32 {
    scores
        .iter()
        .map(|(_, score)| cost_of_score(score))
        .fold(0, i32::saturating_add)
}

/// Points needed to raise `current` by one. Zero once the maximum is reached.
pub fn increment_cost(current: i32) -> i32 {
    if current >= POINT_BUY_MAX {
        return 0;
    }
    cost_of_score(current + 1) - cost_of_score(current)
}

/// Points returned by lowering `current` by one. Zero at or below the minimum.
pub fn decrement_refund(current: i32) -> i32 {
    if current <= POINT_BUY_MIN {
        return 0;
    }
    cost_of_score(current) - cost_of_score(current - 1)
}

/// Whether one more point can go into a score currently at `current`.
pub fn can_increase(current: i32, all_scores: &AbilityScores) -> bool {
    current < POINT_BUY_MAX
        && total_cost(all_scores).saturating_add(increment_cost(current)) <= POINT_BUY_TOTAL
}

/// Whether a score currently at `current` can be lowered.
pub fn can_decrease(current: i32) -> bool {
    current > POINT_BUY_MIN
}

/// Machine-readable category of a point-buy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointBuyErrorKind {
    InvalidScore,
    BudgetExceeded,
    BudgetUnderspent,
}

/// A point-buy rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointBuyError {
    #[error("{} score {score} is below the minimum of {min}", ability.name())]
    BelowMinimum { ability: Ability, score: i32, min: i32 },
    #[error("{} score {score} is above the maximum of {max}", ability.name())]
    AboveMaximum { ability: Ability, score: i32, max: i32 },
    #[error(
        "Total point cost {used} exceeds the {budget}-point budget; reduce some ability scores"
    )]
    BudgetExceeded { used: i32, budget: i32 },
    #[error("Only {used} of {budget} points spent; spend the remaining points before finishing")]
    BudgetUnderspent { used: i32, budget: i32 },
}

impl PointBuyError {
    pub fn kind(&self) -> PointBuyErrorKind {
        match self {
            PointBuyError::BelowMinimum { .. } | PointBuyError::AboveMaximum { .. } => {
                PointBuyErrorKind::InvalidScore
            }
            PointBuyError::BudgetExceeded { .. } => PointBuyErrorKind::BudgetExceeded,
            PointBuyError::BudgetUnderspent { .. } => PointBuyErrorKind::BudgetUnderspent,
        }
    }
}

/// Outcome of checking a score array against point-buy rules.
///
/// Recomputed on every edit; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointBuyResult {
    pub valid: bool,
    pub points_used: i32,
    /// `27 - points_used`; negative when the budget is blown.
    pub points_remaining: i32,
    pub max_score: i32,
    pub min_score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PointBuyErrorKind>,
}

impl PointBuyResult {
    fn new(points_used: i32, violation: Option<&PointBuyError>) -> Self {
        Self {
            valid: violation.is_none(),
            points_used,
            points_remaining: POINT_BUY_TOTAL - points_used,
            max_score: POINT_BUY_MAX,
            min_score: POINT_BUY_MIN,
            error: violation.map(|v| v.to_string()),
            kind: violation.map(PointBuyError::kind),
        }
    }
}

/// Whether a finished character must spend the whole budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPolicy {
    /// Exactly 27 points must be spent.
    #[default]
    RequireFullBudget,
    /// Any legal spend up to 27 is accepted.
    AllowUnderspend,
}

/// First rule violation in `scores`, checking ranges before the budget.
fn find_violation(scores: &AbilityScores, used: i32) -> Option<PointBuyError> {
    for (ability, score) in scores.iter() {
        if score < POINT_BUY_MIN {
            return Some(PointBuyError::BelowMinimum {
                ability,
                score,
                min: POINT_BUY_MIN,
            });
        }
        if score > POINT_BUY_MAX {
            return Some(PointBuyError::AboveMaximum {
                ability,
                score,
                max: POINT_BUY_MAX,
            });
        }
    }

    if used > POINT_BUY_TOTAL {
        return Some(PointBuyError::BudgetExceeded {
            used,
            budget: POINT_BUY_TOTAL,
        });
    }

    None
}

/// Check scores during editing: every score in [8, 15], spend at most 27.
pub fn validate(scores: &AbilityScores) -> PointBuyResult {
    let used = total_cost(scores);
    PointBuyResult::new(used, find_violation(scores, used).as_ref())
}

/// Check scores for a finished character under `policy`.
pub fn validate_submission(scores: &AbilityScores, policy: SubmissionPolicy) -> PointBuyResult {
    let used = total_cost(scores);
    let violation = find_violation(scores, used).or_else(|| match policy {
        SubmissionPolicy::RequireFullBudget if used < POINT_BUY_TOTAL => {
            Some(PointBuyError::BudgetUnderspent {
                used,
                budget: POINT_BUY_TOTAL,
            })
        }
        _ => None,
    });

    if let Some(violation) = &violation {
        tracing::debug!(%scores, %violation, "point buy submission rejected");
    }
    PointBuyResult::new(used, violation.as_ref())
}

/// Raise one ability by a single step, if the rules allow it.
pub fn try_increase(
    scores: &AbilityScores,
    ability: Ability,
) -> Result<AbilityScores, PointBuyError> {
    let current = scores.get(ability);
    if current >= POINT_BUY_MAX {
        return Err(PointBuyError::AboveMaximum {
            ability,
            score: current.saturating_add(1),
            max: POINT_BUY_MAX,
        });
    }
    if !can_increase(current, scores) {
        return Err(PointBuyError::BudgetExceeded {
            used: total_cost(scores).saturating_add(increment_cost(current)),
            budget: POINT_BUY_TOTAL,
        });
    }
    Ok(scores.with(ability, current + 1))
}

/// Lower one ability by a single step, if the rules allow it.
pub fn try_decrease(
    scores: &AbilityScores,
    ability: Ability,
) -> Result<AbilityScores, PointBuyError> {
    let current = scores.get(ability);
    if !can_decrease(current) {
        return Err(PointBuyError::BelowMinimum {
            ability,
            score: current.saturating_sub(1),
            min: POINT_BUY_MIN,
        });
    }
    Ok(scores.with(ability, current - 1))
}
