//! GPA Calculator
//!
//! Percentage ↔ 4.0-scale conversion (`gpa = pct / 25`) and
//! credit-weighted GPA over a course list.

use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult};

pub const GPA_SCALE_MAX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub grade_points: f64,
    pub credits: f64,
}

/// Percentage on the 4.0 scale, clamped to `0.0..=4.0`
pub fn percentage_to_gpa(percentage: f64) -> AppResult<f64> {
    if !percentage.is_finite() {
        return Err(AppError::invalid_input("Percentage must be a number"));
    }
    Ok((percentage / 25.0).clamp(0.0, GPA_SCALE_MAX))
}

/// 4.0-scale GPA back to a percentage
pub fn gpa_to_percentage(gpa: f64) -> AppResult<f64> {
    if !gpa.is_finite() || !(0.0..=GPA_SCALE_MAX).contains(&gpa) {
        return Err(AppError::invalid_input("GPA must be between 0.0 and 4.0"));
    }
    Ok(gpa * 25.0)
}

pub fn letter_grade(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 93.0 => "A",
        p if p >= 90.0 => "A-",
        p if p >= 87.0 => "B+",
        p if p >= 83.0 => "B",
        p if p >= 80.0 => "B-",
        p if p >= 77.0 => "C+",
        p if p >= 73.0 => "C",
        p if p >= 70.0 => "C-",
        p if p >= 67.0 => "D+",
        p if p >= 60.0 => "D",
        _ => "F",
    }
}

/// Credit-weighted average of grade points
pub fn weighted_gpa(courses: &[Course]) -> AppResult<f64> {
    if courses.is_empty() {
        return Err(AppError::invalid_input("At least one course is required"));
    }

    let mut total_points = 0.0;
    let mut total_credits = 0.0;

    for course in courses {
        if !course.credits.is_finite() || course.credits <= 0.0 {
            return Err(AppError::invalid_input("Credits must be positive"));
        }
        if !course.grade_points.is_finite() || !(0.0..=GPA_SCALE_MAX).contains(&course.grade_points) {
            return Err(AppError::invalid_input("Grade points must be between 0.0 and 4.0"));
        }
        total_points += course.grade_points * course.credits;
        total_credits += course.credits;
    }

    Ok(total_points / total_credits)
}
