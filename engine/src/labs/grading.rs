//! Quiz grading for simulation questions.
//!
//! A question asks the student to land a projectile near `target_x`; the
//! attempt is graded from the landing position reported by the lab.

use serde::{Deserialize, Serialize};

/// Tolerance used when a question does not set one.
pub const DEFAULT_TOLERANCE: f32 = 0.25;

const DEFAULT_GRAVITY: f32 = 9.81;

/// `|landed − target| ≤ tolerance`.
pub fn grade_landing(landed_x: f32, target_x: f32, tolerance: f32) -> bool {
    (landed_x - target_x).abs() <= tolerance
}

/// A "land the projectile at X" question, as stored by the quiz tools.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationQuestion {
    pub id: String,
    pub prompt: String,
    pub target_x: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_velocity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_velocity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_angle_deg: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_angle_deg: Option<f32>,
}

impl SimulationQuestion {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, target_x: f32) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            target_x,
            ..Default::default()
        }
    }

    pub fn gravity(&self) -> f32 {
        self.gravity.unwrap_or(DEFAULT_GRAVITY)
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance.unwrap_or(DEFAULT_TOLERANCE)
    }

    /// Keep a launch speed inside the question's bounds.
    pub fn clamp_velocity(&self, speed: f32) -> f32 {
        clamp_between(speed, self.min_velocity, self.max_velocity)
    }

    /// Keep a launch angle inside the question's bounds.
    pub fn clamp_angle(&self, angle_deg: f32) -> f32 {
        clamp_between(angle_deg, self.min_angle_deg, self.max_angle_deg)
    }

    /// Starting speed offered to the student: at least 5 m/s, or the minimum.
    pub fn initial_velocity(&self) -> f32 {
        self.clamp_velocity(self.min_velocity.unwrap_or(1.0).max(5.0))
    }

    /// Grade an attempt.
    pub fn grade(&self, landed_x: f32, speed: f32, angle_deg: f32) -> SimulationResult {
        SimulationResult {
            question_id: self.id.clone(),
            landed_x,
            target_x: self.target_x,
            tolerance: self.tolerance(),
            speed,
            angle_deg,
            correct: grade_landing(landed_x, self.target_x, self.tolerance()),
        }
    }
}

fn clamp_between(value: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    let value = min.map_or(value, |lo| value.max(lo));
    max.map_or(value, |hi| value.min(hi))
}

/// Outcome of one attempt: the verdict plus the raw numbers a report needs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub question_id: String,
    pub landed_x: f32,
    pub target_x: f32,
    pub tolerance: f32,
    pub speed: f32,
    pub angle_deg: f32,
    pub correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_landing_bounds_are_inclusive() {
        assert!(grade_landing(10.25, 10.0, 0.25));
        assert!(grade_landing(9.75, 10.0, 0.25));
        assert!(!grade_landing(10.26, 10.0, 0.25));
        assert!(!grade_landing(12.0, 10.0, 0.25));
    }

    #[test]
    fn test_question_defaults() {
        let question = SimulationQuestion::new("q1", "Hit x = 10", 10.0);
        assert_eq!(question.tolerance(), DEFAULT_TOLERANCE);
        assert_eq!(question.gravity(), 9.81);
        assert_eq!(question.initial_velocity(), 5.0);
    }

    #[test]
    fn test_question_parses_stored_json() {
        let json = r#"{
            "id": "q7",
            "type": "simulation",
            "prompt": "Land on the flag",
            "simulation": "projectile",
            "targetX": 12.5,
            "tolerance": 0.5,
            "minVelocity": 8,
            "maxVelocity": 15,
            "maxAngleDeg": 60
        }"#;
        let question: SimulationQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.target_x, 12.5);
        assert_eq!(question.tolerance(), 0.5);
        assert_eq!(question.clamp_velocity(30.0), 15.0);
        assert_eq!(question.clamp_velocity(2.0), 8.0);
        assert_eq!(question.clamp_angle(75.0), 60.0);
        assert_eq!(question.clamp_angle(-5.0), -5.0);
        assert_eq!(question.initial_velocity(), 8.0);
    }

    #[test]
    fn test_result_carries_raw_values() {
        let question = SimulationQuestion::new("q1", "Hit x = 10", 10.0);
        let result = question.grade(12.0, 11.0, 40.0);
        assert!(!result.correct);
        assert_eq!(result.landed_x, 12.0);
        assert_eq!(result.question_id, "q1");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["landedX"], 12.0);
        assert_eq!(json["correct"], false);
    }
}
