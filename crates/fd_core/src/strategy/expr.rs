use serde::{Deserialize, Serialize};

use crate::models::Candidate;

/// Plugin expressions nested deeper than this are rejected at load time.
const MAX_EXPR_DEPTH: usize = 32;

/// Closed declarative weight-expression grammar for plugin presets.
///
/// The grammar is data, never code: plugins ship a small arithmetic AST over
/// candidate fields, deserialized and validated by the registry before any
/// draw can see it. Evaluation is total over `f64`; division by zero yields
/// a non-finite value, which validation rejects up front.
///
/// Wire form (tagged by `op`), e.g. the built-in `balanced` formula:
///
/// ```json
/// {"op": "div",
///  "lhs": {"op": "field", "field": "display_weight"},
///  "rhs": {"op": "add", "args": [
///      {"op": "const", "value": 1.0},
///      {"op": "field", "field": "pick_count"}]}}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WeightExpr {
    Const { value: f64 },
    Field { field: CandidateField },
    Add { args: Vec<WeightExpr> },
    Mul { args: Vec<WeightExpr> },
    Sub { lhs: Box<WeightExpr>, rhs: Box<WeightExpr> },
    Div { lhs: Box<WeightExpr>, rhs: Box<WeightExpr> },
    Max { lhs: Box<WeightExpr>, rhs: Box<WeightExpr> },
    Min { lhs: Box<WeightExpr>, rhs: Box<WeightExpr> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    DisplayWeight,
    PickCount,
    Score,
}

impl CandidateField {
    fn read(self, candidate: &Candidate) -> f64 {
        match self {
            CandidateField::DisplayWeight => f64::from(candidate.display_weight),
            CandidateField::PickCount => f64::from(candidate.pick_count),
            CandidateField::Score => f64::from(candidate.score),
        }
    }
}

impl WeightExpr {
    pub fn eval(&self, candidate: &Candidate) -> f64 {
        match self {
            WeightExpr::Const { value } => *value,
            WeightExpr::Field { field } => field.read(candidate),
            WeightExpr::Add { args } => args.iter().map(|e| e.eval(candidate)).sum(),
            WeightExpr::Mul { args } => args.iter().map(|e| e.eval(candidate)).product(),
            WeightExpr::Sub { lhs, rhs } => lhs.eval(candidate) - rhs.eval(candidate),
            WeightExpr::Div { lhs, rhs } => lhs.eval(candidate) / rhs.eval(candidate),
            WeightExpr::Max { lhs, rhs } => lhs.eval(candidate).max(rhs.eval(candidate)),
            WeightExpr::Min { lhs, rhs } => lhs.eval(candidate).min(rhs.eval(candidate)),
        }
    }

    /// Checks the "pure, total, non-negative" plugin contract against a
    /// trial battery of candidates. Any non-finite or negative output
    /// rejects the whole expression.
    pub fn validate(&self) -> Result<(), String> {
        if self.depth() > MAX_EXPR_DEPTH {
            return Err(format!("expression nests deeper than {} levels", MAX_EXPR_DEPTH));
        }
        for candidate in trial_battery() {
            let weight = self.eval(&candidate);
            if !weight.is_finite() {
                return Err(format!(
                    "non-finite weight {} for trial candidate '{}'",
                    weight, candidate.id
                ));
            }
            if weight < 0.0 {
                return Err(format!(
                    "negative weight {} for trial candidate '{}'",
                    weight, candidate.id
                ));
            }
        }
        Ok(())
    }

    fn depth(&self) -> usize {
        match self {
            WeightExpr::Const { .. } | WeightExpr::Field { .. } => 1,
            WeightExpr::Add { args } | WeightExpr::Mul { args } => {
                1 + args.iter().map(WeightExpr::depth).max().unwrap_or(0)
            }
            WeightExpr::Sub { lhs, rhs }
            | WeightExpr::Div { lhs, rhs }
            | WeightExpr::Max { lhs, rhs }
            | WeightExpr::Min { lhs, rhs } => 1 + lhs.depth().max(rhs.depth()),
        }
    }
}

/// Candidates covering the field extremes plugins are most likely to trip
/// over: fresh (all-zero counters), heavily picked, negative score, and
/// large values.
fn trial_battery() -> Vec<Candidate> {
    let mut fresh = Candidate::new("trial_fresh");
    fresh.display_weight = 1;

    let mut veteran = Candidate::new("trial_veteran");
    veteran.display_weight = 3;
    veteran.pick_count = 25;
    veteran.score = -40;

    let mut outlier = Candidate::new("trial_outlier");
    outlier.display_weight = 100;
    outlier.pick_count = 1000;
    outlier.score = 90;

    vec![fresh, veteran, outlier]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(field: CandidateField) -> WeightExpr {
        WeightExpr::Field { field }
    }

    #[test]
    fn eval_reads_candidate_fields() {
        let mut candidate = Candidate::new("s01");
        candidate.display_weight = 4;
        candidate.pick_count = 2;
        candidate.score = -3;

        assert_eq!(field(CandidateField::DisplayWeight).eval(&candidate), 4.0);
        assert_eq!(field(CandidateField::PickCount).eval(&candidate), 2.0);
        assert_eq!(field(CandidateField::Score).eval(&candidate), -3.0);
    }

    #[test]
    fn eval_balanced_style_expression() {
        // display_weight / (1 + pick_count)
        let expr = WeightExpr::Div {
            lhs: Box::new(field(CandidateField::DisplayWeight)),
            rhs: Box::new(WeightExpr::Add {
                args: vec![WeightExpr::Const { value: 1.0 }, field(CandidateField::PickCount)],
            }),
        };
        let mut candidate = Candidate::new("s01");
        candidate.display_weight = 6;
        candidate.pick_count = 2;
        assert_eq!(expr.eval(&candidate), 2.0);
        assert!(expr.validate().is_ok());
    }

    #[test]
    fn validate_rejects_division_by_pick_count() {
        // pick_count is 0 for a fresh candidate, so 1 / pick_count is not total.
        let expr = WeightExpr::Div {
            lhs: Box::new(WeightExpr::Const { value: 1.0 }),
            rhs: Box::new(field(CandidateField::PickCount)),
        };
        let err = expr.validate().unwrap_err();
        assert!(err.contains("non-finite"), "unexpected error: {err}");
    }

    #[test]
    fn validate_rejects_negative_outputs() {
        // Raw score goes negative; plugins must clamp with max themselves.
        let expr = field(CandidateField::Score);
        let err = expr.validate().unwrap_err();
        assert!(err.contains("negative"), "unexpected error: {err}");
    }

    #[test]
    fn clamped_score_passes_validation() {
        let expr = WeightExpr::Max {
            lhs: Box::new(WeightExpr::Const { value: 0.0 }),
            rhs: Box::new(field(CandidateField::Score)),
        };
        assert!(expr.validate().is_ok());
    }

    #[test]
    fn wire_form_round_trips() {
        let json = r#"{
            "op": "mul",
            "args": [
                {"op": "field", "field": "display_weight"},
                {"op": "max",
                 "lhs": {"op": "const", "value": 1.0},
                 "rhs": {"op": "field", "field": "score"}}
            ]
        }"#;
        let expr: WeightExpr = serde_json::from_str(json).unwrap();
        assert!(expr.validate().is_ok());

        let mut candidate = Candidate::new("s01");
        candidate.display_weight = 2;
        candidate.score = 5;
        assert_eq!(expr.eval(&candidate), 10.0);
    }

    #[test]
    fn empty_add_and_mul_have_identity_values() {
        let sum = WeightExpr::Add { args: Vec::new() };
        let product = WeightExpr::Mul { args: Vec::new() };
        let candidate = Candidate::new("s01");
        assert_eq!(sum.eval(&candidate), 0.0);
        assert_eq!(product.eval(&candidate), 1.0);
    }
}
