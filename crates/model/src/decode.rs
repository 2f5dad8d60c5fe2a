//! Turning raw model output into a labelled prediction.

use serde::Serialize;

use crate::error::ModelError;

/// Label used when the arg-max index falls outside the vocabulary.
pub const UNKNOWN_LABEL: &str = "unknown";

/// A single classifier verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    /// Softmax probability of `label`, in `[0, 1]`.
    pub confidence: f64,
}

/// Numerically stable softmax: the maximum is subtracted before exponentiating.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Softmax the logits, take the arg-max and look it up in `labels`.
pub fn decode_logits(logits: &[f32], labels: &[String]) -> Result<Prediction, ModelError> {
    if logits.is_empty() {
        return Err(ModelError::Inference("model returned an empty output".into()));
    }
    if logits.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::Inference(
            "model returned non-finite values".into(),
        ));
    }

    let probs = softmax(logits);
    let idx = argmax(&probs)
        .ok_or_else(|| ModelError::Inference("model returned an empty output".into()))?;

    let label = labels
        .get(idx)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

    Ok(Prediction {
        label,
        confidence: f64::from(probs[idx]).clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn softmax_is_stable_for_large_logits() {
        let probs = softmax(&[1000.0, 1001.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs[1] - 0.731_058_6).abs() < 1e-5);
    }

    #[test]
    fn argmax_prefers_first_on_tie() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn decode_picks_best_label() {
        let p = decode_logits(&[0.1, 5.0, 0.3], &labels(&["acne", "rosacea", "normal"])).unwrap();
        assert_eq!(p.label, "rosacea");
        assert!(p.confidence > 0.9 && p.confidence <= 1.0);
    }

    #[test]
    fn decode_out_of_vocabulary_is_unknown() {
        let p = decode_logits(&[0.0, 0.0, 9.0], &labels(&["acne"])).unwrap();
        assert_eq!(p.label, UNKNOWN_LABEL);
    }

    #[test]
    fn decode_rejects_empty_and_nan() {
        assert_matches!(decode_logits(&[], &[]), Err(ModelError::Inference(_)));
        assert_matches!(decode_logits(&[f32::NAN, 1.0], &[]), Err(ModelError::Inference(_)));
    }
}
