use crate::ports::classifier::LabelScore;

#[derive(Debug, Clone, PartialEq)]
pub struct MoodPrediction {
    pub mood: String,
    /// Rounded to three decimals
    pub confidence: f64,
}

/// Pick the highest-scoring label. On ties the first one in provider order wins.
pub fn select_top_mood(scores: &[LabelScore]) -> Option<MoodPrediction> {
    let top = scores.iter().fold(None::<&LabelScore>, |best, candidate| match best {
        Some(best) if candidate.score <= best.score => Some(best),
        _ => Some(candidate),
    })?;

    Some(MoodPrediction {
        mood: top.label.clone(),
        confidence: round_confidence(top.score),
    })
}

fn round_confidence(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
