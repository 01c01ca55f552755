use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use strsim::jaro_winkler;

use serde::Deserialize;

/// Muscle groups an exercise can be filed under.
pub static ALLOWED_MUSCLES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    BTreeSet::from([
        "biceps",
        "triceps",
        "forearms",
        "chest",
        "shoulders",
        "back",
        "quads",
        "hamstrings",
        "glutes",
        "calves",
        "abs",
        "full-body",
    ])
});

/// Lowercase muscle name if it is one of [`ALLOWED_MUSCLES`].
pub fn canonical_muscle<S: AsRef<str>>(m: S) -> Option<String> {
    let m = m.as_ref().trim().to_ascii_lowercase();
    let m = match m.as_str() {
        "quadriceps" | "quad" => "quads".to_string(),
        _ => m,
    };
    ALLOWED_MUSCLES.contains(m.as_str()).then_some(m)
}

/// Closest allowed muscle for a misspelt `input`, only when the match is
/// both close and clearly ahead of the runner-up.
pub fn best_muscle_suggestion(input: &str) -> Option<&'static str> {
    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    let inp = input.trim().to_ascii_lowercase();
    if inp.is_empty() {
        return None;
    }

    let mut scores: Vec<(&'static str, f64)> = ALLOWED_MUSCLES
        .iter()
        .map(|m| (*m, jaro_winkler(&inp, m)))
        .collect();
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (best, best_score) = *scores.first()?;
    let second = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    (best_score >= MIN_SCORE && best_score - second >= GAP).then_some(best)
}

#[derive(Debug, Deserialize)]
pub struct ExerciseDef {
    pub name: String,
    pub description: Option<String>,
    pub primary_muscle: String,
}

/// `[[exercise]]` entries of an exercise catalog TOML file.
#[derive(Debug, Deserialize)]
pub struct ExerciseImport {
    #[serde(default)]
    pub exercise: Vec<ExerciseDef>,
}
