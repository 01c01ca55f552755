use clap::ValueEnum;

/// How `pr list` estimates a one-rep max from a multi-rep record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OneRMFormula {
    Epley,
    Brzycki,
}

/// Estimated one-rep max for `weight` lifted `reps` times.
pub fn calculate_1rm(weight: f64, reps: u32, formula: OneRMFormula) -> f64 {
    if reps <= 1 {
        return weight;
    }
    match formula {
        OneRMFormula::Epley => weight * (1.0 + reps as f64 / 30.0),
        // Brzycki breaks down past ~36 reps.
        OneRMFormula::Brzycki if reps < 37 => weight * 36.0 / (37.0 - reps as f64),
        OneRMFormula::Brzycki => calculate_1rm(weight, reps, OneRMFormula::Epley),
    }
}

pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{weight:.0}kg")
    } else {
        format!("{weight:.1}kg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rep_is_the_max() {
        assert_eq!(calculate_1rm(180.0, 1, OneRMFormula::Epley), 180.0);
        assert_eq!(calculate_1rm(180.0, 1, OneRMFormula::Brzycki), 180.0);
    }

    #[test]
    fn epley_and_brzycki_agree_roughly_at_low_reps() {
        let e = calculate_1rm(100.0, 5, OneRMFormula::Epley);
        let b = calculate_1rm(100.0, 5, OneRMFormula::Brzycki);
        assert!((e - 116.67).abs() < 0.01);
        assert!((b - 112.5).abs() < 0.01);
    }

    #[test]
    fn weights_print_without_noise() {
        assert_eq!(format_weight(100.0), "100kg");
        assert_eq!(format_weight(102.5), "102.5kg");
    }

    #[test]
    fn brzycki_falls_back_to_epley_at_high_reps() {
        assert_eq!(
            calculate_1rm(50.0, 40, OneRMFormula::Brzycki),
            calculate_1rm(50.0, 40, OneRMFormula::Epley)
        );
    }

    #[test]
    fn formula_is_picked_by_name() {
        assert_eq!(
            OneRMFormula::from_str("brzycki", true),
            Ok(OneRMFormula::Brzycki)
        );
        assert!(OneRMFormula::from_str("lombardi", true).is_err());
    }
}
