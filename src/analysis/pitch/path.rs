use super::super::params::PitchParams;
use super::candidates::Candidate;

/// Pick one candidate per frame by maximizing strength minus transition costs.
///
/// Returns the chosen frequency per frame, `None` for unvoiced frames.
pub(super) fn best_path(
    frames: &[Vec<Candidate>],
    params: &PitchParams,
    time_step: f64,
) -> Vec<Option<f64>> {
    if frames.is_empty() {
        return Vec::new();
    }
    let correction = 0.01 / time_step;
    let voiced_unvoiced = params.voiced_unvoiced_cost * correction;
    let octave_jump = params.octave_jump_cost * correction;
    let local = |c: &Candidate| {
        if c.is_voiced() {
            c.strength - params.octave_cost * (params.ceiling_hz / c.frequency).log2()
        } else {
            c.strength
        }
    };
    let transition = |from: &Candidate, to: &Candidate| match (from.is_voiced(), to.is_voiced()) {
        (false, false) => 0.0,
        (true, true) => octave_jump * (from.frequency / to.frequency).log2().abs(),
        _ => voiced_unvoiced,
    };

    let mut scores: Vec<f64> = frames[0].iter().map(local).collect();
    let mut back: Vec<Vec<usize>> = vec![vec![0; frames[0].len()]];
    for pair in frames.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let mut next_scores = Vec::with_capacity(next.len());
        let mut next_back = Vec::with_capacity(next.len());
        for to in next {
            let (best_from, best_score) = prev
                .iter()
                .zip(&scores)
                .enumerate()
                .map(|(idx, (from, &score))| (idx, score - transition(from, to)))
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .unwrap_or((0, f64::NEG_INFINITY));
            next_scores.push(best_score + local(to));
            next_back.push(best_from);
        }
        scores = next_scores;
        back.push(next_back);
    }

    let mut choice = scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let mut path = vec![None; frames.len()];
    for frame in (0..frames.len()).rev() {
        let candidate = frames[frame][choice];
        path[frame] = candidate.is_voiced().then_some(candidate.frequency);
        choice = back[frame][choice];
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voiced(frequency: f64, strength: f64) -> Candidate {
        Candidate {
            frequency,
            strength,
        }
    }

    fn unvoiced(strength: f64) -> Candidate {
        Candidate {
            frequency: 0.0,
            strength,
        }
    }

    #[test]
    fn octave_jump_cost_keeps_track_continuous() {
        let params = PitchParams::default();
        // The middle frame slightly prefers the octave above, but jumping costs more.
        let frames = vec![
            vec![unvoiced(0.45), voiced(200.0, 0.95)],
            vec![unvoiced(0.45), voiced(200.0, 0.90), voiced(400.0, 0.92)],
            vec![unvoiced(0.45), voiced(200.0, 0.95)],
        ];
        let path = best_path(&frames, &params, 0.01);
        assert_eq!(path, vec![Some(200.0); 3]);
    }

    #[test]
    fn weak_frames_become_unvoiced() {
        let params = PitchParams::default();
        let frames = vec![
            vec![unvoiced(2.0), voiced(150.0, 0.3)],
            vec![unvoiced(2.0), voiced(150.0, 0.3)],
        ];
        let path = best_path(&frames, &params, 0.01);
        assert_eq!(path, vec![None, None]);
    }
}
