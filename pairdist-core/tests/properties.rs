use pairdist_core::types::{GAP, INDEL_COST};
use pairdist_core::{
    alignment_cost, AlignmentTraceEngine, DistanceMatrix, EngineConfig, MatrixOrchestrator,
    ScoreMatrixEngine, Sequence, TieBreak,
};
use proptest::prelude::*;

const SCORE_CAP: usize = 5000;

fn dna(max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T']), 0..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn cost_is_symmetric(a in dna(40), b in dna(40)) {
        prop_assert_eq!(
            alignment_cost(a.as_bytes(), b.as_bytes(), SCORE_CAP, TieBreak::TopFirst),
            alignment_cost(b.as_bytes(), a.as_bytes(), SCORE_CAP, TieBreak::TopFirst)
        );
    }

    #[test]
    fn cost_ignores_tie_break(a in dna(40), b in dna(40)) {
        prop_assert_eq!(
            alignment_cost(a.as_bytes(), b.as_bytes(), SCORE_CAP, TieBreak::TopFirst),
            alignment_cost(a.as_bytes(), b.as_bytes(), SCORE_CAP, TieBreak::LeftFirst)
        );
    }

    #[test]
    fn cost_is_bounded_by_pure_indels(a in dna(40), b in dna(40)) {
        let cost = alignment_cost(a.as_bytes(), b.as_bytes(), SCORE_CAP, TieBreak::TopFirst);
        prop_assert!(cost <= (a.len() + b.len()) as i32 * INDEL_COST);
    }

    #[test]
    fn self_cell_is_zero(a in dna(40), index in 0usize..16) {
        let mut engine = ScoreMatrixEngine::default();
        let s = Sequence::new("s", a);
        prop_assert_eq!(engine.align(&s, &s, index, index), 0);
        prop_assert!(engine.cache().is_empty());
    }

    #[test]
    fn cached_cost_matches_fresh_cost(a in dna(40), b in dna(40)) {
        let mut engine = ScoreMatrixEngine::default();
        let sa = Sequence::new("a", a.clone());
        let sb = Sequence::new("b", b.clone());

        let first = engine.align(&sa, &sb, 0, 1);
        let mirrored = engine.align(&sb, &sa, 1, 0);
        prop_assert_eq!(first, mirrored);
        prop_assert_eq!(engine.computed(), 1);
        prop_assert_eq!(
            first,
            alignment_cost(a.as_bytes(), b.as_bytes(), SCORE_CAP, TieBreak::TopFirst)
        );
    }

    #[test]
    fn symmetric_when_mirrored_cell_computed_first(
        a in dna(40),
        b in dna(40),
        i in 0usize..8,
        j in 8usize..16,
    ) {
        let mut engine = ScoreMatrixEngine::default();
        let sa = Sequence::new("a", a.clone());
        let sb = Sequence::new("b", b.clone());

        // (j, i) is the genuine computation, (i, j) the cache hit.
        let mirrored = engine.align(&sb, &sa, j, i);
        let direct = engine.align(&sa, &sb, i, j);
        prop_assert_eq!(direct, mirrored);
        prop_assert_eq!(engine.computed(), 1);
        prop_assert_eq!(engine.cache().get(i, j), Some(mirrored));
        prop_assert_eq!(engine.cache().get(j, i), Some(mirrored));
        prop_assert_eq!(
            direct,
            alignment_cost(a.as_bytes(), b.as_bytes(), SCORE_CAP, TieBreak::TopFirst)
        );
    }

    #[test]
    fn trace_reproduces_inputs(a in dna(60), b in dna(60), left_first in any::<bool>()) {
        let tie_break = if left_first { TieBreak::LeftFirst } else { TieBreak::TopFirst };
        let engine = AlignmentTraceEngine::new(EngineConfig::default().with_tie_break(tie_break));
        let aligned = engine
            .trace(&Sequence::new("a", a.clone()), &Sequence::new("b", b.clone()), 0, 1)
            .aligned();

        prop_assert_eq!(aligned.top.len(), aligned.bottom.len());
        prop_assert_eq!(aligned.ungapped_top(), a);
        prop_assert_eq!(aligned.ungapped_bottom(), b);
        prop_assert_eq!(aligned.path_cost(), aligned.cost);

        // No column pairs a gap with a gap.
        let gap = char::from(GAP);
        prop_assert!(aligned
            .top
            .chars()
            .zip(aligned.bottom.chars())
            .all(|(x, y)| x != gap || y != gap));
    }

    #[test]
    fn trace_cost_matches_score_cost(a in dna(60), b in dna(60)) {
        let trace = AlignmentTraceEngine::default()
            .trace(&Sequence::new("a", a.clone()), &Sequence::new("b", b.clone()), 0, 1);
        prop_assert_eq!(
            trace.cost(),
            alignment_cost(a.as_bytes(), b.as_bytes(), SCORE_CAP, TieBreak::TopFirst)
        );
        prop_assert_eq!(trace.node_count(), (a.len() + 1) * (b.len() + 1));
    }

    #[test]
    fn parallel_fill_matches_sequential(seqs in proptest::collection::vec(dna(20), 0..6)) {
        let sequences: Vec<Sequence> = seqs
            .into_iter()
            .enumerate()
            .map(|(i, s)| Sequence::new(format!("s{}", i), s))
            .collect();

        let mut orchestrator = MatrixOrchestrator::new(EngineConfig::default()).unwrap();
        let mut sequential = DistanceMatrix::new(sequences.len());
        let mut parallel = DistanceMatrix::new(sequences.len());
        orchestrator.fill(&sequences, &mut sequential, &mut ()).unwrap();
        orchestrator.fill_parallel(&sequences, &mut parallel, &mut ()).unwrap();

        prop_assert_eq!(&sequential, &parallel);
        prop_assert!(sequential.is_symmetric());
    }
}
