use lcs_trace::generators::{generate_both, memo, tabulation};
use lcs_trace::Mode;
use proptest::prelude::*;

proptest! {
    #[test]
    fn generate_both_matches_individual_generators(a in "[ACGT]{0,6}", b in "[ACGT]{0,6}") {
        let pair = generate_both(&a, &b);
        prop_assert_eq!(&pair.tabulation, &tabulation::generate(&a, &b));
        prop_assert_eq!(&pair.memoized, &memo::generate(&a, &b));
    }

    #[test]
    fn pair_lookup_agrees_with_mode_dispatch(a in "[AB]{0,5}", b in "[AB]{0,5}") {
        let pair = generate_both(&a, &b);
        for mode in [Mode::Tabulation, Mode::Memoized] {
            let direct = mode.generator().generate(&a, &b);
            prop_assert_eq!(pair.get(mode), direct.as_slice());
        }
    }
}

#[test]
fn generate_both_handles_unicode_inputs() {
    let pair = generate_both("αβγ", "βγδ");
    assert_eq!(pair.tabulation, Mode::Tabulation.generate("αβγ", "βγδ"));
    assert_eq!(pair.memoized, Mode::Memoized.generate("αβγ", "βγδ"));
}
