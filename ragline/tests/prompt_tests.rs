//! Tests for prompt assembly under a character budget.

use proptest::prelude::*;
use ragline::prompt::PromptAssembler;

fn block(i: usize, text: &str) -> String {
    format!("[context {i}] {text}\n")
}

#[test]
fn empty_context_still_asks_the_question() {
    let assembled = PromptAssembler::new(3200).assemble("why is the sky blue?", &[]);
    assert_eq!(assembled.included, 0);
    assert!(assembled.prompt.contains("Question: why is the sky blue?"));
    assert!(assembled.prompt.ends_with("Answer:"));
    assert!(!assembled.prompt.contains("[context"));
}

#[test]
fn blocks_are_numbered_from_one_in_ranked_order() {
    let assembled =
        PromptAssembler::new(3200).assemble("q", &["first passage", "second passage"]);
    assert_eq!(assembled.included, 2);
    let expected = format!("{}{}", block(1, "first passage"), block(2, "second passage"));
    assert!(assembled.prompt.starts_with(&expected));
}

#[test]
fn context_comes_before_instructions_and_question() {
    let assembled = PromptAssembler::new(3200).assemble("q", &["passage"]);
    let context_at = assembled.prompt.find("[context 1]").unwrap();
    let instructions_at = assembled.prompt.find("Answer the question").unwrap();
    let question_at = assembled.prompt.find("Question: q").unwrap();
    assert!(context_at < instructions_at);
    assert!(instructions_at < question_at);
}

#[test]
fn assembly_stops_at_first_block_that_does_not_fit() {
    let short = "tiny";
    let huge = "x".repeat(500);
    // Budget takes the first short block, the huge one overflows, and the
    // trailing short one must not be pulled forward past it.
    let budget = block(1, short).chars().count() + block(3, short).chars().count();
    let assembled =
        PromptAssembler::new(budget).assemble("q", &[short, huge.as_str(), short]);

    assert_eq!(assembled.included, 1);
    assert!(assembled.prompt.contains("[context 1]"));
    assert!(!assembled.prompt.contains("[context 2]"));
    assert!(!assembled.prompt.contains("[context 3]"));
}

#[test]
fn block_exactly_at_budget_is_included() {
    let text = "a".repeat(100);
    let budget = block(1, &text).chars().count();
    let assembled = PromptAssembler::new(budget).assemble("q", &[text.as_str()]);
    assert_eq!(assembled.included, 1);

    let assembled = PromptAssembler::new(budget - 1).assemble("q", &[text.as_str()]);
    assert_eq!(assembled.included, 0);
}

#[test]
fn zero_budget_includes_no_context() {
    let assembled = PromptAssembler::new(0).assemble("q", &["anything"]);
    assert_eq!(assembled.included, 0);
    assert!(assembled.prompt.contains("Question: q"));
}

/// **Property: context budget.** *For any* candidate list and budget, the
/// formatted blocks that make it into the prompt SHALL be a prefix of the
/// candidates, their combined character count SHALL never exceed the
/// budget, and assembly SHALL have stopped only at a block that would
/// overflow it.
mod prop_budget_bound {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn included_prefix_respects_budget(
            contexts in proptest::collection::vec("[a-z ]{0,60}", 0..8),
            budget in 0usize..300,
            query in "[a-z ]{1,20}",
        ) {
            let refs: Vec<&str> = contexts.iter().map(String::as_str).collect();
            let assembled = PromptAssembler::new(budget).assemble(&query, &refs);

            prop_assert!(assembled.included <= contexts.len());

            let used: usize = contexts
                .iter()
                .take(assembled.included)
                .enumerate()
                .map(|(i, text)| block(i + 1, text).chars().count())
                .sum();
            prop_assert!(used <= budget);

            // Assembly only stops early when the next block would overflow.
            if assembled.included < contexts.len() {
                let next = block(
                    assembled.included + 1,
                    &contexts[assembled.included],
                );
                prop_assert!(used + next.chars().count() > budget);
            }

            let question_line = format!("Question: {query}");
            prop_assert!(assembled.prompt.contains(&question_line));
            prop_assert!(assembled.prompt.ends_with("Answer:"));
        }
    }
}
