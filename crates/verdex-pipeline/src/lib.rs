//! # verdex-pipeline — The Check Pipeline
//!
//! Turns a catalog of laws and features plus a model client into
//! compliance reports. Three stages:
//!
//! 1. **Relevance screening** asks the model which catalog laws a
//!    feature could plausibly interact with. A model failure fails
//!    open (the whole catalog stays in scope); an unparseable answer
//!    fails closed (no laws).
//! 2. **Pair evaluation** asks the model for a verdict on one
//!    (feature, law) pair, exactly once. Every failure, transport or
//!    parse, becomes the fixed `requires_review` fallback verdict; the
//!    evaluator never propagates an error.
//! 3. **Aggregation** walks the selected pairs sequentially
//!    (feature-major, law-minor), injects implemented corrections into
//!    prompts, and tallies verdicts into a summary with a 0..=100 risk
//!    score.
//!
//! Model responses are parsed into [`ParseOutcome`], a tagged result
//! that keeps the raw text on failure instead of smuggling sentinel
//! values through the happy path.

pub mod engine;
pub mod evaluator;
pub mod parse;
pub mod prompt;
pub mod screener;

pub use engine::{BatchReport, CheckEngine, DiscoveryReport, EvaluationOptions};
pub use evaluator::PairEvaluator;
pub use parse::{parse_title_list, parse_verdict_payload, ParseOutcome, VerdictPayload};
pub use screener::RelevanceScreener;
