//! Cross-system integration tests

mod simulation;
