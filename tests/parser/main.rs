//! Integration tests for Layer 1: Parser
//!
//! Tests for the tokenizer, the filter language, built-in parsers, and the
//! parser registry.

mod filter;
