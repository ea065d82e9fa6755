//! Search query language for the mnemo backend.
//!
//! This crate turns a raw search string such as
//! `deck:Spanish tag:verb -is:suspended prop:ivl>=10 front:re:café.*`
//! into typed, executable filters, in two strictly separated phases:
//!
//! 1. [`parse`] tokenizes and classifies the string into a [`SearchQuery`]:
//!    a flat bag of criteria joined by implicit conjunction. Parsing is
//!    pure (no storage, no clock, no regex compilation) and forgiving;
//!    only malformed `flag:` and `prop:` tokens are rejected.
//! 2. [`compile_for_notes`] and [`compile_for_cards`] lower the query into
//!    a [`FilterSet`] scoped to one owner, validating every regex pattern
//!    up front. Notes and cards share the text/tag/deck handling but
//!    diverge on states, flags and properties.
//!
//! Storage engines evaluate the resulting filter sets; the `mnemo-store`
//! crate holds the reference in-memory engine.

pub mod compile;
pub mod error;
pub mod filter;
pub mod parser;
pub mod query;
mod tokenizer;

pub use compile::{compile_for_cards, compile_for_cards_at, compile_for_notes};
pub use error::{CompileError, ParseError};
pub use filter::{
    Filter, FilterSet, FilterTarget, LikePattern, NumericAttr, TextFilter, TextFold, TextMatcher,
    TextScope,
};
pub use parser::parse;
pub use query::{
    CompareOp, PropertyFilter, SearchProperty, SearchQuery, StateFilter, TextMode, TextSearch,
};
