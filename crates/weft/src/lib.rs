#![doc = include_str!("../README.md")]

mod basket;
mod error;
mod grammar;
mod graph;
mod monitor;
mod reader;
mod scanner;
mod segment;
mod token;
#[cfg(test)]
mod tests;

pub use crate::basket::{pick, Basket, Tracker};
pub use crate::error::{GrammarError, ReadError, INVALID_READER};
pub use crate::grammar::{
    check_rule_name, check_rules, grammar_lines, rule_name, Grammar, Rule,
};
pub use crate::graph::{build_graph, Graph, Node};
pub use crate::monitor::{monitor, monitor_grammar, Log, LogEntry};
pub use crate::reader::body::{body, body_tail};
pub use crate::reader::compose::{
    any_of, at, at_end, many, map, named, not, opt, past, seq_of, times, to, wrap, zom,
};
pub use crate::reader::janus::janus;
pub use crate::reader::lexical::{boolean, int, uint, BoolReader, IntReader, UintReader};
pub use crate::reader::primitive::{
    any_rune, between, between_any, digit, fold, hex_digit, holey, invalid_reader, lit,
    match_rune, nl, rune, set, ws,
};
pub use crate::reader::{IntoReader, Reader};
pub use crate::scanner::Scanner;
pub use crate::segment::{
    sort_segments, sort_segments_by_order, Segment, SegmentateError,
};
pub use crate::token::{Marker, Token};
