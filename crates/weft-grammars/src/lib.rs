#![doc = include_str!("../README.md")]

mod json;
mod lua;
mod mxt;

pub use crate::json::{json, JsonGrammar};
pub use crate::lua::{lua, LuaGrammar};
pub use crate::mxt::{mxt, MxtGrammar};
