// src/lib.rs

//! iconharvest library
//!
//! Walks DayZ Fandom wiki category pages, extracts item icon candidates from
//! each item page, and downloads them into a categorized folder tree.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
