// src/models/mod.rs

pub mod common;
pub mod exam;
pub mod question;
pub mod submission;
pub mod topic;
