// src/handlers/mod.rs

pub mod exam;
pub mod question;
pub mod result;
pub mod topic;
