// src/models/mod.rs

pub mod attempt;
pub mod comment;
pub mod post;
pub mod question;
pub mod quiz;
pub mod tag;
pub mod user;
