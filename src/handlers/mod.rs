// src/handlers/mod.rs

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod community;
pub mod question;
pub mod quiz;
pub mod tag;
