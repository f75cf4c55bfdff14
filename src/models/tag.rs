// src/models/tag.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analytics::Dimension;

/// A managed tag value for one question dimension (e.g. subject "Physics").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub dimension: Dimension,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    pub dimension: Dimension,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagListParams {
    pub dimension: Option<Dimension>,
}
