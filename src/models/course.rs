//! Golf course listing model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Public,
    Private,
    Resort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub location: String,
    pub region: String,
    pub course_type: CourseType,
    pub holes: u32,
    pub weekday_price: u64,
    pub weekend_price: u64,
    #[serde(default)]
    pub features: Vec<String>,
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseSort {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    Rating,
}

/// Listing query accepted by the public course pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseQuery {
    #[serde(rename = "type")]
    pub course_type: Option<CourseType>,
    pub location: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    #[serde(default)]
    pub sort: CourseSort,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}
