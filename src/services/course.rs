//! Course catalog for the public listing pages
//!
//! The catalog is a static list bundled with the binary.

use std::cmp::Ordering;

use crate::models::{Course, CourseQuery, CourseSort, Page};
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::helpers::{calculate_offset, total_pages};

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const MAX_PAGE_SIZE: usize = 50;

const BUNDLED_COURSES: &str = include_str!("../../data/courses.json");

#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// Catalog parsed from the bundled course list
    pub fn bundled() -> Result<Self> {
        let courses: Vec<Course> = serde_json::from_str(BUNDLED_COURSES)?;
        Ok(Self::new(courses))
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Course> {
        self.courses
            .iter()
            .find(|course| course.id == id)
            .ok_or_else(|| FiveMGolfError::not_found("Course", id))
    }

    pub fn search(&self, query: &CourseQuery) -> Page<Course> {
        let location = query.location.as_deref().map(str::to_lowercase);
        let text = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut items: Vec<&Course> = self
            .courses
            .iter()
            .filter(|c| query.course_type.map_or(true, |t| c.course_type == t))
            .filter(|c| {
                location
                    .as_deref()
                    .map_or(true, |l| c.location.to_lowercase().contains(l))
            })
            .filter(|c| text.as_deref().map_or(true, |q| matches_text(c, q)))
            .filter(|c| query.min_price.map_or(true, |min| c.weekday_price >= min))
            .filter(|c| query.max_price.map_or(true, |max| c.weekday_price <= max))
            .collect();

        items.sort_by(|a, b| compare(a, b, query.sort));

        let page_size = query
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1);
        let total = items.len();

        let items = items
            .into_iter()
            .skip(calculate_offset(page, page_size))
            .take(page_size)
            .cloned()
            .collect();

        Page {
            items,
            total,
            page,
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }
}

fn matches_text(course: &Course, needle: &str) -> bool {
    course.name.to_lowercase().contains(needle)
        || course.location.to_lowercase().contains(needle)
        || course
            .features
            .iter()
            .any(|feature| feature.to_lowercase().contains(needle))
}

fn compare(a: &Course, b: &Course, sort: CourseSort) -> Ordering {
    let by_name = || a.name.cmp(&b.name);
    match sort {
        CourseSort::Name => by_name(),
        CourseSort::PriceAsc => a.weekday_price.cmp(&b.weekday_price).then_with(by_name),
        CourseSort::PriceDesc => b.weekday_price.cmp(&a.weekday_price).then_with(by_name),
        // unrated last
        CourseSort::Rating => b
            .rating
            .unwrap_or(f32::MIN)
            .total_cmp(&a.rating.unwrap_or(f32::MIN))
            .then_with(by_name),
    }
}
