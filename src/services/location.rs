//! Location reference data

use chrono::Utc;

use crate::database::LocationRepository;
use crate::models::{Location, LocationRequest};
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::helpers::generate_document_id;

fn validate(request: &LocationRequest) -> Result<()> {
    if request.name.trim().is_empty() || request.country.trim().is_empty() {
        return Err(FiveMGolfError::InvalidInput("Name and country are required".to_string()));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct LocationService {
    locations: LocationRepository,
}

impl LocationService {
    pub fn new(locations: LocationRepository) -> Self {
        Self { locations }
    }

    pub async fn create(&self, request: LocationRequest) -> Result<Location> {
        validate(&request)?;

        let now = Utc::now();
        let location = Location {
            id: generate_document_id(),
            name: request.name.trim().to_string(),
            country: request.country.trim().to_string(),
            region: request.region,
            sort_order: request.sort_order,
            active: request.active,
            created_at: now,
            updated_at: now,
        };

        self.locations.save(&location.id, &location).await?;
        Ok(location)
    }

    pub async fn update(&self, id: &str, request: LocationRequest) -> Result<Location> {
        validate(&request)?;

        let mut location = self
            .locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| FiveMGolfError::not_found("Location", id))?;

        location.name = request.name.trim().to_string();
        location.country = request.country.trim().to_string();
        location.region = request.region;
        location.sort_order = request.sort_order;
        location.active = request.active;
        location.updated_at = Utc::now();

        self.locations.save(&location.id, &location).await?;
        Ok(location)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.locations.delete(id).await? {
            return Err(FiveMGolfError::not_found("Location", id));
        }
        Ok(())
    }

    /// Locations ordered by sort order, then name
    pub async fn list(&self, active_only: bool) -> Result<Vec<Location>> {
        let mut locations: Vec<Location> = self
            .locations
            .list()
            .await?
            .into_iter()
            .filter(|l| !active_only || l.active)
            .collect();
        locations.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseService;

    fn request(name: &str, sort_order: i32, active: bool) -> LocationRequest {
        LocationRequest {
            name: name.to_string(),
            country: "JP".to_string(),
            region: Some("Kyushu".to_string()),
            sort_order,
            active,
        }
    }

    #[tokio::test]
    async fn test_ordering_and_active_filter() {
        let service = LocationService::new(DatabaseService::in_memory().repos.locations);
        service.create(request("Saga", 2, true)).await.unwrap();
        service.create(request("Fukuoka", 1, true)).await.unwrap();
        service.create(request("Oita", 3, false)).await.unwrap();

        let names: Vec<String> = service.list(false).await.unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Fukuoka", "Saga", "Oita"]);

        assert_eq!(service.list(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_location() {
        let service = LocationService::new(DatabaseService::in_memory().repos.locations);
        let result = service.update("missing", request("X", 0, true)).await;
        assert!(matches!(result, Err(FiveMGolfError::NotFound { .. })));
    }
}
