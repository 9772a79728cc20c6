use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::wardrobe::{DeleteWardrobeItem, DeleteWardrobeResponse, NewWardrobeItem, WardrobeItem},
    errors::{AppError, FieldError},
    repositories::wardrobe::WardrobeRepository,
    utils::valid_uuid::required_uuid,
};

pub struct WardrobeHandler {
    pub wardrobe_repo: Arc<dyn WardrobeRepository>,
}

impl WardrobeHandler {
    pub fn new(wardrobe_repo: Arc<dyn WardrobeRepository>) -> Self {
        WardrobeHandler { wardrobe_repo }
    }

    /// Lists a user's wardrobe, newest first
    pub async fn list_items(&self, user_id: Option<&str>) -> Result<Vec<WardrobeItem>, AppError> {
        let user_id = user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::InvalidInput("userId is required".to_string()))?;

        self.wardrobe_repo.list_items(user_id).await
    }

    /// Stores a new wardrobe item and returns it with its generated id
    pub async fn create_item(&self, request: NewWardrobeItem) -> Result<WardrobeItem, AppError> {
        request.validate()?;

        let insert = request.prepare_for_insert();

        let blank: Vec<FieldError> = [
            ("userId", &insert.user_id),
            ("item_type", &insert.item_type),
            ("color", &insert.color),
            ("description", &insert.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| FieldError {
            field: field.to_string(),
            message: format!("{field} is required"),
        })
        .collect();

        if !blank.is_empty() {
            return Err(AppError::ValidationError(blank));
        }

        self.wardrobe_repo.create_item(&insert).await
    }

    /// Deletes an item by id. Deleting an unknown id still succeeds.
    pub async fn delete_item(&self, request: DeleteWardrobeItem) -> Result<DeleteWardrobeResponse, AppError> {
        let id = required_uuid("id", request.id.as_deref())?;

        let removed = self.wardrobe_repo.delete_item(&id).await?;
        if removed == 0 {
            tracing::debug!(%id, "Wardrobe item already absent");
        }

        Ok(DeleteWardrobeResponse { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::repositories::wardrobe::MockWardrobeRepository;

    fn handler(repo: MockWardrobeRepository) -> WardrobeHandler {
        WardrobeHandler::new(Arc::new(repo))
    }

    fn new_item(user_id: &str, item_type: &str) -> NewWardrobeItem {
        NewWardrobeItem {
            user_id: user_id.into(),
            item_type: item_type.into(),
            color: "olive".into(),
            description: "cargo pants".into(),
        }
    }

    #[tokio::test]
    async fn list_requires_user_id() {
        let mut repo = MockWardrobeRepository::new();
        repo.expect_list_items().never();
        let handler = handler(repo);

        assert!(matches!(handler.list_items(None).await, Err(AppError::InvalidInput(_))));
        assert!(matches!(handler.list_items(Some("  ")).await, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn list_passes_trimmed_user_id() {
        let mut repo = MockWardrobeRepository::new();
        repo.expect_list_items()
            .withf(|user_id| user_id == "user-42")
            .times(1)
            .returning(|_| Ok(vec![]));

        let items = handler(repo).list_items(Some(" user-42 ")).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn create_normalizes_and_persists() {
        let mut repo = MockWardrobeRepository::new();
        repo.expect_create_item()
            .withf(|insert| insert.item_type == "pants" && insert.user_id == "user-42")
            .times(1)
            .returning(|insert| {
                Ok(WardrobeItem {
                    id: Uuid::new_v4(),
                    user_id: insert.user_id.clone(),
                    item_type: insert.item_type.clone(),
                    color: insert.color.clone(),
                    description: insert.description.clone(),
                    created_at: Utc::now(),
                })
            });

        let created = handler(repo).create_item(new_item("user-42", " Pants ")).await.unwrap();
        assert_eq!(created.item_type, "pants");
        assert_eq!(created.color, "olive");
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let mut repo = MockWardrobeRepository::new();
        repo.expect_create_item().never();
        let handler = handler(repo);

        let err = handler.create_item(new_item("", "jacket")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref fields) if fields[0].message == "userId is required"));

        let err = handler.create_item(new_item("user-42", "   ")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref fields) if fields[0].message == "item_type is required"));
    }

    #[tokio::test]
    async fn delete_requires_a_valid_id() {
        let mut repo = MockWardrobeRepository::new();
        repo.expect_delete_item().never();
        let handler = handler(repo);

        let missing = handler.delete_item(DeleteWardrobeItem { id: None }).await;
        assert!(matches!(missing, Err(AppError::InvalidInput(_))));

        let malformed = handler
            .delete_item(DeleteWardrobeItem { id: Some("42".into()) })
            .await;
        assert!(matches!(malformed, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_still_succeeds() {
        let id = Uuid::new_v4();
        let mut repo = MockWardrobeRepository::new();
        repo.expect_delete_item()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(|_| Ok(0));

        let response = handler(repo)
            .delete_item(DeleteWardrobeItem { id: Some(id.to_string()) })
            .await
            .unwrap();
        assert!(response.success);
    }
}
