use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListCategoriesCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListCategoriesCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ListCategoriesCommandRequest {}

// serialized as a plain JSON array of category names
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub(crate) struct ListCategoriesCommandResponse {
    pub categories: Vec<String>,
}

#[async_trait]
impl Command<ListCategoriesCommandRequest, ListCategoriesCommandResponse> for ListCategoriesCommand {
    async fn execute(&self, _req: ListCategoriesCommandRequest) -> Result<ListCategoriesCommandResponse, CommandError> {
        self.catalog_service.distinct_categories().await
            .map_err(CommandError::from).map(|categories| ListCategoriesCommandResponse { categories })
    }
}

#[cfg(test)]
mod tests {
    use crate::books::dto::BookDto;
    use crate::catalog::command::list_categories_cmd::{ListCategoriesCommand, ListCategoriesCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::Command;
    use crate::core::domain::Configuration;

    #[tokio::test]
    async fn test_should_run_list_categories() {
        let svc = factory::create_catalog_service(&Configuration::in_memory("test")).await.expect("should create catalog");
        for category in ["Travel", "Fiction", "Travel", "Art"] {
            svc.add_book(&BookDto::new("t", "a", "p", category, "i", 1, 1.0)).await.expect("should add book");
        }
        let cmd = ListCategoriesCommand::new(svc);
        let res = cmd.execute(ListCategoriesCommandRequest::default()).await.expect("should list categories");
        assert_eq!(vec!["Art", "Fiction", "Travel"], res.categories);
        assert_eq!(serde_json::json!(["Art", "Fiction", "Travel"]), serde_json::to_value(&res).expect("should serialize"));
    }
}
