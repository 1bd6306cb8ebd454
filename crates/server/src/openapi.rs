use std::collections::BTreeMap;

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct PersonDoc {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub hobbies: Vec<String>,
}

#[derive(ToSchema)]
pub struct PersonInputDoc {
    pub name: String,
    /// 0..=120
    pub age: i32,
    pub hobbies: Vec<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct MetadataDoc {
    /// One-based
    pub current_page: u64,
    pub page_size: u64,
    pub first_page: u64,
    pub last_page: u64,
    pub total_records: u64,
}

#[derive(ToSchema)]
pub struct PersonPageDoc {
    pub meta: MetadataDoc,
    pub persons: Vec<PersonDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ErrorDoc {
    pub status_code: u16,
    pub message: String,
    pub detail: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ValidationErrorDoc {
    pub status_code: u16,
    /// Field name -> message
    pub errors: BTreeMap<String, String>,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Persons API", description = "CRUD over an in-memory person store"),
    paths(
        crate::routes::health,
        crate::routes::persons::create,
        crate::routes::persons::get,
        crate::routes::persons::list,
        crate::routes::persons::update,
        crate::routes::persons::delete,
    ),
    components(
        schemas(
            HealthResponse,
            PersonDoc,
            PersonInputDoc,
            MetadataDoc,
            PersonPageDoc,
            ErrorDoc,
            ValidationErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "persons")
    )
)]
pub struct ApiDoc;
