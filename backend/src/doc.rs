//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every user, issue and health endpoint together with
//! the request and response bodies. The document backs Swagger UI in debug
//! builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::schemas::{
    IssueBody, IssuePayload, UserBody, UserListItem, UserPayload,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Civic issues API",
        description = "Citizen-reported municipal issues and the users who report and manage them.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::list_user_issues,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::replace_user,
        crate::inbound::http::users::patch_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::issues::list_issues,
        crate::inbound::http::issues::get_issue,
        crate::inbound::http::issues::create_issue,
        crate::inbound::http::issues::patch_issue,
        crate::inbound::http::issues::delete_issue,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserBody,
        UserListItem,
        UserPayload,
        IssueBody,
        IssuePayload,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Citizens and managers"),
        (name = "issues", description = "Reported municipal issues"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_named<'a>(doc: &'a utoipa::openapi::OpenApi, name: &str) -> &'a RefOr<Schema> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        schemas
            .iter()
            .find(|(key, _)| key.rsplit('.').next() == Some(name))
            .map(|(_, schema)| schema)
            .unwrap_or_else(|| panic!("schema {name} should be registered"))
    }

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/users")]
    #[case("/users/{id}")]
    #[case("/users/{id}/issues")]
    #[case("/issues")]
    #[case("/issues/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn error_schema_uses_camel_case_trace_id() {
        let doc = ApiDoc::openapi();
        let error = schema_named(&doc, "Error");
        assert_object_schema_has_field(error, "code");
        assert_object_schema_has_field(error, "message");
        assert_object_schema_has_field(error, "traceId");
    }

    #[rstest]
    fn issue_schema_exposes_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let issue = schema_named(&doc, "IssueBody");
        for field in ["id", "status", "imageUrl", "latitude", "createdAt", "updatedAt", "user"] {
            assert_object_schema_has_field(issue, field);
        }
    }
}
