//! OpenAPI schema aggregation for the user API.
use crate::api::{
    system, token,
    types::{
        ErrorResponse, HealthStatus, TokenRequest, TokenResponse, UserCreateRequest,
        UserUpdateRequest,
    },
    users,
};
use crate::model::{User, UserProfile};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "usergate-userapi",
        version = "v1",
        description = "User management API behind a role-based request gate"
    ),
    paths(
        system::system_health,
        token::issue_token,
        users::get_me,
        users::delete_me,
        users::create_user,
        users::update_user
    ),
    components(schemas(
        ErrorResponse,
        HealthStatus,
        TokenRequest,
        TokenResponse,
        UserCreateRequest,
        UserUpdateRequest,
        User,
        UserProfile
    )),
    tags(
        (name = "system", description = "Health endpoints"),
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "User registration and self-service")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::policy::GATED_ROUTES;
    use std::collections::BTreeSet;
    use usergate_acl::Verb;
    use utoipa::openapi::PathItemType;

    fn verb_of(kind: &PathItemType) -> Verb {
        match kind {
            PathItemType::Get => Verb::Get,
            PathItemType::Head => Verb::Head,
            PathItemType::Post => Verb::Post,
            PathItemType::Put => Verb::Put,
            PathItemType::Patch => Verb::Patch,
            PathItemType::Delete => Verb::Delete,
            PathItemType::Options => Verb::Options,
            PathItemType::Connect => Verb::Connect,
            PathItemType::Trace => Verb::Trace,
        }
    }

    #[test]
    fn document_lists_every_gated_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/system/health",
            "/api/v1/token",
            "/api/v1/users",
            "/api/v1/users/me",
            "/api/v1/users/{userId}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn documented_operations_match_gated_routes() {
        let doc = ApiDoc::openapi();
        let documented: BTreeSet<(String, String)> = doc
            .paths
            .paths
            .iter()
            .flat_map(|(path, item)| {
                let pattern = path.replace('{', ":").replace('}', "");
                item.operations
                    .keys()
                    .map(move |kind| (pattern.clone(), verb_of(kind).to_string()))
            })
            .collect();
        let gated: BTreeSet<(String, String)> = GATED_ROUTES
            .iter()
            .map(|(pattern, verb)| (pattern.to_string(), verb.to_string()))
            .collect();
        assert_eq!(documented, gated);
    }
}
