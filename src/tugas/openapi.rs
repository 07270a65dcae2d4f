use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::tugas::{
    error::ApiMessage,
    handlers::{health, lists, user_login, user_register, users},
    store::{PublicUser, TodoList, User},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        user_register::register,
        user_login::login,
        users::list_users,
        lists::create_list,
        lists::get_all_lists,
        lists::get_list_by_id,
        lists::update_list,
        lists::delete_list,
    ),
    components(schemas(
        User,
        PublicUser,
        TodoList,
        ApiMessage,
        user_register::RegisterRequest,
        user_register::AuthResponse,
        user_login::LoginRequest,
        lists::ListRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "User authentication"),
        (name = "lists", description = "List (ToDo) management"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document() {
        let doc = ApiDoc::openapi();

        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/auth/register"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/lists/{id}"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearerAuth"));
    }
}
