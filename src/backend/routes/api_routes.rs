/**
 * API Route Handlers
 *
 * This module registers every `/api` endpoint on the router.
 *
 * # Routes
 *
 * ## Authentication (public except `me`)
 * - `POST /api/auth/signup`, `POST /api/auth/login`, `POST /api/auth/logout`
 * - `GET /api/auth/me`
 *
 * ## Users
 * - `GET /api/users/search`, `PATCH /api/users/me`, `GET /api/users/{id}`
 * - `POST|DELETE /api/users/{id}/follow`, `DELETE /api/users/{id}/follower`
 * - `GET /api/users/{id}/followers`, `/following`, `/creations`
 *
 * ## Content
 * - `/api/recipes`, `/api/cookbooks`, `/api/shopping-lists`, `/api/creations`
 *
 * ## Social
 * - `/api/notifications` (including the SSE stream), `/api/families`
 * - `GET /api/search`
 *
 * Every route except signup, login and logout authenticates through the
 * `AuthUser` extractor, so an unauthenticated call fails with 401 before the
 * handler body runs.
 */
use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::backend::auth::{get_me, login, logout, signup};
use crate::backend::realtime::handle_notification_stream;
use crate::backend::server::state::AppState;
use crate::backend::{cookbooks, creations, families, notifications, profiles, recipes, search, shopping};

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(get_me))
        // Profiles and the follow graph
        .route("/api/users/search", get(profiles::search_profiles))
        .route("/api/users/me", patch(profiles::update_profile))
        .route("/api/users/{id}", get(profiles::get_profile))
        .route(
            "/api/users/{id}/follow",
            post(profiles::follow_user).delete(profiles::unfollow_user),
        )
        .route(
            "/api/users/{id}/follower",
            delete(profiles::remove_follower),
        )
        .route("/api/users/{id}/followers", get(profiles::list_followers))
        .route("/api/users/{id}/following", get(profiles::list_following))
        .route("/api/users/{id}/creations", get(creations::list_user_creations))
        // Recipes
        .route(
            "/api/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipes/{id}",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route("/api/recipes/{id}/copy", post(recipes::copy_recipe))
        .route("/api/recipes/{id}/creations", get(recipes::list_recipe_creations))
        // Cookbooks
        .route(
            "/api/cookbooks",
            get(cookbooks::list_cookbooks).post(cookbooks::create_cookbook),
        )
        .route(
            "/api/cookbooks/{id}",
            get(cookbooks::get_cookbook)
                .patch(cookbooks::update_cookbook)
                .delete(cookbooks::delete_cookbook),
        )
        .route("/api/cookbooks/{id}/recipes", post(cookbooks::add_recipe_reference))
        .route(
            "/api/cookbooks/{id}/recipes/{recipe_id}",
            delete(cookbooks::remove_recipe_reference),
        )
        .route("/api/cookbooks/{id}/invite", post(cookbooks::invite_user))
        .route(
            "/api/cookbooks/{id}/invite/{user_id}",
            delete(cookbooks::cancel_invite),
        )
        // Shopping lists
        .route(
            "/api/shopping-lists",
            get(shopping::list_shopping_lists).post(shopping::create_shopping_list),
        )
        .route(
            "/api/shopping-lists/{id}",
            get(shopping::get_shopping_list)
                .patch(shopping::update_shopping_list)
                .delete(shopping::delete_shopping_list),
        )
        .route("/api/shopping-lists/{id}/items", post(shopping::add_item))
        .route(
            "/api/shopping-lists/{id}/items/{item_id}",
            patch(shopping::update_item).delete(shopping::delete_item),
        )
        .route(
            "/api/shopping-lists/{id}/clear-completed",
            post(shopping::clear_completed),
        )
        .route("/api/shopping-lists/{id}/recipes", post(shopping::add_recipe_to_list))
        .route("/api/shopping-lists/{id}/invite", post(shopping::invite_to_list))
        .route(
            "/api/shopping-lists/{id}/invite/{user_id}",
            delete(shopping::cancel_list_invite),
        )
        // Creations, yums and comments
        .route(
            "/api/creations",
            get(creations::list_feed).post(creations::create_creation),
        )
        .route(
            "/api/creations/{id}",
            get(creations::get_creation)
                .patch(creations::update_creation)
                .delete(creations::delete_creation),
        )
        .route("/api/creations/{id}/yum", post(creations::toggle_yum))
        .route("/api/creations/{id}/comments", post(creations::add_comment))
        .route(
            "/api/creations/{id}/comments/{comment_id}",
            patch(creations::update_comment).delete(creations::delete_comment),
        )
        // Notifications
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/unread-count", get(notifications::get_unread_count))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/stream", get(handle_notification_stream))
        .route("/api/notifications/{id}/read", patch(notifications::mark_read))
        .route(
            "/api/notifications/{id}/respond",
            post(notifications::respond_to_notification),
        )
        .route(
            "/api/notifications/{id}",
            delete(notifications::delete_notification),
        )
        // Families
        .route("/api/families", post(families::create_family))
        .route("/api/families/mine", get(families::get_my_family))
        .route("/api/families/join", post(families::join_family_by_code))
        .route("/api/families/leave", post(families::leave_family))
        .route("/api/families/invite", post(families::invite_to_family))
        // Global search
        .route("/api/search", get(search::search))
}
