use axum::{routing::{get, patch, post, put}, Router};
use std::sync::Arc;

use crate::handler::user_handler::{
    get_file_count_handler,
    increment_file_count_handler,
    list_team_users_handler,
    list_users_handler,
    login_handler,
    register_handler,
    set_status_handler,
    update_profile_handler,
    UserState,
};

pub fn user_router(state: Arc<UserState>) -> Router {
    Router::new()
        .route("/users", post(register_handler).get(list_users_handler))
        .route("/login", post(login_handler))
        .route("/users/profile", put(update_profile_handler))
        .route("/users/{email}/status", patch(set_status_handler))
        .route(
            "/users/{email}/fileCount",
            patch(increment_file_count_handler).get(get_file_count_handler),
        )
        .route("/teams/{team_name}/users", get(list_team_users_handler))
        .with_state(state)
}
