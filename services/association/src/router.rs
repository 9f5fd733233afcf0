use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use assoc_core::health::{healthz, readyz};
use assoc_core::middleware::request_id_layer;

use crate::handlers::{
    activities::{
        create_activity, delete_activity, get_activity, list_activities, list_participants,
        update_activity, update_activity_status,
    },
    auth::{
        get_profile, get_user, list_users, login, logout, register, update_profile,
        update_user_role,
    },
    dashboard::{
        activities_with_stats, bulk_update_registration_status, export_participants, stats,
        users_with_stats,
    },
    registrations::{
        cancel_registration, my_registrations, register_for_activity, registration_status,
    },
    upload::upload_image,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/profile", get(get_profile).put(update_profile))
        .route("/api/auth/users", get(list_users))
        .route("/api/auth/users/{id}", get(get_user))
        .route("/api/auth/users/{id}/role", put(update_user_role))
        // Activities
        .route("/api/activities", get(list_activities).post(create_activity))
        .route(
            "/api/activities/{id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route("/api/activities/{id}/status", put(update_activity_status))
        .route("/api/activities/{id}/participants", get(list_participants))
        // Registrations
        .route(
            "/api/registration/activities/{id}/register",
            post(register_for_activity),
        )
        .route(
            "/api/registration/activities/{id}/cancel",
            post(cancel_registration),
        )
        .route("/api/registration/my-registrations", get(my_registrations))
        .route(
            "/api/registration/activities/{id}/status",
            get(registration_status),
        )
        // Dashboard
        .route("/api/dashboard/stats", get(stats))
        .route("/api/dashboard/activities", get(activities_with_stats))
        .route("/api/dashboard/users", get(users_with_stats))
        .route(
            "/api/dashboard/export/participants/{id}",
            get(export_participants),
        )
        .route(
            "/api/dashboard/registrations/update-status",
            post(bulk_update_registration_status),
        )
        // Upload
        .route("/api/upload/image", post(upload_image))
        // Static assets + SPA fallback for client-side routes
        .nest_service("/static", ServeDir::new(&static_dir))
        .fallback_service(ServeFile::new(static_dir.join("index.html")))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
