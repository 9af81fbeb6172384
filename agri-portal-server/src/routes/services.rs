//! Service catalog for the navigation menu

use axum::{extract::State, Json};
use serde::Serialize;

use agri_portal_core::ServiceDescriptor;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServicesResponse {
    pub services: Vec<ServiceDescriptor>,
}

pub async fn list_services(State(state): State<AppState>) -> Json<ServicesResponse> {
    Json(ServicesResponse {
        services: state.catalog.services().to_vec(),
    })
}
