//! Builds the handler state from the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use collab_backend::domain::ports::{PasswordHasher, ProjectRepository, UserRepository};
use collab_backend::domain::{AccountService, ProjectService};
use collab_backend::inbound::http::state::{HttpState, HttpStatePorts};
use collab_backend::outbound::persistence::{DieselProjectRepository, DieselUserRepository};
use collab_backend::outbound::{Argon2PasswordHasher, InMemoryStore};

use super::config::Store;

fn assemble<P, U, H>(projects: Arc<P>, users: Arc<U>, hasher: Arc<H>) -> HttpState
where
    P: ProjectRepository + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    let project_service = Arc::new(ProjectService::new(projects, users.clone()));
    let account_service = Arc::new(AccountService::new(users, hasher));
    HttpState::new(HttpStatePorts {
        projects: project_service.clone(),
        projects_query: project_service,
        login: account_service.clone(),
        registration: account_service.clone(),
        users: account_service.clone(),
        profile: account_service,
    })
}

/// Wire both services to the chosen store with Argon2 password hashing.
pub(crate) fn build_http_state(store: &Store) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher);
    let state = match store {
        Store::Postgres(pool) => assemble(
            Arc::new(DieselProjectRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
            hasher,
        ),
        Store::Memory => {
            info!("no database configured; using in-memory store");
            let memory = Arc::new(InMemoryStore::new(Arc::new(DefaultClock)));
            assemble(memory.clone(), memory, hasher)
        }
    };
    web::Data::new(state)
}
