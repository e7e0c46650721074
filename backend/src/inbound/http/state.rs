//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see domain ports, so they
//! can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, ProjectCommand, ProjectQuery, UserProfileQuery, UserRegistration, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub projects: Arc<dyn ProjectCommand>,
    pub projects_query: Arc<dyn ProjectQuery>,
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn UserRegistration>,
    pub users: Arc<dyn UsersQuery>,
    pub profile: Arc<dyn UserProfileQuery>,
}

/// Parameter object for [`HttpState::new`].
pub struct HttpStatePorts {
    pub projects: Arc<dyn ProjectCommand>,
    pub projects_query: Arc<dyn ProjectQuery>,
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn UserRegistration>,
    pub users: Arc<dyn UsersQuery>,
    pub profile: Arc<dyn UserProfileQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use collab_backend::domain::{AccountService, ProjectService};
    /// use collab_backend::domain::ports::FixturePasswordHasher;
    /// use collab_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use collab_backend::outbound::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new(Arc::new(DefaultClock)));
    /// let projects = Arc::new(ProjectService::new(store.clone(), store.clone()));
    /// let accounts = Arc::new(AccountService::new(store, Arc::new(FixturePasswordHasher)));
    /// let state = HttpState::new(HttpStatePorts {
    ///     projects: projects.clone(),
    ///     projects_query: projects,
    ///     login: accounts.clone(),
    ///     registration: accounts.clone(),
    ///     users: accounts.clone(),
    ///     profile: accounts,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            projects,
            projects_query,
            login,
            registration,
            users,
            profile,
        } = ports;
        Self {
            projects,
            projects_query,
            login,
            registration,
            users,
            profile,
        }
    }
}
