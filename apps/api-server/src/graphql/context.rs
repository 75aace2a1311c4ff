use folio_core::ports::Repositories;

use super::loader::Loader;

/// Per-request GraphQL context.
pub struct GraphQLContext {
    pub repos: Repositories,
    pub loader: Loader,
}

impl GraphQLContext {
    pub fn new(repos: Repositories) -> Self {
        Self {
            loader: Loader::new(repos.clone()),
            repos,
        }
    }
}

impl juniper::Context for GraphQLContext {}
