//! Usecase facade consumed by CLI commands.
//!
//! Commands never talk to collaborators directly; they call
//! [`ModelUsecases`] and [`ChatUsecases`], whose concrete implementations are
//! composed from [`Services`].

mod chat;
mod error;
mod models;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use chat::{ChatDependencies, ChatSession, ChatUsecases, LocalChatUsecases};
pub use error::UsecaseError;
pub use models::{LocalModelUsecases, ModelUsecases};

use crate::{platform::Platform, services::Services};

/// The usecases bound into the command registry
#[derive(Clone)]
pub struct Usecases {
    /// Model lifecycle
    pub models: Arc<dyn ModelUsecases>,
    /// Chat sessions
    pub chat: Arc<dyn ChatUsecases>,
}

impl Usecases {
    /// Composes the local usecases from the shared services
    pub fn from_services(services: &Services) -> Self {
        let models = LocalModelUsecases::new(
            services.models.clone(),
            services.downloads.clone(),
            services.extensions.clone(),
            services.events.clone(),
        );

        let chat = LocalChatUsecases::new(
            Platform::current(),
            services.config.runtime.clone(),
            ChatDependencies {
                models: services.models.clone(),
                downloads: services.downloads.clone(),
                extensions: services.extensions.clone(),
                backend: services.chat_backend.clone(),
                events: services.events.clone(),
            },
        );

        Self {
            models: Arc::new(models),
            chat: Arc::new(chat),
        }
    }
}
