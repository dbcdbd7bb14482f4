#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod gateway;
pub mod learner_service;
pub mod views;

pub use pathwise_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, GatewayError, LearnerServiceError};
pub use gateway::{Gateway, StorageGateway};
pub use learner_service::{LearnerService, RecordedQuiz};
pub use views::{ViewError, ViewLoader, ViewState};
