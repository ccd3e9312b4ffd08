/// Use cases module containing application business logic orchestration
mod transform_model;

pub use transform_model::TransformModelUseCase;
