// ABOUTME: Validated domain types shared across pipeline stages.
// ABOUTME: Resource names, image tags and targets, and the discovered endpoint.

mod endpoint;
mod image_target;
mod resource_name;

pub use endpoint::ServiceEndpoint;
pub use image_target::{IMAGE_NAME, ImageTag, ImageTagError, ImageTarget, REGISTRY};
pub use resource_name::{ResourceName, ResourceNameError};
