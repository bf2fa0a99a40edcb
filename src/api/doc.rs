use utoipa::OpenApi;

pub const HEALTH_TAG: &str = "Health";
pub const MESSAGE_TAG: &str = "Messages";
pub const DISPATCH_TAG: &str = "Dispatches";
pub const PLATFORM_TAG: &str = "Platforms";
pub const NOTIFICATION_TAG: &str = "Notifications";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Courier",
        description = "Delayed webhook dispatch to Slack and Discord",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
            crate::external::webhook::Platform,
            crate::models::DelayUnit,
            crate::models::DispatchOutcome,
            crate::models::NotificationEvent,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = MESSAGE_TAG, description = "Immediate message delivery"),
        (name = DISPATCH_TAG, description = "Delayed submissions and validation"),
        (name = PLATFORM_TAG, description = "Supported webhook platforms"),
        (name = NOTIFICATION_TAG, description = "Outcome notifications"),
    )
)]
pub struct ApiDoc;
