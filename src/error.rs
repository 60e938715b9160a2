use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Unknown order status: {0}")]
    UnknownOrderStatus(String),

    #[error("Unknown payment status: {0}")]
    UnknownPaymentStatus(String),

    #[error("Unknown courier: {0}")]
    UnknownCourier(String),

    #[error("Invalid ads tax rate {0}: must be a finite, non-negative percentage")]
    InvalidTaxRate(f64),

    #[error("Order {order_id}: field {field} is negative ({value})")]
    NegativeAmount {
        order_id: String,
        field: &'static str,
        value: f64,
    },

    #[error("Order {order_id}: item quantity must be at least 1")]
    ZeroQuantity { order_id: String },

    #[error("Date parse error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "ads-client")]
    #[error("Ad platform session expired for account {account}: re-authentication required")]
    SessionExpired { account: String },

    #[cfg(feature = "ads-client")]
    #[error("Ad platform denied access for account {account}: insufficient permissions")]
    PermissionDenied { account: String },

    #[cfg(feature = "ads-client")]
    #[error("Ad platform request failed: {0}")]
    AdPlatform(String),

    #[cfg(feature = "ads-client")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
