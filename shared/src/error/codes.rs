//! Unified error codes for the marketplace backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Store / feed sync errors
//! - 4xxx: Order errors
//! - 5xxx: Catalog errors
//! - 6xxx: Profile errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Email is already registered
    EmailAlreadyRegistered = 1005,
    /// Unknown user role
    InvalidRole = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Actor does not own the resource being accessed
    NotResourceOwner = 2004,

    // ==================== 3xxx: Store / Feed Sync ====================
    /// Store not found
    StoreNotFound = 3001,
    /// Store lacks API connection info for synchronization
    StoreNotSyncable = 3002,
    /// External product feed could not be fetched
    FeedFetchFailed = 3003,
    /// Store name already exists
    StoreNameExists = 3004,
    /// Catalog write failed mid-sync; sync aborted
    SyncWriteFailed = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Status transition not allowed from the current status
    InvalidStatusTransition = 4002,
    /// Order has no items
    OrderEmpty = 4003,
    /// Line item is unavailable at its store
    ItemUnavailable = 4004,
    /// Unknown order status value
    UnknownStatus = 4005,
    /// Invalid payment method
    PaymentMethodInvalid = 4006,

    // ==================== 5xxx: Catalog ====================
    /// Canonical product not found
    ProductNotFound = 5001,
    /// Store offering not found
    OfferingNotFound = 5002,
    /// Offering already exists for this (store, product) pair
    OfferingExists = 5003,

    // ==================== 6xxx: Profile ====================
    /// Customer profile not found
    CustomerNotFound = 6001,
    /// Driver profile not found
    DriverNotFound = 6002,
    /// User account not found
    UserNotFound = 6003,
    /// Invalid coordinates (expected [longitude, latitude])
    InvalidCoordinates = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Mail delivery failed
    MailerError = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::InvalidRole => "Unknown user role",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::NotResourceOwner => "Not authorized to access this resource",

            // Store / Sync
            ErrorCode::StoreNotFound => "Store not found",
            ErrorCode::StoreNotSyncable => {
                "Store is not configured with API details for synchronization"
            }
            ErrorCode::FeedFetchFailed => "Could not fetch products from the store feed",
            ErrorCode::StoreNameExists => "Store name already exists",
            ErrorCode::SyncWriteFailed => "Catalog write failed during synchronization",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidStatusTransition => "Invalid order status transition",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::ItemUnavailable => "Item is not available at this store",
            ErrorCode::UnknownStatus => "Unknown order status",
            ErrorCode::PaymentMethodInvalid => "Invalid payment method",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::OfferingNotFound => "Store product offering not found",
            ErrorCode::OfferingExists => "Offering already exists for this store and product",

            // Profile
            ErrorCode::CustomerNotFound => "Customer profile not found",
            ErrorCode::DriverNotFound => "Driver profile not found",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::InvalidCoordinates => {
                "Invalid coordinates format. Expected [longitude, latitude]"
            }

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::MailerError => "Mail delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::EmailAlreadyRegistered),
            1006 => Ok(ErrorCode::InvalidRole),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::NotResourceOwner),

            // Store / Sync
            3001 => Ok(ErrorCode::StoreNotFound),
            3002 => Ok(ErrorCode::StoreNotSyncable),
            3003 => Ok(ErrorCode::FeedFetchFailed),
            3004 => Ok(ErrorCode::StoreNameExists),
            3005 => Ok(ErrorCode::SyncWriteFailed),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidStatusTransition),
            4003 => Ok(ErrorCode::OrderEmpty),
            4004 => Ok(ErrorCode::ItemUnavailable),
            4005 => Ok(ErrorCode::UnknownStatus),
            4006 => Ok(ErrorCode::PaymentMethodInvalid),

            // Catalog
            5001 => Ok(ErrorCode::ProductNotFound),
            5002 => Ok(ErrorCode::OfferingNotFound),
            5003 => Ok(ErrorCode::OfferingExists),

            // Profile
            6001 => Ok(ErrorCode::CustomerNotFound),
            6002 => Ok(ErrorCode::DriverNotFound),
            6003 => Ok(ErrorCode::UserNotFound),
            6004 => Ok(ErrorCode::InvalidCoordinates),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::MailerError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::StoreNotSyncable.code(), 3002);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 4002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::StoreNotSyncable,
            ErrorCode::FeedFetchFailed,
            ErrorCode::InvalidStatusTransition,
            ErrorCode::OfferingNotFound,
            ErrorCode::DriverNotFound,
            ErrorCode::DatabaseError,
        ] {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(777), Err(InvalidErrorCode(777)));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("3003").unwrap();
        assert_eq!(code, ErrorCode::FeedFetchFailed);
    }
}
