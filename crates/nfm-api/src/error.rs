//! NFM error types and status handling.
//!
//! SDK calls return a 32-bit value whose high half is a status code and
//! whose low half is a call-specific subcode. This module converts those
//! values into Rust's Result type and back.

use nfm_types::DeviceId;
use std::fmt;
use thiserror::Error;

/// NFM status codes.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NfmStatus {
    Success = 0,
    Failure = 1,
    InvalidParameter = 2,
    NotFound = 3,
    AlreadyExists = 4,
    NoDevice = 5,
    PermissionDenied = 6,
    HardwareFault = 7,
    Timeout = 8,
    RetryLater = 9,
    NoMemory = 10,
    NotSupported = 11,
    Uninitialized = 12,
    TableFull = 13,
}

impl NfmStatus {
    /// Creates a status from the code half of a raw return value.
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => NfmStatus::Success,
            2 => NfmStatus::InvalidParameter,
            3 => NfmStatus::NotFound,
            4 => NfmStatus::AlreadyExists,
            5 => NfmStatus::NoDevice,
            6 => NfmStatus::PermissionDenied,
            7 => NfmStatus::HardwareFault,
            8 => NfmStatus::Timeout,
            9 => NfmStatus::RetryLater,
            10 => NfmStatus::NoMemory,
            11 => NfmStatus::NotSupported,
            12 => NfmStatus::Uninitialized,
            13 => NfmStatus::TableFull,
            _ => NfmStatus::Failure,
        }
    }

    /// Returns the numeric status code.
    pub fn code(&self) -> u16 {
        *self as u16
    }

    pub fn is_success(&self) -> bool {
        *self == NfmStatus::Success
    }

    /// SDK constant name of this status.
    pub fn name(&self) -> &'static str {
        match self {
            NfmStatus::Success => "NS_NFM_SUCCESS",
            NfmStatus::Failure => "NS_NFM_FAILURE",
            NfmStatus::InvalidParameter => "NS_NFM_INVALID_PARAMETER",
            NfmStatus::NotFound => "NS_NFM_NOT_FOUND",
            NfmStatus::AlreadyExists => "NS_NFM_ALREADY_EXISTS",
            NfmStatus::NoDevice => "NS_NFM_NO_DEVICE",
            NfmStatus::PermissionDenied => "NS_NFM_PERMISSION_DENIED",
            NfmStatus::HardwareFault => "NS_NFM_HARDWARE_FAULT",
            NfmStatus::Timeout => "NS_NFM_TIMEOUT",
            NfmStatus::RetryLater => "NS_NFM_RETRY_LATER",
            NfmStatus::NoMemory => "NS_NFM_NO_MEMORY",
            NfmStatus::NotSupported => "NS_NFM_NOT_SUPPORTED",
            NfmStatus::Uninitialized => "NS_NFM_UNINITIALIZED",
            NfmStatus::TableFull => "NS_NFM_TABLE_FULL",
        }
    }

    /// Human readable description, as printed by the tools.
    pub fn description(&self) -> &'static str {
        match self {
            NfmStatus::Success => "success",
            NfmStatus::Failure => "general failure",
            NfmStatus::InvalidParameter => "invalid parameter",
            NfmStatus::NotFound => "item not found",
            NfmStatus::AlreadyExists => "item already exists",
            NfmStatus::NoDevice => "no such device",
            NfmStatus::PermissionDenied => "permission denied",
            NfmStatus::HardwareFault => "hardware fault",
            NfmStatus::Timeout => "operation timed out",
            NfmStatus::RetryLater => "resource busy, retry later",
            NfmStatus::NoMemory => "out of memory",
            NfmStatus::NotSupported => "operation not supported",
            NfmStatus::Uninitialized => "subsystem not initialized",
            NfmStatus::TableFull => "table full",
        }
    }
}

impl fmt::Display for NfmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error type for NFM operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NfmError {
    /// The SDK returned an error status.
    #[error("{status} (subcode {subcode}): {}", .status.description())]
    Status { status: NfmStatus, subcode: u16 },

    /// The addressed device is not installed.
    #[error("NS_NFM_NO_DEVICE: device {device} not present")]
    NoDevice { device: DeviceId },

    /// Invalid parameter passed to the SDK.
    #[error("NS_NFM_INVALID_PARAMETER: {message}")]
    InvalidParameter { message: String },

    /// The requested item was not found.
    #[error("NS_NFM_NOT_FOUND: {item}")]
    NotFound { item: String },

    /// The subsystem has not been opened or set up.
    #[error("NS_NFM_UNINITIALIZED: {what}")]
    Uninitialized { what: String },

    /// Internal error.
    #[error("NS_NFM_FAILURE: {message}")]
    Internal { message: String },
}

impl NfmError {
    /// Creates an error from a status and subcode.
    pub fn from_status(status: NfmStatus, subcode: u16) -> Self {
        NfmError::Status { status, subcode }
    }

    /// Decodes a raw 32-bit SDK return value. Returns `None` on success.
    pub fn from_raw(raw: u32) -> Option<Self> {
        let code = (raw >> 16) as u16;
        let subcode = (raw & 0xffff) as u16;
        match NfmStatus::from_code(code) {
            NfmStatus::Success => None,
            status => Some(NfmError::from_status(status, subcode)),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        NfmError::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn not_found(item: impl Into<String>) -> Self {
        NfmError::NotFound { item: item.into() }
    }

    pub fn uninitialized(what: impl Into<String>) -> Self {
        NfmError::Uninitialized { what: what.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        NfmError::Internal {
            message: message.into(),
        }
    }

    /// Returns the status code carried by this error.
    pub fn status(&self) -> NfmStatus {
        match self {
            NfmError::Status { status, .. } => *status,
            NfmError::NoDevice { .. } => NfmStatus::NoDevice,
            NfmError::InvalidParameter { .. } => NfmStatus::InvalidParameter,
            NfmError::NotFound { .. } => NfmStatus::NotFound,
            NfmError::Uninitialized { .. } => NfmStatus::Uninitialized,
            NfmError::Internal { .. } => NfmStatus::Failure,
        }
    }

    /// Returns the call-specific subcode, 0 when the SDK gave none.
    pub fn subcode(&self) -> u16 {
        match self {
            NfmError::Status { subcode, .. } => *subcode,
            _ => 0,
        }
    }

    /// Encodes this error as a raw 32-bit SDK return value.
    pub fn raw(&self) -> u32 {
        (u32::from(self.status().code()) << 16) | u32::from(self.subcode())
    }
}

/// Result type for NFM operations.
pub type NfmResult<T> = Result<T, NfmError>;
