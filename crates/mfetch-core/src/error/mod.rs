//! Uniform failure value shared by every layer.
//!
//! An [`Error`] is one variant per [`Code`]; each variant carries the
//! diagnostic fields documented for that code. [`Error::category`] and
//! [`Error::code`] are what callers branch on. [`Error::data`] gives the
//! positional view of the fields, used for logs and the JSON dump.

mod code;
mod data;

pub use code::{Category, Code};
pub use data::ErrorData;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Result alias for fetch and decode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A categorized failure. Created where the failure is first detected and
/// passed up by value; never mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    // NETWORK
    UnsupportedScheme { uri: String },
    BadHttpStatus { uri: String, status: u16 },
    HttpError { uri: String },
    Timeout { uri: String },
    MalformedDataUri { uri: String },
    UnknownDataUriEncoding { uri: String },

    // TEXT
    InvalidTextHeader,
    InvalidTextCue,
    InvalidTextSettings,
    UnableToDetectEncoding,
    BadEncoding,

    // MEDIA
    BufferReadOutOfBounds,
    JsIntegerOverflow,
    EbmlOverflow,
    EbmlBadFloatingPointSize,
    Mp4SidxWrongBoxType,
    Mp4SidxInvalidTimescale,
    Mp4SidxTypeNotSupported,
    WebmCuesElementMissing,
    WebmEbmlHeaderElementMissing,
    WebmSegmentElementMissing,
    WebmInfoElementMissing,
    WebmDurationElementMissing,
    WebmCueTrackPositionsElementMissing,
    WebmCueTimeElementMissing,
    /// `media_error_code` is the MediaError code reported by the media element.
    MediaSourceOperationFailed { media_error_code: i64 },
    MediaSourceOperationThrew { exception: String },
    /// `extended_code` is a platform-specific extended code in hex, when available.
    VideoError {
        media_error_code: i64,
        extended_code: Option<String>,
    },

    // MANIFEST
    UnableToGuessManifestType { uri: String },
    DashInvalidXml,
    DashNoSegmentInfo,
    DashEmptyAdaptationSet,
    DashEmptyPeriod,
    DashWebmMissingInit,
    DashUnsupportedContainer,
    DashPsshBadEncoding,
    DashNoCommonKeySystem,
    DashMultipleKeyIdsNotSupported,
    DashConflictingKeyIds,
    UnplayablePeriod,

    // STREAMING
    InconsistentBufferState { content_type: String },
    InvalidSegmentIndex {
        content_type: String,
        period_index: i64,
        position: i64,
    },
    SegmentDoesNotExist {
        content_type: String,
        period_index: i64,
        timestamp: f64,
    },
    BadSegment { content_type: String },
    InvalidStreamsChosen,

    // DRM
    NoRecognizedKeySystems,
    RequestedKeySystemsUnavailable,
    FailedToCreateCdm { message: String },
    FailedToAttachToVideo { message: String },
    InvalidServerCertificate { message: String },
    FailedToCreateSession { message: String },
    FailedToGenerateLicenseRequest { message: String },
    LicenseRequestFailed {
        #[source]
        cause: Box<Error>,
    },
    LicenseResponseRejected { message: String },
    EncryptedContentWithoutDrmInfo,
}

impl Error {
    pub fn code(&self) -> Code {
        match self {
            Error::UnsupportedScheme { .. } => Code::UnsupportedScheme,
            Error::BadHttpStatus { .. } => Code::BadHttpStatus,
            Error::HttpError { .. } => Code::HttpError,
            Error::Timeout { .. } => Code::Timeout,
            Error::MalformedDataUri { .. } => Code::MalformedDataUri,
            Error::UnknownDataUriEncoding { .. } => Code::UnknownDataUriEncoding,
            Error::InvalidTextHeader => Code::InvalidTextHeader,
            Error::InvalidTextCue => Code::InvalidTextCue,
            Error::InvalidTextSettings => Code::InvalidTextSettings,
            Error::UnableToDetectEncoding => Code::UnableToDetectEncoding,
            Error::BadEncoding => Code::BadEncoding,
            Error::BufferReadOutOfBounds => Code::BufferReadOutOfBounds,
            Error::JsIntegerOverflow => Code::JsIntegerOverflow,
            Error::EbmlOverflow => Code::EbmlOverflow,
            Error::EbmlBadFloatingPointSize => Code::EbmlBadFloatingPointSize,
            Error::Mp4SidxWrongBoxType => Code::Mp4SidxWrongBoxType,
            Error::Mp4SidxInvalidTimescale => Code::Mp4SidxInvalidTimescale,
            Error::Mp4SidxTypeNotSupported => Code::Mp4SidxTypeNotSupported,
            Error::WebmCuesElementMissing => Code::WebmCuesElementMissing,
            Error::WebmEbmlHeaderElementMissing => Code::WebmEbmlHeaderElementMissing,
            Error::WebmSegmentElementMissing => Code::WebmSegmentElementMissing,
            Error::WebmInfoElementMissing => Code::WebmInfoElementMissing,
            Error::WebmDurationElementMissing => Code::WebmDurationElementMissing,
            Error::WebmCueTrackPositionsElementMissing => {
                Code::WebmCueTrackPositionsElementMissing
            }
            Error::WebmCueTimeElementMissing => Code::WebmCueTimeElementMissing,
            Error::MediaSourceOperationFailed { .. } => Code::MediaSourceOperationFailed,
            Error::MediaSourceOperationThrew { .. } => Code::MediaSourceOperationThrew,
            Error::VideoError { .. } => Code::VideoError,
            Error::UnableToGuessManifestType { .. } => Code::UnableToGuessManifestType,
            Error::DashInvalidXml => Code::DashInvalidXml,
            Error::DashNoSegmentInfo => Code::DashNoSegmentInfo,
            Error::DashEmptyAdaptationSet => Code::DashEmptyAdaptationSet,
            Error::DashEmptyPeriod => Code::DashEmptyPeriod,
            Error::DashWebmMissingInit => Code::DashWebmMissingInit,
            Error::DashUnsupportedContainer => Code::DashUnsupportedContainer,
            Error::DashPsshBadEncoding => Code::DashPsshBadEncoding,
            Error::DashNoCommonKeySystem => Code::DashNoCommonKeySystem,
            Error::DashMultipleKeyIdsNotSupported => Code::DashMultipleKeyIdsNotSupported,
            Error::DashConflictingKeyIds => Code::DashConflictingKeyIds,
            Error::UnplayablePeriod => Code::UnplayablePeriod,
            Error::InconsistentBufferState { .. } => Code::InconsistentBufferState,
            Error::InvalidSegmentIndex { .. } => Code::InvalidSegmentIndex,
            Error::SegmentDoesNotExist { .. } => Code::SegmentDoesNotExist,
            Error::BadSegment { .. } => Code::BadSegment,
            Error::InvalidStreamsChosen => Code::InvalidStreamsChosen,
            Error::NoRecognizedKeySystems => Code::NoRecognizedKeySystems,
            Error::RequestedKeySystemsUnavailable => Code::RequestedKeySystemsUnavailable,
            Error::FailedToCreateCdm { .. } => Code::FailedToCreateCdm,
            Error::FailedToAttachToVideo { .. } => Code::FailedToAttachToVideo,
            Error::InvalidServerCertificate { .. } => Code::InvalidServerCertificate,
            Error::FailedToCreateSession { .. } => Code::FailedToCreateSession,
            Error::FailedToGenerateLicenseRequest { .. } => {
                Code::FailedToGenerateLicenseRequest
            }
            Error::LicenseRequestFailed { .. } => Code::LicenseRequestFailed,
            Error::LicenseResponseRejected { .. } => Code::LicenseResponseRejected,
            Error::EncryptedContentWithoutDrmInfo => Code::EncryptedContentWithoutDrmInfo,
        }
    }

    pub fn category(&self) -> Category {
        self.code().category()
    }

    /// Positional diagnostic values, in the order documented for the code.
    pub fn data(&self) -> Vec<ErrorData> {
        match self {
            Error::UnsupportedScheme { uri }
            | Error::HttpError { uri }
            | Error::Timeout { uri }
            | Error::MalformedDataUri { uri }
            | Error::UnknownDataUriEncoding { uri }
            | Error::UnableToGuessManifestType { uri } => vec![uri.into()],
            Error::BadHttpStatus { uri, status } => vec![uri.into(), (*status).into()],
            Error::MediaSourceOperationFailed { media_error_code } => {
                vec![(*media_error_code).into()]
            }
            Error::MediaSourceOperationThrew { exception } => vec![exception.into()],
            Error::VideoError {
                media_error_code,
                extended_code,
            } => {
                let mut data = vec![(*media_error_code).into()];
                if let Some(ext) = extended_code {
                    data.push(ext.into());
                }
                data
            }
            Error::InconsistentBufferState { content_type }
            | Error::BadSegment { content_type } => vec![content_type.into()],
            Error::InvalidSegmentIndex {
                content_type,
                period_index,
                position,
            } => vec![
                content_type.into(),
                (*period_index).into(),
                (*position).into(),
            ],
            Error::SegmentDoesNotExist {
                content_type,
                period_index,
                timestamp,
            } => vec![
                content_type.into(),
                (*period_index).into(),
                (*timestamp).into(),
            ],
            Error::FailedToCreateCdm { message }
            | Error::FailedToAttachToVideo { message }
            | Error::InvalidServerCertificate { message }
            | Error::FailedToCreateSession { message }
            | Error::FailedToGenerateLicenseRequest { message }
            | Error::LicenseResponseRejected { message } => vec![message.into()],
            Error::LicenseRequestFailed { cause } => vec![ErrorData::Error(cause.clone())],
            _ => Vec::new(),
        }
    }

    /// URI the failure refers to, for the codes that carry one.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Error::UnsupportedScheme { uri }
            | Error::BadHttpStatus { uri, .. }
            | Error::HttpError { uri }
            | Error::Timeout { uri }
            | Error::MalformedDataUri { uri }
            | Error::UnknownDataUriEncoding { uri }
            | Error::UnableToGuessManifestType { uri } => Some(uri),
            _ => None,
        }
    }

    /// Wrap a network failure of a license exchange.
    pub fn license_request_failed(cause: Error) -> Error {
        Error::LicenseRequestFailed {
            cause: Box::new(cause),
        }
    }

    /// True for failures worth another attempt: NETWORK errors other than
    /// the local, configuration-type ones.
    pub fn is_retryable(&self) -> bool {
        self.category() == Category::Network
            && !matches!(
                self.code(),
                Code::UnsupportedScheme | Code::MalformedDataUri | Code::UnknownDataUriEncoding
            )
    }

    /// JSON dump of category, code and data, e.g.
    /// `{"category":1,"code":1001,"data":["https://a/b",404]}`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code();
        write!(f, "Error {}.{} (", code.category().name(), code.name())?;
        for (i, value) in self.data().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str(")")
    }
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Error", 3)?;
        s.serialize_field("category", &self.category())?;
        s.serialize_field("code", &self.code())?;
        s.serialize_field("data", &self.data())?;
        s.end()
    }
}
