//! Error categories and the numeric code table.
//!
//! Every code lives in the thousand-range of its category (NETWORK = 1xxx,
//! TEXT = 2xxx, ...), so the number alone identifies the category.

use serde::{Serialize, Serializer};
use std::fmt;

/// Failure domain of an [`Error`](super::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum Category {
    /// Errors from the network stack.
    Network = 1,
    /// Errors parsing text streams.
    Text = 2,
    /// Errors parsing or processing audio or video streams.
    Media = 3,
    /// Errors parsing the manifest.
    Manifest = 4,
    /// Errors related to streaming.
    Streaming = 5,
    /// Errors related to DRM.
    Drm = 6,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Network,
        Category::Text,
        Category::Media,
        Category::Manifest,
        Category::Streaming,
        Category::Drm,
    ];

    pub fn value(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Network => "NETWORK",
            Category::Text => "TEXT",
            Category::Media => "MEDIA",
            Category::Manifest => "MANIFEST",
            Category::Streaming => "STREAMING",
            Category::Drm => "DRM",
        }
    }

    /// Case-insensitive lookup by name (e.g. "network").
    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.value())
    }
}

macro_rules! codes {
    ($( $(#[$doc:meta])* $variant:ident = $value:literal, $name:literal, $category:ident; )*) => {
        /// Fine-grained failure code. The discriminant is the public numeric code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Code {
            $( $(#[$doc])* $variant = $value, )*
        }

        impl Code {
            /// Every code in ascending numeric order.
            pub const ALL: &'static [Code] = &[ $( Code::$variant, )* ];

            /// Upper-snake-case name, e.g. `BAD_HTTP_STATUS`.
            pub fn name(self) -> &'static str {
                match self {
                    $( Code::$variant => $name, )*
                }
            }

            pub fn category(self) -> Category {
                match self {
                    $( Code::$variant => Category::$category, )*
                }
            }
        }
    };
}

codes! {
    /// A request used a URI scheme with no registered plugin.
    UnsupportedScheme = 1000, "UNSUPPORTED_SCHEME", Network;
    /// An HTTP request returned a non-2xx status.
    BadHttpStatus = 1001, "BAD_HTTP_STATUS", Network;
    /// An HTTP request failed below the HTTP layer (connect, DNS, reset).
    HttpError = 1002, "HTTP_ERROR", Network;
    /// A request timed out.
    Timeout = 1003, "TIMEOUT", Network;
    /// A data URI could not be parsed.
    MalformedDataUri = 1004, "MALFORMED_DATA_URI", Network;
    /// A data URI declared an encoding other than base64.
    UnknownDataUriEncoding = 1005, "UNKNOWN_DATA_URI_ENCODING", Network;

    InvalidTextHeader = 2000, "INVALID_TEXT_HEADER", Text;
    InvalidTextCue = 2001, "INVALID_TEXT_CUE", Text;
    InvalidTextSettings = 2002, "INVALID_TEXT_SETTINGS", Text;
    /// No byte-order mark and the heuristic could not guess an encoding.
    UnableToDetectEncoding = 2003, "UNABLE_TO_DETECT_ENCODING", Text;
    /// The data is not valid in the encoding it was decoded with.
    BadEncoding = 2004, "BAD_ENCODING", Text;

    BufferReadOutOfBounds = 3000, "BUFFER_READ_OUT_OF_BOUNDS", Media;
    JsIntegerOverflow = 3001, "JS_INTEGER_OVERFLOW", Media;
    EbmlOverflow = 3002, "EBML_OVERFLOW", Media;
    EbmlBadFloatingPointSize = 3003, "EBML_BAD_FLOATING_POINT_SIZE", Media;
    Mp4SidxWrongBoxType = 3004, "MP4_SIDX_WRONG_BOX_TYPE", Media;
    Mp4SidxInvalidTimescale = 3005, "MP4_SIDX_INVALID_TIMESCALE", Media;
    Mp4SidxTypeNotSupported = 3006, "MP4_SIDX_TYPE_NOT_SUPPORTED", Media;
    WebmCuesElementMissing = 3007, "WEBM_CUES_ELEMENT_MISSING", Media;
    WebmEbmlHeaderElementMissing = 3008, "WEBM_EBML_HEADER_ELEMENT_MISSING", Media;
    WebmSegmentElementMissing = 3009, "WEBM_SEGMENT_ELEMENT_MISSING", Media;
    WebmInfoElementMissing = 3010, "WEBM_INFO_ELEMENT_MISSING", Media;
    WebmDurationElementMissing = 3011, "WEBM_DURATION_ELEMENT_MISSING", Media;
    WebmCueTrackPositionsElementMissing = 3012, "WEBM_CUE_TRACK_POSITIONS_ELEMENT_MISSING", Media;
    WebmCueTimeElementMissing = 3013, "WEBM_CUE_TIME_ELEMENT_MISSING", Media;
    MediaSourceOperationFailed = 3014, "MEDIA_SOURCE_OPERATION_FAILED", Media;
    MediaSourceOperationThrew = 3015, "MEDIA_SOURCE_OPERATION_THREW", Media;
    VideoError = 3016, "VIDEO_ERROR", Media;

    UnableToGuessManifestType = 4000, "UNABLE_TO_GUESS_MANIFEST_TYPE", Manifest;
    DashInvalidXml = 4001, "DASH_INVALID_XML", Manifest;
    DashNoSegmentInfo = 4002, "DASH_NO_SEGMENT_INFO", Manifest;
    DashEmptyAdaptationSet = 4003, "DASH_EMPTY_ADAPTATION_SET", Manifest;
    DashEmptyPeriod = 4004, "DASH_EMPTY_PERIOD", Manifest;
    DashWebmMissingInit = 4005, "DASH_WEBM_MISSING_INIT", Manifest;
    DashUnsupportedContainer = 4006, "DASH_UNSUPPORTED_CONTAINER", Manifest;
    DashPsshBadEncoding = 4007, "DASH_PSSH_BAD_ENCODING", Manifest;
    DashNoCommonKeySystem = 4008, "DASH_NO_COMMON_KEY_SYSTEM", Manifest;
    DashMultipleKeyIdsNotSupported = 4009, "DASH_MULTIPLE_KEY_IDS_NOT_SUPPORTED", Manifest;
    DashConflictingKeyIds = 4010, "DASH_CONFLICTING_KEY_IDS", Manifest;
    UnplayablePeriod = 4011, "UNPLAYABLE_PERIOD", Manifest;

    InconsistentBufferState = 5000, "INCONSISTENT_BUFFER_STATE", Streaming;
    InvalidSegmentIndex = 5001, "INVALID_SEGMENT_INDEX", Streaming;
    SegmentDoesNotExist = 5002, "SEGMENT_DOES_NOT_EXIST", Streaming;
    BadSegment = 5004, "BAD_SEGMENT", Streaming;
    InvalidStreamsChosen = 5005, "INVALID_STREAMS_CHOSEN", Streaming;

    NoRecognizedKeySystems = 6000, "NO_RECOGNIZED_KEY_SYSTEMS", Drm;
    RequestedKeySystemsUnavailable = 6001, "REQUESTED_KEY_SYSTEMS_UNAVAILABLE", Drm;
    FailedToCreateCdm = 6002, "FAILED_TO_CREATE_CDM", Drm;
    FailedToAttachToVideo = 6003, "FAILED_TO_ATTACH_TO_VIDEO", Drm;
    InvalidServerCertificate = 6004, "INVALID_SERVER_CERTIFICATE", Drm;
    FailedToCreateSession = 6005, "FAILED_TO_CREATE_SESSION", Drm;
    FailedToGenerateLicenseRequest = 6006, "FAILED_TO_GENERATE_LICENSE_REQUEST", Drm;
    /// The license request failed; wraps the NETWORK error that caused it.
    LicenseRequestFailed = 6007, "LICENSE_REQUEST_FAILED", Drm;
    LicenseResponseRejected = 6008, "LICENSE_RESPONSE_REJECTED", Drm;
    EncryptedContentWithoutDrmInfo = 6010, "ENCRYPTED_CONTENT_WITHOUT_DRM_INFO", Drm;
}

impl Code {
    pub fn value(self) -> u16 {
        self as u16
    }

    pub fn from_value(value: u16) -> Option<Code> {
        Self::ALL.iter().copied().find(|c| c.value() == value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.value())
    }
}
