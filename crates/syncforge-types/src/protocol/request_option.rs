use serde::{Deserialize, Serialize};

/// Where a derived value is placed on an outgoing request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestOptionType {
    RequestParameter,
    Header,
    BodyData,
    BodyJson,
}

impl RequestOptionType {
    /// Wire-format string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestParameter => "request_parameter",
            Self::Header => "header",
            Self::BodyData => "body_data",
            Self::BodyJson => "body_json",
        }
    }
}

impl std::fmt::Display for RequestOptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative instruction for injecting a derived value on outgoing requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RequestOption {
    pub inject_into: RequestOptionType,
}

impl RequestOption {
    #[must_use]
    pub fn new(inject_into: RequestOptionType) -> Self {
        Self { inject_into }
    }
}
