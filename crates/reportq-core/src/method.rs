use std::fmt::{Display, Formatter};

/// Remote method selected through the `method` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Queue,
    Get,
}

impl ApiMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "Report.Queue",
            Self::Get => "Report.Get",
        }
    }

    /// Build the request URL for this method against `endpoint`.
    ///
    /// The endpoint may already carry a query string, in which case the
    /// method is appended as an extra parameter.
    pub fn url(self, endpoint: &str) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{endpoint}{separator}method={}",
            urlencoding::encode(self.as_str())
        )
    }
}

impl Display for ApiMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
