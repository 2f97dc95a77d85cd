use super::models::CaptureSession;
use super::ReplayOutcome;
use serde_json::Value;
use std::fmt;

const RULE_WIDTH: usize = 60;
const BODY_PREVIEW_CHARS: usize = 500;

/// Dump of everything the browser run captured.
pub struct CaptureDump<'a> {
    pub session: &'a CaptureSession,
    pub target: &'a str,
}

impl fmt::Display for CaptureDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        let session = self.session;
        writeln!(f, "\n{rule}\nCAPTURED DATA FROM {}\n{rule}", self.target)?;

        match &session.search_request {
            Some(request) => {
                writeln!(f, "\nTARGET SEARCH API REQUEST:")?;
                writeln!(f, "  URL: {}", request.url)?;
                writeln!(f, "  Method: {}", request.method)?;
                writeln!(f, "  Headers ({} total):", request.headers.len())?;
                for (key, value) in &request.headers {
                    writeln!(f, "    {key}: {value}")?;
                }
                if let Some(data) = &request.post_data {
                    writeln!(f, "\n  POST Data:")?;
                    let pretty = serde_json::from_str::<Value>(data)
                        .ok()
                        .and_then(|v| serde_json::to_string_pretty(&v).ok());
                    match pretty {
                        Some(json) => {
                            for line in json.lines() {
                                writeln!(f, "    {line}")?;
                            }
                        }
                        None => writeln!(f, "    {data}")?,
                    }
                }
            }
            None => writeln!(f, "\nNo data captured from the target search API endpoint")?,
        }

        writeln!(f, "\nCAPTURED COOKIES ({} total):", session.cookies.len())?;
        for (key, value) in &session.cookies {
            writeln!(f, "  {key}: {value}")?;
        }

        writeln!(f, "\nALL CAPTURED REQUESTS ({} total):", session.requests.len())?;
        for (i, request) in session.requests.iter().enumerate() {
            writeln!(f, "  Request {}: {} {}", i + 1, request.method, request.url)?;
        }
        writeln!(f, "\n{rule}")
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

pub struct ReplayReport<'a>(pub &'a ReplayOutcome);

impl fmt::Display for ReplayReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        writeln!(f, "Status Code: {}", outcome.status)?;
        writeln!(f, "Response Headers: {} headers", outcome.header_count)?;

        if outcome.status != 200 {
            writeln!(f, "\nRequest failed with status {}", outcome.status)?;
            return writeln!(
                f,
                "Response Body (first {BODY_PREVIEW_CHARS} chars): {}...",
                preview(&outcome.body)
            );
        }

        match &outcome.summary {
            Some(summary) => {
                writeln!(f, "\nSUCCESS! Truncated JSON Response:")?;
                write!(f, "{summary}")?;
                writeln!(
                    f,
                    "\nFull response size: {} characters",
                    outcome.body.chars().count()
                )
            }
            None => {
                writeln!(f, "\nResponse is not valid JSON")?;
                writeln!(
                    f,
                    "Response Body (first {BODY_PREVIEW_CHARS} chars): {}...",
                    preview(&outcome.body)
                )
            }
        }
    }
}

pub fn format_capture(session: &CaptureSession, target: &str) -> String {
    CaptureDump { session, target }.to_string()
}

pub fn format_replay(outcome: &ReplayOutcome) -> String {
    ReplayReport(outcome).to_string()
}
