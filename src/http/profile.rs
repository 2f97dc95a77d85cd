use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const CHROME_MAJOR: u16 = 138;

/// Header fingerprint of a real browser, applied to every request the
/// `HttpScraper` sends. Only the HTTP layer is imitated; the TLS handshake
/// is whatever reqwest negotiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserProfile {
    /// Brave/Chrome on Android, the fingerprint the target sites were
    /// recorded with.
    #[default]
    ChromeAndroid,
    ChromeDesktop,
    /// No impersonation headers beyond reqwest's defaults.
    Bare,
}

impl BrowserProfile {
    pub fn user_agent(&self) -> Option<String> {
        match self {
            BrowserProfile::ChromeAndroid => Some(format!(
                "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/{CHROME_MAJOR}.0.0.0 Mobile Safari/537.36"
            )),
            BrowserProfile::ChromeDesktop => Some(format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/{CHROME_MAJOR}.0.0.0 Safari/537.36"
            )),
            BrowserProfile::Bare => None,
        }
    }

    /// Client-hint and privacy headers sent alongside the user agent.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let (mobile, platform) = match self {
            BrowserProfile::ChromeAndroid => ("?1", "\"Android\""),
            BrowserProfile::ChromeDesktop => ("?0", "\"Windows\""),
            BrowserProfile::Bare => return Vec::new(),
        };

        let mut headers = vec![
            (
                "sec-ch-ua",
                format!(
                    "\"Not)A;Brand\";v=\"8\", \"Chromium\";v=\"{CHROME_MAJOR}\", \"Brave\";v=\"{CHROME_MAJOR}\""
                ),
            ),
            ("sec-ch-ua-mobile", mobile.to_string()),
            ("sec-ch-ua-platform", platform.to_string()),
            ("sec-gpc", "1".to_string()),
        ];
        if let Some(ua) = self.user_agent() {
            headers.push(("user-agent", ua));
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn android_profile_reports_mobile() {
        let headers = BrowserProfile::ChromeAndroid.headers();
        let mobile = headers.iter().find(|(k, _)| *k == "sec-ch-ua-mobile").unwrap();
        assert_eq!(mobile.1, "?1");
        assert!(headers
            .iter()
            .any(|(k, v)| *k == "user-agent" && v.contains("Android")));
    }

    #[test]
    fn bare_profile_sends_nothing() {
        assert!(BrowserProfile::Bare.headers().is_empty());
        assert!(BrowserProfile::Bare.user_agent().is_none());
    }

    #[test]
    fn deserializes_kebab_case() {
        let profile: BrowserProfile = serde_json::from_str("\"chrome-desktop\"").unwrap();
        assert_eq!(profile, BrowserProfile::ChromeDesktop);
    }
}
