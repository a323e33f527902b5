//! Static parameter pools the tasks draw from

/// Search terms used by the browse archetype
pub const SEARCH_TERMS: &[&str] = &[
    "love", "drama", "romance", "action", "comedy", "thriller", "mystery",
];

/// Content sources exposing a `/theaters` listing
pub const THEATER_SOURCES: &[&str] = &[
    "netshort",
    "dotdrama",
    "flickreels",
    "goodshort",
    "idrama",
    "melolo",
    "bilitv",
    "shortmax",
    "velolo",
    "stardusttv",
    "vigloo",
];

/// Content sources exposing a `/search` endpoint
pub const SEARCH_SOURCES: &[&str] = &["dramabox", "reelshort", "netshort", "dramawave"];

/// Search terms used by the journey archetype
pub const JOURNEY_SEARCH_TERMS: &[&str] = &[
    "love",
    "drama",
    "romance",
    "cinta",
    "mafia",
    "revenge",
    "perselingkuhan",
    "CEO",
    "keluarga",
    "misteri",
];

/// Dramabox book ids known to exist; used when trending yields none
pub const BOOK_IDS: &[&str] = &[
    "42000005001",
    "42000004908",
    "42000003970",
    "42000000651",
    "42000004320",
    "41000122939",
    "42000004216",
    "42000004671",
    "42000005043",
    "42000005239",
];

pub const STRESS_USERNAME_PREFIX: &str = "stress_";
pub const STRESS_PASSWORD: &str = "StressTest123!";
pub const STRESS_EMAIL_DOMAIN: &str = "stresstest.dev";
pub const REFERRAL_CODE_PREFIX: &str = "REF";

/// Referral code the signup flow registers with
pub const SIGNUP_REFERRAL_CODE: &str = "CY5DXWJP";

/// A source the watch flow can browse and stream from
#[derive(Debug, PartialEq, Eq)]
pub struct StreamSource {
    pub name: &'static str,
    /// Listing the flow picks its content from
    pub list_path: &'static str,
    /// Query parameter naming the content on `allstreams` and `stream`
    pub id_param: &'static str,
}

pub const STREAM_SOURCES: &[StreamSource] = &[
    StreamSource {
        name: "dramabox",
        list_path: "/api/dramabox/trending",
        id_param: "bookId",
    },
    StreamSource {
        name: "reelshort",
        list_path: "/api/reelshort/trending",
        id_param: "bookId",
    },
    StreamSource {
        name: "dramawave",
        list_path: "/api/dramawave/home",
        id_param: "id",
    },
];

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Name of the query parameter a source's search endpoint expects
pub fn search_param(source: &str) -> &'static str {
    match source {
        "dramabox" | "netshort" | "reelshort" => "query",
        _ => "q",
    }
}

/// Headers of a desktop Chrome visitor landing on `host`
pub fn browser_headers(host: &str) -> Vec<(String, String)> {
    let origin = host.trim_end_matches('/');
    vec![
        ("User-Agent".to_string(), BROWSER_USER_AGENT.to_string()),
        (
            "Accept".to_string(),
            "application/json, text/plain, */*".to_string(),
        ),
        (
            "Accept-Language".to_string(),
            "id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
        ),
        ("Referer".to_string(), format!("{}/", origin)),
        ("Origin".to_string(), origin.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_sizes() {
        assert_eq!(SEARCH_TERMS.len(), 7);
        assert_eq!(THEATER_SOURCES.len(), 11);
        assert_eq!(SEARCH_SOURCES.len(), 4);
        assert_eq!(BOOK_IDS.len(), 10);
        assert_eq!(STREAM_SOURCES.len(), 3);
    }

    #[test]
    fn test_search_param() {
        assert_eq!(search_param("dramabox"), "query");
        assert_eq!(search_param("netshort"), "query");
        assert_eq!(search_param("reelshort"), "query");
        assert_eq!(search_param("dramawave"), "q");
    }

    #[test]
    fn test_browser_headers_referer() {
        let headers = browser_headers("https://dracinshort.xyz/");
        let referer = headers.iter().find(|(k, _)| k == "Referer").unwrap();
        assert_eq!(referer.1, "https://dracinshort.xyz/");
        let origin = headers.iter().find(|(k, _)| k == "Origin").unwrap();
        assert_eq!(origin.1, "https://dracinshort.xyz");
        assert!(headers.iter().any(|(k, _)| k == "User-Agent"));
    }
}
