use reqwest::Url;

/// Parse "true"/"false"/"1"/"0"/"yes"/"no"/"on"/"off" from an owned String.
pub fn parse_bool_flag(s: String) -> Option<bool> {
    parse_bool_str(&s)
}

pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// The trimmed value of an environment variable, ignoring blank values.
pub fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Returns true for localhost, loopback IPv4/IPv6, and 0.0.0.0 URLs.
pub fn is_local_endpoint_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };

    match parsed.host_str() {
        Some(host) => {
            let normalized = host.trim().to_ascii_lowercase();
            normalized == "localhost"
                || normalized == "[::1]"
                || normalized == "::1"
                || normalized == "0.0.0.0"
                || normalized.starts_with("127.")
        }
        None => false,
    }
}

/// Join a server base URL and an absolute route without doubling slashes.
pub fn join_url(base: &str, route: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        route.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_helpers() {
        assert_eq!(parse_bool_str("true"), Some(true));
        assert_eq!(parse_bool_str("0"), Some(false));
        assert_eq!(parse_bool_flag("YES".to_string()), Some(true));
        assert_eq!(parse_bool_flag(" off ".to_string()), Some(false));
        assert_eq!(parse_bool_str("maybe"), None);
    }

    #[test]
    fn test_is_local_endpoint_url_normalizes_case_and_space() {
        assert!(is_local_endpoint_url(" HTTP://LOCALHOST:3001/api/chat "));
        assert!(is_local_endpoint_url("http://127.0.0.1:8000"));
        assert!(is_local_endpoint_url("http://[::1]:3001"));
        assert!(!is_local_endpoint_url("https://evil-localhost.com/"));
        assert!(!is_local_endpoint_url("not a url"));
    }

    #[test]
    fn test_join_url_handles_slashes() {
        assert_eq!(
            join_url("http://localhost:3001/", "/api/chat/stream"),
            "http://localhost:3001/api/chat/stream"
        );
        assert_eq!(join_url("http://h:1", "api"), "http://h:1/api");
    }
}
