//! URL utility functions

use url::Url;

/// Parse URL and extract components
pub fn parse_url(url_str: &str) -> Result<Url, url::ParseError> {
    Url::parse(url_str)
}

/// Default port for a scheme, falling back to 80 for anything unknown
pub fn default_port(scheme: &str) -> u16 {
    match scheme {
        "https" => 443,
        _ => 80,
    }
}

/// Join a server URI and a relative action path with exactly one slash between them
pub fn join_server_path(server: &str, path: &str) -> String {
    let server = server.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        server.to_string()
    } else {
        format!("{}/{}", server, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_server_path() {
        assert_eq!(join_server_path("http://localhost:9200", "_nodes"), "http://localhost:9200/_nodes");
        assert_eq!(join_server_path("http://localhost:9200/", "/_nodes"), "http://localhost:9200/_nodes");
        assert_eq!(join_server_path("http://localhost:9200", ""), "http://localhost:9200");
    }

    #[test]
    fn test_default_port() {
        assert_eq!(default_port("http"), 80);
        assert_eq!(default_port("https"), 443);
    }

    #[test]
    fn test_parse_url() {
        let url = parse_url("https://es.example.com:9243/").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.port(), Some(9243));
        assert!(parse_url("not a url").is_err());
    }
}
