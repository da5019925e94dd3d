//! Pagination options and `Link` header parsing

use crate::Parameters;

/// Controls how list endpoints are paged
///
/// Every field is optional; an unset field adds nothing to the query and
/// leaves the server default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiOptions {
    /// First page to fetch (1-based)
    pub start_page: Option<u32>,
    /// Items per page (`per_page`)
    pub page_size: Option<u32>,
    /// Maximum number of pages to fetch
    pub page_count: Option<u32>,
}

impl ApiOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_page(mut self, page: u32) -> Self {
        self.start_page = Some(page);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn page_count(mut self, count: u32) -> Self {
        self.page_count = Some(count);
        self
    }

    /// Merge `per_page` and `page` into an existing parameter set
    pub fn apply(&self, parameters: &mut Parameters) {
        if let Some(size) = self.page_size {
            parameters.insert("per_page".to_string(), size.to_string());
        }
        if let Some(page) = self.start_page {
            parameters.insert("page".to_string(), page.to_string());
        }
    }

    /// Whether `fetched` pages exhaust `page_count`
    pub fn is_exhausted(&self, fetched: usize) -> bool {
        matches!(self.page_count, Some(count) if fetched >= count as usize)
    }
}

/// Pagination information extracted from GitHub's Link header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// The last page number (from rel="last" link)
    pub last_page: Option<u32>,
    /// The next page number (from rel="next" link)
    pub next_page: Option<u32>,
}

/// Parse the Link header to extract pagination info
///
/// GitHub Link headers look like:
/// `<https://api.github.com/repositories/1/labels?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel) {
            if let Some(page_num) = extract_page_from_url(url) {
                match rel_type {
                    "last" => info.last_page = Some(page_num),
                    "next" => info.next_page = Some(page_num),
                    _ => {}
                }
            }
        }
    }

    info
}

fn extract_page_from_url(url: &str) -> Option<u32> {
    let query = &url[url.find('?')? + 1..];

    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_add_nothing() {
        let mut parameters = Parameters::new();
        ApiOptions::default().apply(&mut parameters);
        assert!(parameters.is_empty());
    }

    #[test]
    fn test_options_apply() {
        let mut parameters = Parameters::new();
        parameters.insert("branch".to_string(), "main".to_string());

        ApiOptions::new()
            .start_page(2)
            .page_size(30)
            .apply(&mut parameters);

        assert_eq!(parameters.get("per_page").map(String::as_str), Some("30"));
        assert_eq!(parameters.get("page").map(String::as_str), Some("2"));
        assert_eq!(parameters.get("branch").map(String::as_str), Some("main"));
    }

    #[test]
    fn test_is_exhausted() {
        let unlimited = ApiOptions::default();
        assert!(!unlimited.is_exhausted(100));

        let two = ApiOptions::new().page_count(2);
        assert!(!two.is_exhausted(1));
        assert!(two.is_exhausted(2));
    }

    #[test]
    fn test_parse_link_header() {
        let header = "<https://api.github.com/repositories/1/labels?per_page=2&page=2>; rel=\"next\", \
                      <https://api.github.com/repositories/1/labels?per_page=2&page=5>; rel=\"last\"";
        let info = parse_link_header(header);
        assert_eq!(info.next_page, Some(2));
        assert_eq!(info.last_page, Some(5));
    }

    #[test]
    fn test_parse_link_header_without_next() {
        let header = "<https://api.github.com/user/followers?page=1>; rel=\"first\", \
                      <https://api.github.com/user/followers?page=3>; rel=\"prev\"";
        assert_eq!(parse_link_header(header), LinkPagination::default());
    }
}
