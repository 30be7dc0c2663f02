use crate::domain::ports::PageLinks;

/// Parse the `next` and `last` relations out of a `Link` header
///
/// Format: `<https://...?page=2>; rel="next", <https://...?page=5>; rel="last"`.
/// Other relations and malformed entries are ignored.
pub fn parse_link_header(header: &str) -> PageLinks {
    let mut links = PageLinks::default();

    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let Some(target) = parts.next().map(str::trim) else {
            continue;
        };
        let Some(url) = target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) else {
            continue;
        };

        for param in parts {
            let Some((key, value)) = param.trim().split_once('=') else {
                continue;
            };
            if key.trim() != "rel" {
                continue;
            }
            // A rel value may list several space-separated relation types.
            for rel in value.trim().trim_matches('"').split_whitespace() {
                match rel {
                    "next" => links.next = Some(url.to_string()),
                    "last" => links.last = Some(url.to_string()),
                    _ => {}
                }
            }
        }
    }

    links
}
