//! HTTP span helpers.

use uuid::Uuid;

/// Replace UUID path segments so spans for the same route share a name.
pub(super) fn normalise_path(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_replaced() {
        let path = format!("/orders/{}/items", Uuid::now_v7());

        assert_eq!(normalise_path(&path), "/orders/{uuid}/items");
    }

    #[test]
    fn plain_paths_are_unchanged() {
        assert_eq!(normalise_path("/"), "/");
        assert_eq!(normalise_path("/coupons/apply"), "/coupons/apply");
    }
}
