use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static MODULES_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<modules>(.*?)</modules>").unwrap());
static MODULE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<module\s+name\s*=\s*"([^"]+)"\s*>(.*?)</module>"#).unwrap()
});

/// Parses a clustering response delimited by `<modules><module name="...">
/// ...</module></modules>` sentinel tags (spec.md §4.3 step 4-5).
///
/// Returns `None` on any structural failure (missing tags, no modules
/// found) rather than an error — the caller falls back to a single leaf
/// module without raising, per spec.
pub fn parse_partition(response: &str) -> Option<HashMap<String, Vec<String>>> {
    let block = MODULES_BLOCK.captures(response)?.get(1)?.as_str();
    let mut partition = HashMap::new();
    for module in MODULE_ENTRY.captures_iter(block) {
        let name = module.get(1)?.as_str().trim().to_string();
        let members: Vec<String> = module
            .get(2)?
            .as_str()
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect();
        if !members.is_empty() {
            partition.entry(name).or_insert_with(Vec::new).extend(members);
        }
    }

    if partition.is_empty() {
        None
    } else {
        Some(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_partition() {
        let response = r#"
<modules>
<module name="auth">
a.Login
a.Session
</module>
<module name="billing">
b.Invoice
</module>
</modules>
"#;
        let partition = parse_partition(response).unwrap();
        assert_eq!(partition["auth"], vec!["a.Login".to_string(), "a.Session".to_string()]);
        assert_eq!(partition["billing"], vec!["b.Invoice".to_string()]);
    }

    #[test]
    fn returns_none_on_missing_sentinel_tags() {
        assert!(parse_partition("auth: a.Login, a.Session").is_none());
    }

    #[test]
    fn returns_none_on_empty_modules_block() {
        assert!(parse_partition("<modules></modules>").is_none());
    }
}
