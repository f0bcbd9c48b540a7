/// Fragments of known tracking services. A request URL containing any of
/// these as a plain substring is blocked unless its host is whitelisted.
const BUILTIN_FRAGMENTS: &[&str] = &[
    "doubleclick.net",
    "googlesyndication.com",
    "google-analytics.com",
    "googletagmanager.com",
    "googletagservices.com",
    "adservice.google.",
    "adsystem.amazon",
    "amazon-adsystem.com",
    "connect.facebook.net",
    "facebook.com/tr",
    "scorecardresearch.com",
    "quantserve.com",
    "outbrain.com",
    "taboola.com",
    "criteo.com",
    "criteo.net",
    "adnxs.com",
    "rubiconproject.com",
    "pubmatic.com",
    "openx.net",
    "moatads.com",
    "hotjar.com",
    "mixpanel.com",
    "segment.io",
    "mouseflow.com",
    "crazyegg.com",
    "chartbeat.com",
    "newrelic.com/browser",
    "bat.bing.com",
    "ads.yahoo.com",
    "analytics.tiktok.com",
    "branch.io",
    "braze.com",
    "adroll.com",
    "bluekai.com",
    "demdex.net",
    "krxd.net",
    "exelator.com",
    "smartadserver.com",
    "zedo.com",
];

/// Immutable tracker fragment set, built once at startup.
#[derive(Debug)]
pub struct TrackerSet {
    fragments: Vec<String>,
}

impl TrackerSet {
    /// Builds the set from the built-in fragments plus any configured extras.
    pub fn new(extra: &[String]) -> Self {
        let mut fragments: Vec<String> = BUILTIN_FRAGMENTS
            .iter()
            .map(|f| f.to_string())
            .collect();

        for frag in extra {
            let frag = frag.trim().to_ascii_lowercase();
            if !frag.is_empty() {
                fragments.push(frag);
            }
        }

        Self { fragments }
    }

    /// Returns the first fragment contained in `url`, if any.
    ///
    /// Callers are expected to pass a lowercased URL; fragments are stored
    /// lowercased.
    pub fn first_match<'a>(&'a self, url: &str) -> Option<&'a str> {
        self.fragments
            .iter()
            .find(|frag| url.contains(frag.as_str()))
            .map(|frag| frag.as_str())
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_fragment_matches() {
        let set = TrackerSet::new(&[]);
        assert!(set
            .first_match("https://stats.g.doubleclick.net/collect")
            .is_some());
        assert!(set.first_match("https://example.com/page").is_none());
    }

    #[test]
    fn test_extra_fragments_appended() {
        let set = TrackerSet::new(&["ads.example.com".to_string(), "  ".to_string()]);
        assert_eq!(set.len(), BUILTIN_FRAGMENTS.len() + 1);
        assert_eq!(
            set.first_match("https://ads.example.com/track"),
            Some("ads.example.com")
        );
    }
}
