//! Host-based dispatch to per-site extractors.

mod custom;
mod fixups;
mod sites;

use std::collections::{HashMap, HashSet};

use log::debug;
use once_cell::sync::Lazy;
use url::Url;

use crate::error::ExtractError;
use crate::extractors::{
    first_success, parse_graph, parse_ld_json, parse_website, DefaultExtractor, Extractor,
    ParsingContext, StrategyFn,
};
use crate::model::RecipeSchema;

pub use fixups::{strip_anchors, Field, Fixup, Source};

/// Hosts that never carry recipe markup worth reading.
const BLACKLIST: [&str; 6] = [
    "pinterest.com",
    "youtube.com",
    "instagram.com",
    "facebook.com",
    "tiktok.com",
    "twitter.com",
];

/// Regional mirrors that serve the same markup as their primary host.
const ALIASES: [(&str, &str); 6] = [
    ("allrecipes.co.uk", "allrecipes.com"),
    ("allrecipes.com.au", "allrecipes.com"),
    ("lecker.at", "lecker.de"),
    ("chefkoch.at", "chefkoch.de"),
    ("cooking.nytimes.com", "nytimes.com"),
    ("youtu.be", "youtube.com"),
];

static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry::new(sites::SITES, &BLACKLIST, &ALIASES));

/// Custom extractor body for sites whose markup needs code, not data.
pub type CustomFn = fn(&ParsingContext) -> Result<RecipeSchema, ExtractError>;

/// How a site's base recipe is obtained before fix-ups run.
#[derive(Clone, Copy)]
pub enum Strategy {
    LdJson,
    Graph,
    GraphOrLdJson,
    Website,
    /// Same order as the fallback extractor.
    Default,
    Custom(CustomFn),
}

impl Strategy {
    fn run(self, context: &ParsingContext) -> Result<RecipeSchema, ExtractError> {
        const GRAPH_OR_LD: [(&str, StrategyFn); 2] =
            [("graph", parse_graph), ("ld+json", parse_ld_json)];
        match self {
            Strategy::LdJson => parse_ld_json(&context.document),
            Strategy::Graph => parse_graph(&context.document),
            Strategy::GraphOrLdJson => first_success(&context.document, &GRAPH_OR_LD),
            Strategy::Website => parse_website(&context.document),
            Strategy::Default => first_success(&context.document, &DefaultExtractor::STRATEGIES),
            Strategy::Custom(f) => f(context),
        }
    }
}

/// One registry entry: a base strategy plus declarative fix-ups.
pub struct Site {
    pub host: &'static str,
    pub strategy: Strategy,
    pub fixups: &'static [Fixup],
}

impl Site {
    pub const fn new(host: &'static str, strategy: Strategy) -> Self {
        Self {
            host,
            strategy,
            fixups: &[],
        }
    }

    pub const fn with_fixups(self, fixups: &'static [Fixup]) -> Self {
        Self {
            host: self.host,
            strategy: self.strategy,
            fixups,
        }
    }
}

impl Extractor for Site {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeSchema, ExtractError> {
        debug!("Site {}: parsing {}", self.host, context.url);
        let mut recipe = self.strategy.run(context)?;
        for fixup in self.fixups {
            fixup.apply(&mut recipe, context);
        }
        recipe.normalize();
        Ok(recipe)
    }
}

/// Read-only mapping from normalized host to extractor.
pub struct Registry {
    sites: HashMap<&'static str, &'static Site>,
    blacklist: HashSet<&'static str>,
    aliases: HashMap<&'static str, &'static str>,
}

impl Registry {
    fn new(
        sites: &'static [Site],
        blacklist: &[&'static str],
        aliases: &[(&'static str, &'static str)],
    ) -> Self {
        Self {
            sites: sites.iter().map(|site| (site.host, site)).collect(),
            blacklist: blacklist.iter().copied().collect(),
            aliases: aliases.iter().copied().collect(),
        }
    }

    /// The process-wide registry built from the static site table.
    pub fn global() -> &'static Registry {
        &REGISTRY
    }

    /// Pick the extractor for `url`.
    ///
    /// The exact host is tried first, then the host with leading labels
    /// removed (`m.example.com` → `example.com`). Unknown hosts get the
    /// fallback extractor; blacklisted hosts are rejected.
    pub fn lookup(&self, url: &Url) -> Result<&dyn Extractor, ExtractError> {
        let host = url.host_str().map(normalize_host).unwrap_or_default();
        let candidates: Vec<&str> = candidates(&host)
            .into_iter()
            .map(|candidate| self.aliases.get(candidate).copied().unwrap_or(candidate))
            .collect();

        if candidates.iter().any(|c| self.blacklist.contains(c)) {
            debug!("Registry: {} is blacklisted", host);
            return Err(ExtractError::UnsupportedHost(host));
        }

        match candidates.iter().find_map(|c| self.sites.get(c)) {
            Some(site) => {
                debug!("Registry: {} handled by site entry {}", host, site.host);
                Ok(*site as &dyn Extractor)
            }
            None => {
                debug!("Registry: no entry for {}, using default extractor", host);
                Ok(&DefaultExtractor as &dyn Extractor)
            }
        }
    }

    /// Look up the extractor for `context.url` and run it.
    pub fn dispatch(&self, context: &ParsingContext) -> Result<RecipeSchema, ExtractError> {
        self.lookup(&context.url)?.parse(context)
    }

    pub fn site(&self, host: &str) -> Option<&'static Site> {
        self.sites.get(normalize_host(host).as_str()).copied()
    }

    pub fn hosts(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sites.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Lowercase, drop a trailing dot and a leading `www.`.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

/// `a.b.example.com` → `[a.b.example.com, b.example.com, example.com]`.
fn candidates(host: &str) -> Vec<&str> {
    let mut out = vec![host];
    let mut rest = host;
    while let Some((_, tail)) = rest.split_once('.') {
        if !tail.contains('.') {
            break;
        }
        out.push(tail);
        rest = tail;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use scraper::Selector;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("WWW.Lecker.DE."), "lecker.de");
        assert_eq!(normalize_host("livelytable.com"), "livelytable.com");
        assert_eq!(normalize_host("wwwfoods.com"), "wwwfoods.com");
    }

    #[test]
    fn test_candidates() {
        assert_eq!(
            candidates("m.blog.example.com"),
            vec!["m.blog.example.com", "blog.example.com", "example.com"]
        );
        assert_eq!(candidates("example.com"), vec!["example.com"]);
        assert_eq!(candidates("localhost"), vec!["localhost"]);
    }

    #[test]
    fn test_lookup_exact_and_subdomain() {
        let registry = Registry::global();
        let site = registry.site("www.forksoverknives.com").unwrap();
        assert_eq!(site.host, "forksoverknives.com");

        assert!(registry
            .lookup(&url("https://www.lecker.de/rezept-123.html"))
            .is_ok());
        assert!(registry
            .lookup(&url("https://m.livelytable.com/bbq-ribs/"))
            .is_ok());
    }

    #[test]
    fn test_lookup_blacklisted() {
        let registry = Registry::global();
        for u in [
            "https://www.pinterest.com/pin/1/",
            "https://youtu.be/abc",
            "https://m.facebook.com/recipes",
        ] {
            assert!(matches!(
                registry.lookup(&url(u)),
                Err(ExtractError::UnsupportedHost(_))
            ));
        }
    }

    #[test]
    fn test_unknown_host_uses_default_extractor() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Recipe", "name": "Toast", "recipeIngredient": ["bread"]}
        </script>"#;
        let context = ParsingContext::new(url("https://unknown.example/toast"), Document::parse(html));
        let recipe = Registry::global().dispatch(&context).unwrap();
        assert_eq!(recipe.name, "Toast");
    }

    #[test]
    fn test_registry_table_is_well_formed() {
        let registry = Registry::global();
        assert_eq!(registry.len(), sites::SITES.len(), "duplicate host in site table");
        for site in sites::SITES {
            assert_eq!(site.host, normalize_host(site.host));
            for fixup in site.fixups {
                if let Some(css) = fixup.selector() {
                    assert!(Selector::parse(css).is_ok(), "{}: bad selector {}", site.host, css);
                }
            }
        }
        for host in BLACKLIST {
            assert!(registry.site(host).is_none());
        }
    }
}
