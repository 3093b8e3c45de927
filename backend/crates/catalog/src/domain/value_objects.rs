//! Domain Value Objects

use kernel::text::normalize_key;
use kernel::validation::parse_numeric_id;

/// Optional county/city restriction, compared diacritic-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaFilter {
    judet: String,
    oras: String,
}

impl AreaFilter {
    pub fn new(judet: Option<&str>, oras: Option<&str>) -> Self {
        Self {
            judet: normalize_key(judet.unwrap_or_default()),
            oras: normalize_key(oras.unwrap_or_default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.judet.is_empty() && self.oras.is_empty()
    }

    pub fn has_judet(&self) -> bool {
        !self.judet.is_empty()
    }

    /// A missing column never matches a set filter.
    pub fn matches(&self, judet: Option<&str>, oras: Option<&str>) -> bool {
        let ok = |wanted: &str, actual: Option<&str>| {
            wanted.is_empty() || normalize_key(actual.unwrap_or_default()) == wanted
        };
        ok(&self.judet, judet) && ok(&self.oras, oras)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyMode {
    Categories,
    Subcategories,
    Children,
    Areas,
}

impl TaxonomyMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "categories" => Some(Self::Categories),
            "subcategories" => Some(Self::Subcategories),
            "children" => Some(Self::Children),
            "areas" => Some(Self::Areas),
            _ => None,
        }
    }
}

/// Result ordering for provider search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderSort {
    /// Most recently created first
    #[default]
    Newest,
    Oldest,
    /// Company name, diacritic-insensitive
    Name,
}

impl ProviderSort {
    /// Unknown values fall back to [`ProviderSort::Newest`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "old" => Self::Oldest,
            "name" => Self::Name,
            _ => Self::Newest,
        }
    }
}

pub const DEFAULT_PER_PAGE: usize = 12;
pub const MAX_PER_PAGE: usize = 50;

/// Validated provider search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub area: AreaFilter,
    /// Normalized service name, empty when not filtering
    pub service: String,
    /// Child subcategory wins over subcategory when both are given
    pub subcategory: Option<i64>,
    pub sort: ProviderSort,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ProviderQuery {
    fn default() -> Self {
        Self {
            area: AreaFilter::default(),
            service: String::new(),
            subcategory: None,
            sort: ProviderSort::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Raw query-string values, all optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderParams<'a> {
    pub judet: Option<&'a str>,
    pub oras: Option<&'a str>,
    pub service: Option<&'a str>,
    pub subcat: Option<&'a str>,
    pub subsub: Option<&'a str>,
    pub sort: Option<&'a str>,
    pub page: Option<&'a str>,
    pub per_page: Option<&'a str>,
}

impl ProviderQuery {
    /// Lenient: unparsable numbers fall back to defaults, `page` is at least
    /// 1 and `per_page` is clamped to `1..=50`.
    pub fn from_params(params: ProviderParams<'_>) -> Self {
        let number = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());

        let page = number(params.page).unwrap_or(1).max(1) as usize;
        let per_page = number(params.per_page)
            .unwrap_or(DEFAULT_PER_PAGE as i64)
            .clamp(1, MAX_PER_PAGE as i64) as usize;

        let subsub = params.subsub.and_then(parse_numeric_id).filter(|id| *id > 0);
        let subcat = params.subcat.and_then(parse_numeric_id).filter(|id| *id > 0);

        Self {
            area: AreaFilter::new(params.judet, params.oras),
            service: normalize_key(params.service.unwrap_or_default()),
            subcategory: subsub.or(subcat),
            sort: params.sort.map(ProviderSort::parse).unwrap_or_default(),
            page,
            per_page,
        }
    }
}
