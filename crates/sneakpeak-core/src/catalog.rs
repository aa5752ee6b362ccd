//! Catalog search and trending engine.
//!
//! All operations borrow a catalog snapshot and return references into it.
//! Nothing here mutates the source slice, so a single loaded snapshot can be
//! shared by any number of concurrent callers.
//!
//! # Filter semantics
//!
//! Every supplied criterion must pass (logical AND); absent criteria impose
//! no constraint. Output keeps input order. A price bound excludes records
//! with unknown `lastSale`, and a release bound excludes records with no
//! `releaseDate`.
//!
//! # Trending
//!
//! 1. Records tagged `"trending"`, in catalog order.
//! 2. If that already fills `limit`, return its prefix.
//! 3. Otherwise fill from the whole catalog sorted by `lastSale` descending
//!    (unknown price counts as `0`, stable for ties), skipping ids already
//!    taken.

use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{SneakerRecord, TRENDING_TAG};

/// Default number of trending records when the caller gives no limit.
pub const DEFAULT_TRENDING_LIMIT: usize = 10;

/// Optional search filters. Field names match the HTTP query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    /// Free text matched against `brand model colorway`.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, alias = "min_price")]
    pub min_price: Option<f64>,
    #[serde(default, alias = "max_price")]
    pub max_price: Option<f64>,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    #[serde(default, alias = "release_from")]
    pub release_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    #[serde(default, alias = "release_to")]
    pub release_to: Option<String>,
}

impl Criteria {
    /// True when no criterion would constrain the result.
    pub fn is_empty(&self) -> bool {
        text_criterion(&self.q).is_none()
            && text_criterion(&self.brand).is_none()
            && text_criterion(&self.model).is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && text_criterion(&self.release_from).is_none()
            && text_criterion(&self.release_to).is_none()
    }

    /// Returns true if `record` satisfies every supplied criterion.
    pub fn matches(&self, record: &SneakerRecord) -> bool {
        if let Some(q) = text_criterion(&self.q) {
            if !record
                .search_text()
                .to_lowercase()
                .contains(&q.to_lowercase())
            {
                return false;
            }
        }

        if let Some(brand) = text_criterion(&self.brand) {
            if record.brand.to_lowercase() != brand.to_lowercase() {
                return false;
            }
        }

        if let Some(model) = text_criterion(&self.model) {
            if !record
                .model
                .to_lowercase()
                .contains(&model.to_lowercase())
            {
                return false;
            }
        }

        let last_sale = record.last_sale();
        if let Some(min) = self.min_price {
            match last_sale {
                Some(p) if p >= min => {}
                _ => return false,
            }
        }
        if let Some(max) = self.max_price {
            match last_sale {
                Some(p) if p <= max => {}
                _ => return false,
            }
        }

        let release = record.release_date.as_deref();
        if let Some(from) = text_criterion(&self.release_from) {
            match release {
                Some(rd) if rd >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = text_criterion(&self.release_to) {
            match release {
                Some(rd) if rd <= to => {}
                _ => return false,
            }
        }

        true
    }
}

/// Empty strings count as "not supplied".
fn text_criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Stable filter of `records` by `criteria`.
pub fn filter<'a>(records: &'a [SneakerRecord], criteria: &Criteria) -> Vec<&'a SneakerRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Curated-first trending selection. See the module docs for the algorithm.
pub fn trending(records: &[SneakerRecord], limit: usize) -> Vec<&SneakerRecord> {
    // First-seen wins when ids repeat, for tagged and fill alike.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut picked: Vec<&SneakerRecord> = Vec::new();
    for record in records {
        if record.has_tag(TRENDING_TAG) && seen.insert(record.id.as_str()) {
            picked.push(record);
        }
    }

    if picked.len() < limit {
        let mut by_price: Vec<&SneakerRecord> = records.iter().collect();
        // sort_by is stable, so equal prices keep catalog order.
        by_price.sort_by(|a, b| {
            let pa = a.last_sale().unwrap_or(0.0);
            let pb = b.last_sale().unwrap_or(0.0);
            pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
        });

        for record in by_price {
            if picked.len() >= limit {
                break;
            }
            if seen.insert(record.id.as_str()) {
                picked.push(record);
            }
        }
    }

    picked.truncate(limit);
    picked
}

/// First record whose id equals `id`, or `None`.
pub fn find_by_id<'a>(records: &'a [SneakerRecord], id: &str) -> Option<&'a SneakerRecord> {
    records.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarketData;
    use serde_json::Map;

    fn rec(id: &str, brand: &str, model: &str, colorway: &str) -> SneakerRecord {
        SneakerRecord {
            id: id.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            colorway: colorway.to_string(),
            release_date: None,
            tags: Vec::new(),
            market: MarketData::default(),
            extra: Map::new(),
        }
    }

    fn priced(id: &str, tags: &[&str], last_sale: Option<f64>) -> SneakerRecord {
        let mut r = rec(id, "", "", "");
        r.tags = tags.iter().map(|t| t.to_string()).collect();
        r.market.last_sale = last_sale;
        r
    }

    fn ids(records: &[&SneakerRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    fn sample_catalog() -> Vec<SneakerRecord> {
        vec![
            priced("a", &[], Some(100.0)),
            priced("b", &["trending"], Some(50.0)),
            priced("c", &[], Some(200.0)),
        ]
    }

    fn shoe_catalog() -> Vec<SneakerRecord> {
        let mut aj1 = rec("aj1", "Jordan", "Air Jordan 1 High", "Chicago");
        aj1.release_date = Some("2015-05-30".into());
        aj1.market.last_sale = Some(1800.0);

        let mut af1 = rec("af1", "Nike", "Air Force 1", "Triple White");
        af1.release_date = Some("2007-01-01".into());
        af1.market.last_sale = Some(110.0);

        let mut yzy = rec("yzy", "adidas", "Yeezy Boost 350", "Zebra");
        yzy.release_date = Some("2017-02-25".into());

        let mut dunk = rec("dunk", "Nike", "Dunk Low", "Panda");
        dunk.market.last_sale = Some(120.0);

        vec![aj1, af1, yzy, dunk]
    }

    // ============ filter ============

    #[test]
    fn test_filter_empty_criteria_is_identity() {
        let catalog = shoe_catalog();
        let out = filter(&catalog, &Criteria::default());
        assert_eq!(ids(&out), vec!["aj1", "af1", "yzy", "dunk"]);
        assert!(Criteria::default().is_empty());
    }

    #[test]
    fn test_filter_q_case_insensitive() {
        let catalog = shoe_catalog();
        let upper = filter(
            &catalog,
            &Criteria {
                q: Some("AIR".into()),
                ..Default::default()
            },
        );
        let lower = filter(
            &catalog,
            &Criteria {
                q: Some("air".into()),
                ..Default::default()
            },
        );
        assert_eq!(ids(&upper), vec!["aj1", "af1"]);
        assert_eq!(ids(&upper), ids(&lower));
    }

    #[test]
    fn test_filter_q_spans_field_boundary() {
        let catalog = shoe_catalog();
        let out = filter(
            &catalog,
            &Criteria {
                q: Some("nike dunk".into()),
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec!["dunk"]);

        let out = filter(
            &catalog,
            &Criteria {
                q: Some("low panda".into()),
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec!["dunk"]);
    }

    #[test]
    fn test_filter_q_separator_with_empty_fields() {
        // "x" + " " + "" + " " + "y" contains two spaces.
        let catalog = vec![rec("r", "x", "", "y")];
        let two = Criteria {
            q: Some("x  y".into()),
            ..Default::default()
        };
        let one = Criteria {
            q: Some("x y".into()),
            ..Default::default()
        };
        assert_eq!(filter(&catalog, &two).len(), 1);
        assert!(filter(&catalog, &one).is_empty());
    }

    #[test]
    fn test_filter_brand_exact_not_substring() {
        let catalog = shoe_catalog();
        let exact = filter(
            &catalog,
            &Criteria {
                brand: Some("NIKE".into()),
                ..Default::default()
            },
        );
        assert_eq!(ids(&exact), vec!["af1", "dunk"]);

        let partial = filter(
            &catalog,
            &Criteria {
                brand: Some("Nik".into()),
                ..Default::default()
            },
        );
        assert!(partial.is_empty());
    }

    #[test]
    fn test_filter_model_substring() {
        let catalog = shoe_catalog();
        let out = filter(
            &catalog,
            &Criteria {
                model: Some("boost".into()),
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec!["yzy"]);
    }

    #[test]
    fn test_filter_min_price_example() {
        let catalog = sample_catalog();
        let out = filter(
            &catalog,
            &Criteria {
                min_price: Some(150.0),
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec!["c"]);
    }

    #[test]
    fn test_filter_price_bounds_exclude_unknown() {
        let catalog = shoe_catalog();
        let min = Criteria {
            min_price: Some(0.0),
            ..Default::default()
        };
        let out = filter(&catalog, &min);
        assert_eq!(ids(&out), vec!["aj1", "af1", "dunk"]);
        for r in &out {
            assert!(r.last_sale().unwrap() >= 0.0);
        }

        let max = Criteria {
            max_price: Some(120.0),
            ..Default::default()
        };
        let out = filter(&catalog, &max);
        assert_eq!(ids(&out), vec!["af1", "dunk"]);
        for r in &out {
            assert!(r.last_sale().unwrap() <= 120.0);
        }
    }

    #[test]
    fn test_filter_price_bounds_inclusive() {
        let catalog = shoe_catalog();
        let out = filter(
            &catalog,
            &Criteria {
                min_price: Some(110.0),
                max_price: Some(110.0),
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec!["af1"]);
    }

    #[test]
    fn test_filter_release_range() {
        let catalog = shoe_catalog();
        let out = filter(
            &catalog,
            &Criteria {
                release_from: Some("2015-05-30".into()),
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec!["aj1", "yzy"]);

        let out = filter(
            &catalog,
            &Criteria {
                release_to: Some("2015-12-31".into()),
                ..Default::default()
            },
        );
        // dunk has no release date and is excluded.
        assert_eq!(ids(&out), vec!["aj1", "af1"]);
    }

    #[test]
    fn test_filter_criteria_and_together() {
        let catalog = shoe_catalog();
        let out = filter(
            &catalog,
            &Criteria {
                brand: Some("nike".into()),
                min_price: Some(115.0),
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec!["dunk"]);
    }

    #[test]
    fn test_filter_empty_strings_ignored() {
        let catalog = shoe_catalog();
        let c = Criteria {
            q: Some(String::new()),
            brand: Some(String::new()),
            release_from: Some(String::new()),
            ..Default::default()
        };
        assert!(c.is_empty());
        assert_eq!(filter(&catalog, &c).len(), catalog.len());
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let catalog = shoe_catalog();
        let before = catalog.clone();
        let _ = filter(
            &catalog,
            &Criteria {
                q: Some("air".into()),
                ..Default::default()
            },
        );
        assert_eq!(catalog, before);
    }

    // ============ trending ============

    #[test]
    fn test_trending_example() {
        let catalog = sample_catalog();
        assert_eq!(ids(&trending(&catalog, 2)), vec!["b", "c"]);
    }

    #[test]
    fn test_trending_tagged_fills_limit() {
        let catalog = vec![
            priced("x", &[], Some(999.0)),
            priced("t1", &["trending"], None),
            priced("t2", &["hype", "trending"], Some(1.0)),
            priced("t3", &["trending"], Some(2.0)),
        ];
        assert_eq!(ids(&trending(&catalog, 2)), vec!["t1", "t2"]);
    }

    #[test]
    fn test_trending_small_catalog_returns_all_tagged_first() {
        let catalog = vec![
            priced("u1", &[], None),
            priced("p1", &[], Some(10.0)),
            priced("t", &["trending"], Some(5.0)),
            priced("u2", &[], None),
        ];
        let out = trending(&catalog, 10);
        // Unpriced records sort as 0 and keep catalog order.
        assert_eq!(ids(&out), vec!["t", "p1", "u1", "u2"]);
    }

    #[test]
    fn test_trending_equal_prices_keep_catalog_order() {
        let catalog = vec![
            priced("lo", &[], Some(10.0)),
            priced("p1", &[], Some(150.0)),
            priced("zero", &[], Some(0.0)),
            priced("p2", &[], Some(150.0)),
            priced("none", &[], None),
            priced("p3", &[], Some(150.0)),
        ];
        let out = trending(&catalog, 10);
        // Explicit 0 and unknown price tie, so catalog order decides.
        assert_eq!(ids(&out), vec!["p1", "p2", "p3", "lo", "zero", "none"]);

        let reordered = vec![
            priced("none", &[], None),
            priced("zero", &[], Some(0.0)),
        ];
        assert_eq!(ids(&trending(&reordered, 2)), vec!["none", "zero"]);
    }

    #[test]
    fn test_trending_no_duplicate_ids_in_fill() {
        let catalog = vec![
            priced("a", &[], Some(300.0)),
            priced("a", &[], Some(200.0)),
            priced("b", &["trending"], Some(100.0)),
            priced("b", &[], Some(400.0)),
        ];
        let out = trending(&catalog, 5);
        assert_eq!(ids(&out), vec!["b", "a"]);
        assert_eq!(out[1].last_sale(), Some(300.0));
    }

    #[test]
    fn test_trending_duplicate_tagged_ids_first_seen() {
        let catalog = vec![
            priced("t", &["trending"], Some(10.0)),
            priced("t", &["trending"], Some(20.0)),
            priced("u", &[], Some(5.0)),
        ];
        let out = trending(&catalog, 3);
        assert_eq!(ids(&out), vec!["t", "u"]);
        assert_eq!(out[0].last_sale(), Some(10.0));
    }

    #[test]
    fn test_trending_respects_limit() {
        let catalog: Vec<SneakerRecord> = (0..20)
            .map(|i| priced(&format!("r{i}"), &[], Some(i as f64)))
            .collect();
        let out = trending(&catalog, 3);
        assert_eq!(ids(&out), vec!["r19", "r18", "r17"]);
        assert!(trending(&catalog, 0).is_empty());
    }

    #[test]
    fn test_trending_empty_catalog() {
        assert!(trending(&[], DEFAULT_TRENDING_LIMIT).is_empty());
    }

    // ============ find_by_id ============

    #[test]
    fn test_find_by_id() {
        let catalog = shoe_catalog();
        assert_eq!(find_by_id(&catalog, "yzy").map(|r| r.brand.as_str()), Some("adidas"));
        assert!(find_by_id(&catalog, "missing").is_none());
    }

    #[test]
    fn test_find_by_id_first_match() {
        let catalog = vec![priced("dup", &[], Some(1.0)), priced("dup", &[], Some(2.0))];
        assert_eq!(find_by_id(&catalog, "dup").unwrap().last_sale(), Some(1.0));
    }
}
