//! Request strings and mount points.
//!
//! A request is `<locator>[?key=value[&key=value...]]` with the keys `iri`
//! (class selector) and `target` (facet list). A mount point is the fully
//! specified form the projector hands out for deferred expansion:
//!
//! ```text
//! <locator>?iri=<class identifier>&target=<facet>[+<facet>...]
//! ```
//!
//! Query values use `application/x-www-form-urlencoded` escaping, so any
//! identifier survives the trip. The locator is everything before the first
//! `?` and therefore cannot itself contain one; [`MountPoint::new`] refuses
//! such locators.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

/// One expandable aspect of a class view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    /// Instances typed with the class.
    Instances,
    /// Properties whose domain includes the class.
    Properties,
    /// Domains, ranges, sub-properties and inverses of the class as a property.
    Relation,
}

impl Facet {
    /// All facets, in encoding order.
    pub const ALL: [Facet; 3] = [Facet::Instances, Facet::Properties, Facet::Relation];

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Instances => "instances",
            Facet::Properties => "properties",
            Facet::Relation => "relation",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = MountPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facet::ALL
            .into_iter()
            .find(|facet| facet.as_str() == s)
            .ok_or_else(|| MountPointError::UnknownFacet(s.to_string()))
    }
}

/// Failure to read a request or mount point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MountPointError {
    /// Nothing precedes the query string.
    #[error("request has no document locator")]
    EmptyLocator,
    /// A mount point lacks its class identifier.
    #[error("mount point has no `iri`")]
    MissingIri,
    /// A mount point lacks its facet list.
    #[error("mount point has no `target` facets")]
    MissingFacets,
    /// A facet name outside `instances`, `properties`, `relation`.
    #[error("unknown facet `{0}`")]
    UnknownFacet(String),
    /// The locator holds a `?`, which would be read back as the query start.
    #[error("locator `{0}` contains `?`")]
    LocatorWithQuery(String),
}

/// A parsed projection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Document locator.
    pub locator: String,
    /// Class selector, absolute or short.
    pub iri: Option<String>,
    /// Requested facets; `None` when absent or empty.
    pub facets: Option<BTreeSet<Facet>>,
}

impl Request {
    /// A whole-ontology request for `locator`.
    #[must_use]
    pub fn whole(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            iri: None,
            facets: None,
        }
    }
}

impl FromStr for Request {
    type Err = MountPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (locator, query) = match s.split_once('?') {
            Some((locator, query)) => (locator, query),
            None => (s, ""),
        };
        if locator.is_empty() {
            return Err(MountPointError::EmptyLocator);
        }

        let mut request = Request::whole(locator);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "iri" if !value.is_empty() => request.iri = Some(value.into_owned()),
                "iri" => {}
                "target" => {
                    let facets = parse_facets(&value)?;
                    request.facets = (!facets.is_empty()).then_some(facets);
                }
                other => tracing::debug!(key = other, "ignoring unknown request key"),
            }
        }
        Ok(request)
    }
}

/// `+` arrives decoded as a space; a literal `+` is accepted as well.
fn parse_facets(value: &str) -> Result<BTreeSet<Facet>, MountPointError> {
    value
        .split(|c: char| c == '+' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(Facet::from_str)
        .collect()
}

/// A deferred-expansion token: which facets of which class in which document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    /// Document locator.
    pub locator: String,
    /// Class identifier, as stored in the graph.
    pub iri: String,
    /// Facets to expand; never empty in a valid mount point.
    pub facets: BTreeSet<Facet>,
}

impl MountPoint {
    /// Creates a mount point.
    ///
    /// # Errors
    ///
    /// Fails when the result would not parse back to the same mount point:
    /// the locator is empty or contains `?`, the identifier is empty, or no
    /// facet is given.
    pub fn new(
        locator: impl Into<String>,
        iri: impl Into<String>,
        facets: impl IntoIterator<Item = Facet>,
    ) -> Result<Self, MountPointError> {
        let locator = locator.into();
        if locator.is_empty() {
            return Err(MountPointError::EmptyLocator);
        }
        if locator.contains('?') {
            return Err(MountPointError::LocatorWithQuery(locator));
        }
        let iri = iri.into();
        if iri.is_empty() {
            return Err(MountPointError::MissingIri);
        }
        let facets: BTreeSet<Facet> = facets.into_iter().collect();
        if facets.is_empty() {
            return Err(MountPointError::MissingFacets);
        }
        Ok(Self {
            locator,
            iri,
            facets,
        })
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iri: String = form_urlencoded::byte_serialize(self.iri.as_bytes()).collect();
        let facets: Vec<&str> = self.facets.iter().map(|facet| facet.as_str()).collect();
        write!(
            f,
            "{}?iri={}&target={}",
            self.locator,
            iri,
            facets.join("+")
        )
    }
}

impl FromStr for MountPoint {
    type Err = MountPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let request: Request = s.parse()?;
        let iri = request.iri.ok_or(MountPointError::MissingIri)?;
        let facets = request.facets.ok_or(MountPointError::MissingFacets)?;
        Ok(Self {
            locator: request.locator,
            iri,
            facets,
        })
    }
}

impl From<MountPoint> for Request {
    fn from(mount: MountPoint) -> Self {
        Self {
            locator: mount.locator,
            iri: Some(mount.iri),
            facets: Some(mount.facets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_to_the_documented_shape() {
        let mount = MountPoint::new("zoo.owl", "Lion", [Facet::Properties, Facet::Instances])
            .expect("valid mount point");
        assert_eq!(mount.to_string(), "zoo.owl?iri=Lion&target=instances+properties");
    }

    #[test]
    fn reserved_characters_in_identifiers_are_escaped() {
        let mount = MountPoint::new("zoo.owl", "http://example.org/a?b=c&d#e", [Facet::Relation])
            .expect("valid mount point");
        let encoded = mount.to_string();
        assert_eq!(encoded.matches('&').count(), 1);
        assert_eq!(encoded.parse::<MountPoint>(), Ok(mount));
    }

    #[test]
    fn plain_locator_is_a_whole_request() {
        let request: Request = "/data/zoo.owl".parse().expect("valid");
        assert_eq!(request, Request::whole("/data/zoo.owl"));
    }

    #[test]
    fn hand_written_request_keeps_unescaped_identifier() {
        let request: Request = "zoo.owl?iri=http://example.org/zoo#Lion&target=instances"
            .parse()
            .expect("valid");
        assert_eq!(request.iri.as_deref(), Some("http://example.org/zoo#Lion"));
        assert_eq!(
            request.facets,
            Some(BTreeSet::from([Facet::Instances]))
        );
    }

    #[test]
    fn empty_target_means_no_facets() {
        let request: Request = "zoo.owl?iri=Lion&target=".parse().expect("valid");
        assert_eq!(request.facets, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let request: Request = "zoo.owl?iri=Lion&zoom=3".parse().expect("valid");
        assert_eq!(request.iri.as_deref(), Some("Lion"));
    }

    #[test]
    fn malformed_requests_are_rejected() {
        assert_eq!(
            "?iri=Lion".parse::<Request>(),
            Err(MountPointError::EmptyLocator)
        );
        assert_eq!(
            "zoo.owl?target=bogus".parse::<Request>(),
            Err(MountPointError::UnknownFacet("bogus".into()))
        );
        assert_eq!(
            "zoo.owl?target=instances".parse::<MountPoint>(),
            Err(MountPointError::MissingIri)
        );
        assert_eq!(
            "zoo.owl?iri=Lion".parse::<MountPoint>(),
            Err(MountPointError::MissingFacets)
        );
    }

    #[test]
    fn mount_points_that_would_not_read_back_are_refused() {
        assert_eq!(
            MountPoint::new("zoo.owl?v=2", "Lion", [Facet::Instances]),
            Err(MountPointError::LocatorWithQuery("zoo.owl?v=2".into()))
        );
        assert_eq!(
            MountPoint::new("", "Lion", [Facet::Instances]),
            Err(MountPointError::EmptyLocator)
        );
        assert_eq!(
            MountPoint::new("zoo.owl", "", [Facet::Instances]),
            Err(MountPointError::MissingIri)
        );
        assert_eq!(
            MountPoint::new("zoo.owl", "Lion", Vec::<Facet>::new()),
            Err(MountPointError::MissingFacets)
        );
    }
}
