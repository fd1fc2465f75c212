use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Raised when a singular lookup finds nothing in the catalog.
#[derive(Debug, Error)]
#[error("no match in the catalog for {query}")]
pub struct NotFoundError {
    query: String,
}

impl NotFoundError {
    pub fn id(id: &str) -> Self {
        Self {
            query: format!("id {}", id),
        }
    }

    pub fn title(title: &str, year: Option<i32>) -> Self {
        let query = match year {
            Some(year) => format!("title '{}' ({})", title, year),
            None => format!("title '{}'", title),
        };
        Self { query }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieType {
    Movie,
    Tvshow,
}

impl MovieType {
    /// Normalizes the type strings providers put on the wire. OMDb says
    /// "series" where the domain says tvshow.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "series" | "tvshow" => MovieType::Tvshow,
            _ => MovieType::Movie,
        }
    }
}

/// How a viewer can get at a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    Free,
    Subscription,
    Purchase,
    TvEverywhere,
}

/// One playback/availability offer on a movie or show.
#[derive(Debug, Clone)]
pub struct Source {
    kind: SourceKind,
    name: String,
    link: String,
    details: Map<String, Value>,
}

impl Source {
    pub fn interest(&self) -> SourceInterest {
        SourceInterest {
            kind: self.kind,
            name: self.name.clone(),
            link: self.link.clone(),
            details: self.details.clone(),
        }
    }
}

/// Flat caller-facing record for one source. Provider-specific extras
/// (price, quality, ...) are flattened alongside the fixed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInterest {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub name: String,
    pub link: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// One episode of a TV show. Already flat, so it doubles as its own
/// interest record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    pub id: String,
    pub title: Option<String>,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    pub first_aired: Option<String>,
}

/// Source lists grouped by kind. Keys keep first-seen order and each
/// list keeps insertion order, which a plain JSON map would not.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceGroups(pub Vec<(SourceKind, Vec<SourceInterest>)>);

impl Serialize for SourceGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (kind, sources) in &self.0 {
            map.serialize_entry(kind, sources)?;
        }
        map.end()
    }
}

/// The one read projection of the aggregate. Unset optionals serialize
/// as null, never as missing keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieInterest {
    pub id: String,
    pub episodes: Vec<Episode>,
    pub plot: Option<String>,
    pub poster: Option<String>,
    pub sources: SourceGroups,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MovieType,
    pub year: Option<i32>,
}

/// Aggregate root. Identity fields (id, title, type, year) are fixed at
/// construction; everything else accumulates through the add/set
/// operations and nothing is ever removed.
#[derive(Debug, Clone)]
pub struct Movie {
    id: String,
    title: String,
    kind: MovieType,
    year: Option<i32>,
    plot: Option<String>,
    poster: Option<String>,
    episodes: Vec<Episode>,
    sources: Vec<(SourceKind, Vec<Source>)>,
}

impl Movie {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: MovieType,
        year: Option<i32>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            year,
            plot: None,
            poster: None,
            episodes: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn add_episode(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    pub fn add_source(
        &mut self,
        kind: SourceKind,
        name: impl Into<String>,
        link: impl Into<String>,
        details: Map<String, Value>,
    ) {
        let source = Source {
            kind,
            name: name.into(),
            link: link.into(),
            details,
        };

        match self.sources.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, list)) => list.push(source),
            None => self.sources.push((kind, vec![source])),
        }
    }

    /// True iff a source of the given kind with exactly this display name
    /// was added. A kind with no sources at all is false, not an error.
    pub fn has_source(&self, name: &str, kind: SourceKind) -> bool {
        self.sources
            .iter()
            .filter(|(k, _)| *k == kind)
            .flat_map(|(_, list)| list)
            .any(|source| source.name == name)
    }

    /// The dedup rule: same title and same year, nothing else. Two
    /// records from different providers with different ids still count
    /// as the same picture.
    pub fn is_the_same_as(&self, other: &Movie) -> bool {
        self.title == other.title && self.year == other.year
    }

    pub fn set_plot(&mut self, plot: impl Into<String>) {
        self.plot = Some(plot.into());
    }

    pub fn set_poster(&mut self, poster: impl Into<String>) {
        self.poster = Some(poster.into());
    }

    pub fn interest(&self) -> MovieInterest {
        let sources = self
            .sources
            .iter()
            .map(|(kind, list)| (*kind, list.iter().map(Source::interest).collect()))
            .collect();

        MovieInterest {
            id: self.id.clone(),
            episodes: self.episodes.clone(),
            plot: self.plot.clone(),
            poster: self.poster.clone(),
            sources: SourceGroups(sources),
            title: self.title.clone(),
            kind: self.kind,
            year: self.year,
        }
    }
}
