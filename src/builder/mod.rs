use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::movie::{Episode, Movie, MovieType, SourceKind};

/// Result record from the catalog/availability provider. Only `id` and
/// `title` are guaranteed; everything else shows up when the backend
/// feels like it.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPayload {
    pub id: i64,
    pub title: String,
    pub release_year: Option<i32>,
    #[serde(rename = "poster_120x171")]
    pub poster: Option<String>,
    pub overview: Option<String>,
    #[serde(rename = "isMovie")]
    pub is_movie: Option<Value>,
    pub tvrage: Option<TvRageRef>,
    #[serde(default)]
    pub free_web_sources: Vec<CatalogSource>,
    #[serde(default)]
    pub subscription_web_sources: Vec<CatalogSource>,
    #[serde(default)]
    pub purchase_web_sources: Vec<CatalogSource>,
    #[serde(default)]
    pub tv_everywhere_web_sources: Vec<CatalogSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvRageRef {
    pub tvrage_id: Option<i64>,
}

/// One availability entry inside a catalog result. Anything beyond the
/// display name and link rides along as open detail attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSource {
    pub display_name: String,
    pub link: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Episode record from the catalog provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEpisode {
    pub id: i64,
    pub title: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub first_airdate: Option<String>,
}

/// Response from the plot/poster provider (OMDb wire shape, capitalized
/// keys and all).
#[derive(Debug, Clone, Deserialize)]
pub struct PlotPayload {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    #[serde(rename = "Year", default, deserialize_with = "year_from_wire")]
    pub year: Option<i32>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
}

/// Title record from the streaming-catalog provider.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamingPayload {
    pub show_id: i64,
    pub show_title: String,
    pub release_year: Option<i32>,
    pub mediatype: Option<i32>,
    pub summary: Option<String>,
    pub poster: Option<String>,
}

impl StreamingPayload {
    /// Media-type code 0 is a movie. The provider never documented the
    /// other codes, so anything else (or no code) also maps to movie.
    fn kind(&self) -> MovieType {
        match self.mediatype {
            Some(0) => MovieType::Movie,
            // undocumented codes get a deterministic default
            Some(_) | None => MovieType::Movie,
        }
    }
}

/// Raw provider responses, one variant per upstream shape.
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    Catalog(CatalogPayload),
    Plot(PlotPayload),
    Streaming(StreamingPayload),
}

/// Pure mapping from provider payloads to the Movie aggregate. Stateless
/// and does no I/O; the repository owns all network traffic.
#[derive(Debug, Clone, Default)]
pub struct MovieBuilder;

impl MovieBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, payload: ProviderPayload) -> Movie {
        match payload {
            ProviderPayload::Catalog(payload) => self.from_catalog(payload),
            ProviderPayload::Plot(payload) => self.from_plot(payload),
            ProviderPayload::Streaming(payload) => self.from_streaming(payload),
        }
    }

    pub fn from_catalog(&self, payload: CatalogPayload) -> Movie {
        // An explicit isMovie flag wins; otherwise a non-null TV-rating
        // id marks a show; otherwise assume movie.
        let kind = if payload.is_movie.as_ref().is_some_and(truthy) {
            MovieType::Movie
        } else if payload
            .tvrage
            .as_ref()
            .and_then(|tvrage| tvrage.tvrage_id)
            .is_some()
        {
            MovieType::Tvshow
        } else {
            MovieType::Movie
        };

        let mut movie = Movie::new(payload.id.to_string(), payload.title, kind, payload.release_year);

        if let Some(poster) = payload.poster {
            movie.set_poster(poster);
        }
        if let Some(overview) = payload.overview {
            movie.set_plot(overview);
        }

        let groups = [
            (SourceKind::Free, payload.free_web_sources),
            (SourceKind::Subscription, payload.subscription_web_sources),
            (SourceKind::Purchase, payload.purchase_web_sources),
            (SourceKind::TvEverywhere, payload.tv_everywhere_web_sources),
        ];
        for (kind, entries) in groups {
            for entry in entries {
                movie.add_source(kind, entry.display_name, entry.link, entry.details);
            }
        }

        movie
    }

    pub fn from_plot(&self, payload: PlotPayload) -> Movie {
        let kind = payload
            .kind
            .as_deref()
            .map(MovieType::parse)
            .unwrap_or(MovieType::Movie);

        let mut movie = Movie::new(payload.imdb_id, payload.title, kind, payload.year);

        if let Some(plot) = payload.plot {
            movie.set_plot(plot);
        }
        // "N/A" is this provider's way of saying there is no poster.
        if let Some(poster) = payload.poster.filter(|poster| poster != "N/A") {
            movie.set_poster(poster);
        }

        movie
    }

    pub fn from_streaming(&self, payload: StreamingPayload) -> Movie {
        let kind = payload.kind();
        let mut movie = Movie::new(
            payload.show_id.to_string(),
            payload.show_title,
            kind,
            payload.release_year,
        );

        if let Some(summary) = payload.summary {
            movie.set_plot(summary);
        }
        if let Some(poster) = payload.poster {
            movie.set_poster(poster);
        }

        movie
    }

    pub fn episode_from_catalog(&self, payload: CatalogEpisode) -> Episode {
        Episode {
            id: payload.id.to_string(),
            title: payload.title,
            season: payload.season_number,
            episode: payload.episode_number,
            first_aired: payload.first_airdate,
        }
    }
}

/// Loose truthiness for weakly typed provider flags: 1, "1", true all
/// count, 0, "", "0", null do not.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        _ => true,
    }
}

/// The plot/poster provider serves years as strings, sometimes with a
/// range suffix for shows ("2011–2019"); take the leading digits.
fn year_from_wire<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_i64().map(|year| year as i32),
        Some(Value::String(s)) => s
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .ok(),
        _ => None,
    })
}
