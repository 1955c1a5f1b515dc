use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Artist {
    pub id: u32,
    pub name: String,
    pub image: String,
    pub members: Vec<String>,
    pub creation_date: i32,
    pub first_album: String,
}

impl Default for Artist {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            image: String::new(),
            members: Vec::new(),
            creation_date: 0,
            first_album: String::new(),
        }
    }
}

impl Artist {
    /// Year of the first album. The backend sends `dd-mm-yyyy`, but a bare
    /// year or ISO date is accepted as well.
    pub fn first_album_year(&self) -> Option<i32> {
        parse_album_date(&self.first_album).map(|date| date.year())
    }

    pub fn members_label(&self) -> String {
        if self.members.is_empty() {
            "Unknown".to_string()
        } else {
            self.members.join(", ")
        }
    }

    pub fn page_path(&self) -> String {
        artist_path(self.id)
    }
}

pub fn artist_path(id: u32) -> String {
    format!("/artist/{id}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub address: String,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            address: String::new(),
            lon: None,
            lat: None,
        }
    }
}

impl Location {
    /// `(lon, lat)` when both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => Some((lon, lat)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub location: String,
    pub date: String,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            location: String::new(),
            date: String::new(),
        }
    }
}

pub type Relations = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistDetails {
    pub artist: Artist,
    #[serde(deserialize_with = "null_as_default")]
    pub locations: Vec<Location>,
    #[serde(deserialize_with = "null_as_default")]
    pub dates: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub relations: Relations,
    #[serde(deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
}

impl Default for ArtistDetails {
    fn default() -> Self {
        Self {
            artist: Artist::default(),
            locations: Vec::new(),
            dates: Vec::new(),
            relations: Relations::new(),
            events: Vec::new(),
        }
    }
}

/// The backend encodes empty slices and maps as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_album_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in ["%d-%m-%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    if value.len() == 4 {
        if let Ok(year) = value.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_artist_payload() {
        let raw = r#"{
            "id": 1,
            "image": "https://groupietrackers.herokuapp.com/api/images/queen.jpeg",
            "name": "Queen",
            "members": ["Freddie Mercury", "Brian May"],
            "creationDate": 1970,
            "firstAlbum": "14-12-1973",
            "locations": "https://groupietrackers.herokuapp.com/api/locations/1",
            "concertDates": "https://groupietrackers.herokuapp.com/api/dates/1",
            "relations": "https://groupietrackers.herokuapp.com/api/relation/1"
        }"#;

        let artist: Artist = serde_json::from_str(raw).unwrap();
        assert_eq!(artist.id, 1);
        assert_eq!(artist.creation_date, 1970);
        assert_eq!(artist.first_album_year(), Some(1973));
        assert_eq!(artist.page_path(), "/artist/1");
        assert_eq!(artist.members_label(), "Freddie Mercury, Brian May");
    }

    #[test]
    fn first_album_year_accepts_loose_formats() {
        let mut artist = Artist::default();
        assert_eq!(artist.first_album_year(), None);

        artist.first_album = "1999".into();
        assert_eq!(artist.first_album_year(), Some(1999));

        artist.first_album = "2004-03-01".into();
        assert_eq!(artist.first_album_year(), Some(2004));

        artist.first_album = "sometime".into();
        assert_eq!(artist.first_album_year(), None);
    }

    #[test]
    fn details_tolerate_null_collections() {
        let raw = r#"{
            "artist": {"id": 7, "name": "Gorillaz"},
            "locations": null,
            "dates": null,
            "relations": null,
            "events": null
        }"#;

        let details: ArtistDetails = serde_json::from_str(raw).unwrap();
        assert_eq!(details.artist.id, 7);
        assert!(details.locations.is_empty());
        assert!(details.relations.is_empty());
    }

    #[test]
    fn coordinates_require_both_finite_values() {
        let mut location = Location {
            address: "london-uk".into(),
            lon: Some(-0.12),
            lat: Some(51.5),
        };
        assert_eq!(location.coordinates(), Some((-0.12, 51.5)));

        location.lat = None;
        assert_eq!(location.coordinates(), None);

        location.lat = Some(f64::NAN);
        assert_eq!(location.coordinates(), None);
    }
}
