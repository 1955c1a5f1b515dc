use serde::{Deserialize, Serialize};

use super::artist::{Artist, null_as_default};

/// Upper bound sent for both year ranges. The controls only expose minimums.
pub const FILTER_YEAR_MAX: i32 = 2023;
pub const FILTER_YEAR_FLOOR: i32 = 1950;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub creation_year_min: i32,
    pub creation_year_max: i32,
    pub first_album_year_min: i32,
    pub first_album_year_max: i32,
    pub members: Vec<u32>,
    pub locations: Vec<String>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            creation_year_min: FILTER_YEAR_FLOOR,
            creation_year_max: FILTER_YEAR_MAX,
            first_album_year_min: FILTER_YEAR_FLOOR,
            first_album_year_max: FILTER_YEAR_MAX,
            members: Vec::new(),
            locations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Suggestion {
    pub const LOCATION: &'static str = "location";

    pub fn label(&self) -> String {
        format!("{} ({})", self.text, self.kind)
    }

    pub fn is_location(&self) -> bool {
        self.kind == Self::LOCATION
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub artists: Vec<Artist>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn filters_serialize_with_camel_case_keys() {
        let filters = SearchFilters {
            creation_year_min: 1980,
            creation_year_max: 2023,
            first_album_year_min: 1990,
            first_album_year_max: 2023,
            members: vec![2, 4],
            locations: vec!["London".into()],
        };

        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({
                "creationYearMin": 1980,
                "creationYearMax": 2023,
                "firstAlbumYearMin": 1990,
                "firstAlbumYearMax": 2023,
                "members": [2, 4],
                "locations": ["London"],
            })
        );
    }

    #[test]
    fn suggestion_label_shows_kind() {
        let suggestion: Suggestion =
            serde_json::from_value(json!({"text": "Freddie Mercury", "type": "member"})).unwrap();
        assert_eq!(suggestion.label(), "Freddie Mercury (member)");
        assert!(!suggestion.is_location());
    }

    #[test]
    fn null_artist_list_decodes_empty() {
        let response: SearchResponse = serde_json::from_str(r#"{"artists": null}"#).unwrap();
        assert!(response.artists.is_empty());
    }
}
