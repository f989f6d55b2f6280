use std::{fmt, str::FromStr};

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct MealDeal {
    pub meal_deal_name: String,
    pub meal_deal_price: i64,
}

/// Meal-deal selector accepted from forms. Each variant names a row of the
/// `meal_deals` reference table.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MealDealChoice {
    #[default]
    BedAndBreakfast,
    AllInclusive,
}

impl MealDealChoice {
    pub fn table_name(self) -> &'static str {
        match self {
            MealDealChoice::BedAndBreakfast => "Bed & Breakfast",
            MealDealChoice::AllInclusive => "All Inclusive",
        }
    }
}

impl FromStr for MealDealChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bed_and_breakfast" => Ok(MealDealChoice::BedAndBreakfast),
            "all_inclusive" => Ok(MealDealChoice::AllInclusive),
            other => Err(format!("Unknown meal deal {other:?}")),
        }
    }
}

/// Form field helper: a blank selection counts as no selection.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<MealDealChoice>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(D::Error::custom),
    }
}

impl fmt::Display for MealDealChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_values_map_to_table_names() {
        let choice: MealDealChoice = serde_json::from_str("\"all_inclusive\"").unwrap();
        assert_eq!(choice, MealDealChoice::AllInclusive);
        assert_eq!(choice.table_name(), "All Inclusive");
        assert_eq!(MealDealChoice::default().to_string(), "Bed & Breakfast");
    }

    #[test]
    fn unknown_form_value_is_rejected() {
        assert!(serde_json::from_str::<MealDealChoice>("\"half_board\"").is_err());
        assert!("half_board".parse::<MealDealChoice>().is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Selection {
        #[serde(default, deserialize_with = "blank_as_none")]
        meal_deal: Option<MealDealChoice>,
    }

    #[test]
    fn blank_selection_is_no_selection() {
        let blank: Selection = serde_json::from_str(r#"{"meal_deal": " "}"#).unwrap();
        assert_eq!(blank.meal_deal, None);
        let absent: Selection = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.meal_deal, None);
        let chosen: Selection = serde_json::from_str(r#"{"meal_deal": "all_inclusive"}"#).unwrap();
        assert_eq!(chosen.meal_deal, Some(MealDealChoice::AllInclusive));
        assert!(serde_json::from_str::<Selection>(r#"{"meal_deal": "half_board"}"#).is_err());
    }
}
