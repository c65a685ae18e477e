use serde::Deserialize;
use time::Date;

#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkshop {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(with = "super::iso_date")]
    pub date: Date,
    pub max_participants: i32,
    pub price: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub category: Option<String>,
    pub keyword: Option<String>,
}

impl SearchQuery {
    /// Blank parameters count as absent.
    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    pub fn keyword(&self) -> Option<&str> {
        non_blank(self.keyword.as_deref())
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}
