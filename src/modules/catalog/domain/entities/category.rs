use serde::{Deserialize, Serialize};

/// Genre or country reference (`{_id, name, slug}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl Category {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            slug: slug.into(),
        }
    }
}
