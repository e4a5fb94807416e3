use aggregation::ResourceId;
use serde::{Deserialize, Serialize};
use source_providers::Catalog;
use std::ops::Deref;

const MAX_RESOURCE_ID_LENGTH: usize = 128;

#[derive(Eq, PartialEq, Clone, Hash, Debug, Serialize, Deserialize)]
pub(crate) struct ViewId(pub(crate) String);

impl Deref for ViewId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for ViewId {
    fn from(value: &str) -> Self {
        ViewId(value.to_string())
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum InvalidResourceId {
    #[error("Resource id is empty")]
    Empty,
    #[error("Resource id is longer than 128 characters")]
    TooLong,
    #[error("Resource id contains a forbidden character: {0:?}")]
    ForbiddenCharacter(char),
    #[error("Resource id contains a parent path segment")]
    ParentSegment,
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '/' | '-')
}

pub(crate) fn parse_resource_id(raw: &str) -> Result<ResourceId, InvalidResourceId> {
    if raw.is_empty() {
        return Err(InvalidResourceId::Empty);
    }

    if raw.chars().count() > MAX_RESOURCE_ID_LENGTH {
        return Err(InvalidResourceId::TooLong);
    }

    if let Some(c) = raw.chars().find(|c| !is_allowed_char(*c)) {
        return Err(InvalidResourceId::ForbiddenCharacter(c));
    }

    if raw.contains("..") {
        return Err(InvalidResourceId::ParentSegment);
    }

    Ok(ResourceId::from(raw))
}

/// Identifies a title across catalogs, e.g. in the history and the wishlist.
#[derive(Eq, PartialEq, Clone, Hash, Debug, Serialize, Deserialize)]
pub(crate) struct LibraryKey {
    pub(crate) catalog: Catalog,
    pub(crate) resource_id: ResourceId,
}

impl std::fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.catalog, self.resource_id)
    }
}
