mod catalogs;
pub(crate) use catalogs::*;

mod provider_source;
pub(crate) use provider_source::*;

mod view_registry;
pub(crate) use view_registry::*;

mod library;
pub(crate) use library::*;

mod live_matches;
pub(crate) use live_matches::*;
