pub(crate) mod remote_search;
pub mod ui;

pub(crate) use remote_search::RemoteSearch;
