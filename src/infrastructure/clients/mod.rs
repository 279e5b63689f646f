pub(crate) mod play_store;
