pub(crate) mod time_ago;
