use std::borrow::Cow;

/// Statistical series identifier in the provider's catalog (e.g. "SF43718")
pub type SeriesId = Cow<'static, str>;
