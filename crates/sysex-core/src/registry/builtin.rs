//! Schemas bundled with the crate.

/// (file name, JSON text)
pub(crate) const BUILTIN: &[(&str, &str)] = &[(
    "access_virus_c.json",
    include_str!("../../schemas/access_virus_c.json"),
)];
