//! Default accessor naming.
//!
//! The host runtime looks accessors up by selector name: the getter is the
//! attribute name itself, and the setter is `set` + the capitalized name +
//! a trailing `:`.

/// Inferred getter name for an attribute.
pub fn default_getter(name: &str) -> String {
    name.to_string()
}

/// Inferred setter name for an attribute.
///
/// ```
/// use schemata_descriptor::default_setter;
///
/// assert_eq!(default_setter("name"), "setName:");
/// assert_eq!(default_setter("URL"), "setURL:");
/// ```
pub fn default_setter(name: &str) -> String {
    let mut chars = name.chars();
    let mut setter = String::with_capacity(name.len() + 4);
    setter.push_str("set");
    if let Some(first) = chars.next() {
        setter.extend(first.to_uppercase());
        setter.push_str(chars.as_str());
    }
    setter.push(':');
    setter
}
