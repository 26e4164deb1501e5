/// Replaces every literal occurrence of each placeholder with its value.
///
/// Placeholders are matched as plain text, delimiters included, so anything
/// not listed in `replacements` is copied through untouched.
pub fn substitute<K, V>(template: &str, replacements: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    replacements
        .iter()
        .fold(template.to_string(), |text, (placeholder, value)| {
            let placeholder = placeholder.as_ref();
            if placeholder.is_empty() || !text.contains(placeholder) {
                text
            } else {
                text.replace(placeholder, value.as_ref())
            }
        })
}
