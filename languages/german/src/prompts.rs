const SYSTEM: &str = include_str!("../prompts/vocab.system.md");
const ASSISTANT: &str = include_str!("../prompts/vocab.assistant.md");
const USER: &str = include_str!("../prompts/vocab.user.md");

/// Chat prompts for a vocabulary lookup
#[derive(Debug, Clone)]
pub struct VocabPrompts {
    /// Templated with `target_language`
    pub system: String,
    /// Exemplar answer, sent verbatim
    pub assistant: String,
    /// Templated with `term`, `context` and `target_language`
    pub user: String,
}

impl VocabPrompts {
    pub fn embedded() -> Self {
        Self {
            system: SYSTEM.to_string(),
            assistant: ASSISTANT.to_string(),
            user: USER.to_string(),
        }
    }
}

impl Default for VocabPrompts {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Replace `$name` and `${name}` placeholders; `$$` is a literal `$`.
/// Unknown placeholders are left as written.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let lookup = |name: &str| vars.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(stripped) = after.strip_prefix('$') {
            out.push('$');
            rest = stripped;
            continue;
        }

        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };

        match lookup(name) {
            Some(value) if !name.is_empty() => {
                out.push_str(value);
                rest = &after[consumed..];
            }
            _ => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
