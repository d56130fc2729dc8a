use unicode_normalization::UnicodeNormalization;

/// Derives the identity token of a card from its term.
///
/// The token is an ASCII slug over `[a-z0-9_]`: the term is NFC-normalized,
/// lowercased, spaces become underscores, language folds are applied, and
/// everything else is dropped. The result is used both as the hidden `id`
/// field and as the dedup key, so it must stay stable across releases.
pub trait IdentityNormalizer: Send + Sync {
    /// Language-specific replacements, matched against lowercased characters
    fn folds(&self) -> &[(char, &str)] {
        &[]
    }

    fn identity_token(&self, term: &str) -> String {
        let lowered = term.nfc().collect::<String>().to_lowercase();
        let mut token = String::with_capacity(lowered.len());

        for c in lowered.chars() {
            if c == ' ' {
                token.push('_');
            } else if let Some((_, replacement)) = self.folds().iter().find(|(from, _)| *from == c) {
                token.extend(replacement.chars().filter(|c| is_token_char(*c)));
            } else if is_token_char(c) {
                token.push(c);
            }
        }

        token
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// No folds: non-ASCII letters are simply dropped
pub struct AsciiNormalizer;
impl IdentityNormalizer for AsciiNormalizer {}
