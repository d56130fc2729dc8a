use kartei_core::IdentityNormalizer;

/// Identity tokens for German terms: umlauts and ß are spelled out
pub struct GermanNormalizer;

impl IdentityNormalizer for GermanNormalizer {
    fn folds(&self) -> &[(char, &str)] {
        &[('ä', "ae"), ('ö', "oe"), ('ü', "ue"), ('ß', "ss")]
    }
}
